//! Selector Matching
//!
//! Builds the selector strings an element can match from its props and
//! defines the seam to the host's precompiled selector table.

use smallvec::SmallVec;

use tincture_css::{parse_declarations, StyleRecord, StyleValue};

/// Props holding the element's class list
pub const CLASS_NAME_PROPS: &[&str] = &["className", "class"];

/// Props never rendered as attribute selectors
const NON_ATTRIBUTE_PROPS: &[&str] = &["children"];

/// Host lookup of precompiled selector matches.
///
/// The engine only queries it; populating the table is the host's job.
pub trait SelectorMatchProvider {
    fn resolve(&self, selector: &str, pseudo: Option<&str>, media_query: Option<&str>) -> Option<StyleRecord>;
}

impl<F> SelectorMatchProvider for F
where
    F: Fn(&str, Option<&str>, Option<&str>) -> Option<StyleRecord>,
{
    fn resolve(&self, selector: &str, pseudo: Option<&str>, media_query: Option<&str>) -> Option<StyleRecord> {
        self(selector, pseudo, media_query)
    }
}

/// Whitespace-separated class tokens, empty for anything but a string
pub fn split_class_names(class_name: &str) -> SmallVec<[&str; 4]> {
    class_name.split_whitespace().collect()
}

/// Class tokens from the first class-list prop present
pub fn class_tokens(props: &StyleRecord) -> SmallVec<[&str; 4]> {
    CLASS_NAME_PROPS
        .iter()
        .find_map(|key| props.get(key))
        .and_then(StyleValue::as_str)
        .map(split_class_names)
        .unwrap_or_default()
}

/// Element id, ignored when blank or containing whitespace
pub fn element_id(props: &StyleRecord) -> Option<&str> {
    let id = props.get_str("id")?.trim();
    if id.is_empty() {
        return None;
    }
    if id.contains(char::is_whitespace) {
        log::debug!("ignoring malformed id '{}'", id);
        return None;
    }
    Some(id)
}

fn escape_attribute_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `type[key="value"]` for every plain prop, in key order
pub fn attribute_selectors(element_type: &str, props: &StyleRecord) -> Vec<String> {
    props
        .iter()
        .filter(|(key, _)| !NON_ATTRIBUTE_PROPS.contains(&key.as_str()))
        .filter_map(|(key, value)| {
            let value = value.to_css_string()?;
            Some(format!("{}[{}=\"{}\"]", element_type, key, escape_attribute_value(&value)))
        })
        .collect()
}

pub fn class_selector(class: &str) -> String {
    format!(".{}", class)
}

pub fn id_selector(id: &str) -> String {
    format!("#{}", id)
}

/// Single-level descendant selector `.parent type`
pub fn descendant_selector(parent_class: &str, element_type: &str) -> String {
    format!(".{} {}", parent_class, element_type)
}

/// The element's own `style` prop, as a record or declaration text
pub fn inline_style(props: &StyleRecord) -> Option<StyleRecord> {
    match props.get("style")? {
        StyleValue::Record(record) => Some(record.clone()),
        StyleValue::String(text) => Some(parse_declarations(text)),
        other => {
            log::debug!("ignoring non-record style prop {:?}", other);
            None
        }
    }
}
