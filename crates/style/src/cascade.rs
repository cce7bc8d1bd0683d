//! Selector Cascade
//!
//! Combines every style source that applies to an element into one record.
//! Sources are collected per tier and merged in increasing precedence, so a
//! later tier replaces any same-named property from an earlier one.

use smallvec::SmallVec;

use tincture_css::{SelectorKind, StyleRecord};

use crate::matching::{
    attribute_selectors, class_selector, class_tokens, descendant_selector, element_id, id_selector, inline_style,
    split_class_names, SelectorMatchProvider,
};
use crate::registry::InlineStyleRegistry;

/// Precedence tier of a matched style source, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// `button`
    Type,
    /// `button[type="submit"]`
    Attribute,
    /// `.card`
    Class,
    /// `.parent button`
    Descendant,
    /// `#root`
    Id,
    /// The element's own `style` prop
    Inline,
}

/// A style record matched for an element
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedStyle {
    pub tier: Tier,
    /// Selector that matched (`style` for inline)
    pub selector: String,
    pub declarations: StyleRecord,
}

/// Per-element inputs that are not part of the element's own props
#[derive(Debug, Clone, Default)]
pub struct CascadeContext {
    /// Class list of the parent element
    pub parent_class_name: Option<String>,
    /// Media query handed through to the selector provider
    pub media_query: Option<String>,
}

impl CascadeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parent's class list
    pub fn with_parent_class(mut self, class_name: impl Into<String>) -> Self {
        self.parent_class_name = Some(class_name.into());
        self
    }

    /// Set the active media query
    pub fn with_media_query(mut self, query: impl Into<String>) -> Self {
        self.media_query = Some(query.into());
        self
    }

    pub fn parent_classes(&self) -> SmallVec<[&str; 4]> {
        self.parent_class_name.as_deref().map(split_class_names).unwrap_or_default()
    }
}

/// Resolves the final style record for elements
pub struct CascadeResolver<'a> {
    registry: &'a InlineStyleRegistry,
    provider: Option<&'a dyn SelectorMatchProvider>,
    context: CascadeContext,
}

impl<'a> CascadeResolver<'a> {
    pub fn new(registry: &'a InlineStyleRegistry) -> Self {
        Self { registry, provider: None, context: CascadeContext::default() }
    }

    /// Query `provider` for precompiled selector matches
    pub fn with_provider(mut self, provider: &'a dyn SelectorMatchProvider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_context(mut self, context: CascadeContext) -> Self {
        self.context = context;
        self
    }

    pub fn context(&self) -> &CascadeContext {
        &self.context
    }

    /// Final style record for an element, `{}` when it has no props
    pub fn get_all_styles(&self, element_type: &str, props: Option<&StyleRecord>, pseudo: Option<&str>) -> StyleRecord {
        let mut styles = StyleRecord::new();
        for matched in self.collect_matches(element_type, props, pseudo) {
            styles.merge(&matched.declarations);
        }
        styles
    }

    /// Every matching style source, in the order they are merged
    pub fn collect_matches(
        &self,
        element_type: &str,
        props: Option<&StyleRecord>,
        pseudo: Option<&str>,
    ) -> Vec<MatchedStyle> {
        let mut matches = Vec::new();
        let Some(props) = props else {
            log::debug!("no props for '{}', resolving to empty style", element_type);
            return matches;
        };

        // Type
        self.push_provided(&mut matches, Tier::Type, element_type, pseudo);
        self.push_registered(&mut matches, Tier::Type, SelectorKind::Type, element_type, pseudo);

        // Attribute-qualified type
        for selector in attribute_selectors(element_type, props) {
            self.push_provided(&mut matches, Tier::Attribute, &selector, pseudo);
        }

        // Class, later tokens win
        for class in class_tokens(props) {
            self.push_provided(&mut matches, Tier::Class, &class_selector(class), pseudo);
            self.push_registered(&mut matches, Tier::Class, SelectorKind::Class, class, pseudo);
        }

        // Parent class descendant
        for parent_class in self.context.parent_classes() {
            let selector = descendant_selector(parent_class, element_type);
            self.push_provided(&mut matches, Tier::Descendant, &selector, pseudo);
        }

        // Id
        if let Some(id) = element_id(props) {
            self.push_provided(&mut matches, Tier::Id, &id_selector(id), pseudo);
            self.push_registered(&mut matches, Tier::Id, SelectorKind::Id, id, pseudo);
        }

        if let Some(declarations) = inline_style(props) {
            matches.push(MatchedStyle { tier: Tier::Inline, selector: "style".to_string(), declarations });
        }

        log::trace!("{} style sources matched for '{}'", matches.len(), element_type);
        matches
    }

    fn push_provided(&self, matches: &mut Vec<MatchedStyle>, tier: Tier, selector: &str, pseudo: Option<&str>) {
        let Some(provider) = self.provider else {
            return;
        };
        if let Some(declarations) = provider.resolve(selector, pseudo, self.context.media_query.as_deref()) {
            matches.push(MatchedStyle { tier, selector: selector.to_string(), declarations });
        }
    }

    fn push_registered(
        &self,
        matches: &mut Vec<MatchedStyle>,
        tier: Tier,
        kind: SelectorKind,
        key: &str,
        pseudo: Option<&str>,
    ) {
        if let Some(declarations) = self.registry.get_inline_styles(kind, key, pseudo) {
            let selector = match kind {
                SelectorKind::Class => class_selector(key),
                SelectorKind::Id => id_selector(key),
                SelectorKind::Type => key.to_string(),
            };
            matches.push(MatchedStyle { tier, selector, declarations });
        }
    }
}
