//! Inline Style Registry
//!
//! Rules registered from stylesheet text, bucketed by selector kind, key and
//! pseudo state. Each entry remembers the source that registered it so a
//! source can be replaced or removed without touching anyone else's rules.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use tincture_css::{parse_inline_css, parse_stylesheet, SelectorKind, SelectorRule, StyleRecord, BASE_PSEUDO};

use crate::error::{StyleError, StyleResult};

/// One registered declaration block
#[derive(Debug, Clone)]
struct BucketEntry {
    source_id: String,
    declarations: Rc<StyleRecord>,
}

/// Store of selector rules scoped to their registering source
#[derive(Debug, Default)]
pub struct InlineStyleRegistry {
    /// `kind:key|pseudo` -> entries in registration order
    buckets: FxHashMap<String, Vec<BucketEntry>>,
    /// source id -> every (bucket, declarations) it registered
    sources: FxHashMap<String, Vec<(String, Rc<StyleRecord>)>>,
}

fn bucket_key(kind: SelectorKind, key: &str, pseudo: &str) -> String {
    format!("{}:{}|{}", kind, key, pseudo)
}

/// Missing or blank pseudo means the base state
pub(crate) fn normalize_pseudo(pseudo: Option<&str>) -> &str {
    match pseudo.map(str::trim) {
        None | Some("") => BASE_PSEUDO,
        Some(pseudo) => pseudo,
    }
}

impl InlineStyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rules under `source_id`, replacing anything it registered before
    pub fn register_inline_styles<I>(&mut self, source_id: &str, rules: I)
    where
        I: IntoIterator<Item = SelectorRule>,
    {
        self.clear_source(source_id);

        let mut registered = Vec::new();
        for rule in rules {
            let pseudo = normalize_pseudo(Some(rule.pseudo.as_str()));
            let key = bucket_key(rule.kind, &rule.key, pseudo);
            let declarations = Rc::new(rule.declarations);

            self.buckets.entry(key.clone()).or_default().push(BucketEntry {
                source_id: source_id.to_string(),
                declarations: Rc::clone(&declarations),
            });
            registered.push((key, declarations));
        }

        log::trace!("registered {} rules for source '{}'", registered.len(), source_id);
        if !registered.is_empty() {
            self.sources.insert(source_id.to_string(), registered);
        }
    }

    /// Parse `text` with the default declaration parser and register it
    pub fn register_stylesheet(&mut self, source_id: &str, text: &str) -> usize {
        let rules = parse_stylesheet(text);
        let count = rules.len();
        self.register_inline_styles(source_id, rules);
        count
    }

    /// Parse `text` with a host declaration parser and register it.
    ///
    /// On a parser failure nothing is changed.
    pub fn register_stylesheet_with<F, E>(&mut self, source_id: &str, text: &str, parse_block: F) -> StyleResult<usize>
    where
        F: FnMut(&str) -> Result<StyleRecord, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let rules = parse_inline_css(text, parse_block).map_err(|err| StyleError::declaration_parser(err))?;
        let count = rules.len();
        self.register_inline_styles(source_id, rules);
        Ok(count)
    }

    /// Merged declarations for a selector, in registration order
    pub fn get_inline_styles(&self, kind: SelectorKind, key: &str, pseudo: Option<&str>) -> Option<StyleRecord> {
        let pseudo = normalize_pseudo(pseudo);
        if let Some(record) = self.lookup(kind, key, pseudo) {
            return Some(record);
        }

        // `::before` style pseudos may be registered without their leading colon
        let stripped = pseudo.strip_prefix(':')?;
        self.lookup(kind, key, stripped)
    }

    fn lookup(&self, kind: SelectorKind, key: &str, pseudo: &str) -> Option<StyleRecord> {
        let entries = self.buckets.get(&bucket_key(kind, key, pseudo))?;
        if entries.is_empty() {
            return None;
        }

        let mut merged = StyleRecord::new();
        for entry in entries {
            merged.merge(&entry.declarations);
        }
        Some(merged)
    }

    /// Remove every rule registered by `source_id`
    pub fn clear_source(&mut self, source_id: &str) -> usize {
        let Some(registered) = self.sources.remove(source_id) else {
            return 0;
        };

        let mut removed = 0;
        for (key, declarations) in &registered {
            let Some(entries) = self.buckets.get_mut(key) else {
                continue;
            };
            let before = entries.len();
            entries.retain(|entry| !(entry.source_id == source_id && Rc::ptr_eq(&entry.declarations, declarations)));
            removed += before - entries.len();
            if entries.is_empty() {
                self.buckets.remove(key);
            }
        }

        log::trace!("cleared {} rules for source '{}'", removed, source_id);
        removed
    }

    /// Drop all buckets and sources
    pub fn clear_all(&mut self) {
        log::trace!("clearing all {} registered rules", self.len());
        self.buckets.clear();
        self.sources.clear();
    }

    pub fn is_registered(&self, source_id: &str) -> bool {
        self.sources.contains_key(source_id)
    }

    /// Total number of registered entries
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
