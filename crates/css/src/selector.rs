//! CSS Selector Classification
//!
//! Stylesheet selectors are restricted to `.class`, `#id` or a bare type,
//! each optionally followed by `:pseudo`. Combinators and attribute
//! qualifiers are rejected.

use std::fmt;

use crate::error::{CssError, CssResult, SourceLocation};

/// Pseudo state used when a selector has none
pub const BASE_PSEUDO: &str = "base";

/// Selector kind, used as the first part of registry keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Class,
    Id,
    Type,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKind::Class => "class",
            SelectorKind::Id => "id",
            SelectorKind::Type => "type",
        }
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified simple selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `name`
    Type(String),
}

impl SimpleSelector {
    pub fn kind(&self) -> SelectorKind {
        match self {
            SimpleSelector::Class(_) => SelectorKind::Class,
            SimpleSelector::Id(_) => SelectorKind::Id,
            SimpleSelector::Type(_) => SelectorKind::Type,
        }
    }

    /// The name without its `.` / `#` prefix
    pub fn key(&self) -> &str {
        match self {
            SimpleSelector::Class(k) | SimpleSelector::Id(k) | SimpleSelector::Type(k) => k,
        }
    }
}

/// A selector split into its base and pseudo state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSelector {
    pub selector: SimpleSelector,
    /// Text after the first top-level `:` (or `base`)
    pub pseudo: String,
}

/// Byte index of the first `:` outside brackets and parentheses
fn top_level_colon(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Classify a single selector from a selector list
pub fn classify_selector(text: &str) -> CssResult<ClassifiedSelector> {
    classify_selector_at(text, SourceLocation::default())
}

pub(crate) fn classify_selector_at(text: &str, location: SourceLocation) -> CssResult<ClassifiedSelector> {
    let text = text.trim();
    let invalid = || CssError::InvalidSelector { selector: text.to_string(), location };

    let (base, pseudo) = match top_level_colon(text) {
        Some(colon) => (text[..colon].trim(), text[colon + 1..].trim()),
        None => (text, ""),
    };

    let unsupported = |c: char| c.is_whitespace() || matches!(c, '>' | '+' | '~' | ',' | '[' | ']' | '(' | ')');
    if base.is_empty() || base.contains(unsupported) {
        return Err(invalid());
    }

    let selector = if let Some(name) = base.strip_prefix('.') {
        SimpleSelector::Class(name.to_string())
    } else if let Some(name) = base.strip_prefix('#') {
        SimpleSelector::Id(name.to_string())
    } else {
        SimpleSelector::Type(base.to_string())
    };

    if selector.key().is_empty() {
        return Err(invalid());
    }

    let pseudo = if pseudo.is_empty() { BASE_PSEUDO } else { pseudo };
    Ok(ClassifiedSelector { selector, pseudo: pseudo.to_string() })
}
