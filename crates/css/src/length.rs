//! Length Unit Converter
//!
//! Converts numbers and length text (px, %, em, rem, vw, vh, size keywords)
//! into pixel values.

use crate::error::{CssError, CssResult};
use crate::value::{StyleRecord, StyleValue};

/// Font size used when the context has no usable px font size
pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Pixel values of the keyword sizes `thin`, `medium`/`normal` and `thick`
pub const THIN_SIZE: f32 = 12.0;
pub const MEDIUM_SIZE: f32 = 16.0;
pub const THICK_SIZE: f32 = 20.0;

/// Container dimensions used for viewport-relative units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Length units understood by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Percent,
    Em,
    Rem,
    Vw,
    Vh,
    Fr,
}

impl LengthUnit {
    /// Parse a unit suffix
    pub fn from_suffix(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "px" => Some(LengthUnit::Px),
            "%" => Some(LengthUnit::Percent),
            "em" => Some(LengthUnit::Em),
            "rem" => Some(LengthUnit::Rem),
            "vw" => Some(LengthUnit::Vw),
            "vh" => Some(LengthUnit::Vh),
            "fr" => Some(LengthUnit::Fr),
            _ => None,
        }
    }
}

/// Split a dimension like "12.5px" into its number and unit suffix
pub fn split_dimension(text: &str) -> Option<(f32, &str)> {
    let text = text.trim();
    let numeric = |i: usize, c: char| {
        let sign = (c == '-' || c == '+') && i == 0;
        let exponent = c == 'e' && i > 0 && text[i + 1..].starts_with(|n: char| n.is_ascii_digit());
        c.is_ascii_digit() || c == '.' || sign || exponent
    };
    let end = text
        .char_indices()
        .find(|&(i, c)| !numeric(i, c))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    let number: f32 = text[..end].parse().ok()?;
    Some((number, &text[end..]))
}

/// Whether `text` looks like a length (number with optional known unit, or size keyword)
pub fn is_length(text: &str) -> bool {
    if keyword_size(text).is_some() {
        return true;
    }
    match split_dimension(text) {
        Some((_, "")) => true,
        Some((_, unit)) => LengthUnit::from_suffix(unit).is_some_and(|u| u != LengthUnit::Fr),
        None => false,
    }
}

fn keyword_size(text: &str) -> Option<f32> {
    match text.trim().to_ascii_lowercase().as_str() {
        "thin" => Some(THIN_SIZE),
        "medium" | "normal" => Some(MEDIUM_SIZE),
        "thick" => Some(THICK_SIZE),
        _ => None,
    }
}

/// The font size used for em/rem: a number or a px string, else the default
pub fn context_font_size(context: &StyleRecord) -> f32 {
    match context.get("fontSize") {
        Some(StyleValue::Number(n)) => *n,
        Some(StyleValue::String(s)) => match split_dimension(s) {
            Some((n, unit)) if unit.eq_ignore_ascii_case("px") => n,
            _ => DEFAULT_FONT_SIZE,
        },
        _ => DEFAULT_FONT_SIZE,
    }
}

/// Convert a length value into pixels.
///
/// Percentages need `reference_size` and viewport units need `container_size`;
/// without them (or for anything unparseable) the result is 0.
pub fn convert_length(
    value: &StyleValue,
    context: &StyleRecord,
    reference_size: Option<f32>,
    container_size: Option<Size>,
) -> f32 {
    match value {
        StyleValue::Number(n) => *n,
        StyleValue::String(s) => match try_convert_length(s, context, reference_size, container_size) {
            Ok(px) => px,
            Err(e) => {
                log::debug!("{}, using 0", e);
                0.0
            }
        },
        _ => 0.0,
    }
}

/// Convert length text into pixels, reporting unparseable input
pub fn try_convert_length(
    text: &str,
    context: &StyleRecord,
    reference_size: Option<f32>,
    container_size: Option<Size>,
) -> CssResult<f32> {
    if let Some(size) = keyword_size(text) {
        return Ok(size);
    }

    let invalid = || CssError::InvalidLength { value: text.trim().to_string() };
    let (number, unit) = split_dimension(text).ok_or_else(invalid)?;
    if unit.is_empty() {
        return Ok(number);
    }

    let px = match LengthUnit::from_suffix(unit).ok_or_else(invalid)? {
        LengthUnit::Px => number,
        LengthUnit::Percent => reference_size.map(|r| number / 100.0 * r).unwrap_or(0.0),
        LengthUnit::Em | LengthUnit::Rem => number * context_font_size(context),
        LengthUnit::Vw => container_size.map(|c| number / 100.0 * c.width).unwrap_or(0.0),
        LengthUnit::Vh => container_size.map(|c| number / 100.0 * c.height).unwrap_or(0.0),
        LengthUnit::Fr => return Err(invalid()),
    };
    Ok(px)
}

/// Kind of a unit-preserving length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    /// Absolute pixels
    Pixel,
    /// Percentage of the reference size (value is 0-100)
    Percent,
    /// Fraction of the remaining space
    Fraction,
    Auto,
}

/// A length that keeps its unit class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LengthValue {
    pub kind: LengthKind,
    pub value: f32,
}

impl LengthValue {
    pub fn new(kind: LengthKind, value: f32) -> Self {
        Self { kind, value }
    }

    pub const AUTO: LengthValue = LengthValue { kind: LengthKind::Auto, value: 0.0 };
    /// Fallback for unparseable input: one share of free space
    pub const ONE_FRACTION: LengthValue = LengthValue { kind: LengthKind::Fraction, value: 1.0 };
}

/// Convert while preserving fr / auto / % units
pub fn convert_length_with_unit(
    value: &StyleValue,
    context: &StyleRecord,
    reference_size: Option<f32>,
    container_size: Option<Size>,
) -> LengthValue {
    let text = match value {
        StyleValue::Number(n) => return LengthValue::new(LengthKind::Pixel, *n),
        StyleValue::String(s) => s.trim(),
        _ => return LengthValue::ONE_FRACTION,
    };

    if text.eq_ignore_ascii_case("auto") {
        return LengthValue::AUTO;
    }

    if let Some((number, unit)) = split_dimension(text) {
        match LengthUnit::from_suffix(unit) {
            Some(LengthUnit::Fr) => return LengthValue::new(LengthKind::Fraction, number),
            Some(LengthUnit::Percent) => return LengthValue::new(LengthKind::Percent, number),
            _ => {}
        }
    }

    match try_convert_length(text, context, reference_size, container_size) {
        Ok(px) => LengthValue::new(LengthKind::Pixel, px),
        Err(e) => {
            log::debug!("{}, using 1fr", e);
            LengthValue::ONE_FRACTION
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(text: &str) -> StyleValue {
        StyleValue::String(text.to_string())
    }

    #[test]
    fn test_numbers_pass_through() {
        let ctx = StyleRecord::new();
        assert_eq!(convert_length(&StyleValue::Number(12.5), &ctx, None, None), 12.5);
        assert_eq!(convert_length(&s("42"), &ctx, None, None), 42.0);
        assert_eq!(convert_length(&s("10px"), &ctx, None, None), 10.0);
        assert_eq!(convert_length(&s("-4px"), &ctx, None, None), -4.0);
    }

    #[test]
    fn test_percent_needs_reference() {
        let ctx = StyleRecord::new();
        assert_eq!(convert_length(&s("50%"), &ctx, Some(300.0), None), 150.0);
        assert_eq!(convert_length(&s("50%"), &ctx, None, None), 0.0);
    }

    #[test]
    fn test_em_uses_context_font_size() {
        let ctx = StyleRecord::new();
        assert_eq!(convert_length(&s("2em"), &ctx, None, None), 32.0);

        let ctx = StyleRecord::new().with("fontSize", "20px");
        assert_eq!(convert_length(&s("2em"), &ctx, None, None), 40.0);
        assert_eq!(convert_length(&s("1.5rem"), &ctx, None, None), 30.0);

        let ctx = StyleRecord::new().with("fontSize", 10.0);
        assert_eq!(convert_length(&s("2em"), &ctx, None, None), 20.0);

        // non-px font sizes fall back to the default
        let ctx = StyleRecord::new().with("fontSize", "2em");
        assert_eq!(convert_length(&s("2em"), &ctx, None, None), 32.0);
    }

    #[test]
    fn test_viewport_units() {
        let ctx = StyleRecord::new();
        let container = Some(Size::new(800.0, 600.0));
        assert_eq!(convert_length(&s("10vw"), &ctx, None, container), 80.0);
        assert_eq!(convert_length(&s("50vh"), &ctx, None, container), 300.0);
        assert_eq!(convert_length(&s("50vh"), &ctx, None, None), 0.0);
    }

    #[test]
    fn test_keywords_and_garbage() {
        let ctx = StyleRecord::new();
        assert_eq!(convert_length(&s("thin"), &ctx, None, None), 12.0);
        assert_eq!(convert_length(&s("medium"), &ctx, None, None), 16.0);
        assert_eq!(convert_length(&s("normal"), &ctx, None, None), 16.0);
        assert_eq!(convert_length(&s("thick"), &ctx, None, None), 20.0);
        assert_eq!(convert_length(&s("banana"), &ctx, None, None), 0.0);
        assert_eq!(convert_length(&s("12pt"), &ctx, None, None), 0.0);
        assert_eq!(convert_length(&StyleValue::Bool(true), &ctx, None, None), 0.0);
    }

    #[test]
    fn test_unit_preserving() {
        let ctx = StyleRecord::new();
        assert_eq!(
            convert_length_with_unit(&s("2fr"), &ctx, None, None),
            LengthValue::new(LengthKind::Fraction, 2.0)
        );
        assert_eq!(convert_length_with_unit(&s("auto"), &ctx, None, None), LengthValue::AUTO);
        assert_eq!(
            convert_length_with_unit(&s("25%"), &ctx, None, None),
            LengthValue::new(LengthKind::Percent, 25.0)
        );
        assert_eq!(
            convert_length_with_unit(&s("3em"), &ctx, None, None),
            LengthValue::new(LengthKind::Pixel, 48.0)
        );
        assert_eq!(convert_length_with_unit(&s("wat"), &ctx, None, None), LengthValue::ONE_FRACTION);
    }

    #[test]
    fn test_split_dimension() {
        assert_eq!(split_dimension("12.5px"), Some((12.5, "px")));
        assert_eq!(split_dimension(".5em"), Some((0.5, "em")));
        assert_eq!(split_dimension("1e2px"), Some((100.0, "px")));
        assert_eq!(split_dimension("px"), None);
        assert!(is_length("0"));
        assert!(is_length("thick"));
        assert!(!is_length("solid"));
        assert!(!is_length("1fr"));
    }
}
