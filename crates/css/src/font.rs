//! Font Style Resolver
//!
//! Maps weight/style declarations to a symbolic font face, parses family
//! lists and text outline shorthands.

use smallvec::SmallVec;

use crate::color::{is_color, parse_to_linear_color, LinearRgba};
use crate::length::{convert_length, is_length};
use crate::value::{StyleRecord, StyleValue};

/// Family used when a `fontFamily` list resolves to nothing
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";

/// Style keys that make a font descriptor worth building
const FONT_STYLE_KEYS: &[&str] = &[
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontWeight",
    "letterSpacing",
    "lineHeight",
    "wordSpacing",
    "textAlign",
    "textOverflow",
    "whiteSpace",
    "textOutline",
    "textOutlineColor",
    "textOutlineWidth",
];

/// Symbolic font face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFaceName {
    #[default]
    Default,
    Bold,
    Light,
    Italic,
    BoldItalic,
}

impl FontFaceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontFaceName::Default => "Default",
            FontFaceName::Bold => "Bold",
            FontFaceName::Light => "Light",
            FontFaceName::Italic => "Italic",
            FontFaceName::BoldItalic => "Bold Italic",
        }
    }
}

/// Resolved face plus optional synthetic skew
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontFace {
    pub name: FontFaceName,
    /// Skew angle in radians from `oblique <angle>`
    pub skew: Option<f32>,
}

/// Numeric font weight from a number or keyword
fn font_weight(value: &StyleValue) -> Option<f32> {
    match value {
        StyleValue::Number(n) => Some(*n),
        StyleValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(400.0),
            "bold" | "bolder" => Some(700.0),
            "lighter" => Some(300.0),
            other => other.parse().ok(),
        },
        _ => None,
    }
}

/// Parse `oblique <N>deg` into radians
fn oblique_angle(style: &str) -> Option<f32> {
    let rest = style.strip_prefix("oblique")?.trim();
    let degrees: f32 = rest.strip_suffix("deg").unwrap_or(rest).trim().parse().ok()?;
    Some(degrees.to_radians())
}

/// Resolve `fontWeight` / `fontStyle` to a font face
pub fn resolve_font_face(style: &StyleRecord) -> FontFace {
    let weight = style.get("fontWeight").and_then(font_weight).unwrap_or(400.0);
    let font_style = style
        .get_str("fontStyle")
        .map(|s| s.trim().to_ascii_lowercase())
        .unwrap_or_default();

    let italic = font_style == "italic" || font_style.starts_with("oblique");
    let skew = oblique_angle(&font_style);

    let name = match (weight >= 700.0, weight <= 300.0, italic) {
        (true, _, true) => FontFaceName::BoldItalic,
        (true, _, false) => FontFaceName::Bold,
        (false, _, true) => FontFaceName::Italic,
        (false, true, false) => FontFaceName::Light,
        (false, false, false) => FontFaceName::Default,
    };

    FontFace { name, skew }
}

/// Parse a comma-separated family list, dropping quotes
pub fn parse_font_family(text: &str) -> SmallVec<[String; 4]> {
    let mut families: SmallVec<[String; 4]> = text
        .split(',')
        .map(|family| family.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|family| !family.is_empty())
        .map(str::to_string)
        .collect();

    if families.is_empty() {
        families.push(FALLBACK_FONT_FAMILY.to_string());
    }
    families
}

/// Whether any font-related key is present
pub fn has_font_styles(style: &StyleRecord) -> bool {
    FONT_STYLE_KEYS.iter().any(|key| style.contains_key(key))
}

/// Outline line style keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineStyle {
    None,
    Hidden,
    Dotted,
    Dashed,
    Solid,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl OutlineStyle {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "none" => Some(OutlineStyle::None),
            "hidden" => Some(OutlineStyle::Hidden),
            "dotted" => Some(OutlineStyle::Dotted),
            "dashed" => Some(OutlineStyle::Dashed),
            "solid" => Some(OutlineStyle::Solid),
            "double" => Some(OutlineStyle::Double),
            "groove" => Some(OutlineStyle::Groove),
            "ridge" => Some(OutlineStyle::Ridge),
            "inset" => Some(OutlineStyle::Inset),
            "outset" => Some(OutlineStyle::Outset),
            _ => None,
        }
    }
}

/// Parsed outline shorthand
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Outline {
    pub width: Option<f32>,
    pub style: Option<OutlineStyle>,
    pub color: Option<LinearRgba>,
}

/// Parse an outline shorthand (`width style color` in any order)
pub fn parse_outline(text: &str, context: &StyleRecord) -> Outline {
    let mut outline = Outline::default();

    for token in split_outline_tokens(text) {
        if outline.width.is_none() && is_length(&token) {
            outline.width = Some(convert_length(&StyleValue::String(token), context, None, None));
        } else if let (None, Some(style)) = (outline.style, OutlineStyle::from_keyword(&token)) {
            outline.style = Some(style);
        } else if outline.color.is_none() && is_color(&token) {
            outline.color = Some(parse_to_linear_color(&token));
        } else {
            log::debug!("ignoring outline token '{}'", token);
        }
    }

    outline
}

/// Whitespace split that keeps `rgb(...)` style functions in one piece
fn split_outline_tokens(text: &str) -> SmallVec<[String; 3]> {
    let mut tokens = SmallVec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if c.is_whitespace() && depth == 0 {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face(weight: Option<StyleValue>, style: Option<&str>) -> FontFace {
        let mut record = StyleRecord::new();
        if let Some(weight) = weight {
            record.insert("fontWeight", weight);
        }
        if let Some(style) = style {
            record.insert("fontStyle", style);
        }
        resolve_font_face(&record)
    }

    #[test]
    fn test_face_names() {
        assert_eq!(face(None, None).name, FontFaceName::Default);
        assert_eq!(face(Some(StyleValue::Number(700.0)), None).name, FontFaceName::Bold);
        assert_eq!(face(Some(StyleValue::from("bold")), None).name, FontFaceName::Bold);
        assert_eq!(face(Some(StyleValue::from("900")), None).name, FontFaceName::Bold);
        assert_eq!(face(Some(StyleValue::Number(300.0)), None).name, FontFaceName::Light);
        assert_eq!(face(Some(StyleValue::from("lighter")), None).name, FontFaceName::Light);
        assert_eq!(face(Some(StyleValue::Number(500.0)), None).name, FontFaceName::Default);
        assert_eq!(face(None, Some("italic")).name, FontFaceName::Italic);
        assert_eq!(face(Some(StyleValue::Number(800.0)), Some("italic")).name, FontFaceName::BoldItalic);
        assert_eq!(face(Some(StyleValue::Number(100.0)), Some("italic")).name, FontFaceName::Italic);
        assert_eq!(FontFaceName::BoldItalic.as_str(), "Bold Italic");
    }

    #[test]
    fn test_oblique_skew() {
        let f = face(None, Some("oblique 10deg"));
        assert_eq!(f.name, FontFaceName::Italic);
        let skew = f.skew.unwrap();
        assert!((skew - 10.0_f32.to_radians()).abs() < 1e-6);

        let f = face(None, Some("oblique"));
        assert_eq!(f.name, FontFaceName::Italic);
        assert_eq!(f.skew, None);
    }

    #[test]
    fn test_font_family() {
        let families = parse_font_family("\"Open Sans\", 'Roboto', monospace");
        assert_eq!(families.as_slice(), ["Open Sans", "Roboto", "monospace"]);
        assert_eq!(parse_font_family("  ").as_slice(), [FALLBACK_FONT_FAMILY]);
        assert_eq!(parse_font_family(",,").as_slice(), [FALLBACK_FONT_FAMILY]);
    }

    #[test]
    fn test_has_font_styles() {
        assert!(!has_font_styles(&StyleRecord::new().with("color", "red")));
        assert!(has_font_styles(&StyleRecord::new().with("fontSize", 12.0)));
    }

    #[test]
    fn test_outline_any_order() {
        let ctx = StyleRecord::new();
        let outline = parse_outline("red dashed 2px", &ctx);
        assert_eq!(outline.width, Some(2.0));
        assert_eq!(outline.style, Some(OutlineStyle::Dashed));
        assert_eq!(outline.color, Some(parse_to_linear_color("red")));

        let outline = parse_outline("rgb(0, 0, 255) thick", &ctx);
        assert_eq!(outline.width, Some(20.0));
        assert_eq!(outline.style, None);
        assert_eq!(outline.color, Some(parse_to_linear_color("blue")));
    }
}
