//! Background Layer Parser
//!
//! Splits a single `background` layer into color, image, repeat, position and
//! size, and implements the 1-4 value `background-position` grammar.

use smallvec::SmallVec;

use crate::box_model::EdgeBox;
use crate::color::{is_color, parse_to_linear_color, LinearRgba};
use crate::error::ResourceError;
use crate::length::{is_length, split_dimension, try_convert_length, LengthKind, LengthValue};
use crate::value::{OpaqueRef, StyleRecord, StyleValue};

/// Image extensions a background brush may point at
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".bmp", ".tga"];

/// Characters that can never appear in a resource path
const ILLEGAL_PATH_CHARS: &[char] = &['<', '>', '"', '|', '?', '*'];

/// Resolves image paths to opaque resource handles.
///
/// Loading itself may be asynchronous; the handle is bound to the brush as-is.
pub trait ResourceLoader {
    fn load(&self, path: &str) -> Result<OpaqueRef, ResourceError>;
}

/// Horizontal alignment of a positioned layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical alignment of a positioned layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Resolved `background-position`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BackgroundPosition {
    pub horizontal: HorizontalAlign,
    pub vertical: VerticalAlign,
    /// Offsets from the aligned edges, in pixels
    pub offsets: EdgeBox,
}

/// Resolved `background-size`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundSize {
    Auto,
    Cover,
    Contain,
    Explicit { width: LengthValue, height: LengthValue },
}

/// Resolved `background-repeat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundRepeat {
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
    Space,
    Round,
}

impl BackgroundRepeat {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "repeat" => Some(BackgroundRepeat::Repeat),
            "repeat-x" => Some(BackgroundRepeat::RepeatX),
            "repeat-y" => Some(BackgroundRepeat::RepeatY),
            "no-repeat" => Some(BackgroundRepeat::NoRepeat),
            "space" => Some(BackgroundRepeat::Space),
            "round" => Some(BackgroundRepeat::Round),
            _ => None,
        }
    }
}

/// An image brush, possibly without a bound resource
#[derive(Debug, Clone, PartialEq)]
pub struct BrushDescriptor {
    /// Path the brush was built from; `None` for pre-resolved resources
    pub source: Option<String>,
    pub size: Option<BackgroundSize>,
    pub resource: Option<OpaqueRef>,
}

/// A decomposed background layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundLayer {
    pub color: Option<LinearRgba>,
    pub image: Option<BrushDescriptor>,
    pub position: Option<BackgroundPosition>,
    pub size: Option<BackgroundSize>,
    pub repeat: Option<BackgroundRepeat>,
}

/// Split on top-level whitespace, keeping function calls whole and `/` as its own token
fn tokenize_layer(text: &str) -> SmallVec<[String; 8]> {
    let mut tokens = SmallVec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '/' if depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push("/".to_string());
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Parse a single-layer `background` shorthand
pub fn parse_background(shorthand: &str, loader: Option<&dyn ResourceLoader>) -> BackgroundLayer {
    let mut tokens = tokenize_layer(shorthand);
    let mut layer = BackgroundLayer::default();

    if tokens.last().is_some_and(|t| is_color(t)) {
        if let Some(color) = tokens.pop() {
            layer.color = Some(parse_to_linear_color(&color));
        }
    }

    let mut image_token = None;
    let mut position_tokens: SmallVec<[&str; 4]> = SmallVec::new();
    let mut size_tokens: SmallVec<[&str; 2]> = SmallVec::new();
    let mut after_slash = false;

    for token in &tokens {
        let lower = token.to_ascii_lowercase();
        if token == "/" {
            after_slash = true;
        } else if token.contains('(') {
            if image_token.is_none() {
                image_token = Some(token.as_str());
            } else {
                log::debug!("ignoring extra background function '{}'", token);
            }
        } else if let Some(repeat) = BackgroundRepeat::from_keyword(&lower) {
            layer.repeat = Some(repeat);
        } else if matches!(
            lower.as_str(),
            "none" | "scroll" | "fixed" | "local" | "border-box" | "padding-box" | "content-box"
        ) {
            // Attachment and box keywords have no counterpart here
        } else if after_slash {
            size_tokens.push(token);
        } else {
            position_tokens.push(token);
        }
    }

    if !size_tokens.is_empty() {
        layer.size = parse_background_size(&size_tokens.join(" "));
    }
    if !position_tokens.is_empty() {
        layer.position = Some(parse_background_position(&position_tokens.join(" ")));
    }
    if let Some(image) = image_token {
        layer.image = parse_background_image(&StyleValue::String(image.to_string()), layer.size, loader);
    }

    layer
}

/// Parse `background-size`
pub fn parse_background_size(text: &str) -> Option<BackgroundSize> {
    let parts: SmallVec<[&str; 2]> = text.split_whitespace().collect();
    match parts.as_slice() {
        [single] if single.eq_ignore_ascii_case("cover") => Some(BackgroundSize::Cover),
        [single] if single.eq_ignore_ascii_case("contain") => Some(BackgroundSize::Contain),
        [single] if single.eq_ignore_ascii_case("auto") => Some(BackgroundSize::Auto),
        [width] => Some(BackgroundSize::Explicit {
            width: size_component(width)?,
            height: LengthValue::AUTO,
        }),
        [width, height] => Some(BackgroundSize::Explicit {
            width: size_component(width)?,
            height: size_component(height)?,
        }),
        _ => {
            log::warn!("invalid background-size '{}'", text);
            None
        }
    }
}

fn size_component(token: &str) -> Option<LengthValue> {
    if token.eq_ignore_ascii_case("auto") {
        return Some(LengthValue::AUTO);
    }
    if let Some((n, "%")) = split_dimension(token) {
        return Some(LengthValue::new(LengthKind::Percent, n));
    }
    if !is_length(token) {
        log::warn!("invalid background-size component '{}'", token);
        return None;
    }
    try_convert_length(token, &StyleRecord::new(), None, None)
        .ok()
        .map(|px| LengthValue::new(LengthKind::Pixel, px))
}

/// Resolve a background image value into a brush.
///
/// Accepts `url(...)`, a bare path, or an already-resolved resource. Paths must
/// use an allowed image extension and contain no illegal characters. A failed
/// load keeps the brush but leaves it without a resource.
pub fn parse_background_image(
    value: &StyleValue,
    size: Option<BackgroundSize>,
    loader: Option<&dyn ResourceLoader>,
) -> Option<BrushDescriptor> {
    let text = match value {
        StyleValue::Opaque(resource) => {
            return Some(BrushDescriptor { source: None, size, resource: Some(resource.clone()) });
        }
        StyleValue::String(s) => s.trim(),
        _ => return None,
    };

    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        return None;
    }

    let path = match text.find('(') {
        Some(open) if text[..open].eq_ignore_ascii_case("url") && text.ends_with(')') => {
            unquote(&text[open + 1..text.len() - 1])
        }
        Some(_) => {
            log::debug!("unsupported background image '{}'", text);
            return None;
        }
        None => unquote(text),
    };

    if path.is_empty() || path.chars().any(|c| c.is_control() || ILLEGAL_PATH_CHARS.contains(&c)) {
        log::warn!("background image path '{}' contains illegal characters", path);
        return None;
    }

    let lower = path.to_ascii_lowercase();
    if !IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        log::warn!("background image '{}' has an unsupported extension", path);
        return None;
    }

    let resource = match loader {
        Some(loader) => match loader.load(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        },
        None => {
            log::debug!("no resource loader, brush for '{}' left unbound", path);
            None
        }
    };

    Some(BrushDescriptor { source: Some(path.to_string()), size, resource })
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = text.strip_prefix(quote).and_then(|t| t.strip_suffix(quote)) {
            return inner.trim();
        }
    }
    text
}

/// A classified `background-position` token
#[derive(Debug, Clone, Copy, PartialEq)]
enum PositionToken {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    Length(f32),
    Percent(f32),
}

impl PositionToken {
    fn classify(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "left" => Some(PositionToken::Left),
            "right" => Some(PositionToken::Right),
            "top" => Some(PositionToken::Top),
            "bottom" => Some(PositionToken::Bottom),
            "center" => Some(PositionToken::Center),
            _ => match split_dimension(token) {
                Some((n, "%")) => Some(PositionToken::Percent(n)),
                Some(_) => try_convert_length(token, &StyleRecord::new(), None, None)
                    .ok()
                    .map(PositionToken::Length),
                None => None,
            },
        }
    }

    fn is_horizontal_keyword(self) -> bool {
        matches!(self, PositionToken::Left | PositionToken::Right)
    }

    fn is_vertical_keyword(self) -> bool {
        matches!(self, PositionToken::Top | PositionToken::Bottom)
    }

    fn is_keyword(self) -> bool {
        !matches!(self, PositionToken::Length(_) | PositionToken::Percent(_))
    }
}

/// Which edge a numeric position refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    Center,
    End,
}

/// Map a numeric position onto an edge plus offset
fn numeric_edge(token: PositionToken) -> (Edge, f32) {
    match token {
        PositionToken::Length(px) => (Edge::Start, px),
        PositionToken::Percent(p) if p == 50.0 => (Edge::Center, 0.0),
        PositionToken::Percent(p) if p == 100.0 => (Edge::End, 0.0),
        PositionToken::Percent(p) => {
            if p != 0.0 {
                log::debug!("background-position {}% has no reference size, using the start edge", p);
            }
            (Edge::Start, 0.0)
        }
        _ => (Edge::Center, 0.0),
    }
}

fn offset_px(token: Option<PositionToken>) -> f32 {
    match token {
        Some(PositionToken::Length(px)) => px,
        Some(PositionToken::Percent(p)) if p != 0.0 => {
            log::debug!("background-position offset {}% has no reference size", p);
            0.0
        }
        _ => 0.0,
    }
}

/// Resolve the horizontal axis from a token and optional explicit offset
fn apply_horizontal(
    position: &mut BackgroundPosition,
    token: PositionToken,
    offset: Option<PositionToken>,
) -> bool {
    match token {
        PositionToken::Left => {
            position.horizontal = HorizontalAlign::Left;
            position.offsets.left = offset_px(offset);
        }
        PositionToken::Right => {
            position.horizontal = HorizontalAlign::Right;
            position.offsets.right = offset_px(offset);
        }
        PositionToken::Center if offset.is_none() => position.horizontal = HorizontalAlign::Center,
        PositionToken::Length(_) | PositionToken::Percent(_) if offset.is_none() => {
            let (edge, px) = numeric_edge(token);
            position.horizontal = match edge {
                Edge::Start => HorizontalAlign::Left,
                Edge::Center => HorizontalAlign::Center,
                Edge::End => HorizontalAlign::Right,
            };
            position.offsets.left = px;
        }
        _ => return false,
    }
    true
}

/// Resolve the vertical axis from a token and optional explicit offset
fn apply_vertical(
    position: &mut BackgroundPosition,
    token: PositionToken,
    offset: Option<PositionToken>,
) -> bool {
    match token {
        PositionToken::Top => {
            position.vertical = VerticalAlign::Top;
            position.offsets.top = offset_px(offset);
        }
        PositionToken::Bottom => {
            position.vertical = VerticalAlign::Bottom;
            position.offsets.bottom = offset_px(offset);
        }
        PositionToken::Center if offset.is_none() => position.vertical = VerticalAlign::Center,
        PositionToken::Length(_) | PositionToken::Percent(_) if offset.is_none() => {
            let (edge, px) = numeric_edge(token);
            position.vertical = match edge {
                Edge::Start => VerticalAlign::Top,
                Edge::Center => VerticalAlign::Center,
                Edge::End => VerticalAlign::Bottom,
            };
            position.offsets.top = px;
        }
        _ => return false,
    }
    true
}

fn position_one(token: PositionToken) -> Option<BackgroundPosition> {
    let mut position = BackgroundPosition::default();
    let ok = if token.is_vertical_keyword() {
        apply_vertical(&mut position, token, None)
    } else {
        apply_horizontal(&mut position, token, None)
    };
    ok.then_some(position)
}

/// Two tokens: keywords pick their axis, numerics fall back to (x, y) order
fn position_two(first: PositionToken, second: PositionToken) -> Option<BackgroundPosition> {
    let (horizontal, vertical) = if first.is_vertical_keyword() || second.is_horizontal_keyword() {
        (second, first)
    } else {
        (first, second)
    };

    let mut position = BackgroundPosition::default();
    if apply_horizontal(&mut position, horizontal, None) && apply_vertical(&mut position, vertical, None) {
        Some(position)
    } else {
        None
    }
}

/// Three or four tokens: each keyword optionally followed by its offset
fn position_pairs(tokens: &[PositionToken]) -> Option<BackgroundPosition> {
    let mut groups: SmallVec<[(PositionToken, Option<PositionToken>); 2]> = SmallVec::new();
    for &token in tokens {
        if token.is_keyword() {
            groups.push((token, None));
            continue;
        }
        match groups.last_mut() {
            Some(group) if group.0 != PositionToken::Center && group.1.is_none() => group.1 = Some(token),
            _ => return None,
        }
    }

    let [(a, a_offset), (b, b_offset)] = groups.as_slice() else {
        return None;
    };
    let (a, a_offset, b, b_offset) = (*a, *a_offset, *b, *b_offset);

    let (horizontal, vertical) = if a.is_vertical_keyword() || b.is_horizontal_keyword() {
        ((b, b_offset), (a, a_offset))
    } else {
        ((a, a_offset), (b, b_offset))
    };

    let mut position = BackgroundPosition::default();
    if apply_horizontal(&mut position, horizontal.0, horizontal.1)
        && apply_vertical(&mut position, vertical.0, vertical.1)
    {
        Some(position)
    } else {
        None
    }
}

/// Parse the 1-4 value `background-position` grammar.
///
/// Invalid input yields a centered position.
pub fn parse_background_position(text: &str) -> BackgroundPosition {
    let tokens: Option<SmallVec<[PositionToken; 4]>> =
        text.split_whitespace().map(PositionToken::classify).collect();

    let resolved = match tokens.as_deref() {
        Some([one]) => position_one(*one),
        Some([first, second]) => position_two(*first, *second),
        Some(tokens @ ([_, _, _] | [_, _, _, _])) => position_pairs(tokens).or_else(|| {
            log::debug!("incompatible background-position pairing '{}', reading two values", text);
            position_two(tokens[0], tokens[1])
        }),
        _ => None,
    };

    resolved.unwrap_or_else(|| {
        log::warn!("invalid background-position '{}', centering", text);
        BackgroundPosition::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingLoader {
        requested: RefCell<Vec<String>>,
        fail: bool,
    }

    impl RecordingLoader {
        fn new(fail: bool) -> Self {
            Self { requested: RefCell::new(Vec::new()), fail }
        }
    }

    impl ResourceLoader for RecordingLoader {
        fn load(&self, path: &str) -> Result<OpaqueRef, ResourceError> {
            self.requested.borrow_mut().push(path.to_string());
            if self.fail {
                Err(ResourceError::NotFound(path.to_string()))
            } else {
                Ok(OpaqueRef::new(path.to_string()))
            }
        }
    }

    #[test]
    fn test_position_center() {
        let p = parse_background_position("center");
        assert_eq!(p.horizontal, HorizontalAlign::Center);
        assert_eq!(p.vertical, VerticalAlign::Center);
        assert_eq!(p.offsets, EdgeBox::default());
    }

    #[test]
    fn test_position_single_keyword_centers_other_axis() {
        let p = parse_background_position("top");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Center, VerticalAlign::Top));

        let p = parse_background_position("right");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Right, VerticalAlign::Center));

        let p = parse_background_position("15px");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Left, VerticalAlign::Center));
        assert_eq!(p.offsets.left, 15.0);
    }

    #[test]
    fn test_position_two_values() {
        let p = parse_background_position("bottom left");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Left, VerticalAlign::Bottom));

        let p = parse_background_position("center right");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Right, VerticalAlign::Center));

        let p = parse_background_position("10px 20px");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Left, VerticalAlign::Top));
        assert_eq!(p.offsets, EdgeBox::new(10.0, 20.0, 0.0, 0.0));

        let p = parse_background_position("100% 50%");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Right, VerticalAlign::Center));
    }

    #[test]
    fn test_position_keyword_offsets() {
        let p = parse_background_position("right 10px top 20px");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Right, VerticalAlign::Top));
        assert_eq!(p.offsets.right, 10.0);
        assert_eq!(p.offsets.top, 20.0);

        let p = parse_background_position("bottom 5px left");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Left, VerticalAlign::Bottom));
        assert_eq!(p.offsets.bottom, 5.0);

        let p = parse_background_position("center top 8px");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Center, VerticalAlign::Top));
        assert_eq!(p.offsets.top, 8.0);
    }

    #[test]
    fn test_position_incompatible_pairs_fall_back() {
        let p = parse_background_position("left 10px right 20px");
        assert_eq!((p.horizontal, p.vertical), (HorizontalAlign::Left, VerticalAlign::Top));
        assert_eq!(p.offsets.top, 10.0);
    }

    #[test]
    fn test_position_garbage_is_centered() {
        assert_eq!(parse_background_position("sideways"), BackgroundPosition::default());
        assert_eq!(parse_background_position("left right"), BackgroundPosition::default());
        assert_eq!(parse_background_position(""), BackgroundPosition::default());
    }

    #[test]
    fn test_background_image_validation() {
        let brush = parse_background_image(&StyleValue::from("url('img/bg.PNG')"), None, None).unwrap();
        assert_eq!(brush.source.as_deref(), Some("img/bg.PNG"));
        assert!(brush.resource.is_none());

        assert!(parse_background_image(&StyleValue::from("bg.gif"), None, None).is_none());
        assert!(parse_background_image(&StyleValue::from("url(a|b.png)"), None, None).is_none());
        assert!(parse_background_image(&StyleValue::from("linear-gradient(red, blue)"), None, None).is_none());
        assert!(parse_background_image(&StyleValue::from("none"), None, None).is_none());
    }

    #[test]
    fn test_background_image_resolved_resource() {
        let handle = OpaqueRef::new(7u32);
        let brush = parse_background_image(&StyleValue::Opaque(handle.clone()), None, None).unwrap();
        assert_eq!(brush.resource, Some(handle));
        assert_eq!(brush.source, None);
    }

    #[test]
    fn test_background_image_loader() {
        let loader = RecordingLoader::new(false);
        let brush = parse_background_image(&StyleValue::from("icons/a.tga"), None, Some(&loader)).unwrap();
        assert!(brush.resource.is_some());
        assert_eq!(loader.requested.borrow().as_slice(), ["icons/a.tga".to_string()]);

        let failing = RecordingLoader::new(true);
        let brush = parse_background_image(&StyleValue::from("icons/a.tga"), None, Some(&failing)).unwrap();
        assert!(brush.resource.is_none());
        assert_eq!(brush.source.as_deref(), Some("icons/a.tga"));
    }

    #[test]
    fn test_background_shorthand() {
        let layer = parse_background("url(bg.jpg) no-repeat right 4px top / cover #ff0000", None);
        assert_eq!(layer.color, Some(parse_to_linear_color("#ff0000")));
        assert_eq!(layer.image.as_ref().and_then(|b| b.source.as_deref()), Some("bg.jpg"));
        assert_eq!(layer.image.as_ref().and_then(|b| b.size), Some(BackgroundSize::Cover));
        assert_eq!(layer.repeat, Some(BackgroundRepeat::NoRepeat));
        let position = layer.position.unwrap();
        assert_eq!(position.horizontal, HorizontalAlign::Right);
        assert_eq!(position.offsets.right, 4.0);
        assert_eq!(position.vertical, VerticalAlign::Top);
        assert_eq!(layer.size, Some(BackgroundSize::Cover));
    }

    #[test]
    fn test_background_color_only() {
        let layer = parse_background("rgba(0, 0, 0, 0.5)", None);
        let color = layer.color.unwrap();
        assert_eq!(color.a, 0.5);
        assert!(layer.image.is_none());
        assert!(layer.position.is_none());
    }

    #[test]
    fn test_background_size() {
        assert_eq!(parse_background_size("contain"), Some(BackgroundSize::Contain));
        assert_eq!(
            parse_background_size("50% 20px"),
            Some(BackgroundSize::Explicit {
                width: LengthValue::new(LengthKind::Percent, 50.0),
                height: LengthValue::new(LengthKind::Pixel, 20.0),
            })
        );
        assert_eq!(
            parse_background_size("10px"),
            Some(BackgroundSize::Explicit {
                width: LengthValue::new(LengthKind::Pixel, 10.0),
                height: LengthValue::AUTO,
            })
        );
        assert_eq!(parse_background_size("huge"), None);
    }
}
