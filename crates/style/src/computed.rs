//! Computed Style
//!
//! Typed view over a resolved style record. Each property is converted with
//! the matching value parser; keys that are absent stay `None` so callers
//! only apply what the record actually sets.

use smallvec::SmallVec;

use tincture_css::{
    convert_box, convert_length, has_font_styles, is_color, parse_background, parse_background_image,
    parse_background_position, parse_background_size, parse_font_family, parse_outline, parse_self_alignment,
    parse_to_linear_color, parse_transform, parse_transform_origin, resolve_font_face, resolve_gap,
    BackgroundLayer, BackgroundRepeat, EdgeBox, FontFace, Gap, LinearRgba, Outline, Pivot, ResourceLoader,
    SelfAlignment, Size, StyleRecord, StyleValue, Transform2D,
};

/// Inputs for converting relative values
#[derive(Clone, Copy, Default)]
pub struct ComputeContext<'a> {
    /// Size percentages resolve against
    pub reference_size: Option<f32>,
    /// Container used for viewport units
    pub container_size: Option<Size>,
    /// Loader for background images
    pub loader: Option<&'a dyn ResourceLoader>,
    /// Parent's resolved style (font size for `em`, flow direction)
    pub parent: Option<&'a StyleRecord>,
}

impl<'a> ComputeContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_size(mut self, size: f32) -> Self {
        self.reference_size = Some(size);
        self
    }

    pub fn with_container_size(mut self, width: f32, height: f32) -> Self {
        self.container_size = Some(Size { width, height });
        self
    }

    pub fn with_loader(mut self, loader: &'a dyn ResourceLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn with_parent(mut self, parent: &'a StyleRecord) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Renderer-facing values of a resolved style record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    pub color: Option<LinearRgba>,
    pub background_color: Option<LinearRgba>,
    pub background: Option<BackgroundLayer>,
    pub margin: Option<EdgeBox>,
    pub padding: Option<EdgeBox>,
    pub border_width: Option<EdgeBox>,
    pub gap: Option<Gap>,
    pub font_face: Option<FontFace>,
    pub font_families: Option<SmallVec<[String; 4]>>,
    pub font_size: Option<f32>,
    pub outline: Option<Outline>,
    pub transform: Option<Transform2D>,
    pub transform_origin: Option<Pivot>,
    pub self_alignment: Option<SelfAlignment>,
    pub opacity: Option<f32>,
}

impl ComputedStyle {
    pub fn compute(style: &StyleRecord, context: &ComputeContext<'_>) -> Self {
        let length = |value: &StyleValue| convert_length(value, style, context.reference_size, context.container_size);

        Self {
            color: color(style, "color"),
            background_color: color(style, "backgroundColor"),
            background: background(style, context),
            margin: convert_box(style, "margin", "marginTop", "marginRight", "marginBottom", "marginLeft"),
            padding: convert_box(style, "padding", "paddingTop", "paddingRight", "paddingBottom", "paddingLeft"),
            border_width: convert_box(
                style,
                "borderWidth",
                "borderTopWidth",
                "borderRightWidth",
                "borderBottomWidth",
                "borderLeftWidth",
            ),
            gap: resolve_gap(style),
            font_face: has_font_styles(style).then(|| resolve_font_face(style)),
            font_families: style.get_str("fontFamily").map(parse_font_family),
            font_size: font_size(style, context),
            outline: outline(style, &length),
            transform: style.get_str("transform").map(|t| parse_transform(t, style)),
            transform_origin: style.get_str("transformOrigin").map(parse_transform_origin),
            self_alignment: self_alignment(style, context),
            opacity: style.get("opacity").and_then(opacity),
        }
    }
}

fn color(style: &StyleRecord, key: &str) -> Option<LinearRgba> {
    let text = style.get_str(key)?;
    if !is_color(text) {
        log::warn!("invalid {} '{}'", key, text);
        return None;
    }
    Some(parse_to_linear_color(text))
}

/// `background` shorthand overlaid with its longhands
fn background(style: &StyleRecord, context: &ComputeContext<'_>) -> Option<BackgroundLayer> {
    let mut layer = style.get_str("background").map(|b| parse_background(b, context.loader));

    if let Some(size) = style.get_str("backgroundSize") {
        layer.get_or_insert_with(Default::default).size = parse_background_size(size);
    }
    if let Some(image) = style.get("backgroundImage") {
        let layer = layer.get_or_insert_with(Default::default);
        layer.image = parse_background_image(image, layer.size, context.loader);
    }
    if let Some(position) = style.get_str("backgroundPosition") {
        layer.get_or_insert_with(Default::default).position = Some(parse_background_position(position));
    }
    if let Some(repeat) = style.get_str("backgroundRepeat") {
        layer.get_or_insert_with(Default::default).repeat = BackgroundRepeat::from_keyword(repeat.trim());
    }

    layer
}

/// Font size in px; `em` resolves against the parent's font size
fn font_size(style: &StyleRecord, context: &ComputeContext<'_>) -> Option<f32> {
    let value = style.get("fontSize")?;
    let empty = StyleRecord::new();
    let parent = context.parent.unwrap_or(&empty);
    Some(convert_length(value, parent, context.reference_size, context.container_size))
}

/// `textOutline` shorthand with `textOutlineWidth` / `textOutlineColor` overrides
fn outline(style: &StyleRecord, length: &dyn Fn(&StyleValue) -> f32) -> Option<Outline> {
    let shorthand = style.get_str("textOutline");
    let width = style.get("textOutlineWidth");
    let outline_color = style.get_str("textOutlineColor");
    if shorthand.is_none() && width.is_none() && outline_color.is_none() {
        return None;
    }

    let mut outline = shorthand.map(|s| parse_outline(s, style)).unwrap_or_default();
    if let Some(width) = width {
        outline.width = Some(length(width));
    }
    if outline_color.is_some() {
        outline.color = color(style, "textOutlineColor");
    }
    Some(outline)
}

fn self_alignment(style: &StyleRecord, context: &ComputeContext<'_>) -> Option<SelfAlignment> {
    let justify = style.get_str("justifySelf");
    let align = style.get_str("alignSelf");
    if justify.is_none() && align.is_none() {
        return None;
    }
    let direction = context.parent.and_then(|parent| parent.get_str("flexDirection"));
    Some(parse_self_alignment(justify, align, direction))
}

fn opacity(value: &StyleValue) -> Option<f32> {
    let opacity = match value {
        StyleValue::Number(n) => *n,
        StyleValue::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(percent) => percent.trim().parse::<f32>().ok()? / 100.0,
                None => s.parse().ok()?,
            }
        }
        _ => return None,
    };
    Some(opacity.clamp(0.0, 1.0))
}
