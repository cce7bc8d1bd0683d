//! Tincture CSS
//!
//! Value parsers for CSS-like style properties and the inline stylesheet
//! parser. Every conversion falls back to a documented default and logs
//! instead of failing.

pub mod error;
pub mod value;
pub mod color;
pub mod length;
pub mod box_model;
pub mod background;
pub mod font;
pub mod transform;
pub mod selector;
pub mod parser;

pub use error::{CssError, CssResult, ResourceError, SourceLocation};
pub use value::{OpaqueRef, StyleRecord, StyleValue};
pub use color::{is_color, parse_color, parse_to_linear_color, try_parse_color, LinearRgba, Rgba};
pub use length::{
    convert_length, convert_length_with_unit, try_convert_length, LengthKind, LengthUnit, LengthValue, Size,
};
pub use box_model::{convert_box, expand, resolve_gap, EdgeBox, Gap};
pub use background::{
    parse_background, parse_background_image, parse_background_position, parse_background_size,
    BackgroundLayer, BackgroundPosition, BackgroundRepeat, BackgroundSize, BrushDescriptor, HorizontalAlign,
    ResourceLoader, VerticalAlign,
};
pub use font::{
    has_font_styles, parse_font_family, parse_outline, resolve_font_face, FontFace, FontFaceName, Outline, OutlineStyle,
};
pub use transform::{
    parse_self_alignment, parse_transform, parse_transform_origin, Align, Pivot, SelfAlignment, Transform2D,
};
pub use selector::{classify_selector, ClassifiedSelector, SelectorKind, SimpleSelector, BASE_PSEUDO};
pub use parser::{kebab_to_camel, parse_declarations, parse_inline_css, parse_stylesheet, SelectorRule};
