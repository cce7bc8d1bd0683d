//! Transform & Alignment Parsers
//!
//! Parses CSS transform function lists into a 2D accumulator, transform-origin
//! into a normalized pivot, and self-alignment keywords into axis alignments.

use smallvec::SmallVec;

use crate::length::{convert_length, split_dimension};
use crate::value::{StyleRecord, StyleValue};

/// Accumulated 2D transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Translation in pixels
    pub translation: [f32; 2],
    pub scale: [f32; 2],
    /// Skew angles (x, y) in degrees
    pub shear: [f32; 2],
    /// Rotation in degrees
    pub angle: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translation: [0.0, 0.0],
            scale: [1.0, 1.0],
            shear: [0.0, 0.0],
            angle: 0.0,
        }
    }
}

impl Transform2D {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

const MAX_SKEW: f32 = 90.0;

fn clamp_skew(degrees: f32) -> f32 {
    degrees.clamp(-MAX_SKEW, MAX_SKEW)
}

/// Split `name(args) name(args)` into (name, args) pairs
fn split_functions(text: &str) -> SmallVec<[(&str, &str); 4]> {
    let mut functions = SmallVec::new();
    let mut rest = text.trim();

    while let Some(open) = rest.find('(') {
        let name = rest[..open].trim();
        let Some(close) = rest[open..].find(')') else {
            log::warn!("unterminated transform function '{}'", name);
            break;
        };
        functions.push((name, &rest[open + 1..open + close]));
        rest = rest[open + close + 1..].trim_start();
    }
    if !rest.trim().is_empty() {
        log::debug!("ignoring trailing transform text '{}'", rest);
    }
    functions
}

fn split_args(args: &str) -> SmallVec<[&str; 16]> {
    if args.contains(',') {
        args.split(',').map(str::trim).filter(|a| !a.is_empty()).collect()
    } else {
        args.split_whitespace().collect()
    }
}

/// Angle in degrees; accepts deg, rad, grad, turn or a bare number
pub fn parse_angle(token: &str) -> Option<f32> {
    let (value, unit) = split_dimension(token)?;
    match unit.to_ascii_lowercase().as_str() {
        "" | "deg" => Some(value),
        "rad" => Some(value.to_degrees()),
        "grad" => Some(value * 0.9),
        "turn" => Some(value * 360.0),
        _ => None,
    }
}

/// Scale factor; percentages are fractions of 1
fn parse_factor(token: &str) -> Option<f32> {
    match split_dimension(token)? {
        (value, "") => Some(value),
        (value, "%") => Some(value / 100.0),
        _ => None,
    }
}

fn length(token: &str, context: &StyleRecord) -> f32 {
    convert_length(&StyleValue::String(token.to_string()), context, None, None)
}

/// Decompose the 2D part of an affine matrix into the accumulator
fn apply_matrix(transform: &mut Transform2D, [a, b, c, d, e, f]: [f32; 6]) {
    transform.translation[0] += e;
    transform.translation[1] += f;

    let mut scale_x = (a * a + b * b).sqrt();
    if scale_x == 0.0 {
        log::debug!("degenerate transform matrix, skipping decomposition");
        return;
    }
    let (ux, uy) = (a / scale_x, b / scale_x);
    let mut shear = ux * c + uy * d;
    let (cx, cy) = (c - ux * shear, d - uy * shear);
    let scale_y = (cx * cx + cy * cy).sqrt();
    if scale_y != 0.0 {
        shear /= scale_y;
    }
    if a * d - b * c < 0.0 {
        scale_x = -scale_x;
    }

    transform.scale[0] *= scale_x;
    transform.scale[1] *= scale_y;
    transform.angle += uy.atan2(ux).to_degrees();
    transform.shear[0] = clamp_skew(transform.shear[0] + shear.atan().to_degrees());
}

fn numbers<const N: usize>(args: &[&str]) -> Option<[f32; N]> {
    if args.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().ok()?;
    }
    Some(out)
}

/// Apply one transform function; returns false when its arguments are invalid
fn apply_function(transform: &mut Transform2D, name: &str, args: &[&str], context: &StyleRecord) -> bool {
    match (name.to_ascii_lowercase().as_str(), args) {
        ("translate", [x]) => transform.translation[0] += length(x, context),
        ("translate", [x, y]) | ("translate3d", [x, y, _]) => {
            transform.translation[0] += length(x, context);
            transform.translation[1] += length(y, context);
        }
        ("translatex", [x]) => transform.translation[0] += length(x, context),
        ("translatey", [y]) => transform.translation[1] += length(y, context),
        ("translatez", [_]) => {}
        ("scale", [s]) => {
            let Some(s) = parse_factor(s) else { return false };
            transform.scale[0] *= s;
            transform.scale[1] *= s;
        }
        ("scale", [x, y]) | ("scale3d", [x, y, _]) => {
            let (Some(x), Some(y)) = (parse_factor(x), parse_factor(y)) else { return false };
            transform.scale[0] *= x;
            transform.scale[1] *= y;
        }
        ("scalex", [x]) => {
            let Some(x) = parse_factor(x) else { return false };
            transform.scale[0] *= x;
        }
        ("scaley", [y]) => {
            let Some(y) = parse_factor(y) else { return false };
            transform.scale[1] *= y;
        }
        ("rotate" | "rotatez", [a]) => {
            let Some(a) = parse_angle(a) else { return false };
            transform.angle += a;
        }
        ("skew", [x]) | ("skewx", [x]) => {
            let Some(x) = parse_angle(x) else { return false };
            transform.shear[0] = clamp_skew(transform.shear[0] + x);
        }
        ("skew", [x, y]) => {
            let (Some(x), Some(y)) = (parse_angle(x), parse_angle(y)) else { return false };
            transform.shear[0] = clamp_skew(transform.shear[0] + x);
            transform.shear[1] = clamp_skew(transform.shear[1] + y);
        }
        ("skewy", [y]) => {
            let Some(y) = parse_angle(y) else { return false };
            transform.shear[1] = clamp_skew(transform.shear[1] + y);
        }
        ("matrix", _) => {
            let Some(m) = numbers::<6>(args) else { return false };
            apply_matrix(transform, m);
        }
        ("matrix3d", _) => {
            let Some(m) = numbers::<16>(args) else { return false };
            // Column-major 4x4; only the 2D affine part is kept
            apply_matrix(transform, [m[0], m[1], m[4], m[5], m[12], m[13]]);
        }
        _ => {
            log::debug!("unsupported transform function '{}'", name);
        }
    }
    true
}

/// Parse a transform function list, left to right
pub fn parse_transform(text: &str, context: &StyleRecord) -> Transform2D {
    let mut transform = Transform2D::default();
    if text.trim().eq_ignore_ascii_case("none") {
        return transform;
    }

    for (name, args) in split_functions(text) {
        let args = split_args(args);
        if !apply_function(&mut transform, name, &args, context) {
            log::warn!("invalid arguments for transform function {}({})", name, args.join(", "));
        }
    }
    transform
}

/// Normalized transform pivot, (0, 0) = top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub x: f32,
    pub y: f32,
}

impl Default for Pivot {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OriginToken {
    Horizontal(f32),
    Vertical(f32),
    Center,
    Fraction(f32),
}

impl OriginToken {
    fn classify(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "left" => Some(OriginToken::Horizontal(0.0)),
            "right" => Some(OriginToken::Horizontal(1.0)),
            "top" => Some(OriginToken::Vertical(0.0)),
            "bottom" => Some(OriginToken::Vertical(1.0)),
            "center" => Some(OriginToken::Center),
            _ => match split_dimension(token)? {
                (p, "%") => Some(OriginToken::Fraction(p / 100.0)),
                (n, "") if n == 0.0 => Some(OriginToken::Fraction(0.0)),
                _ => {
                    log::debug!("transform-origin '{}' cannot be normalized, centering", token);
                    Some(OriginToken::Center)
                }
            },
        }
    }

    fn value(self) -> f32 {
        match self {
            OriginToken::Horizontal(v) | OriginToken::Vertical(v) | OriginToken::Fraction(v) => v,
            OriginToken::Center => 0.5,
        }
    }
}

/// Parse `transform-origin` into a pivot in [0, 1]²
pub fn parse_transform_origin(text: &str) -> Pivot {
    let tokens: SmallVec<[OriginToken; 3]> =
        text.split_whitespace().filter_map(OriginToken::classify).collect();

    let mut pivot = Pivot::default();
    match tokens.as_slice() {
        [] => {}
        [OriginToken::Horizontal(x)] => pivot.x = *x,
        [OriginToken::Vertical(y)] => pivot.y = *y,
        [OriginToken::Center] => {}
        [OriginToken::Fraction(v)] => {
            pivot.x = *v;
            pivot.y = *v;
        }
        [first, second, ..] => {
            let (horizontal, vertical) =
                if matches!(first, OriginToken::Vertical(_)) || matches!(second, OriginToken::Horizontal(_)) {
                    (*second, *first)
                } else {
                    (*first, *second)
                };
            if !matches!(horizontal, OriginToken::Vertical(_)) {
                pivot.x = horizontal.value();
            }
            if !matches!(vertical, OriginToken::Horizontal(_)) {
                pivot.y = vertical.value();
            }
        }
    }
    pivot.x = pivot.x.clamp(0.0, 1.0);
    pivot.y = pivot.y.clamp(0.0, 1.0);
    pivot
}

/// Alignment of an item along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Auto,
    Start,
    Center,
    End,
    Stretch,
}

impl Align {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim().to_ascii_lowercase().as_str() {
            "auto" | "normal" => Some(Align::Auto),
            "start" | "flex-start" | "self-start" | "left" | "top" | "baseline" => Some(Align::Start),
            "center" => Some(Align::Center),
            "end" | "flex-end" | "self-end" | "right" | "bottom" => Some(Align::End),
            "stretch" => Some(Align::Stretch),
            _ => None,
        }
    }
}

/// Per-axis self alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelfAlignment {
    pub horizontal: Align,
    pub vertical: Align,
}

fn align_or_auto(value: Option<&str>) -> Align {
    value
        .map(|v| {
            Align::from_keyword(v).unwrap_or_else(|| {
                log::debug!("unknown self alignment '{}'", v);
                Align::Auto
            })
        })
        .unwrap_or_default()
}

/// Map `justifySelf` / `alignSelf` onto screen axes for the parent's flow direction.
///
/// In row flow `justifySelf` governs the horizontal axis; column flow swaps them.
pub fn parse_self_alignment(
    justify_self: Option<&str>,
    align_self: Option<&str>,
    flex_direction: Option<&str>,
) -> SelfAlignment {
    let justify = align_or_auto(justify_self);
    let align = align_or_auto(align_self);
    let column = flex_direction
        .map(|d| d.trim().to_ascii_lowercase().starts_with("column"))
        .unwrap_or(false);

    if column {
        SelfAlignment { horizontal: align, vertical: justify }
    } else {
        SelfAlignment { horizontal: justify, vertical: align }
    }
}
