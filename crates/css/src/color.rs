//! Color Value Parser
//!
//! Parses CSS color text (named colors, hex, rgb(), hsl()) into RGBA and
//! gamma-decodes it into linear space for the renderer.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::{CssError, CssResult};

/// Gamma-encoded color with 8-bit channels and a unit alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in [0, 1]
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 1.0 };
    pub const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 1.0 };
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// Build from floating point channels, rounding and clamping each
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: channel_u8(r),
            g: channel_u8(g),
            b: channel_u8(b),
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Gamma-decode into linear space
    pub fn to_linear(&self) -> LinearRgba {
        LinearRgba::from_rgba(*self)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

/// Linear-space color, every channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearRgba {
    pub fn from_rgba(color: Rgba) -> Self {
        Self {
            r: SRGB_TO_LINEAR[color.r as usize],
            g: SRGB_TO_LINEAR[color.g as usize],
            b: SRGB_TO_LINEAR[color.b as usize],
            a: color.a,
        }
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Rgba::BLACK.to_linear()
    }
}

fn channel_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// sRGB to linear lookup, indexed by the 8-bit encoded channel value.
#[rustfmt::skip]
pub static SRGB_TO_LINEAR: [f32; 256] = [
    0.0, 0.0003035, 0.0006071, 0.0009106, 0.0012141, 0.0015176, 0.0018212, 0.0021247,
    0.0024282, 0.0027317, 0.0030353, 0.0033465, 0.0036765, 0.0040247, 0.0043914, 0.004777,
    0.0051815, 0.0056054, 0.0060488, 0.0065121, 0.0069954, 0.007499, 0.0080232, 0.0085681,
    0.0091341, 0.0097212, 0.0103298, 0.0109601, 0.0116122, 0.0122865, 0.012983, 0.0137021,
    0.0144438, 0.0152085, 0.0159963, 0.0168074, 0.017642, 0.0185002, 0.0193824, 0.0202886,
    0.021219, 0.0221739, 0.0231534, 0.0241576, 0.0251869, 0.0262412, 0.0273209, 0.028426,
    0.0295568, 0.0307134, 0.031896, 0.0331048, 0.0343398, 0.0356013, 0.0368895, 0.0382044,
    0.0395462, 0.0409152, 0.0423114, 0.043735, 0.0451862, 0.0466651, 0.0481718, 0.0497066,
    0.0512695, 0.0528606, 0.0544803, 0.0561285, 0.0578054, 0.0595112, 0.0612461, 0.06301,
    0.0648033, 0.0666259, 0.0684782, 0.0703601, 0.0722719, 0.0742136, 0.0761854, 0.0781874,
    0.0802198, 0.0822827, 0.0843762, 0.0865005, 0.0886556, 0.0908417, 0.093059, 0.0953075,
    0.0975873, 0.0998987, 0.1022417, 0.1046165, 0.1070231, 0.1094617, 0.1119324, 0.1144354,
    0.1169707, 0.1195384, 0.1221388, 0.1247718, 0.1274377, 0.1301365, 0.1328683, 0.1356333,
    0.1384316, 0.1412633, 0.1441285, 0.1470273, 0.1499598, 0.1529262, 0.1559265, 0.1589608,
    0.1620294, 0.1651322, 0.1682694, 0.1714411, 0.1746474, 0.1778884, 0.1811642, 0.184475,
    0.1878208, 0.1912017, 0.1946178, 0.1980693, 0.2015563, 0.2050787, 0.2086369, 0.2122308,
    0.2158605, 0.2195262, 0.223228, 0.2269659, 0.23074, 0.2345506, 0.2383976, 0.2422811,
    0.2462013, 0.2501583, 0.2541521, 0.2581829, 0.2622507, 0.2663556, 0.2704978, 0.2746773,
    0.2788943, 0.2831487, 0.2874408, 0.2917706, 0.2961383, 0.3005438, 0.3049873, 0.3094689,
    0.3139887, 0.3185468, 0.3231432, 0.3277781, 0.3324515, 0.3371636, 0.3419144, 0.3467041,
    0.3515326, 0.3564001, 0.3613068, 0.3662526, 0.3712377, 0.3762621, 0.381326, 0.3864294,
    0.3915725, 0.3967552, 0.4019778, 0.4072402, 0.4125426, 0.4178851, 0.4232677, 0.4286905,
    0.4341536, 0.4396572, 0.4452012, 0.4507858, 0.456411, 0.462077, 0.4677838, 0.4735315,
    0.4793202, 0.4851499, 0.4910208, 0.496933, 0.5028865, 0.5088813, 0.5149177, 0.5209956,
    0.5271151, 0.5332764, 0.5394795, 0.5457245, 0.5520114, 0.5583404, 0.5647115, 0.5711248,
    0.5775804, 0.5840784, 0.5906188, 0.5972018, 0.6038273, 0.6104956, 0.6172066, 0.6239604,
    0.6307571, 0.6375969, 0.6444797, 0.6514056, 0.6583748, 0.6653873, 0.6724432, 0.6795425,
    0.6866853, 0.6938718, 0.7011019, 0.7083758, 0.7156935, 0.7230551, 0.7304607, 0.7379104,
    0.7454042, 0.7529422, 0.7605245, 0.7681511, 0.7758222, 0.7835378, 0.7912979, 0.7991027,
    0.8069523, 0.8148466, 0.8227858, 0.8307699, 0.838799, 0.8468732, 0.8549926, 0.8631572,
    0.8713671, 0.8796224, 0.8879231, 0.8962694, 0.9046612, 0.9130987, 0.9215819, 0.9301109,
    0.9386857, 0.9473065, 0.9559734, 0.9646862, 0.9734453, 0.9822506, 0.9911021, 1.0,
];

/// Parse a color, falling back to opaque black on failure
pub fn parse_color(text: &str) -> Rgba {
    if text.trim().eq_ignore_ascii_case("currentcolor") {
        log::warn!("currentcolor is not resolved, using black");
        return Rgba::BLACK;
    }
    match try_parse_color(text) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("{}, using black", e);
            Rgba::BLACK
        }
    }
}

/// Parse a color straight into linear space
pub fn parse_to_linear_color(text: &str) -> LinearRgba {
    parse_color(text).to_linear()
}

/// Whether `text` is accepted by the color grammar
pub fn is_color(text: &str) -> bool {
    try_parse_color(text).is_ok()
}

/// Parse a color, reporting failures
pub fn try_parse_color(text: &str) -> CssResult<Rgba> {
    let trimmed = text.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower == "currentcolor" {
        return Ok(Rgba::BLACK);
    }

    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| CssError::invalid_color(trimmed));
    }

    if let Some(open) = lower.find('(') {
        if !lower.ends_with(')') {
            return Err(CssError::invalid_color(trimmed));
        }
        let name = lower[..open].trim();
        let args = &lower[open + 1..lower.len() - 1];
        let parsed = match name {
            "rgb" | "rgba" => parse_rgb_args(args),
            "hsl" | "hsla" => parse_hsl_args(args),
            _ => None,
        };
        return parsed.ok_or_else(|| CssError::invalid_color(trimmed));
    }

    NAMED_COLORS
        .get(lower.as_str())
        .copied()
        .ok_or_else(|| CssError::invalid_color(trimmed))
}

/// Parse hex digits (without '#')
fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let short = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba::rgb(short(0)?, short(1)?, short(2)?)),
        4 => Some(Rgba::rgba(short(0)?, short(1)?, short(2)?, short(3)? as f32 / 255.0)),
        6 => Some(Rgba::rgb(long(0)?, long(2)?, long(4)?)),
        8 => Some(Rgba::rgba(long(0)?, long(2)?, long(4)?, long(6)? as f32 / 255.0)),
        _ => None,
    }
}

/// Split functional-notation arguments into channel tokens and an optional alpha token.
///
/// Accepts `a, b, c[, alpha]` and `a b c[ / alpha]`.
fn split_color_args(args: &str) -> Option<(Vec<&str>, Option<&str>)> {
    let (channels, slash_alpha) = match args.split_once('/') {
        Some((head, alpha)) => (head, Some(alpha.trim())),
        None => (args, None),
    };

    let mut parts: Vec<&str> = if channels.contains(',') {
        channels.split(',').map(str::trim).collect()
    } else {
        channels.split_whitespace().collect()
    };
    parts.retain(|p| !p.is_empty());

    match (parts.len(), slash_alpha) {
        (3, alpha) => Some((parts, alpha)),
        (4, None) => {
            let alpha = parts.pop();
            Some((parts, alpha))
        }
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let (channels, alpha) = split_color_args(args)?;
    let r = parse_rgb_channel(channels[0])?;
    let g = parse_rgb_channel(channels[1])?;
    let b = parse_rgb_channel(channels[2])?;
    let a = match alpha {
        Some(token) => parse_alpha(token)?,
        None => 1.0,
    };
    Some(Rgba::from_f32(r, g, b, a))
}

/// Channel value in 0..255 space: integers as-is, percentages scaled
fn parse_rgb_channel(token: &str) -> Option<f32> {
    if let Some(pct) = token.strip_suffix('%') {
        let p: f32 = pct.trim().parse().ok()?;
        return Some((p / 100.0 * 255.0).clamp(0.0, 255.0));
    }
    let n: f32 = token.parse().ok()?;
    Some(n.clamp(0.0, 255.0))
}

/// Alpha as a percentage or a 0-1 float, clamped
fn parse_alpha(token: &str) -> Option<f32> {
    if let Some(pct) = token.strip_suffix('%') {
        let p: f32 = pct.trim().parse().ok()?;
        return Some((p / 100.0).clamp(0.0, 1.0));
    }
    let n: f32 = token.parse().ok()?;
    Some(n.clamp(0.0, 1.0))
}

fn parse_hsl_args(args: &str) -> Option<Rgba> {
    let (channels, alpha) = split_color_args(args)?;
    let h = parse_hue(channels[0])?;
    let s = parse_unit_fraction(channels[1])?;
    let l = parse_unit_fraction(channels[2])?;
    let a = match alpha {
        Some(token) => parse_alpha(token)?,
        None => 1.0,
    };
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Some(Rgba::from_f32(r * 255.0, g * 255.0, b * 255.0, a))
}

/// Hue in degrees; accepts deg, rad, grad and turn units
fn parse_hue(token: &str) -> Option<f32> {
    let (number, scale) = if let Some(n) = token.strip_suffix("deg") {
        (n, 1.0)
    } else if let Some(n) = token.strip_suffix("grad") {
        (n, 0.9)
    } else if let Some(n) = token.strip_suffix("rad") {
        (n, 180.0 / std::f32::consts::PI)
    } else if let Some(n) = token.strip_suffix("turn") {
        (n, 360.0)
    } else {
        (token, 1.0)
    };
    number.trim().parse::<f32>().ok().map(|n| n * scale)
}

/// Saturation / lightness: "50%" or a bare 0-100 number, as a fraction
fn parse_unit_fraction(token: &str) -> Option<f32> {
    let number = token.strip_suffix('%').unwrap_or(token);
    number.trim().parse::<f32>().ok().map(|n| n / 100.0)
}

/// Convert HSL to RGB (all components in 0..1)
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
    let g = hue_to_rgb(p, q, h);
    let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

    (r, g, b)
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

/// Named CSS colors
static NAMED_COLORS: LazyLock<FxHashMap<&'static str, Rgba>> = LazyLock::new(|| {
    let mut m = FxHashMap::default();
    for &(name, r, g, b) in NAMED_COLOR_TABLE {
        m.insert(name, Rgba::rgb(r, g, b));
    }
    m.insert("transparent", Rgba::TRANSPARENT);
    m
});

#[rustfmt::skip]
const NAMED_COLOR_TABLE: &[(&str, u8, u8, u8)] = &[
    ("aliceblue", 240, 248, 255),
    ("antiquewhite", 250, 235, 215),
    ("aqua", 0, 255, 255),
    ("aquamarine", 127, 255, 212),
    ("azure", 240, 255, 255),
    ("beige", 245, 245, 220),
    ("bisque", 255, 228, 196),
    ("black", 0, 0, 0),
    ("blanchedalmond", 255, 235, 205),
    ("blue", 0, 0, 255),
    ("blueviolet", 138, 43, 226),
    ("brown", 165, 42, 42),
    ("burlywood", 222, 184, 135),
    ("cadetblue", 95, 158, 160),
    ("chartreuse", 127, 255, 0),
    ("chocolate", 210, 105, 30),
    ("coral", 255, 127, 80),
    ("cornflowerblue", 100, 149, 237),
    ("cornsilk", 255, 248, 220),
    ("crimson", 220, 20, 60),
    ("cyan", 0, 255, 255),
    ("darkblue", 0, 0, 139),
    ("darkcyan", 0, 139, 139),
    ("darkgoldenrod", 184, 134, 11),
    ("darkgray", 169, 169, 169),
    ("darkgreen", 0, 100, 0),
    ("darkgrey", 169, 169, 169),
    ("darkkhaki", 189, 183, 107),
    ("darkmagenta", 139, 0, 139),
    ("darkolivegreen", 85, 107, 47),
    ("darkorange", 255, 140, 0),
    ("darkorchid", 153, 50, 204),
    ("darkred", 139, 0, 0),
    ("darksalmon", 233, 150, 122),
    ("darkseagreen", 143, 188, 143),
    ("darkslateblue", 72, 61, 139),
    ("darkslategray", 47, 79, 79),
    ("darkslategrey", 47, 79, 79),
    ("darkturquoise", 0, 206, 209),
    ("darkviolet", 148, 0, 211),
    ("deeppink", 255, 20, 147),
    ("deepskyblue", 0, 191, 255),
    ("dimgray", 105, 105, 105),
    ("dimgrey", 105, 105, 105),
    ("dodgerblue", 30, 144, 255),
    ("firebrick", 178, 34, 34),
    ("floralwhite", 255, 250, 240),
    ("forestgreen", 34, 139, 34),
    ("fuchsia", 255, 0, 255),
    ("gainsboro", 220, 220, 220),
    ("ghostwhite", 248, 248, 255),
    ("gold", 255, 215, 0),
    ("goldenrod", 218, 165, 32),
    ("gray", 128, 128, 128),
    ("green", 0, 128, 0),
    ("greenyellow", 173, 255, 47),
    ("grey", 128, 128, 128),
    ("honeydew", 240, 255, 240),
    ("hotpink", 255, 105, 180),
    ("indianred", 205, 92, 92),
    ("indigo", 75, 0, 130),
    ("ivory", 255, 255, 240),
    ("khaki", 240, 230, 140),
    ("lavender", 230, 230, 250),
    ("lavenderblush", 255, 240, 245),
    ("lawngreen", 124, 252, 0),
    ("lemonchiffon", 255, 250, 205),
    ("lightblue", 173, 216, 230),
    ("lightcoral", 240, 128, 128),
    ("lightcyan", 224, 255, 255),
    ("lightgoldenrodyellow", 250, 250, 210),
    ("lightgray", 211, 211, 211),
    ("lightgreen", 144, 238, 144),
    ("lightgrey", 211, 211, 211),
    ("lightpink", 255, 182, 193),
    ("lightsalmon", 255, 160, 122),
    ("lightseagreen", 32, 178, 170),
    ("lightskyblue", 135, 206, 250),
    ("lightslategray", 119, 136, 153),
    ("lightslategrey", 119, 136, 153),
    ("lightsteelblue", 176, 196, 222),
    ("lightyellow", 255, 255, 224),
    ("lime", 0, 255, 0),
    ("limegreen", 50, 205, 50),
    ("linen", 250, 240, 230),
    ("magenta", 255, 0, 255),
    ("maroon", 128, 0, 0),
    ("mediumaquamarine", 102, 205, 170),
    ("mediumblue", 0, 0, 205),
    ("mediumorchid", 186, 85, 211),
    ("mediumpurple", 147, 112, 219),
    ("mediumseagreen", 60, 179, 113),
    ("mediumslateblue", 123, 104, 238),
    ("mediumspringgreen", 0, 250, 154),
    ("mediumturquoise", 72, 209, 204),
    ("mediumvioletred", 199, 21, 133),
    ("midnightblue", 25, 25, 112),
    ("mintcream", 245, 255, 250),
    ("mistyrose", 255, 228, 225),
    ("moccasin", 255, 228, 181),
    ("navajowhite", 255, 222, 173),
    ("navy", 0, 0, 128),
    ("oldlace", 253, 245, 230),
    ("olive", 128, 128, 0),
    ("olivedrab", 107, 142, 35),
    ("orange", 255, 165, 0),
    ("orangered", 255, 69, 0),
    ("orchid", 218, 112, 214),
    ("palegoldenrod", 238, 232, 170),
    ("palegreen", 152, 251, 152),
    ("paleturquoise", 175, 238, 238),
    ("palevioletred", 219, 112, 147),
    ("papayawhip", 255, 239, 213),
    ("peachpuff", 255, 218, 185),
    ("peru", 205, 133, 63),
    ("pink", 255, 192, 203),
    ("plum", 221, 160, 221),
    ("powderblue", 176, 224, 230),
    ("purple", 128, 0, 128),
    ("rebeccapurple", 102, 51, 153),
    ("red", 255, 0, 0),
    ("rosybrown", 188, 143, 143),
    ("royalblue", 65, 105, 225),
    ("saddlebrown", 139, 69, 19),
    ("salmon", 250, 128, 114),
    ("sandybrown", 244, 164, 96),
    ("seagreen", 46, 139, 87),
    ("seashell", 255, 245, 238),
    ("sienna", 160, 82, 45),
    ("silver", 192, 192, 192),
    ("skyblue", 135, 206, 235),
    ("slateblue", 106, 90, 205),
    ("slategray", 112, 128, 144),
    ("slategrey", 112, 128, 144),
    ("snow", 255, 250, 250),
    ("springgreen", 0, 255, 127),
    ("steelblue", 70, 130, 180),
    ("tan", 210, 180, 140),
    ("teal", 0, 128, 128),
    ("thistle", 216, 191, 216),
    ("tomato", 255, 99, 71),
    ("turquoise", 64, 224, 208),
    ("violet", 238, 130, 238),
    ("wheat", 245, 222, 179),
    ("white", 255, 255, 255),
    ("whitesmoke", 245, 245, 245),
    ("yellow", 255, 255, 0),
    ("yellowgreen", 154, 205, 50),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#ff0000"), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_color("#F00"), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_color("#abc"), Rgba::rgb(0xaa, 0xbb, 0xcc));

        let c = parse_color("#ff000080");
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
        assert!(approx(c.a, 128.0 / 255.0));

        let c = parse_color("#0f08");
        assert_eq!((c.r, c.g, c.b), (0, 255, 0));
        assert!(approx(c.a, 136.0 / 255.0));
    }

    #[test]
    fn test_invalid_hex_is_black() {
        assert_eq!(parse_color("#ggg"), Rgba::BLACK);
        assert_eq!(parse_color("#12345"), Rgba::BLACK);
        assert!(try_parse_color("#12345").is_err());
    }

    #[test]
    fn test_rgb_functions() {
        assert_eq!(parse_color("rgb(50%,50%,50%)"), Rgba::rgb(128, 128, 128));
        assert_eq!(parse_color("rgb(10, 20, 30)"), Rgba::rgb(10, 20, 30));
        assert_eq!(parse_color("rgb(10 20 30)"), Rgba::rgb(10, 20, 30));
        assert_eq!(parse_color("rgb(300, -4, 0)"), Rgba::rgb(255, 0, 0));

        let c = parse_color("rgba(255, 0, 0, 0.5)");
        assert_eq!((c.r, c.a), (255, 0.5));
        let c = parse_color("rgb(255 0 0 / 25%)");
        assert_eq!((c.r, c.a), (255, 0.25));
        let c = parse_color("rgba(0, 0, 0, 4)");
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_rgb_wrong_arity_is_error() {
        assert!(try_parse_color("rgb(1, 2)").is_err());
        assert!(try_parse_color("rgb(1, 2, 3, 4, 5)").is_err());
        assert!(try_parse_color("rgb(1, 2, 3").is_err());
    }

    #[test]
    fn test_hsl() {
        assert_eq!(parse_color("hsl(0, 100%, 50%)"), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_color("hsl(120deg 100% 50%)"), Rgba::rgb(0, 255, 0));
        assert_eq!(parse_color("hsl(-120, 100%, 50%)"), Rgba::rgb(0, 0, 255));
        assert_eq!(parse_color("hsl(0.5turn, 100%, 50%)"), Rgba::rgb(0, 255, 255));
        let c = parse_color("hsla(0, 0%, 100%, 0.3)");
        assert_eq!((c.r, c.g, c.b), (255, 255, 255));
        assert!(approx(c.a, 0.3));
    }

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("red"), Rgba::rgb(255, 0, 0));
        assert_eq!(parse_color("RebeccaPurple"), Rgba::rgb(102, 51, 153));
        assert_eq!(parse_color("transparent"), Rgba::TRANSPARENT);
        assert!(NAMED_COLORS.len() >= 140);
    }

    #[test]
    fn test_unknown_and_currentcolor_are_black() {
        assert_eq!(parse_color("not-a-color"), Rgba::BLACK);
        assert_eq!(parse_color("currentColor"), Rgba::BLACK);
        assert!(!is_color("10px"));
        assert!(is_color("navy"));
    }

    struct WarnCounter;

    thread_local! {
        static WARNINGS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
    }

    impl log::Log for WarnCounter {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if record.level() == log::Level::Warn {
                WARNINGS.with(|w| w.set(w.get() + 1));
            }
        }

        fn flush(&self) {}
    }

    static WARN_COUNTER: WarnCounter = WarnCounter;

    fn warnings() -> usize {
        let _ = log::set_logger(&WARN_COUNTER);
        log::set_max_level(log::LevelFilter::Warn);
        WARNINGS.with(|w| w.get())
    }

    #[test]
    fn test_currentcolor_warns_only_when_resolved() {
        let before = warnings();
        assert!(is_color("currentColor"));
        assert_eq!(try_parse_color("currentcolor"), Ok(Rgba::BLACK));
        assert_eq!(warnings(), before);

        assert_eq!(parse_color("currentcolor"), Rgba::BLACK);
        assert_eq!(warnings(), before + 1);
    }

    #[test]
    fn test_linear_table_shape() {
        assert_eq!(SRGB_TO_LINEAR[0], 0.0);
        assert_eq!(SRGB_TO_LINEAR[255], 1.0);
        assert!(SRGB_TO_LINEAR.windows(2).all(|w| w[0] < w[1]));
        assert!(approx(SRGB_TO_LINEAR[128], 0.2158605));
    }

    #[test]
    fn test_linear_color() {
        let white = parse_to_linear_color("#ffffff");
        assert_eq!(white, LinearRgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 });

        let c = parse_to_linear_color("rgba(128, 0, 255, 0.5)");
        assert!(approx(c.r, 0.2158605));
        assert_eq!(c.g, 0.0);
        assert_eq!(c.b, 1.0);
        assert_eq!(c.a, 0.5);
    }
}
