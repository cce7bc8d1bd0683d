//! Box Model Expander
//!
//! Expands margin/padding/border-width style shorthands into four-sided boxes.

use smallvec::SmallVec;

use crate::length::convert_length;
use crate::value::{StyleRecord, StyleValue};

/// Four-sided box in consumer order (left, top, right, bottom)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EdgeBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Build from CSS authoring order (top, right, bottom, left)
    pub fn from_css_order([top, right, bottom, left]: [f32; 4]) -> Self {
        Self { left, top, right, bottom }
    }
}

/// Expand 0-4 shorthand values into [top, right, bottom, left]
pub fn expand(values: &[f32]) -> [f32; 4] {
    match *values {
        [] => [0.0; 4],
        [all] => [all; 4],
        [vertical, horizontal] => [vertical, horizontal, vertical, horizontal],
        [top, horizontal, bottom] => [top, horizontal, bottom, horizontal],
        [top, right, bottom, left] => [top, right, bottom, left],
        [top, right, bottom, left, ..] => {
            log::debug!("box shorthand has {} values, using the first four", values.len());
            [top, right, bottom, left]
        }
    }
}

/// Split a shorthand value into its components, in pixels
fn shorthand_values(value: &StyleValue, context: &StyleRecord) -> SmallVec<[f32; 4]> {
    match value {
        StyleValue::Number(n) => SmallVec::from_slice(&[*n]),
        StyleValue::String(s) => s
            .split_whitespace()
            .map(|part| convert_length(&StyleValue::String(part.to_string()), context, None, None))
            .collect(),
        _ => SmallVec::new(),
    }
}

/// Resolve a shorthand plus its per-side longhands.
///
/// Explicit sides override the expanded shorthand. Returns `None` when the
/// style carries neither, in which case nothing should be applied.
pub fn convert_box(
    style: &StyleRecord,
    shorthand: &str,
    top: &str,
    right: &str,
    bottom: &str,
    left: &str,
) -> Option<EdgeBox> {
    let base = style.get(shorthand);
    let sides = [style.get(top), style.get(right), style.get(bottom), style.get(left)];

    if base.is_none() && sides.iter().all(Option::is_none) {
        return None;
    }

    let mut values = base
        .map(|v| expand(&shorthand_values(v, style)))
        .unwrap_or([0.0; 4]);

    for (slot, side) in values.iter_mut().zip(sides) {
        if let Some(side) = side {
            *slot = convert_length(side, style, None, None);
        }
    }

    Some(EdgeBox::from_css_order(values))
}

/// Spacing between children on each axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gap {
    /// Column gap
    pub x: f32,
    /// Row gap
    pub y: f32,
}

/// Resolve `gap` ("row column" or a single value) with `rowGap`/`columnGap` overrides
pub fn resolve_gap(style: &StyleRecord) -> Option<Gap> {
    let shorthand = style.get("gap");
    let row = style.get("rowGap");
    let column = style.get("columnGap");

    if shorthand.is_none() && row.is_none() && column.is_none() {
        return None;
    }

    let mut gap = Gap::default();
    if let Some(value) = shorthand {
        let values = shorthand_values(value, style);
        match values.as_slice() {
            [] => {}
            [both] => {
                gap.x = *both;
                gap.y = *both;
            }
            [row_gap, column_gap, ..] => {
                gap.x = *column_gap;
                gap.y = *row_gap;
            }
        }
    }
    if let Some(row) = row {
        gap.y = convert_length(row, style, None, None);
    }
    if let Some(column) = column {
        gap.x = convert_length(column, style, None, None);
    }
    Some(gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margin(style: &StyleRecord) -> Option<EdgeBox> {
        convert_box(style, "margin", "marginTop", "marginRight", "marginBottom", "marginLeft")
    }

    #[test]
    fn test_expand_table() {
        assert_eq!(expand(&[]), [0.0; 4]);
        assert_eq!(expand(&[4.0]), [4.0, 4.0, 4.0, 4.0]);
        assert_eq!(expand(&[4.0, 8.0]), [4.0, 8.0, 4.0, 8.0]);
        assert_eq!(expand(&[1.0, 2.0, 3.0]), [1.0, 2.0, 3.0, 2.0]);
        assert_eq!(expand(&[1.0, 2.0, 3.0, 4.0]), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(expand(&[1.0, 2.0, 3.0, 4.0, 5.0]), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_convert_box_absent() {
        assert_eq!(margin(&StyleRecord::new().with("color", "red")), None);
    }

    #[test]
    fn test_convert_box_reorders_to_left_top_right_bottom() {
        let style = StyleRecord::new().with("margin", "1px 2px 3px 4px");
        assert_eq!(margin(&style), Some(EdgeBox::new(4.0, 1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_convert_box_side_overrides() {
        let style = StyleRecord::new()
            .with("margin", "10px 20px")
            .with("marginLeft", 5.0);
        assert_eq!(margin(&style), Some(EdgeBox::new(5.0, 10.0, 20.0, 10.0)));

        let style = StyleRecord::new().with("marginTop", "2em");
        assert_eq!(margin(&style), Some(EdgeBox::new(0.0, 32.0, 0.0, 0.0)));
    }

    #[test]
    fn test_convert_box_numeric_shorthand() {
        let style = StyleRecord::new().with("padding", 6.0);
        let padding = convert_box(&style, "padding", "paddingTop", "paddingRight", "paddingBottom", "paddingLeft");
        assert_eq!(padding, Some(EdgeBox::uniform(6.0)));
    }

    #[test]
    fn test_gap() {
        assert_eq!(resolve_gap(&StyleRecord::new()), None);
        assert_eq!(
            resolve_gap(&StyleRecord::new().with("gap", "8px")),
            Some(Gap { x: 8.0, y: 8.0 })
        );
        assert_eq!(
            resolve_gap(&StyleRecord::new().with("gap", "4px 12px")),
            Some(Gap { x: 12.0, y: 4.0 })
        );
        assert_eq!(
            resolve_gap(&StyleRecord::new().with("gap", "4px 12px").with("rowGap", 1.0)),
            Some(Gap { x: 12.0, y: 1.0 })
        );
    }
}
