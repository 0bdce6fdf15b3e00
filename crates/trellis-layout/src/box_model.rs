//! CSS Box Model metrics.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::{Deserialize, Serialize};
use trellis_style::ComputedValues;
use trellis_style::values::Sides;

/// A rectangle positioned in 2D space, in CSS pixels.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Whether `(x, y)` lies inside, counting the top and left edges.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl PixelPoint {
    /// Component-wise sum.
    #[must_use]
    pub fn translated_by(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// Edge sizes for padding, border, margin or insets.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    #[allow(clippy::cast_possible_truncation)]
    fn from_sides(sides: &Sides<f64>) -> Self {
        Self {
            top: sides.top as f32,
            right: sides.right as f32,
            bottom: sides.bottom as f32,
            left: sides.left as f32,
        }
    }

    /// `left + right`
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// `top + bottom`
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Per-node margin/border/padding/inset distances plus the content box once
/// measurement has placed it.
///
/// Pure data: the measurement pass writes it, painting and hit-testing read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxModelMetrics {
    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    pub margin: EdgeSizes,
    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    pub border: EdgeSizes,
    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    pub padding: EdgeSizes,
    /// [§ 3.1 Box Insets](https://www.w3.org/TR/css-position-3/#insets)
    pub inset: EdgeSizes,
    offset: PixelPoint,
    content_size: Option<(f32, f32)>,
}

impl BoxModelMetrics {
    /// Seed margin, border, padding and insets from computed values.
    ///
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    /// "The percentage is calculated with respect to the width of the
    /// generated box's containing block." This holds for vertical margins
    /// and padding as well. `auto` resolves to 0 here; the measurement pass
    /// owns the real auto-margin arithmetic.
    pub fn resolve_edges(&mut self, values: &ComputedValues, containing_block_width: f32) {
        let reference = f64::from(containing_block_width);
        self.margin = EdgeSizes::from_sides(&values.margin.map(|m| m.to_px(reference)));
        self.padding = EdgeSizes::from_sides(&values.padding.map(|p| p.to_px(reference)));
        self.border = EdgeSizes::from_sides(&values.border_width);
        self.inset = EdgeSizes::from_sides(&values.inset.map(|i| i.to_px(reference)));
    }

    /// Offset of the content box from its containing block's content box.
    pub const fn offset(&self) -> PixelPoint {
        self.offset
    }

    /// Set by the measurement pass.
    pub const fn set_offset(&mut self, x: f32, y: f32) {
        self.offset = PixelPoint { x, y };
    }

    /// Content width and height, once measurement has resolved them.
    pub const fn content_size(&self) -> Option<(f32, f32)> {
        self.content_size
    }

    /// Set by the measurement pass.
    pub const fn set_content_size(&mut self, width: f32, height: f32) {
        self.content_size = Some((width, height));
    }

    /// Forget the measured content size (e.g. before relayout).
    pub const fn clear_content_size(&mut self) {
        self.content_size = None;
    }

    // [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
    //
    // "Each box has a content area and optional surrounding padding, border,
    // and margin areas... These areas are determined by their respective edges."
    //
    // The boxes from innermost to outermost:
    //   1. Content box  - the actual content (text, images, etc.)
    //   2. Padding box  - content + padding
    //   3. Border box   - content + padding + border
    //   4. Margin box   - content + padding + border + margin (outermost)

    /// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
    /// "The content box contains the actual content of the element."
    ///
    /// Relative to the containing block; `None` until measured.
    pub fn content_box(&self) -> Option<Rect> {
        let (width, height) = self.content_size?;
        Some(Rect {
            x: self.offset.x,
            y: self.offset.y,
            width,
            height,
        })
    }

    /// [§ 3.2 Padding](https://www.w3.org/TR/css-box-3/#paddings)
    ///
    /// "The padding box contains both the content and padding areas."
    pub fn padding_box(&self) -> Option<Rect> {
        self.content_box().map(|content| expand(content, &self.padding))
    }

    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    pub fn border_box(&self) -> Option<Rect> {
        self.padding_box().map(|padding| expand(padding, &self.border))
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    ///
    /// ```text
    /// x = content.x - padding.left - border.left - margin.left
    /// width = content.width + padding.h + border.h + margin.h
    /// ```
    pub fn margin_box(&self) -> Option<Rect> {
        self.border_box().map(|border| expand(border, &self.margin))
    }
}

fn expand(rect: Rect, edges: &EdgeSizes) -> Rect {
    Rect {
        x: rect.x - edges.left,
        y: rect.y - edges.top,
        width: rect.width + edges.horizontal(),
        height: rect.height + edges.vertical(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxes_expand_outward() {
        let mut metrics = BoxModelMetrics::default();
        assert_eq!(metrics.margin_box(), None);

        metrics.padding = EdgeSizes {
            top: 1.0,
            right: 1.0,
            bottom: 1.0,
            left: 1.0,
        };
        metrics.border = EdgeSizes {
            top: 2.0,
            right: 2.0,
            bottom: 2.0,
            left: 2.0,
        };
        metrics.margin = EdgeSizes {
            top: 0.0,
            right: 4.0,
            bottom: 0.0,
            left: 4.0,
        };
        metrics.set_offset(10.0, 10.0);
        metrics.set_content_size(100.0, 50.0);

        let border = metrics.border_box().unwrap();
        assert_eq!((border.x, border.y, border.width, border.height), (7.0, 7.0, 106.0, 56.0));
        let margin = metrics.margin_box().unwrap();
        assert_eq!((margin.x, margin.width), (3.0, 114.0));
        assert!(margin.contains(3.0, 7.0));
        assert!(!margin.contains(117.0, 7.0));
    }

    #[test]
    fn test_edges_from_computed_values() {
        let mut values = ComputedValues::initial();
        values.apply_declarations("margin: 10% 5px; padding-top: 2px; border-width: 3px; left: 7px");
        let mut metrics = BoxModelMetrics::default();
        metrics.resolve_edges(&values, 200.0);
        assert_eq!(metrics.margin.top, 20.0);
        assert_eq!(metrics.margin.left, 5.0);
        assert_eq!(metrics.padding.top, 2.0);
        assert_eq!(metrics.border.right, 3.0);
        assert_eq!(metrics.inset.left, 7.0);
        assert_eq!(metrics.inset.top, 0.0);
    }
}
