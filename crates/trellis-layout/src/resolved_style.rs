//! Resolved style queries over layout nodes.
//!
//! [CSSOM § 9 Resolved Values](https://drafts.csswg.org/cssom/#resolved-values)
//!
//! "getComputedStyle() was historically defined to return the 'computed
//! value' of an element or pseudo-element. However, the concept of
//! 'computed value' changed between revisions of CSS while the
//! implementation of getComputedStyle() had to remain the same for
//! compatibility with deployed scripts."
//!
//! A [`ResolvedStyle`] is the read-only declaration that query returns. It
//! reads the node's working computed values, so table boxes report the
//! values left after the wrapper transfer.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use trellis_dom::ContentNodeId;
use trellis_geometry::serialize_number;
use trellis_style::ComputedValues;
use trellis_style::values::LengthPercentage;

use crate::error::ResolvedStyleError;
use crate::tree::{LayoutNodeId, LayoutTree};

/// Properties a [`ResolvedStyle`] can serialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PropertyId {
    /// `display`
    Display,
    /// `position`
    Position,
    /// `float`
    Float,
    /// `clear`
    Clear,
    /// `top`
    Top,
    /// `right`
    Right,
    /// `bottom`
    Bottom,
    /// `left`
    Left,
    /// `margin` shorthand
    Margin,
    /// `margin-top`
    MarginTop,
    /// `margin-right`
    MarginRight,
    /// `margin-bottom`
    MarginBottom,
    /// `margin-left`
    MarginLeft,
    /// `padding` shorthand
    Padding,
    /// `padding-top`
    PaddingTop,
    /// `padding-right`
    PaddingRight,
    /// `padding-bottom`
    PaddingBottom,
    /// `padding-left`
    PaddingLeft,
    /// `border-width` shorthand
    BorderWidth,
    /// `width`
    Width,
    /// `height`
    Height,
    /// `min-width`
    MinWidth,
    /// `min-height`
    MinHeight,
    /// `max-width`
    MaxWidth,
    /// `max-height`
    MaxHeight,
    /// `z-index`
    ZIndex,
    /// `opacity`
    Opacity,
    /// `transform`
    Transform,
    /// `isolation`
    Isolation,
    /// `visibility`
    Visibility,
    /// `font-family`
    FontFamily,
    /// `font-size`
    FontSize,
    /// `font-weight`
    FontWeight,
    /// `line-height`
    LineHeight,
}

/// Read-only resolved style declaration for one layout node.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedStyle<'a> {
    tree: &'a LayoutTree,
    node: Option<LayoutNodeId>,
}

impl<'a> ResolvedStyle<'a> {
    /// Declaration over `node`'s style. `None` models an element without a
    /// layout node; every read then fails with
    /// [`ResolvedStyleError::NoLayoutNode`].
    pub const fn new(tree: &'a LayoutTree, node: Option<LayoutNodeId>) -> Self {
        Self { tree, node }
    }

    /// Declaration for the layout node generated by `element`, if any.
    pub fn for_element(tree: &'a LayoutTree, element: ContentNodeId) -> Self {
        let node = tree
            .viewport()
            .into_iter()
            .flat_map(|viewport| tree.inclusive_descendants(viewport))
            .find(|&id| {
                let node = tree.node(id);
                node.dom_node() == Some(element) && node.has_style()
            });
        Self::new(tree, node)
    }

    /// The layout node this declaration reads.
    pub const fn node(&self) -> Option<LayoutNodeId> {
        self.node
    }

    /// Resolved declarations do not enumerate their properties.
    pub const fn length(&self) -> usize {
        0
    }

    /// Always empty.
    pub const fn css_text(&self) -> &'static str {
        ""
    }

    /// [CSSOM § 6.6](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-getpropertyvalue)
    ///
    /// Unknown property names serialize as the empty string.
    ///
    /// # Errors
    ///
    /// As [`Self::property_value`].
    pub fn get_property_value(&self, name: &str) -> Result<String, ResolvedStyleError> {
        match name.trim().parse::<PropertyId>() {
            Ok(property) => self.property_value(property),
            Err(_) => Ok(String::new()),
        }
    }

    /// The resolved value of `property`, serialized.
    ///
    /// # Errors
    ///
    /// - [`ResolvedStyleError::NoLayoutNode`] if there is no node
    /// - [`ResolvedStyleError::Geometry`] if the transform matrix has
    ///   non-finite components
    pub fn property_value(&self, property: PropertyId) -> Result<String, ResolvedStyleError> {
        let node = self.node.ok_or(ResolvedStyleError::NoLayoutNode)?;
        let values = self.tree.computed_values(node);
        Ok(match property {
            PropertyId::Display => values.display.to_css().to_string(),
            PropertyId::Position => values.position.to_string(),
            PropertyId::Float => values.float.to_string(),
            PropertyId::Clear => values.clear.to_string(),
            PropertyId::Isolation => values.isolation.to_string(),
            PropertyId::Visibility => values.visibility.to_string(),

            PropertyId::Top => values.inset.top.to_css(),
            PropertyId::Right => values.inset.right.to_css(),
            PropertyId::Bottom => values.inset.bottom.to_css(),
            PropertyId::Left => values.inset.left.to_css(),

            // [CSSOM § 6.7.2 Serializing CSS Values]
            // Sided shorthands use the fewest components that round-trip.
            PropertyId::Margin => values.margin.to_css_with(|m| m.to_css()),
            PropertyId::MarginTop => values.margin.top.to_css(),
            PropertyId::MarginRight => values.margin.right.to_css(),
            PropertyId::MarginBottom => values.margin.bottom.to_css(),
            PropertyId::MarginLeft => values.margin.left.to_css(),
            PropertyId::Padding => values.padding.to_css_with(LengthPercentage::to_css),
            PropertyId::PaddingTop => values.padding.top.to_css(),
            PropertyId::PaddingRight => values.padding.right.to_css(),
            PropertyId::PaddingBottom => values.padding.bottom.to_css(),
            PropertyId::PaddingLeft => values.padding.left.to_css(),
            PropertyId::BorderWidth => values.border_width.to_css_with(|w| px(*w)),

            PropertyId::Width => values.width.to_css(),
            PropertyId::Height => values.height.to_css(),
            PropertyId::MinWidth => values.min_width.to_css(),
            PropertyId::MinHeight => values.min_height.to_css(),
            PropertyId::MaxWidth => values.max_width.to_css(),
            PropertyId::MaxHeight => values.max_height.to_css(),

            PropertyId::ZIndex => values
                .z_index
                .map_or_else(|| "auto".to_string(), |z| z.to_string()),
            PropertyId::Opacity => values.opacity.to_string(),
            PropertyId::Transform => serialize_transform(values)?,

            PropertyId::FontFamily => values.font.family.clone(),
            PropertyId::FontSize => px(values.font.size),
            PropertyId::FontWeight => values.font.weight.to_string(),
            PropertyId::LineHeight => px(self.tree.line_height(node)),
        })
    }

    /// [CSSOM § 6.6](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-setproperty)
    ///
    /// # Errors
    ///
    /// Always [`ResolvedStyleError::NoModificationAllowed`].
    pub const fn set_property(&self, _name: &str, _value: &str, _priority: &str) -> Result<(), ResolvedStyleError> {
        Err(ResolvedStyleError::NoModificationAllowed)
    }

    /// # Errors
    ///
    /// Always [`ResolvedStyleError::NoModificationAllowed`].
    pub const fn remove_property(&self, _name: &str) -> Result<String, ResolvedStyleError> {
        Err(ResolvedStyleError::NoModificationAllowed)
    }

    /// # Errors
    ///
    /// Always [`ResolvedStyleError::NoModificationAllowed`].
    pub const fn set_css_text(&self, _text: &str) -> Result<(), ResolvedStyleError> {
        Err(ResolvedStyleError::NoModificationAllowed)
    }
}

fn px(value: f64) -> String {
    format!("{}px", serialize_number(value))
}

/// [§ 7.1 Serialization of the computed value of transform](https://drafts.csswg.org/css-transforms-2/#serialization-of-the-computed-value)
///
/// "none" or the composed matrix as `matrix()` / `matrix3d()`.
fn serialize_transform(values: &ComputedValues) -> Result<String, ResolvedStyleError> {
    if !values.has_transform() {
        return Ok("none".to_string());
    }
    Ok(values.transformation_matrix().to_css_string()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::test_support::{styled, tree_with_viewport};

    #[test]
    fn test_sided_shorthands_collapse() {
        let (mut tree, viewport) = tree_with_viewport();
        let cases = [
            ("margin: 1px", "1px"),
            ("margin: 1px 2px", "1px 2px"),
            ("margin: 1px 2px 3px", "1px 2px 3px"),
            ("margin: 1px 2px 1px 4px", "1px 2px 1px 4px"),
            ("margin: 1px auto", "1px auto"),
        ];
        for (declarations, expected) in cases {
            let id = styled(&mut tree, NodeKind::BlockContainer, declarations);
            tree.append_child(viewport, id).unwrap();
            let style = ResolvedStyle::new(&tree, Some(id));
            assert_eq!(style.property_value(PropertyId::Margin).unwrap(), expected, "{declarations}");
        }
    }

    #[test]
    fn test_transform_serializes_as_matrix() {
        let (mut tree, _) = tree_with_viewport();
        let id = styled(&mut tree, NodeKind::BlockContainer, "transform: translate(10px, 20px) scale(2)");
        let plain = styled(&mut tree, NodeKind::BlockContainer, "display: block");
        assert_eq!(
            ResolvedStyle::new(&tree, Some(id)).get_property_value("transform").unwrap(),
            "matrix(2, 0, 0, 2, 10, 20)"
        );
        assert_eq!(
            ResolvedStyle::new(&tree, Some(plain)).get_property_value("transform").unwrap(),
            "none"
        );
    }

    #[test]
    fn test_declaration_is_read_only() {
        let (tree, viewport) = tree_with_viewport();
        let style = ResolvedStyle::new(&tree, Some(viewport));
        assert_eq!(style.length(), 0);
        assert_eq!(style.css_text(), "");
        assert_eq!(
            style.set_property("color", "red", ""),
            Err(ResolvedStyleError::NoModificationAllowed)
        );
        assert_eq!(style.remove_property("color"), Err(ResolvedStyleError::NoModificationAllowed));
        assert_eq!(style.set_css_text("x: y"), Err(ResolvedStyleError::NoModificationAllowed));
        assert_eq!(style.get_property_value("no-such-thing").unwrap(), "");
        assert_eq!(style.get_property_value("Z-Index").unwrap(), "auto");
        assert_eq!(style.get_property_value("opacity").unwrap(), "1");
        assert_eq!(style.get_property_value("line-height").unwrap(), "19.2px");

        let missing = ResolvedStyle::new(&tree, None);
        assert_eq!(
            missing.property_value(PropertyId::Display),
            Err(ResolvedStyleError::NoLayoutNode)
        );
    }
}
