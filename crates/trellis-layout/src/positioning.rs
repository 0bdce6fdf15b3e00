//! Positioning schemes, containing blocks and stacking-context triggers.
//!
//! Every query here is a pure function of the tree shape and the nodes'
//! current computed values. Nothing is cached; the resolver pass in
//! [`crate::resolve`] computes the same answers in one traversal.

use trellis_dom::ContentTree;
use trellis_style::values::{Float, Isolation, Position};

use crate::tree::{LayoutNodeId, LayoutTree};

impl LayoutTree {
    fn own_position(&self, id: LayoutNodeId) -> Option<Position> {
        self.node(id)
            .style()
            .map(|style| style.computed_values().position)
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// Absolutely positioned boxes do not float: "if 'position' has the value
    /// 'absolute' or 'fixed', the box is absolutely positioned, the computed
    /// value of 'float' is 'none'".
    pub fn is_floating(&self, id: LayoutNodeId) -> bool {
        self.node(id).style().is_some_and(|style| {
            let values = style.computed_values();
            !matches!(values.position, Position::Absolute | Position::Fixed) && values.float != Float::None
        })
    }

    /// [§ 3 position](https://www.w3.org/TR/css-position-3/#position-property)
    ///
    /// "A positioned box is a box whose computed value of position is not
    /// static." Only a node's own style counts; text is never positioned.
    pub fn is_positioned(&self, id: LayoutNodeId) -> bool {
        self.own_position(id)
            .is_some_and(|position| position != Position::Static)
    }

    /// `position: absolute` or `position: fixed`.
    pub fn is_absolutely_positioned(&self, id: LayoutNodeId) -> bool {
        self.own_position(id)
            .is_some_and(|position| matches!(position, Position::Absolute | Position::Fixed))
    }

    /// `position: fixed`.
    pub fn is_fixed_position(&self, id: LayoutNodeId) -> bool {
        self.own_position(id) == Some(Position::Fixed)
    }

    /// [§ 9.3 Positioning schemes](https://www.w3.org/TR/CSS2/visuren.html#positioning-scheme)
    ///
    /// "An element is called out of flow if it is floated, absolutely
    /// positioned, or is the root element."
    pub fn is_out_of_flow(&self, id: LayoutNodeId) -> bool {
        self.is_absolutely_positioned(id) || self.is_floating(id)
    }

    /// Whether `id` is backed by the document element.
    pub fn is_root_element(&self, id: LayoutNodeId, content: &ContentTree) -> bool {
        let dom_node = self.node(id).dom_node();
        dom_node.is_some() && dom_node == content.document_element()
    }

    /// [§ 2.1 Containing Blocks of Positioned Boxes](https://www.w3.org/TR/css-position-3/#def-cb)
    ///
    /// "If the box has position: absolute: The containing block is
    /// established by the nearest ancestor box that establishes an
    /// absolute positioning containing block". Positioned boxes, the
    /// viewport, and transformed boxes do.
    pub fn can_contain_boxes_with_position_absolute(&self, id: LayoutNodeId) -> bool {
        let node = self.node(id);
        node.style().is_some_and(|style| {
            let values = style.computed_values();
            values.position != Position::Static || node.kind().is_viewport() || values.has_transform()
        })
    }

    /// Boxes that can establish a containing block for in-flow descendants:
    /// block containers, flex and grid containers, and the outer `<svg>`.
    pub fn can_form_containing_block(&self, id: LayoutNodeId) -> bool {
        let kind = self.node(id).kind();
        if kind.is_block_container() || kind.is_svg_svg_box() {
            return true;
        }
        let display = self.display(id);
        kind.is_box() && (display.is_flex_inside() || display.is_grid_inside())
    }

    fn nearest_ancestor_capable_of_forming_a_containing_block(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        self.ancestors(id).find(|&a| self.can_form_containing_block(a))
    }

    /// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// The box this node's position and percentages resolve against:
    ///
    /// - `static`/`relative`/`sticky` (and text): the nearest block container
    ///   or flex/grid container ancestor
    /// - `absolute`: the nearest ancestor that can contain absolutely
    ///   positioned boxes; if that is anonymous, the containing block is
    ///   formed by its nearest capable ancestor instead
    /// - `fixed`: the viewport
    ///
    /// The viewport has none.
    ///
    /// # Panics
    ///
    /// If a node other than the viewport is detached.
    pub fn containing_block(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        let node = self.node(id);
        if node.parent().is_none() {
            assert!(
                node.kind().is_viewport(),
                "containing block requested for detached {} node {id:?}",
                node.kind()
            );
            return None;
        }

        if node.kind().is_text_node() {
            return self.nearest_ancestor_capable_of_forming_a_containing_block(id);
        }

        match self.computed_values(id).position {
            Position::Absolute => {
                let mut ancestor = self
                    .ancestors(id)
                    .find(|&a| self.can_contain_boxes_with_position_absolute(a));
                while let Some(candidate) = ancestor.filter(|&a| self.node(a).is_anonymous()) {
                    ancestor = self.nearest_ancestor_capable_of_forming_a_containing_block(candidate);
                }
                ancestor
            }
            Position::Fixed => Some(self.root(id)),
            Position::Static | Position::Relative | Position::Sticky => {
                self.nearest_ancestor_capable_of_forming_a_containing_block(id)
            }
        }
    }

    /// The containing block with anonymous boxes skipped, used when resolving
    /// percentages against content-backed boxes.
    ///
    /// # Panics
    ///
    /// As [`Self::containing_block`].
    pub fn non_anonymous_containing_block(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        let mut containing_block = self.containing_block(id)?;
        while self.node(containing_block).is_anonymous() {
            containing_block = self.containing_block(containing_block)?;
        }
        Some(containing_block)
    }

    /// [§ 9.9.1 Specifying the stack level](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    /// and [Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
    ///
    /// A node establishes a stacking context when it:
    ///
    /// - is the viewport (the root stacking context)
    /// - is `absolute` or `relative` with a non-auto `z-index`
    /// - is `fixed` or `sticky`
    /// - has a transform
    /// - is a flex or grid item with a non-auto `z-index`
    /// - has `isolation: isolate`
    /// - has opacity below 1
    ///
    /// Text never does.
    pub fn establishes_stacking_context(&self, id: LayoutNodeId) -> bool {
        let node = self.node(id);
        let Some(style) = node.style() else {
            return false;
        };
        if node.kind().is_viewport() {
            return true;
        }
        let values = style.computed_values();
        let has_z_index = values.z_index.is_some();

        if matches!(values.position, Position::Absolute | Position::Relative) && has_z_index {
            return true;
        }
        if matches!(values.position, Position::Fixed | Position::Sticky) {
            return true;
        }
        if values.has_transform() {
            return true;
        }

        // [§ 4.3 Z-Ordering](https://www.w3.org/TR/css-flexbox-1/#painting)
        // "Flex items paint exactly the same as inline blocks, except that
        // ... z-index values other than auto create a stacking context even
        // if position is static."
        if has_z_index
            && node.parent().is_some_and(|parent| {
                let display = self.display(parent);
                display.is_flex_inside() || display.is_grid_inside()
            })
        {
            return true;
        }

        values.isolation == Isolation::Isolate || values.opacity < 1.0
    }

    /// The stacking context `id` paints in: its nearest ancestor that
    /// establishes one. `None` for the viewport and detached roots.
    pub fn enclosing_stacking_context(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        self.ancestors(id)
            .find(|&a| self.establishes_stacking_context(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::test_support::{styled, tree_with_viewport};

    #[test]
    fn test_positioning_predicates() {
        let (mut tree, viewport) = tree_with_viewport();
        let abs = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: absolute; float: left");
        let float = styled(&mut tree, NodeKind::BlockContainer, "display: block; float: right");
        let fixed = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: fixed");
        let text = tree.create_text_node(None, "t");
        for id in [abs, float, fixed] {
            tree.append_child(viewport, id).unwrap();
        }
        tree.append_child(float, text).unwrap();

        assert!(tree.is_absolutely_positioned(abs));
        assert!(!tree.is_floating(abs));
        assert!(tree.is_floating(float));
        assert!(tree.is_out_of_flow(float));
        assert!(tree.is_fixed_position(fixed));
        assert!(tree.is_positioned(fixed));
        assert!(!tree.is_positioned(text));
        assert!(!tree.is_floating(text));
    }

    #[test]
    fn test_absolute_skips_static_ancestors() {
        let (mut tree, viewport) = tree_with_viewport();
        let relative = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: relative");
        let plain = styled(&mut tree, NodeKind::BlockContainer, "display: block");
        let abs = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: absolute");
        let normal = styled(&mut tree, NodeKind::BlockContainer, "display: block");
        tree.append_child(viewport, relative).unwrap();
        tree.append_child(relative, plain).unwrap();
        tree.append_child(plain, abs).unwrap();
        tree.append_child(plain, normal).unwrap();

        assert_eq!(tree.containing_block(abs), Some(relative));
        assert_eq!(tree.containing_block(normal), Some(plain));
        assert_eq!(tree.containing_block(viewport), None);
    }

    #[test]
    fn test_inline_parents_are_not_containing_blocks() {
        let (mut tree, viewport) = tree_with_viewport();
        let block = styled(&mut tree, NodeKind::BlockContainer, "display: block");
        let inline = styled(&mut tree, NodeKind::InlineNode, "display: inline");
        let text = tree.create_text_node(None, "t");
        tree.append_child(viewport, block).unwrap();
        tree.append_child(block, inline).unwrap();
        tree.append_child(inline, text).unwrap();
        assert_eq!(tree.containing_block(text), Some(block));
        assert_eq!(tree.containing_block(inline), Some(block));
    }

    #[test]
    fn test_transformed_ancestor_contains_absolute_boxes() {
        let (mut tree, viewport) = tree_with_viewport();
        let transformed = styled(&mut tree, NodeKind::BlockContainer, "display: block; transform: scale(2)");
        let abs = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: absolute");
        tree.append_child(viewport, transformed).unwrap();
        tree.append_child(transformed, abs).unwrap();
        assert_eq!(tree.containing_block(abs), Some(transformed));
        assert!(tree.establishes_stacking_context(transformed));
    }

    #[test]
    fn test_fixed_uses_the_viewport() {
        let (mut tree, viewport) = tree_with_viewport();
        let relative = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: relative");
        let fixed = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: fixed");
        tree.append_child(viewport, relative).unwrap();
        tree.append_child(relative, fixed).unwrap();
        assert_eq!(tree.containing_block(fixed), Some(viewport));
    }

    #[test]
    fn test_anonymous_blocks_are_skipped_for_percentages() {
        let (mut tree, viewport) = tree_with_viewport();
        let block = styled(&mut tree, NodeKind::BlockContainer, "display: block");
        tree.append_child(viewport, block).unwrap();
        let anonymous = tree.create_anonymous_wrapper(block);
        tree.append_child(block, anonymous).unwrap();
        let text = tree.create_text_node(None, "t");
        tree.append_child(anonymous, text).unwrap();

        assert_eq!(tree.containing_block(text), Some(anonymous));
        assert_eq!(tree.non_anonymous_containing_block(text), Some(block));
    }

    #[test]
    #[should_panic(expected = "detached")]
    fn test_detached_node_has_no_containing_block() {
        let (mut tree, _) = tree_with_viewport();
        let block = styled(&mut tree, NodeKind::BlockContainer, "display: block");
        let _ = tree.containing_block(block);
    }

    #[test]
    fn test_stacking_context_triggers() {
        let (mut tree, viewport) = tree_with_viewport();
        let cases = [
            ("display: block; position: relative; z-index: 1", true),
            ("display: block; position: relative", false),
            ("display: block; z-index: 3", false),
            ("display: block; position: sticky", true),
            ("display: block; opacity: 0.5", true),
            ("display: block; isolation: isolate", true),
            ("display: block", false),
        ];
        for (declarations, expected) in cases {
            let id = styled(&mut tree, NodeKind::BlockContainer, declarations);
            tree.append_child(viewport, id).unwrap();
            assert_eq!(tree.establishes_stacking_context(id), expected, "{declarations}");
        }
        assert!(tree.establishes_stacking_context(viewport));

        let flex = styled(&mut tree, NodeKind::Box, "display: flex");
        let item = styled(&mut tree, NodeKind::BlockContainer, "display: block; z-index: 0");
        tree.append_child(viewport, flex).unwrap();
        tree.append_child(flex, item).unwrap();
        assert!(tree.establishes_stacking_context(item));
        assert_eq!(tree.enclosing_stacking_context(item), Some(viewport));
    }
}
