//! CSS Stacking Contexts and Painting Order.
//!
//! [§ 9.9 Layered presentation](https://www.w3.org/TR/CSS2/visuren.html#layers)
//!
//! "An element in CSS 2 may have a stack level, which describes its position
//! within a set of elements sharing the same stacking context."
//!
//! [CSS 2.1 Appendix E: Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)

use serde::{Deserialize, Serialize};

use crate::resolve::PositioningMap;
use crate::tree::{LayoutNodeId, LayoutTree};

/// A stacking context in the CSS painting order.
///
/// [§ Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
///
/// "Each box belongs to one stacking context. Each positioned box in a given
/// stacking context has an integer stack level, which is its position on the
/// z-axis relative to other stack levels within the same stacking context."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackingContext {
    /// The node establishing this context.
    pub root: LayoutNodeId,
    /// [§ 9.9.1](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    /// "auto: The stack level of the generated box in the current stacking
    /// context is 0."
    pub stack_level: i32,
    /// Whether the root's transform can be inverted. A context with a
    /// singular transform paints nothing.
    pub renderable: bool,
    /// Child contexts, sorted by stack level with tree order breaking ties.
    pub children: Vec<Self>,
}

impl StackingContext {
    fn new(tree: &LayoutTree, root: LayoutNodeId) -> Self {
        let values = tree.computed_values(root);
        let renderable = !values.has_transform() || values.transformation_matrix().is_invertible();
        Self {
            root,
            stack_level: values.z_index.unwrap_or(0),
            renderable,
            children: Vec::new(),
        }
    }

    /// Number of contexts in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Self::len).sum::<usize>()
    }

    /// Always false; a context counts itself.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// [§ Appendix E Painting order](https://www.w3.org/TR/CSS2/zindex.html)
    ///
    /// "Within each stacking context, the following layers are painted in
    /// back-to-front order:
    ///
    /// 1. the background and borders of the element forming the stacking context.
    /// 2. the child stacking contexts with negative stack levels (most negative first).
    /// ...
    /// 6. the child stacking contexts with stack level 0 and the positioned
    ///    descendants with stack level 0.
    /// 7. the child stacking contexts with positive stack levels (least positive first)."
    ///
    /// Flattened to context roots. Contexts whose transform is not
    /// invertible are skipped together with their descendants.
    pub fn paint_order(&self) -> Vec<LayoutNodeId> {
        let mut order = Vec::new();
        self.append_paint_order(&mut order);
        order
    }

    fn append_paint_order(&self, order: &mut Vec<LayoutNodeId>) {
        if !self.renderable {
            tracing::debug!(root = %self.root, "skipping stacking context with singular transform");
            return;
        }

        // STEP 1: The element forming the stacking context.
        order.push(self.root);

        // STEP 2: Negative stack levels, most negative first.
        for child in self.children.iter().filter(|c| c.stack_level < 0) {
            child.append_paint_order(order);
        }

        // STEP 6: Stack level 0 (and auto) in tree order.
        for child in self.children.iter().filter(|c| c.stack_level == 0) {
            child.append_paint_order(order);
        }

        // STEP 7: Positive stack levels, least positive first.
        for child in self.children.iter().filter(|c| c.stack_level > 0) {
            child.append_paint_order(order);
        }
    }
}

/// Build the stacking context tree from a positioning pass.
///
/// STEP 1: Every node that establishes a stacking context gets one.
/// STEP 2: It is attached under its enclosing stacking context.
/// STEP 3: Children are sorted by stack level.
///   "Boxes with the same stack level in a stacking context are stacked
///   back-to-front according to document tree order."
///
/// Returns `None` if the pass reached no nodes.
pub fn build_stacking_contexts(tree: &LayoutTree, positioning: &PositioningMap) -> Option<StackingContext> {
    // Records come in tree order, so a parent context is always seen before
    // its children.
    let mut contexts: Vec<(Option<usize>, StackingContext)> = Vec::new();
    let mut index_of = std::collections::HashMap::new();
    for (id, record) in positioning.iter() {
        if !record.establishes_stacking_context {
            continue;
        }
        let parent = record
            .stacking_context
            .and_then(|enclosing| index_of.get(&enclosing).copied());
        let _ = index_of.insert(id, contexts.len());
        contexts.push((parent, StackingContext::new(tree, id)));
    }

    // Fold children into parents from the back; tree order is restored by
    // the stable sort below after reversing.
    while let Some((parent, context)) = contexts.pop() {
        match parent {
            Some(parent) => contexts[parent].1.children.push(context),
            None => {
                let mut root = context;
                sort_recursively(&mut root);
                return Some(root);
            }
        }
    }
    None
}

fn sort_recursively(context: &mut StackingContext) {
    context.children.reverse();
    context.children.sort_by_key(|child| child.stack_level);
    for child in &mut context.children {
        sort_recursively(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use crate::resolve::resolve;
    use crate::test_support::{styled, tree_with_viewport};

    #[test]
    fn test_orders_layers_by_stack_level_then_tree_order() {
        let (mut tree, viewport) = tree_with_viewport();
        let positive = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: relative; z-index: 2");
        let first_zero = styled(&mut tree, NodeKind::BlockContainer, "display: block; opacity: 0.5");
        let negative = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: absolute; z-index: -1");
        let second_zero = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: fixed");
        let nested = styled(&mut tree, NodeKind::BlockContainer, "display: block; position: relative; z-index: 5");
        for id in [positive, first_zero, negative, second_zero] {
            tree.append_child(viewport, id).unwrap();
        }
        tree.append_child(first_zero, nested).unwrap();

        let positioning = resolve(&mut tree).unwrap();
        let root = build_stacking_contexts(&tree, &positioning).unwrap();
        assert_eq!(root.root, viewport);
        assert_eq!(root.len(), 6);
        assert_eq!(
            root.paint_order(),
            vec![viewport, negative, first_zero, nested, second_zero, positive]
        );
    }

    #[test]
    fn test_singular_transforms_are_not_painted() {
        let (mut tree, viewport) = tree_with_viewport();
        let flat = styled(&mut tree, NodeKind::BlockContainer, "display: block; transform: scale(0)");
        let inside = styled(&mut tree, NodeKind::BlockContainer, "display: block; opacity: 0");
        let visible = styled(&mut tree, NodeKind::BlockContainer, "display: block; transform: rotate(45deg)");
        tree.append_child(viewport, flat).unwrap();
        tree.append_child(flat, inside).unwrap();
        tree.append_child(viewport, visible).unwrap();

        let positioning = resolve(&mut tree).unwrap();
        let root = build_stacking_contexts(&tree, &positioning).unwrap();
        assert!(!root.children[0].renderable);
        assert_eq!(root.paint_order(), vec![viewport, visible]);
    }
}
