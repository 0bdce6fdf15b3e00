//! The layout tree arena.
//!
//! Nodes live in a generational slab and refer to each other by
//! [`LayoutNodeId`]. A slot's generation bumps when it is reclaimed, so an id
//! held across a rebuild reads as stale instead of aliasing a new node.
//!
//! Parent, sibling and generator links are non-owning; the child list is the
//! only owning edge. [`LayoutTree::collect_garbage`] follows owning edges
//! from the viewport and reclaims everything else.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use trellis_dom::ContentNodeId;
use trellis_style::{ComputedValues, Font, ImageValue};

use crate::error::TreeError;
use crate::node::{LayoutNode, NodeKind, PaintableId, StyleData};

/// Generational handle to a [`LayoutNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayoutNodeId {
    index: u32,
    generation: u32,
}

impl LayoutNodeId {
    /// Slot index, stable for the life of the node.
    pub const fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Display for LayoutNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.index)
    }
}

/// The relation an edge reported by [`LayoutTree::visit_edges`] expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEdge {
    /// Non-owning link to the parent.
    Parent,
    /// Owning link to a child.
    Child,
    /// Non-owning sibling link.
    PreviousSibling,
    /// Non-owning sibling link.
    NextSibling,
}

/// Receives every reference a node holds. Only node edges are mandatory;
/// the rest default to no-ops.
pub trait EdgeVisitor {
    /// A link to another layout node.
    fn visit_node(&mut self, edge: NodeEdge, target: LayoutNodeId);

    /// The originating content node or the pseudo-element generator.
    fn visit_content_node(&mut self, _target: ContentNodeId) {}

    /// The paintable produced from this node.
    fn visit_paintable(&mut self, _paintable: PaintableId) {}

    /// The resolved style snapshot.
    fn visit_style(&mut self, _style: &Rc<ComputedValues>) {}

    /// The resolved font.
    fn visit_font(&mut self, _font: &Rc<Font>) {}

    /// The `list-style-image` value.
    fn visit_image(&mut self, _image: &Rc<ImageValue>) {}
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<LayoutNode>,
    next_free: Option<u32>,
}

/// Arena owning every node of one layout tree.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    slots: Vec<Slot>,
    free_head: Option<u32>,
    len: usize,
    viewport: Option<LayoutNodeId>,
}

impl LayoutTree {
    /// An empty tree with no viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes, attached or not.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no node is live.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn allocate(&mut self, node: LayoutNode) -> LayoutNodeId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            self.free_head = slot.next_free.take();
            slot.node = Some(node);
            return LayoutNodeId {
                index,
                generation: slot.generation,
            };
        }
        let index = u32::try_from(self.slots.len()).unwrap_or_else(|_| panic!("layout arena exhausted"));
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
            next_free: None,
        });
        LayoutNodeId { index, generation: 0 }
    }

    fn deallocate(&mut self, id: LayoutNodeId) -> Option<LayoutNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        slot.next_free = self.free_head;
        self.free_head = Some(id.index);
        self.len -= 1;
        Some(node)
    }

    /// Insert a detached node.
    pub fn create_node(&mut self, node: LayoutNode) -> LayoutNodeId {
        let id = self.allocate(node);
        tracing::trace!(%id, kind = %self.node(id).kind(), "created layout node");
        id
    }

    /// Insert a detached text node.
    pub fn create_text_node(&mut self, dom_node: Option<ContentNodeId>, text: impl Into<String>) -> LayoutNodeId {
        self.create_node(LayoutNode::text(dom_node, text))
    }

    /// Insert a detached styled node.
    pub fn create_styled_node(
        &mut self,
        kind: NodeKind,
        dom_node: Option<ContentNodeId>,
        style: StyleData,
    ) -> LayoutNodeId {
        self.create_node(LayoutNode::with_style(kind, dom_node, style))
    }

    /// Install `id` as the tree root.
    ///
    /// # Panics
    ///
    /// If `id` is not a live, parentless viewport. The root always carries
    /// style; every style query below it ends there.
    pub fn set_viewport(&mut self, id: LayoutNodeId) {
        let node = self.node(id);
        assert!(node.kind().is_viewport(), "layout tree root must be a viewport, got {}", node.kind());
        assert!(node.has_style(), "layout tree root must carry style");
        assert!(node.parent().is_none(), "layout tree root cannot have a parent");
        self.viewport = Some(id);
    }

    /// The root viewport, once installed.
    pub const fn viewport(&self) -> Option<LayoutNodeId> {
        self.viewport
    }

    /// The node, if `id` is still live.
    pub fn get(&self, id: LayoutNodeId) -> Option<&LayoutNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    /// Mutable access, if `id` is still live.
    pub fn get_mut(&mut self, id: LayoutNodeId) -> Option<&mut LayoutNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Whether `id` refers to a live node.
    pub fn contains(&self, id: LayoutNodeId) -> bool {
        self.get(id).is_some()
    }

    /// Checked lookup.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] if the slot was reclaimed.
    pub fn try_node(&self, id: LayoutNodeId) -> Result<&LayoutNode, TreeError> {
        self.get(id).ok_or(TreeError::StaleNode(id))
    }

    /// Lookup of an id the caller knows is live.
    ///
    /// # Panics
    ///
    /// If `id` is stale.
    pub fn node(&self, id: LayoutNodeId) -> &LayoutNode {
        self.get(id)
            .unwrap_or_else(|| panic!("stale layout node id {id:?}"))
    }

    /// Mutable lookup of an id the caller knows is live.
    ///
    /// # Panics
    ///
    /// If `id` is stale.
    pub fn node_mut(&mut self, id: LayoutNodeId) -> &mut LayoutNode {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("stale layout node id {id:?}"))
    }

    /// Live nodes in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutNodeId, &LayoutNode)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let node = slot.node.as_ref()?;
            Some((
                LayoutNodeId {
                    index: u32::try_from(index).ok()?,
                    generation: slot.generation,
                },
                node,
            ))
        })
    }

    // --- structure ---------------------------------------------------------

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// # Errors
    ///
    /// - [`TreeError::StaleNode`] if either id is stale
    /// - [`TreeError::CannotHaveChildren`] for leaf kinds
    /// - [`TreeError::WouldCycle`] if `parent` is `child` or inside it
    pub fn append_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<(), TreeError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or last when
    /// `reference` is `None`.
    ///
    /// # Errors
    ///
    /// As [`Self::append_child`], plus [`TreeError::NotAChild`] when
    /// `reference` is not a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: LayoutNodeId,
        child: LayoutNodeId,
        reference: Option<LayoutNodeId>,
    ) -> Result<(), TreeError> {
        let parent_node = self.try_node(parent)?;
        let _ = self.try_node(child)?;
        if !parent_node.kind().can_have_children() {
            return Err(TreeError::CannotHaveChildren(parent));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(TreeError::WouldCycle { parent, child });
        }
        if let Some(reference) = reference {
            if self.try_node(reference)?.parent() != Some(parent) {
                return Err(TreeError::NotAChild {
                    parent,
                    child: reference,
                });
            }
            if reference == child {
                return Ok(());
            }
        }

        self.detach(child);

        let previous = match reference {
            Some(reference) => self.node(reference).previous_sibling,
            None => self.node(parent).last_child,
        };
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.previous_sibling = previous;
            node.next_sibling = reference;
        }
        match previous {
            Some(previous) => self.node_mut(previous).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        match reference {
            Some(reference) => self.node_mut(reference).previous_sibling = Some(child),
            None => self.node_mut(parent).last_child = Some(child),
        }
        Ok(())
    }

    /// Unlink `child` from `parent`. The child stays live, detached, until
    /// re-inserted or collected.
    ///
    /// # Errors
    ///
    /// [`TreeError::StaleNode`] or [`TreeError::NotAChild`].
    pub fn remove_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Result<(), TreeError> {
        let _ = self.try_node(parent)?;
        if self.try_node(child)?.parent() != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    fn detach(&mut self, child: LayoutNodeId) {
        let node = self.node_mut(child);
        let Some(parent) = node.parent.take() else {
            return;
        };
        let previous = node.previous_sibling.take();
        let next = node.next_sibling.take();
        match previous {
            Some(previous) => self.node_mut(previous).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).previous_sibling = previous,
            None => self.node_mut(parent).last_child = previous,
        }
    }

    /// Children of `id` in order.
    pub fn children(&self, id: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        std::iter::successors(self.node(id).first_child, |&c| self.node(c).next_sibling)
    }

    /// Ancestors of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        std::iter::successors(self.node(id).parent, |&a| self.node(a).parent)
    }

    /// `id` followed by its ancestors.
    pub fn inclusive_ancestors(&self, id: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        std::iter::successors(Some(id), |&a| self.node(a).parent)
    }

    /// Descendants of `id` in pre-order, excluding `id`.
    pub fn descendants(&self, id: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        self.inclusive_descendants(id).skip(1)
    }

    /// `id` and its descendants in pre-order.
    pub fn inclusive_descendants(&self, id: LayoutNodeId) -> impl Iterator<Item = LayoutNodeId> + '_ {
        std::iter::successors(Some(id), move |&current| self.next_in_pre_order(current, id))
    }

    /// Pre-order successor of `current` without leaving the subtree of `stay_within`.
    pub fn next_in_pre_order(&self, current: LayoutNodeId, stay_within: LayoutNodeId) -> Option<LayoutNodeId> {
        if let Some(first) = self.node(current).first_child {
            return Some(first);
        }
        let mut node = current;
        loop {
            if node == stay_within {
                return None;
            }
            let data = self.node(node);
            if let Some(next) = data.next_sibling {
                return Some(next);
            }
            node = data.parent?;
        }
    }

    /// The topmost ancestor of `id` (the viewport, for attached nodes).
    pub fn root(&self, id: LayoutNodeId) -> LayoutNodeId {
        self.inclusive_ancestors(id).last().unwrap_or(id)
    }

    /// Depth below the topmost ancestor; the root is at depth 0.
    pub fn depth(&self, id: LayoutNodeId) -> usize {
        self.ancestors(id).count()
    }

    // --- tracing -----------------------------------------------------------

    /// Report every reference `id` holds to `visitor`.
    pub fn visit_edges(&self, id: LayoutNodeId, visitor: &mut dyn EdgeVisitor) {
        let node = self.node(id);
        if let Some(parent) = node.parent {
            visitor.visit_node(NodeEdge::Parent, parent);
        }
        for child in self.children(id) {
            visitor.visit_node(NodeEdge::Child, child);
        }
        if let Some(previous) = node.previous_sibling {
            visitor.visit_node(NodeEdge::PreviousSibling, previous);
        }
        if let Some(next) = node.next_sibling {
            visitor.visit_node(NodeEdge::NextSibling, next);
        }
        if let Some(dom_node) = node.dom_node() {
            visitor.visit_content_node(dom_node);
        }
        if let Some(generator) = node.pseudo_element_generator() {
            visitor.visit_content_node(generator);
        }
        if let Some(paintable) = node.paintable() {
            visitor.visit_paintable(paintable);
        }
        if let Some(style) = node.style() {
            visitor.visit_style(style.snapshot());
            visitor.visit_font(style.font());
            if let Some(image) = style.list_style_image() {
                visitor.visit_image(image);
            }
        }
    }

    /// Mark from the viewport along owning edges and reclaim every node not
    /// reached. Returns the number of reclaimed nodes.
    #[tracing::instrument(level = "debug", skip(self), fields(live = self.len))]
    pub fn collect_garbage(&mut self) -> usize {
        struct Marker<'a> {
            marked: &'a mut [bool],
            pending: Vec<LayoutNodeId>,
        }

        impl EdgeVisitor for Marker<'_> {
            fn visit_node(&mut self, edge: NodeEdge, target: LayoutNodeId) {
                let seen = &mut self.marked[target.index as usize];
                if edge == NodeEdge::Child && !*seen {
                    *seen = true;
                    self.pending.push(target);
                }
            }
        }

        let mut marked = vec![false; self.slots.len()];
        if let Some(viewport) = self.viewport.filter(|&v| self.contains(v)) {
            marked[viewport.index as usize] = true;
            let mut marker = Marker {
                marked: &mut marked,
                pending: vec![viewport],
            };
            while let Some(id) = marker.pending.pop() {
                self.visit_edges(id, &mut marker);
            }
        } else {
            self.viewport = None;
        }

        let unreachable: Vec<LayoutNodeId> = self
            .iter()
            .filter(|(id, _)| !marked[id.index as usize])
            .map(|(id, _)| id)
            .collect();
        for &id in &unreachable {
            let _ = self.deallocate(id);
        }
        tracing::debug!(reclaimed = unreachable.len(), "collected layout nodes");
        unreachable.len()
    }

    /// Tear down the whole tree. Every outstanding id becomes stale.
    pub fn clear(&mut self) {
        let live: Vec<LayoutNodeId> = self.iter().map(|(id, _)| id).collect();
        for id in live {
            let _ = self.deallocate(id);
        }
        self.viewport = None;
        trellis_common::warning::clear_warnings();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{block, tree_with_viewport};

    #[test]
    fn test_links_stay_consistent() {
        let (mut tree, viewport) = tree_with_viewport();
        let a = block(&mut tree);
        let b = block(&mut tree);
        let c = block(&mut tree);
        tree.append_child(viewport, a).unwrap();
        tree.append_child(viewport, c).unwrap();
        tree.insert_before(viewport, b, Some(c)).unwrap();

        assert_eq!(tree.children(viewport).collect::<Vec<_>>(), vec![a, b, c]);
        assert_eq!(tree.node(b).previous_sibling(), Some(a));
        assert_eq!(tree.node(b).next_sibling(), Some(c));

        tree.remove_child(viewport, b).unwrap();
        assert_eq!(tree.children(viewport).collect::<Vec<_>>(), vec![a, c]);
        assert_eq!(tree.node(a).next_sibling(), Some(c));
        assert_eq!(tree.node(b).parent(), None);
        assert_eq!(
            tree.remove_child(viewport, b),
            Err(TreeError::NotAChild {
                parent: viewport,
                child: b
            })
        );
    }

    #[test]
    fn test_rejects_cycles_and_leaf_parents() {
        let (mut tree, viewport) = tree_with_viewport();
        let a = block(&mut tree);
        let b = block(&mut tree);
        tree.append_child(viewport, a).unwrap();
        tree.append_child(a, b).unwrap();
        assert_eq!(
            tree.append_child(b, a),
            Err(TreeError::WouldCycle { parent: b, child: a })
        );

        let text = tree.create_text_node(None, "x");
        tree.append_child(b, text).unwrap();
        let other = tree.create_text_node(None, "y");
        assert_eq!(tree.append_child(text, other), Err(TreeError::CannotHaveChildren(text)));
    }

    #[test]
    fn test_reparenting_moves_the_node() {
        let (mut tree, viewport) = tree_with_viewport();
        let a = block(&mut tree);
        let b = block(&mut tree);
        let moved = block(&mut tree);
        tree.append_child(viewport, a).unwrap();
        tree.append_child(viewport, b).unwrap();
        tree.append_child(a, moved).unwrap();
        tree.append_child(b, moved).unwrap();
        assert_eq!(tree.children(a).count(), 0);
        assert_eq!(tree.node(moved).parent(), Some(b));
    }

    #[test]
    fn test_pre_order_descendants() {
        let (mut tree, viewport) = tree_with_viewport();
        let a = block(&mut tree);
        let a1 = block(&mut tree);
        let b = block(&mut tree);
        tree.append_child(viewport, a).unwrap();
        tree.append_child(a, a1).unwrap();
        tree.append_child(viewport, b).unwrap();
        assert_eq!(tree.descendants(viewport).collect::<Vec<_>>(), vec![a, a1, b]);
        assert_eq!(tree.descendants(a).collect::<Vec<_>>(), vec![a1]);
        assert_eq!(tree.root(a1), viewport);
        assert_eq!(tree.depth(a1), 2);
    }

    #[test]
    fn test_garbage_collection_reclaims_detached_subtrees() {
        let (mut tree, viewport) = tree_with_viewport();
        let kept = block(&mut tree);
        let dropped = block(&mut tree);
        let dropped_child = block(&mut tree);
        tree.append_child(viewport, kept).unwrap();
        tree.append_child(dropped, dropped_child).unwrap();

        assert_eq!(tree.collect_garbage(), 2);
        assert!(tree.contains(kept));
        assert!(!tree.contains(dropped));
        assert_eq!(tree.try_node(dropped_child).unwrap_err(), TreeError::StaleNode(dropped_child));

        // Reused slots get a fresh generation.
        let fresh = block(&mut tree);
        assert_ne!(fresh, dropped);
        assert!(tree.get(dropped).is_none());
    }

    #[test]
    fn test_clear_invalidates_everything() {
        let (mut tree, viewport) = tree_with_viewport();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.viewport(), None);
        assert!(tree.get(viewport).is_none());
    }
}
