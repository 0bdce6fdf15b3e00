//! The resolver pass over a constructed tree.
//!
//! Phase 1 synthesizes the anonymous boxes the box generation rules require
//! (table wrappers, anonymous blocks around inline runs). Phase 2 walks the
//! finished tree once, top-down, and records each node's containing block
//! and stacking context.
//!
//! Phase 1 mutates the tree in place. If an insertion fails partway, the
//! boxes synthesized before the failure stay in the tree. Both phases skip
//! work that is already done, so running the pass again after a restyle
//! neither re-wraps tables nor nests anonymous blocks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::node::NodeKind;
use crate::tree::{LayoutNodeId, LayoutTree};

/// Positioning facts for one node, as recorded by [`resolve_positioning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPositioning {
    /// Same as [`LayoutTree::containing_block`].
    pub containing_block: Option<LayoutNodeId>,
    /// Same as [`LayoutTree::non_anonymous_containing_block`].
    pub non_anonymous_containing_block: Option<LayoutNodeId>,
    /// Same as [`LayoutTree::enclosing_stacking_context`].
    pub stacking_context: Option<LayoutNodeId>,
    /// Same as [`LayoutTree::establishes_stacking_context`].
    pub establishes_stacking_context: bool,
}

/// Per-node results of one positioning pass.
#[derive(Debug, Clone, Default)]
pub struct PositioningMap {
    entries: HashMap<LayoutNodeId, ResolvedPositioning>,
    order: Vec<LayoutNodeId>,
}

impl PositioningMap {
    /// The record for `id`, if it was reached by the pass.
    pub fn get(&self, id: LayoutNodeId) -> Option<&ResolvedPositioning> {
        self.entries.get(&id)
    }

    /// Number of nodes reached.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the pass reached nothing.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in tree order.
    pub fn iter(&self) -> impl Iterator<Item = (LayoutNodeId, &ResolvedPositioning)> {
        self.order.iter().map(|id| (*id, &self.entries[id]))
    }
}

/// Run both phases.
///
/// # Errors
///
/// Propagates [`TreeError`] from anonymous box insertion, which only fails
/// when the tree handed in is malformed.
#[tracing::instrument(level = "debug", skip(tree))]
pub fn resolve(tree: &mut LayoutTree) -> Result<PositioningMap, TreeError> {
    synthesize_anonymous_boxes(tree)?;
    Ok(resolve_positioning(tree))
}

/// Phase 1: table wrappers, then anonymous blocks.
///
/// # Errors
///
/// As [`resolve`].
#[tracing::instrument(level = "debug", skip(tree))]
pub fn synthesize_anonymous_boxes(tree: &mut LayoutTree) -> Result<(), TreeError> {
    let Some(viewport) = tree.viewport() else {
        return Ok(());
    };

    // STEP 1: Wrap every table box in an anonymous table wrapper.
    let tables: Vec<LayoutNodeId> = tree
        .inclusive_descendants(viewport)
        .filter(|&id| needs_table_wrapper(tree, id))
        .collect();
    for table in tables {
        wrap_table(tree, table)?;
    }

    // STEP 2: In block containers with both inline-level and block-level
    //         children, wrap each run of inline-level children in an
    //         anonymous block.
    let containers: Vec<LayoutNodeId> = tree
        .inclusive_descendants(viewport)
        .filter(|&id| tree.node(id).kind().is_block_container())
        .collect();
    for container in containers {
        wrap_inline_runs(tree, container)?;
    }
    Ok(())
}

fn needs_table_wrapper(tree: &LayoutTree, id: LayoutNodeId) -> bool {
    let node = tree.node(id);
    node.kind() == NodeKind::Box
        && tree.display(id).is_table_inside()
        && !tree.has_transferred_to_wrapper(id)
        && node
            .parent()
            .is_some_and(|parent| !tree.node(parent).kind().is_table_wrapper())
}

/// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
///
/// "In both cases, the table generates a principal block container box
/// called the table wrapper box that contains the table box itself and any
/// caption boxes."
fn wrap_table(tree: &mut LayoutTree, table: LayoutNodeId) -> Result<(), TreeError> {
    let Some(parent) = tree.node(table).parent() else {
        return Ok(());
    };
    let wrapper = tree.create_anonymous_wrapper_of_kind(table, NodeKind::TableWrapper);
    tree.insert_before(parent, wrapper, Some(table))?;
    tree.append_child(wrapper, table)?;
    tree.transfer_table_box_computed_values_to_wrapper_computed_values(table, wrapper);

    // The wrapper takes the table's place as a flex/grid item.
    let table_node = tree.node_mut(table);
    let (flex, grid) = (table_node.is_flex_item(), table_node.is_grid_item());
    table_node.set_flex_item(false);
    table_node.set_grid_item(false);
    let wrapper_node = tree.node_mut(wrapper);
    wrapper_node.set_flex_item(flex);
    wrapper_node.set_grid_item(grid);
    wrapper_node.set_children_are_inline(false);

    tracing::trace!(%table, %wrapper, "wrapped table box");
    Ok(())
}

/// Children that take part in the container's line or block layout. List
/// markers are placed by their list item and floats and absolutely
/// positioned boxes are out of flow.
fn participates_in_flow(tree: &LayoutTree, child: LayoutNodeId) -> bool {
    !tree.node(child).kind().is_list_item_marker_box() && !tree.is_out_of_flow(child)
}

/// Whether every in-flow child of `id` is inline-level. A node without
/// in-flow children does not have inline children.
pub(crate) fn compute_children_are_inline(tree: &LayoutTree, id: LayoutNodeId) -> bool {
    let mut in_flow = tree
        .children(id)
        .filter(|&child| participates_in_flow(tree, child))
        .peekable();
    in_flow.peek().is_some() && in_flow.all(|child| tree.is_inline(child))
}

/// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
///
/// "if a block container box has a block-level box inside it, then we force
/// it to have only block-level boxes inside it."
fn wrap_inline_runs(tree: &mut LayoutTree, container: LayoutNodeId) -> Result<(), TreeError> {
    let children: Vec<LayoutNodeId> = tree.children(container).collect();
    let in_flow: Vec<LayoutNodeId> = children
        .iter()
        .copied()
        .filter(|&child| participates_in_flow(tree, child))
        .collect();
    let has_inline = in_flow.iter().any(|&child| tree.is_inline(child));
    let has_block = in_flow.iter().any(|&child| !tree.is_inline(child));
    if !(has_inline && has_block) {
        let children_are_inline = compute_children_are_inline(tree, container);
        tree.node_mut(container).set_children_are_inline(children_are_inline);
        return Ok(());
    }

    let mut runs: Vec<Vec<LayoutNodeId>> = Vec::new();
    let mut current: Vec<LayoutNodeId> = Vec::new();
    for child in children {
        if participates_in_flow(tree, child) && tree.is_inline(child) {
            current.push(child);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    for run in runs {
        let wrapper = tree.create_anonymous_wrapper(container);
        tree.insert_before(container, wrapper, Some(run[0]))?;
        for child in run {
            tree.append_child(wrapper, child)?;
        }
        tree.node_mut(wrapper).set_children_are_inline(true);
        tracing::trace!(%container, %wrapper, "wrapped inline run in anonymous block");
    }
    let children_are_inline = compute_children_are_inline(tree, container);
    tree.node_mut(container).set_children_are_inline(children_are_inline);
    Ok(())
}

/// Containing-block candidates inherited from the ancestors of a node.
#[derive(Debug, Clone, Copy)]
struct Candidates {
    /// Nearest ancestor that can form a containing block.
    in_flow: Option<LayoutNodeId>,
    /// Nearest ancestor that can contain absolutely positioned boxes.
    absolute: Option<LayoutNodeId>,
    /// Nearest ancestor that establishes a stacking context.
    stacking: Option<LayoutNodeId>,
}

/// Phase 2: one top-down traversal assigning containing blocks and
/// stacking contexts.
///
/// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// Each node either inherits its parent's candidate per positioning scheme
/// or becomes the candidate itself. The nearest qualifying ancestor wins;
/// the viewport is the fixed candidate.
#[tracing::instrument(level = "debug", skip(tree))]
pub fn resolve_positioning(tree: &LayoutTree) -> PositioningMap {
    let mut map = PositioningMap::default();
    let Some(viewport) = tree.viewport() else {
        return map;
    };

    // Nearest containing-block-capable strict ancestor of every visited node,
    // for climbing out of anonymous absolute containers.
    let mut capable_ancestor: HashMap<LayoutNodeId, Option<LayoutNodeId>> = HashMap::new();
    let mut stack = vec![(
        viewport,
        Candidates {
            in_flow: None,
            absolute: None,
            stacking: None,
        },
    )];

    while let Some((id, inherited)) = stack.pop() {
        let node = tree.node(id);
        let _ = capable_ancestor.insert(id, inherited.in_flow);

        // STEP 1: This node's containing block, from the inherited candidates.
        let containing_block = if id == viewport {
            None
        } else if node.kind().is_text_node() {
            inherited.in_flow
        } else if tree.is_fixed_position(id) {
            Some(viewport)
        } else if tree.is_absolutely_positioned(id) {
            let mut ancestor = inherited.absolute;
            while let Some(candidate) = ancestor.filter(|&a| tree.node(a).is_anonymous()) {
                ancestor = capable_ancestor[&candidate];
            }
            ancestor
        } else {
            inherited.in_flow
        };

        // STEP 2: Skip anonymous containing blocks through their own records.
        let non_anonymous_containing_block = match containing_block {
            Some(cb) if tree.node(cb).is_anonymous() => map
                .get(cb)
                .and_then(|record| record.non_anonymous_containing_block),
            other => other,
        };

        let establishes_stacking_context = tree.establishes_stacking_context(id);
        let _ = map.entries.insert(
            id,
            ResolvedPositioning {
                containing_block,
                non_anonymous_containing_block,
                stacking_context: inherited.stacking,
                establishes_stacking_context,
            },
        );
        map.order.push(id);

        // STEP 3: Push this node as a candidate for the schemes it qualifies for.
        let for_children = Candidates {
            in_flow: if tree.can_form_containing_block(id) {
                Some(id)
            } else {
                inherited.in_flow
            },
            absolute: if tree.can_contain_boxes_with_position_absolute(id) {
                Some(id)
            } else {
                inherited.absolute
            },
            stacking: if establishes_stacking_context {
                Some(id)
            } else {
                inherited.stacking
            },
        };
        let children: Vec<LayoutNodeId> = tree.children(id).collect();
        // Reverse so the first child is visited first.
        stack.extend(children.into_iter().rev().map(|child| (child, for_children)));
    }

    tracing::debug!(nodes = map.len(), "resolved positioning");
    map
}
