//! The Trellis layout tree.
//!
//! # Scope
//!
//! This crate implements:
//! - **Layout nodes** ([CSS Display Level 3](https://www.w3.org/TR/css-display-3/))
//!   - Closed set of node kinds with O(1) classification ([`NodeKind`], [`NodeKind::fast_is`])
//!   - Nodes with style, and nodes with style and box model metrics
//!   - Style, font and line height delegation to the nearest styled ancestor
//!
//! - **Tree storage**
//!   - Generational arena ([`LayoutTree`], [`LayoutNodeId`])
//!   - Edge visiting and mark-and-sweep collection from the viewport
//!
//! - **Box generation** ([CSS 2.1 § 9.2](https://www.w3.org/TR/CSS2/visuren.html#box-gen))
//!   - Tree construction from a content tree ([`TreeBuilder`])
//!   - `::before`/`::after` boxes and list item markers
//!   - Anonymous table wrappers and anonymous block boxes ([`resolve`])
//!
//! - **Positioning** ([CSS Positioned Layout Level 3](https://www.w3.org/TR/css-position-3/))
//!   - Containing blocks, per positioning scheme
//!   - Stacking contexts and paint order ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!
//! - **Resolved style** ([CSSOM § 9](https://drafts.csswg.org/cssom/#resolved-values))
//!
//! # Not Yet Implemented
//!
//! - Measurement (block, inline, flex, grid, table layout)
//! - Table-internal boxes (rows, cells, captions)

/// Box model metrics per [CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/).
pub mod box_model;
/// Tree construction from a content tree.
pub mod builder;
/// Per-pass configuration.
pub mod config;
/// Debug descriptions and serializable dumps.
pub mod dump;
mod error;
/// Node kinds and node data.
pub mod node;
mod positioning;
/// Anonymous box synthesis and the positioning pass.
pub mod resolve;
/// Read-only resolved style declarations.
pub mod resolved_style;
/// Stacking contexts per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod stacking;
mod styled;
/// The node arena.
pub mod tree;

pub use box_model::{BoxModelMetrics, EdgeSizes, PixelPoint, Rect};
pub use builder::TreeBuilder;
pub use config::LayoutConfig;
pub use dump::{DumpNode, dump_tree, render_text};
pub use error::{ResolvedStyleError, TreeError};
pub use node::{GeneratedFor, LayoutNode, NodeClass, NodeKind, PaintableId, SelectionState, StyleData, class};
pub use resolve::{PositioningMap, ResolvedPositioning, resolve, resolve_positioning, synthesize_anonymous_boxes};
pub use resolved_style::{PropertyId, ResolvedStyle};
pub use stacking::{StackingContext, build_stacking_contexts};
pub use tree::{EdgeVisitor, LayoutNodeId, LayoutTree, NodeEdge};

#[cfg(test)]
mod test_support {
    use std::rc::Rc;

    use trellis_dom::ContentNodeId;
    use trellis_style::{ComputedValues, Display, ScaledFontCache};

    use crate::node::{NodeKind, StyleData};
    use crate::tree::{LayoutNodeId, LayoutTree};

    pub fn style(declarations: &str) -> StyleData {
        let mut values = ComputedValues::initial();
        values.apply_declarations(declarations);
        StyleData::new(Rc::new(values), &mut ScaledFontCache::new(), 1.0)
    }

    pub fn tree_with_viewport() -> (LayoutTree, LayoutNodeId) {
        let mut tree = LayoutTree::new();
        let mut values = ComputedValues::initial();
        values.display = Display::block();
        let viewport_style = StyleData::new(Rc::new(values), &mut ScaledFontCache::new(), 1.0);
        let viewport = tree.create_styled_node(NodeKind::Viewport, Some(ContentNodeId::DOCUMENT), viewport_style);
        tree.set_viewport(viewport);
        (tree, viewport)
    }

    /// A detached, content-backed styled node.
    pub fn styled(tree: &mut LayoutTree, kind: NodeKind, declarations: &str) -> LayoutNodeId {
        let dom_node = ContentNodeId(tree.len() + 1);
        tree.create_styled_node(kind, Some(dom_node), style(declarations))
    }

    pub fn block(tree: &mut LayoutTree) -> LayoutNodeId {
        styled(tree, NodeKind::BlockContainer, "display: block")
    }
}
