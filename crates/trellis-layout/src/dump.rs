//! Debug descriptions and serializable dumps of a layout tree.

use serde::{Deserialize, Serialize};
use trellis_dom::{ContentKind, ContentTree};

use crate::box_model::{BoxModelMetrics, Rect};
use crate::node::{GeneratedFor, NodeKind, SelectionState};
use crate::resolve::PositioningMap;
use crate::tree::{LayoutNodeId, LayoutTree};

/// Text nodes show at most this many characters in their description.
const DESCRIPTION_TEXT_CHARS: usize = 20;

impl LayoutTree {
    /// A short label: `Kind<tag>#id.class`, `Kind(anonymous)` for anonymous
    /// nodes, and the text itself (truncated) for text nodes.
    pub fn debug_description(&self, id: LayoutNodeId, content: &ContentTree) -> String {
        let node = self.node(id);
        let mut description = node.kind().to_string();

        if let Some(text) = node.text_content() {
            let mut shown: String = text.chars().take(DESCRIPTION_TEXT_CHARS).collect();
            if text.chars().count() > DESCRIPTION_TEXT_CHARS {
                shown.push_str("...");
            }
            description.push_str(&format!(" {shown:?}"));
            return description;
        }

        let Some(dom_node) = node.dom_node() else {
            description.push_str("(anonymous)");
            return description;
        };
        match content.get(dom_node).map(|n| &n.kind) {
            Some(ContentKind::Element(element)) => {
                description.push_str(&format!("<{}>", element.tag_name));
                if let Some(id) = element.id() {
                    description.push_str(&format!("#{id}"));
                }
                for class in element.classes() {
                    description.push('.');
                    description.push_str(class);
                }
            }
            Some(ContentKind::Document) => description.push_str("(document)"),
            Some(ContentKind::Text(_) | ContentKind::Comment(_)) | None => {}
        }
        description
    }
}

/// One node of a serialized layout tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpNode {
    /// Arena id.
    pub id: LayoutNodeId,
    /// Concrete kind.
    pub kind: NodeKind,
    /// [`LayoutTree::debug_description`].
    pub description: String,
    /// Whether the node has no content node.
    pub anonymous: bool,
    /// Pseudo-element origin.
    pub generated_for: GeneratedFor,
    /// `display`, serialized.
    pub display: String,
    /// Whether every in-flow child is inline-level.
    pub children_are_inline: bool,
    /// Flex item flag.
    pub is_flex_item: bool,
    /// Grid item flag.
    pub is_grid_item: bool,
    /// Selection coverage.
    pub selection_state: SelectionState,
    /// Containing block from the positioning pass.
    pub containing_block: Option<LayoutNodeId>,
    /// Whether the node establishes a stacking context.
    pub establishes_stacking_context: bool,
    /// Measured border box, if any.
    pub border_box: Option<Rect>,
    /// Children in order.
    pub children: Vec<Self>,
}

/// Snapshot the subtree at `id`.
pub fn dump_tree(
    tree: &LayoutTree,
    id: LayoutNodeId,
    content: &ContentTree,
    positioning: &PositioningMap,
) -> DumpNode {
    let node = tree.node(id);
    let record = positioning.get(id);
    DumpNode {
        id,
        kind: node.kind(),
        description: tree.debug_description(id, content),
        anonymous: node.is_anonymous(),
        generated_for: node.generated_for(),
        display: tree.display(id).to_css().to_string(),
        children_are_inline: node.children_are_inline(),
        is_flex_item: node.is_flex_item(),
        is_grid_item: node.is_grid_item(),
        selection_state: node.selection_state(),
        containing_block: record.and_then(|r| r.containing_block),
        establishes_stacking_context: record.is_some_and(|r| r.establishes_stacking_context),
        border_box: node.box_model().and_then(BoxModelMetrics::border_box),
        children: tree
            .children(id)
            .map(|child| dump_tree(tree, child, content, positioning))
            .collect(),
    }
}

/// Indented text rendering, one node per line.
pub fn render_text(tree: &LayoutTree, id: LayoutNodeId, content: &ContentTree) -> String {
    let mut out = String::new();
    for node in tree.inclusive_descendants(id) {
        let depth = tree.depth(node) - tree.depth(id);
        out.push_str(&"  ".repeat(depth));
        out.push_str(&tree.debug_description(node, content));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TreeBuilder;
    use crate::config::LayoutConfig;
    use crate::resolve::resolve;
    use trellis_dom::ElementData;
    use trellis_style::{ScaledFontCache, StyleMap};

    fn sample() -> (ContentTree, LayoutTree, PositioningMap) {
        let mut content = ContentTree::new();
        let div = content.append_element(
            content.document(),
            ElementData::html("div").with_attr("id", "main").with_attr("class", "a b"),
        );
        let _ = content.append_text(div, "hello world, this is a long run of text");
        let _ = content.append_element(div, ElementData::html("p"));

        let styles = StyleMap::new();
        let mut fonts = ScaledFontCache::new();
        let mut tree = TreeBuilder::new(&content, &styles, &mut fonts, LayoutConfig::default())
            .build()
            .unwrap();
        let positioning = resolve(&mut tree).unwrap();
        (content, tree, positioning)
    }

    #[test]
    fn test_describes_nodes() {
        let (content, tree, _) = sample();
        let viewport = tree.viewport().unwrap();
        let div = tree.children(viewport).next().unwrap();
        assert_eq!(tree.debug_description(viewport, &content), "Viewport(document)");
        assert_eq!(tree.debug_description(div, &content), "BlockContainer<div>#main.a.b");

        let anonymous = tree.children(div).next().unwrap();
        assert_eq!(tree.debug_description(anonymous, &content), "BlockContainer(anonymous)");
        let text = tree.children(anonymous).next().unwrap();
        assert_eq!(
            tree.debug_description(text, &content),
            "TextNode \"hello world, this is...\""
        );
    }

    #[test]
    fn test_dump_serializes_to_json() {
        let (content, tree, positioning) = sample();
        let viewport = tree.viewport().unwrap();
        let dump = dump_tree(&tree, viewport, &content, &positioning);
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["kind"], "Viewport");
        assert_eq!(json["establishes_stacking_context"], true);
        assert_eq!(json["children"][0]["description"], "BlockContainer<div>#main.a.b");

        let back: DumpNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, dump);

        let text = render_text(&tree, viewport, &content);
        assert!(text.starts_with("Viewport(document)\n  BlockContainer<div>"));
    }
}
