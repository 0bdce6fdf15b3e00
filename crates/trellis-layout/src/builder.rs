//! Layout tree construction from a content tree.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! "The following sections describe the types of boxes that may be
//! generated in CSS 2. A box's type affects, in part, its behavior in the
//! visual formatting model. The 'display' property, described below,
//! specifies a box's type."

use std::rc::Rc;

use trellis_dom::{ContentKind, ContentNodeId, ContentTree, ElementData};
use trellis_style::{ComputedValues, Display, FontCache, PseudoElement, StyleResolver};

use crate::config::LayoutConfig;
use crate::error::TreeError;
use crate::node::{GeneratedFor, NodeKind, StyleData};
use crate::resolve::compute_children_are_inline;
use crate::tree::{LayoutNodeId, LayoutTree};

/// Builds one [`LayoutTree`] from a content tree, resolving styles and fonts
/// through the injected collaborators.
pub struct TreeBuilder<'a> {
    content: &'a ContentTree,
    styles: &'a dyn StyleResolver,
    fonts: &'a mut dyn FontCache,
    config: LayoutConfig,
    tree: LayoutTree,
}

impl<'a> TreeBuilder<'a> {
    /// Prepare a build.
    pub fn new(
        content: &'a ContentTree,
        styles: &'a dyn StyleResolver,
        fonts: &'a mut dyn FontCache,
        config: LayoutConfig,
    ) -> Self {
        Self {
            content,
            styles,
            fonts,
            config,
            tree: LayoutTree::new(),
        }
    }

    fn style_data(&mut self, values: ComputedValues) -> StyleData {
        StyleData::new(Rc::new(values), self.fonts, self.config.device_pixels_per_css_pixel)
    }

    /// Build the tree: a viewport for the document, then one pass over the
    /// content tree in tree order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError`] if inserting a generated node fails, which
    /// indicates a box generation bug.
    #[tracing::instrument(level = "debug", skip(self), fields(content_nodes = self.content.len()))]
    pub fn build(mut self) -> Result<LayoutTree, TreeError> {
        // [§ 9.1.2 Containing blocks](https://www.w3.org/TR/CSS2/visuren.html#containing-block)
        // "The root of the document tree generates a box that serves as
        // containing block for all other boxes." The viewport plays the
        // initial containing block and is always a styled block.
        let mut root_values = ComputedValues::initial();
        root_values.display = Display::block();
        let style = self.style_data(root_values.clone());
        let viewport = self
            .tree
            .create_styled_node(NodeKind::Viewport, Some(self.content.document()), style);
        self.tree.set_viewport(viewport);
        if let Some(metrics) = self.tree.node_mut(viewport).box_model_mut() {
            let icb = self.config.viewport;
            metrics.set_offset(icb.x, icb.y);
            metrics.set_content_size(icb.width, icb.height);
        }

        let content = self.content;
        for &child in content.children(content.document()) {
            self.build_node(child, viewport, &root_values, false)?;
        }
        let inline = compute_children_are_inline(&self.tree, viewport);
        self.tree.node_mut(viewport).set_children_are_inline(inline);

        tracing::debug!(layout_nodes = self.tree.len(), "built layout tree");
        Ok(self.tree)
    }

    fn build_node(
        &mut self,
        id: ContentNodeId,
        parent: LayoutNodeId,
        parent_values: &ComputedValues,
        in_svg: bool,
    ) -> Result<(), TreeError> {
        let content = self.content;
        let Some(node) = content.get(id) else {
            return Ok(());
        };
        match &node.kind {
            ContentKind::Text(text) => {
                // Whitespace-only runs generate no box here; white-space
                // processing belongs to inline layout.
                if !text.trim().is_empty() && !in_svg {
                    let text_node = self.tree.create_text_node(Some(id), text.clone());
                    self.tree.append_child(parent, text_node)?;
                }
                Ok(())
            }
            ContentKind::Element(data) => self.build_element(id, data, parent, parent_values, in_svg),
            ContentKind::Document | ContentKind::Comment(_) => Ok(()),
        }
    }

    fn build_children(
        &mut self,
        id: ContentNodeId,
        parent: LayoutNodeId,
        parent_values: &ComputedValues,
        in_svg: bool,
    ) -> Result<(), TreeError> {
        let content = self.content;
        for &child in content.children(id) {
            self.build_node(child, parent, parent_values, in_svg)?;
        }
        Ok(())
    }

    fn build_element(
        &mut self,
        id: ContentNodeId,
        data: &ElementData,
        parent: LayoutNodeId,
        parent_values: &ComputedValues,
        in_svg: bool,
    ) -> Result<(), TreeError> {
        // Inside an <svg>, only shapes get boxes; grouping elements are
        // transparent.
        if in_svg && !data.is_svg_geometry() {
            return self.build_children(id, parent, parent_values, true);
        }

        let values = self.styles.resolve_element_style(self.content, id, parent_values);

        // [§ 2.5 Box Generation](https://www.w3.org/TR/css-display-3/#box-generation)
        // "none: The element and its descendants generate no boxes or text runs."
        if values.display.is_none() {
            return Ok(());
        }
        // "contents: The element itself does not generate any boxes, but its
        // children and pseudo-elements still generate boxes and text runs as normal."
        if values.display.is_contents() {
            return self.build_children(id, parent, &values, in_svg);
        }

        let kind = node_kind_for(data, &values, in_svg);
        let style = self.style_data(values.clone());
        let layout_node = self.tree.create_styled_node(kind, Some(id), style);
        self.tree.append_child(parent, layout_node)?;
        self.mark_container_item(parent, layout_node);

        if kind == NodeKind::ListItemBox {
            self.create_list_item_marker(layout_node, &values)?;
        }

        if kind.can_have_children() {
            self.create_pseudo_element(id, PseudoElement::Before, layout_node, &values)?;
            self.build_children(id, layout_node, &values, in_svg || kind.is_svg_svg_box())?;
            self.create_pseudo_element(id, PseudoElement::After, layout_node, &values)?;
        }

        let inline = compute_children_are_inline(&self.tree, layout_node);
        self.tree.node_mut(layout_node).set_children_are_inline(inline);
        Ok(())
    }

    /// [§ 4 Flex Items](https://www.w3.org/TR/css-flexbox-1/#flex-items)
    ///
    /// "Each in-flow child of a flex container becomes a flex item". Grid
    /// containers work the same way.
    fn mark_container_item(&mut self, parent: LayoutNodeId, child: LayoutNodeId) {
        if self.tree.is_absolutely_positioned(child) {
            return;
        }
        let display = self.tree.display(parent);
        let node = self.tree.node_mut(child);
        if display.is_flex_inside() {
            node.set_flex_item(true);
        } else if display.is_grid_inside() {
            node.set_grid_item(true);
        }
    }

    /// [§ 3.1 Generated Content](https://www.w3.org/TR/css-content-3/#generated-content)
    ///
    /// A `::before`/`::after` box is anonymous, records the element that
    /// generated it, and holds its `content` string as a text child.
    fn create_pseudo_element(
        &mut self,
        element: ContentNodeId,
        pseudo: PseudoElement,
        parent: LayoutNodeId,
        element_values: &ComputedValues,
    ) -> Result<(), TreeError> {
        let Some(values) = self
            .styles
            .resolve_pseudo_element_style(self.content, element, pseudo, element_values)
        else {
            return Ok(());
        };
        if values.display.is_none() || values.display.is_contents() {
            return Ok(());
        }
        let text = values.content.clone().unwrap_or_default();
        let kind = if values.display.is_inline_outside() && values.display.is_flow_inside() {
            NodeKind::InlineNode
        } else {
            NodeKind::BlockContainer
        };
        let style = self.style_data(values);
        let pseudo_node = self.tree.create_styled_node(kind, None, style);
        let generated_for = match pseudo {
            PseudoElement::Before => GeneratedFor::PseudoBefore,
            PseudoElement::After => GeneratedFor::PseudoAfter,
        };
        self.tree
            .node_mut(pseudo_node)
            .set_generated_for(generated_for, element);
        self.tree.append_child(parent, pseudo_node)?;
        self.mark_container_item(parent, pseudo_node);

        if !text.is_empty() {
            let text_node = self.tree.create_text_node(None, text);
            self.tree
                .node_mut(text_node)
                .set_generated_for(generated_for, element);
            self.tree.append_child(pseudo_node, text_node)?;
        }
        let inline = compute_children_are_inline(&self.tree, pseudo_node);
        self.tree.node_mut(pseudo_node).set_children_are_inline(inline);
        Ok(())
    }

    /// [§ 3 Markers](https://www.w3.org/TR/css-lists-3/#markers)
    ///
    /// "list-item ... also generates a ::marker pseudo-element". The marker
    /// inherits from the list item and is its first child.
    fn create_list_item_marker(&mut self, list_item: LayoutNodeId, values: &ComputedValues) -> Result<(), TreeError> {
        let mut marker_values = values.clone_inherited_values();
        marker_values.display = Display::inline();
        let style = self.style_data(marker_values);
        let marker = self
            .tree
            .create_styled_node(NodeKind::ListItemMarkerBox, None, style);
        self.tree.append_child(list_item, marker)
    }
}

/// The concrete node kind an element generates.
fn node_kind_for(data: &ElementData, values: &ComputedValues, in_svg: bool) -> NodeKind {
    let display = values.display;
    if in_svg {
        return NodeKind::SvgGeometryBox;
    }
    if data.is_svg_root() {
        return NodeKind::SvgSvgBox;
    }
    match data.tag_name.as_str() {
        "br" => return NodeKind::BreakNode,
        "img" => return NodeKind::ImageBox,
        "label" => return NodeKind::Label,
        _ => {}
    }
    if display.is_list_item() {
        NodeKind::ListItemBox
    } else if display.is_table_inside() || display.is_flex_inside() || display.is_grid_inside() {
        NodeKind::Box
    } else if display.is_inline_outside() && display.is_flow_inside() {
        NodeKind::InlineNode
    } else {
        NodeKind::BlockContainer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_style::{ScaledFontCache, StyleMap};

    fn build(content: &ContentTree, css: &str) -> LayoutTree {
        let styles = StyleMap::parse(css).unwrap();
        let mut fonts = ScaledFontCache::new();
        TreeBuilder::new(content, &styles, &mut fonts, LayoutConfig::default())
            .build()
            .unwrap()
    }

    fn kinds(tree: &LayoutTree, parent: LayoutNodeId) -> Vec<NodeKind> {
        tree.children(parent).map(|c| tree.node(c).kind()).collect()
    }

    #[test]
    fn test_elements_map_to_kinds() {
        let mut content = ContentTree::new();
        let html = content.append_element(content.document(), ElementData::html("html"));
        let body = content.append_element(html, ElementData::html("body"));
        let _ = content.append_element(body, ElementData::html("img"));
        let _ = content.append_element(body, ElementData::html("br"));
        let _ = content.append_element(body, ElementData::html("ul").with_attr("style", "display: flex"));
        let svg = content.append_element(body, ElementData::svg("svg"));
        let group = content.append_element(svg, ElementData::svg("g"));
        let _ = content.append_element(group, ElementData::svg("rect"));
        let _ = content.append_element(body, ElementData::html("script"));

        let tree = build(&content, "");
        let viewport = tree.viewport().unwrap();
        let html_box = tree.children(viewport).next().unwrap();
        let body_box = tree.children(html_box).next().unwrap();
        assert_eq!(
            kinds(&tree, body_box),
            vec![
                NodeKind::ImageBox,
                NodeKind::BreakNode,
                NodeKind::Box,
                NodeKind::SvgSvgBox
            ]
        );
        let svg_box = tree.children(body_box).last().unwrap();
        assert_eq!(kinds(&tree, svg_box), vec![NodeKind::SvgGeometryBox]);
    }

    #[test]
    fn test_list_items_get_markers_and_pseudo_elements_get_text() {
        let mut content = ContentTree::new();
        let ul = content.append_element(content.document(), ElementData::html("ul"));
        let li = content.append_element(ul, ElementData::html("li").with_attr("class", "x"));
        let _ = content.append_text(li, "item");

        let tree = build(&content, ".x::before { content: \"> \" } .x::after { display: block; content: \"!\" }");
        let viewport = tree.viewport().unwrap();
        let ul_box = tree.children(viewport).next().unwrap();
        let li_box = tree.children(ul_box).next().unwrap();
        assert_eq!(tree.node(li_box).kind(), NodeKind::ListItemBox);

        let children: Vec<_> = tree.children(li_box).collect();
        assert_eq!(
            kinds(&tree, li_box),
            vec![
                NodeKind::ListItemMarkerBox,
                NodeKind::InlineNode,
                NodeKind::TextNode,
                NodeKind::BlockContainer
            ]
        );
        let before = tree.node(children[1]);
        assert!(before.is_anonymous());
        assert!(before.is_generated_for_before_pseudo_element());
        assert_eq!(before.pseudo_element_generator(), Some(li));
        let before_text = tree.children(children[1]).next().unwrap();
        assert_eq!(tree.node(before_text).text_content(), Some("> "));
        assert!(tree.node(children[3]).is_generated_for_after_pseudo_element());
    }

    #[test]
    fn test_display_none_and_contents() {
        let mut content = ContentTree::new();
        let div = content.append_element(content.document(), ElementData::html("div"));
        let hidden = content.append_element(div, ElementData::html("p").with_attr("style", "display: none"));
        let _ = content.append_text(hidden, "gone");
        let contents = content.append_element(div, ElementData::html("section").with_attr("style", "display: contents"));
        let _ = content.append_element(contents, ElementData::html("span"));
        let _ = content.append_text(div, "   ");

        let tree = build(&content, "");
        let div_box = tree.children(tree.viewport().unwrap()).next().unwrap();
        assert_eq!(kinds(&tree, div_box), vec![NodeKind::InlineNode]);
        assert!(tree.node(div_box).children_are_inline());
    }

    #[test]
    fn test_flex_children_are_flex_items() {
        let mut content = ContentTree::new();
        let flex = content.append_element(content.document(), ElementData::html("div").with_attr("style", "display: flex"));
        let item = content.append_element(flex, ElementData::html("div"));
        let abs = content.append_element(flex, ElementData::html("div").with_attr("style", "position: absolute"));

        let tree = build(&content, "");
        let flex_box = tree.children(tree.viewport().unwrap()).next().unwrap();
        let children: Vec<_> = tree.children(flex_box).collect();
        assert_eq!(tree.node(children[0]).dom_node(), Some(item));
        assert!(tree.node(children[0]).is_flex_item());
        assert_eq!(tree.node(children[1]).dom_node(), Some(abs));
        assert!(!tree.node(children[1]).is_flex_item());
    }

    #[test]
    fn test_viewport_covers_the_initial_containing_block() {
        let content = ContentTree::new();
        let styles = StyleMap::new();
        let mut fonts = ScaledFontCache::new();
        let config = LayoutConfig::default().with_viewport_size(1024.0, 768.0);
        let tree = TreeBuilder::new(&content, &styles, &mut fonts, config).build().unwrap();
        let viewport = tree.viewport().unwrap();
        let rect = tree.node(viewport).box_model().unwrap().content_box().unwrap();
        assert_eq!((rect.width, rect.height), (1024.0, 768.0));
        assert_eq!(tree.node(viewport).dom_node(), Some(ContentNodeId::DOCUMENT));
    }
}
