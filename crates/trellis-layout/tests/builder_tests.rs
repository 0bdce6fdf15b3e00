//! Integration tests for the full pipeline: content tree, style resolution,
//! box generation, anonymous boxes, positioning and stacking.

use trellis_dom::{ContentNodeId, ContentTree, ElementData};
use trellis_layout::{
    LayoutConfig, LayoutNodeId, LayoutTree, NodeKind, ResolvedStyle, ResolvedStyleError, TreeBuilder,
    build_stacking_contexts, dump_tree, render_text, resolve,
};
use trellis_style::{ScaledFontCache, StyleMap};

/// `<html><body>` with the body's id returned for appending.
fn document() -> (ContentTree, ContentNodeId) {
    let mut content = ContentTree::new();
    let html = content.append_element(content.document(), ElementData::html("html"));
    let body = content.append_element(html, ElementData::html("body"));
    (content, body)
}

fn build(content: &ContentTree, css: &str) -> LayoutTree {
    let styles = StyleMap::parse(css).expect("valid sheet");
    let mut fonts = ScaledFontCache::new();
    TreeBuilder::new(content, &styles, &mut fonts, LayoutConfig::default())
        .build()
        .expect("box generation succeeds")
}

fn body_box(tree: &LayoutTree) -> LayoutNodeId {
    let viewport = tree.viewport().unwrap();
    let html = tree.children(viewport).next().unwrap();
    tree.children(html).next().unwrap()
}

fn kinds(tree: &LayoutTree, parent: LayoutNodeId) -> Vec<NodeKind> {
    tree.children(parent).map(|c| tree.node(c).kind()).collect()
}

#[test]
fn test_table_margin_moves_to_wrapper_on_resolve() {
    let (mut content, body) = document();
    let table = content.append_element(
        body,
        ElementData::html("table").with_attr("style", "position: absolute; margin-left: 10px"),
    );

    let mut tree = build(&content, "");
    assert_eq!(
        ResolvedStyle::for_element(&tree, table)
            .get_property_value("margin-left")
            .unwrap(),
        "10px"
    );

    let _ = resolve(&mut tree).unwrap();
    let body_box = body_box(&tree);
    assert_eq!(kinds(&tree, body_box), vec![NodeKind::TableWrapper]);
    let wrapper = tree.children(body_box).next().unwrap();
    let table_box = tree.children(wrapper).next().unwrap();

    let table_style = ResolvedStyle::for_element(&tree, table);
    assert_eq!(table_style.node(), Some(table_box));
    assert_eq!(table_style.get_property_value("margin-left").unwrap(), "0px");
    assert_eq!(table_style.get_property_value("position").unwrap(), "static");

    let wrapper_style = ResolvedStyle::new(&tree, Some(wrapper));
    assert_eq!(wrapper_style.get_property_value("margin-left").unwrap(), "10px");
    assert_eq!(wrapper_style.get_property_value("position").unwrap(), "absolute");
    assert_eq!(wrapper_style.get_property_value("display").unwrap(), "flow-root");
}

#[test]
fn test_resolve_twice_is_stable() {
    let (mut content, body) = document();
    let _ = content.append_element(body, ElementData::html("table"));
    let _ = content.append_text(body, "after");

    let mut tree = build(&content, "");
    let _ = resolve(&mut tree).unwrap();
    let first = render_text(&tree, tree.viewport().unwrap(), &content);
    let _ = resolve(&mut tree).unwrap();
    let second = render_text(&tree, tree.viewport().unwrap(), &content);
    assert_eq!(first, second);
}

#[test]
fn test_table_wrapper_becomes_the_flex_item() {
    let (mut content, body) = document();
    let flex = content.append_element(body, ElementData::html("div").with_attr("style", "display: flex"));
    let _ = content.append_element(flex, ElementData::html("table"));

    let mut tree = build(&content, "");
    let _ = resolve(&mut tree).unwrap();
    let flex_box = tree.children(body_box(&tree)).next().unwrap();
    let wrapper = tree.children(flex_box).next().unwrap();
    let table_box = tree.children(wrapper).next().unwrap();

    assert_eq!(tree.node(wrapper).kind(), NodeKind::TableWrapper);
    assert!(tree.node(wrapper).is_flex_item());
    assert!(!tree.node(table_box).is_flex_item());
    assert_eq!(tree.containing_block(wrapper), Some(flex_box));
}

#[test]
fn test_mixed_children_get_anonymous_blocks() {
    let (mut content, body) = document();
    let div = content.append_element(body, ElementData::html("div"));
    let _ = content.append_text(div, "before");
    let _ = content.append_element(div, ElementData::html("p"));
    let _ = content.append_element(div, ElementData::html("span"));
    let _ = content.append_element(div, ElementData::html("span").with_attr("style", "float: left"));

    let mut tree = build(&content, "");
    let div_box = tree.children(body_box(&tree)).next().unwrap();
    assert!(!tree.node(div_box).children_are_inline());

    let positioning = resolve(&mut tree).unwrap();
    assert_eq!(
        kinds(&tree, div_box),
        vec![
            NodeKind::BlockContainer,
            NodeKind::BlockContainer,
            NodeKind::BlockContainer,
            NodeKind::InlineNode,
        ]
    );
    let children: Vec<LayoutNodeId> = tree.children(div_box).collect();
    assert!(tree.node(children[0]).is_anonymous());
    assert!(tree.node(children[0]).children_are_inline());
    assert!(!tree.node(children[1]).is_anonymous());
    assert!(tree.node(children[2]).is_anonymous());
    // The float stays where it was, outside any run.
    assert!(tree.is_floating(children[3]));

    // Text inside the anonymous block resolves against it, percentages
    // against the div.
    let text = tree.children(children[0]).next().unwrap();
    let record = positioning.get(text).unwrap();
    assert_eq!(record.containing_block, Some(children[0]));
    assert_eq!(record.non_anonymous_containing_block, Some(div_box));
}

#[test]
fn test_absolute_box_skips_anonymous_ancestors() {
    let (mut content, body) = document();
    let outer = content.append_element(body, ElementData::html("div").with_attr("style", "position: relative"));
    let _ = content.append_element(outer, ElementData::html("p"));
    let span = content.append_element(outer, ElementData::html("span"));
    let abs = content.append_element(span, ElementData::html("b").with_attr("style", "position: absolute"));

    let mut tree = build(&content, "");
    let positioning = resolve(&mut tree).unwrap();
    let outer_box = tree.children(body_box(&tree)).next().unwrap();
    let abs_box = tree
        .descendants(outer_box)
        .find(|&id| tree.node(id).dom_node() == Some(abs))
        .unwrap();

    assert_eq!(tree.containing_block(abs_box), Some(outer_box));
    assert_eq!(positioning.get(abs_box).unwrap().containing_block, Some(outer_box));
}

#[test]
fn test_stacking_order_from_document() {
    let (mut content, body) = document();
    let top = content.append_element(body, ElementData::html("div").with_attr("class", "top"));
    let faded = content.append_element(body, ElementData::html("div").with_attr("class", "faded"));
    let below = content.append_element(body, ElementData::html("div").with_attr("class", "below"));

    let mut tree = build(
        &content,
        ".top { position: relative; z-index: 10 } .faded { opacity: 0.5 } .below { position: absolute; z-index: -2 }",
    );
    let positioning = resolve(&mut tree).unwrap();
    let root = build_stacking_contexts(&tree, &positioning).unwrap();

    let order: Vec<Option<ContentNodeId>> = root
        .paint_order()
        .into_iter()
        .map(|id| tree.node(id).dom_node())
        .collect();
    assert_eq!(
        order,
        vec![Some(content.document()), Some(below), Some(faded), Some(top)]
    );
}

#[test]
fn test_element_without_box_has_no_resolved_style() {
    let (mut content, body) = document();
    let hidden = content.append_element(body, ElementData::html("div").with_attr("style", "display: none"));

    let tree = build(&content, "");
    let style = ResolvedStyle::for_element(&tree, hidden);
    assert_eq!(style.node(), None);
    assert_eq!(
        style.get_property_value("display"),
        Err(ResolvedStyleError::NoLayoutNode)
    );
}

#[test]
fn test_device_scale_picks_scaled_fonts() {
    let (mut content, body) = document();
    let p = content.append_element(body, ElementData::html("p").with_attr("style", "font-size: 10px"));
    let _ = content.append_text(p, "scaled");

    let styles = StyleMap::new();
    let mut fonts = ScaledFontCache::new();
    let config = LayoutConfig::default().with_device_pixels_per_css_pixel(2.0);
    let tree = TreeBuilder::new(&content, &styles, &mut fonts, config)
        .build()
        .unwrap();

    let p_box = tree.children(body_box(&tree)).next().unwrap();
    let text = tree.children(p_box).next().unwrap();
    assert_eq!(tree.font(text).size, 20.0);
    assert_eq!(tree.computed_values(text).font.size, 10.0);
    assert_eq!(tree.scaled_font(text, 3.0, &mut fonts).size, 30.0);
}

#[test]
fn test_dump_round_trips_through_json() {
    let (mut content, body) = document();
    let _ = content.append_element(body, ElementData::html("div").with_attr("id", "main"));

    let mut tree = build(&content, "");
    let positioning = resolve(&mut tree).unwrap();
    let viewport = tree.viewport().unwrap();
    let dump = dump_tree(&tree, viewport, &content, &positioning);

    let json = serde_json::to_string(&dump).unwrap();
    assert!(json.contains("BlockContainer<div>#main"));
    assert_eq!(serde_json::from_str::<trellis_layout::DumpNode>(&json).unwrap(), dump);
    assert_eq!(tree.collect_garbage(), 0);
}
