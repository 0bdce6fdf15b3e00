//! Content tree for the Trellis layout tree.
//!
//! The layout tree is derived from a DOM-like hierarchy of elements and
//! text. This crate provides the read side the layout code needs (identity,
//! parent/child structure, element semantics) plus the mutations used to
//! build test documents.
//!
//! # Design
//!
//! The tree uses arena allocation with [`ContentNodeId`] indices for all
//! relationships. Nodes are never freed individually; a document that changes
//! materially is rebuilt from scratch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Map of attribute names to values for an element.
pub type Attributes = HashMap<String, String>;

/// A type-safe index into the content tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentNodeId(pub usize);

impl ContentNodeId {
    /// The document node is always at index 0.
    pub const DOCUMENT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// A node stores indices for its parent, children and siblings so every
/// direction of traversal is O(1).
#[derive(Debug, Clone)]
pub struct ContentNode {
    /// What this node is.
    pub kind: ContentKind,
    /// Parent node, `None` for the document and for detached nodes.
    pub parent: Option<ContentNodeId>,
    /// Children in tree order.
    pub children: Vec<ContentNodeId>,
    /// Sibling immediately after this node.
    pub next_sibling: Option<ContentNodeId>,
    /// Sibling immediately before this node.
    pub prev_sibling: Option<ContentNodeId>,
}

/// The node types the layout tree cares about.
#[derive(Debug, Clone)]
pub enum ContentKind {
    /// The document node; parent of the document element.
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment; never generates a box.
    Comment(String),
}

/// Namespace of an element. Only the two namespaces that change box
/// generation are distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Namespace {
    /// The HTML namespace.
    #[default]
    Html,
    /// The SVG namespace.
    Svg,
}

/// Element-specific data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// Local name, stored lowercase.
    pub tag_name: String,
    /// Element namespace.
    pub namespace: Namespace,
    /// Attribute list.
    pub attrs: Attributes,
}

impl ElementData {
    /// Create an HTML element with no attributes.
    #[must_use]
    pub fn html(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            namespace: Namespace::Html,
            attrs: Attributes::new(),
        }
    }

    /// Create an SVG element with no attributes.
    #[must_use]
    pub fn svg(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            namespace: Namespace::Svg,
            attrs: Attributes::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        let _ = self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// The `id` attribute, if present.
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Class names from the `class` attribute, in source order.
    pub fn classes(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether this is the SVG root element (`<svg>` in the SVG namespace).
    pub fn is_svg_root(&self) -> bool {
        self.namespace == Namespace::Svg && self.tag_name == "svg"
    }

    /// [SVG 2 § 9 Basic Shapes](https://www.w3.org/TR/SVG2/shapes.html)
    ///
    /// Whether this SVG element renders geometry (paths and basic shapes).
    pub fn is_svg_geometry(&self) -> bool {
        self.namespace == Namespace::Svg
            && matches!(
                self.tag_name.as_str(),
                "path" | "rect" | "circle" | "ellipse" | "line" | "polyline" | "polygon"
            )
    }
}

/// Arena-based content tree.
#[derive(Debug, Clone)]
pub struct ContentTree {
    /// All nodes; the document node is always at index 0.
    nodes: Vec<ContentNode>,
}

impl ContentTree {
    /// Create a content tree holding only the document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![ContentNode::detached(ContentKind::Document)],
        }
    }

    /// The document node.
    pub const fn document(&self) -> ContentNodeId {
        ContentNodeId::DOCUMENT
    }

    /// Get a node by id.
    pub fn get(&self, id: ContentNodeId) -> Option<&ContentNode> {
        self.nodes.get(id.0)
    }

    /// Number of allocated nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the document node exists from construction.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: ContentKind) -> ContentNodeId {
        let id = ContentNodeId(self.nodes.len());
        self.nodes.push(ContentNode::detached(kind));
        id
    }

    /// Allocate an element and append it to `parent`.
    pub fn append_element(&mut self, parent: ContentNodeId, data: ElementData) -> ContentNodeId {
        let id = self.alloc(ContentKind::Element(data));
        self.append_child(parent, id);
        id
    }

    /// Allocate a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: ContentNodeId, text: &str) -> ContentNodeId {
        let id = self.alloc(ContentKind::Text(text.to_string()));
        self.append_child(parent, id);
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Appends `child` as the last child of `parent`. A child that is still
    /// attached elsewhere is removed from its old parent first.
    pub fn append_child(&mut self, parent: ContentNodeId, child: ContentNodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child);
        }
        let previous_last = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = previous_last;
        node.next_sibling = None;
        if let Some(prev) = previous_last {
            self.nodes[prev.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches `child` from `parent`, relinking its former siblings. Does
    /// nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: ContentNodeId, child: ContentNodeId) {
        let Some(index) = self.nodes[parent.0].children.iter().position(|&c| c == child) else {
            return;
        };
        let _ = self.nodes[parent.0].children.remove(index);
        let (prev, next) = {
            let node = &self.nodes[child.0];
            (node.prev_sibling, node.next_sibling)
        };
        if let Some(prev) = prev {
            self.nodes[prev.0].next_sibling = next;
        }
        if let Some(next) = next {
            self.nodes[next.0].prev_sibling = prev;
        }
        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Parent of a node.
    pub fn parent(&self, id: ContentNodeId) -> Option<ContentNodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node, in tree order.
    pub fn children(&self, id: ContentNodeId) -> &[ContentNodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Next sibling of a node.
    pub fn next_sibling(&self, id: ContentNodeId) -> Option<ContentNodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Previous sibling of a node.
    pub fn prev_sibling(&self, id: ContentNodeId) -> Option<ContentNodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Ancestors of a node, from its parent up to the document.
    pub fn ancestors(&self, id: ContentNodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// [§ 4.2.1 Connected](https://dom.spec.whatwg.org/#connected)
    ///
    /// Whether the node's root is the document.
    pub fn is_connected(&self, id: ContentNodeId) -> bool {
        id == ContentNodeId::DOCUMENT || self.ancestors(id).any(|a| a == ContentNodeId::DOCUMENT)
    }

    /// Element data if the node is an element.
    pub fn as_element(&self, id: ContentNodeId) -> Option<&ElementData> {
        match &self.get(id)?.kind {
            ContentKind::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Text content if the node is a text node.
    pub fn as_text(&self, id: ContentNodeId) -> Option<&str> {
        match &self.get(id)?.kind {
            ContentKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The document element: the first element child of the document.
    pub fn document_element(&self) -> Option<ContentNodeId> {
        self.children(ContentNodeId::DOCUMENT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentNode {
    const fn detached(kind: ContentKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// Iterator over the ancestors of a content node.
pub struct Ancestors<'a> {
    tree: &'a ContentTree,
    current: Option<ContentNodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ContentNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
