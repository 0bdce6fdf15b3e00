//! Layout nodes and their closed-world classification.
//!
//! Every node has a [`NodeKind`] fixed at construction. The kind decides
//! which `is_*` predicates hold, whether the node carries its own style, and
//! whether it carries [`BoxModelMetrics`]. The three-level node hierarchy
//! (node, node with style, node with style and box model metrics) is
//! expressed by which optional parts a [`LayoutNode`] holds.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use trellis_dom::ContentNodeId;
use trellis_style::{ComputedValues, Font, FontCache, ImageValue};

use crate::box_model::BoxModelMetrics;
use crate::tree::LayoutNodeId;

/// Concrete layout node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
pub enum NodeKind {
    /// The initial containing block; root of every layout tree.
    Viewport,
    /// A block container (block, inline-block, flow-root, anonymous blocks).
    BlockContainer,
    /// A non-flow box: flex, grid and table boxes.
    Box,
    /// An inline box (`display: inline` with flow inside).
    InlineNode,
    /// A block container that generates a marker.
    ListItemBox,
    /// The `::marker` of a list item.
    ListItemMarkerBox,
    /// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
    ///
    /// "The table wrapper box establishes a block formatting context, and
    /// contains the table box itself and any caption boxes."
    TableWrapper,
    /// A replaced image.
    ImageBox,
    /// A `<label>` block container.
    Label,
    /// The outermost `<svg>` element, a replaced box holding SVG content.
    SvgSvgBox,
    /// An SVG shape (`path`, `rect`, `circle`, ...).
    SvgGeometryBox,
    /// A forced line break (`<br>`).
    BreakNode,
    /// A run of text. The only kind without its own style.
    TextNode,
}

impl NodeKind {
    /// Every layout node that is a principal box.
    pub const fn is_box(self) -> bool {
        !matches!(self, Self::InlineNode | Self::BreakNode | Self::TextNode)
    }

    /// Block containers, including the viewport, list items, table wrappers
    /// and labels.
    pub const fn is_block_container(self) -> bool {
        matches!(
            self,
            Self::Viewport | Self::BlockContainer | Self::ListItemBox | Self::TableWrapper | Self::Label
        )
    }

    /// Inline boxes.
    pub const fn is_inline_node(self) -> bool {
        matches!(self, Self::InlineNode)
    }

    /// Forced line breaks.
    pub const fn is_break_node(self) -> bool {
        matches!(self, Self::BreakNode)
    }

    /// Text runs.
    pub const fn is_text_node(self) -> bool {
        matches!(self, Self::TextNode)
    }

    /// The viewport.
    pub const fn is_viewport(self) -> bool {
        matches!(self, Self::Viewport)
    }

    /// SVG boxes laid out by SVG rules (shapes), not the outer `<svg>`.
    pub const fn is_svg_box(self) -> bool {
        matches!(self, Self::SvgGeometryBox)
    }

    /// SVG shapes.
    pub const fn is_svg_geometry_box(self) -> bool {
        matches!(self, Self::SvgGeometryBox)
    }

    /// The outer `<svg>` box.
    pub const fn is_svg_svg_box(self) -> bool {
        matches!(self, Self::SvgSvgBox)
    }

    /// `<label>` boxes.
    pub const fn is_label(self) -> bool {
        matches!(self, Self::Label)
    }

    /// Replaced boxes: images and the outer `<svg>`.
    pub const fn is_replaced_box(self) -> bool {
        matches!(self, Self::ImageBox | Self::SvgSvgBox)
    }

    /// List items.
    pub const fn is_list_item_box(self) -> bool {
        matches!(self, Self::ListItemBox)
    }

    /// List item markers.
    pub const fn is_list_item_marker_box(self) -> bool {
        matches!(self, Self::ListItemMarkerBox)
    }

    /// Anonymous table wrappers.
    pub const fn is_table_wrapper(self) -> bool {
        matches!(self, Self::TableWrapper)
    }

    /// Whether nodes of this kind carry their own style.
    pub const fn has_style(self) -> bool {
        !self.is_text_node()
    }

    /// Whether nodes of this kind carry [`BoxModelMetrics`]. Every styled
    /// kind does.
    pub const fn is_node_with_style_and_box_model_metrics(self) -> bool {
        self.has_style()
    }

    /// Text, breaks, markers and images never hold children. The outer
    /// `<svg>` is replaced but still holds its shapes.
    pub const fn can_have_children(self) -> bool {
        !matches!(
            self,
            Self::TextNode | Self::BreakNode | Self::ListItemMarkerBox | Self::ImageBox
        )
    }

    /// Generic classification, resolved per marker type at compile time.
    ///
    /// Only types implementing [`NodeClass`] are accepted, so asking for a
    /// class without a predicate does not compile.
    #[inline]
    pub fn fast_is<T: NodeClass>(self) -> bool {
        T::matches(self)
    }
}

/// A classification that [`NodeKind::fast_is`] can answer.
pub trait NodeClass {
    /// Whether `kind` belongs to this class.
    fn matches(kind: NodeKind) -> bool;
}

macro_rules! node_classes {
    ($($(#[$doc:meta])* $class:ident => $predicate:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $class;

            impl NodeClass for $class {
                #[inline]
                fn matches(kind: NodeKind) -> bool {
                    kind.$predicate()
                }
            }
        )*
    };
}

/// Marker types for [`NodeKind::fast_is`].
pub mod class {
    use super::{NodeClass, NodeKind};

    node_classes! {
        /// Principal boxes.
        Box => is_box;
        /// Block containers.
        BlockContainer => is_block_container;
        /// Inline boxes.
        InlineNode => is_inline_node;
        /// Forced line breaks.
        BreakNode => is_break_node;
        /// Text runs.
        TextNode => is_text_node;
        /// The viewport.
        Viewport => is_viewport;
        /// SVG boxes.
        SvgBox => is_svg_box;
        /// SVG shapes.
        SvgGeometryBox => is_svg_geometry_box;
        /// The outer `<svg>`.
        SvgSvgBox => is_svg_svg_box;
        /// Labels.
        Label => is_label;
        /// Replaced boxes.
        ReplacedBox => is_replaced_box;
        /// List items.
        ListItemBox => is_list_item_box;
        /// List item markers.
        ListItemMarkerBox => is_list_item_marker_box;
        /// Table wrappers.
        TableWrapper => is_table_wrapper;
        /// Nodes with style and box model metrics.
        NodeWithStyleAndBoxModelMetrics => is_node_with_style_and_box_model_metrics;
    }
}

/// Which pseudo-element, if any, a node was generated for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratedFor {
    /// An ordinary node.
    #[default]
    NotGenerated,
    /// Generated for `::before`.
    PseudoBefore,
    /// Generated for `::after`.
    PseudoAfter,
}

/// Text selection coverage of a node, read by the highlight painter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum SelectionState {
    /// No selection.
    #[default]
    None,
    /// Selection starts in this node.
    Start,
    /// Selection ends in this node.
    End,
    /// Selection starts and ends in this node.
    StartAndEnd,
    /// Selection starts before and ends after this node.
    Full,
}

/// Handle to a paintable owned by the painting subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaintableId(pub usize);

/// The style-bearing part of a node.
///
/// `snapshot` is the resolved style as delivered by the style resolver and
/// is never written. `computed` starts as a copy and takes layout-time
/// corrections such as the table wrapper transfer.
#[derive(Debug, Clone)]
pub struct StyleData {
    snapshot: Rc<ComputedValues>,
    pub(crate) computed: ComputedValues,
    pub(crate) font: Rc<Font>,
    pub(crate) line_height: f64,
    pub(crate) list_style_image: Option<Rc<ImageValue>>,
    pub(crate) transferred_to_wrapper: bool,
}

impl StyleData {
    /// Install a resolved style: copy it into the working values and resolve
    /// the font through `fonts` at `scale` and the used line height.
    pub fn new(snapshot: Rc<ComputedValues>, fonts: &mut dyn FontCache, scale: f32) -> Self {
        let font = fonts.scaled_font(&snapshot.font, scale);
        let line_height = snapshot.used_line_height();
        let list_style_image = snapshot.list_style_image.clone().map(Rc::new);
        Self {
            computed: (*snapshot).clone(),
            snapshot,
            font,
            line_height,
            list_style_image,
            transferred_to_wrapper: false,
        }
    }

    /// Synthesized style for an anonymous box, sharing an existing font.
    pub(crate) fn synthesized(values: ComputedValues, font: Rc<Font>, line_height: f64) -> Self {
        Self {
            list_style_image: values.list_style_image.clone().map(Rc::new),
            snapshot: Rc::new(values.clone()),
            computed: values,
            font,
            line_height,
            transferred_to_wrapper: false,
        }
    }

    /// The resolved style as delivered; never modified by layout.
    pub const fn snapshot(&self) -> &Rc<ComputedValues> {
        &self.snapshot
    }

    /// The working computed values layout reads.
    pub const fn computed_values(&self) -> &ComputedValues {
        &self.computed
    }

    /// The resolved font.
    pub const fn font(&self) -> &Rc<Font> {
        &self.font
    }

    /// Used line height in CSS pixels.
    pub const fn line_height(&self) -> f64 {
        self.line_height
    }

    /// `list-style-image`, if any.
    pub const fn list_style_image(&self) -> Option<&Rc<ImageValue>> {
        self.list_style_image.as_ref()
    }
}

/// One node of the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    kind: NodeKind,
    dom_node: Option<ContentNodeId>,
    pseudo_element_generator: Option<ContentNodeId>,
    generated_for: GeneratedFor,
    pub(crate) text: Option<String>,

    pub(crate) parent: Option<LayoutNodeId>,
    pub(crate) first_child: Option<LayoutNodeId>,
    pub(crate) last_child: Option<LayoutNodeId>,
    pub(crate) previous_sibling: Option<LayoutNodeId>,
    pub(crate) next_sibling: Option<LayoutNodeId>,

    paintable: Option<PaintableId>,
    visible: bool,
    children_are_inline: bool,
    is_flex_item: bool,
    is_grid_item: bool,
    selection_state: SelectionState,

    pub(crate) style: Option<StyleData>,
    box_model: Option<BoxModelMetrics>,
}

impl LayoutNode {
    /// A node of a styled kind.
    ///
    /// # Panics
    ///
    /// If `kind` is [`NodeKind::TextNode`].
    pub fn with_style(kind: NodeKind, dom_node: Option<ContentNodeId>, style: StyleData) -> Self {
        assert!(kind.has_style(), "{kind} nodes do not carry style");
        let visible = style.computed.visibility == trellis_style::values::Visibility::Visible;
        Self {
            box_model: kind
                .is_node_with_style_and_box_model_metrics()
                .then(BoxModelMetrics::default),
            style: Some(style),
            visible,
            ..Self::bare(kind, dom_node)
        }
    }

    /// A text node.
    pub fn text(dom_node: Option<ContentNodeId>, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::bare(NodeKind::TextNode, dom_node)
        }
    }

    const fn bare(kind: NodeKind, dom_node: Option<ContentNodeId>) -> Self {
        Self {
            kind,
            dom_node,
            pseudo_element_generator: None,
            generated_for: GeneratedFor::NotGenerated,
            text: None,
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
            paintable: None,
            visible: true,
            children_are_inline: false,
            is_flex_item: false,
            is_grid_item: false,
            selection_state: SelectionState::None,
            style: None,
            box_model: None,
        }
    }

    /// The concrete kind, fixed at construction.
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Shorthand for `self.kind().fast_is::<T>()`.
    #[inline]
    pub fn fast_is<T: NodeClass>(&self) -> bool {
        self.kind.fast_is::<T>()
    }

    /// Whether this node carries its own style.
    pub const fn has_style(&self) -> bool {
        self.style.is_some()
    }

    /// Anonymous nodes have no originating content node.
    pub const fn is_anonymous(&self) -> bool {
        self.dom_node.is_none()
    }

    /// The originating content node.
    pub const fn dom_node(&self) -> Option<ContentNodeId> {
        self.dom_node
    }

    /// The element whose `::before`/`::after` generated this node.
    pub const fn pseudo_element_generator(&self) -> Option<ContentNodeId> {
        self.pseudo_element_generator
    }

    /// Which pseudo-element this node was generated for.
    pub const fn generated_for(&self) -> GeneratedFor {
        self.generated_for
    }

    /// Whether this node was generated for a pseudo-element.
    pub fn is_generated(&self) -> bool {
        self.generated_for != GeneratedFor::NotGenerated
    }

    /// Generated for `::before`.
    pub fn is_generated_for_before_pseudo_element(&self) -> bool {
        self.generated_for == GeneratedFor::PseudoBefore
    }

    /// Generated for `::after`.
    pub fn is_generated_for_after_pseudo_element(&self) -> bool {
        self.generated_for == GeneratedFor::PseudoAfter
    }

    /// Record the pseudo-element this node was generated for.
    pub const fn set_generated_for(&mut self, generated_for: GeneratedFor, element: ContentNodeId) {
        self.generated_for = generated_for;
        self.pseudo_element_generator = Some(element);
    }

    /// Text content of a text node.
    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// The paintable produced for this node in the last paint pass.
    pub const fn paintable(&self) -> Option<PaintableId> {
        self.paintable
    }

    /// Set by the painting subsystem.
    pub const fn set_paintable(&mut self, paintable: Option<PaintableId>) {
        self.paintable = paintable;
    }

    /// Whether the node is rendered visibly.
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Override visibility.
    pub const fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Whether every in-flow child is inline-level.
    pub const fn children_are_inline(&self) -> bool {
        self.children_are_inline
    }

    /// Set by tree construction and anonymous box synthesis.
    pub const fn set_children_are_inline(&mut self, value: bool) {
        self.children_are_inline = value;
    }

    /// In-flow child of a flex container.
    pub const fn is_flex_item(&self) -> bool {
        self.is_flex_item
    }

    /// Mark as a flex item.
    pub const fn set_flex_item(&mut self, value: bool) {
        self.is_flex_item = value;
    }

    /// In-flow child of a grid container.
    pub const fn is_grid_item(&self) -> bool {
        self.is_grid_item
    }

    /// Mark as a grid item.
    pub const fn set_grid_item(&mut self, value: bool) {
        self.is_grid_item = value;
    }

    /// Selection coverage.
    pub const fn selection_state(&self) -> SelectionState {
        self.selection_state
    }

    /// Set by the selection algorithm.
    pub const fn set_selection_state(&mut self, state: SelectionState) {
        self.selection_state = state;
    }

    /// The style-bearing part, for styled kinds.
    pub const fn style(&self) -> Option<&StyleData> {
        self.style.as_ref()
    }

    /// Box model metrics, for kinds that carry them.
    pub const fn box_model(&self) -> Option<&BoxModelMetrics> {
        self.box_model.as_ref()
    }

    /// Mutable box model metrics, for the measurement pass.
    pub const fn box_model_mut(&mut self) -> Option<&mut BoxModelMetrics> {
        self.box_model.as_mut()
    }

    /// Parent link.
    pub const fn parent(&self) -> Option<LayoutNodeId> {
        self.parent
    }

    /// First child link.
    pub const fn first_child(&self) -> Option<LayoutNodeId> {
        self.first_child
    }

    /// Last child link.
    pub const fn last_child(&self) -> Option<LayoutNodeId> {
        self.last_child
    }

    /// Previous sibling link.
    pub const fn previous_sibling(&self) -> Option<LayoutNodeId> {
        self.previous_sibling
    }

    /// Next sibling link.
    pub const fn next_sibling(&self) -> Option<LayoutNodeId> {
        self.next_sibling
    }
}
