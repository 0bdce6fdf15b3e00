//! Style on layout nodes: application, delegation, anonymous wrappers.
//!
//! Text nodes carry no style of their own. Every query below resolves to the
//! nearest styled node on the inclusive ancestor chain, which always exists
//! in a well-formed tree because the viewport is styled.

use std::mem;
use std::rc::Rc;

use trellis_style::values::Visibility;
use trellis_style::{ComputedValues, Display, Font, FontCache, ImageValue};

use crate::box_model::{BoxModelMetrics, PixelPoint};
use crate::node::{NodeKind, StyleData};
use crate::tree::{LayoutNodeId, LayoutTree};

impl LayoutTree {
    /// The nearest node on the inclusive ancestor chain that carries style.
    ///
    /// # Panics
    ///
    /// If there is none: a styleless root is a tree construction bug.
    pub fn styled_ancestor_or_self(&self, id: LayoutNodeId) -> LayoutNodeId {
        self.inclusive_ancestors(id)
            .find(|&ancestor| self.node(ancestor).has_style())
            .unwrap_or_else(|| panic!("layout node {id:?} has no styled ancestor"))
    }

    /// Style data of `id` or its nearest styled ancestor.
    pub fn style_data(&self, id: LayoutNodeId) -> &StyleData {
        let styled = self.styled_ancestor_or_self(id);
        self.node(styled)
            .style()
            .unwrap_or_else(|| unreachable!("styled ancestor without style"))
    }

    fn own_style_mut(&mut self, id: LayoutNodeId) -> &mut StyleData {
        let node = self.node_mut(id);
        let kind = node.kind();
        node.style
            .as_mut()
            .unwrap_or_else(|| panic!("{kind} node {id:?} carries no style"))
    }

    /// Computed values, delegated to the nearest styled ancestor.
    pub fn computed_values(&self, id: LayoutNodeId) -> &ComputedValues {
        self.style_data(id).computed_values()
    }

    /// The working overlay of a styled node.
    pub(crate) fn computed_values_mut(&mut self, id: LayoutNodeId) -> &mut ComputedValues {
        &mut self.own_style_mut(id).computed
    }

    /// The resolved font, delegated to the nearest styled ancestor.
    pub fn font(&self, id: LayoutNodeId) -> &Rc<Font> {
        self.style_data(id).font()
    }

    /// Used line height, delegated to the nearest styled ancestor.
    pub fn line_height(&self, id: LayoutNodeId) -> f64 {
        self.style_data(id).line_height()
    }

    /// `list-style-image`, delegated to the nearest styled ancestor.
    pub fn list_style_image(&self, id: LayoutNodeId) -> Option<&Rc<ImageValue>> {
        self.style_data(id).list_style_image()
    }

    /// The node's computed font at `scale` device pixels per CSS pixel.
    pub fn scaled_font(&self, id: LayoutNodeId, scale: f32, fonts: &mut dyn FontCache) -> Rc<Font> {
        fonts.scaled_font(&self.computed_values(id).font, scale)
    }

    /// Whether `id` or its parent carries style.
    pub fn has_style_or_parent_with_style(&self, id: LayoutNodeId) -> bool {
        let node = self.node(id);
        node.has_style() || node.parent().is_some_and(|parent| self.node(parent).has_style())
    }

    /// Text is always inline; styled nodes report their computed display.
    pub fn display(&self, id: LayoutNodeId) -> Display {
        let node = self.node(id);
        match node.style() {
            Some(style) => style.computed_values().display,
            None => Display::inline(),
        }
    }

    /// Inline-level: `display` has an inline outer type.
    pub fn is_inline(&self, id: LayoutNodeId) -> bool {
        self.display(id).is_inline_outside()
    }

    /// `display: inline-block`.
    pub fn is_inline_block(&self, id: LayoutNodeId) -> bool {
        self.display(id).is_inline_block()
    }

    /// `display: inline-table`.
    pub fn is_inline_table(&self, id: LayoutNodeId) -> bool {
        self.display(id).is_inline_table()
    }

    /// Install a freshly resolved style on a styled node, resolving its font
    /// through `fonts` at `scale` and its line height.
    ///
    /// A table box that already sits in its table wrapper hands the
    /// wrapper-owned values of the new style straight to that wrapper, so a
    /// later [`resolve`](crate::resolve::resolve) finds it wrapped and transferred.
    ///
    /// # Panics
    ///
    /// If the node's kind carries no style.
    pub fn apply_style(
        &mut self,
        id: LayoutNodeId,
        snapshot: Rc<ComputedValues>,
        fonts: &mut dyn FontCache,
        scale: f32,
    ) {
        let wrapper = self.enclosing_table_wrapper(id);
        let style = StyleData::new(snapshot, fonts, scale);
        let visible = style.computed.visibility == Visibility::Visible;
        *self.own_style_mut(id) = style;
        self.node_mut(id).set_visible(visible);

        if let Some(wrapper) = wrapper {
            let wrapper_style = self.anonymous_wrapper_style(id);
            let wrapper_visible = wrapper_style.computed.visibility == Visibility::Visible;
            *self.own_style_mut(wrapper) = wrapper_style;
            self.node_mut(wrapper).set_visible(wrapper_visible);
            self.transfer_table_box_computed_values_to_wrapper_computed_values(id, wrapper);
        }
    }

    /// The table wrapper `table` has transferred its values to, if it is
    /// still the table's parent.
    fn enclosing_table_wrapper(&self, table: LayoutNodeId) -> Option<LayoutNodeId> {
        if !self.has_transferred_to_wrapper(table) {
            return None;
        }
        self.node(table)
            .parent()
            .filter(|&parent| self.node(parent).kind().is_table_wrapper())
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "The properties of anonymous boxes are inherited from the enclosing
    /// non-anonymous box... Non-inherited properties have their initial value."
    ///
    /// Creates a detached anonymous block container whose style is the
    /// inherited subset of `id`'s values with `display: block`, sharing its
    /// font and line height. `id` is not modified.
    pub fn create_anonymous_wrapper(&mut self, id: LayoutNodeId) -> LayoutNodeId {
        self.create_anonymous_wrapper_of_kind(id, NodeKind::BlockContainer)
    }

    pub(crate) fn create_anonymous_wrapper_of_kind(&mut self, id: LayoutNodeId, kind: NodeKind) -> LayoutNodeId {
        let style = self.anonymous_wrapper_style(id);
        self.create_styled_node(kind, None, style)
    }

    fn anonymous_wrapper_style(&self, id: LayoutNodeId) -> StyleData {
        let source = self.style_data(id);
        let mut values = source.computed_values().clone_inherited_values();
        values.display = Display::block();
        StyleData::synthesized(values, Rc::clone(source.font()), source.line_height())
    }

    /// [§ 17.4 Tables in the visual formatting model](https://www.w3.org/TR/CSS2/tables.html#model)
    ///
    /// "The computed values of properties 'position', 'float', 'margin-*',
    /// 'top', 'right', 'bottom', and 'left' on the table element are used on
    /// the table wrapper box and not the table box; all other values of
    /// non-inheritable properties are used on the table box and not the table
    /// wrapper box."
    ///
    /// Moves those values from `table`'s overlay to `wrapper`'s, resetting
    /// them to initial values on the table. `z-index` moves with `position`.
    /// The wrapper becomes `inline-block` around an inline-level table and
    /// `flow-root` otherwise.
    /// The table's snapshot is untouched.
    ///
    /// # Panics
    ///
    /// If either node carries no style, or if `table`'s values were already
    /// transferred.
    pub fn transfer_table_box_computed_values_to_wrapper_computed_values(
        &mut self,
        table: LayoutNodeId,
        wrapper: LayoutNodeId,
    ) {
        let initial = ComputedValues::initial();
        let table_style = self.own_style_mut(table);
        assert!(
            !table_style.transferred_to_wrapper,
            "table box {table:?} already transferred its values to a wrapper"
        );
        table_style.transferred_to_wrapper = true;

        // STEP 1: Take the wrapper-owned values off the table box.
        let table_values = &mut table_style.computed;
        let wrapper_display = if table_values.display.is_inline_outside() {
            Display::inline_block()
        } else {
            Display::flow_root()
        };
        let position = mem::replace(&mut table_values.position, initial.position);
        let float = mem::replace(&mut table_values.float, initial.float);
        let clear = mem::replace(&mut table_values.clear, initial.clear);
        let inset = mem::replace(&mut table_values.inset, initial.inset);
        let margin = mem::replace(&mut table_values.margin, initial.margin);
        let z_index = mem::replace(&mut table_values.z_index, initial.z_index);

        // STEP 2: Give them to the wrapper.
        let wrapper_values = self.computed_values_mut(wrapper);
        wrapper_values.display = wrapper_display;
        wrapper_values.position = position;
        wrapper_values.float = float;
        wrapper_values.clear = clear;
        wrapper_values.inset = inset;
        wrapper_values.margin = margin;
        wrapper_values.z_index = z_index;

        tracing::trace!(%table, %wrapper, "transferred table box values to wrapper");
    }

    /// Whether `table`'s values have been moved to a wrapper.
    pub fn has_transferred_to_wrapper(&self, table: LayoutNodeId) -> bool {
        self.node(table)
            .style()
            .is_some_and(|style| style.transferred_to_wrapper)
    }

    /// Content-box origin of the nearest metric-bearing inclusive ancestor.
    pub fn box_type_agnostic_position(&self, id: LayoutNodeId) -> PixelPoint {
        self.inclusive_ancestors(id)
            .find_map(|ancestor| self.node(ancestor).box_model())
            .map(BoxModelMetrics::offset)
            .unwrap_or_default()
    }
}
