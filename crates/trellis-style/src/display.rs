//! CSS Display property types and parsing
//!
//! [§ 2 Box Layout Modes: the display property](https://www.w3.org/TR/css-display-3/#the-display-properties)

use serde::{Deserialize, Serialize};

/// [§ 2.1 Outer Display Roles](https://www.w3.org/TR/css-display-3/#outer-role)
///
/// "The `<display-outside>` keywords specify the element's outer display type,
/// which is essentially its principal box's role in flow layout."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OuterDisplayType {
    /// "The element generates a block-level box when placed in flow layout."
    Block,
    /// "The element generates an inline-level box when placed in flow layout."
    Inline,
}

/// [§ 2.2 Inner Display Layout Models](https://www.w3.org/TR/css-display-3/#inner-model)
///
/// "The `<display-inside>` keywords specify the element's inner display type,
/// which defines the type of formatting context that lays out its contents."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InnerDisplayType {
    /// "The element lays out its contents using flow layout (block-and-inline layout)."
    Flow,
    /// Same as Flow but always establishes a new block formatting context.
    FlowRoot,
    /// "The element lays out its contents using table layout."
    Table,
    /// "The element lays out its contents using flex layout."
    Flex,
    /// "The element lays out its contents using grid layout."
    Grid,
}

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Display {
    /// [§ 2.5 Box Generation](https://www.w3.org/TR/css-display-3/#box-generation)
    ///
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// "The element itself does not generate any boxes, but its children and
    /// pseudo-elements still generate boxes and text runs as normal."
    Contents,
    /// An outer/inner pair, optionally generating a `::marker` box.
    Pair {
        /// "The outer display type, which dictates how the box participates in flow layout."
        outer: OuterDisplayType,
        /// "The inner display type, which dictates how its descendant boxes are laid out."
        inner: InnerDisplayType,
        /// [§ 2.3 Generating Marker Boxes](https://www.w3.org/TR/css-display-3/#list-items)
        list_item: bool,
    },
}

impl Display {
    const fn pair(outer: OuterDisplayType, inner: InnerDisplayType) -> Self {
        Self::Pair {
            outer,
            inner,
            list_item: false,
        }
    }

    /// `display: block`
    #[must_use]
    pub const fn block() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Flow)
    }

    /// `display: inline`, the initial value.
    #[must_use]
    pub const fn inline() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::Flow)
    }

    /// `display: inline-block`
    #[must_use]
    pub const fn inline_block() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::FlowRoot)
    }

    /// `display: flow-root`
    #[must_use]
    pub const fn flow_root() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::FlowRoot)
    }

    /// `display: flex`
    #[must_use]
    pub const fn flex() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Flex)
    }

    /// `display: grid`
    #[must_use]
    pub const fn grid() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Grid)
    }

    /// `display: table`
    #[must_use]
    pub const fn table() -> Self {
        Self::pair(OuterDisplayType::Block, InnerDisplayType::Table)
    }

    /// `display: inline-table`
    #[must_use]
    pub const fn inline_table() -> Self {
        Self::pair(OuterDisplayType::Inline, InnerDisplayType::Table)
    }

    /// `display: list-item`
    #[must_use]
    pub const fn list_item() -> Self {
        Self::Pair {
            outer: OuterDisplayType::Block,
            inner: InnerDisplayType::Flow,
            list_item: true,
        }
    }

    /// Same inner type with a different outer type.
    #[must_use]
    pub const fn with_outer(self, outer: OuterDisplayType) -> Self {
        match self {
            Self::Pair {
                inner, list_item, ..
            } => Self::Pair {
                outer,
                inner,
                list_item,
            },
            other => other,
        }
    }

    /// Check for `display: none`.
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Check for `display: contents`.
    pub const fn is_contents(&self) -> bool {
        matches!(self, Self::Contents)
    }

    /// The outer display type, if the element generates a principal box.
    pub const fn outer(&self) -> Option<OuterDisplayType> {
        match self {
            Self::Pair { outer, .. } => Some(*outer),
            _ => None,
        }
    }

    /// The inner display type, if the element generates a principal box.
    pub const fn inner(&self) -> Option<InnerDisplayType> {
        match self {
            Self::Pair { inner, .. } => Some(*inner),
            _ => None,
        }
    }

    /// Block-level principal box.
    pub const fn is_block_outside(&self) -> bool {
        matches!(self.outer(), Some(OuterDisplayType::Block))
    }

    /// Inline-level principal box.
    pub const fn is_inline_outside(&self) -> bool {
        matches!(self.outer(), Some(OuterDisplayType::Inline))
    }

    /// `flow` inner display.
    pub const fn is_flow_inside(&self) -> bool {
        matches!(self.inner(), Some(InnerDisplayType::Flow))
    }

    /// `flow-root` inner display.
    pub const fn is_flow_root_inside(&self) -> bool {
        matches!(self.inner(), Some(InnerDisplayType::FlowRoot))
    }

    /// `table` inner display.
    pub const fn is_table_inside(&self) -> bool {
        matches!(self.inner(), Some(InnerDisplayType::Table))
    }

    /// `flex` inner display.
    pub const fn is_flex_inside(&self) -> bool {
        matches!(self.inner(), Some(InnerDisplayType::Flex))
    }

    /// `grid` inner display.
    pub const fn is_grid_inside(&self) -> bool {
        matches!(self.inner(), Some(InnerDisplayType::Grid))
    }

    /// Generates a `::marker` box.
    pub const fn is_list_item(&self) -> bool {
        matches!(self, Self::Pair { list_item: true, .. })
    }

    /// `inline-block`
    pub const fn is_inline_block(&self) -> bool {
        self.is_inline_outside() && self.is_flow_root_inside()
    }

    /// `inline-table`
    pub const fn is_inline_table(&self) -> bool {
        self.is_inline_outside() && self.is_table_inside()
    }

    /// Serialize as the shortest keyword form.
    pub const fn to_css(&self) -> &'static str {
        use InnerDisplayType as I;
        use OuterDisplayType as O;
        match self {
            Self::None => "none",
            Self::Contents => "contents",
            Self::Pair {
                list_item: true,
                outer: O::Inline,
                ..
            } => "inline list-item",
            Self::Pair {
                list_item: true, ..
            } => "list-item",
            Self::Pair { outer, inner, .. } => match (outer, inner) {
                (O::Block, I::Flow) => "block",
                (O::Inline, I::Flow) => "inline",
                (O::Block, I::FlowRoot) => "flow-root",
                (O::Inline, I::FlowRoot) => "inline-block",
                (O::Block, I::Table) => "table",
                (O::Inline, I::Table) => "inline-table",
                (O::Block, I::Flex) => "flex",
                (O::Inline, I::Flex) => "inline-flex",
                (O::Block, I::Grid) => "grid",
                (O::Inline, I::Grid) => "inline-grid",
            },
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::inline()
    }
}

/// [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// Parse a single-keyword display value.
pub fn parse_display(text: &str) -> Option<Display> {
    match text.trim().to_ascii_lowercase().as_str() {
        "none" => Some(Display::None),
        "contents" => Some(Display::Contents),
        // [§ 2.1 Outer Display Roles]
        // "block: The element generates a block-level box."
        "block" => Some(Display::block()),
        // "inline: The element generates an inline-level box."
        "inline" => Some(Display::inline()),
        // [§ 2.4 Combination Display Keywords]
        "inline-block" => Some(Display::inline_block()),
        "flow-root" => Some(Display::flow_root()),
        "list-item" => Some(Display::list_item()),
        "table" => Some(Display::table()),
        "inline-table" => Some(Display::inline_table()),
        "flex" => Some(Display::flex()),
        "inline-flex" => Some(Display::flex().with_outer(OuterDisplayType::Inline)),
        "grid" => Some(Display::grid()),
        "inline-grid" => Some(Display::grid().with_outer(OuterDisplayType::Inline)),
        _ => None,
    }
}
