//! Keyword-valued properties.
//!
//! Each enum parses case-insensitively from its CSS keyword and displays as
//! the canonical lowercase keyword.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// [§ 3 Choosing A Positioning Scheme](https://www.w3.org/TR/css-position-3/#position-property)
///
/// "The position property determines which of the positioning schemes is
/// used to calculate the position of a box."
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// "The box is not a positioned box, and is laid out according to the
    /// rules of its parent formatting context."
    #[default]
    Static,
    /// "The box is laid out as for static, then offset from the resulting position."
    Relative,
    /// "The box is taken out of flow such that it has no impact on the size
    /// or position of its siblings and ancestors."
    Absolute,
    /// "Same as sticky, except the box is positioned relative to the viewport."
    Sticky,
    /// "Same as absolute, except the box is positioned and sized relative
    /// to a fixed positioning containing block (usually the viewport)."
    Fixed,
}

/// [§ 9.5.1 Positioning the float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Float {
    /// "The box is not floated."
    #[default]
    None,
    /// "The element generates a block box that is floated to the left."
    Left,
    /// "Similar to 'left', except the box is floated to the right."
    Right,
}

/// [§ 9.5.2 Controlling flow next to floats](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Clear {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// Below left floats.
    Left,
    /// Below right floats.
    Right,
    /// Below all floats.
    Both,
}

/// [§ 11.2 Visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Visibility {
    /// "The generated box is visible."
    #[default]
    Visible,
    /// "The generated box is invisible (fully transparent, nothing is
    /// drawn), but still affects layout."
    Hidden,
    /// Rows and columns are removed; elsewhere the same as `hidden`.
    Collapse,
}

/// [§ 3.2 isolation](https://drafts.fxtf.org/compositing/#isolation)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Isolation {
    /// Isolation is only forced by other properties.
    #[default]
    Auto,
    /// "This property value turns the element into a stacking context."
    Isolate,
}

/// [§ 3.3 list-style-type](https://www.w3.org/TR/css-lists-3/#text-markers)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum ListStyleType {
    /// A filled circle.
    #[default]
    Disc,
    /// A hollow circle.
    Circle,
    /// A filled square.
    Square,
    /// Decimal numbers starting at 1.
    Decimal,
    /// No marker.
    None,
}

/// [§ 3.2 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FontStyle {
    /// Upright face.
    #[default]
    Normal,
    /// Italic face.
    Italic,
    /// Slanted face.
    Oblique,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_parse_case_insensitively() {
        assert_eq!("ABSOLUTE".parse::<Position>(), Ok(Position::Absolute));
        assert_eq!("both".parse::<Clear>(), Ok(Clear::Both));
        assert!("sideways".parse::<Float>().is_err());
    }

    #[test]
    fn test_keywords_display_lowercase() {
        assert_eq!(Position::Sticky.to_string(), "sticky");
        assert_eq!(Float::None.to_string(), "none");
        assert_eq!(Isolation::Isolate.to_string(), "isolate");
    }
}
