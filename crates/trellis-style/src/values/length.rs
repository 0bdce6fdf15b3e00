//! CSS length, percentage and size values
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Computed lengths are absolute: font-relative units are resolved against
//! the element's font size while the declaration is applied, so every
//! `Length` below is in CSS pixels.

use serde::{Deserialize, Serialize};
use trellis_geometry::serialize_number;

/// User agent default font size.
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 4.3 Mixing Percentages and Dimensions](https://www.w3.org/TR/css-values-4/#mixed-percentages)
///
/// "`<length-percentage>` = `[ <length> | <percentage> ]`"
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LengthPercentage {
    /// An absolute length in CSS pixels.
    Length(f64),
    /// A percentage of some reference length (usually the containing block).
    Percentage(f64),
}

impl LengthPercentage {
    /// `0px`, the initial value of margins and padding.
    #[must_use]
    pub const fn zero() -> Self {
        Self::Length(0.0)
    }

    /// Whether this is a zero length or zero percentage.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Length(v) | Self::Percentage(v) => *v == 0.0,
        }
    }

    /// Resolve against a reference length.
    ///
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    /// NOTE: Margin and padding percentages resolve against the containing
    /// block's **width**, even for top/bottom.
    pub fn to_px(&self, reference: f64) -> f64 {
        match self {
            Self::Length(px) => *px,
            Self::Percentage(pct) => pct * reference / 100.0,
        }
    }

    /// Serialize as a CSS value (`10px`, `50%`).
    pub fn to_css(&self) -> String {
        match self {
            Self::Length(px) => format!("{}px", serialize_number(*px)),
            Self::Percentage(pct) => format!("{}%", serialize_number(*pct)),
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "`<margin-width>` = `<length>` | `<percentage>` | auto"
///
/// Used for margins and the inset properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LengthPercentageOrAuto {
    /// The keyword `auto`, resolved during layout.
    Auto,
    /// A length or percentage.
    LengthPercentage(LengthPercentage),
}

impl LengthPercentageOrAuto {
    /// `0px`.
    #[must_use]
    pub const fn zero() -> Self {
        Self::LengthPercentage(LengthPercentage::zero())
    }

    /// Check if the value is `auto`.
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against a reference length, or 0 if `auto`.
    pub fn to_px(&self, reference: f64) -> f64 {
        match self {
            Self::Auto => 0.0,
            Self::LengthPercentage(lp) => lp.to_px(reference),
        }
    }

    /// Serialize as a CSS value.
    pub fn to_css(&self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::LengthPercentage(lp) => lp.to_css(),
        }
    }
}

/// [§ 3.1 Sizing Properties](https://www.w3.org/TR/css-sizing-3/#sizing-properties)
///
/// Values of `width`, `height`, `min-*` and `max-*`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Size {
    /// `auto`
    Auto,
    /// `none`, only meaningful for `max-width`/`max-height`.
    None,
    /// A definite length or percentage.
    LengthPercentage(LengthPercentage),
    /// `min-content`
    MinContent,
    /// `max-content`
    MaxContent,
    /// `fit-content`
    FitContent,
}

impl Size {
    /// Check if the value is `auto`.
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Serialize as a CSS value.
    pub fn to_css(&self) -> String {
        match self {
            Self::Auto => "auto".to_string(),
            Self::None => "none".to_string(),
            Self::LengthPercentage(lp) => lp.to_css(),
            Self::MinContent => "min-content".to_string(),
            Self::MaxContent => "max-content".to_string(),
            Self::FitContent => "fit-content".to_string(),
        }
    }
}

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// Parse a `<length>` and compute it to pixels. Unitless zero is accepted.
pub fn parse_length(text: &str, font_size: f64) -> Option<f64> {
    let text = text.trim();
    if text == "0" {
        return Some(0.0);
    }
    let split = text
        .find(|c: char| c.is_ascii_alphabetic())
        .filter(|&at| at > 0)?;
    let (number, unit) = text.split_at(split);
    let value = number.parse::<f64>().ok().filter(|v| v.is_finite())?;
    match unit.to_ascii_lowercase().as_str() {
        // [§ 6.1 Absolute lengths] "1px = 1/96th of 1in"
        "px" => Some(value),
        // "1pt = 1/72th of 1in"
        "pt" => Some(value * 96.0 / 72.0),
        "in" => Some(value * 96.0),
        // [§ 5.1.1 Font-relative lengths]
        // "Equal to the computed value of the font-size property of the element"
        "em" => Some(value * font_size),
        "rem" => Some(value * DEFAULT_FONT_SIZE_PX),
        _ => None,
    }
}

/// Parse a `<length-percentage>`.
pub fn parse_length_percentage(text: &str, font_size: f64) -> Option<LengthPercentage> {
    let text = text.trim();
    if let Some(number) = text.strip_suffix('%') {
        return number
            .parse::<f64>()
            .ok()
            .filter(|pct| pct.is_finite())
            .map(LengthPercentage::Percentage);
    }
    parse_length(text, font_size).map(LengthPercentage::Length)
}

/// Parse `auto | <length-percentage>`.
pub fn parse_length_percentage_or_auto(
    text: &str,
    font_size: f64,
) -> Option<LengthPercentageOrAuto> {
    if text.trim().eq_ignore_ascii_case("auto") {
        return Some(LengthPercentageOrAuto::Auto);
    }
    parse_length_percentage(text, font_size).map(LengthPercentageOrAuto::LengthPercentage)
}

/// Parse a sizing value.
pub fn parse_size(text: &str, font_size: f64) -> Option<Size> {
    match text.trim().to_ascii_lowercase().as_str() {
        "auto" => Some(Size::Auto),
        "none" => Some(Size::None),
        "min-content" => Some(Size::MinContent),
        "max-content" => Some(Size::MaxContent),
        "fit-content" => Some(Size::FitContent),
        other => parse_length_percentage(other, font_size).map(Size::LengthPercentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_units() {
        assert_eq!(parse_length("10px", 16.0), Some(10.0));
        assert_eq!(parse_length("2em", 20.0), Some(40.0));
        assert_eq!(parse_length("1rem", 20.0), Some(16.0));
        assert_eq!(parse_length("0", 16.0), Some(0.0));
        assert_eq!(parse_length("12", 16.0), None);
        assert_eq!(parse_length("px", 16.0), None);
        assert_eq!(parse_length("3furlongs", 16.0), None);
    }

    #[test]
    fn test_parses_percentages_and_auto() {
        assert_eq!(
            parse_length_percentage("50%", 16.0),
            Some(LengthPercentage::Percentage(50.0))
        );
        assert_eq!(
            parse_length_percentage_or_auto("AUTO", 16.0),
            Some(LengthPercentageOrAuto::Auto)
        );
        assert_eq!(parse_size("fit-content", 16.0), Some(Size::FitContent));
    }

    #[test]
    fn test_serializes_to_css() {
        assert_eq!(LengthPercentage::Length(10.0).to_css(), "10px");
        assert_eq!(LengthPercentage::Percentage(12.5).to_css(), "12.5%");
        assert_eq!(LengthPercentageOrAuto::Auto.to_css(), "auto");
        assert_eq!(Size::MaxContent.to_css(), "max-content");
    }
}
