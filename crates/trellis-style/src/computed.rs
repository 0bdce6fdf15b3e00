//! CSS Computed Values
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value..."
//!
//! Unlike a cascade's specified style, every field here always holds a
//! value: a fresh [`ComputedValues`] starts at the CSS initial values and
//! declarations overwrite them in cascade order.

use serde::{Deserialize, Serialize};
use trellis_common::warning::warn_once;
use trellis_geometry::Matrix;

use crate::display::{Display, parse_display};
use crate::error::StyleError;
use crate::font::Font;
use crate::values::{
    Clear, Float, FontStyle, Isolation, LengthPercentage, LengthPercentageOrAuto, ListStyleType,
    Position, Sides, Size, TransformFunction, Visibility, parse_length, parse_length_percentage,
    parse_length_percentage_or_auto, parse_sides, parse_size, parse_transform_list,
    transform_list_to_matrix,
};

/// [§ 4.2 line-height](https://www.w3.org/TR/css-inline-3/#line-height-property)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LineHeight {
    /// "Determine the preferred line height automatically based on font metrics."
    #[default]
    Normal,
    /// "The computed value is the same as the specified value", multiplied
    /// by the element's font size at use time.
    Number(f64),
    /// An absolute line height in pixels.
    Length(f64),
}

impl LineHeight {
    /// `normal` resolves to this multiple of the font size.
    pub const NORMAL_FACTOR: f64 = 1.2;

    /// The used line height for a font of `font_size` pixels.
    pub fn resolve(&self, font_size: f64) -> f64 {
        match self {
            Self::Normal => font_size * Self::NORMAL_FACTOR,
            Self::Number(factor) => font_size * factor,
            Self::Length(px) => *px,
        }
    }
}

/// [§ 3.2 list-style-image](https://www.w3.org/TR/css-lists-3/#image-markers)
///
/// A referenced image. Decoding and fetching belong to other subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageValue {
    /// The image URL as written in `url(...)`.
    pub url: String,
}

/// The full set of computed values for one element or anonymous box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedValues {
    /// [§ 2 display](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Display,
    /// [§ 3 position](https://www.w3.org/TR/css-position-3/#position-property)
    pub position: Position,
    /// [§ 9.5.1 float](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    pub float: Float,
    /// [§ 9.5.2 clear](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    pub clear: Clear,
    /// [§ 3.1 Box Insets](https://www.w3.org/TR/css-position-3/#insets):
    /// `top`, `right`, `bottom`, `left`.
    pub inset: Sides<LengthPercentageOrAuto>,
    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    pub margin: Sides<LengthPercentageOrAuto>,
    /// [§ 8.4 Padding properties](https://www.w3.org/TR/CSS2/box.html#padding-properties)
    pub padding: Sides<LengthPercentage>,
    /// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties), in pixels.
    pub border_width: Sides<f64>,
    /// [§ 3.1 width](https://www.w3.org/TR/css-sizing-3/#preferred-size-properties)
    pub width: Size,
    /// [§ 3.1 height](https://www.w3.org/TR/css-sizing-3/#preferred-size-properties)
    pub height: Size,
    /// `min-width`
    pub min_width: Size,
    /// `min-height`
    pub min_height: Size,
    /// `max-width`
    pub max_width: Size,
    /// `max-height`
    pub max_height: Size,
    /// [§ 9.9.1 z-index](https://www.w3.org/TR/CSS2/visuren.html#z-index).
    /// `None` is `auto`.
    pub z_index: Option<i32>,
    /// [§ 3.2 opacity](https://www.w3.org/TR/css-color-4/#transparency), clamped to `[0, 1]`.
    pub opacity: f32,
    /// [§ 7 transform](https://www.w3.org/TR/css-transforms-1/#transform-property).
    /// Empty is `none`.
    pub transform: Vec<TransformFunction>,
    /// [§ 3.2 isolation](https://drafts.fxtf.org/compositing/#isolation)
    pub isolation: Isolation,
    /// Inherited font longhands.
    pub font: Font,
    /// Inherited.
    pub line_height: LineHeight,
    /// Inherited.
    pub list_style_type: ListStyleType,
    /// Inherited. `None` is `none`.
    pub list_style_image: Option<ImageValue>,
    /// Inherited.
    pub visibility: Visibility,
    /// [§ 1.2 content](https://www.w3.org/TR/css-content-3/#content-property)
    /// for `::before`/`::after`. `None` is `normal`/`none`.
    pub content: Option<String>,
}

impl Default for ComputedValues {
    fn default() -> Self {
        Self::initial()
    }
}

impl ComputedValues {
    /// Every property at its CSS initial value.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            display: Display::inline(),
            position: Position::Static,
            float: Float::None,
            clear: Clear::None,
            inset: Sides::uniform(LengthPercentageOrAuto::Auto),
            margin: Sides::uniform(LengthPercentageOrAuto::zero()),
            padding: Sides::uniform(LengthPercentage::zero()),
            border_width: Sides::uniform(0.0),
            width: Size::Auto,
            height: Size::Auto,
            min_width: Size::Auto,
            min_height: Size::Auto,
            max_width: Size::None,
            max_height: Size::None,
            z_index: None,
            opacity: 1.0,
            transform: Vec::new(),
            isolation: Isolation::Auto,
            font: Font::default(),
            line_height: LineHeight::Normal,
            list_style_type: ListStyleType::Disc,
            list_style_image: None,
            visibility: Visibility::Visible,
            content: None,
        }
    }

    /// [§ 7.2 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inheriting)
    ///
    /// Initial values with the inherited properties copied from `self`.
    /// This is the starting point for a child's (or an anonymous box's) style.
    #[must_use]
    pub fn clone_inherited_values(&self) -> Self {
        Self {
            font: self.font.clone(),
            line_height: self.line_height,
            list_style_type: self.list_style_type,
            list_style_image: self.list_style_image.clone(),
            visibility: self.visibility,
            ..Self::initial()
        }
    }

    /// Whether `transform` is anything other than `none`.
    pub fn has_transform(&self) -> bool {
        !self.transform.is_empty()
    }

    /// The `transform` list composed into a single matrix.
    pub fn transformation_matrix(&self) -> Matrix {
        transform_list_to_matrix(&self.transform)
    }

    /// Used line height for this element's font.
    pub fn used_line_height(&self) -> f64 {
        self.line_height.resolve(self.font.size)
    }

    /// Apply a `;`-separated declaration block.
    ///
    /// Declarations that fail to apply are dropped with a one-time warning,
    /// as a CSS parser drops invalid declarations.
    pub fn apply_declarations(&mut self, block: &str) {
        for declaration in block.split(';') {
            let declaration = declaration.trim();
            if declaration.is_empty() {
                continue;
            }
            let Some((name, value)) = declaration.split_once(':') else {
                let _ = warn_once("CSS", &format!("malformed declaration '{declaration}'"));
                continue;
            };
            if let Err(error) = self.apply_declaration(name.trim(), value.trim()) {
                let _ = warn_once("CSS", &error.to_string());
            }
        }
    }

    /// Apply a single `name: value` declaration.
    ///
    /// # Errors
    ///
    /// [`StyleError::UnknownProperty`] for properties this engine does not
    /// compute and [`StyleError::InvalidValue`] for unparseable values. On
    /// error `self` is unchanged.
    pub fn apply_declaration(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        let property = name.to_ascii_lowercase();
        let invalid = || StyleError::InvalidValue {
            property: name.to_string(),
            value: value.to_string(),
        };
        let font_size = self.font.size;
        let length_percentage = |text: &str| parse_length_percentage(text, font_size);
        let length_percentage_or_auto =
            |text: &str| parse_length_percentage_or_auto(text, font_size);

        match property.as_str() {
            "display" => self.display = parse_display(value).ok_or_else(invalid)?,
            "position" => self.position = value.trim().parse().map_err(|_| invalid())?,
            "float" => self.float = value.trim().parse().map_err(|_| invalid())?,
            "clear" => self.clear = value.trim().parse().map_err(|_| invalid())?,
            "visibility" => self.visibility = value.trim().parse().map_err(|_| invalid())?,
            "isolation" => self.isolation = value.trim().parse().map_err(|_| invalid())?,
            "list-style-type" => {
                self.list_style_type = value.trim().parse().map_err(|_| invalid())?;
            }

            // [§ 3.1 Box Insets]
            "inset" => self.inset = parse_sides(value, length_percentage_or_auto).ok_or_else(invalid)?,
            "top" => self.inset.top = length_percentage_or_auto(value).ok_or_else(invalid)?,
            "right" => self.inset.right = length_percentage_or_auto(value).ok_or_else(invalid)?,
            "bottom" => self.inset.bottom = length_percentage_or_auto(value).ok_or_else(invalid)?,
            "left" => self.inset.left = length_percentage_or_auto(value).ok_or_else(invalid)?,

            // [§ 8.3 Margin properties]
            "margin" => {
                self.margin = parse_sides(value, length_percentage_or_auto).ok_or_else(invalid)?;
            }
            "margin-top" => self.margin.top = length_percentage_or_auto(value).ok_or_else(invalid)?,
            "margin-right" => {
                self.margin.right = length_percentage_or_auto(value).ok_or_else(invalid)?;
            }
            "margin-bottom" => {
                self.margin.bottom = length_percentage_or_auto(value).ok_or_else(invalid)?;
            }
            "margin-left" => {
                self.margin.left = length_percentage_or_auto(value).ok_or_else(invalid)?;
            }

            // [§ 8.4 Padding properties]
            // "Unlike margin properties, values for padding values cannot be negative."
            "padding" => {
                let sides = parse_sides(value, length_percentage).ok_or_else(invalid)?;
                if [sides.top, sides.right, sides.bottom, sides.left]
                    .iter()
                    .any(is_negative)
                {
                    return Err(invalid());
                }
                self.padding = sides;
            }
            "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => {
                let lp = length_percentage(value)
                    .filter(|lp| !is_negative(lp))
                    .ok_or_else(invalid)?;
                match property.as_str() {
                    "padding-top" => self.padding.top = lp,
                    "padding-right" => self.padding.right = lp,
                    "padding-bottom" => self.padding.bottom = lp,
                    _ => self.padding.left = lp,
                }
            }

            // [§ 8.5.1 Border width]
            "border-width" => {
                self.border_width =
                    parse_sides(value, |text| parse_border_width(text, font_size)).ok_or_else(invalid)?;
            }
            "border-top-width" => {
                self.border_width.top = parse_border_width(value, font_size).ok_or_else(invalid)?;
            }
            "border-right-width" => {
                self.border_width.right = parse_border_width(value, font_size).ok_or_else(invalid)?;
            }
            "border-bottom-width" => {
                self.border_width.bottom = parse_border_width(value, font_size).ok_or_else(invalid)?;
            }
            "border-left-width" => {
                self.border_width.left = parse_border_width(value, font_size).ok_or_else(invalid)?;
            }

            // [§ 3.1 Sizing Properties]
            "width" => self.width = parse_size(value, font_size).ok_or_else(invalid)?,
            "height" => self.height = parse_size(value, font_size).ok_or_else(invalid)?,
            "min-width" => self.min_width = parse_size(value, font_size).ok_or_else(invalid)?,
            "min-height" => self.min_height = parse_size(value, font_size).ok_or_else(invalid)?,
            "max-width" => self.max_width = parse_size(value, font_size).ok_or_else(invalid)?,
            "max-height" => self.max_height = parse_size(value, font_size).ok_or_else(invalid)?,

            // [§ 9.9.1 Specifying the stack level: the 'z-index' property]
            // "Value: auto | <integer>"
            "z-index" => {
                let value = value.trim();
                self.z_index = if value.eq_ignore_ascii_case("auto") {
                    None
                } else {
                    Some(value.parse().map_err(|_| invalid())?)
                };
            }

            // [§ 3.2 Transparency: the opacity property]
            // "Any values outside the range 0.0 (fully transparent) to 1.0
            // (fully opaque) will be clamped to this range."
            "opacity" => {
                let value = value.trim();
                let opacity = match value.strip_suffix('%') {
                    Some(pct) => pct.parse::<f32>().map(|p| p / 100.0),
                    None => value.parse::<f32>(),
                }
                .ok()
                .filter(|opacity| opacity.is_finite())
                .ok_or_else(invalid)?;
                self.opacity = opacity.clamp(0.0, 1.0);
            }

            "transform" => {
                self.transform = parse_transform_list(value, font_size).ok_or_else(invalid)?;
            }

            // [§ 3 Basic Font Properties]
            "font-family" => {
                let family = value
                    .split(',')
                    .next()
                    .map(|f| f.trim().trim_matches(['"', '\'']))
                    .filter(|f| !f.is_empty())
                    .ok_or_else(invalid)?;
                self.font.family = family.to_string();
            }
            "font-size" => self.font.size = parse_font_size(value, font_size).ok_or_else(invalid)?,
            "font-weight" => {
                self.font.weight = parse_font_weight(value, self.font.weight).ok_or_else(invalid)?;
            }
            "font-style" => {
                self.font.style = value.trim().parse::<FontStyle>().map_err(|_| invalid())?;
            }

            // [§ 4.2 line-height]
            // "Value: normal | <number [0,∞]> | <length-percentage [0,∞]>"
            "line-height" => {
                let value = value.trim();
                self.line_height = if value.eq_ignore_ascii_case("normal") {
                    LineHeight::Normal
                } else if let Ok(number) = value.parse::<f64>() {
                    if !number.is_finite() || number < 0.0 {
                        return Err(invalid());
                    }
                    LineHeight::Number(number)
                } else {
                    // "Percentages are relative to 1em."
                    let lp = length_percentage(value)
                        .filter(|lp| !is_negative(lp))
                        .ok_or_else(invalid)?;
                    LineHeight::Length(lp.to_px(font_size))
                };
            }

            "list-style-image" => {
                let value = value.trim();
                self.list_style_image = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(parse_url(value).ok_or_else(invalid)?)
                };
            }

            "content" => {
                let value = value.trim();
                self.content = if value.eq_ignore_ascii_case("none")
                    || value.eq_ignore_ascii_case("normal")
                {
                    None
                } else {
                    Some(parse_string(value).ok_or_else(invalid)?)
                };
            }

            _ => return Err(StyleError::UnknownProperty(name.to_string())),
        }
        Ok(())
    }
}

fn is_negative(lp: &LengthPercentage) -> bool {
    match lp {
        LengthPercentage::Length(v) | LengthPercentage::Percentage(v) => *v < 0.0,
    }
}

/// [§ 8.5.1 Border width](https://www.w3.org/TR/CSS2/box.html#border-width-properties)
///
/// "The interpretation of the first three values depends on the user agent.
/// The following relationships must hold, however: thin <= medium <= thick."
fn parse_border_width(text: &str, font_size: f64) -> Option<f64> {
    match text.trim().to_ascii_lowercase().as_str() {
        "thin" => Some(1.0),
        "medium" => Some(3.0),
        "thick" => Some(5.0),
        other => parse_length(other, font_size).filter(|px| *px >= 0.0),
    }
}

/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// `parent_size` is the inherited font size; `em` and percentages resolve
/// against it.
fn parse_font_size(text: &str, parent_size: f64) -> Option<f64> {
    let text = text.trim().to_ascii_lowercase();
    let keyword = match text.as_str() {
        "xx-small" => Some(9.0),
        "x-small" => Some(10.0),
        "small" => Some(13.0),
        "medium" => Some(16.0),
        "large" => Some(18.0),
        "x-large" => Some(24.0),
        "xx-large" => Some(32.0),
        "smaller" => Some(parent_size / 1.2),
        "larger" => Some(parent_size * 1.2),
        _ => None,
    };
    keyword
        .or_else(|| parse_length_percentage(&text, parent_size).map(|lp| lp.to_px(parent_size)))
        .filter(|px| *px >= 0.0)
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
fn parse_font_weight(text: &str, parent_weight: u16) -> Option<u16> {
    match text.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" => Some(700),
        // [§ 3.2.1 Relative Weights]
        "bolder" => Some(match parent_weight {
            0..=349 => 400,
            350..=549 => 700,
            _ => 900,
        }),
        "lighter" => Some(match parent_weight {
            0..=549 => 100,
            550..=749 => 400,
            _ => 700,
        }),
        other => other.parse::<u16>().ok().filter(|w| (1..=1000).contains(w)),
    }
}

fn parse_url(text: &str) -> Option<ImageValue> {
    let inner = text.strip_prefix("url(")?.strip_suffix(')')?.trim();
    let url = inner.trim_matches(['"', '\'']);
    Some(ImageValue {
        url: url.to_string(),
    })
}

fn parse_string(text: &str) -> Option<String> {
    let quote = text.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let inner = text.strip_prefix(quote)?.strip_suffix(quote)?;
    Some(inner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        let values = ComputedValues::initial();
        assert_eq!(values.display, Display::inline());
        assert_eq!(values.position, Position::Static);
        assert_eq!(values.opacity, 1.0);
        assert_eq!(values.z_index, None);
        assert!(!values.has_transform());
        assert_eq!(values.max_width, Size::None);
    }

    #[test]
    fn test_inherited_values_are_copied_and_others_reset() {
        let mut parent = ComputedValues::initial();
        parent.apply_declarations(
            "font-size: 20px; line-height: 2; position: absolute; margin-left: 10px; visibility: hidden",
        );
        let child = parent.clone_inherited_values();
        assert_eq!(child.font.size, 20.0);
        assert_eq!(child.line_height, LineHeight::Number(2.0));
        assert_eq!(child.visibility, Visibility::Hidden);
        assert_eq!(child.position, Position::Static);
        assert_eq!(child.margin.left, LengthPercentageOrAuto::zero());
    }

    #[test]
    fn test_em_lengths_use_font_size() {
        let mut values = ComputedValues::initial();
        values.apply_declarations("font-size: 10px; margin-top: 2em; line-height: 150%");
        assert_eq!(
            values.margin.top,
            LengthPercentageOrAuto::LengthPercentage(LengthPercentage::Length(20.0))
        );
        assert_eq!(values.line_height, LineHeight::Length(15.0));
        assert_eq!(values.used_line_height(), 15.0);
    }

    #[test]
    fn test_errors_leave_values_unchanged() {
        let mut values = ComputedValues::initial();
        assert_eq!(
            values.apply_declaration("colour", "red"),
            Err(StyleError::UnknownProperty("colour".to_string()))
        );
        assert!(matches!(
            values.apply_declaration("padding", "-1px"),
            Err(StyleError::InvalidValue { .. })
        ));
        assert!(values.apply_declaration("position", "floating").is_err());
        assert_eq!(values, ComputedValues::initial());
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut values = ComputedValues::initial();
        values.apply_declarations("opacity: 1.5");
        assert_eq!(values.opacity, 1.0);
        values.apply_declarations("opacity: 50%");
        assert_eq!(values.opacity, 0.5);
    }

    #[test]
    fn test_non_finite_and_negative_values_are_rejected() {
        let mut values = ComputedValues::initial();
        values.apply_declarations("opacity: 0.25; line-height: 2");
        for (name, value) in [
            ("opacity", "nan"),
            ("opacity", "inf"),
            ("opacity", "NaN%"),
            ("line-height", "-1"),
            ("line-height", "NaN"),
            ("line-height", "infinity"),
            ("line-height", "-10px"),
            ("line-height", "-50%"),
            ("margin-left", "nan%"),
        ] {
            assert!(
                matches!(
                    values.apply_declaration(name, value),
                    Err(StyleError::InvalidValue { .. })
                ),
                "{name}: {value}"
            );
        }
        assert_eq!(values.opacity, 0.25);
        assert_eq!(values.line_height, LineHeight::Number(2.0));

        values.apply_declarations("line-height: 0");
        assert_eq!(values.line_height, LineHeight::Number(0.0));
    }

    #[test]
    fn test_content_and_list_image() {
        let mut values = ComputedValues::initial();
        values.apply_declarations("content: \"> \"; list-style-image: url('dot.png')");
        assert_eq!(values.content.as_deref(), Some("> "));
        assert_eq!(
            values.list_style_image,
            Some(ImageValue {
                url: "dot.png".to_string()
            })
        );
    }

    #[test]
    fn test_font_weight_keywords() {
        assert_eq!(parse_font_weight("bold", 400), Some(700));
        assert_eq!(parse_font_weight("bolder", 400), Some(700));
        assert_eq!(parse_font_weight("lighter", 700), Some(400));
        assert_eq!(parse_font_weight("1001", 400), None);
    }
}
