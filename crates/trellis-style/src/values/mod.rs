//! CSS value types used by computed style.

mod keywords;
mod length;
mod sides;
mod transform;

pub use keywords::{Clear, Float, FontStyle, Isolation, ListStyleType, Position, Visibility};
pub use length::{
    DEFAULT_FONT_SIZE_PX, LengthPercentage, LengthPercentageOrAuto, Size, parse_length,
    parse_length_percentage, parse_length_percentage_or_auto, parse_size,
};
pub use sides::{Sides, parse_sides};
pub use transform::{
    TransformFunction, parse_transform_list, transform_list_to_matrix,
};
