//! Computed style for the Trellis layout tree.
//!
//! - [`ComputedValues`] - the resolved value of every property the layout tree reads
//! - [`Display`] and the value types in [`values`]
//! - [`Font`] and the [`FontCache`] capability
//! - [`StyleResolver`] - the seam tree construction resolves styles through,
//!   with [`StyleMap`] as a small selector-based implementation

pub mod computed;
pub mod display;
mod error;
pub mod font;
pub mod resolver;
mod ua;
pub mod values;

pub use computed::{ComputedValues, ImageValue, LineHeight};
pub use display::{Display, InnerDisplayType, OuterDisplayType, parse_display};
pub use error::StyleError;
pub use font::{Font, FontCache, ScaledFontCache};
pub use resolver::{CompoundSelector, PseudoElement, StyleMap, StyleResolver};
pub use ua::user_agent_declarations;
