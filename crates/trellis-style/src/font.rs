//! Fonts and the scaled-font cache capability.
//!
//! [§ 3 Basic Font Properties](https://www.w3.org/TR/css-fonts-4/#basic-font-props)

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::values::{DEFAULT_FONT_SIZE_PX, FontStyle};

/// A font selection: the computed `font-*` longhands for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// [§ 3.1 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    pub family: String,
    /// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop), in pixels.
    pub size: f64,
    /// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    pub weight: u16,
    /// [§ 3.3 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    pub style: FontStyle,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "serif".to_string(),
            size: DEFAULT_FONT_SIZE_PX,
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

impl Font {
    /// The same face at `scale` times the size.
    #[must_use]
    pub fn with_scale(&self, scale: f32) -> Self {
        Self {
            size: self.size * f64::from(scale),
            ..self.clone()
        }
    }
}

/// Lookup of device-scaled fonts, keyed by font and device pixel ratio.
///
/// Passed explicitly into style application; the layout tree never reaches
/// for a global cache. Eviction is up to the implementation.
pub trait FontCache {
    /// The font for `font` rendered at `scale` device pixels per CSS pixel.
    fn scaled_font(&mut self, font: &Font, scale: f32) -> Rc<Font>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FontKey {
    family: String,
    size_bits: u64,
    weight: u16,
    style: FontStyle,
    scale_bits: u32,
}

impl FontKey {
    fn new(font: &Font, scale: f32) -> Self {
        Self {
            family: font.family.clone(),
            size_bits: font.size.to_bits(),
            weight: font.weight,
            style: font.style,
            scale_bits: scale.to_bits(),
        }
    }
}

/// [`FontCache`] backed by an unbounded map.
#[derive(Debug, Default)]
pub struct ScaledFontCache {
    fonts: HashMap<FontKey, Rc<Font>>,
}

impl ScaledFontCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct scaled fonts held.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every cached font.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }
}

impl FontCache for ScaledFontCache {
    fn scaled_font(&mut self, font: &Font, scale: f32) -> Rc<Font> {
        Rc::clone(
            self.fonts
                .entry(FontKey::new(font, scale))
                .or_insert_with(|| {
                    tracing::trace!(family = %font.family, size = font.size, scale, "scaling font");
                    Rc::new(font.with_scale(scale))
                }),
        )
    }
}
