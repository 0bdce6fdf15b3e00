//! Per-pass layout configuration.

use serde::{Deserialize, Serialize};

use crate::box_model::Rect;

/// Knobs shared by tree construction and the resolver pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Device pixels per CSS pixel, used to pick scaled fonts.
    pub device_pixels_per_css_pixel: f32,
    /// [§ 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
    ///
    /// "The containing block in which the root element lives is a rectangle
    /// called the initial containing block. For continuous media, it has the
    /// dimensions of the viewport and is anchored at the canvas origin."
    pub viewport: Rect,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            device_pixels_per_css_pixel: 1.0,
            viewport: Rect {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0,
            },
        }
    }
}

impl LayoutConfig {
    /// Builder-style device scale setter.
    #[must_use]
    pub const fn with_device_pixels_per_css_pixel(mut self, scale: f32) -> Self {
        self.device_pixels_per_css_pixel = scale;
        self
    }

    /// Builder-style viewport size setter; the origin stays at 0,0.
    #[must_use]
    pub const fn with_viewport_size(mut self, width: f32, height: f32) -> Self {
        self.viewport.width = width;
        self.viewport.height = height;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{ "device_pixels_per_css_pixel": 2.0 }"#).unwrap();
        assert_eq!(config.device_pixels_per_css_pixel, 2.0);
        assert_eq!(config.viewport.width, 800.0);
    }

    #[test]
    fn test_builders() {
        let config = LayoutConfig::default()
            .with_device_pixels_per_css_pixel(1.5)
            .with_viewport_size(1024.0, 768.0);
        assert_eq!(config.device_pixels_per_css_pixel, 1.5);
        assert_eq!((config.viewport.width, config.viewport.height), (1024.0, 768.0));
    }
}
