//! [§ 4 DOMPoint](https://drafts.fxtf.org/geometry/#DOMPoint)

use serde::{Deserialize, Serialize};

/// A homogeneous point `(x, y, z, w)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// Depth coordinate.
    pub z: f64,
    /// Perspective component.
    pub w: f64,
}

impl Point {
    /// A point on the `z = 0` plane with `w = 1`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0, w: 1.0 }
    }

    /// A point with every component given.
    #[must_use]
    pub const fn new_3d(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
