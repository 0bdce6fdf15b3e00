//! Errors reported by geometry operations.

use thiserror::Error;

/// Degenerate or invalid geometry input.
///
/// These are expected conditions: callers substitute a fallback (usually
/// treating the transformed box as unrenderable for the frame).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The determinant is exactly zero.
    #[error("matrix is not invertible")]
    NotInvertible,

    /// A 2D alias and its 3D component were both given and disagree.
    #[error("'{name_2d}' and '{name_3d}' must be the same value")]
    InconsistentComponent {
        /// The 2D alias (`a` through `f`).
        name_2d: &'static str,
        /// The 3D component it aliases.
        name_3d: &'static str,
    },

    /// `is2d` was set but a 3D-only component has a non-identity value.
    #[error("'is2d' is true but '{component}' has a non-2D value")]
    NotTwoDimensional {
        /// The offending component.
        component: &'static str,
    },

    /// A sequence initializer had neither 6 nor 16 elements.
    #[error("matrix sequence must have 6 or 16 elements, got {len}")]
    InvalidLength {
        /// Number of elements supplied.
        len: usize,
    },

    /// Serialization was requested for a matrix with NaN or infinite components.
    #[error("cannot serialize a matrix with non-finite components")]
    NonFinite,
}
