//! Geometry value types for the Trellis layout tree.
//!
//! [Geometry Interfaces Module Level 1](https://drafts.fxtf.org/geometry/)
//!
//! - [`Matrix`] - 4x4 homogeneous transform matrix with 2D convenience accessors
//! - [`MatrixInit`] - dictionary form validated by [`MatrixInit::validate_and_fixup`]
//! - [`Point`] - homogeneous point consumed and produced by [`Matrix::transform_point`]

mod error;
mod matrix;
mod point;

pub use error::GeometryError;
pub use matrix::{Matrix, MatrixInit, serialize_number};
pub use point::Point;
