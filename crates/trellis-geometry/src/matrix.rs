//! [§ 6 DOMMatrix](https://drafts.fxtf.org/geometry/#DOMMatrix)
//!
//! The abstract matrix is a column-major 4x4 homogeneous matrix:
//!
//! ```text
//! | m11 m21 m31 m41 |
//! | m12 m22 m32 m42 |
//! | m13 m23 m33 m43 |
//! | m14 m24 m34 m44 |
//! ```
//!
//! Points are column vectors, so `m41`/`m42` hold the 2D translation. The
//! backing storage is an `euclid` transform whose `mRC` fields use the same
//! names; euclid applies `a.then(&b)` as "a first, then b", which is
//! `b × a` in column-vector notation.

use euclid::default::Transform3D;

use crate::{GeometryError, Point};

/// A 4x4 transform matrix plus the "is 2D" flag from CSS Geometry § 6 (DOMMatrix).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    transform: Transform3D<f64>,
    is_2d: bool,
}

impl Matrix {
    /// The identity matrix.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            transform: Transform3D::identity(),
            is_2d: true,
        }
    }

    /// [§ 6.1 create a 2d matrix](https://drafts.fxtf.org/geometry/#create-a-2d-matrix)
    ///
    /// Six values `a, b, c, d, e, f` mapped to `m11, m12, m21, m22, m41, m42`.
    #[must_use]
    pub fn new_2d(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            transform: Transform3D::new(
                a, b, 0.0, 0.0, //
                c, d, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                e, f, 0.0, 1.0,
            ),
            is_2d: true,
        }
    }

    /// [§ 6.1 create a 3d matrix](https://drafts.fxtf.org/geometry/#create-a-3d-matrix)
    ///
    /// Sixteen values in column-major order, `m11` through `m44`.
    #[must_use]
    pub fn new_3d(m: [f64; 16]) -> Self {
        Self {
            transform: Transform3D::new(
                m[0], m[1], m[2], m[3], //
                m[4], m[5], m[6], m[7], //
                m[8], m[9], m[10], m[11], //
                m[12], m[13], m[14], m[15],
            ),
            is_2d: false,
        }
    }

    /// Construct from a numeric sequence: 6 values make a 2D matrix, 16 a 3D one.
    ///
    /// # Errors
    ///
    /// [`GeometryError::InvalidLength`] for any other length.
    pub fn from_sequence(values: &[f64]) -> Result<Self, GeometryError> {
        match *values {
            [a, b, c, d, e, f] => Ok(Self::new_2d(a, b, c, d, e, f)),
            _ => {
                let array: [f64; 16] = values
                    .try_into()
                    .map_err(|_| GeometryError::InvalidLength { len: values.len() })?;
                Ok(Self::new_3d(array))
            }
        }
    }

    /// [§ 6.1 create a DOMMatrix from a dictionary](https://drafts.fxtf.org/geometry/#create-a-dommatrix-from-the-dictionary)
    ///
    /// # Errors
    ///
    /// Any validation error from [`MatrixInit::validate_and_fixup`].
    pub fn from_init(mut init: MatrixInit) -> Result<Self, GeometryError> {
        init.validate_and_fixup()?;
        let fixed = init.fixed_2d();
        if init.is_2d == Some(true) {
            return Ok(Self::new_2d(
                fixed[0], fixed[1], fixed[2], fixed[3], fixed[4], fixed[5],
            ));
        }
        Ok(Self::new_3d([
            fixed[0], fixed[1], init.m13, init.m14, //
            fixed[2], fixed[3], init.m23, init.m24, //
            init.m31, init.m32, init.m33, init.m34, //
            fixed[4], fixed[5], init.m43, init.m44,
        ]))
    }

    /// Column 1, row 1.
    pub const fn m11(&self) -> f64 {
        self.transform.m11
    }
    /// Column 1, row 2.
    pub const fn m12(&self) -> f64 {
        self.transform.m12
    }
    /// Column 1, row 3.
    pub const fn m13(&self) -> f64 {
        self.transform.m13
    }
    /// Column 1, row 4.
    pub const fn m14(&self) -> f64 {
        self.transform.m14
    }
    /// Column 2, row 1.
    pub const fn m21(&self) -> f64 {
        self.transform.m21
    }
    /// Column 2, row 2.
    pub const fn m22(&self) -> f64 {
        self.transform.m22
    }
    /// Column 2, row 3.
    pub const fn m23(&self) -> f64 {
        self.transform.m23
    }
    /// Column 2, row 4.
    pub const fn m24(&self) -> f64 {
        self.transform.m24
    }
    /// Column 3, row 1.
    pub const fn m31(&self) -> f64 {
        self.transform.m31
    }
    /// Column 3, row 2.
    pub const fn m32(&self) -> f64 {
        self.transform.m32
    }
    /// Column 3, row 3.
    pub const fn m33(&self) -> f64 {
        self.transform.m33
    }
    /// Column 3, row 4.
    pub const fn m34(&self) -> f64 {
        self.transform.m34
    }
    /// Column 4, row 1 (x translation).
    pub const fn m41(&self) -> f64 {
        self.transform.m41
    }
    /// Column 4, row 2 (y translation).
    pub const fn m42(&self) -> f64 {
        self.transform.m42
    }
    /// Column 4, row 3 (z translation).
    pub const fn m43(&self) -> f64 {
        self.transform.m43
    }
    /// Column 4, row 4.
    pub const fn m44(&self) -> f64 {
        self.transform.m44
    }

    /// 2D alias for `m11`.
    pub const fn a(&self) -> f64 {
        self.m11()
    }
    /// 2D alias for `m12`.
    pub const fn b(&self) -> f64 {
        self.m12()
    }
    /// 2D alias for `m21`.
    pub const fn c(&self) -> f64 {
        self.m21()
    }
    /// 2D alias for `m22`.
    pub const fn d(&self) -> f64 {
        self.m22()
    }
    /// 2D alias for `m41`.
    pub const fn e(&self) -> f64 {
        self.m41()
    }
    /// 2D alias for `m42`.
    pub const fn f(&self) -> f64 {
        self.m42()
    }

    /// Whether the matrix was created as, and has stayed, a 2D matrix.
    pub const fn is_2d(&self) -> bool {
        self.is_2d
    }

    /// [§ 6.3](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-isidentity)
    pub fn is_identity(&self) -> bool {
        self.transform == Transform3D::identity()
    }

    /// The 16 components in column-major order, `m11` first.
    pub fn to_array(&self) -> [f64; 16] {
        self.transform.to_array()
    }

    /// Determinant of the full 4x4 matrix.
    pub fn determinant(&self) -> f64 {
        self.transform.determinant()
    }

    /// [§ 6.4 multiply](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-multiply)
    ///
    /// Returns `self × other`: `other` is applied to a point first.
    #[must_use]
    pub fn multiply(&self, other: &Self) -> Self {
        Self {
            transform: other.transform.then(&self.transform),
            is_2d: self.is_2d && other.is_2d,
        }
    }

    /// Fallible form of [`Matrix::multiply`] for dictionary operands.
    ///
    /// # Errors
    ///
    /// Any validation error from [`MatrixInit::validate_and_fixup`].
    pub fn multiply_init(&self, other: MatrixInit) -> Result<Self, GeometryError> {
        Ok(self.multiply(&Self::from_init(other)?))
    }

    /// [§ 6.4 translate](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-translate)
    #[must_use]
    pub fn translate(&self, tx: f64, ty: f64, tz: f64) -> Self {
        let mut translation = Self::new_2d(1.0, 0.0, 0.0, 1.0, tx, ty);
        if tz != 0.0 {
            translation.transform.m43 = tz;
            translation.is_2d = false;
        }
        self.multiply(&translation)
    }

    /// [§ 6.4 scale](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-scale)
    ///
    /// Non-uniform 2D scale about the origin.
    #[must_use]
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        self.multiply(&Self::new_2d(sx, 0.0, 0.0, sy, 0.0, 0.0))
    }

    /// [§ 6.4 rotate](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-rotate)
    ///
    /// Rotation about the z axis by `degrees`, clockwise in a y-down
    /// coordinate system.
    #[must_use]
    pub fn rotate(&self, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.multiply(&Self::new_2d(cos, sin, -sin, cos, 0.0, 0.0))
    }

    /// [§ 6.4 skewX](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-skewx)
    #[must_use]
    pub fn skew_x(&self, degrees: f64) -> Self {
        self.multiply(&Self::new_2d(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0))
    }

    /// [§ 6.4 skewY](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-skewy)
    #[must_use]
    pub fn skew_y(&self, degrees: f64) -> Self {
        self.multiply(&Self::new_2d(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0))
    }

    /// [§ 6.4 flipX](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-flipx)
    #[must_use]
    pub fn flip_x(&self) -> Self {
        self.multiply(&Self::new_2d(-1.0, 0.0, 0.0, 1.0, 0.0, 0.0))
    }

    /// [§ 6.4 flipY](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-flipy)
    #[must_use]
    pub fn flip_y(&self) -> Self {
        self.multiply(&Self::new_2d(1.0, 0.0, 0.0, -1.0, 0.0, 0.0))
    }

    /// [§ 6.4 inverse](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-inverse)
    ///
    /// # Errors
    ///
    /// [`GeometryError::NotInvertible`] when the determinant is exactly zero
    /// (or not finite). No matrix of NaNs or infinities is ever returned.
    pub fn inverse(&self) -> Result<Self, GeometryError> {
        if self.is_identity() {
            return Ok(*self);
        }
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(GeometryError::NotInvertible);
        }
        let transform = self.transform.inverse().ok_or(GeometryError::NotInvertible)?;
        Ok(Self {
            transform,
            is_2d: self.is_2d,
        })
    }

    /// Whether [`Matrix::inverse`] would succeed.
    pub fn is_invertible(&self) -> bool {
        self.inverse().is_ok()
    }

    /// [§ 6.4 transformPoint](https://drafts.fxtf.org/geometry/#dom-dommatrixreadonly-transformpoint)
    ///
    /// Post-multiplies the point as a column vector: `self × point`.
    pub fn transform_point(&self, point: Point) -> Point {
        let t = &self.transform;
        Point {
            x: t.m11 * point.x + t.m21 * point.y + t.m31 * point.z + t.m41 * point.w,
            y: t.m12 * point.x + t.m22 * point.y + t.m32 * point.z + t.m42 * point.w,
            z: t.m13 * point.x + t.m23 * point.y + t.m33 * point.z + t.m43 * point.w,
            w: t.m14 * point.x + t.m24 * point.y + t.m34 * point.z + t.m44 * point.w,
        }
    }

    /// [§ 6.5 Serialization](https://drafts.fxtf.org/geometry/#dommatrixreadonly-stringification-behavior)
    ///
    /// `matrix(a, b, c, d, e, f)` for 2D matrices, otherwise
    /// `matrix3d(m11, ..., m44)`.
    ///
    /// # Errors
    ///
    /// [`GeometryError::NonFinite`] if any component is NaN or infinite.
    pub fn to_css_string(&self) -> Result<String, GeometryError> {
        let values = self.to_array();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        if self.is_2d {
            let parts = [self.a(), self.b(), self.c(), self.d(), self.e(), self.f()];
            return Ok(format!("matrix({})", join_numbers(&parts)));
        }
        Ok(format!("matrix3d({})", join_numbers(&values)))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|&v| serialize_number(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Number serialization matching script `ToString` for the common cases:
/// integral values print without a fraction and `-0` prints as `0`.
pub fn serialize_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// [§ 6.1 DOMMatrixInit](https://drafts.fxtf.org/geometry/#dictdef-dommatrixinit)
///
/// Dictionary initializer. 2D aliases are optional and are reconciled with
/// their 3D components by [`MatrixInit::validate_and_fixup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixInit {
    /// Alias of `m11`.
    pub a: Option<f64>,
    /// Alias of `m12`.
    pub b: Option<f64>,
    /// Alias of `m21`.
    pub c: Option<f64>,
    /// Alias of `m22`.
    pub d: Option<f64>,
    /// Alias of `m41`.
    pub e: Option<f64>,
    /// Alias of `m42`.
    pub f: Option<f64>,
    /// Column 1, row 1.
    pub m11: Option<f64>,
    /// Column 1, row 2.
    pub m12: Option<f64>,
    /// Column 2, row 1.
    pub m21: Option<f64>,
    /// Column 2, row 2.
    pub m22: Option<f64>,
    /// Column 4, row 1.
    pub m41: Option<f64>,
    /// Column 4, row 2.
    pub m42: Option<f64>,
    /// Column 1, row 3.
    pub m13: f64,
    /// Column 1, row 4.
    pub m14: f64,
    /// Column 2, row 3.
    pub m23: f64,
    /// Column 2, row 4.
    pub m24: f64,
    /// Column 3, row 1.
    pub m31: f64,
    /// Column 3, row 2.
    pub m32: f64,
    /// Column 3, row 3.
    pub m33: f64,
    /// Column 3, row 4.
    pub m34: f64,
    /// Column 4, row 3.
    pub m43: f64,
    /// Column 4, row 4.
    pub m44: f64,
    /// Explicit 2D flag; inferred during fixup when absent.
    pub is_2d: Option<bool>,
}

impl Default for MatrixInit {
    fn default() -> Self {
        Self {
            a: None,
            b: None,
            c: None,
            d: None,
            e: None,
            f: None,
            m11: None,
            m12: None,
            m21: None,
            m22: None,
            m41: None,
            m42: None,
            m13: 0.0,
            m14: 0.0,
            m23: 0.0,
            m24: 0.0,
            m31: 0.0,
            m32: 0.0,
            m33: 1.0,
            m34: 0.0,
            m43: 0.0,
            m44: 1.0,
            is_2d: None,
        }
    }
}

impl MatrixInit {
    /// [§ 6.1 validate and fixup](https://drafts.fxtf.org/geometry/#matrix-validate-and-fixup)
    ///
    /// # Errors
    ///
    /// - [`GeometryError::InconsistentComponent`] if a 2D alias and its 3D
    ///   component are both present and differ.
    /// - [`GeometryError::NotTwoDimensional`] if `is_2d` is `true` and any
    ///   3D-only component has a non-identity value.
    pub fn validate_and_fixup(&mut self) -> Result<(), GeometryError> {
        // STEP 1: Reconcile each 2D alias with its 3D component.
        let pairs: [(&'static str, &'static str, Option<f64>, &mut Option<f64>, f64); 6] = [
            ("a", "m11", self.a, &mut self.m11, 1.0),
            ("b", "m12", self.b, &mut self.m12, 0.0),
            ("c", "m21", self.c, &mut self.m21, 0.0),
            ("d", "m22", self.d, &mut self.m22, 1.0),
            ("e", "m41", self.e, &mut self.m41, 0.0),
            ("f", "m42", self.f, &mut self.m42, 0.0),
        ];
        for (name_2d, name_3d, alias, component, initial) in pairs {
            match (alias, *component) {
                (Some(alias), Some(value)) if !same_value_zero(alias, value) => {
                    return Err(GeometryError::InconsistentComponent { name_2d, name_3d });
                }
                (alias, None) => *component = Some(alias.unwrap_or(initial)),
                _ => {}
            }
        }

        // STEP 2: Check or infer the 2D flag from the 3D-only components.
        let three_d_only = [
            ("m13", self.m13, 0.0),
            ("m14", self.m14, 0.0),
            ("m23", self.m23, 0.0),
            ("m24", self.m24, 0.0),
            ("m31", self.m31, 0.0),
            ("m32", self.m32, 0.0),
            ("m33", self.m33, 1.0),
            ("m34", self.m34, 0.0),
            ("m43", self.m43, 0.0),
            ("m44", self.m44, 1.0),
        ];
        let offending = three_d_only
            .iter()
            .find(|(_, value, identity)| !same_value_zero(*value, *identity))
            .map(|(name, _, _)| *name);
        match (self.is_2d, offending) {
            (Some(true), Some(component)) => Err(GeometryError::NotTwoDimensional { component }),
            (None, offending) => {
                self.is_2d = Some(offending.is_none());
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `[m11, m12, m21, m22, m41, m42]` after fixup, defaulting to identity.
    fn fixed_2d(&self) -> [f64; 6] {
        [
            self.m11.unwrap_or(1.0),
            self.m12.unwrap_or(0.0),
            self.m21.unwrap_or(0.0),
            self.m22.unwrap_or(1.0),
            self.m41.unwrap_or(0.0),
            self.m42.unwrap_or(0.0),
        ]
    }
}

/// `SameValueZero`: NaN equals NaN and `+0` equals `-0`.
fn same_value_zero(lhs: f64, rhs: f64) -> bool {
    (lhs.is_nan() && rhs.is_nan()) || lhs == rhs
}
