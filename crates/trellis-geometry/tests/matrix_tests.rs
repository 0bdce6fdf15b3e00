//! Integration tests for the matrix value type.

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;
use trellis_geometry::{GeometryError, Matrix, MatrixInit, Point};

fn approx(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() <= 1e-9 * lhs.abs().max(rhs.abs()).max(1.0)
}

#[test]
fn test_identity_is_identity_and_2d() {
    let m = Matrix::identity();
    assert!(m.is_identity());
    assert!(m.is_2d());
    assert_eq!(m, Matrix::default());
}

#[test]
fn test_new_2d_maps_aliases() {
    let m = Matrix::new_2d(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
    assert_eq!(m.m11(), 1.0);
    assert_eq!(m.m12(), 2.0);
    assert_eq!(m.m21(), 3.0);
    assert_eq!(m.m22(), 4.0);
    assert_eq!(m.m41(), 5.0);
    assert_eq!(m.m42(), 6.0);
    assert_eq!(m.m33(), 1.0);
    assert_eq!(m.m44(), 1.0);
    assert_eq!((m.a(), m.b(), m.c(), m.d(), m.e(), m.f()), (1.0, 2.0, 3.0, 4.0, 5.0, 6.0));
}

#[test]
fn test_from_sequence_lengths() {
    assert!(Matrix::from_sequence(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]).is_ok_and(|m| m.is_2d()));

    let mut values = [0.0; 16];
    values[0] = 1.0;
    values[5] = 1.0;
    values[10] = 1.0;
    values[15] = 1.0;
    let m = Matrix::from_sequence(&values).expect("16 values");
    assert!(!m.is_2d());
    assert!(m.is_identity());

    assert_eq!(
        Matrix::from_sequence(&[1.0, 2.0, 3.0]),
        Err(GeometryError::InvalidLength { len: 3 })
    );
}

#[test]
fn test_identity_inverse_is_identity() {
    let inverse = Matrix::identity().inverse().expect("identity is invertible");
    assert_eq!(inverse, Matrix::identity());
}

#[test]
fn test_zero_scale_is_not_invertible() {
    let m = Matrix::identity().scale(0.0, 0.0);
    assert_eq!(m.inverse(), Err(GeometryError::NotInvertible));
    assert!(!m.is_invertible());
}

#[test]
fn test_inverse_of_translate() {
    let m = Matrix::identity().translate(10.0, -4.0, 0.0);
    let inverse = m.inverse().expect("translation is invertible");
    let p = inverse.transform_point(Point::new(10.0, -4.0));
    assert!(approx(p.x, 0.0));
    assert!(approx(p.y, 0.0));
}

#[test]
fn test_translate_with_z_is_3d() {
    let m = Matrix::identity().translate(1.0, 2.0, 3.0);
    assert!(!m.is_2d());
    assert_eq!(m.m43(), 3.0);
    let p = m.transform_point(Point::new(0.0, 0.0));
    assert_eq!((p.x, p.y, p.z, p.w), (1.0, 2.0, 3.0, 1.0));
}

#[test]
fn test_rotate_quarter_turn() {
    let m = Matrix::identity().rotate(90.0);
    let p = m.transform_point(Point::new(1.0, 0.0));
    assert!(approx(p.x, 0.0));
    assert!(approx(p.y, 1.0));
}

#[test]
fn test_flip_and_skew() {
    let p = Matrix::identity().flip_x().transform_point(Point::new(3.0, 4.0));
    assert_eq!((p.x, p.y), (-3.0, 4.0));
    let p = Matrix::identity().flip_y().transform_point(Point::new(3.0, 4.0));
    assert_eq!((p.x, p.y), (3.0, -4.0));

    let skewed = Matrix::identity().skew_x(45.0).transform_point(Point::new(0.0, 2.0));
    assert!(approx(skewed.x, 2.0));
    assert!(approx(skewed.y, 2.0));
    let skewed = Matrix::identity().skew_y(45.0).transform_point(Point::new(2.0, 0.0));
    assert!(approx(skewed.x, 2.0));
    assert!(approx(skewed.y, 2.0));
}

#[test]
fn test_multiply_2d_with_3d_is_3d() {
    let flat = Matrix::identity().scale(2.0, 2.0);
    let deep = Matrix::identity().translate(0.0, 0.0, 5.0);
    assert!(!flat.multiply(&deep).is_2d());
    assert!(flat.multiply(&flat).is_2d());
}

#[test]
fn test_css_string_2d() {
    let m = Matrix::new_2d(1.0, 0.0, 0.0, 1.0, 10.5, -0.0);
    assert_eq!(m.to_css_string().as_deref(), Ok("matrix(1, 0, 0, 1, 10.5, 0)"));
}

#[test]
fn test_css_string_3d() {
    let m = Matrix::identity().translate(0.0, 0.0, 2.0);
    assert_eq!(
        m.to_css_string().as_deref(),
        Ok("matrix3d(1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 2, 1)")
    );
}

#[test]
fn test_css_string_rejects_non_finite() {
    let m = Matrix::new_2d(f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0);
    assert_eq!(m.to_css_string(), Err(GeometryError::NonFinite));
}

#[test]
fn test_init_alias_conflict() {
    let init = MatrixInit {
        a: Some(2.0),
        m11: Some(3.0),
        ..MatrixInit::default()
    };
    assert_eq!(
        Matrix::from_init(init),
        Err(GeometryError::InconsistentComponent {
            name_2d: "a",
            name_3d: "m11"
        })
    );
}

#[test]
fn test_init_alias_agreement_and_signed_zero() {
    let init = MatrixInit {
        b: Some(0.0),
        m12: Some(-0.0),
        e: Some(7.0),
        ..MatrixInit::default()
    };
    let m = Matrix::from_init(init).expect("aliases agree");
    assert!(m.is_2d());
    assert_eq!(m.e(), 7.0);
}

#[test]
fn test_init_is_2d_with_3d_component() {
    let init = MatrixInit {
        m33: 2.0,
        is_2d: Some(true),
        ..MatrixInit::default()
    };
    assert_eq!(
        Matrix::from_init(init),
        Err(GeometryError::NotTwoDimensional { component: "m33" })
    );
}

#[test]
fn test_init_infers_3d() {
    let mut init = MatrixInit {
        m43: 4.0,
        ..MatrixInit::default()
    };
    init.validate_and_fixup().expect("valid");
    assert_eq!(init.is_2d, Some(false));
    assert_eq!(init.m11, Some(1.0));
    let m = Matrix::from_init(init).expect("valid");
    assert!(!m.is_2d());
    assert_eq!(m.m43(), 4.0);
}

#[test]
fn test_multiply_init() {
    let init = MatrixInit {
        e: Some(5.0),
        ..MatrixInit::default()
    };
    let m = Matrix::identity().scale(2.0, 2.0).multiply_init(init).expect("valid");
    let p = m.transform_point(Point::new(0.0, 0.0));
    assert_eq!((p.x, p.y), (10.0, 0.0));
}

#[quickcheck]
fn prop_inverse_round_trips_invertible_2d(a: i8, b: i8, c: i8, d: i8, e: i8, f: i8) -> TestResult {
    let m = Matrix::new_2d(
        f64::from(a),
        f64::from(b),
        f64::from(c),
        f64::from(d),
        f64::from(e),
        f64::from(f),
    );
    match m.inverse() {
        Ok(inverse) => {
            let magnitude = |m: &Matrix| m.to_array().iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
            let tolerance = magnitude(&m) * magnitude(&inverse) * 1e-12;
            let product = m.multiply(&inverse);
            TestResult::from_bool(
                product
                    .to_array()
                    .iter()
                    .zip(Matrix::identity().to_array().iter())
                    .all(|(l, r)| (l - r).abs() <= tolerance),
            )
        }
        Err(GeometryError::NotInvertible) => {
            TestResult::from_bool(i32::from(a) * i32::from(d) - i32::from(b) * i32::from(c) == 0)
        }
        Err(_) => TestResult::failed(),
    }
}

#[quickcheck]
fn prop_transform_point_matches_composition(sx: i8, sy: i8, tx: i8, ty: i8, x: i8, y: i8) -> bool {
    let scale = Matrix::identity().scale(f64::from(sx), f64::from(sy));
    let translate = Matrix::identity().translate(f64::from(tx), f64::from(ty), 0.0);
    let point = Point::new(f64::from(x), f64::from(y));
    let composed = translate.multiply(&scale).transform_point(point);
    let stepwise = translate.transform_point(scale.transform_point(point));
    approx(composed.x, stepwise.x) && approx(composed.y, stepwise.y)
}
