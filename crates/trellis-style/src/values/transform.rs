//! [CSS Transforms Module Level 1](https://www.w3.org/TR/css-transforms-1/)

use serde::{Deserialize, Serialize};
use trellis_geometry::Matrix;

use super::length::parse_length;

/// [§ 13 The Transform Functions](https://www.w3.org/TR/css-transforms-1/#transform-functions)
///
/// Translations are computed to pixels; angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransformFunction {
    /// `matrix(a, b, c, d, e, f)`
    Matrix([f64; 6]),
    /// `translate(tx, ty)`, `translateX(tx)`, `translateY(ty)`
    Translate(f64, f64),
    /// `scale(sx, sy)`, `scaleX(sx)`, `scaleY(sy)`
    Scale(f64, f64),
    /// `rotate(angle)`
    Rotate(f64),
    /// `skewX(angle)`
    SkewX(f64),
    /// `skewY(angle)`
    SkewY(f64),
}

impl TransformFunction {
    /// [§ 13.1 2D Transform Functions](https://www.w3.org/TR/css-transforms-1/#two-d-transform-functions)
    pub fn to_matrix(&self) -> Matrix {
        let identity = Matrix::identity();
        match *self {
            Self::Matrix([a, b, c, d, e, f]) => Matrix::new_2d(a, b, c, d, e, f),
            Self::Translate(tx, ty) => identity.translate(tx, ty, 0.0),
            Self::Scale(sx, sy) => identity.scale(sx, sy),
            Self::Rotate(degrees) => identity.rotate(degrees),
            Self::SkewX(degrees) => identity.skew_x(degrees),
            Self::SkewY(degrees) => identity.skew_y(degrees),
        }
    }
}

/// [§ 6 The Transform Rendering Model](https://www.w3.org/TR/css-transforms-1/#transform-rendering)
///
/// "Post-multiply all <transform-function>s in <transform-list> to transform."
pub fn transform_list_to_matrix(list: &[TransformFunction]) -> Matrix {
    list.iter()
        .fold(Matrix::identity(), |acc, function| acc.multiply(&function.to_matrix()))
}

/// [§ 7 The transform Property](https://www.w3.org/TR/css-transforms-1/#transform-property)
///
/// Parse `none | <transform-list>`. `none` yields an empty list.
pub fn parse_transform_list(text: &str, font_size: f64) -> Option<Vec<TransformFunction>> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("none") {
        return Some(Vec::new());
    }
    let mut functions = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let open = rest.find('(')?;
        let close = rest[open..].find(')')? + open;
        let name = rest[..open].trim().to_ascii_lowercase();
        let args: Vec<&str> = rest[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .collect();
        functions.push(parse_function(&name, &args, font_size)?);
        rest = rest[close + 1..].trim_start();
    }
    if functions.is_empty() {
        return None;
    }
    Some(functions)
}

fn parse_function(name: &str, args: &[&str], font_size: f64) -> Option<TransformFunction> {
    let length = |arg: &str| parse_length(arg, font_size);
    let number = |arg: &str| arg.parse::<f64>().ok();
    match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Some(TransformFunction::Matrix([
            number(a)?,
            number(b)?,
            number(c)?,
            number(d)?,
            number(e)?,
            number(f)?,
        ])),
        ("translate", &[tx]) => Some(TransformFunction::Translate(length(tx)?, 0.0)),
        ("translate", &[tx, ty]) => Some(TransformFunction::Translate(length(tx)?, length(ty)?)),
        ("translatex", &[tx]) => Some(TransformFunction::Translate(length(tx)?, 0.0)),
        ("translatey", &[ty]) => Some(TransformFunction::Translate(0.0, length(ty)?)),
        ("scale", &[s]) => {
            let s = number(s)?;
            Some(TransformFunction::Scale(s, s))
        }
        ("scale", &[sx, sy]) => Some(TransformFunction::Scale(number(sx)?, number(sy)?)),
        ("scalex", &[sx]) => Some(TransformFunction::Scale(number(sx)?, 1.0)),
        ("scaley", &[sy]) => Some(TransformFunction::Scale(1.0, number(sy)?)),
        ("rotate", &[angle]) => Some(TransformFunction::Rotate(parse_angle(angle)?)),
        ("skewx", &[angle]) => Some(TransformFunction::SkewX(parse_angle(angle)?)),
        ("skewy", &[angle]) => Some(TransformFunction::SkewY(parse_angle(angle)?)),
        _ => None,
    }
}

/// [§ 7.1 Angle Units](https://www.w3.org/TR/css-values-4/#angles)
///
/// Returns degrees.
fn parse_angle(text: &str) -> Option<f64> {
    let text = text.trim().to_ascii_lowercase();
    if text == "0" {
        return Some(0.0);
    }
    if let Some(v) = text.strip_suffix("deg") {
        return v.parse().ok();
    }
    if let Some(v) = text.strip_suffix("grad") {
        return v.parse::<f64>().ok().map(|g| g * 0.9);
    }
    if let Some(v) = text.strip_suffix("rad") {
        return v.parse::<f64>().ok().map(f64::to_degrees);
    }
    if let Some(v) = text.strip_suffix("turn") {
        return v.parse::<f64>().ok().map(|t| t * 360.0);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_a_list() {
        let list = parse_transform_list("translate(10px, 5px) scale(2)", 16.0).unwrap();
        assert_eq!(
            list,
            vec![
                TransformFunction::Translate(10.0, 5.0),
                TransformFunction::Scale(2.0, 2.0)
            ]
        );
    }

    #[test]
    fn test_none_is_empty() {
        assert_eq!(parse_transform_list("none", 16.0), Some(Vec::new()));
        assert_eq!(parse_transform_list("wobble(3)", 16.0), None);
        assert_eq!(parse_transform_list("", 16.0), None);
    }

    #[test]
    fn test_angles() {
        assert_eq!(parse_angle("90deg"), Some(90.0));
        assert_eq!(parse_angle("0.5turn"), Some(180.0));
        assert_eq!(parse_angle("100grad"), Some(90.0));
        assert_eq!(parse_angle("90"), None);
    }

    #[test]
    fn test_list_composes_left_to_right() {
        let list = [
            TransformFunction::Translate(10.0, 0.0),
            TransformFunction::Scale(2.0, 2.0),
        ];
        let m = transform_list_to_matrix(&list);
        assert_eq!((m.a(), m.d(), m.e(), m.f()), (2.0, 2.0, 10.0, 0.0));
    }
}
