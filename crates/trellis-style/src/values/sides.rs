//! Four-sided values (`margin`, `padding`, `border-width`, `inset`).

use serde::{Deserialize, Serialize};

/// One value per physical side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides<T> {
    /// Top side.
    pub top: T,
    /// Right side.
    pub right: T,
    /// Bottom side.
    pub bottom: T,
    /// Left side.
    pub left: T,
}

impl<T: Copy> Sides<T> {
    /// The same value on every side.
    pub const fn uniform(value: T) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "If there is only one component value, it applies to all sides. If
    /// there are two values, the top and bottom margins are set to the first
    /// value and the right and left margins are set to the second. If there
    /// are three values, the top is set to the first value, the left and
    /// right are set to the second, and the bottom is set to the third. If
    /// there are four values, they apply to the top, right, bottom, and
    /// left, respectively."
    pub fn from_components(values: &[T]) -> Option<Self> {
        match *values {
            [all] => Some(Self::uniform(all)),
            [vertical, horizontal] => Some(Self {
                top: vertical,
                right: horizontal,
                bottom: vertical,
                left: horizontal,
            }),
            [top, horizontal, bottom] => Some(Self {
                top,
                right: horizontal,
                bottom,
                left: horizontal,
            }),
            [top, right, bottom, left] => Some(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => None,
        }
    }

    /// Apply `f` to every side.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Sides<U> {
        Sides {
            top: f(self.top),
            right: f(self.right),
            bottom: f(self.bottom),
            left: f(self.left),
        }
    }
}

impl<T: Copy + PartialEq> Sides<T> {
    /// Serialize as the shortest shorthand that reproduces all four sides.
    pub fn to_css_with(&self, serialize: impl Fn(&T) -> String) -> String {
        let components: Vec<&T> = if self.top == self.bottom && self.left == self.right {
            if self.top == self.left {
                vec![&self.top]
            } else {
                vec![&self.top, &self.right]
            }
        } else if self.left == self.right {
            vec![&self.top, &self.right, &self.bottom]
        } else {
            vec![&self.top, &self.right, &self.bottom, &self.left]
        };
        components
            .into_iter()
            .map(serialize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Split a sided shorthand and parse each component.
pub fn parse_sides<T: Copy>(text: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Sides<T>> {
    let components = text
        .split_whitespace()
        .map(parse)
        .collect::<Option<Vec<_>>>()?;
    Sides::from_components(&components)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(v: &f64) -> String {
        format!("{v}px")
    }

    #[test]
    fn test_collapses_shorthand() {
        assert_eq!(Sides::uniform(1.0).to_css_with(px), "1px");
        assert_eq!(
            Sides::from_components(&[1.0, 2.0]).unwrap().to_css_with(px),
            "1px 2px"
        );
        assert_eq!(
            Sides::from_components(&[1.0, 2.0, 3.0]).unwrap().to_css_with(px),
            "1px 2px 3px"
        );
        assert_eq!(
            Sides::from_components(&[1.0, 2.0, 3.0, 4.0])
                .unwrap()
                .to_css_with(px),
            "1px 2px 3px 4px"
        );
    }

    #[test]
    fn test_parses_components() {
        let sides = parse_sides("1 2", |s| s.parse::<i32>().ok()).unwrap();
        assert_eq!((sides.top, sides.right, sides.bottom, sides.left), (1, 2, 1, 2));
        assert!(parse_sides("1 2 3 4 5", |s| s.parse::<i32>().ok()).is_none());
        assert!(parse_sides("1 x", |s| s.parse::<i32>().ok()).is_none());
    }
}
