//! Geometry primitives and the fuzzy comparison policy shared by all calculators.
//!
//! The compactor only ever reasons in the canonical "left" orientation: the compaction axis is
//! `x` and the perpendicular axis is `y`. Other directions are reached by mirroring and
//! transposing the geometry (see [`crate::direction`]).

/// Absolute tolerance used for every geometric equality and ordering test.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Reflects the rectangle at the `y` axis: `x' = -x - width`.
    pub fn mirror_x(&mut self) {
        self.x = -self.x - self.width;
    }

    /// Swaps `x` with `y` and `width` with `height`.
    pub fn transpose(&mut self) {
        (self.x, self.y) = (self.y, self.x);
        (self.width, self.height) = (self.height, self.width);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn transpose(&mut self) {
        (self.x, self.y) = (self.y, self.x);
    }
}

/// Epsilon-aware comparisons. All use the absolute [`EPSILON`].
pub mod fuzzy {
    use super::EPSILON;

    pub fn eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= EPSILON
    }

    /// `a` is smaller than `b` by more than the tolerance.
    pub fn lt(a: f64, b: f64) -> bool {
        a < b - EPSILON
    }

    /// `a` is larger than `b` by more than the tolerance.
    pub fn gt(a: f64, b: f64) -> bool {
        a > b + EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::{EPSILON, Rect, Vector, fuzzy};

    #[test]
    fn mirror_reflects_the_far_edge() {
        let mut r = Rect::new(10.0, 0.0, 4.0, 1.0);
        r.mirror_x();
        assert_eq!(r.x, -14.0);
        r.mirror_x();
        assert_eq!(r.x, 10.0);
    }

    #[test]
    fn transpose_swaps_both_position_and_size() {
        let mut r = Rect::new(3.0, 7.0, 5.0, 2.0);
        r.transpose();
        assert_eq!(r, Rect::new(7.0, 3.0, 2.0, 5.0));

        let mut v = Vector::new(1.0, 2.0);
        v.transpose();
        assert_eq!(v, Vector::new(2.0, 1.0));
    }

    #[test]
    fn fuzzy_comparisons_tolerate_rounding_noise() {
        assert!(fuzzy::eq(0.1 + 0.2, 0.3));
        assert!(!fuzzy::lt(0.3, 0.1 + 0.2));
        assert!(!fuzzy::gt(0.1 + 0.2, 0.3));
        assert!(fuzzy::lt(1.0, 1.0 + 2.0 * EPSILON));
        assert!(fuzzy::gt(1.0 + 2.0 * EPSILON, 1.0));
    }
}
