//! CSS timing curves.
//!
//! A [`CubicBezier`] is emitted verbatim into the page as
//! `cubic-bezier(x1, y1, x2, y2)` and also evaluated here so poses can be
//! sampled at arbitrary times (the `timeline` command and tests rely on it).

use super::css_number;
use std::fmt;

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 40;
const EPSILON: f64 = 1e-7;

/// A cubic Bézier timing function anchored at (0, 0) and (1, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    /// Controlled, confident, no overshoot. Used for most entrances.
    pub const EDITORIAL: CubicBezier = CubicBezier::raw(0.25, 0.1, 0.25, 1.0);
    /// Fast start with a long settle. Used for media blocks.
    pub const EXPO_OUT: CubicBezier = CubicBezier::raw(0.16, 1.0, 0.3, 1.0);
    pub const LINEAR: CubicBezier = CubicBezier::raw(0.0, 0.0, 1.0, 1.0);

    const fn raw(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a curve, clamping the x-coordinates into `[0, 1]` as CSS requires.
    ///
    /// Non-finite coordinates fall back to [`CubicBezier::LINEAR`].
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return Self::LINEAR;
        }
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    pub fn from_array(points: [f64; 4]) -> Self {
        Self::new(points[0], points[1], points[2], points[3])
    }

    /// Eased progress for linear progress `t`. `t` is clamped to `[0, 1]`
    /// and the endpoints map exactly to 0 and 1.
    pub fn apply(&self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        let s = self.solve_x(t);
        sample(self.y1, self.y2, s)
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_x(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = sample(self.x1, self.x2, s) - x;
            if err.abs() < EPSILON {
                return s;
            }
            let slope = sample_derivative(self.x1, self.x2, s);
            if slope.abs() < 1e-6 {
                break;
            }
            s -= err / slope;
        }

        // Newton stalled on a flat segment; x(s) is monotonic so bisection converges.
        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = sample(self.x1, self.x2, s);
            if (value - x).abs() < EPSILON {
                break;
            }
            if value < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }

    pub fn to_css(&self) -> String {
        format!(
            "cubic-bezier({}, {}, {}, {})",
            css_number(self.x1),
            css_number(self.y1),
            css_number(self.x2),
            css_number(self.y2)
        )
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::EDITORIAL
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// One coordinate of the Bézier polynomial with P0 = 0 and P3 = 1.
fn sample(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn sample_derivative(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}
