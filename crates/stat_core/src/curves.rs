//! Diminishing-returns transforms.
//!
//! Two independent transforms live here:
//!
//! - [`DiminishingReturns`] - the per-class avoidance curve. Bounded,
//!   strictly increasing, asymptotic to the class cap. A class without a
//!   cap for a category (cap `0`) short-circuits the whole statistic to
//!   zero instead of evaluating the formula.
//! - [`Curve`] - a registered piecewise-linear transform applied globally
//!   per rating category when converting rating points into a percentage.
//!   Categories without a registered curve pass through unchanged.

use serde::{Deserialize, Serialize};

/// Per-class avoidance diminishing-returns constants.
///
/// `result = cap * x / (x + cap * coefficient) + y` where `x` is the
/// diminishing contribution and `y` the non-diminishing one. Properties:
/// `result(0, y) == y`, strictly increasing in `x`, `result -> cap + y`
/// as `x -> inf`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiminishingReturns {
    /// Asymptotic cap `c`. Zero means the class has no access to the
    /// statistic at all.
    pub cap: f32,
    /// Curvature coefficient `k`.
    pub coefficient: f32,
}

impl DiminishingReturns {
    /// Create a constant pair.
    #[must_use]
    pub const fn new(cap: f32, coefficient: f32) -> Self {
        Self { cap, coefficient }
    }

    /// Whether this class has access to the statistic.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.cap > 0.0
    }

    /// Apply the curve to a diminishing contribution `x` plus a
    /// non-diminishing contribution `y`.
    ///
    /// A zero cap forces the result to exactly `0.0` without evaluating
    /// the formula (the denominator would be zero at `x == 0`).
    #[must_use]
    pub fn apply(&self, diminishing: f32, flat: f32) -> f32 {
        if !self.is_capped() {
            return 0.0;
        }
        let ck = self.cap * self.coefficient;
        self.cap * diminishing / (diminishing + ck) + flat
    }
}

/// A piecewise-linear curve over non-negative inputs.
///
/// Points must be sorted by `x`. Inputs before the first point clamp to
/// its `y`; inputs past the last point extend along the final segment's
/// slope so the transform stays monotonic for monotonic control points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    /// Control points as `(input, output)` pairs, sorted by input.
    pub points: Vec<(f32, f32)>,
}

impl Curve {
    /// Create a curve from sorted control points.
    #[must_use]
    pub fn new(points: Vec<(f32, f32)>) -> Self {
        Self { points }
    }

    /// Evaluate the curve at `x`.
    ///
    /// An empty curve is the identity.
    #[must_use]
    pub fn eval(&self, x: f32) -> f32 {
        let Some(&(first_x, first_y)) = self.points.first() else {
            return x;
        };
        if x <= first_x {
            return first_y;
        }

        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if x <= x1 {
                return y0 + (x - x0) * (y1 - y0) / (x1 - x0);
            }
        }

        // Past the last point: extend the final segment's slope.
        let &(last_x, last_y) = self.points.last().unwrap_or(&(0.0, 0.0));
        if self.points.len() < 2 {
            return last_y;
        }
        let (prev_x, prev_y) = self.points[self.points.len() - 2];
        let slope = (last_y - prev_y) / (last_x - prev_x);
        last_y + (x - last_x) * slope
    }
}

/// Compounding mitigation applied to the damage-taken resilience bonus.
///
/// Each point of bonus multiplies the remaining damage by 0.99, so the
/// published percentage approaches but never reaches 100.
#[must_use]
pub fn resilience_mitigation(bonus: f32) -> f32 {
    (1.0 - 0.99f32.powf(bonus)) * 100.0
}
