//! Single-parameter fade curve family.
//!
//! The slope `0.0..=1.0` bends the curve from logarithmic (slow start) through
//! linear (`0.5`) to exponential (fast start). Every curve of the family passes
//! through `(0, 0)` and `(1, 1)` and is strictly monotonic, so it cannot express
//! an S-curve.

use serde::{Deserialize, Serialize};

/// Slopes closer than this to `0.5` are evaluated as the identity.
pub const LINEAR_TOLERANCE: f64 = 1e-6;
/// Slope is clamped into `EPSILON..=1.0 - EPSILON` away from the linear case.
pub const EPSILON: f64 = 1e-15;

/// Normalized envelope value of the curve with `slope` at position `x`.
///
/// `x` is not bounds-checked; values outside `0.0..=1.0` extrapolate the
/// curve and NaN propagates.
pub fn normalized_at(x: f64, slope: f64) -> f64 {
    if (slope - 0.5).abs() < LINEAR_TOLERANCE {
        return x;
    }
    let p = slope.clamp(EPSILON, 1.0 - EPSILON);
    (p * p / (1.0 - 2.0 * p)) * (((1.0 - p) / p).powf(2.0 * x) - 1.0)
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// A fade shape, i.e. one member of the curve family.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(transparent)]
pub struct FadeCurve {
    slope: f64,
}

impl FadeCurve {
    pub const LINEAR: FadeCurve = FadeCurve { slope: 0.5 };
    pub const LOGARITHMIC: FadeCurve = FadeCurve { slope: 0.25 };
    pub const EXPONENTIAL: FadeCurve = FadeCurve { slope: 0.75 };

    pub fn new(slope: f64) -> Self {
        Self { slope }
    }
    pub fn slope(&self) -> f64 {
        self.slope
    }
    pub fn is_linear(&self) -> bool {
        (self.slope - 0.5).abs() < LINEAR_TOLERANCE
    }
    pub fn at(&self, x: f64) -> f64 {
        normalized_at(x, self.slope)
    }
    /// `steps + 1` evenly spaced points from `x = 0` to `x = 1`, for drawing
    /// a preview of the shape.
    pub fn preview(&self, steps: usize) -> Vec<CurvePoint> {
        if steps == 0 {
            return vec![CurvePoint { x: 0.0, y: self.at(0.0) }];
        }
        (0..=steps)
            .map(|i| {
                let x = i as f64 / steps as f64;
                CurvePoint { x, y: self.at(x) }
            })
            .collect()
    }
}

impl Default for FadeCurve {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl From<f64> for FadeCurve {
    fn from(slope: f64) -> Self {
        Self::new(slope)
    }
}
