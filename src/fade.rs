//! Fade-in/fade-out envelopes of a region.
//!
//! A [`FadeParam`] is shared between whoever previews the fade and whoever
//! applies it to audio, so both read the same slopes and lengths. Lengths are
//! in pulses, positions are relative to the region start.

use crate::curve::{normalized_at, CurvePoint, FadeCurve};
use crate::parameter::{FloatParameter, Parameter};
use crate::time::Pulses;
use serde::{Deserialize, Serialize};

/// How the two envelopes combine where the fade-in and fade-out windows
/// overlap on a short region.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FadeOverlap {
    /// Product of both gains. Outside the overlap this is the plain envelope.
    #[default]
    Multiply,
    /// The quieter of both gains.
    Minimum,
}

impl FadeOverlap {
    pub fn combine(&self, fade_in: f64, fade_out: f64) -> f64 {
        match self {
            FadeOverlap::Multiply => fade_in * fade_out,
            FadeOverlap::Minimum => fade_in.min(fade_out),
        }
    }
}

const MAX_LENGTH: f64 = f64::MAX;

/// Lengths are kept in `0..=f64::MAX` pulses and slopes in `0..=1`, also
/// when loaded from json.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(from = "FadeParamJson")]
pub struct FadeParam {
    pub time_in: FloatParameter,
    pub time_out: FloatParameter,
    pub slope_in: FloatParameter,
    pub slope_out: FloatParameter,
    #[serde(default)]
    pub overlap: FadeOverlap,
}

#[derive(Deserialize)]
struct FadeParamJson {
    time_in: FloatParameter,
    time_out: FloatParameter,
    slope_in: FloatParameter,
    slope_out: FloatParameter,
    #[serde(default)]
    overlap: FadeOverlap,
}

impl From<FadeParamJson> for FadeParam {
    // ranges stored in the file are ignored
    fn from(v: FadeParamJson) -> Self {
        Self::from_values(
            v.time_in.get(),
            v.time_out.get(),
            v.slope_in.get(),
            v.slope_out.get(),
        )
        .with_overlap(v.overlap)
    }
}

impl Default for FadeParam {
    fn default() -> Self {
        Self::new(0, 0, 0.5, 0.5)
    }
}

impl FadeParam {
    pub fn new(time_in: Pulses, time_out: Pulses, slope_in: f64, slope_out: f64) -> Self {
        Self::from_values(time_in as f64, time_out as f64, slope_in, slope_out)
    }
    fn from_values(time_in: f64, time_out: f64, slope_in: f64, slope_out: f64) -> Self {
        Self {
            time_in: FloatParameter::new(time_in, 0.0..=MAX_LENGTH, "time_in"),
            time_out: FloatParameter::new(time_out, 0.0..=MAX_LENGTH, "time_out"),
            slope_in: FloatParameter::new(slope_in, 0.0..=1.0, "slope_in"),
            slope_out: FloatParameter::new(slope_out, 0.0..=1.0, "slope_out"),
            overlap: FadeOverlap::default(),
        }
    }
    pub fn with_overlap(mut self, overlap: FadeOverlap) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn curve_in(&self) -> FadeCurve {
        FadeCurve::new(self.slope_in.get())
    }
    pub fn curve_out(&self) -> FadeCurve {
        FadeCurve::new(self.slope_out.get())
    }

    /// Gain of the fade-in at `elapsed` pulses into the region.
    pub fn gain_in(&self, elapsed: f64) -> f64 {
        let len = self.time_in.get();
        if len <= 0.0 || elapsed >= len {
            return 1.0;
        }
        normalized_at(elapsed.max(0.0) / len, self.slope_in.get())
    }

    /// Gain of the fade-out at `elapsed` pulses into a region of `duration`.
    pub fn gain_out(&self, elapsed: f64, duration: f64) -> f64 {
        let len = self.time_out.get();
        let start = duration - len;
        if len <= 0.0 || elapsed < start {
            return 1.0;
        }
        let x = ((elapsed - start) / len).min(1.0);
        1.0 - normalized_at(x, self.slope_out.get())
    }

    /// Combined envelope at `elapsed` pulses into a region of `duration`.
    pub fn gain_at(&self, elapsed: f64, duration: f64) -> f64 {
        self.overlap
            .combine(self.gain_in(elapsed), self.gain_out(elapsed, duration))
    }

    /// Shrinks both lengths by half of the excess when they don't fit into
    /// `duration`, so the fade handles never cross.
    pub fn fit_to(&self, duration: f64) {
        let time_in = self.time_in.get();
        let time_out = self.time_out.get();
        let duration = duration.max(0.0);
        if time_in + time_out > duration {
            let delta = time_in + time_out - duration;
            let new_in = time_in - delta / 2.0;
            let new_out = time_out - delta / 2.0;
            // one side may go below zero, give its remainder to the other
            if new_in < 0.0 {
                self.time_in.set(0.0);
                self.time_out.set(duration);
            } else if new_out < 0.0 {
                self.time_in.set(duration);
                self.time_out.set(0.0);
            } else {
                self.time_in.set(new_in);
                self.time_out.set(new_out);
            }
            log::debug!(
                "fade lengths fitted to {duration}: in {} out {}",
                self.time_in.get(),
                self.time_out.get()
            );
        }
    }

    /// `steps + 1` samples of the combined envelope across the whole region.
    /// `x` is normalized to the region duration.
    pub fn envelope(&self, duration: f64, steps: usize) -> Vec<CurvePoint> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| {
                let x = i as f64 / steps as f64;
                CurvePoint {
                    x,
                    y: self.gain_at(x * duration, duration),
                }
            })
            .collect()
    }
}
