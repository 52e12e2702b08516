use atomic_float::AtomicF64;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::ops::RangeInclusive;
use std::sync::atomic::Ordering;

mod atomicfloat_helper;
use atomicfloat_helper::AtomicF64Json;

pub trait Parameter<T> {
    fn new(init: T, range: RangeInclusive<T>, label: impl Into<String>) -> Self;
    fn get(&self) -> T;
    fn set(&self, v: T);
}

/// A ranged value that can be read and written from several threads.
/// Writes are clamped into the range, including the value loaded from json.
#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
#[serde(from = "FloatParameterJson")]
pub struct FloatParameter {
    #[serde_as(serialize_as = "AtomicF64Json")]
    value: AtomicF64,
    pub range: RangeInclusive<f64>,
    label: String,
}

#[derive(Deserialize)]
struct FloatParameterJson {
    value: f64,
    range: RangeInclusive<f64>,
    label: String,
}

impl From<FloatParameterJson> for FloatParameter {
    fn from(v: FloatParameterJson) -> Self {
        Self::new(v.value, v.range, v.label)
    }
}

impl FloatParameter {
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Parameter<f64> for FloatParameter {
    fn new(init: f64, range: RangeInclusive<f64>, label: impl Into<String>) -> Self {
        let res = Self {
            value: AtomicF64::new(*range.start()),
            range,
            label: label.into(),
        };
        res.set(init);
        res
    }

    fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }
    // note that no need to be "&mut self" here.
    fn set(&self, v: f64) {
        self.value.store(
            v.max(*self.range.start()).min(*self.range.end()),
            Ordering::Relaxed,
        );
    }
}

impl Clone for FloatParameter {
    fn clone(&self) -> Self {
        Self {
            value: AtomicF64::new(self.get()),
            range: self.range.clone(),
            label: self.label.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn clamps_into_range() {
        let p = FloatParameter::new(2.0, 0.0..=1.0, "slope");
        assert_eq!(p.get(), 1.0);
        p.set(-0.5);
        assert_eq!(p.get(), 0.0);
        p.set(0.3);
        assert_eq!(p.get(), 0.3);
        assert_eq!(p.label(), "slope");
    }

    #[test]
    fn shared_between_threads() {
        let p = Arc::new(FloatParameter::new(0.5, 0.0..=1.0, "slope"));
        let writer = Arc::clone(&p);
        std::thread::spawn(move || writer.set(0.75))
            .join()
            .unwrap();
        assert_eq!(p.get(), 0.75);
    }

    #[test]
    fn json() {
        let p = FloatParameter::new(0.25, 0.0..=1.0, "in_slope");
        let json = serde_json::to_string(&p).unwrap();
        let back: FloatParameter = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(), 0.25);
        assert_eq!(back.range, 0.0..=1.0);
        assert_eq!(back.label(), "in_slope");
    }

    #[test]
    fn json_value_is_clamped() {
        let src = r#"{"value":7.0,"range":{"start":0.0,"end":1.0},"label":"slope_in"}"#;
        let p: FloatParameter = serde_json::from_str(src).unwrap();
        assert_eq!(p.get(), 1.0);
        let src = r#"{"value":-3,"range":{"start":0.0,"end":1.0},"label":"slope_in"}"#;
        let p: FloatParameter = serde_json::from_str(src).unwrap();
        assert_eq!(p.get(), 0.0);
    }
}
