use atomic_float::AtomicF64;

use serde::*;
use serde_with::SerializeAs;
use std::sync::atomic::Ordering;

/// Serializes an [`AtomicF64`] as a plain number. Loading goes through
/// [`super::FloatParameter`]'s clamped constructor instead.
pub struct AtomicF64Json;

impl SerializeAs<AtomicF64> for AtomicF64Json {
    fn serialize_as<S>(value: &AtomicF64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.load(Ordering::Relaxed))
    }
}
