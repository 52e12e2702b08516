//! Musical time. Timeline positions are integer pulses, independent of tempo.

/// Integer timeline unit.
pub type Pulses = i64;

/// Pulses per quarter note.
pub const PPQN_QUARTER: Pulses = 960;
/// Pulses per 4/4 bar.
pub const PPQN_BAR: Pulses = PPQN_QUARTER * 4;

pub fn pulses_to_seconds(pulses: Pulses, bpm: f64) -> f64 {
    (pulses as f64 * 60.0) / (PPQN_QUARTER as f64 * bpm)
}

/// Inverse of [`pulses_to_seconds`], rounded to the nearest pulse.
pub fn seconds_to_pulses(seconds: f64, bpm: f64) -> Pulses {
    (seconds * bpm * PPQN_QUARTER as f64 / 60.0).round() as Pulses
}

pub fn bars(count: i64) -> Pulses {
    count * PPQN_BAR
}

pub fn beats(count: i64) -> Pulses {
    count * PPQN_QUARTER
}
