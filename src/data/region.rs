use crate::time::Pulses;
use serde::{Deserialize, Serialize};

/// A placed reference to a part of a source audio asset.
/// The editor owns regions; the mapper reads a copy per repaint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(from = "RegionJson")]
pub struct Region {
    pub id: String,
    /// Timeline start.
    pub position: Pulses,
    pub duration: Pulses,
    /// Where the region's content begins in the source audio.
    pub loop_offset: Pulses,
    /// Defaults to `duration`.
    pub loop_duration: Pulses,
}

#[derive(Deserialize)]
struct RegionJson {
    id: String,
    position: Pulses,
    duration: Pulses,
    #[serde(default)]
    loop_offset: Pulses,
    loop_duration: Option<Pulses>,
}

impl From<RegionJson> for Region {
    fn from(v: RegionJson) -> Self {
        let loop_duration = v.loop_duration.unwrap_or(v.duration);
        Region::new(v.id, v.position, v.duration).with_loop(v.loop_offset, loop_duration)
    }
}

impl Region {
    pub fn new(id: impl Into<String>, position: Pulses, duration: Pulses) -> Self {
        Self {
            id: id.into(),
            position,
            duration,
            loop_offset: 0,
            loop_duration: duration,
        }
    }
    pub fn with_loop(mut self, loop_offset: Pulses, loop_duration: Pulses) -> Self {
        self.loop_offset = loop_offset;
        self.loop_duration = loop_duration;
        self
    }
    pub fn end(&self) -> Pulses {
        self.position + self.duration
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "region {}", self.id)
    }
}
