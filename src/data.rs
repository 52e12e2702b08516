//! Snapshots the mapper reads: regions on a timeline, per-channel peak data,
//! and scene descriptions for the demo binary.
//! Serialized to json with serde.

mod peaks;
mod region;
mod scene;

pub use peaks::{Peak, PeakBuffer};
pub use region::Region;
pub use scene::{AudioSource, CanvasSize, Scene};
