//! Regionview draws region-aware audio waveforms.
//!
//! Regions placed on a musical timeline are mapped to pixel spans on a
//! canvas and to the peak frames each span shows, together with the
//! single-parameter fade curves applied at region boundaries.

pub mod cli;
pub mod curve;
pub mod data;
pub mod error;
pub mod fade;
pub mod gui;
pub mod parameter;
pub mod time;
pub mod utils;
pub mod waveform;

pub use error::{Error, Result};
