use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Peak {
    pub min: f32,
    pub max: f32,
}

impl Peak {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
    fn merge(self, other: Peak) -> Peak {
        Peak::new(self.min.min(other.min), self.max.max(other.max))
    }
}

/// Per-channel min/max pairs at reduced time resolution. Every channel holds
/// the same number of frames. Built once, then shared read-only.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "PeakChannels", into = "PeakChannels")]
pub struct PeakBuffer {
    channels: Vec<Vec<Peak>>,
}

#[derive(Serialize, Deserialize)]
struct PeakChannels {
    channels: Vec<Vec<Peak>>,
}

impl TryFrom<PeakChannels> for PeakBuffer {
    type Error = Error;
    fn try_from(value: PeakChannels) -> Result<Self> {
        Self::from_channels(value.channels)
    }
}

impl From<PeakBuffer> for PeakChannels {
    fn from(value: PeakBuffer) -> Self {
        Self {
            channels: value.channels,
        }
    }
}

impl PeakBuffer {
    pub fn from_channels(channels: Vec<Vec<Peak>>) -> Result<Self> {
        let Some(first) = channels.first() else {
            return Err(Error::InvalidPeaks("no channels".to_string()));
        };
        let num_frames = first.len();
        if let Some((ch, c)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != num_frames)
        {
            return Err(Error::InvalidPeaks(format!(
                "channel {ch} has {} frames, expected {num_frames}",
                c.len()
            )));
        }
        Ok(Self { channels })
    }

    /// Reduces interleaved samples to one peak per `reduction` frames.
    /// The peak of every chunk includes the zero line.
    pub fn from_interleaved(samples: &[f32], num_channels: usize, reduction: usize) -> Result<Self> {
        if num_channels == 0 {
            return Err(Error::InvalidPeaks("no channels".to_string()));
        }
        if reduction == 0 {
            return Err(Error::InvalidPeaks("reduction rate must be positive".to_string()));
        }
        let chunk_len = num_channels * reduction;
        let mut channels = vec![Vec::with_capacity(samples.len() / chunk_len + 1); num_channels];
        for chunk in samples.chunks(chunk_len) {
            for (ch, peaks) in channels.iter_mut().enumerate() {
                let peak = chunk
                    .iter()
                    .skip(ch)
                    .step_by(num_channels)
                    .fold(Peak::default(), |p, s| Peak::new(p.min.min(*s), p.max.max(*s)));
                peaks.push(peak);
            }
        }
        log::trace!(
            "reduced {} samples to {} peak frames",
            samples.len(),
            channels[0].len()
        );
        Ok(Self { channels })
    }

    pub fn empty(num_channels: usize) -> Self {
        Self {
            channels: vec![vec![]; num_channels.max(1)],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
    pub fn num_frames(&self) -> usize {
        self.channels.first().map_or(0, |c| c.len())
    }
    pub fn channel(&self, ch: usize) -> &[Peak] {
        self.channels.get(ch).map(|c| c.as_slice()).unwrap_or(&[])
    }
    /// Frames `range` of channel `ch`, clamped to what exists.
    pub fn frames(&self, ch: usize, range: Range<usize>) -> &[Peak] {
        let c = self.channel(ch);
        let end = range.end.min(c.len());
        let start = range.start.min(end);
        &c[start..end]
    }
    /// Envelope over `range`, or `None` when it holds no frames.
    pub fn span(&self, ch: usize, range: Range<usize>) -> Option<Peak> {
        self.frames(ch, range).iter().copied().reduce(Peak::merge)
    }
}
