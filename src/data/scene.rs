use super::{PeakBuffer, Region};
use crate::error::{Error, Result};
use crate::fade::FadeParam;
use crate::time::bars;
use crate::waveform::RegionWaveformMapper;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::Path;

const TWOPI: f64 = PI * 2.0;
/// Upper bound of generated interleaved samples (1 GiB of `f32`).
const MAX_GENERATED_SAMPLES: usize = 1 << 28;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: f32,
}

/// Where the peak data of a scene comes from.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AudioSource {
    /// A generated sine, reduced to `peak_frames` peaks of `reduction` samples.
    Sine {
        frequency: f64,
        amplitude: f32,
        seconds: f64,
        channels: usize,
        peak_frames: usize,
        reduction: usize,
    },
    /// Precomputed peaks covering `seconds` of audio.
    Peaks { seconds: f64, buffer: PeakBuffer },
}

impl AudioSource {
    /// Interleaved samples a sine source generates, `None` when the count
    /// overflows or exceeds [`MAX_GENERATED_SAMPLES`].
    fn generated_samples(peak_frames: usize, reduction: usize, channels: usize) -> Option<usize> {
        peak_frames
            .checked_mul(reduction)?
            .checked_mul(channels)
            .filter(|n| *n <= MAX_GENERATED_SAMPLES)
    }

    pub fn duration(&self) -> f64 {
        match self {
            AudioSource::Sine { seconds, .. } | AudioSource::Peaks { seconds, .. } => *seconds,
        }
    }

    pub fn peaks(&self) -> Result<PeakBuffer> {
        match self {
            AudioSource::Sine {
                frequency,
                amplitude,
                seconds,
                channels,
                peak_frames,
                reduction,
            } => {
                let total = Self::generated_samples(*peak_frames, *reduction, *channels)
                    .ok_or_else(|| {
                        Error::InvalidScene(format!(
                            "{peak_frames} peak frames of {reduction} samples are too many"
                        ))
                    })?;
                // no overflow, checked above
                let num_samples = peak_frames * reduction;
                let sample_rate = num_samples as f64 / seconds;
                let increment = TWOPI * frequency / sample_rate;
                let mut samples = Vec::with_capacity(total);
                let mut phase = 0.0f64;
                for _ in 0..num_samples {
                    let s = phase.sin() as f32 * amplitude;
                    samples.extend(std::iter::repeat(s).take(*channels));
                    phase = (phase + increment) % TWOPI;
                }
                PeakBuffer::from_interleaved(&samples, *channels, *reduction)
            }
            AudioSource::Peaks { buffer, .. } => Ok(buffer.clone()),
        }
    }
}

/// A demo scene: one track of regions over a source, drawn on one canvas.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Scene {
    pub bpm: f64,
    pub canvas: CanvasSize,
    /// Visible timeline span in seconds.
    pub max_duration: f64,
    #[serde(default)]
    pub regions: Vec<Region>,
    pub audio: AudioSource,
    #[serde(default)]
    pub fade: FadeParam,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            bpm: 124.0,
            canvas: CanvasSize {
                width: 1000,
                height: 200.0,
            },
            max_duration: 30.0,
            regions: vec![Region::new("region0", 0, bars(2))],
            audio: AudioSource::Sine {
                frequency: 110.0,
                amplitude: 0.8,
                seconds: 8.0,
                channels: 2,
                peak_frames: 2000,
                reduction: 256,
            },
            fade: FadeParam::new(bars(1) / 4, bars(1) / 2, 0.25, 0.75),
        }
    }
}

impl Scene {
    pub fn from_json(src: &str) -> Result<Self> {
        let scene: Scene = serde_json::from_str(src)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loading scene {}", path.display());
        Self::from_json(&src)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(Error::InvalidScene(msg));
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return invalid(format!("bpm must be positive, got {}", self.bpm));
        }
        if !self.canvas.height.is_finite() || self.canvas.height < 0.0 {
            return invalid(format!("canvas height {} is negative", self.canvas.height));
        }
        if !self.max_duration.is_finite() {
            return invalid("max_duration must be finite".to_string());
        }
        if let Some(r) = self.regions.iter().find(|r| r.duration < 0) {
            return invalid(format!("{r} has a negative duration"));
        }
        match &self.audio {
            AudioSource::Sine {
                channels,
                reduction,
                seconds,
                peak_frames,
                ..
            } => {
                if *channels == 0 || *reduction == 0 {
                    return invalid("sine needs at least one channel and a reduction rate".to_string());
                }
                if AudioSource::generated_samples(*peak_frames, *reduction, *channels).is_none() {
                    return invalid(format!(
                        "sine of {peak_frames} peak frames x {reduction} samples x {channels} channels exceeds {MAX_GENERATED_SAMPLES} samples"
                    ));
                }
                if !(seconds.is_finite() && *seconds > 0.0) {
                    return invalid(format!("sine length {seconds} must be positive"));
                }
            }
            AudioSource::Peaks { seconds, .. } => {
                if !(seconds.is_finite() && *seconds >= 0.0) {
                    return invalid(format!("audio length {seconds} must not be negative"));
                }
            }
        }
        Ok(())
    }

    pub fn mapper(&self) -> RegionWaveformMapper {
        RegionWaveformMapper::new(
            self.canvas.width,
            self.canvas.height,
            self.max_duration,
            self.bpm,
        )
    }
}
