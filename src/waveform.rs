//! Region-aware waveform windowing.
//!
//! Maps regions placed on the timeline to pixel spans on a fixed-width canvas
//! and to the peak frames each span shows. The result is a flat list of
//! [`DrawInstruction`]s, one per region and channel, for a painter that draws
//! min/max blocks.

use crate::data::{PeakBuffer, Region};
use crate::time::{pulses_to_seconds, Pulses};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Vertical gap between two channel lanes, in pixels.
pub const CHANNEL_PADDING: f32 = 4.0;

/// Horizontal pixel span and peak frame span of one region.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderWindow {
    pub pixel_start: i64,
    pub pixel_end: i64,
    pub frame_start: usize,
    pub frame_end: usize,
}

impl RenderWindow {
    pub fn is_empty(&self) -> bool {
        self.pixel_end <= self.pixel_start
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DrawInstruction {
    /// Region id, `None` on the full-buffer fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub channel: usize,
    pub pixel_start: i64,
    pub pixel_end: i64,
    pub channel_top: f32,
    pub channel_bottom: f32,
    pub frame_start: usize,
    pub frame_end: usize,
    pub value_min: f32,
    pub value_max: f32,
}

/// Canvas geometry and timebase shared by every region of a track.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct RegionWaveformMapper {
    width: u32,
    height: f32,
    max_duration: f64,
    bpm: f64,
    channel_padding: f32,
}

fn frame_index(seconds: f64, audio_duration: f64, num_frames: usize) -> usize {
    let index = ((seconds / audio_duration) * num_frames as f64).floor();
    if index.is_nan() || index <= 0.0 {
        0
    } else {
        (index as usize).min(num_frames)
    }
}

impl RegionWaveformMapper {
    pub fn new(width: u32, height: f32, max_duration: f64, bpm: f64) -> Self {
        Self {
            width,
            height,
            max_duration,
            bpm,
            channel_padding: CHANNEL_PADDING,
        }
    }
    pub fn with_channel_padding(mut self, padding: f32) -> Self {
        self.channel_padding = padding.max(0.0);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> f32 {
        self.height
    }
    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    fn seconds(&self, pulses: Pulses) -> f64 {
        pulses_to_seconds(pulses, self.bpm)
    }
    fn pixel(&self, seconds: f64) -> i64 {
        ((seconds / self.max_duration) * self.width as f64).floor() as i64
    }
    fn has_timebase(&self) -> bool {
        self.bpm.is_finite() && self.bpm > 0.0
    }
    fn has_canvas(&self) -> bool {
        self.width > 0 && self.max_duration.is_finite() && self.max_duration > 0.0
    }

    /// Pixel and frame window of `region` over a source `audio_duration`
    /// seconds long, reduced to `num_frames` peaks. Frames are clamped into
    /// `0..=num_frames`.
    pub fn window(&self, region: &Region, num_frames: usize, audio_duration: f64) -> RenderWindow {
        let start = self.seconds(region.position);
        let duration = self.seconds(region.duration);
        let offset = self.seconds(region.loop_offset);
        RenderWindow {
            pixel_start: self.pixel(start),
            pixel_end: self.pixel(start + duration),
            frame_start: frame_index(offset, audio_duration, num_frames),
            frame_end: frame_index(offset + duration, audio_duration, num_frames),
        }
    }

    /// The whole buffer stretched over the whole canvas.
    pub fn full_window(&self, num_frames: usize) -> RenderWindow {
        RenderWindow {
            pixel_start: 0,
            pixel_end: self.width as i64,
            frame_start: 0,
            frame_end: num_frames,
        }
    }

    /// Top and bottom of the lane of channel `ch` out of `num_channels`.
    pub fn channel_lane(&self, ch: usize, num_channels: usize) -> (f32, f32) {
        let num_channels = num_channels.max(1);
        let lane = self.height / num_channels as f32;
        let half_pad = self.channel_padding / 2.0;
        let top = ch as f32 * lane + if ch > 0 { half_pad } else { 0.0 };
        let bottom = (ch + 1) as f32 * lane - if ch + 1 < num_channels { half_pad } else { 0.0 };
        (top, bottom.max(top))
    }

    fn instructions(
        &self,
        window: RenderWindow,
        region: Option<&str>,
        num_channels: usize,
    ) -> impl Iterator<Item = DrawInstruction> + '_ {
        let region = region.map(str::to_string);
        (0..num_channels).map(move |channel| {
            let (channel_top, channel_bottom) = self.channel_lane(channel, num_channels);
            DrawInstruction {
                region: region.clone(),
                channel,
                pixel_start: window.pixel_start,
                pixel_end: window.pixel_end,
                channel_top,
                channel_bottom,
                frame_start: window.frame_start,
                frame_end: window.frame_end,
                value_min: -1.0,
                value_max: 1.0,
            }
        })
    }

    /// Draw instructions for `regions` of one track.
    ///
    /// Without regions, or without a usable source duration or tempo, the
    /// whole peak buffer is stretched over the whole canvas. An empty buffer,
    /// a zero-width canvas or a non-positive `max_duration` draws nothing.
    pub fn map(
        &self,
        regions: &[Region],
        peaks: &PeakBuffer,
        audio_duration: Option<f64>,
    ) -> Vec<DrawInstruction> {
        let num_frames = peaks.num_frames();
        let num_channels = peaks.num_channels();
        if num_frames == 0 || !self.has_canvas() {
            log::trace!(
                "nothing to draw: {num_frames} frames, width {}, max duration {}",
                self.width,
                self.max_duration
            );
            return vec![];
        }
        let audio_duration = match audio_duration.filter(|d| d.is_finite() && *d > 0.0) {
            Some(d) if !regions.is_empty() && self.has_timebase() => d,
            _ => {
                log::debug!("drawing full peak buffer without region windows");
                let window = self.full_window(num_frames);
                return self.instructions(window, None, num_channels).collect();
            }
        };
        regions
            .iter()
            .filter_map(|region| {
                let window = self.window(region, num_frames, audio_duration);
                if window.is_empty() {
                    log::trace!("{region} is narrower than a pixel");
                    None
                } else {
                    Some((region, window))
                }
            })
            .flat_map(|(region, window)| {
                self.instructions(window, Some(region.id.as_str()), num_channels)
            })
            .collect()
    }
}

/// Convenience for a single call without keeping a mapper around.
pub fn map_regions(
    width: u32,
    height: f32,
    max_duration: f64,
    bpm: f64,
    regions: &[Region],
    peaks: &PeakBuffer,
    audio_duration: Option<f64>,
) -> Vec<DrawInstruction> {
    RegionWaveformMapper::new(width, height, max_duration, bpm).map(regions, peaks, audio_duration)
}

/// Fingerprint of region geometry: position, duration and loop offset of
/// every region, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeometryKey(Vec<(Pulses, Pulses, Pulses)>);

impl GeometryKey {
    pub fn of(regions: &[Region]) -> Self {
        Self(
            regions
                .iter()
                .map(|r| (r.position, r.duration, r.loop_offset))
                .collect(),
        )
    }
}

impl std::fmt::Display for GeometryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (position, duration, offset)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "|")?;
            }
            write!(f, "{position}:{duration}:{offset}")?;
        }
        Ok(())
    }
}

struct RepaintKey {
    peaks: Arc<PeakBuffer>,
    mapper: RegionWaveformMapper,
    audio_duration: Option<f64>,
    geometry: GeometryKey,
}

/// Remembers what was painted last so a per-frame repaint loop can skip
/// frames where nothing changed. Peak buffers are compared by reference.
#[derive(Default)]
pub struct RepaintGuard {
    last: Option<RepaintKey>,
}

impl RepaintGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and remembers the inputs when they differ from the last
    /// call; returns false when a repaint can be skipped.
    pub fn needs_repaint(
        &mut self,
        mapper: &RegionWaveformMapper,
        regions: &[Region],
        peaks: &Arc<PeakBuffer>,
        audio_duration: Option<f64>,
    ) -> bool {
        let geometry = GeometryKey::of(regions);
        if let Some(last) = &self.last {
            if Arc::ptr_eq(&last.peaks, peaks)
                && last.mapper == *mapper
                && last.audio_duration == audio_duration
                && last.geometry == geometry
            {
                log::trace!("waveform unchanged, skipping repaint");
                return false;
            }
        }
        self.last = Some(RepaintKey {
            peaks: Arc::clone(peaks),
            mapper: *mapper,
            audio_duration,
            geometry,
        });
        true
    }

    /// Maps only when a repaint is needed.
    pub fn map_if_changed(
        &mut self,
        mapper: &RegionWaveformMapper,
        regions: &[Region],
        peaks: &Arc<PeakBuffer>,
        audio_duration: Option<f64>,
    ) -> Option<Vec<DrawInstruction>> {
        self.needs_repaint(mapper, regions, peaks, audio_duration)
            .then(|| mapper.map(regions, peaks, audio_duration))
    }

    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::Peak;
    use crate::time::{bars, beats, seconds_to_pulses};
    use more_asserts::assert_le;

    fn peaks(num_channels: usize, num_frames: usize) -> PeakBuffer {
        PeakBuffer::from_channels(vec![vec![Peak::new(-0.5, 0.5); num_frames]; num_channels])
            .unwrap()
    }

    #[test]
    fn whole_region_covers_whole_buffer() {
        let bpm = 124.0;
        let region = Region::new("a", 0, bars(3));
        let audio = pulses_to_seconds(bars(3), bpm);
        let mapper = RegionWaveformMapper::new(800, 100.0, 60.0, bpm);
        let w = mapper.window(&region, 1234, audio);
        assert_eq!(w.frame_start, 0);
        assert_eq!(w.frame_end, 1234);
    }

    #[test]
    fn back_to_back_regions_are_contiguous() {
        let bpm = 97.0;
        let mapper = RegionWaveformMapper::new(1013, 100.0, 41.0, bpm);
        let a = Region::new("a", beats(3), bars(2) + 17);
        let b = Region::new("b", a.end(), bars(1));
        let wa = mapper.window(&a, 500, 20.0);
        let wb = mapper.window(&b, 500, 20.0);
        assert_le!((wa.pixel_end - wb.pixel_start).abs(), 1);
    }

    #[test]
    fn empty_inputs_draw_nothing() {
        let regions = [Region::new("a", 0, bars(1))];
        let mapper = RegionWaveformMapper::new(1000, 100.0, 30.0, 120.0);
        assert!(mapper.map(&regions, &peaks(2, 0), Some(10.0)).is_empty());
        assert!(mapper.map(&[], &peaks(2, 0), None).is_empty());

        let zero = RegionWaveformMapper::new(1000, 100.0, 0.0, 120.0);
        assert!(zero.map(&regions, &peaks(2, 100), Some(10.0)).is_empty());
        let negative = RegionWaveformMapper::new(1000, 100.0, -5.0, 120.0);
        assert!(negative.map(&regions, &peaks(2, 100), Some(10.0)).is_empty());
        let narrow = RegionWaveformMapper::new(0, 100.0, 30.0, 120.0);
        assert!(narrow.map(&regions, &peaks(2, 100), Some(10.0)).is_empty());
    }

    #[test]
    fn falls_back_to_full_buffer() {
        let mapper = RegionWaveformMapper::new(640, 100.0, 30.0, 120.0);
        let buf = peaks(2, 300);
        let expected = |draws: Vec<DrawInstruction>| {
            assert_eq!(draws.len(), 2);
            for d in draws {
                assert_eq!(d.region, None);
                assert_eq!((d.pixel_start, d.pixel_end), (0, 640));
                assert_eq!((d.frame_start, d.frame_end), (0, 300));
            }
        };
        expected(mapper.map(&[], &buf, Some(10.0)));
        let regions = [Region::new("a", 0, bars(1))];
        expected(mapper.map(&regions, &buf, None));
        expected(mapper.map(&regions, &buf, Some(0.0)));
        let no_tempo = RegionWaveformMapper::new(640, 100.0, 30.0, 0.0);
        expected(no_tempo.map(&regions, &buf, Some(10.0)));
    }

    #[test]
    fn frames_past_the_source_are_clamped() {
        let bpm = 120.0;
        let mapper = RegionWaveformMapper::new(1000, 100.0, 30.0, bpm);
        // offset 8s into a 10s source, 4s long
        let region = Region::new("a", 0, seconds_to_pulses(4.0, bpm))
            .with_loop(seconds_to_pulses(8.0, bpm), 0);
        let w = mapper.window(&region, 1000, 10.0);
        assert_eq!(w.frame_start, 800);
        assert_eq!(w.frame_end, 1000);

        let region = region.with_loop(seconds_to_pulses(12.0, bpm), 0);
        let w = mapper.window(&region, 1000, 10.0);
        assert_eq!((w.frame_start, w.frame_end), (1000, 1000));

        let region = Region::new("b", 0, bars(1)).with_loop(-bars(4), 0);
        let w = mapper.window(&region, 1000, 10.0);
        assert_eq!(w.frame_start, 0);
        assert_eq!(w.frame_end, 0);
    }

    #[test]
    fn channel_lanes() {
        let mapper = RegionWaveformMapper::new(100, 100.0, 30.0, 120.0);
        assert_eq!(mapper.channel_lane(0, 1), (0.0, 100.0));
        assert_eq!(mapper.channel_lane(0, 2), (0.0, 48.0));
        assert_eq!(mapper.channel_lane(1, 2), (52.0, 100.0));
        assert_eq!(mapper.channel_lane(1, 4), (27.0, 48.0));

        let tight = RegionWaveformMapper::new(100, 2.0, 30.0, 120.0).with_channel_padding(10.0);
        let (top, bottom) = tight.channel_lane(1, 3);
        assert_le!(top, bottom);
    }

    #[test]
    fn one_instruction_per_region_and_channel() {
        let mapper = RegionWaveformMapper::new(1000, 200.0, 30.0, 120.0);
        let regions = [
            Region::new("a", 0, bars(1)),
            Region::new("b", bars(2), bars(1)).with_loop(bars(1), bars(1)),
            // zero length, skipped
            Region::new("c", bars(4), 0),
        ];
        let draws = mapper.map(&regions, &peaks(2, 1000), Some(20.0));
        assert_eq!(draws.len(), 4);
        let ids: Vec<_> = draws.iter().map(|d| d.region.as_deref().unwrap()).collect();
        assert_eq!(ids, ["a", "a", "b", "b"]);
        // 2 bars at 120bpm are 4 seconds
        assert_eq!(draws[2].pixel_start, (4.0f64 / 30.0 * 1000.0).floor() as i64);
        assert_eq!(draws[2].frame_start, 100);
        assert_eq!(draws[3].channel, 1);
        assert!(draws.iter().all(|d| d.value_min == -1.0 && d.value_max == 1.0));
    }

    #[test]
    fn scenario_two_bars_at_124() {
        let bpm = 124.0;
        let two_bars = pulses_to_seconds(bars(2), bpm);
        let audio = 8.0;
        let regions = [Region::new("region0", 0, bars(2))];
        let draws = map_regions(1000, 200.0, 30.0, bpm, &regions, &peaks(1, 2000), Some(audio));
        assert_eq!(draws.len(), 1);
        let d = &draws[0];
        assert_eq!(d.pixel_start, 0);
        assert_eq!(d.pixel_end, (two_bars / 30.0 * 1000.0).floor() as i64);
        assert_eq!(d.pixel_end, 129);
        assert_eq!(d.frame_start, 0);
        assert_eq!(d.frame_end, (two_bars / audio * 2000.0).floor() as usize);
        assert_eq!(d.frame_end, 967);
    }

    #[test]
    fn same_inputs_same_outputs() {
        let mapper = RegionWaveformMapper::new(777, 90.0, 12.0, 133.0);
        let regions = [Region::new("a", 100, 5000).with_loop(300, 5000)];
        let buf = peaks(2, 640);
        assert_eq!(
            mapper.map(&regions, &buf, Some(9.0)),
            mapper.map(&regions, &buf, Some(9.0))
        );
    }

    #[test]
    fn geometry_key() {
        let regions = [
            Region::new("a", 0, 960).with_loop(10, 0),
            Region::new("b", 960, 480),
        ];
        assert_eq!(GeometryKey::of(&regions).to_string(), "0:960:10|960:480:0");
        // ids and loop durations do not take part
        let renamed = [
            Region::new("x", 0, 960).with_loop(10, 99),
            Region::new("y", 960, 480),
        ];
        assert_eq!(GeometryKey::of(&regions), GeometryKey::of(&renamed));
    }

    #[test]
    fn repaint_guard_skips_unchanged() {
        let mapper = RegionWaveformMapper::new(500, 100.0, 30.0, 120.0);
        let buf = Arc::new(peaks(1, 100));
        let mut regions = vec![Region::new("a", 0, bars(1))];
        let mut guard = RepaintGuard::new();

        assert!(guard.needs_repaint(&mapper, &regions, &buf, Some(10.0)));
        assert!(!guard.needs_repaint(&mapper, &regions, &buf, Some(10.0)));

        regions[0].position += 1;
        assert!(guard.needs_repaint(&mapper, &regions, &buf, Some(10.0)));

        // equal content, different buffer
        let reloaded = Arc::new(peaks(1, 100));
        assert!(guard.needs_repaint(&mapper, &regions, &reloaded, Some(10.0)));

        let resized = RegionWaveformMapper::new(501, 100.0, 30.0, 120.0);
        assert!(guard
            .map_if_changed(&resized, &regions, &reloaded, Some(10.0))
            .is_some());
        assert!(guard
            .map_if_changed(&resized, &regions, &reloaded, Some(10.0))
            .is_none());

        guard.invalidate();
        assert!(guard.needs_repaint(&resized, &regions, &reloaded, Some(10.0)));
    }
}
