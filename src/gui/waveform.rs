use crate::data::PeakBuffer;
use crate::waveform::DrawInstruction;

/// Min/max blocks of one instruction, one per pixel column, relative to the
/// canvas origin. Only the columns inside `0..canvas_width` are built; frames
/// are still spread over the whole pixel span of the instruction. Columns
/// where the window holds fewer frames than pixels repeat the nearest frame.
pub fn peak_columns(
    peaks: &PeakBuffer,
    draw: &DrawInstruction,
    canvas_width: u32,
) -> Vec<egui::Rect> {
    let num_pixels = draw.pixel_end.saturating_sub(draw.pixel_start).max(0);
    let num_frames = draw.frame_end.saturating_sub(draw.frame_start);
    if num_pixels == 0 || num_frames == 0 {
        return vec![];
    }
    let first = 0i64.saturating_sub(draw.pixel_start).clamp(0, num_pixels);
    let last = (canvas_width as i64)
        .saturating_sub(draw.pixel_start)
        .clamp(first, num_pixels);
    let frame_at = |i: i64| {
        let offset = i as u128 * num_frames as u128 / num_pixels as u128;
        draw.frame_start + offset as usize
    };
    let lane_height = draw.channel_bottom - draw.channel_top;
    let value_range = draw.value_max - draw.value_min;
    let to_y = |v: f32| {
        let ratio = ((v - draw.value_min) / value_range).clamp(0.0, 1.0);
        draw.channel_bottom - ratio * lane_height
    };
    (first..last)
        .filter_map(|i| {
            let start = frame_at(i);
            let end = frame_at(i + 1).max(start + 1);
            let peak = peaks.span(draw.channel, start..end)?;
            let x = (draw.pixel_start + i) as f32;
            Some(egui::Rect::from_min_max(
                egui::pos2(x, to_y(peak.max)),
                egui::pos2(x + 1.0, to_y(peak.min)),
            ))
        })
        .collect()
}

/// Paints every instruction into `rect` as one mesh. Instruction pixels are
/// relative to the left edge of `rect`.
pub fn paint_peak_blocks(
    painter: &egui::Painter,
    rect: egui::Rect,
    peaks: &PeakBuffer,
    instructions: &[DrawInstruction],
    color: egui::Color32,
) {
    let mut mesh = egui::Mesh::default();
    let offset = rect.min.to_vec2();
    let canvas_width = rect.width().max(0.0).ceil() as u32;
    for draw in instructions {
        for column in peak_columns(peaks, draw, canvas_width) {
            mesh.add_colored_rect(column.translate(offset), color);
        }
    }
    painter.with_clip_rect(rect).add(mesh);
}

pub struct WaveformView<'a> {
    peaks: &'a PeakBuffer,
    instructions: &'a [DrawInstruction],
    size: egui::Vec2,
}

impl<'a> WaveformView<'a> {
    pub fn new(peaks: &'a PeakBuffer, instructions: &'a [DrawInstruction], size: egui::Vec2) -> Self {
        Self {
            peaks,
            instructions,
            size,
        }
    }
}

impl<'a> egui::Widget for WaveformView<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(self.size, egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);
        paint_peak_blocks(
            &painter,
            rect,
            self.peaks,
            self.instructions,
            egui::Color32::WHITE.linear_multiply(0.8),
        );
        response
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::{Peak, Region};
    use crate::waveform::RegionWaveformMapper;
    use float_cmp::approx_eq;

    fn instruction(pixels: (i64, i64), frames: (usize, usize)) -> DrawInstruction {
        DrawInstruction {
            region: None,
            channel: 0,
            pixel_start: pixels.0,
            pixel_end: pixels.1,
            channel_top: 0.0,
            channel_bottom: 100.0,
            frame_start: frames.0,
            frame_end: frames.1,
            value_min: -1.0,
            value_max: 1.0,
        }
    }

    #[test]
    fn columns_merge_frames() {
        let peaks = PeakBuffer::from_channels(vec![vec![
            Peak::new(-0.5, 0.5),
            Peak::new(0.0, 0.0),
            Peak::new(-1.0, 0.0),
            Peak::new(0.0, 1.0),
        ]])
        .unwrap();
        let columns = peak_columns(&peaks, &instruction((10, 12), (0, 4)), 100);
        assert_eq!(columns.len(), 2);
        assert_eq!(
            columns[0],
            egui::Rect::from_min_max(egui::pos2(10.0, 25.0), egui::pos2(11.0, 75.0))
        );
        assert_eq!(
            columns[1],
            egui::Rect::from_min_max(egui::pos2(11.0, 0.0), egui::pos2(12.0, 100.0))
        );
    }

    #[test]
    fn stretches_few_frames() {
        let peaks = PeakBuffer::from_channels(vec![vec![Peak::new(-1.0, 1.0); 2]]).unwrap();
        let columns = peak_columns(&peaks, &instruction((0, 6), (0, 2)), 100);
        assert_eq!(columns.len(), 6);
        assert!(columns.iter().all(|c| c.height() == 100.0));
    }

    #[test]
    fn empty_window_has_no_columns() {
        let peaks = PeakBuffer::from_channels(vec![vec![Peak::default(); 4]]).unwrap();
        assert!(peak_columns(&peaks, &instruction((5, 5), (0, 4)), 100).is_empty());
        assert!(peak_columns(&peaks, &instruction((0, 5), (4, 4)), 100).is_empty());
    }

    #[test]
    fn columns_stay_inside_canvas() {
        let peaks = PeakBuffer::from_channels(vec![(0..3250)
            .map(|i| Peak::new(-(i as f32) / 3250.0, 0.0))
            .collect()])
        .unwrap();
        // starts 5000 px left of the canvas and ends far right of it
        let columns = peak_columns(&peaks, &instruction((-5000, 320000), (0, 3250)), 100);
        assert_eq!(columns.len(), 100);
        assert_eq!(columns[0].left(), 0.0);
        assert_eq!(columns[99].right(), 100.0);
        // pixel 0 is column 5000 of 325000, so it shows frame 50
        let expected = 100.0 - (1.0 - 50.0 / 3250.0) * 50.0;
        assert!(approx_eq!(f32, columns[0].bottom(), expected, epsilon = 1e-3));

        let endless = instruction((0, i64::MAX), (0, 4));
        assert_eq!(peak_columns(&peaks, &endless, 100).len(), 100);
        let behind = instruction((-300, -10), (0, 4));
        assert!(peak_columns(&peaks, &behind, 100).is_empty());
        let ahead = instruction((150, 400), (0, 4));
        assert!(peak_columns(&peaks, &ahead, 100).is_empty());
    }

    #[test]
    fn paints_mapped_regions() {
        let peaks = PeakBuffer::from_channels(vec![vec![Peak::new(-0.5, 0.5); 100]; 2]).unwrap();
        let mapper = RegionWaveformMapper::new(200, 80.0, 10.0, 120.0);
        let draws = mapper.map(&[Region::new("a", 0, 3840)], &peaks, Some(4.0));
        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.add(WaveformView::new(&peaks, &draws, egui::vec2(200.0, 80.0)));
            });
        });
        assert!(!output.shapes.is_empty());
    }
}
