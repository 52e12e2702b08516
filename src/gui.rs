//! Painting of region waveforms, fade shapes and recent log lines.
//! Currently implemented on [`egui`].

use crate::fade::FadeParam;
use crate::parameter::{FloatParameter, Parameter};
use std::ops::RangeInclusive;

pub mod fade;
pub mod logview;
pub mod waveform;

pub use fade::FadePreview;
pub use logview::LogView;
pub use waveform::{paint_peak_blocks, WaveformView};

pub(crate) const PREVIEW_STEPS_DEFAULT: usize = 64;

fn slider_in_range(param: &FloatParameter, range: RangeInclusive<f64>) -> egui::Slider<'_> {
    egui::Slider::from_get_set(range, |v: Option<f64>| {
        if let Some(n) = v {
            param.set(n);
        }
        param.get()
    })
}

fn slider_from_parameter(param: &FloatParameter) -> egui::Slider<'_> {
    slider_in_range(param, param.range.clone())
}

/// Sliders for the lengths and slopes of a fade, followed by previews of
/// both shapes. Lengths are limited to `duration` pulses.
pub fn fade_controls(ui: &mut egui::Ui, param: &FadeParam, duration: f64) -> egui::Response {
    let duration = duration.max(0.0);
    ui.vertical(|ui| {
        ui.add(slider_in_range(&param.time_in, 0.0..=duration).text("fade in"));
        ui.add(slider_from_parameter(&param.slope_in).text("slope in"));
        ui.add(slider_in_range(&param.time_out, 0.0..=duration).text("fade out"));
        ui.add(slider_from_parameter(&param.slope_out).text("slope out"));
        param.fit_to(duration);
        ui.horizontal(|ui| {
            ui.add(FadePreview::new(param.curve_in()));
            ui.add(FadePreview::new(param.curve_out()).fade_out());
        });
    })
    .response
}
