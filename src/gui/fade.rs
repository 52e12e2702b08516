use super::PREVIEW_STEPS_DEFAULT;
use crate::curve::FadeCurve;

/// Screen positions of the curve drawn into `rect`, from the bottom-left
/// corner (silence) to the top-right one (full gain). A fade-out is drawn
/// mirrored from the top-left corner.
pub fn curve_points(
    curve: &FadeCurve,
    rect: egui::Rect,
    steps: usize,
    fade_out: bool,
) -> Vec<egui::Pos2> {
    curve
        .preview(steps)
        .into_iter()
        .map(|p| {
            let y = if fade_out { 1.0 - p.y } else { p.y };
            egui::pos2(
                rect.left() + p.x as f32 * rect.width(),
                rect.bottom() - y as f32 * rect.height(),
            )
        })
        .collect()
}

/// Small square plot of a fade shape.
pub struct FadePreview {
    curve: FadeCurve,
    size: egui::Vec2,
    steps: usize,
    fade_out: bool,
}

impl FadePreview {
    pub fn new(curve: FadeCurve) -> Self {
        Self {
            curve,
            size: egui::vec2(60.0, 60.0),
            steps: PREVIEW_STEPS_DEFAULT,
            fade_out: false,
        }
    }
    pub fn size(mut self, size: egui::Vec2) -> Self {
        self.size = size;
        self
    }
    pub fn steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }
    pub fn fade_out(mut self) -> Self {
        self.fade_out = true;
        self
    }
}

impl egui::Widget for FadePreview {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let (response, painter) = ui.allocate_painter(self.size, egui::Sense::hover());
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);
        let points = curve_points(&self.curve, rect.shrink(2.0), self.steps, self.fade_out);
        painter.add(egui::Shape::line(
            points,
            egui::Stroke::new(1.5, ui.visuals().strong_text_color()),
        ));
        response.on_hover_text(format!("slope {:.2}", self.curve.slope()))
    }
}
