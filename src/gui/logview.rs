use crate::utils::logger::Logger;

pub fn level_color(level: log::Level) -> egui::Color32 {
    match level {
        log::Level::Error => egui::Color32::RED,
        log::Level::Warn => egui::Color32::YELLOW,
        log::Level::Info => egui::Color32::WHITE,
        log::Level::Debug => egui::Color32::DEBUG_COLOR,
        log::Level::Trace => egui::Color32::BLUE,
    }
}

/// The latest records kept by a [`Logger`], newest on top.
pub struct LogView<'a> {
    logger: &'a Logger,
    max_lines: usize,
}

impl<'a> LogView<'a> {
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            max_lines: 100,
        }
    }
    pub fn max_lines(mut self, max_lines: usize) -> Self {
        self.max_lines = max_lines;
        self
    }
}

impl<'a> egui::Widget for LogView<'a> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let recent = self.logger.recent();
        ui.vertical(|ui| {
            for (text, level) in recent.iter().take(self.max_lines) {
                ui.colored_label(level_color(*level), text);
            }
        })
        .response
    }
}
