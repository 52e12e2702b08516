use crate::data::Scene;
use crate::error::Result;
pub use clap::Parser;
use std::path::PathBuf;

/// regionview - print the waveform draw list and fade shapes of a scene
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path of a scene file (json). The built-in demo scene is used when omitted
    pub file: Option<PathBuf>,
    /// Canvas width in pixels, overrides the scene
    #[arg(short = 'W', long)]
    pub width: Option<u32>,
    /// Canvas height in pixels, overrides the scene
    #[arg(short = 'H', long)]
    pub height: Option<f32>,
    /// Number of steps of the fade preview table
    #[arg(short, long, default_value_t = 8)]
    pub steps: usize,
    /// Print the draw list as json
    #[arg(short, long)]
    pub json: bool,
    /// log infomation level (1:trace 2:debug 3:info 4:warn 5:error 6:none)
    #[arg(short, long, default_value_t = 3)]
    pub log_level: u8,
}

impl Args {
    /// Loads the scene named on the command line, or the demo scene, with
    /// canvas overrides applied.
    pub fn scene(&self) -> Result<Scene> {
        let mut scene = match &self.file {
            Some(path) => Scene::load(path)?,
            None => Scene::default(),
        };
        if let Some(width) = self.width {
            scene.canvas.width = width;
        }
        if let Some(height) = self.height {
            scene.canvas.height = height;
        }
        scene.validate()?;
        Ok(scene)
    }
}
