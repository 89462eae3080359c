use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use eframe::{emath::Pos2, epaint::Color32};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub(crate) [u8; 4]);
impl From<Color32> for Color {
    fn from(c: Color32) -> Self {
        Self(c.to_srgba_unmultiplied())
    }
}
impl From<Color> for Color32 {
    fn from(c: Color) -> Self {
        let [r, g, b, a] = c.0;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pos {
    x: f32,
    y: f32,
}
impl From<Pos> for Pos2 {
    fn from(pos: Pos) -> Self {
        Pos2::new(pos.x, pos.y)
    }
}

/// User configuration, read once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub font_size: f32,
    pub eraser_radius: f32,
    pub image_offset: Pos,
    pub debug_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 1000,
            canvas_height: 600,
            background: Color32::WHITE.into(),
            stroke_color: Color32::BLACK.into(),
            stroke_width: 2.0,
            font_size: 20.0,
            eraser_radius: 10.0,
            image_offset: Pos { x: 50.0, y: 50.0 },
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("com", "whiteboard", "digital-whiteboard")?;
        Some(dirs.config_dir().join("settings.json"))
    }

    /// Reads the settings file, writing the defaults on first run.
    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve config dir")?;
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(&path)?;
            return Ok(settings);
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("cannot parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("cannot write {}", path.display()))
    }
}
