use std::path::Path;

use anyhow::Result;
use egui::{Pos2, Vec2};
use image::RgbaImage;

use crate::{
    settings::Settings,
    surface::DrawingSurface,
    tools::{Tool, ToolState},
    undo::SnapshotHistory,
};

/// Drawing surface plus its history, driven by pointer events.
pub struct Canvas {
    surface: DrawingSurface,
    history: SnapshotHistory,
    eraser_radius: f32,
    image_offset: Pos2,
}

impl Canvas {
    pub fn new(settings: &Settings) -> Result<Self> {
        let surface = DrawingSurface::new(
            settings.canvas_width,
            settings.canvas_height,
            settings.background.into(),
        )?;
        let history = SnapshotHistory::new(&surface);
        Ok(Self {
            surface,
            history,
            eraser_radius: settings.eraser_radius,
            image_offset: settings.image_offset.into(),
        })
    }

    pub fn press(&mut self, pos: Pos2, tools: &ToolState) {
        match tools.tool() {
            Tool::Pencil => self.surface.begin_stroke(pos),
            Tool::Eraser => self.surface.erase_at(pos, self.eraser_radius),
            Tool::Text => {}
        }
    }

    pub fn drag(&mut self, pos: Pos2, tools: &ToolState) {
        match tools.tool() {
            Tool::Pencil => {
                self.surface
                    .stroke_to(pos, tools.color(), tools.stroke_width())
            }
            Tool::Eraser => self.surface.erase_at(pos, self.eraser_radius),
            Tool::Text => {}
        }
    }

    /// Pointer release: ends the stroke and commits the canvas.
    pub fn release(&mut self) -> bool {
        self.surface.end_stroke();
        self.history.save_state(&self.surface)
    }

    /// Places `text` at `pos` and commits. Empty text records nothing.
    pub fn add_text(&mut self, text: &str, pos: Pos2, tools: &ToolState) -> bool {
        if !self
            .surface
            .fill_text(text, pos, tools.color(), tools.font_size())
        {
            return false;
        }
        self.history.save_state(&self.surface)
    }

    pub fn add_image(&mut self, image: &RgbaImage) -> Result<Vec2> {
        let bounds = self.surface.size();
        let size =
            self.surface
                .draw_image_scaled(image, self.image_offset, bounds)?;
        self.history.save_state(&self.surface);
        Ok(size)
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.history.undo(&mut self.surface)
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.history.redo(&mut self.surface)
    }

    pub fn clear(&mut self) -> bool {
        self.history.clear(&mut self.surface)
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.surface.save_png(path)?;
        tracing::info!(path = %path.display(), "canvas saved");
        Ok(())
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }
}
