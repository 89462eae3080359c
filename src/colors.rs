use eframe::{
    emath::vec2,
    epaint::{Stroke, StrokeKind},
};
use egui::Color32;

const MAX_SWATCHES: usize = 12;

/// Swatch row in the top toolbar. The active swatch opens the color picker.
pub struct ColorPalette {
    colors: Vec<Color32>,
    active: usize,
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: vec![
                Color32::BLACK,
                Color32::RED,
                Color32::from_rgb(255, 140, 0),
                Color32::DARK_GREEN,
                Color32::BLUE,
            ],
            active: 0,
        }
    }
}

impl ColorPalette {
    /// Palette whose active swatch is `color`, appended if not already
    /// present.
    pub fn with_active(color: Color32) -> Self {
        let mut palette = Self::default();
        palette.select(color);
        palette
    }

    pub fn current(&self) -> Color32 {
        self.colors[self.active]
    }

    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    pub fn select(&mut self, color: Color32) {
        match self.colors.iter().position(|c| *c == color) {
            Some(index) => self.active = index,
            None => self.push(color),
        }
    }

    pub fn push(&mut self, color: Color32) {
        if self.colors.len() >= MAX_SWATCHES {
            self.colors.remove(0);
        }
        self.colors.push(color);
        self.active = self.colors.len() - 1;
    }

    /// Draws the palette. Returns the new stroke color when it changed.
    pub fn draw(&mut self, ui: &mut egui::Ui) -> Option<Color32> {
        let before = self.current();
        let swatch = vec2(ui.spacing().interact_size.y, ui.spacing().interact_size.y);

        ui.horizontal(|ui| {
            for i in 0..self.colors.len() {
                if i == self.active {
                    egui::Frame::new()
                        .stroke(Stroke::new(2.0, ui.visuals().text_color()))
                        .inner_margin(2.0)
                        .corner_radius(4.0)
                        .show(ui, |ui| {
                            ui.color_edit_button_srgba(&mut self.colors[i]);
                        });
                    continue;
                }

                egui::Frame::new().inner_margin(4.0).show(ui, |ui| {
                    let (rect, response) =
                        ui.allocate_exact_size(swatch, egui::Sense::click());
                    if ui.is_rect_visible(rect) {
                        ui.painter().rect_filled(rect, 2.0, self.colors[i]);
                        ui.painter().rect_stroke(
                            rect,
                            2.0,
                            Stroke::new(
                                1.0,
                                ui.visuals().widgets.inactive.bg_stroke.color,
                            ),
                            StrokeKind::Outside,
                        );
                    }
                    if response.on_hover_text("Select color").clicked() {
                        self.active = i;
                    }
                });
            }

            if ui
                .add_sized(swatch + vec2(8.0, 8.0), egui::Button::new("+"))
                .on_hover_text("Add a swatch")
                .clicked()
            {
                self.push(self.current());
            }
        });

        let after = self.current();
        (after != before).then_some(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_reuses_existing_swatch() {
        let mut palette = ColorPalette::default();
        palette.select(Color32::BLUE);
        assert_eq!(palette.current(), Color32::BLUE);
        assert_eq!(palette.colors().len(), 5);
    }

    #[test]
    fn unknown_color_is_appended() {
        let custom = Color32::from_rgb(1, 2, 3);
        let palette = ColorPalette::with_active(custom);
        assert_eq!(palette.current(), custom);
        assert_eq!(palette.colors().len(), 6);
    }

    #[test]
    fn palette_is_bounded() {
        let mut palette = ColorPalette::default();
        for i in 0..20 {
            palette.push(Color32::from_gray(i));
        }
        assert_eq!(palette.colors().len(), MAX_SWATCHES);
        assert_eq!(palette.current(), Color32::from_gray(19));
    }
}
