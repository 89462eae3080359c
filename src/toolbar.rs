use egui::{Button, Image, Slider, Ui};

use crate::{
    colors::ColorPalette,
    tools::{FONT_SIZE_RANGE, STROKE_WIDTH_RANGE, TOOLS, Tool, ToolState},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SelectTool(Tool),
    AddText,
    Save,
    Undo,
    Redo,
    Clear,
    AddImage,
    AddVideo,
    AddSong,
}

/// Palette, text entry and save.
pub fn top(
    ui: &mut Ui,
    palette: &mut ColorPalette,
    tools: &mut ToolState,
    text: &mut String,
) -> Vec<Action> {
    let mut actions = Vec::new();
    ui.horizontal(|ui| {
        if let Some(color) = palette.draw(ui) {
            tools.set_color(color);
        }
        ui.separator();
        ui.add(
            egui::TextEdit::singleline(text)
                .hint_text("Text")
                .desired_width(180.0),
        );
        if ui.button("Add Text").clicked() {
            actions.push(Action::AddText);
        }
        ui.separator();
        if ui.button("Save").clicked() {
            actions.push(Action::Save);
        }
    });
    actions
}

/// Tools, history and sizes.
pub fn side(
    ui: &mut Ui,
    tools: &mut ToolState,
    can_undo: bool,
    can_redo: bool,
) -> Vec<Action> {
    let mut actions = Vec::new();
    ui.vertical(|ui| {
        ui.heading("Tools");
        for (tool, icon, name) in TOOLS {
            let button = Button::image_and_text(
                Image::new(icon).fit_to_exact_size(egui::vec2(20.0, 20.0)),
                name,
            )
            .selected(tools.tool() == tool);
            if ui.add_sized([100.0, 28.0], button).clicked() {
                actions.push(Action::SelectTool(tool));
            }
        }

        ui.add_space(10.0);
        if ui
            .add_enabled(can_undo, Button::new("Undo"))
            .on_hover_text("Ctrl+Z")
            .clicked()
        {
            actions.push(Action::Undo);
        }
        if ui
            .add_enabled(can_redo, Button::new("Redo"))
            .on_hover_text("Ctrl+Y")
            .clicked()
        {
            actions.push(Action::Redo);
        }
        if ui.button("Clear").clicked() {
            actions.push(Action::Clear);
        }

        ui.add_space(10.0);
        let mut width = tools.stroke_width();
        if ui
            .add(Slider::new(&mut width, STROKE_WIDTH_RANGE).text("Stroke"))
            .changed()
        {
            tools.set_stroke_width(width);
        }
        let mut size = tools.font_size();
        if ui
            .add(Slider::new(&mut size, FONT_SIZE_RANGE).text("Font"))
            .changed()
        {
            tools.set_font_size(size);
        }
    });
    actions
}

/// Media insertion.
pub fn bottom(ui: &mut Ui) -> Vec<Action> {
    let mut actions = Vec::new();
    ui.horizontal(|ui| {
        for (label, action) in [
            ("Add Image", Action::AddImage),
            ("Add Video", Action::AddVideo),
            ("Add Song", Action::AddSong),
        ] {
            if ui.button(label).clicked() {
                actions.push(action);
            }
        }
    });
    actions
}
