use std::time::Duration;

use anyhow::Result;
use egui::{
    Align2, Color32, CursorIcon, FontId, Key, KeyboardShortcut, Modifiers, Pos2,
    Rect, Sense, TextureHandle, TextureOptions, Vec2, vec2,
};

pub mod canvas;
pub mod colors;
pub mod logging;
pub mod media;
pub mod settings;
pub mod surface;
pub mod toolbar;
pub mod tools;
pub mod undo;

use canvas::Canvas;
use colors::ColorPalette;
use media::{MediaKind, MediaOverlay, MediaSession};
use settings::Settings;
use toolbar::Action;
use tools::{Tool, ToolState};

const MUSIC_ICON: Vec2 = vec2(200.0, 200.0);
const MEDIA_POLL: Duration = Duration::from_millis(250);

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3"];

struct TextPrompt {
    at: Pos2,
    buffer: String,
}

pub struct WhiteboardApp {
    canvas: Canvas,
    tools: ToolState,
    palette: ColorPalette,
    media: MediaOverlay,
    text: String,
    prompt: Option<TextPrompt>,
    texture: Option<(TextureHandle, u64)>,
}

impl WhiteboardApp {
    pub fn new(settings: &Settings) -> Result<Self> {
        let color = settings.stroke_color.into();
        Ok(Self {
            canvas: Canvas::new(settings)?,
            tools: ToolState::new(color, settings.stroke_width, settings.font_size),
            palette: ColorPalette::with_active(color),
            media: MediaOverlay::default(),
            text: String::new(),
            prompt: None,
            texture: None,
        })
    }

    fn apply(&mut self, action: Action) {
        let result = match action {
            Action::SelectTool(tool) => {
                self.tools.select_tool(tool);
                Ok(())
            }
            Action::AddText => {
                self.tools.select_tool(Tool::Text);
                Ok(())
            }
            Action::Undo => self.canvas.undo().map(drop),
            Action::Redo => self.canvas.redo().map(drop),
            Action::Clear => {
                self.canvas.clear();
                Ok(())
            }
            Action::Save => self.save(),
            Action::AddImage => self.add_image(),
            Action::AddVideo => self.add_media(MediaKind::Video),
            Action::AddSong => self.add_media(MediaKind::Audio),
        };
        if let Err(err) = result {
            tracing::error!(?action, "{err:#}");
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("whiteboard.png")
            .save_file()
        else {
            return Ok(());
        };
        self.canvas.save_png(&path)
    }

    fn add_image(&mut self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image Files", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return Ok(());
        };
        let image = surface::decode_image(&path)?;
        let size = self.canvas.add_image(&image)?;
        tracing::info!(path = %path.display(), ?size, "image inserted");
        Ok(())
    }

    fn add_media(&mut self, kind: MediaKind) -> Result<()> {
        let (filter, extensions) = match kind {
            MediaKind::Audio => ("Audio Files", AUDIO_EXTENSIONS),
            MediaKind::Video => ("Video Files", VIDEO_EXTENSIONS),
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(filter, extensions)
            .pick_file()
        else {
            return Ok(());
        };
        match kind {
            MediaKind::Audio => self.media.open_audio(&path),
            MediaKind::Video => self.media.open_video(&path),
        }
    }

    fn shortcuts(&mut self, ctx: &egui::Context) {
        if shortcuts_blocked(self.prompt.is_some(), ctx.wants_keyboard_input()) {
            return;
        }
        let redo_alt =
            KeyboardShortcut::new(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z);
        let redo = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);
        let undo = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
        // Shift+Z must be consumed before plain Z matches it.
        let wants_redo = ctx.input_mut(|i| {
            i.consume_shortcut(&redo_alt) || i.consume_shortcut(&redo)
        });
        if wants_redo {
            self.apply(Action::Redo);
        } else if ctx.input_mut(|i| i.consume_shortcut(&undo)) {
            self.apply(Action::Undo);
        }
    }

    fn canvas_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let surface = self.canvas.surface();
        let revision = surface.revision();
        if let Some((texture, seen)) = &mut self.texture {
            if *seen != revision {
                texture.set(surface.to_color_image(), TextureOptions::NEAREST);
                *seen = revision;
            }
            return texture.id();
        }
        let texture = ctx.load_texture(
            "canvas",
            surface.to_color_image(),
            TextureOptions::NEAREST,
        );
        let id = texture.id();
        self.texture = Some((texture, revision));
        id
    }

    fn canvas_panel(&mut self, ui: &mut egui::Ui) {
        let texture = self.canvas_texture(ui.ctx());
        let (rect, response) = ui.allocate_exact_size(
            self.canvas.surface().size(),
            Sense::click_and_drag(),
        );
        let response = response.on_hover_cursor(CursorIcon::Crosshair);
        ui.painter().image(
            texture,
            rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );

        let to_canvas = |p: Pos2| (p - rect.min).to_pos2();
        if response.drag_started() {
            // drag_started fires past the drag threshold; begin where the
            // button went down.
            let origin = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = press_point(origin, response.interact_pointer_pos())
            {
                self.canvas.press(to_canvas(pos), &self.tools);
            }
        }
        if let Some(pos) = response.interact_pointer_pos().map(to_canvas) {
            if response.dragged() {
                self.canvas.drag(pos, &self.tools);
            }
            if response.clicked() {
                if let Some(at) = self.tools.take_text_click(pos) {
                    self.prompt = Some(TextPrompt {
                        at,
                        buffer: self.text.clone(),
                    });
                }
            }
        }
        if response.drag_stopped() {
            self.canvas.release();
        }

        self.media_overlay(ui, rect);
    }

    fn media_overlay(&mut self, ui: &mut egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        if !self.media.description().is_empty() {
            painter.text(
                rect.center_top() + vec2(0.0, 8.0),
                Align2::CENTER_TOP,
                self.media.description(),
                FontId::proportional(16.0),
                Color32::DARK_GRAY,
            );
        }

        let visible: Vec<MediaKind> = [MediaKind::Video, MediaKind::Audio]
            .into_iter()
            .filter(|kind| {
                self.media
                    .session(*kind)
                    .is_some_and(MediaSession::overlay_visible)
            })
            .collect();

        for (index, kind) in visible.iter().enumerate() {
            let Some(session) = self.media.session(*kind) else {
                continue;
            };
            if *kind == MediaKind::Audio {
                let icon = Rect::from_center_size(rect.center(), MUSIC_ICON);
                painter.circle_filled(
                    icon.center(),
                    MUSIC_ICON.x / 2.0,
                    Color32::from_gray(60),
                );
                egui::Image::new(egui::include_image!("../assets/media/music.png"))
                    .paint_at(ui, icon.shrink(36.0));
            }

            // Buttons share the bottom edge, side by side when both show.
            let offset = (index as f32 - (visible.len() as f32 - 1.0) / 2.0) * 110.0;
            let button = Rect::from_center_size(
                rect.center_bottom() + vec2(offset, -24.0),
                vec2(100.0, 28.0),
            );
            let label = session.button_label();
            if ui.put(button, egui::Button::new(label)).clicked() {
                self.media.toggle(*kind);
            }
        }
    }

    fn text_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = &mut self.prompt else {
            return;
        };
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Add Text")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Enter the text to place on the canvas:");
                let edit = ui.text_edit_singleline(&mut prompt.buffer);
                edit.request_focus();
                if edit.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    submit |= ui.button("OK").clicked();
                    cancel |= ui.button("Cancel").clicked();
                });
            });
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            cancel = true;
        }

        if submit {
            if let Some(prompt) = self.prompt.take() {
                self.canvas.add_text(&prompt.buffer, prompt.at, &self.tools);
            }
        } else if cancel {
            self.prompt = None;
        }
    }
}

/// Undo/redo shortcuts yield to any widget that is taking keystrokes.
fn shortcuts_blocked(prompt_open: bool, wants_keyboard: bool) -> bool {
    prompt_open || wants_keyboard
}

/// Where a stroke begins: the press origin when egui still has it.
fn press_point(origin: Option<Pos2>, current: Option<Pos2>) -> Option<Pos2> {
    origin.or(current)
}

impl eframe::App for WhiteboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.shortcuts(ctx);
        self.media.tick();
        if self.media.is_playing() {
            ctx.request_repaint_after(MEDIA_POLL);
        }

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            actions.extend(toolbar::top(
                ui,
                &mut self.palette,
                &mut self.tools,
                &mut self.text,
            ));
        });
        egui::TopBottomPanel::bottom("bottom_toolbar").show(ctx, |ui| {
            actions.extend(toolbar::bottom(ui));
        });
        let history = self.canvas.history();
        let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
        egui::SidePanel::right("side_toolbar").show(ctx, |ui| {
            actions.extend(toolbar::side(ui, &mut self.tools, can_undo, can_redo));
        });
        for action in actions {
            self.apply(action);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::from_gray(200)))
            .show(ctx, |ui| {
                egui::ScrollArea::both().show(ui, |ui| {
                    self.canvas_panel(ui);
                });
            });

        self.text_prompt(ctx);
    }
}
