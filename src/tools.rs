use egui::{Color32, ImageSource, Pos2};

pub(super) const TOOLS: [(Tool, ImageSource, &str); 3] = [
    (
        Tool::Pencil,
        egui::include_image!("../assets/tools/pencil.png"),
        "Pencil",
    ),
    (
        Tool::Eraser,
        egui::include_image!("../assets/tools/eraser.png"),
        "Eraser",
    ),
    (
        Tool::Text,
        egui::include_image!("../assets/tools/text.png"),
        "Text",
    ),
];

pub const FONT_SIZE_RANGE: std::ops::RangeInclusive<f32> = 8.0..=72.0;
pub const STROKE_WIDTH_RANGE: std::ops::RangeInclusive<f32> = 1.0..=20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Text,
}

/// One-shot text placement: armed by selecting the text tool, consumed by
/// the next canvas click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TextPlacement {
    #[default]
    Idle,
    AwaitingClick,
}

#[derive(Clone, Debug)]
pub struct ToolState {
    tool: Tool,
    color: Color32,
    stroke_width: f32,
    font_size: f32,
    placement: TextPlacement,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: Tool::Pencil,
            color: Color32::BLACK,
            stroke_width: 2.0,
            font_size: 20.0,
            placement: TextPlacement::Idle,
        }
    }
}

impl ToolState {
    pub fn new(color: Color32, stroke_width: f32, font_size: f32) -> Self {
        let mut state = Self::default();
        state.set_color(color);
        state.set_stroke_width(stroke_width);
        state.set_font_size(font_size);
        state
    }

    pub fn select_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.placement = if tool == Tool::Text {
            TextPlacement::AwaitingClick
        } else {
            TextPlacement::Idle
        };
        tracing::debug!(?tool, "tool selected");
    }

    /// Feeds a canvas click into the placement machine. Yields the
    /// position once per arming.
    pub fn take_text_click(&mut self, pos: Pos2) -> Option<Pos2> {
        match self.placement {
            TextPlacement::AwaitingClick => {
                self.placement = TextPlacement::Idle;
                Some(pos)
            }
            TextPlacement::Idle => None,
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }
    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width =
            width.clamp(*STROKE_WIDTH_RANGE.start(), *STROKE_WIDTH_RANGE.end());
    }
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size =
            size.clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end());
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }
    pub fn color(&self) -> Color32 {
        self.color
    }
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }
    pub fn font_size(&self) -> f32 {
        self.font_size
    }
    pub fn placement(&self) -> TextPlacement {
        self.placement
    }
}
