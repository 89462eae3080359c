use digital_whiteboard::{WhiteboardApp, logging, settings::Settings};
use egui::{Style, Visuals};

fn main() -> eframe::Result<()> {
    let (settings, problem) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(err) => (Settings::default(), Some(err)),
    };
    logging::init(settings.debug_logging, Settings::file_path().as_deref());
    if let Some(err) = problem {
        tracing::warn!("using default settings: {err:#}");
    }
    tracing::info!(
        width = settings.canvas_width,
        height = settings.canvas_height,
        "starting whiteboard"
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Digital Whiteboard")
            .with_inner_size([1200.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Digital Whiteboard",
        native_options,
        Box::new(move |ctx| {
            egui_extras::install_image_loaders(&ctx.egui_ctx);
            let style = Style {
                visuals: Visuals::light(),
                ..Default::default()
            };
            ctx.egui_ctx.set_style(style);
            Ok(Box::new(WhiteboardApp::new(&settings)?))
        }),
    )
}
