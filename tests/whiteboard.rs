use digital_whiteboard::{
    canvas::Canvas,
    settings::Settings,
    tools::{Tool, ToolState},
};
use egui::{Color32, Pos2};

fn canvas() -> Canvas {
    Canvas::new(&Settings {
        canvas_width: 400,
        canvas_height: 300,
        ..Default::default()
    })
    .unwrap()
}

fn stroke(canvas: &mut Canvas, tools: &ToolState, from: Pos2, to: Pos2) {
    canvas.press(from, tools);
    canvas.drag(to, tools);
    canvas.release();
}

#[test]
fn stroke_undo_redo() {
    let mut canvas = canvas();
    let tools = ToolState::new(Color32::BLACK, 4.0, 20.0);
    let blank = canvas.surface().snapshot();

    stroke(&mut canvas, &tools, Pos2::new(10.0, 10.0), Pos2::new(50.0, 50.0));
    assert_eq!(canvas.history().undo_depth(), 2);
    let drawn = canvas.surface().snapshot();
    assert_ne!(drawn, blank);

    assert!(canvas.undo().unwrap());
    assert_eq!(canvas.surface().snapshot(), blank);

    assert!(canvas.redo().unwrap());
    assert_eq!(canvas.surface().snapshot(), drawn);
}

#[test]
fn many_actions_round_trip() {
    let mut canvas = canvas();
    let tools = ToolState::default();
    let blank = canvas.surface().snapshot();

    for i in 0..5 {
        let y = 20.0 + i as f32 * 40.0;
        stroke(&mut canvas, &tools, Pos2::new(10.0, y), Pos2::new(300.0, y));
    }
    let last = canvas.surface().snapshot();

    while canvas.undo().unwrap() {}
    assert_eq!(canvas.surface().snapshot(), blank);
    assert_eq!(canvas.history().redo_depth(), 5);

    while canvas.redo().unwrap() {}
    assert_eq!(canvas.surface().snapshot(), last);
}

#[test]
fn text_insertion_commits_only_real_text() {
    let mut canvas = canvas();
    let mut tools = ToolState::default();
    tools.select_tool(Tool::Text);
    let at = tools.take_text_click(Pos2::new(100.0, 100.0)).unwrap();

    assert!(!canvas.add_text("", at, &tools));
    assert_eq!(canvas.history().undo_depth(), 1);

    assert!(canvas.add_text("Hello", at, &tools));
    assert_eq!(canvas.history().undo_depth(), 2);
}

#[test]
fn clear_yields_background() {
    let mut canvas = canvas();
    let tools = ToolState::default();
    stroke(&mut canvas, &tools, Pos2::new(0.0, 0.0), Pos2::new(399.0, 299.0));

    assert!(canvas.clear());
    let surface = canvas.surface();
    for (x, y) in [(0, 0), (200, 150), (399, 299)] {
        assert_eq!(surface.pixel(x, y), Some(Color32::WHITE));
    }
    assert!(!canvas.clear());
    assert_eq!(canvas.history().undo_depth(), 3);
}

#[test]
fn redo_after_new_stroke_is_a_no_op() {
    let mut canvas = canvas();
    let tools = ToolState::default();
    stroke(&mut canvas, &tools, Pos2::new(10.0, 10.0), Pos2::new(60.0, 10.0));
    canvas.undo().unwrap();
    stroke(&mut canvas, &tools, Pos2::new(10.0, 80.0), Pos2::new(60.0, 80.0));

    let before = canvas.surface().snapshot();
    assert!(!canvas.redo().unwrap());
    assert_eq!(canvas.surface().snapshot(), before);
}

#[test]
fn saved_png_matches_canvas() {
    let mut canvas = canvas();
    let tools = ToolState::new(Color32::RED, 6.0, 20.0);
    stroke(&mut canvas, &tools, Pos2::new(20.0, 20.0), Pos2::new(80.0, 20.0));

    let path = std::env::temp_dir()
        .join(format!("whiteboard-export-{}.png", std::process::id()));
    canvas.save_png(&path).unwrap();
    let image = image::open(&path).unwrap().to_rgba8();
    let _ = std::fs::remove_file(&path);

    assert_eq!(image.dimensions(), (400, 300));
    assert_eq!(image.get_pixel(50, 20).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(50, 200).0, [255, 255, 255, 255]);
}
