use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use anyhow::{Context, Result, anyhow, bail};
use egui::{Color32, ColorImage, Pos2, Rect, Vec2};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tiny_skia::{
    ColorU8, FilterQuality, IntSize, LineCap, LineJoin, Paint, PathBuilder,
    Pixmap, PixmapPaint, Stroke, Transform,
};

/// Immutable copy of the surface pixels at one point in time.
#[derive(Clone)]
pub struct Snapshot {
    pixels: Pixmap,
}

impl Snapshot {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.width() == other.width()
            && self.height() == other.height()
            && self.pixels.data() == other.pixels.data()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// The raster canvas every tool draws into.
///
/// Pixels are kept opaque: erasing paints the background color back
/// instead of punching transparent holes, so premultiplied and straight
/// RGBA agree everywhere in the buffer.
pub struct DrawingSurface {
    pixmap: Pixmap,
    background: Color32,
    pen: Option<Pos2>,
    font: Option<FontArc>,
    revision: u64,
}

impl DrawingSurface {
    pub fn new(width: u32, height: u32, background: Color32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            anyhow!("cannot allocate a {width}x{height} canvas")
        })?;
        let font = load_font();
        if font.is_none() {
            tracing::warn!("no usable font found, text insertion disabled");
        }
        let mut surface = Self {
            pixmap,
            background: opaque(background),
            pen: None,
            font,
            revision: 0,
        };
        surface.clear();
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }
    pub fn background(&self) -> Color32 {
        self.background
    }
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn begin_stroke(&mut self, point: Pos2) {
        self.pen = Some(point);
    }

    pub fn stroke_to(&mut self, point: Pos2, color: Color32, width: f32) {
        let Some(from) = self.pen.replace(point) else {
            return;
        };
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(point.x, point.y);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            &path,
            &paint(color, true),
            &stroke,
            Transform::identity(),
            None,
        );
        self.touch();
    }

    pub fn end_stroke(&mut self) {
        self.pen = None;
    }

    pub fn erase_at(&mut self, point: Pos2, radius: f32) {
        let rect = Rect::from_center_size(point, Vec2::splat(radius * 2.0));
        self.fill_rect(rect, self.background);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color32) {
        let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.min.x,
            rect.min.y,
            rect.width(),
            rect.height(),
        ) else {
            return;
        };
        self.pixmap.fill_rect(
            rect,
            &paint(color, false),
            Transform::identity(),
            None,
        );
        self.touch();
    }

    pub fn clear(&mut self) {
        let [r, g, b, a] = self.background.to_srgba_unmultiplied();
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        self.pen = None;
        self.touch();
    }

    /// Stamps `text` with its baseline at `position`. Returns whether
    /// anything was drawn.
    pub fn fill_text(
        &mut self,
        text: &str,
        position: Pos2,
        color: Color32,
        font_size: f32,
    ) -> bool {
        if text.is_empty() {
            return false;
        }
        let Some(font) = &self.font else {
            tracing::warn!("skipping text insertion, no font loaded");
            return false;
        };
        let scale = PxScale::from(font_size);
        let ascent = font.as_scaled(scale).ascent();

        let Some(mut image) = RgbaImage::from_raw(
            self.width(),
            self.height(),
            self.pixmap.data().to_vec(),
        ) else {
            return false;
        };
        draw_text_mut(
            &mut image,
            Rgba(opaque(color).to_srgba_unmultiplied()),
            position.x.round() as i32,
            (position.y - ascent).round() as i32,
            scale,
            font,
            text,
        );
        self.pixmap.data_mut().copy_from_slice(image.as_raw());
        self.touch();
        true
    }

    /// Blits `image` at `position`, shrunk to fit `max_bounds` if needed.
    /// Returns the size it was drawn at.
    pub fn draw_image_scaled(
        &mut self,
        image: &RgbaImage,
        position: Pos2,
        max_bounds: Vec2,
    ) -> Result<Vec2> {
        let original = Vec2::new(image.width() as f32, image.height() as f32);
        let target = fit_within(original, max_bounds);
        let source = premultiplied_pixmap(image)?;
        let transform = Transform::from_row(
            target.x / original.x,
            0.0,
            0.0,
            target.y / original.y,
            position.x,
            position.y,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
        self.touch();
        Ok(target)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixels: self.pixmap.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.width() != self.width() || snapshot.height() != self.height()
        {
            bail!(
                "snapshot is {}x{}, canvas is {}x{}",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
        }
        self.pixmap
            .data_mut()
            .copy_from_slice(snapshot.pixels.data());
        self.pen = None;
        self.touch();
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color32::from_rgba_unmultiplied(
            p.red(),
            p.green(),
            p.blue(),
            p.alpha(),
        ))
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_premultiplied(
            [self.width() as usize, self.height() as usize],
            self.pixmap.data(),
        )
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.to_rgba_image()
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("cannot write {}", path.display()))
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Shrinks `size` into `bounds` keeping the aspect ratio. Never enlarges.
pub fn fit_within(size: Vec2, bounds: Vec2) -> Vec2 {
    let mut out = size;
    if size.x > bounds.x || size.y > bounds.y {
        let aspect = size.x / size.y;
        if size.x > bounds.x {
            out.x = bounds.x;
            out.y = out.x / aspect;
        }
        if out.y > bounds.y {
            out.y = bounds.y;
            out.x = out.y * aspect;
        }
    }
    out
}

pub fn decode_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)
        .with_context(|| format!("cannot decode {}", path.display()))?;
    Ok(image.to_rgba8())
}

fn premultiplied_pixmap(image: &RgbaImage) -> Result<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())
        .ok_or_else(|| anyhow!("image has no pixels"))?;
    let mut data = Vec::with_capacity(image.as_raw().len());
    for Rgba([r, g, b, a]) in image.pixels() {
        let p = ColorU8::from_rgba(*r, *g, *b, *a).premultiply();
        data.extend_from_slice(&[p.red(), p.green(), p.blue(), p.alpha()]);
    }
    Pixmap::from_vec(data, size)
        .ok_or_else(|| anyhow!("cannot build pixmap from image"))
}

fn paint(color: Color32, anti_alias: bool) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = anti_alias;
    paint
}

fn opaque(color: Color32) -> Color32 {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    Color32::from_rgb(r, g, b)
}

fn load_font() -> Option<FontArc> {
    // egui ships its default proportional font, which keeps canvas text
    // consistent with the toolbar.
    let defs = egui::FontDefinitions::default();
    let bundled = defs
        .families
        .get(&egui::FontFamily::Proportional)
        .into_iter()
        .flatten()
        .filter_map(|name| defs.font_data.get(name))
        .find_map(|data| FontArc::try_from_vec(data.font.to_vec()).ok());
    if bundled.is_some() {
        return bundled;
    }

    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    candidates.into_iter().find_map(|path| {
        let bytes = std::fs::read(path).ok()?;
        FontArc::try_from_vec(bytes).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> DrawingSurface {
        DrawingSurface::new(200, 120, Color32::WHITE).unwrap()
    }

    #[test]
    fn new_surface_is_uniform_background() {
        let surface = blank();
        assert_eq!(surface.pixel(0, 0), Some(Color32::WHITE));
        assert_eq!(surface.pixel(199, 119), Some(Color32::WHITE));
        assert_eq!(surface.pixel(200, 0), None);
    }

    #[test]
    fn stroke_marks_the_segment() {
        let mut surface = blank();
        surface.begin_stroke(Pos2::new(10.0, 10.0));
        surface.stroke_to(Pos2::new(50.0, 50.0), Color32::BLACK, 4.0);
        surface.end_stroke();

        assert_eq!(surface.pixel(30, 30), Some(Color32::BLACK));
        assert_eq!(surface.pixel(30, 80), Some(Color32::WHITE));
    }

    #[test]
    fn stroke_without_pen_only_moves_it() {
        let mut surface = blank();
        let before = surface.snapshot();
        surface.stroke_to(Pos2::new(50.0, 50.0), Color32::BLACK, 2.0);
        assert_eq!(surface.snapshot(), before);
    }

    #[test]
    fn erase_clears_square_only() {
        let mut surface = blank();
        surface.fill_rect(
            Rect::from_min_max(Pos2::ZERO, Pos2::new(100.0, 100.0)),
            Color32::RED,
        );
        surface.erase_at(Pos2::new(50.0, 50.0), 10.0);

        assert_eq!(surface.pixel(45, 45), Some(Color32::WHITE));
        assert_eq!(surface.pixel(59, 59), Some(Color32::WHITE));
        assert_eq!(surface.pixel(61, 61), Some(Color32::RED));
        assert_eq!(surface.pixel(30, 30), Some(Color32::RED));
    }

    #[test]
    fn empty_text_is_a_no_op() {
        let mut surface = blank();
        let revision = surface.revision();
        assert!(!surface.fill_text(
            "",
            Pos2::new(100.0, 100.0),
            Color32::BLACK,
            20.0
        ));
        assert_eq!(surface.revision(), revision);
    }

    #[test]
    fn text_changes_pixels() {
        let mut surface = blank();
        let before = surface.snapshot();
        assert!(surface.fill_text(
            "Hello",
            Pos2::new(20.0, 60.0),
            Color32::BLACK,
            20.0
        ));
        assert_ne!(surface.snapshot(), before);
    }

    #[test]
    fn fit_shrinks_wide_images() {
        let out = fit_within(Vec2::new(2000.0, 500.0), Vec2::new(1000.0, 600.0));
        assert_eq!(out, Vec2::new(1000.0, 250.0));
    }

    #[test]
    fn fit_shrinks_tall_images() {
        let out = fit_within(Vec2::new(300.0, 1200.0), Vec2::new(1000.0, 600.0));
        assert_eq!(out, Vec2::new(150.0, 600.0));
    }

    #[test]
    fn fit_never_upscales() {
        let out = fit_within(Vec2::new(40.0, 30.0), Vec2::new(1000.0, 600.0));
        assert_eq!(out, Vec2::new(40.0, 30.0));
    }

    #[test]
    fn draw_image_scaled_blits_fitted_image() {
        let mut surface = blank();
        let image = RgbaImage::from_pixel(400, 100, Rgba([0, 0, 255, 255]));
        let drawn = surface
            .draw_image_scaled(&image, Pos2::ZERO, Vec2::new(200.0, 120.0))
            .unwrap();

        assert_eq!(drawn, Vec2::new(200.0, 50.0));
        assert_eq!(surface.pixel(100, 25), Some(Color32::BLUE));
        assert_eq!(surface.pixel(100, 80), Some(Color32::WHITE));
    }

    #[test]
    fn restore_overwrites_everything() {
        let mut surface = blank();
        let clean = surface.snapshot();
        surface.fill_rect(
            Rect::from_min_max(Pos2::ZERO, Pos2::new(200.0, 120.0)),
            Color32::GREEN,
        );
        surface.restore(&clean).unwrap();
        assert_eq!(surface.snapshot(), clean);
    }

    #[test]
    fn restore_rejects_other_dimensions() {
        let mut surface = blank();
        let other = DrawingSurface::new(10, 10, Color32::WHITE).unwrap();
        assert!(surface.restore(&other.snapshot()).is_err());
    }

    #[test]
    fn snapshots_of_different_sizes_differ() {
        let a = DrawingSurface::new(10, 10, Color32::WHITE).unwrap();
        let b = DrawingSurface::new(10, 11, Color32::WHITE).unwrap();
        assert_ne!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn export_matches_pixels() {
        let mut surface = blank();
        surface.fill_rect(
            Rect::from_min_size(Pos2::ZERO, Vec2::splat(4.0)),
            Color32::RED,
        );
        let image = surface.to_rgba_image();
        assert_eq!(image.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(10, 10), &Rgba([255, 255, 255, 255]));
    }
}
