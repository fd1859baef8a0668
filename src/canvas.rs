//! Raster canvas backed by a tiny-skia pixmap.
//!
//! Provides the primitive operations the render pass needs: stroke and fill
//! of lines, circles, rectangles, polygons and ellipses, bitmap text, image
//! rotation and blitting, alpha compositing, and persistence through the
//! `image` crate. The canvas is always fully opaque, so premultiplied and
//! straight RGBA coincide.

use std::fmt;
use std::path::Path;

use font8x8::{BASIC_FONTS, UnicodeFonts};
use glam::Vec2;
use tiny_skia::{
    FillRule, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform,
};

use crate::errors::PlotError;
use crate::render::defaults;
use crate::types::{Color, PixelPoint};

/// Glyph cell size of the built-in bitmap font
const GLYPH_CELL: usize = 8;
/// Rows above the baseline
const GLYPH_ASCENT: f64 = 7.0;

/// Measured size of a text run, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextExtent {
    pub width: i32,
    /// Height above the baseline
    pub height: i32,
    /// Depth below the baseline
    pub baseline: i32,
}

/// An opaque RGBA raster with drawing primitives
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    ops: u64,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("ops", &self.ops)
            .finish()
    }
}

impl Canvas {
    /// Create a canvas filled with the default background
    pub fn new(width: u32, height: u32) -> Result<Self, PlotError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(PlotError::InvalidCanvasSize { width, height })?;
        pixmap.fill(defaults::BACKGROUND.to_skia());
        Ok(Canvas { pixmap, ops: 0 })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Number of primitive operations performed on this canvas so far
    pub fn draw_ops(&self) -> u64 {
        self.ops
    }

    /// Raw RGBA bytes, row-major
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Colour at a pixel, or `None` outside the canvas
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixmap
            .pixel(x, y)
            .map(|p| Color::rgb(p.red(), p.green(), p.blue()))
    }

    pub fn clear(&mut self, color: Color) {
        self.ops += 1;
        self.pixmap.fill(color.to_skia());
    }

    pub fn stroke_line(&mut self, p0: PixelPoint, p1: PixelPoint, color: Color, width: f32) {
        let mut pb = PathBuilder::new();
        let (a, b) = (center_of(p0), center_of(p1));
        pb.move_to(a.x, a.y);
        pb.line_to(b.x, b.y);
        if let Some(path) = pb.finish() {
            self.stroke_path(&path, color, width);
        }
    }

    pub fn fill_circle(&mut self, center: PixelPoint, radius: f32, color: Color) {
        let c = center_of(center);
        if let Some(path) = PathBuilder::from_circle(c.x, c.y, radius) {
            self.fill_path(&path, color, FillRule::Winding);
        }
    }

    pub fn stroke_circle(&mut self, center: PixelPoint, radius: f32, color: Color, width: f32) {
        let c = center_of(center);
        if let Some(path) = PathBuilder::from_circle(c.x, c.y, radius) {
            self.stroke_path(&path, color, width);
        }
    }

    /// Fill the axis-aligned rectangle spanned by two opposite corners, both
    /// corner pixels included
    pub fn fill_rect(&mut self, a: PixelPoint, b: PixelPoint, color: Color) {
        let (lo, hi) = (a.min(b), a.max(b));
        if let Some(rect) = Rect::from_ltrb(lo.x as f32, lo.y as f32, (hi.x + 1) as f32, (hi.y + 1) as f32) {
            self.ops += 1;
            self.pixmap
                .fill_rect(rect, &paint(color), Transform::identity(), None);
        }
    }

    /// Outline the axis-aligned rectangle spanned by two opposite corners
    pub fn stroke_rect(&mut self, a: PixelPoint, b: PixelPoint, color: Color, width: f32) {
        let (lo, hi) = (center_of(a.min(b)), center_of(a.max(b)));
        if let Some(rect) = Rect::from_ltrb(lo.x, lo.y, hi.x, hi.y) {
            let path = PathBuilder::from_rect(rect);
            self.stroke_path(&path, color, width);
        }
    }

    /// Fill a polygon (even-odd rule, so self-intersections leave holes)
    pub fn fill_polygon(&mut self, points: &[PixelPoint], color: Color) {
        if let Some(path) = polyline_path(points, true) {
            self.fill_path(&path, color, FillRule::EvenOdd);
        }
    }

    pub fn stroke_polyline(&mut self, points: &[PixelPoint], closed: bool, color: Color, width: f32) {
        if let Some(path) = polyline_path(points, closed) {
            self.stroke_path(&path, color, width);
        }
    }

    /// Fill an ellipse with semi-axes `radii`, rotated counter-clockwise on screen
    pub fn fill_ellipse(&mut self, center: PixelPoint, radii: Vec2, angle_deg: f64, color: Color) {
        if let Some(path) = ellipse_path(center, radii, angle_deg) {
            self.fill_path(&path, color, FillRule::Winding);
        }
    }

    pub fn stroke_ellipse(
        &mut self,
        center: PixelPoint,
        radii: Vec2,
        angle_deg: f64,
        color: Color,
        width: f32,
    ) {
        if let Some(path) = ellipse_path(center, radii, angle_deg) {
            self.stroke_path(&path, color, width);
        }
    }

    /// Measure a text run in the built-in font
    pub fn measure_text(&self, text: &str, scale: f64, weight: u32) -> TextExtent {
        let dot = glyph_dot(scale);
        let grow = weight.saturating_sub(1) as f64;
        let chars = text.chars().count() as f64;
        TextExtent {
            width: (chars * GLYPH_CELL as f64 * dot + grow).ceil() as i32,
            height: (GLYPH_ASCENT * dot + grow).round() as i32,
            baseline: dot.ceil() as i32,
        }
    }

    /// Draw a text run whose baseline starts at `origin`
    pub fn draw_text(&mut self, text: &str, origin: PixelPoint, scale: f64, color: Color, weight: u32) {
        let dot = glyph_dot(scale);
        let grow = weight.saturating_sub(1) as f64;
        let top = origin.y as f64 - GLYPH_ASCENT * dot;

        let mut pb = PathBuilder::new();
        for (i, ch) in text.chars().enumerate() {
            let rows = glyph(ch);
            let cell_x = origin.x as f64 + (i * GLYPH_CELL) as f64 * dot;
            for (r, bits) in rows.iter().enumerate() {
                for c in 0..GLYPH_CELL {
                    if bits & (1 << c) == 0 {
                        continue;
                    }
                    let x = cell_x + c as f64 * dot - grow / 2.0;
                    let y = top + r as f64 * dot - grow / 2.0;
                    let size = (dot + grow) as f32;
                    if let Some(rect) = Rect::from_xywh(x as f32, y as f32, size, size) {
                        pb.push_rect(rect);
                    }
                }
            }
        }
        if let Some(path) = pb.finish() {
            self.fill_path(&path, color, FillRule::Winding);
        }
    }

    /// A copy of this canvas rotated a quarter turn counter-clockwise
    pub fn rotate_90_ccw(&self) -> Canvas {
        let (w, h) = (self.width() as usize, self.height() as usize);
        let mut pixmap = match Pixmap::new(h as u32, w as u32) {
            Some(p) => p,
            None => return self.clone(),
        };
        let src = self.pixmap.pixels();
        let dst = pixmap.pixels_mut();
        for y in 0..h {
            for x in 0..w {
                // (x, y) lands at column y, row w-1-x
                dst[(w - 1 - x) * h + y] = src[y * w + x];
            }
        }
        Canvas { pixmap, ops: 1 }
    }

    /// Copy `src` onto this canvas with its top-left corner at `top_left`
    pub fn blit(&mut self, src: &Canvas, top_left: PixelPoint) {
        self.ops += 1;
        self.pixmap.draw_pixmap(
            top_left.x,
            top_left.y,
            src.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// `self = alpha * src + (1 - alpha) * self`, per channel.
    ///
    /// Both canvases must share dimensions; mismatched sizes are ignored.
    pub fn alpha_composite(&mut self, src: &Canvas, alpha: f32) {
        if src.width() != self.width() || src.height() != self.height() {
            return;
        }
        self.ops += 1;
        let alpha = alpha.clamp(0.0, 1.0);
        for (d, s) in self.pixmap.data_mut().iter_mut().zip(src.pixmap.data()) {
            *d = (alpha * f32::from(*s) + (1.0 - alpha) * f32::from(*d)).round() as u8;
        }
    }

    /// Copy out as an `image` buffer
    pub fn to_image(&self) -> image::RgbaImage {
        let (w, h) = (self.width(), self.height());
        image::RgbaImage::from_raw(w, h, self.pixmap.data().to_vec())
            .unwrap_or_else(|| image::RgbaImage::new(w, h))
    }

    /// Encode as PNG bytes
    pub fn encode_png(&self) -> Result<Vec<u8>, PlotError> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.to_image().write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Write to `path`, picking the format from its extension
    pub fn save(&self, path: &Path) -> Result<(), PlotError> {
        let unsupported = || PlotError::UnsupportedFormat {
            path: path.display().to_string(),
        };
        let format = image::ImageFormat::from_path(path).map_err(|_| unsupported())?;
        match format {
            image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::Bmp => {}
            _ => return Err(unsupported()),
        }
        let rgb = image::DynamicImage::ImageRgba8(self.to_image()).to_rgb8();
        rgb.save_with_format(path, format)?;
        Ok(())
    }

    fn fill_path(&mut self, path: &tiny_skia::Path, color: Color, rule: FillRule) {
        self.ops += 1;
        self.pixmap
            .fill_path(path, &paint(color), rule, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &tiny_skia::Path, color: Color, width: f32) {
        self.ops += 1;
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(path, &paint(color), &stroke, Transform::identity(), None);
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

fn glyph_dot(scale: f64) -> f64 {
    (scale * defaults::GLYPH_DOT_PER_SCALE).max(0.0)
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Centre of a pixel in skia coordinates
fn center_of(p: PixelPoint) -> Vec2 {
    p.as_vec2() + Vec2::splat(0.5)
}

fn polyline_path(points: &[PixelPoint], closed: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    let first = center_of(*first);
    pb.move_to(first.x, first.y);
    for p in rest.iter().map(|&p| center_of(p)) {
        pb.line_to(p.x, p.y);
    }
    if closed {
        pb.close();
    }
    pb.finish()
}

fn ellipse_path(center: PixelPoint, radii: Vec2, angle_deg: f64) -> Option<tiny_skia::Path> {
    let Vec2 { x: cx, y: cy } = center_of(center);
    let oval = Rect::from_ltrb(cx - radii.x, cy - radii.y, cx + radii.x, cy + radii.y)?;
    // Screen y points down, so a counter-clockwise turn is a negative skia angle
    PathBuilder::from_oval(oval)?.transform(Transform::from_rotate_at(-angle_deg as f32, cx, cy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::ivec2;

    fn canvas(w: u32, h: u32) -> Canvas {
        Canvas::new(w, h).unwrap()
    }

    // ==================== construction tests ====================

    #[test]
    fn new_canvas_is_white() {
        let c = canvas(4, 3);
        assert_eq!((c.width(), c.height()), (4, 3));
        assert_eq!(c.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(c.pixel(3, 2), Some(Color::WHITE));
        assert_eq!(c.pixel(4, 0), None);
        assert_eq!(c.draw_ops(), 0);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(PlotError::InvalidCanvasSize { width: 0, height: 10 })
        ));
    }

    // ==================== primitive tests ====================

    #[test]
    fn fill_rect_covers_interior() {
        let mut c = canvas(20, 20);
        c.fill_rect(ivec2(15, 15), ivec2(5, 5), Color::RED);
        assert_eq!(c.pixel(10, 10), Some(Color::RED));
        assert_eq!(c.pixel(2, 2), Some(Color::WHITE));
        assert_eq!(c.draw_ops(), 1);
    }

    #[test]
    fn fill_circle_covers_center() {
        let mut c = canvas(20, 20);
        c.fill_circle(ivec2(10, 10), 5.0, Color::BLUE);
        assert_eq!(c.pixel(10, 10), Some(Color::BLUE));
        assert_eq!(c.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn fill_polygon_ignores_empty_input() {
        let mut c = canvas(8, 8);
        c.fill_polygon(&[], Color::BLACK);
        assert_eq!(c.draw_ops(), 0);
    }

    #[test]
    fn rotated_ellipse_keeps_center() {
        let mut c = canvas(40, 40);
        c.fill_ellipse(ivec2(20, 20), Vec2::new(12.0, 4.0), 90.0, Color::GREEN);
        assert_eq!(c.pixel(20, 20), Some(Color::GREEN));
        // Rotated a quarter turn, the long axis is vertical
        assert_eq!(c.pixel(20, 10), Some(Color::GREEN));
        assert_eq!(c.pixel(10, 20), Some(Color::WHITE));
    }

    // ==================== text tests ====================

    #[test]
    fn measure_text_scales_with_length() {
        let c = canvas(4, 4);
        let one = c.measure_text("a", 0.4, 1);
        let three = c.measure_text("abc", 0.4, 1);
        assert!(three.width > 2 * one.width);
        assert_eq!(one.height, three.height);
        assert!(one.baseline > 0);
        assert_eq!(c.measure_text("", 0.4, 1).width, 0);
    }

    #[test]
    fn draw_text_marks_pixels_above_baseline() {
        let mut c = canvas(40, 20);
        c.draw_text("H", ivec2(2, 15), 1.0, Color::BLACK, 1);
        let ink = (0..20u32)
            .flat_map(|y| (0..40u32).map(move |x| (x, y)))
            .filter(|&(x, y)| c.pixel(x, y) != Some(Color::WHITE))
            .collect::<Vec<_>>();
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|&(_, y)| y <= 15));
    }

    // ==================== image op tests ====================

    #[test]
    fn rotate_swaps_dimensions_and_moves_corners() {
        let mut c = canvas(6, 2);
        c.fill_rect(ivec2(0, 0), ivec2(1, 1), Color::RED);
        let r = c.rotate_90_ccw();
        assert_eq!((r.width(), r.height()), (2, 6));
        // top-left goes to bottom-left
        assert_eq!(r.pixel(0, 5), Some(Color::RED));
        assert_eq!(r.pixel(0, 0), Some(Color::WHITE));
    }

    #[test]
    fn alpha_composite_blends_channels() {
        let mut base = canvas(2, 2);
        let mut top = base.clone();
        top.clear(Color::BLACK);
        base.alpha_composite(&top, 0.5);
        let p = base.pixel(0, 0).unwrap();
        assert!((127..=128).contains(&p.r));
        assert_eq!(p.r, p.g);
    }

    #[test]
    fn alpha_composite_ignores_mismatched_sizes() {
        let mut base = canvas(2, 2);
        let other = canvas(3, 3);
        base.alpha_composite(&other, 0.5);
        assert_eq!(base.draw_ops(), 0);
    }

    #[test]
    fn blit_copies_pixels() {
        let mut dst = canvas(10, 10);
        let mut src = canvas(2, 2);
        src.clear(Color::MAGENTA);
        dst.blit(&src, ivec2(4, 4));
        assert_eq!(dst.pixel(4, 4), Some(Color::MAGENTA));
        assert_eq!(dst.pixel(5, 5), Some(Color::MAGENTA));
        assert_eq!(dst.pixel(6, 6), Some(Color::WHITE));
    }

    // ==================== output tests ====================

    #[test]
    fn encode_png_has_signature() {
        let bytes = canvas(3, 3).encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("figura-canvas-test.xyz");
        assert!(matches!(
            canvas(3, 3).save(&path),
            Err(PlotError::UnsupportedFormat { .. })
        ));
    }
}
