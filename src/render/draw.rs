//! Per-command rasterization

use glam::{DVec2, Vec2, ivec2};

use super::transform::{Transform, clamp_px};
use crate::canvas::Canvas;
use crate::command::{
    CircleCmd, Draw, EllipseCmd, FillMode, HAlign, LineCmd, PolygonCmd, RectCmd, RotatedRectCmd,
    ScatterCmd, ShapeStyle, TextCmd, VAlign,
};
use crate::types::{Color, DataPoint, PixelPoint};

/// Canvas plus the coordinate mapping for one render pass
pub(crate) struct DrawPass<'a> {
    pub canvas: &'a mut Canvas,
    pub transform: &'a Transform,
}

/// What a shape callback should paint
#[derive(Debug, Clone, Copy)]
enum Ink {
    Fill(Color),
    Stroke(Color, f32),
}

impl<'a> DrawPass<'a> {
    pub fn new(canvas: &'a mut Canvas, transform: &'a Transform) -> Self {
        DrawPass { canvas, transform }
    }

    fn px(&self, p: DataPoint) -> PixelPoint {
        self.transform.data_to_pixel(p)
    }

    /// Fill then outline a shape.
    ///
    /// Translucent fills go to a scratch copy of the canvas that is then
    /// composited back; the outline is always drawn directly.
    fn paint_shape(&mut self, style: &ShapeStyle, paint: impl Fn(&mut Canvas, Ink)) {
        match style.fill_mode() {
            FillMode::None => {}
            FillMode::Opaque => paint(&mut *self.canvas, Ink::Fill(style.fill_color)),
            FillMode::Translucent(alpha) => {
                let mut scratch = self.canvas.clone();
                paint(&mut scratch, Ink::Fill(style.fill_color));
                self.canvas.alpha_composite(&scratch, alpha);
            }
        }
        if style.has_stroke() {
            paint(&mut *self.canvas, Ink::Stroke(style.stroke_color, style.stroke_width));
        }
    }

    fn paint_polygon(&mut self, points: &[PixelPoint], style: &ShapeStyle) {
        self.paint_shape(style, |canvas, ink| match ink {
            Ink::Fill(color) => canvas.fill_polygon(points, color),
            Ink::Stroke(color, width) => canvas.stroke_polyline(points, true, color, width),
        });
    }
}

impl Draw for LineCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, color: Color) {
        let points: Vec<PixelPoint> = self.series.points().map(|p| pass.px(p)).collect();
        if points.len() < 2 {
            return;
        }
        pass.canvas.stroke_polyline(&points, false, color, self.width);
    }
}

impl Draw for ScatterCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, color: Color) {
        for p in self.series.points() {
            let center = pass.px(p);
            pass.canvas.fill_circle(center, self.radius, color);
        }
    }
}

impl Draw for TextCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, color: Color) {
        let style = &self.style;
        let ext = pass.canvas.measure_text(&self.text, style.font_scale, style.weight);
        let mut origin = pass.px(self.anchor);
        origin.x -= match style.halign {
            HAlign::Left => 0,
            HAlign::Center => ext.width / 2,
            HAlign::Right => ext.width,
        };
        origin.y += match style.valign {
            VAlign::Baseline => 0,
            VAlign::Center => ext.height / 2,
            VAlign::Top => ext.height,
            VAlign::Bottom => -ext.baseline,
        };
        pass.canvas
            .draw_text(&self.text, origin, style.font_scale, color, style.weight);
    }
}

impl Draw for CircleCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, _color: Color) {
        let center = pass.px(self.center);
        let radius = (self.radius * pass.transform.x_scale()) as f32;
        pass.paint_shape(&self.style, |canvas, ink| match ink {
            Ink::Fill(color) => canvas.fill_circle(center, radius, color),
            Ink::Stroke(color, width) => canvas.stroke_circle(center, radius, color, width),
        });
    }
}

impl Draw for RectCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, _color: Color) {
        let (a, b) = (pass.px(self.p0), pass.px(self.p1));
        pass.paint_shape(&self.style, |canvas, ink| match ink {
            Ink::Fill(color) => canvas.fill_rect(a, b, color),
            Ink::Stroke(color, width) => canvas.stroke_rect(a, b, color, width),
        });
    }
}

impl Draw for RotatedRectCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, _color: Color) {
        let center = pass.px(self.center);
        let half = DVec2::new(
            0.5 * self.width * pass.transform.x_scale(),
            0.5 * self.height * pass.transform.y_scale(),
        );
        let corners = rotated_corners(center, half, self.angle_deg);
        pass.paint_polygon(&corners, &self.style);
    }
}

impl Draw for PolygonCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, _color: Color) {
        let points: Vec<PixelPoint> = self.series.points().map(|p| pass.px(p)).collect();
        pass.paint_polygon(&points, &self.style);
    }
}

impl Draw for EllipseCmd {
    fn draw(&self, pass: &mut DrawPass<'_>, _color: Color) {
        let center = pass.px(self.center);
        let radii = Vec2::new(
            (0.5 * self.width * pass.transform.x_scale()) as f32,
            (0.5 * self.height * pass.transform.y_scale()) as f32,
        );
        let angle = self.angle_deg;
        pass.paint_shape(&self.style, |canvas, ink| match ink {
            Ink::Fill(color) => canvas.fill_ellipse(center, radii, angle, color),
            Ink::Stroke(color, width) => canvas.stroke_ellipse(center, radii, angle, color, width),
        });
    }
}

/// Corners of a `2 * half` box around `center`, turned counter-clockwise on
/// screen by `angle_deg`
fn rotated_corners(center: PixelPoint, half: DVec2, angle_deg: f64) -> [PixelPoint; 4] {
    // Pixel y points down, so a visual counter-clockwise turn is -angle
    let rot = DVec2::from_angle(-angle_deg.to_radians());
    let c = center.as_dvec2();
    [
        DVec2::new(-half.x, -half.y),
        DVec2::new(half.x, -half.y),
        DVec2::new(half.x, half.y),
        DVec2::new(-half.x, half.y),
    ]
    .map(|offset| {
        let p = c + rot.rotate(offset);
        ivec2(clamp_px((p.x + 0.5).floor()), clamp_px((p.y + 0.5).floor()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::types::{Axes, Margins};
    use glam::IVec2;

    fn setup() -> (Canvas, Transform) {
        let axes = Axes {
            xmin: 0.0,
            xmax: 10.0,
            ymin: 0.0,
            ymax: 10.0,
            ..Axes::default()
        };
        let canvas = Canvas::new(200, 200).unwrap();
        let margins = Margins { left: 0, right: 0, top: 0, bottom: 0 };
        (canvas, Transform::new(axes, 200, 200, margins))
    }

    fn draw(cmd: &Command) -> Canvas {
        let (mut canvas, t) = setup();
        let mut pass = DrawPass::new(&mut canvas, &t);
        cmd.draw(&mut pass);
        canvas
    }

    // ==================== shape tests ====================

    #[test]
    fn opaque_fill_paints_interior() {
        let style = ShapeStyle::default().with_fill(Color::RED, 1.0);
        let canvas = draw(&Command::rect_ltrb(2.0, 2.0, 8.0, 8.0).style(style));
        assert_eq!(canvas.pixel(100, 100), Some(Color::RED));
        assert_eq!(canvas.pixel(10, 10), Some(Color::WHITE));
    }

    #[test]
    fn translucent_fill_blends_with_background() {
        let style = ShapeStyle::default().with_fill(Color::BLACK, 0.5).with_stroke(Color::BLACK, 0.0);
        let canvas = draw(&Command::circle(5.0, 5.0, 3.0).style(style));
        let p = canvas.pixel(100, 100).unwrap();
        assert!((127..=128).contains(&p.r), "{p:?}");
        // fill, composite; the scratch copy keeps its own counter
        assert_eq!(canvas.draw_ops(), 1);
    }

    #[test]
    fn zero_alpha_and_zero_width_draw_nothing() {
        let style = ShapeStyle::default().with_fill(Color::RED, 0.0).with_stroke(Color::RED, 0.0);
        let canvas = draw(&Command::ellipse(5.0, 5.0, 4.0, 2.0, 30.0).style(style));
        assert_eq!(canvas.draw_ops(), 0);
    }

    #[test]
    fn circle_radius_scales_with_data() {
        let style = ShapeStyle::default().with_fill(Color::BLUE, 1.0);
        let canvas = draw(&Command::circle(5.0, 5.0, 2.0).style(style));
        // 2 data units = 40 px
        assert_eq!(canvas.pixel(100 + 35, 100), Some(Color::BLUE));
        assert_eq!(canvas.pixel(100 + 45, 100), Some(Color::WHITE));
    }

    #[test]
    fn rotated_corners_quarter_turn() {
        let corners = rotated_corners(ivec2(50, 50), DVec2::new(20.0, 10.0), 90.0);
        let xs: Vec<i32> = corners.iter().map(|c| c.x).collect();
        let ys: Vec<i32> = corners.iter().map(|c| c.y).collect();
        assert_eq!(xs.iter().min(), Some(&40));
        assert_eq!(xs.iter().max(), Some(&60));
        assert_eq!(ys.iter().min(), Some(&30));
        assert_eq!(ys.iter().max(), Some(&70));
    }

    // ==================== line and marker tests ====================

    #[test]
    fn scatter_draws_one_marker_per_point() {
        let canvas = draw(&Command::scatter([1.0, 5.0, 9.0], [1.0, 5.0, 9.0]));
        assert_eq!(canvas.draw_ops(), 3);
        assert_eq!(canvas.pixel(100, 100), Some(Color::RED));
    }

    #[test]
    fn single_point_line_draws_nothing() {
        let canvas = draw(&Command::line([1.0], [1.0]));
        assert_eq!(canvas.draw_ops(), 0);
    }

    // ==================== text tests ====================

    #[test]
    fn text_alignment_moves_ink() {
        use crate::command::TextStyle;
        let ink_x = |halign| {
            let style = TextStyle { font_scale: 1.0, ..TextStyle::default() }
                .aligned(halign, VAlign::Center);
            let canvas = draw(&Command::text(5.0, 5.0, "III").text_style(style));
            (0..200u32)
                .find(|&x| (0..200u32).any(|y| canvas.pixel(x, y) != Some(Color::WHITE)))
                .unwrap()
        };
        let left = ink_x(HAlign::Left);
        let center = ink_x(HAlign::Center);
        let right = ink_x(HAlign::Right);
        assert!(left >= 100);
        assert!(center < left && right < center);
    }

    #[test]
    fn vertical_alignment_offsets_from_measured_extent() {
        use crate::command::TextStyle;
        let ink_top = |valign| {
            let style = TextStyle { font_scale: 1.0, ..TextStyle::default() }
                .aligned(HAlign::Left, valign);
            let canvas = draw(&Command::text(5.0, 5.0, "III").text_style(style));
            (0..200i32)
                .find(|&y| (0..200u32).any(|x| canvas.pixel(x, y as u32) != Some(Color::WHITE)))
                .unwrap()
        };
        let (canvas, _) = setup();
        let ext = canvas.measure_text("III", 1.0, 1);

        let baseline = ink_top(VAlign::Baseline);
        // Glyph tops sit `height` above the anchor row at (5, 5) -> y = 100
        assert_eq!(baseline, 100 - ext.height);
        assert_eq!(ink_top(VAlign::Top) - baseline, ext.height);
        assert_eq!(ink_top(VAlign::Center) - baseline, ext.height / 2);
        assert_eq!(baseline - ink_top(VAlign::Bottom), ext.baseline);
    }

    #[test]
    fn px_uses_transform() {
        let (mut canvas, t) = setup();
        let pass = DrawPass::new(&mut canvas, &t);
        assert_eq!(pass.px(DVec2::new(5.0, 5.0)), IVec2::new(100, 100));
    }
}
