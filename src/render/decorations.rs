//! Grid, axes, title and axis labels

use glam::{DVec2, ivec2};

use super::defaults;
use super::transform::Transform;
use crate::canvas::Canvas;
use crate::ticks::TickSet;

/// Light lines across the plot at each tick inside the visible window
pub(crate) fn draw_grid(canvas: &mut Canvas, t: &Transform, xt: &TickSet, yt: &TickSet) {
    let axes = t.axes();
    for x in xt.locs().filter(|&x| t.contains_x(x)) {
        let p0 = t.data_to_pixel(DVec2::new(x, axes.ymin));
        let p1 = t.data_to_pixel(DVec2::new(x, axes.ymax));
        canvas.stroke_line(p0, p1, defaults::GRID_COLOR, 1.0);
    }
    for y in yt.locs().filter(|&y| t.contains_y(y)) {
        let p0 = t.data_to_pixel(DVec2::new(axes.xmin, y));
        let p1 = t.data_to_pixel(DVec2::new(axes.xmax, y));
        canvas.stroke_line(p0, p1, defaults::GRID_COLOR, 1.0);
    }
}

/// Axis baselines, tick marks and tick labels
pub(crate) fn draw_axes(canvas: &mut Canvas, t: &Transform, xt: &TickSet, yt: &TickSet) {
    let fg = defaults::FOREGROUND;
    let scale = defaults::TICK_FONT_SCALE;
    let tick = defaults::TICK_LEN;
    let axes = t.axes();

    canvas.stroke_line(ivec2(t.left(), t.bottom()), ivec2(t.right(), t.bottom()), fg, 1.0);
    for tk in xt {
        let p = t.data_to_pixel(DVec2::new(tk.loc, axes.ymin));
        canvas.stroke_line(p, p + ivec2(0, tick), fg, 1.0);
        let ext = canvas.measure_text(&tk.label, scale, 1);
        let origin = ivec2(p.x - ext.width / 2, p.y + tick + defaults::X_TICK_LABEL_GAP);
        canvas.draw_text(&tk.label, origin, scale, fg, 1);
    }

    canvas.stroke_line(ivec2(t.left(), t.top()), ivec2(t.left(), t.bottom()), fg, 1.0);
    for tk in yt {
        let p = t.data_to_pixel(DVec2::new(axes.xmin, tk.loc));
        canvas.stroke_line(p - ivec2(tick, 0), p, fg, 1.0);
        let ext = canvas.measure_text(&tk.label, scale, 1);
        let origin = ivec2(
            p.x - tick - defaults::Y_TICK_LABEL_GAP - ext.width,
            p.y + ext.height / 2,
        );
        canvas.draw_text(&tk.label, origin, scale, fg, 1);
    }
}

pub(crate) fn draw_title(canvas: &mut Canvas, title: &str) {
    if title.is_empty() {
        return;
    }
    let (x, y) = defaults::TITLE_POS;
    canvas.draw_text(title, ivec2(x, y), defaults::TITLE_FONT_SCALE, defaults::FOREGROUND, 1);
}

/// X label centred under the plot area
pub(crate) fn draw_xlabel(canvas: &mut Canvas, t: &Transform, label: &str) {
    if label.is_empty() {
        return;
    }
    let scale = defaults::AXIS_LABEL_FONT_SCALE;
    let ext = canvas.measure_text(label, scale, 1);
    let x = t.left() + (t.plot_width() - ext.width) / 2;
    let y = t.canvas_height() - defaults::XLABEL_BOTTOM_OFFSET;
    canvas.draw_text(label, ivec2(x, y), scale, defaults::FOREGROUND, 1);
}

/// The y label rasterized and rotated once, reused until the text changes.
///
/// Validity is tracked apart from the figure's dirty state: restyling the
/// figure re-renders everything but keeps this image.
#[derive(Debug, Default)]
pub struct YLabelCache {
    image: Option<Canvas>,
    rasterizations: u64,
}

impl YLabelCache {
    /// Drop the cached image so the next render rebuilds it
    pub fn invalidate(&mut self) {
        self.image = None;
    }

    pub fn is_valid(&self) -> bool {
        self.image.is_some()
    }

    /// How many times the label has been rasterized
    pub fn rasterizations(&self) -> u64 {
        self.rasterizations
    }

    /// Rotated label image for `label`, rasterizing it if needed
    fn image(&mut self, label: &str) -> Option<&Canvas> {
        if self.image.is_none() {
            self.image = rasterize_rotated(label);
            self.rasterizations += 1;
            crate::log::debug!(label, "rasterized y label");
        }
        self.image.as_ref()
    }

    /// Blit the label 55 px left of the plot, vertically centred; skipped when
    /// it would not fit inside the canvas
    pub(crate) fn draw(&mut self, canvas: &mut Canvas, t: &Transform, label: &str) {
        if label.is_empty() {
            return;
        }
        let Some(image) = self.image(label) else {
            return;
        };
        let (w, h) = (image.width() as i32, image.height() as i32);
        let x = t.left() - defaults::YLABEL_LEFT_OFFSET;
        let y = t.top() + (t.plot_height() - h) / 2;
        let fits = x >= 0 && y >= 0 && x + w <= t.canvas_width() && y + h <= t.canvas_height();
        if fits {
            canvas.blit(image, ivec2(x, y));
        }
    }
}

fn rasterize_rotated(label: &str) -> Option<Canvas> {
    let scale = defaults::AXIS_LABEL_FONT_SCALE;
    let scratch = Canvas::new(1, 1).ok()?;
    let ext = scratch.measure_text(label, scale, 1);
    let width = u32::try_from(ext.width).ok()?;
    let height = u32::try_from(ext.height + ext.baseline).ok()?;
    let mut strip = Canvas::new(width, height).ok()?;
    strip.draw_text(label, ivec2(0, ext.height), scale, defaults::FOREGROUND, 1);
    Some(strip.rotate_90_ccw())
}
