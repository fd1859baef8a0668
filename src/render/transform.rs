//! Axis range resolution and the data-to-pixel mapping.
//!
//! [`resolve_axes`] runs autoscale, padding, the degenerate-span fix and the
//! equal-scale correction in that order. [`Transform`] then maps data points
//! into the plot area framed by the margins.

use glam::{DVec2, IVec2};

use super::defaults;
use crate::types::{Axes, Bounds, DataPoint, Margins, PixelPoint};

/// Widen `[lo, hi]` if it has collapsed to a single value.
///
/// The half-width is `|lo| * 1e-3`, or `1e-3` when `lo` is (near) zero.
pub fn ensure_nonzero_span(lo: &mut f64, hi: &mut f64) {
    if *lo != *hi {
        return;
    }
    let rel = lo.abs() * defaults::SPAN_EPS_REL;
    let eps = if rel > f64::MIN_POSITIVE { rel } else { defaults::SPAN_EPS_ABS };
    *lo -= eps;
    *hi += eps;
}

/// Make both spans finite-limited, non-zero and correctly ordered
pub fn fix_ranges(axes: &mut Axes) {
    for v in [&mut axes.xmin, &mut axes.xmax, &mut axes.ymin, &mut axes.ymax] {
        *v = finite_limit(*v);
    }
    if axes.xmin > axes.xmax {
        std::mem::swap(&mut axes.xmin, &mut axes.xmax);
    }
    if axes.ymin > axes.ymax {
        std::mem::swap(&mut axes.ymin, &mut axes.ymax);
    }
    ensure_nonzero_span(&mut axes.xmin, &mut axes.xmax);
    ensure_nonzero_span(&mut axes.ymin, &mut axes.ymax);
}

/// Overflowed limits pin to the largest finite value; NaN becomes 0
fn finite_limit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(-f64::MAX, f64::MAX) }
}

/// Take limits from the data bounds, or the unit square when there is no data
pub fn apply_autoscale(axes: &mut Axes, bounds: &Bounds) {
    if bounds.valid() {
        axes.xmin = bounds.xmin;
        axes.xmax = bounds.xmax;
        axes.ymin = bounds.ymin;
        axes.ymax = bounds.ymax;
    } else {
        axes.xmin = 0.0;
        axes.xmax = 1.0;
        axes.ymin = 0.0;
        axes.ymax = 1.0;
    }
}

/// Grow each axis by `pad_frac` of its span on both ends
pub fn apply_padding(axes: &mut Axes) {
    if axes.pad_frac <= 0.0 {
        return;
    }
    let dx = axes.x_span() * axes.pad_frac;
    let dy = axes.y_span() * axes.pad_frac;
    axes.xmin -= dx;
    axes.xmax += dx;
    axes.ymin -= dy;
    axes.ymax += dy;
}

/// Give both axes the larger of the two spans, keeping each midpoint
pub fn apply_equal_scale(axes: &mut Axes) {
    let span = axes.x_span().max(axes.y_span());
    let (xmid, ymid) = (axes.x_mid(), axes.y_mid());
    axes.xmin = xmid - span / 2.0;
    axes.xmax = xmid + span / 2.0;
    axes.ymin = ymid - span / 2.0;
    axes.ymax = ymid + span / 2.0;
}

/// Compute the visible window for one render.
///
/// `configured` holds the caller's limits and flags; the returned axes are
/// always proper (strictly positive spans).
pub fn resolve_axes(configured: &Axes, bounds: &Bounds) -> Axes {
    let mut axes = *configured;
    if axes.autoscale {
        apply_autoscale(&mut axes, bounds);
    }
    apply_padding(&mut axes);
    fix_ranges(&mut axes);
    if axes.equal_scale {
        apply_equal_scale(&mut axes);
    }
    fix_ranges(&mut axes);
    axes
}

/// Mapping from data space to canvas pixels for one render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    axes: Axes,
    width: u32,
    height: u32,
    margins: Margins,
}

impl Transform {
    /// `axes` must already be resolved (see [`resolve_axes`])
    pub fn new(axes: Axes, width: u32, height: u32, margins: Margins) -> Self {
        debug_assert!(axes.is_proper(), "transform built from unresolved axes");
        Transform {
            axes,
            width,
            height,
            margins,
        }
    }

    pub fn axes(&self) -> &Axes {
        &self.axes
    }

    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    pub fn canvas_width(&self) -> i32 {
        self.width as i32
    }

    pub fn canvas_height(&self) -> i32 {
        self.height as i32
    }

    pub fn plot_width(&self) -> i32 {
        self.canvas_width() - self.margins.left - self.margins.right
    }

    pub fn plot_height(&self) -> i32 {
        self.canvas_height() - self.margins.top - self.margins.bottom
    }

    /// Left edge of the plot area
    pub fn left(&self) -> i32 {
        self.margins.left
    }

    /// Right edge of the plot area
    pub fn right(&self) -> i32 {
        self.canvas_width() - self.margins.right
    }

    pub fn top(&self) -> i32 {
        self.margins.top
    }

    /// Bottom edge of the plot area (the x axis baseline)
    pub fn bottom(&self) -> i32 {
        self.canvas_height() - self.margins.bottom
    }

    /// Pixels per x data unit
    pub fn x_scale(&self) -> f64 {
        f64::from(self.plot_width()) / self.axes.x_span()
    }

    /// Pixels per y data unit
    pub fn y_scale(&self) -> f64 {
        f64::from(self.plot_height()) / self.axes.y_span()
    }

    pub fn data_to_pixel(&self, p: DataPoint) -> PixelPoint {
        let fx = (p.x - self.axes.xmin) / self.axes.x_span();
        let fy = (p.y - self.axes.ymin) / self.axes.y_span();
        let x = f64::from(self.left()) + round_half_up(fx * f64::from(self.plot_width()));
        let y = f64::from(self.bottom()) - round_half_up(fy * f64::from(self.plot_height()));
        IVec2::new(clamp_px(x), clamp_px(y))
    }

    /// Inverse of [`Transform::data_to_pixel`] up to rounding
    pub fn pixel_to_data(&self, p: PixelPoint) -> DataPoint {
        let fx = (f64::from(p.x) - f64::from(self.left())) / f64::from(self.plot_width());
        let fy = (f64::from(self.bottom()) - f64::from(p.y)) / f64::from(self.plot_height());
        DVec2::new(
            self.axes.xmin + fx * self.axes.x_span(),
            self.axes.ymin + fy * self.axes.y_span(),
        )
    }

    /// Whether a data-space x lies within the visible window
    pub fn contains_x(&self, x: f64) -> bool {
        (self.axes.xmin..=self.axes.xmax).contains(&x)
    }

    pub fn contains_y(&self, y: f64) -> bool {
        (self.axes.ymin..=self.axes.ymax).contains(&y)
    }
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Convert a whole-pixel coordinate to `i32`, clamped to
/// `±defaults::PIXEL_LIMIT` so later offsets cannot overflow
pub(crate) fn clamp_px(v: f64) -> i32 {
    v.clamp(-defaults::PIXEL_LIMIT, defaults::PIXEL_LIMIT) as i32
}
