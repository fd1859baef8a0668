//! Geometry and colour primitives shared by the command model and the renderer.
//!
//! Data-space points are `glam::DVec2` (arbitrary real units, y up); pixel-space
//! points are `glam::IVec2` (origin top-left, y down).

use glam::{DVec2, IVec2};

use crate::render::defaults;

/// A point in data space
pub type DataPoint = DVec2;

/// A point on the canvas, in whole pixels
pub type PixelPoint = IVec2;

/// Opaque RGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255)
    }
}

/// Running min/max accumulator over every data point the figure has seen.
///
/// Starts empty (`+inf`/`-inf`) and only ever grows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Create an empty accumulator (will expand on first point)
    pub const fn new() -> Self {
        Bounds {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    /// Widen to include a point. Non-finite points are ignored.
    pub fn expand(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    pub fn expand_point(&mut self, p: DataPoint) {
        self.expand(p.x, p.y);
    }

    /// True once at least one point has been added
    pub fn valid(&self) -> bool {
        self.xmin.is_finite()
    }
}

/// The visible plotting window plus display flags.
///
/// Distinct from [`Bounds`]: bounds are the data extent, axes are what the
/// render pass actually shows after autoscale, padding and equal-scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Axes {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// Fraction of each span added on both ends (0.05 = 5%)
    pub pad_frac: f64,
    /// Derive limits from the data bounds on every render
    pub autoscale: bool,
    /// Force one data unit to span the same number of pixels on both axes
    pub equal_scale: bool,
    /// Draw grid lines at the tick locations
    pub grid: bool,
}

impl Default for Axes {
    fn default() -> Self {
        Axes {
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            pad_frac: defaults::PAD_FRAC,
            autoscale: true,
            equal_scale: false,
            grid: false,
        }
    }
}

impl Axes {
    pub fn x_span(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn y_span(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn x_mid(&self) -> f64 {
        0.5 * (self.xmin + self.xmax)
    }

    pub fn y_mid(&self) -> f64 {
        0.5 * (self.ymin + self.ymax)
    }

    /// Whether both spans are strictly positive
    pub fn is_proper(&self) -> bool {
        self.xmax > self.xmin && self.ymax > self.ymin
    }
}

/// Fixed pixel margins around the plot area
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            left: defaults::MARGIN_LEFT,
            right: defaults::MARGIN_RIGHT,
            top: defaults::MARGIN_TOP,
            bottom: defaults::MARGIN_BOTTOM,
        }
    }
}
