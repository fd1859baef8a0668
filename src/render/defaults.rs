//! Default sizes and settings (all in pixels unless noted)

use crate::types::Color;

pub const CANVAS_WIDTH: u32 = 640;
pub const CANVAS_HEIGHT: u32 = 480;

pub const MARGIN_LEFT: i32 = 60;
pub const MARGIN_RIGHT: i32 = 20;
pub const MARGIN_TOP: i32 = 40;
pub const MARGIN_BOTTOM: i32 = 60;

/// Mapped coordinates are clamped to this many pixels either side of the
/// canvas origin
pub const PIXEL_LIMIT: f64 = 16_777_216.0;

/// Fraction of each span added on both ends when autoscaling
pub const PAD_FRAC: f64 = 0.05;
/// Relative widening applied to a zero-width span
pub const SPAN_EPS_REL: f64 = 1e-3;
/// Absolute widening used when the degenerate value is (near) zero
pub const SPAN_EPS_ABS: f64 = 1e-3;

pub const TICK_TARGET: usize = 6;
pub const TICK_LEN: i32 = 5;
pub const TICK_FONT_SCALE: f64 = 0.4;
/// Gap between an x tick mark's end and its label baseline
pub const X_TICK_LABEL_GAP: i32 = 13;
/// Gap between a y tick mark's start and its label's right edge
pub const Y_TICK_LABEL_GAP: i32 = 4;

pub const TITLE_POS: (i32, i32) = (50, 25);
pub const TITLE_FONT_SCALE: f64 = 0.6;
pub const AXIS_LABEL_FONT_SCALE: f64 = 0.5;
/// Distance of the x label baseline from the bottom edge
pub const XLABEL_BOTTOM_OFFSET: i32 = 10;
/// Distance of the rotated y label from the left edge of the plot
pub const YLABEL_LEFT_OFFSET: i32 = 55;

pub const LEGEND_FONT_SCALE: f64 = 0.4;
pub const LEGEND_SWATCH_WIDTH: i32 = 20;
pub const LEGEND_ROW_PAD: i32 = 6;
pub const LEGEND_INSET: i32 = 5;
pub const LEGEND_LABEL_GAP: i32 = 8;
pub const LEGEND_RIGHT_PAD: i32 = 10;
pub const LEGEND_SWATCH_LINE_WIDTH: f32 = 2.0;
pub const LEGEND_SWATCH_DOT_RADIUS: f32 = 4.0;
pub const LEGEND_SWATCH_BLOCK_HALF_HEIGHT: i32 = 4;
/// Drop from a row's centre line to its label baseline
pub const LEGEND_LABEL_BASELINE_OFFSET: i32 = 4;
pub const LEGEND_LOCATION: &str = "northEast";

pub const BACKGROUND: Color = Color::WHITE;
pub const FOREGROUND: Color = Color::BLACK;
pub const GRID_COLOR: Color = Color::rgb(220, 220, 220);

pub const LINE_COLOR: Color = Color::BLUE;
pub const LINE_WIDTH: f32 = 1.0;
pub const SCATTER_COLOR: Color = Color::RED;
pub const MARKER_RADIUS: f32 = 4.0;
pub const TEXT_COLOR: Color = Color::BLACK;
pub const TEXT_FONT_SCALE: f64 = 0.4;
pub const TEXT_WEIGHT: u32 = 1;

/// Pixels per glyph dot at font scale 1.0
pub const GLYPH_DOT_PER_SCALE: f64 = 3.0;
