//! Error types with diagnostics using miette
//!
//! The render pipeline itself never fails: malformed commands are dropped and
//! degenerate ranges are widened. These errors surface only from the strict
//! command path, the tick engine's input checks, and the I/O sinks.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Malformed geometry handed to a command constructor
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("coordinate lengths differ: {xs} x values, {ys} y values")]
    #[diagnostic(
        code(figura::geometry::length_mismatch),
        help("every x value needs a matching y value")
    )]
    LengthMismatch { xs: usize, ys: usize },

    #[error("{kind} needs at least one point")]
    #[diagnostic(code(figura::geometry::empty))]
    Empty { kind: &'static str },

    #[error("non-finite coordinate at index {index}")]
    #[diagnostic(code(figura::geometry::non_finite))]
    NonFinite { index: usize },

    #[error("negative {what}: {value}")]
    #[diagnostic(code(figura::geometry::negative_size))]
    NegativeSize { what: &'static str, value: f64 },
}

// ============================================================================
// Tick Errors
// ============================================================================

/// Errors from the tick engine
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum TickError {
    #[error("tick target must be at least 2, got {target}")]
    #[diagnostic(
        code(figura::ticks::too_few),
        help("the step is derived from span / (target - 1)")
    )]
    TooFewTicks { target: usize },

    #[error("tick span is not finite: [{lo}, {hi}]")]
    #[diagnostic(code(figura::ticks::non_finite_span))]
    NonFiniteSpan { lo: f64, hi: f64 },
}

// ============================================================================
// Plot Errors
// ============================================================================

/// Errors from figure construction, configuration and output
#[derive(Error, Diagnostic, Debug)]
pub enum PlotError {
    #[error("invalid canvas size: {width}x{height}")]
    #[diagnostic(code(figura::canvas::invalid_size))]
    InvalidCanvasSize { width: u32, height: u32 },

    #[error("unsupported image format for {path}")]
    #[diagnostic(
        code(figura::save::unsupported_format),
        help("use a .png, .jpg/.jpeg or .bmp file name")
    )]
    UnsupportedFormat { path: String },

    #[error("failed to encode image")]
    #[diagnostic(code(figura::save::encode))]
    Image(#[from] image::ImageError),

    #[error("i/o error")]
    #[diagnostic(code(figura::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tick(#[from] TickError),
}
