//! The retained-mode figure.
//!
//! A [`Figure`] accumulates commands and settings cheaply and defers all
//! pixel work to [`Figure::render`], which runs only when something changed
//! since the last pass.

use std::fmt;
use std::path::Path;

use crate::canvas::Canvas;
use crate::command::Command;
use crate::errors::{GeometryError, PlotError, TickError};
use crate::render::{
    LegendLoc, RenderState, Scene, Transform, YLabelCache, defaults, paint_scene, resolve_axes,
};
use crate::ticks::{TickSet, make_ticks};
use crate::types::{Axes, Bounds, Margins};
use crate::viewer::{SnapshotViewer, Viewer};

pub struct Figure {
    width: u32,
    height: u32,
    margins: Margins,
    canvas: Canvas,
    commands: Vec<Command>,
    /// Limits and flags as configured by the caller
    axes: Axes,
    /// Mapping produced by the last render
    transform: Transform,
    bounds: Bounds,
    title: String,
    xlabel: String,
    ylabel: String,
    legend_on: bool,
    legend_loc: LegendLoc,
    tick_target: usize,
    state: RenderState,
    ylabel_cache: YLabelCache,
    viewer: Box<dyn Viewer>,
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("commands", &self.commands.len())
            .field("axes", &self.axes)
            .field("bounds", &self.bounds)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Figure {
    /// Create a `width` x `height` figure with the default margins
    pub fn new(width: u32, height: u32) -> Result<Self, PlotError> {
        let margins = Margins::default();
        check_plot_area(width, height, &margins)?;
        let canvas = Canvas::new(width, height)?;
        let axes = Axes::default();
        Ok(Figure {
            width,
            height,
            margins,
            canvas,
            commands: Vec::new(),
            axes,
            transform: Transform::new(resolve_axes(&axes, &Bounds::new()), width, height, margins),
            bounds: Bounds::new(),
            title: String::new(),
            xlabel: String::new(),
            ylabel: String::new(),
            legend_on: false,
            legend_loc: LegendLoc::default(),
            tick_target: defaults::TICK_TARGET,
            state: RenderState::Dirty,
            ylabel_cache: YLabelCache::default(),
            viewer: Box::new(SnapshotViewer::default()),
        })
    }

    /// A 640x480 figure
    pub fn default_size() -> Result<Self, PlotError> {
        Figure::new(defaults::CANVAS_WIDTH, defaults::CANVAS_HEIGHT)
    }

    /// Replace the margins; they must leave a non-empty plot area
    pub fn with_margins(mut self, margins: Margins) -> Result<Self, PlotError> {
        check_plot_area(self.width, self.height, &margins)?;
        self.margins = margins;
        self.transform = Transform::new(*self.transform.axes(), self.width, self.height, margins);
        self.state = RenderState::Dirty;
        Ok(self)
    }

    /// Aim for about `target` ticks per axis (at most `target + 2`)
    pub fn set_tick_target(&mut self, target: usize) -> Result<&mut Self, PlotError> {
        if target < 2 {
            return Err(TickError::TooFewTicks { target }.into());
        }
        self.tick_target = target;
        Ok(self.touch())
    }

    /// Where [`Figure::show`] sends the rendered canvas
    pub fn set_viewer(&mut self, viewer: impl Viewer + 'static) -> &mut Self {
        self.viewer = Box::new(viewer);
        self
    }

    fn touch(&mut self) -> &mut Self {
        self.state = RenderState::Dirty;
        self
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Append a command. Malformed geometry is logged and the command dropped,
    /// leaving the figure untouched.
    pub fn add(&mut self, cmd: Command) -> &mut Self {
        if let Err(err) = self.try_add(cmd) {
            crate::log::warn!(error = %err, "dropping malformed command");
        }
        self
    }

    /// Append a command, reporting malformed geometry instead of dropping it
    pub fn try_add(&mut self, cmd: Command) -> Result<(), GeometryError> {
        cmd.validate()?;
        cmd.extend_bounds(&mut self.bounds);
        self.commands.push(cmd);
        self.touch();
        Ok(())
    }

    /// Line through the points, with the default colour and width
    pub fn plot(&mut self, xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> &mut Self {
        self.add(Command::line(xs, ys))
    }

    pub fn scatter(&mut self, xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> &mut Self {
        self.add(Command::scatter(xs, ys))
    }

    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>) -> &mut Self {
        self.add(Command::text(x, y, text))
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        self.add(Command::circle(cx, cy, radius))
    }

    pub fn rect_ltrb(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> &mut Self {
        self.add(Command::rect_ltrb(x0, y0, x1, y1))
    }

    pub fn rect_xywh(&mut self, x: f64, y: f64, w: f64, h: f64) -> &mut Self {
        self.add(Command::rect_xywh(x, y, w, h))
    }

    pub fn rotated_rect(&mut self, cx: f64, cy: f64, w: f64, h: f64, angle_deg: f64) -> &mut Self {
        self.add(Command::rotated_rect(cx, cy, w, h, angle_deg))
    }

    pub fn polygon(&mut self, xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> &mut Self {
        self.add(Command::polygon(xs, ys))
    }

    pub fn ellipse(&mut self, cx: f64, cy: f64, w: f64, h: f64, angle_deg: f64) -> &mut Self {
        self.add(Command::ellipse(cx, cy, w, h, angle_deg))
    }

    // ------------------------------------------------------------------------
    // Axes and decorations
    // ------------------------------------------------------------------------

    /// Fix the x range and turn autoscale off. Reversed limits are swapped;
    /// non-finite limits are ignored.
    pub fn set_xlim(&mut self, lo: f64, hi: f64) -> &mut Self {
        if let Some((lo, hi)) = ordered_limits(lo, hi) {
            self.freeze_autoscale();
            self.axes.xmin = lo;
            self.axes.xmax = hi;
        }
        self.touch()
    }

    /// Fix the y range and turn autoscale off
    pub fn set_ylim(&mut self, lo: f64, hi: f64) -> &mut Self {
        if let Some((lo, hi)) = ordered_limits(lo, hi) {
            self.freeze_autoscale();
            self.axes.ymin = lo;
            self.axes.ymax = hi;
        }
        self.touch()
    }

    /// Turn autoscale off, keeping the other axis on the current data extent
    fn freeze_autoscale(&mut self) {
        if self.axes.autoscale && self.bounds.valid() {
            self.axes.xmin = self.bounds.xmin;
            self.axes.xmax = self.bounds.xmax;
            self.axes.ymin = self.bounds.ymin;
            self.axes.ymax = self.bounds.ymax;
        }
        self.axes.autoscale = false;
    }

    /// No padding around the data
    pub fn axis_tight(&mut self) -> &mut Self {
        self.axes.pad_frac = 0.0;
        self.touch()
    }

    /// Padding as a fraction of each span, clamped at zero
    pub fn axis_pad(&mut self, frac: f64) -> &mut Self {
        self.axes.pad_frac = if frac.is_finite() { frac.max(0.0) } else { 0.0 };
        self.touch()
    }

    pub fn autoscale(&mut self, on: bool) -> &mut Self {
        self.axes.autoscale = on;
        self.touch()
    }

    pub fn equal_scale(&mut self, on: bool) -> &mut Self {
        self.axes.equal_scale = on;
        self.touch()
    }

    pub fn grid(&mut self, on: bool) -> &mut Self {
        self.axes.grid = on;
        self.touch()
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self.touch()
    }

    pub fn xlabel(&mut self, label: impl Into<String>) -> &mut Self {
        self.xlabel = label.into();
        self.touch()
    }

    /// Set the y label; the rotated image is rebuilt only if the text changed
    pub fn ylabel(&mut self, label: impl Into<String>) -> &mut Self {
        let label = label.into();
        if label != self.ylabel {
            self.ylabel = label;
            self.ylabel_cache.invalidate();
        }
        self.touch()
    }

    /// Toggle the legend and place it by keyword (`northWest` .. `southEast`,
    /// case-insensitive). Unknown keywords fall back to `southEast`.
    pub fn legend(&mut self, on: bool, keyword: &str) -> &mut Self {
        let loc = LegendLoc::from_keyword(keyword).unwrap_or_else(|| {
            crate::log::warn!(keyword, fallback = %LegendLoc::FALLBACK, "unknown legend location");
            LegendLoc::FALLBACK
        });
        self.legend_at(on, loc)
    }

    pub fn legend_at(&mut self, on: bool, loc: LegendLoc) -> &mut Self {
        self.legend_on = on;
        self.legend_loc = loc;
        self.touch()
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Redraw the canvas if anything changed since the last render
    pub fn render(&mut self) {
        if !self.state.is_dirty() {
            crate::log::debug!("figure is clean, skipping render");
            return;
        }

        let axes = resolve_axes(&self.axes, &self.bounds);
        let transform = Transform::new(axes, self.width, self.height, self.margins);
        let x_ticks = self.ticks(axes.xmin, axes.xmax);
        let y_ticks = self.ticks(axes.ymin, axes.ymax);
        crate::log::debug!(
            xmin = axes.xmin,
            xmax = axes.xmax,
            ymin = axes.ymin,
            ymax = axes.ymax,
            x_ticks = x_ticks.len(),
            y_ticks = y_ticks.len(),
            "resolved axes"
        );

        let scene = Scene {
            commands: &self.commands,
            transform: &transform,
            x_ticks: &x_ticks,
            y_ticks: &y_ticks,
            grid: axes.grid,
            legend: self.legend_on.then_some(self.legend_loc),
            title: &self.title,
            xlabel: &self.xlabel,
            ylabel: &self.ylabel,
        };
        paint_scene(&mut self.canvas, &scene, &mut self.ylabel_cache);

        self.transform = transform;
        self.state = RenderState::Clean;
    }

    fn ticks(&self, lo: f64, hi: f64) -> TickSet {
        match make_ticks(lo, hi, self.tick_target) {
            Ok(ticks) => ticks,
            Err(err) => {
                crate::log::warn!(error = %err, "no ticks for axis");
                TickSet::default()
            }
        }
    }

    /// Render if needed and hand the canvas to the viewer
    pub fn show(&mut self, title: &str) -> Result<(), PlotError> {
        self.render();
        self.viewer.display(&self.canvas, title)
    }

    /// Render if needed and write the canvas; the format follows the extension
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), PlotError> {
        let path = path.as_ref();
        self.render();
        if let Err(err) = self.canvas.save(path) {
            crate::log::warn!(path = %path.display(), error = %err, "failed to save figure");
            return Err(err);
        }
        crate::log::info!(path = %path.display(), "figure saved");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    /// The visible window from the last render
    pub fn axes(&self) -> &Axes {
        self.transform.axes()
    }

    /// Limits and flags as configured, before autoscale and padding
    pub fn configured_axes(&self) -> &Axes {
        &self.axes
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The data-to-pixel mapping from the last render
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn ylabel_cache(&self) -> &YLabelCache {
        &self.ylabel_cache
    }

    pub fn tick_target(&self) -> usize {
        self.tick_target
    }

    /// The legend placement, if the legend is on
    pub fn legend_loc(&self) -> Option<LegendLoc> {
        self.legend_on.then_some(self.legend_loc)
    }
}

fn check_plot_area(width: u32, height: u32, m: &Margins) -> Result<(), PlotError> {
    let plot_w = i64::from(width) - i64::from(m.left) - i64::from(m.right);
    let plot_h = i64::from(height) - i64::from(m.top) - i64::from(m.bottom);
    let margins_ok = m.left >= 0 && m.right >= 0 && m.top >= 0 && m.bottom >= 0;
    if !margins_ok || plot_w <= 0 || plot_h <= 0 || i32::try_from(width.max(height)).is_err() {
        return Err(PlotError::InvalidCanvasSize { width, height });
    }
    Ok(())
}

fn ordered_limits(lo: f64, hi: f64) -> Option<(f64, f64)> {
    if !lo.is_finite() || !hi.is_finite() {
        crate::log::warn!(lo, hi, "ignoring non-finite axis limits");
        return None;
    }
    Some(if lo <= hi { (lo, hi) } else { (hi, lo) })
}
