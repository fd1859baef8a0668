//! The retained drawing-command model.
//!
//! Each command variant owns its geometry in data space plus whatever style it
//! needs. Commands know how to grow the figure's [`Bounds`], validate their own
//! geometry, pick a legend swatch and draw themselves into a render pass.

use enum_dispatch::enum_dispatch;

use crate::errors::GeometryError;
use crate::render::DrawPass;
use crate::render::defaults;
use crate::render::legend::Swatch;
use crate::types::{Bounds, Color, DataPoint};

// ============================================================================
// Dispatch traits
// ============================================================================

/// Data-space behaviour shared by every command payload
#[enum_dispatch]
pub trait Geometry {
    /// Grow `bounds` by the extent this command covers in data space
    fn extend_bounds(&self, bounds: &mut Bounds);

    /// Check that the geometry can be drawn
    fn validate(&self) -> Result<(), GeometryError>;

    /// Sample drawn next to this command's legend label
    fn swatch(&self) -> Swatch;
}

/// Rasterization of a command payload
#[enum_dispatch]
pub(crate) trait Draw {
    fn draw(&self, pass: &mut DrawPass<'_>, color: Color);
}

// ============================================================================
// Styles
// ============================================================================

/// Outline and fill of a closed shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub stroke_color: Color,
    /// `<= 0` disables the outline
    pub stroke_width: f32,
    pub fill_color: Color,
    /// Opacity of the fill in `[0, 1]`; `0` disables the fill
    pub fill_alpha: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        ShapeStyle {
            stroke_color: defaults::FOREGROUND,
            stroke_width: defaults::LINE_WIDTH,
            fill_color: defaults::BACKGROUND,
            fill_alpha: 1.0,
        }
    }
}

/// How a shape's interior is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillMode {
    None,
    /// Drawn into a scratch copy and composited with this opacity
    Translucent(f32),
    Opaque,
}

impl ShapeStyle {
    /// Outline only
    pub fn outline(color: Color, width: f32) -> Self {
        ShapeStyle {
            stroke_color: color,
            stroke_width: width,
            fill_alpha: 0.0,
            ..ShapeStyle::default()
        }
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    /// Set the fill; `alpha` is clamped to `[0, 1]`
    pub fn with_fill(mut self, color: Color, alpha: f64) -> Self {
        self.fill_color = color;
        self.fill_alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        self
    }

    pub fn fill_mode(&self) -> FillMode {
        if self.fill_alpha <= 0.0 || self.fill_alpha.is_nan() {
            FillMode::None
        } else if self.fill_alpha < 1.0 {
            FillMode::Translucent(self.fill_alpha as f32)
        } else {
            FillMode::Opaque
        }
    }

    pub fn has_stroke(&self) -> bool {
        self.stroke_width > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Baseline,
    Center,
    Top,
    Bottom,
}

/// Font and anchoring of a text command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_scale: f64,
    /// Stroke weight in pixels
    pub weight: u32,
    pub halign: HAlign,
    pub valign: VAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle {
            font_scale: defaults::TEXT_FONT_SCALE,
            weight: defaults::TEXT_WEIGHT,
            halign: HAlign::default(),
            valign: VAlign::default(),
        }
    }
}

impl TextStyle {
    pub fn aligned(mut self, halign: HAlign, valign: VAlign) -> Self {
        self.halign = halign;
        self.valign = valign;
        self
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Parallel x/y coordinate sequences
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Series {
    pub fn new(xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> Self {
        Series {
            xs: xs.into(),
            ys: ys.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len().min(self.ys.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = DataPoint> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| DataPoint::new(x, y))
    }

    fn check(&self) -> Result<(), GeometryError> {
        if self.xs.len() != self.ys.len() {
            return Err(GeometryError::LengthMismatch {
                xs: self.xs.len(),
                ys: self.ys.len(),
            });
        }
        match self.points().position(|p| !p.is_finite()) {
            Some(index) => Err(GeometryError::NonFinite { index }),
            None => Ok(()),
        }
    }

    fn extend(&self, bounds: &mut Bounds) {
        for p in self.points() {
            bounds.expand_point(p);
        }
    }
}

fn check_point(p: DataPoint) -> Result<(), GeometryError> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFinite { index: 0 })
    }
}

fn check_size(what: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_nan() || value < 0.0 {
        Err(GeometryError::NegativeSize { what, value })
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub series: Series,
    pub width: f32,
}

impl Geometry for LineCmd {
    fn extend_bounds(&self, bounds: &mut Bounds) {
        self.series.extend(bounds);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        self.series.check()
    }

    fn swatch(&self) -> Swatch {
        Swatch::Stroke
    }
}

/// Filled markers of a fixed pixel radius
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterCmd {
    pub series: Series,
    pub radius: f32,
}

impl Geometry for ScatterCmd {
    fn extend_bounds(&self, bounds: &mut Bounds) {
        self.series.extend(bounds);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        self.series.check()
    }

    fn swatch(&self) -> Swatch {
        Swatch::Dot
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub anchor: DataPoint,
    pub text: String,
    pub style: TextStyle,
}

impl Geometry for TextCmd {
    // Text is placed in data space but never widens the view
    fn extend_bounds(&self, _bounds: &mut Bounds) {}

    fn validate(&self) -> Result<(), GeometryError> {
        check_point(self.anchor)
    }

    fn swatch(&self) -> Swatch {
        Swatch::Block
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: DataPoint,
    /// Radius in x data units
    pub radius: f64,
    pub style: ShapeStyle,
}

impl Geometry for CircleCmd {
    fn extend_bounds(&self, bounds: &mut Bounds) {
        let r = DataPoint::splat(self.radius);
        bounds.expand_point(self.center - r);
        bounds.expand_point(self.center + r);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point(self.center)?;
        check_size("radius", self.radius)
    }

    fn swatch(&self) -> Swatch {
        Swatch::Dot
    }
}

/// Axis-aligned rectangle stored as two opposite corners.
///
/// Both the corner form and the origin/size form normalize to this.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub p0: DataPoint,
    pub p1: DataPoint,
    pub style: ShapeStyle,
}

impl Geometry for RectCmd {
    fn extend_bounds(&self, bounds: &mut Bounds) {
        bounds.expand_point(self.p0);
        bounds.expand_point(self.p1);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point(self.p0)?;
        check_point(self.p1)
    }

    fn swatch(&self) -> Swatch {
        Swatch::Block
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotatedRectCmd {
    pub center: DataPoint,
    pub width: f64,
    pub height: f64,
    /// Counter-clockwise, in degrees
    pub angle_deg: f64,
    pub style: ShapeStyle,
}

impl Geometry for RotatedRectCmd {
    fn extend_bounds(&self, bounds: &mut Bounds) {
        // Any rotation stays inside the circle through the corners
        let half_diag = 0.5 * self.width.hypot(self.height);
        let r = DataPoint::splat(half_diag);
        bounds.expand_point(self.center - r);
        bounds.expand_point(self.center + r);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point(self.center)?;
        check_size("width", self.width)?;
        check_size("height", self.height)?;
        if self.angle_deg.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::NonFinite { index: 0 })
        }
    }

    fn swatch(&self) -> Swatch {
        Swatch::Block
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCmd {
    pub series: Series,
    pub style: ShapeStyle,
}

impl Geometry for PolygonCmd {
    fn extend_bounds(&self, bounds: &mut Bounds) {
        self.series.extend(bounds);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        self.series.check()?;
        if self.series.is_empty() {
            return Err(GeometryError::Empty { kind: "polygon" });
        }
        Ok(())
    }

    fn swatch(&self) -> Swatch {
        Swatch::Block
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EllipseCmd {
    pub center: DataPoint,
    /// Full extent along the unrotated x axis
    pub width: f64,
    pub height: f64,
    /// Counter-clockwise, in degrees
    pub angle_deg: f64,
    pub style: ShapeStyle,
}

impl Geometry for EllipseCmd {
    // Unrotated extent; rotation is not accounted for
    fn extend_bounds(&self, bounds: &mut Bounds) {
        let half = DataPoint::new(0.5 * self.width, 0.5 * self.height);
        bounds.expand_point(self.center - half);
        bounds.expand_point(self.center + half);
    }

    fn validate(&self) -> Result<(), GeometryError> {
        check_point(self.center)?;
        check_size("width", self.width)?;
        check_size("height", self.height)?;
        if self.angle_deg.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::NonFinite { index: 0 })
        }
    }

    fn swatch(&self) -> Swatch {
        Swatch::Block
    }
}

// ============================================================================
// Command
// ============================================================================

/// The closed set of drawable payloads
#[enum_dispatch(Geometry, Draw)]
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    Line(LineCmd),
    Scatter(ScatterCmd),
    Text(TextCmd),
    Circle(CircleCmd),
    Rect(RectCmd),
    RotatedRect(RotatedRectCmd),
    Polygon(PolygonCmd),
    Ellipse(EllipseCmd),
}

impl CommandKind {
    /// Style of a closed shape, `None` for lines, markers and text
    pub fn shape_style(&self) -> Option<&ShapeStyle> {
        match self {
            CommandKind::Circle(c) => Some(&c.style),
            CommandKind::Rect(c) => Some(&c.style),
            CommandKind::RotatedRect(c) => Some(&c.style),
            CommandKind::Polygon(c) => Some(&c.style),
            CommandKind::Ellipse(c) => Some(&c.style),
            CommandKind::Line(_) | CommandKind::Scatter(_) | CommandKind::Text(_) => None,
        }
    }

    fn shape_style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match self {
            CommandKind::Circle(c) => Some(&mut c.style),
            CommandKind::Rect(c) => Some(&mut c.style),
            CommandKind::RotatedRect(c) => Some(&mut c.style),
            CommandKind::Polygon(c) => Some(&mut c.style),
            CommandKind::Ellipse(c) => Some(&mut c.style),
            CommandKind::Line(_) | CommandKind::Scatter(_) | CommandKind::Text(_) => None,
        }
    }
}

/// One retained drawing command: payload, stroke colour and legend label.
///
/// Built with the constructors below and refined with the builder methods,
/// e.g. `Command::line(xs, ys).color(Color::RED).label("signal")`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    kind: CommandKind,
    color: Color,
    label: String,
}

impl Command {
    /// Wrap a payload, taking the colour from its style where it has one
    pub fn new(kind: impl Into<CommandKind>) -> Self {
        let kind = kind.into();
        let color = match &kind {
            CommandKind::Line(_) => defaults::LINE_COLOR,
            CommandKind::Scatter(_) => defaults::SCATTER_COLOR,
            CommandKind::Text(_) => defaults::TEXT_COLOR,
            shape => shape
                .shape_style()
                .map(|s| s.stroke_color)
                .unwrap_or(defaults::FOREGROUND),
        };
        Command {
            kind,
            color,
            label: String::new(),
        }
    }

    pub fn line(xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> Self {
        Command::new(LineCmd {
            series: Series::new(xs, ys),
            width: defaults::LINE_WIDTH,
        })
    }

    pub fn scatter(xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> Self {
        Command::new(ScatterCmd {
            series: Series::new(xs, ys),
            radius: defaults::MARKER_RADIUS,
        })
    }

    pub fn text(x: f64, y: f64, text: impl Into<String>) -> Self {
        Command::new(TextCmd {
            anchor: DataPoint::new(x, y),
            text: text.into(),
            style: TextStyle::default(),
        })
    }

    pub fn circle(cx: f64, cy: f64, radius: f64) -> Self {
        Command::new(CircleCmd {
            center: DataPoint::new(cx, cy),
            radius,
            style: ShapeStyle::default(),
        })
    }

    /// Rectangle from two opposite corners
    pub fn rect_ltrb(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Command::new(RectCmd {
            p0: DataPoint::new(x0, y0),
            p1: DataPoint::new(x1, y1),
            style: ShapeStyle::default(),
        })
    }

    /// Rectangle from an origin corner and a size
    pub fn rect_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Command::rect_ltrb(x, y, x + w, y + h)
    }

    pub fn rotated_rect(cx: f64, cy: f64, width: f64, height: f64, angle_deg: f64) -> Self {
        Command::new(RotatedRectCmd {
            center: DataPoint::new(cx, cy),
            width,
            height,
            angle_deg,
            style: ShapeStyle::default(),
        })
    }

    pub fn polygon(xs: impl Into<Vec<f64>>, ys: impl Into<Vec<f64>>) -> Self {
        Command::new(PolygonCmd {
            series: Series::new(xs, ys),
            style: ShapeStyle::default(),
        })
    }

    pub fn ellipse(cx: f64, cy: f64, width: f64, height: f64, angle_deg: f64) -> Self {
        Command::new(EllipseCmd {
            center: DataPoint::new(cx, cy),
            width,
            height,
            angle_deg,
            style: ShapeStyle::default(),
        })
    }

    /// Set the stroke colour (for shapes, the outline colour)
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        if let Some(style) = self.kind.shape_style_mut() {
            style.stroke_color = color;
        }
        self
    }

    /// Legend label; empty keeps the command out of the legend
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Stroke width of a line or shape outline, or weight of text
    pub fn width(mut self, width: f32) -> Self {
        match &mut self.kind {
            CommandKind::Line(c) => c.width = width,
            CommandKind::Text(c) => c.style.weight = width.max(0.0).round() as u32,
            CommandKind::Scatter(_) => {}
            kind => {
                if let Some(style) = kind.shape_style_mut() {
                    style.stroke_width = width;
                }
            }
        }
        self
    }

    /// Marker radius in pixels (scatter only)
    pub fn marker_radius(mut self, radius: f32) -> Self {
        if let CommandKind::Scatter(c) = &mut self.kind {
            c.radius = radius;
        }
        self
    }

    /// Replace the shape style; the command colour follows its stroke colour
    pub fn style(mut self, new_style: ShapeStyle) -> Self {
        if let Some(style) = self.kind.shape_style_mut() {
            *style = new_style;
            self.color = new_style.stroke_color;
        }
        self
    }

    /// Replace the text style (text only)
    pub fn text_style(mut self, new_style: TextStyle) -> Self {
        if let CommandKind::Text(c) = &mut self.kind {
            c.style = new_style;
        }
        self
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn stroke_color(&self) -> Color {
        self.color
    }

    pub fn label_text(&self) -> &str {
        &self.label
    }

    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        self.kind.validate()
    }

    pub fn extend_bounds(&self, bounds: &mut Bounds) {
        self.kind.extend_bounds(bounds);
    }

    pub fn swatch(&self) -> Swatch {
        self.kind.swatch()
    }

    pub(crate) fn draw(&self, pass: &mut DrawPass<'_>) {
        self.kind.draw(pass, self.color);
    }
}
