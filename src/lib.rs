//! A retained-command 2-D plotting engine.
//!
//! Build a [`Figure`] out of lines, markers, shapes and text, tweak axes and
//! decorations, then [`render`](Figure::render), [`save`](Figure::save) or
//! [`show`](Figure::show) it. Adding commands and changing settings is cheap;
//! all pixel work happens in one pass, and only when something changed.
//!
//! ```no_run
//! use figura::{Color, Command, Figure};
//!
//! # fn main() -> Result<(), figura::PlotError> {
//! let mut fig = Figure::default_size()?;
//! fig.plot([0.0, 1.0, 2.0], [0.0, 1.0, 4.0])
//!     .add(Command::scatter([0.5, 1.5], [0.25, 2.25]).color(Color::GREEN).label("samples"))
//!     .title("squares")
//!     .grid(true)
//!     .legend(true, "northWest");
//! fig.save("squares.png")?;
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod command;
pub mod errors;
pub mod figure;
pub mod log;
pub mod render;
pub mod ticks;
pub mod types;
pub mod viewer;

pub use canvas::{Canvas, TextExtent};
pub use command::{
    Command, CommandKind, FillMode, Geometry, HAlign, ShapeStyle, TextStyle, VAlign,
};
pub use errors::{GeometryError, PlotError, TickError};
pub use figure::Figure;
pub use render::{LegendLoc, RenderState, Transform};
pub use ticks::{TickSet, make_ticks, nice_num};
pub use types::{Axes, Bounds, Color, DataPoint, Margins, PixelPoint};
pub use viewer::{SnapshotViewer, Viewer};
