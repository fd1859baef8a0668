//! The render pass
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes, colours and font scales
//! - `transform`: Axis range resolution and the data-to-pixel mapping
//! - `draw`: Per-command rasterization
//! - `legend`: Legend placement and drawing
//! - `decorations`: Grid, axes, title and axis labels

pub mod decorations;
pub mod defaults;
pub(crate) mod draw;
pub mod legend;
pub mod transform;

pub use decorations::YLabelCache;
pub(crate) use draw::DrawPass;
pub use legend::{LegendLayout, LegendLoc, Swatch, legend_anchor};
pub use transform::{Transform, resolve_axes};

use crate::canvas::Canvas;
use crate::command::Command;
use crate::ticks::TickSet;

/// Whether the canvas reflects the current figure contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// Canvas matches the command list and settings
    Clean,
    /// Canvas is stale; the next render does the full pass
    #[default]
    Dirty,
}

impl RenderState {
    pub fn is_dirty(self) -> bool {
        self == RenderState::Dirty
    }
}

/// Everything one render pass paints, borrowed from the figure
pub(crate) struct Scene<'a> {
    pub commands: &'a [Command],
    pub transform: &'a Transform,
    pub x_ticks: &'a TickSet,
    pub y_ticks: &'a TickSet,
    pub grid: bool,
    pub legend: Option<LegendLoc>,
    pub title: &'a str,
    pub xlabel: &'a str,
    pub ylabel: &'a str,
}

/// Paint a full frame: background, grid, axes, commands in insertion order,
/// legend, then title and axis labels
pub(crate) fn paint_scene(canvas: &mut Canvas, scene: &Scene<'_>, ylabel_cache: &mut YLabelCache) {
    let t = scene.transform;
    canvas.clear(defaults::BACKGROUND);

    if scene.grid {
        decorations::draw_grid(canvas, t, scene.x_ticks, scene.y_ticks);
    }
    decorations::draw_axes(canvas, t, scene.x_ticks, scene.y_ticks);

    let mut pass = DrawPass::new(canvas, t);
    for cmd in scene.commands {
        cmd.draw(&mut pass);
    }

    if let Some(loc) = scene.legend {
        legend::draw_legend(canvas, scene.commands, loc, t);
    }

    decorations::draw_title(canvas, scene.title);
    decorations::draw_xlabel(canvas, t, scene.xlabel);
    ylabel_cache.draw(canvas, t, scene.ylabel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticks::make_ticks;
    use crate::types::{Axes, Color, Margins};

    #[test]
    fn render_state_defaults_to_dirty() {
        assert_eq!(RenderState::default(), RenderState::Dirty);
        assert!(RenderState::Dirty.is_dirty());
        assert!(!RenderState::Clean.is_dirty());
    }

    #[test]
    fn later_commands_paint_over_earlier_ones() {
        let axes = Axes { xmin: 0.0, xmax: 10.0, ymin: 0.0, ymax: 10.0, ..Axes::default() };
        let t = Transform::new(axes, 640, 480, Margins::default());
        let xt = make_ticks(0.0, 10.0, 6).unwrap();
        let yt = make_ticks(0.0, 10.0, 6).unwrap();
        let commands = vec![
            Command::rect_ltrb(2.0, 2.0, 8.0, 8.0)
                .style(crate::command::ShapeStyle::default().with_fill(Color::RED, 1.0)),
            Command::rect_ltrb(4.0, 4.0, 6.0, 6.0)
                .style(crate::command::ShapeStyle::default().with_fill(Color::GREEN, 1.0)),
        ];
        let scene = Scene {
            commands: &commands,
            transform: &t,
            x_ticks: &xt,
            y_ticks: &yt,
            grid: true,
            legend: None,
            title: "",
            xlabel: "",
            ylabel: "",
        };
        let mut canvas = Canvas::new(640, 480).unwrap();
        paint_scene(&mut canvas, &scene, &mut YLabelCache::default());

        let center = t.data_to_pixel(glam::DVec2::new(5.0, 5.0));
        assert_eq!(canvas.pixel(center.x as u32, center.y as u32), Some(Color::GREEN));
        let ring = t.data_to_pixel(glam::DVec2::new(3.0, 3.0));
        assert_eq!(canvas.pixel(ring.x as u32, ring.y as u32), Some(Color::RED));
    }
}
