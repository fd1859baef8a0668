//! Legend placement and drawing

use std::fmt;

use glam::{IVec2, ivec2};

use super::defaults;
use super::transform::Transform;
use crate::canvas::Canvas;
use crate::command::Command;
use crate::types::{Color, PixelPoint};

/// The sample drawn beside a legend label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swatch {
    /// Short horizontal stroke
    Stroke,
    /// Filled dot
    Dot,
    /// Filled rectangle
    Block,
}

/// Where the legend box sits inside the plot area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LegendLoc {
    NorthWest,
    North,
    #[default]
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl LegendLoc {
    pub const ALL: [LegendLoc; 9] = [
        LegendLoc::NorthWest,
        LegendLoc::North,
        LegendLoc::NorthEast,
        LegendLoc::West,
        LegendLoc::Center,
        LegendLoc::East,
        LegendLoc::SouthWest,
        LegendLoc::South,
        LegendLoc::SouthEast,
    ];

    /// Placement used for keywords that are not recognized
    pub const FALLBACK: LegendLoc = LegendLoc::SouthEast;

    pub fn keyword(self) -> &'static str {
        match self {
            LegendLoc::NorthWest => "northWest",
            LegendLoc::North => "north",
            LegendLoc::NorthEast => "northEast",
            LegendLoc::West => "west",
            LegendLoc::Center => "center",
            LegendLoc::East => "east",
            LegendLoc::SouthWest => "southWest",
            LegendLoc::South => "south",
            LegendLoc::SouthEast => "southEast",
        }
    }

    /// Parse a location keyword, ignoring ASCII case
    pub fn from_keyword(keyword: &str) -> Option<LegendLoc> {
        LegendLoc::ALL
            .into_iter()
            .find(|loc| loc.keyword().eq_ignore_ascii_case(keyword.trim()))
    }
}

impl fmt::Display for LegendLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Top-left corner for a `size` box at `loc`, kept clear of the left and top
/// margins even when the box is larger than the plot area.
pub fn legend_anchor(loc: LegendLoc, size: IVec2, transform: &Transform) -> PixelPoint {
    let left = transform.left();
    let right = transform.right() - size.x;
    let hmid = left + (transform.plot_width() - size.x) / 2;
    let top = transform.top();
    let bottom = transform.bottom() - size.y;
    let vmid = top + (transform.plot_height() - size.y) / 2;

    let (x, y) = match loc {
        LegendLoc::NorthWest => (left, top),
        LegendLoc::North => (hmid, top),
        LegendLoc::NorthEast => (right, top),
        LegendLoc::West => (left, vmid),
        LegendLoc::Center => (hmid, vmid),
        LegendLoc::East => (right, vmid),
        LegendLoc::SouthWest => (left, bottom),
        LegendLoc::South => (hmid, bottom),
        LegendLoc::SouthEast => (right, bottom),
    };
    ivec2(x.max(left), y.max(top))
}

/// Box geometry for a set of legend rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendLayout {
    pub anchor: PixelPoint,
    pub size: IVec2,
    pub row_height: i32,
}

impl LegendLayout {
    /// Size the box to the widest label and place it
    pub fn compute<'a>(
        canvas: &Canvas,
        labels: impl IntoIterator<Item = &'a str>,
        loc: LegendLoc,
        transform: &Transform,
    ) -> Option<LegendLayout> {
        let mut rows = 0;
        let mut text_w = 0;
        let mut text_h = 0;
        for label in labels {
            let ext = canvas.measure_text(label, defaults::LEGEND_FONT_SCALE, 1);
            text_w = text_w.max(ext.width);
            text_h = text_h.max(ext.height + ext.baseline);
            rows += 1;
        }
        if rows == 0 {
            return None;
        }

        let row_height = text_h + defaults::LEGEND_ROW_PAD;
        let size = ivec2(
            defaults::LEGEND_SWATCH_WIDTH + defaults::LEGEND_LABEL_GAP + text_w + defaults::LEGEND_RIGHT_PAD,
            row_height * rows + 2 * defaults::LEGEND_INSET,
        );
        Some(LegendLayout {
            anchor: legend_anchor(loc, size, transform),
            size,
            row_height,
        })
    }

    /// Vertical centre of row `i`
    pub fn row_center(&self, i: usize) -> i32 {
        self.anchor.y + defaults::LEGEND_INSET + i as i32 * self.row_height + self.row_height / 2
    }
}

/// Draw the legend for every labeled command, in insertion order
pub(crate) fn draw_legend(canvas: &mut Canvas, commands: &[Command], loc: LegendLoc, transform: &Transform) {
    let entries: Vec<&Command> = commands.iter().filter(|c| c.has_label()).collect();
    let Some(layout) =
        LegendLayout::compute(canvas, entries.iter().map(|c| c.label_text()), loc, transform)
    else {
        return;
    };

    let corner = layout.anchor + layout.size;
    canvas.fill_rect(layout.anchor, corner, defaults::BACKGROUND);
    canvas.stroke_rect(layout.anchor, corner, defaults::FOREGROUND, 1.0);

    let x = layout.anchor.x + defaults::LEGEND_INSET;
    let sw = defaults::LEGEND_SWATCH_WIDTH;
    for (i, cmd) in entries.iter().enumerate() {
        let y = layout.row_center(i);
        draw_swatch(canvas, cmd.swatch(), ivec2(x, y), cmd.stroke_color());
        canvas.draw_text(
            cmd.label_text(),
            ivec2(x + sw + defaults::LEGEND_LABEL_GAP, y + defaults::LEGEND_LABEL_BASELINE_OFFSET),
            defaults::LEGEND_FONT_SCALE,
            defaults::FOREGROUND,
            1,
        );
    }
}

/// `origin` is the left end of the swatch on the row's centre line
fn draw_swatch(canvas: &mut Canvas, swatch: Swatch, origin: PixelPoint, color: Color) {
    let sw = defaults::LEGEND_SWATCH_WIDTH;
    match swatch {
        Swatch::Stroke => canvas.stroke_line(
            origin,
            origin + ivec2(sw, 0),
            color,
            defaults::LEGEND_SWATCH_LINE_WIDTH,
        ),
        Swatch::Dot => canvas.fill_circle(
            origin + ivec2(sw / 2, 0),
            defaults::LEGEND_SWATCH_DOT_RADIUS,
            color,
        ),
        Swatch::Block => {
            let half = defaults::LEGEND_SWATCH_BLOCK_HALF_HEIGHT;
            canvas.fill_rect(origin - ivec2(0, half), origin + ivec2(sw, half), color);
        }
    }
}
