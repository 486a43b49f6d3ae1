//! Read-only snapshots of the playfield for rendering and inspection.
//!
//! All types are owned copies -- no references into engine storage. A
//! renderer receives one [`PlayfieldSnapshot`] per tick (or per sub-frame)
//! and redraws from it alone.

use crate::direction::Direction;
use crate::id::BitId;
use crate::sim::Ticks;

/// How many queued values a collector/source cell exposes for preview.
pub const QUEUE_PREVIEW_LEN: usize = 6;

/// One cell's current display state.
#[derive(Debug, Clone)]
pub struct CellSnapshot {
    pub x: i32,
    pub y: i32,
    /// The character this cell currently shows (latched devices change
    /// glyph; open collectors show lowercase).
    pub glyph: char,
    /// For collectors and sources: the first few queued values, oldest
    /// first. Empty for every other cell kind.
    pub queue: Vec<bool>,
}

/// One in-flight bit.
#[derive(Debug, Clone, Copy)]
pub struct BitSnapshot {
    /// Stable for the bit's whole flight; lets a renderer interpolate the
    /// same bit across ticks.
    pub id: BitId,
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub value: bool,
}

/// The full per-tick view handed to the rendering collaborator.
#[derive(Debug, Clone)]
pub struct PlayfieldSnapshot {
    pub tick: Ticks,
    pub width: usize,
    pub height: usize,
    pub halted: bool,
    /// Cells in reading order (row-major).
    pub cells: Vec<CellSnapshot>,
    /// In-flight bits in processing order.
    pub bits: Vec<BitSnapshot>,
}

impl PlayfieldSnapshot {
    /// Glyph of the cell at an in-bounds position.
    pub fn glyph_at(&self, x: i32, y: i32) -> char {
        self.cells[y as usize * self.width + x as usize].glyph
    }

    /// Render the playfield as plain text with in-flight bits overlaid on
    /// their cells, the way the terminal interpreter displays a program.
    pub fn text(&self) -> String {
        let mut rows: Vec<Vec<char>> = (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.glyph_at(x as i32, y as i32))
                    .collect()
            })
            .collect();

        for bit in &self.bits {
            if bit.x < 0 || bit.y < 0 {
                continue;
            }
            let (x, y) = (bit.x as usize, bit.y as usize);
            if y < self.height && x < rows[y].len() {
                let current = rows[y][x];
                // First bit drawn on a cell wins.
                if current != '0' && current != '1' {
                    rows[y][x] = if bit.value { '1' } else { '0' };
                }
            }
        }

        rows.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
