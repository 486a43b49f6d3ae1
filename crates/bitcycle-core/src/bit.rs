//! The traveling unit of data: a single bit with a position and a heading.

use crate::direction::Direction;
use serde::{Deserialize, Serialize};

/// A bit moving across the playfield (or waiting inside a collector queue).
///
/// Positions are signed so a bit can step one cell past the grid edge; the
/// engine destroys it on the tick that takes it out of bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bit {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub value: bool,
}

impl Bit {
    pub fn new(x: i32, y: i32, direction: Direction, value: bool) -> Self {
        Self {
            x,
            y,
            direction,
            value,
        }
    }

    /// Step one cell along the current direction.
    pub fn advance(&mut self) {
        self.x += self.direction.dx();
        self.y += self.direction.dy();
    }

    /// The display digit for this bit's value.
    pub fn digit(&self) -> char {
        if self.value { '1' } else { '0' }
    }
}
