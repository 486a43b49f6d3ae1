//! Collectors: named batching devices that queue bits until opened.

use crate::bit::Bit;
use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Every letter that may name a collector, in scheduling precedence order.
/// `v`/`V` is excluded because it is the south-pointing router.
pub const COLLECTOR_NAMES: &str = "ABCDEFGHIJKLMNOPQRSTUWXYZ";

/// One physical collector cell. Several cells may share a name; they are
/// opened together but each keeps its own queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collector {
    /// Uppercase name letter. Determines activation order.
    pub name: char,
    pub x: i32,
    pub y: i32,
    /// Open collectors release one bit per tick until empty.
    pub open: bool,
    /// Bits waiting inside this collector, oldest first.
    pub queue: VecDeque<Bit>,
}

impl Collector {
    pub fn new(name: char, x: i32, y: i32) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            x,
            y,
            open: false,
            queue: VecDeque::new(),
        }
    }

    /// Take in a bit that landed on this cell.
    pub fn receive(&mut self, bit: Bit) {
        self.queue.push_back(bit);
    }

    /// Release the next queued bit, heading east. An open collector whose
    /// queue has already drained closes instead of emitting; it does not
    /// close on the tick that empties it.
    pub fn emit(&mut self) -> Option<Bit> {
        if !self.open {
            return None;
        }
        match self.queue.pop_front() {
            Some(mut bit) => {
                bit.direction = Direction::East;
                Some(bit)
            }
            None => {
                self.open = false;
                None
            }
        }
    }

    /// Display letter: lowercase while open.
    pub fn glyph(&self) -> char {
        if self.open {
            self.name.to_ascii_lowercase()
        } else {
            self.name
        }
    }
}
