//! Sources: bit emitters pre-loaded from an encoded input line.

use crate::bit::Bit;
use crate::direction::Direction;
use crate::io::{self, InputError, IoFormat};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A `?` cell. Emits one bit east per tick until its queue runs dry, then
/// closes for good. Bits that run into a source are absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub x: i32,
    pub y: i32,
    /// Remaining bit values to emit, next first.
    pub queue: VecDeque<bool>,
    pub open: bool,
}

impl Source {
    /// Build a source from one raw input line, encoded per the I/O format.
    pub fn new(x: i32, y: i32, input: &str, format: IoFormat) -> Result<Self, InputError> {
        let queue: VecDeque<bool> = io::encode_input(input, format)?.into();
        let open = !queue.is_empty();
        Ok(Self { x, y, queue, open })
    }

    /// Release the next bit, heading east from this cell. Closes when the
    /// queue empties.
    pub fn emit(&mut self) -> Option<Bit> {
        if !self.open {
            return None;
        }
        let value = self.queue.pop_front()?;
        if self.queue.is_empty() {
            self.open = false;
        }
        Some(Bit::new(self.x, self.y, Direction::East, value))
    }
}
