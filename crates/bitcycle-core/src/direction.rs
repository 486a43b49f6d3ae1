//! Cardinal directions and grid displacement.

use serde::{Deserialize, Serialize};

/// The four directions a bit can travel. Bits always move exactly one cell
/// per tick along their current direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    West,
    North,
    East,
    South,
}

impl Direction {
    /// Horizontal displacement for one step in this direction.
    pub fn dx(self) -> i32 {
        match self {
            Direction::West => -1,
            Direction::East => 1,
            Direction::North | Direction::South => 0,
        }
    }

    /// Vertical displacement for one step in this direction.
    /// Positive y points down the playfield.
    pub fn dy(self) -> i32 {
        match self {
            Direction::North => -1,
            Direction::South => 1,
            Direction::West | Direction::East => 0,
        }
    }

    /// Rotate 90 degrees clockwise.
    pub fn turn_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Rotate 90 degrees counterclockwise.
    pub fn turn_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }
}
