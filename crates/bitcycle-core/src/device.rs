//! Stateless and latching playfield devices.
//!
//! Everything on the grid that is not a collector, source, or sink is one
//! closed sum type. Latching devices (mirrors and the demultiplexer) mutate
//! in place when hit and are reverted by the global reset that fires when a
//! collector batch opens.

use crate::direction::Direction;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Device variants
// ---------------------------------------------------------------------------

/// Which diagonal a mirror lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorKind {
    /// `/` when armed, `|` after firing.
    Forward,
    /// `\` when armed, `-` after firing.
    Backward,
}

/// A device cell without queue storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    /// `> < ^ v`: unconditionally set the bit's direction.
    Router(Direction),
    /// `+`: turn right on a 1 bit, left on a 0 bit.
    Gate,
    /// `/ \\`: reflect once, then pass bits through until rearmed.
    Mirror { kind: MirrorKind, armed: bool },
    /// `~`: turn the bit right and spawn its inverse turning left.
    Splitter,
    /// `=`: pass the first bit through and latch into `}` (on 1) or `{`
    /// (on 0), then behave as `>` or `<` until reset.
    Demux { latch: Option<bool> },
    /// `@`: halt the program.
    Halt,
    /// Anything unclassified: an inert label.
    Blank(char),
}

/// What the engine should do with a bit that stepped onto a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceAction {
    /// Direction unchanged; keep flying.
    Pass,
    /// Direction replaced; keep flying.
    Redirect(Direction),
    /// Keep the bit (turned right) and spawn its inverse (turned left).
    Split,
    /// End the program immediately.
    Halt,
}

impl Device {
    /// Map a (lowercased) program character to a device. The loader handles
    /// collectors, sources, sinks, and literal bits before calling this, so
    /// every unclassified character becomes an inert [`Device::Blank`].
    pub fn from_char(chr: char) -> Device {
        match chr {
            '>' => Device::Router(Direction::East),
            '<' => Device::Router(Direction::West),
            '^' => Device::Router(Direction::North),
            'v' => Device::Router(Direction::South),
            '+' => Device::Gate,
            '/' => Device::Mirror {
                kind: MirrorKind::Forward,
                armed: true,
            },
            '\\' => Device::Mirror {
                kind: MirrorKind::Backward,
                armed: true,
            },
            // Literal inactive/latched forms load as already fired.
            '|' => Device::Mirror {
                kind: MirrorKind::Forward,
                armed: false,
            },
            '-' => Device::Mirror {
                kind: MirrorKind::Backward,
                armed: false,
            },
            '~' => Device::Splitter,
            '=' => Device::Demux { latch: None },
            '{' => Device::Demux { latch: Some(false) },
            '}' => Device::Demux { latch: Some(true) },
            '@' => Device::Halt,
            other => Device::Blank(other),
        }
    }

    /// The character this device currently displays as.
    pub fn glyph(&self) -> char {
        match self {
            Device::Router(Direction::East) => '>',
            Device::Router(Direction::West) => '<',
            Device::Router(Direction::North) => '^',
            Device::Router(Direction::South) => 'v',
            Device::Gate => '+',
            Device::Mirror {
                kind: MirrorKind::Forward,
                armed,
            } => {
                if *armed { '/' } else { '|' }
            }
            Device::Mirror {
                kind: MirrorKind::Backward,
                armed,
            } => {
                if *armed { '\\' } else { '-' }
            }
            Device::Splitter => '~',
            Device::Demux { latch: None } => '=',
            Device::Demux { latch: Some(false) } => '{',
            Device::Demux { latch: Some(true) } => '}',
            Device::Halt => '@',
            Device::Blank(c) => *c,
        }
    }

    /// Resolve a bit landing on this cell. Latching devices update their
    /// own state here; the engine applies the returned action to the bit.
    pub fn hit(&mut self, direction: Direction, value: bool) -> DeviceAction {
        match self {
            Device::Router(d) => DeviceAction::Redirect(*d),
            Device::Gate => {
                if value {
                    DeviceAction::Redirect(direction.turn_right())
                } else {
                    DeviceAction::Redirect(direction.turn_left())
                }
            }
            Device::Mirror { kind, armed } => {
                if !*armed {
                    return DeviceAction::Pass;
                }
                *armed = false;
                let out = match kind {
                    MirrorKind::Forward => match direction {
                        Direction::North => Direction::East,
                        Direction::East => Direction::North,
                        Direction::South => Direction::West,
                        Direction::West => Direction::South,
                    },
                    MirrorKind::Backward => match direction {
                        Direction::North => Direction::West,
                        Direction::West => Direction::North,
                        Direction::South => Direction::East,
                        Direction::East => Direction::South,
                    },
                };
                DeviceAction::Redirect(out)
            }
            Device::Splitter => DeviceAction::Split,
            Device::Demux { latch } => match *latch {
                None => {
                    *latch = Some(value);
                    DeviceAction::Pass
                }
                Some(true) => DeviceAction::Redirect(Direction::East),
                Some(false) => DeviceAction::Redirect(Direction::West),
            },
            Device::Halt => DeviceAction::Halt,
            Device::Blank(_) => DeviceAction::Pass,
        }
    }

    /// Revert any fired/latched state, as part of the global reset.
    pub fn rearm(&mut self) {
        match self {
            Device::Mirror { armed, .. } => *armed = true,
            Device::Demux { latch } => *latch = None,
            _ => {}
        }
    }
}
