//! Simulation strategy, tick state, and the determinism hash.

use serde::{Deserialize, Serialize};

/// Tick counter type.
pub type Ticks = u64;

/// How the engine advances time. Chosen at engine construction.
///
/// Both strategies run the same five-phase tick; the strategy only controls
/// how many ticks one `advance()` call executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimulationStrategy {
    /// One tick per call. The driver paces calls against the wall clock.
    Tick,

    /// Accumulate elapsed ticks and run as many fixed steps as fit,
    /// carrying the remainder forward.
    Delta {
        /// Duration of one simulation step, in ticks.
        fixed_timestep: Ticks,
    },
}

/// Mutable time-keeping state tracked by the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimState {
    /// Current tick counter. Incremented once per executed tick.
    pub tick: Ticks,

    /// Accumulated remainder for delta mode. Unused in tick mode.
    pub accumulator: Ticks,
}

/// Result of an `Engine::advance()` call.
#[derive(Debug, Default)]
pub struct AdvanceResult {
    /// Number of ticks actually executed.
    pub ticks_run: u64,
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A deterministic FNV-1a hash of simulation state, for desync detection
/// between two runs of the same program. Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write(&[v]);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
