//! Versioned binary snapshots of a whole engine.
//!
//! Serialization goes through `bitcode` with a header carrying a magic
//! number and format version, validated before the payload is trusted.
//! A restored engine resumes exactly where the saved one stopped.

use crate::bit::Bit;
use crate::collector::Collector;
use crate::engine::Engine;
use crate::grid::Grid;
use crate::id::{BitId, CollectorId, SourceId};
use crate::sim::{SimState, SimulationStrategy};
use crate::sink::Sink;
use crate::source::Source;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::BTreeMap;

/// Magic number identifying an engine snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0xB17C_1C1E;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while encoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur while decoding a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("snapshot from version {0} (this build supports {FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Snapshot header
// ---------------------------------------------------------------------------

/// Header prepended to every snapshot, checked before decoding is trusted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
    /// Tick count at the time the snapshot was taken.
    pub tick: u64,
}

impl SnapshotHeader {
    pub fn new(tick: u64) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            tick,
        }
    }

    pub fn validate(&self) -> Result<(), DecodeError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(DecodeError::InvalidMagic(self.magic));
        }
        if self.version != FORMAT_VERSION {
            return Err(DecodeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Serializable engine state
// ---------------------------------------------------------------------------

/// The full engine state. Everything the engine owns is plain data, so the
/// snapshot is lossless.
#[derive(Debug, Serialize, Deserialize)]
struct EngineSnapshot {
    header: SnapshotHeader,
    grid: Grid,
    bits: SlotMap<BitId, Bit>,
    flight: Vec<BitId>,
    collectors: Vec<Collector>,
    collectors_by_name: BTreeMap<char, Vec<CollectorId>>,
    open_collectors: Vec<CollectorId>,
    sources: Vec<Source>,
    active_sources: Vec<SourceId>,
    sinks: Vec<Sink>,
    strategy: SimulationStrategy,
    sim_state: SimState,
    paused: bool,
    halted: bool,
    last_state_hash: u64,
}

/// Serialize an engine to versioned bytes.
pub fn save_engine(engine: &Engine) -> Result<Vec<u8>, EncodeError> {
    let snapshot = EngineSnapshot {
        header: SnapshotHeader::new(engine.sim_state.tick),
        grid: engine.grid.clone(),
        bits: engine.bits.clone(),
        flight: engine.flight.clone(),
        collectors: engine.collectors.clone(),
        collectors_by_name: engine.collectors_by_name.clone(),
        open_collectors: engine.open_collectors.clone(),
        sources: engine.sources.clone(),
        active_sources: engine.active_sources.clone(),
        sinks: engine.sinks.clone(),
        strategy: engine.strategy.clone(),
        sim_state: engine.sim_state.clone(),
        paused: engine.paused,
        halted: engine.halted,
        last_state_hash: engine.last_state_hash,
    };
    bitcode::serialize(&snapshot).map_err(|e| EncodeError::Encode(e.to_string()))
}

/// Restore an engine from snapshot bytes.
pub fn restore_engine(data: &[u8]) -> Result<Engine, DecodeError> {
    let snapshot: EngineSnapshot =
        bitcode::deserialize(data).map_err(|e| DecodeError::Decode(e.to_string()))?;
    snapshot.header.validate()?;

    Ok(Engine {
        grid: snapshot.grid,
        bits: snapshot.bits,
        flight: snapshot.flight,
        collectors: snapshot.collectors,
        collectors_by_name: snapshot.collectors_by_name,
        open_collectors: snapshot.open_collectors,
        sources: snapshot.sources,
        active_sources: snapshot.active_sources,
        sinks: snapshot.sinks,
        strategy: snapshot.strategy,
        sim_state: snapshot.sim_state,
        paused: snapshot.paused,
        halted: snapshot.halted,
        last_state_hash: snapshot.last_state_hash,
    })
}
