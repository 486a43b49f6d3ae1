//! BitCycle Core -- the simulation engine for the BitCycle esoteric
//! language family.
//!
//! This crate implements the deterministic, tick-driven playfield: bits
//! traveling across a 2D grid of devices (routers, mirrors, gates,
//! splitters, demultiplexers), collectors batching them up, sources feeding
//! encoded input in, and sinks decoding output back out.
//!
//! # Five-Phase Tick Pipeline
//!
//! Each call to [`engine::Engine::tick`] advances the simulation by one tick
//! through the following phases:
//!
//! 1. **Motion** -- Every in-flight bit moves one cell and interacts with
//!    the device it lands on.
//! 2. **Activation** -- With the playfield empty, the first collector name
//!    (alphabetical) holding bits opens, firing the global latch reset.
//! 3. **Source emission** -- Every open source releases one bit eastward.
//! 4. **Collector emission** -- Every open collector releases one bit
//!    eastward; drained collectors close.
//! 5. **Bookkeeping** -- Tick counter and deterministic state hash.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- Simulation engine and pipeline orchestrator.
//! - [`grid::Grid`] / [`grid::ProgramSpec`] -- Playfield and its loader.
//! - [`device::Device`] -- Closed sum of every stateless/latching device.
//! - [`collector::Collector`], [`source::Source`], [`sink::Sink`] -- The
//!   queue-holding cells.
//! - [`io::IoFormat`] -- Raw / unsigned-unary / signed-unary I/O encodings.
//! - [`query::PlayfieldSnapshot`] -- Owned per-tick view for renderers.
//! - [`serialize`] -- Versioned engine snapshots via bitcode.

pub mod bit;
pub mod collector;
#[cfg(feature = "data-loader")]
pub mod data_loader;
pub mod device;
pub mod direction;
pub mod engine;
pub mod grid;
pub mod id;
pub mod io;
pub mod query;
pub mod serialize;
pub mod sim;
pub mod sink;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
