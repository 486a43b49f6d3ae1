//! The simulation engine: owns the playfield and orchestrates the
//! five-phase tick pipeline.
//!
//! # Architecture
//!
//! The `Engine` owns:
//! - A [`Grid`] of device cells (fixed shape for the program's lifetime)
//! - In-flight bits in a [`SlotMap`] arena plus an explicit flight-order list
//! - Registries of [`Collector`]s (grouped by name), [`Source`]s, [`Sink`]s
//! - A [`SimState`] (tick counter, accumulator) and [`SimulationStrategy`]
//!
//! # Five-Phase Tick
//!
//! Each `tick()` runs:
//! 1. **Motion** -- advance every in-flight bit one cell and resolve the
//!    device it lands on. A halt device ends the program mid-phase.
//! 2. **Activation** -- only when no bits were in flight: open the first
//!    collector name (alphabetical) with queued bits and fire the global
//!    latch reset, or halt if nothing is left to run.
//! 3. **Source emission** -- every open source releases one bit east.
//! 4. **Collector emission** -- every open collector releases one bit east;
//!    drained collectors close and leave the open set.
//! 5. **Bookkeeping** -- bump the tick counter, compute the state hash.
//!
//! Motion resolves completely before any emission, so the phases always see
//! the state the previous phase left behind.

use crate::bit::Bit;
use crate::collector::Collector;
use crate::device::DeviceAction;
use crate::grid::{Cell, Grid, LoadError, Loaded, ProgramSpec};
use crate::id::{BitId, CollectorId, SourceId};
use crate::query::{BitSnapshot, CellSnapshot, PlayfieldSnapshot, QUEUE_PREVIEW_LEN};
use crate::sim::{AdvanceResult, SimState, SimulationStrategy, StateHash, Ticks};
use crate::sink::Sink;
use crate::source::Source;
use slotmap::SlotMap;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The core simulation engine for one loaded program.
#[derive(Debug, Clone)]
pub struct Engine {
    /// The playfield. Shape is immutable; device latches mutate in place.
    pub(crate) grid: Grid,

    /// In-flight bit storage. Stable keys let consumers track a bit for
    /// its whole flight.
    pub(crate) bits: SlotMap<BitId, Bit>,

    /// Processing order of in-flight bits. Motion walks this in reverse,
    /// which is the reference order when several bits reach one collector
    /// in the same tick.
    pub(crate) flight: Vec<BitId>,

    /// Every physical collector cell, in grid reading order.
    pub(crate) collectors: Vec<Collector>,

    /// Collectors grouped by name; keys iterate in activation order.
    pub(crate) collectors_by_name: BTreeMap<char, Vec<CollectorId>>,

    /// Collectors currently releasing their queues.
    pub(crate) open_collectors: Vec<CollectorId>,

    /// Every source cell, in grid reading order.
    pub(crate) sources: Vec<Source>,

    /// Sources that still have data to emit.
    pub(crate) active_sources: Vec<SourceId>,

    /// Every sink cell, in creation order.
    pub(crate) sinks: Vec<Sink>,

    /// Simulation strategy (tick or delta).
    pub(crate) strategy: SimulationStrategy,

    /// Tick counter and delta accumulator.
    pub sim_state: SimState,

    /// Whether `advance()` is currently a no-op. Manual `tick()` ignores it.
    pub(crate) paused: bool,

    /// Terminal flag. Set once; sinks are flushed at the same moment.
    pub(crate) halted: bool,

    /// The most recently computed state hash.
    pub(crate) last_state_hash: u64,
}

impl Engine {
    /// Load a program and build an engine around it.
    pub fn load(spec: &ProgramSpec, strategy: SimulationStrategy) -> Result<Self, LoadError> {
        let Loaded {
            grid,
            collectors,
            collectors_by_name,
            sources,
            sinks,
            initial_bits,
        } = crate::grid::load(spec)?;

        let mut bits = SlotMap::with_key();
        let mut flight = Vec::with_capacity(initial_bits.len());
        for bit in initial_bits {
            flight.push(bits.insert(bit));
        }

        let active_sources = sources
            .iter()
            .enumerate()
            .filter(|(_, s)| s.open)
            .map(|(i, _)| SourceId(i as u32))
            .collect();

        Ok(Self {
            grid,
            bits,
            flight,
            collectors,
            collectors_by_name,
            open_collectors: Vec::new(),
            sources,
            active_sources,
            sinks,
            strategy,
            sim_state: SimState::default(),
            paused: false,
            halted: false,
            last_state_hash: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Advance
    // -----------------------------------------------------------------------

    /// Advance the simulation according to the configured strategy.
    ///
    /// - **Tick mode**: `dt` is ignored; exactly one tick runs.
    /// - **Delta mode**: `dt` is accumulated; as many fixed steps run as fit.
    ///
    /// No-op while paused or halted.
    pub fn advance(&mut self, dt: Ticks) -> AdvanceResult {
        if self.paused {
            return AdvanceResult::default();
        }
        let mut result = AdvanceResult::default();

        match self.strategy.clone() {
            SimulationStrategy::Tick => self.tick_counted(&mut result),
            SimulationStrategy::Delta { fixed_timestep } => {
                self.sim_state.accumulator += dt;
                let step_size = fixed_timestep.max(1);
                while self.sim_state.accumulator >= step_size {
                    self.sim_state.accumulator -= step_size;
                    self.tick_counted(&mut result);
                }
            }
        }

        result
    }

    /// Run a single tick (convenience for tick mode).
    pub fn step(&mut self) -> AdvanceResult {
        self.advance(0)
    }

    fn tick_counted(&mut self, result: &mut AdvanceResult) {
        if self.halted {
            return;
        }
        self.tick();
        result.ticks_run += 1;
    }

    // -----------------------------------------------------------------------
    // The tick pipeline
    // -----------------------------------------------------------------------

    /// Execute one tick. Works even while paused (manual stepping); does
    /// nothing once halted.
    pub fn tick(&mut self) {
        if self.halted {
            return;
        }

        // Phases 1/2 are mutually exclusive: collectors only open on ticks
        // that start with an empty playfield.
        if !self.flight.is_empty() {
            if self.phase_motion() {
                // A halt device fired; the rest of the tick is skipped.
                return;
            }
        } else {
            self.phase_activation();
            if self.halted {
                return;
            }
        }

        self.phase_source_emission();
        self.phase_collector_emission();
        self.phase_bookkeeping();
    }

    /// Phase 1: move every in-flight bit one cell and resolve its landing.
    /// Returns true if a halt device ended the program.
    ///
    /// Bits are processed in reverse flight order; bits spawned by splitters
    /// are appended behind the iteration window and first move next tick.
    fn phase_motion(&mut self) -> bool {
        let in_flight = self.flight.len();
        for i in (0..in_flight).rev() {
            let id = self.flight[i];
            let Some(&current) = self.bits.get(id) else {
                continue;
            };
            let mut bit = current;
            bit.advance();

            if !self.grid.in_bounds(bit.x, bit.y) {
                // Leaving the playfield is the normal way bits die.
                self.bits.remove(id);
                continue;
            }

            match self.grid.cell_mut(bit.x, bit.y) {
                Cell::Collector(cid) => {
                    let cid = *cid;
                    self.bits.remove(id);
                    self.collectors[cid.0 as usize].receive(bit);
                }
                Cell::Source(_) => {
                    // Sources absorb incoming bits.
                    self.bits.remove(id);
                }
                Cell::Sink(sid) => {
                    let sid = *sid;
                    self.bits.remove(id);
                    self.sinks[sid.0 as usize].receive(&bit);
                }
                Cell::Device(device) => match device.hit(bit.direction, bit.value) {
                    DeviceAction::Pass => {
                        if let Some(slot) = self.bits.get_mut(id) {
                            *slot = bit;
                        }
                    }
                    DeviceAction::Redirect(direction) => {
                        bit.direction = direction;
                        if let Some(slot) = self.bits.get_mut(id) {
                            *slot = bit;
                        }
                    }
                    DeviceAction::Split => {
                        let spawned =
                            Bit::new(bit.x, bit.y, bit.direction.turn_left(), !bit.value);
                        bit.direction = bit.direction.turn_right();
                        if let Some(slot) = self.bits.get_mut(id) {
                            *slot = bit;
                        }
                        let spawned_id = self.bits.insert(spawned);
                        self.flight.push(spawned_id);
                    }
                    DeviceAction::Halt => {
                        self.halt();
                        return true;
                    }
                },
            }
        }
        self.flight.retain(|id| self.bits.contains_key(*id));
        false
    }

    /// Phase 2: with the playfield empty, open the first collector name
    /// holding any queued bits (and fire the global reset), or halt if no
    /// collector can open and no source has data left.
    fn phase_activation(&mut self) {
        let mut next_name = None;
        for (&name, ids) in &self.collectors_by_name {
            if ids
                .iter()
                .any(|id| !self.collectors[id.0 as usize].queue.is_empty())
            {
                next_name = Some(name);
                break;
            }
        }

        match next_name {
            Some(name) => {
                // Every cell sharing the name opens, including empty ones.
                self.open_collectors = self.collectors_by_name[&name].clone();
                for id in &self.open_collectors {
                    self.collectors[id.0 as usize].open = true;
                }
                self.grid.reset_latches();
            }
            None if self.active_sources.is_empty() => self.halt(),
            None => {}
        }
    }

    /// Phase 3: every source with data releases one bit.
    fn phase_source_emission(&mut self) {
        for i in (0..self.active_sources.len()).rev() {
            let id = self.active_sources[i];
            if let Some(bit) = self.sources[id.0 as usize].emit() {
                let key = self.bits.insert(bit);
                self.flight.push(key);
                if !self.sources[id.0 as usize].open {
                    self.active_sources.remove(i);
                }
            }
        }
    }

    /// Phase 4: every open collector releases one bit; collectors found
    /// empty close and leave the open set.
    fn phase_collector_emission(&mut self) {
        for i in (0..self.open_collectors.len()).rev() {
            let id = self.open_collectors[i];
            match self.collectors[id.0 as usize].emit() {
                Some(bit) => {
                    let key = self.bits.insert(bit);
                    self.flight.push(key);
                }
                None => {
                    self.open_collectors.remove(i);
                }
            }
        }
    }

    /// Phase 5: tick counter and determinism hash.
    fn phase_bookkeeping(&mut self) {
        self.sim_state.tick += 1;
        self.last_state_hash = self.compute_state_hash();
    }

    // -----------------------------------------------------------------------
    // Halting
    // -----------------------------------------------------------------------

    /// Enter the terminal state. Idempotent; flushes every sink exactly once.
    pub fn halt(&mut self) {
        if self.halted {
            return;
        }
        self.halted = true;
        for sink in &mut self.sinks {
            sink.flush();
        }
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Pause the simulation. While paused, `advance()` is a no-op; manual
    /// `tick()` still works.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of bits currently in flight.
    pub fn bits_in_flight(&self) -> usize {
        self.flight.len()
    }

    /// In-flight bits in processing order.
    pub fn bits(&self) -> impl Iterator<Item = (BitId, &Bit)> {
        self.flight
            .iter()
            .filter_map(|&id| self.bits.get(id).map(|bit| (id, bit)))
    }

    pub fn collectors(&self) -> &[Collector] {
        &self.collectors
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn sinks(&self) -> &[Sink] {
        &self.sinks
    }

    /// The most recently computed state hash.
    pub fn state_hash(&self) -> u64 {
        self.last_state_hash
    }

    /// An owned, read-only view of the playfield for rendering: every cell's
    /// current glyph (with queue previews) plus all in-flight bits.
    pub fn snapshot(&self) -> PlayfieldSnapshot {
        let cells = self
            .grid
            .iter()
            .map(|(x, y, cell)| {
                let (glyph, queue) = match cell {
                    Cell::Device(device) => (device.glyph(), Vec::new()),
                    Cell::Collector(id) => {
                        let collector = &self.collectors[id.0 as usize];
                        (
                            collector.glyph(),
                            collector
                                .queue
                                .iter()
                                .take(QUEUE_PREVIEW_LEN)
                                .map(|b| b.value)
                                .collect(),
                        )
                    }
                    Cell::Source(id) => {
                        let source = &self.sources[id.0 as usize];
                        (
                            '?',
                            source.queue.iter().take(QUEUE_PREVIEW_LEN).copied().collect(),
                        )
                    }
                    Cell::Sink(_) => ('!', Vec::new()),
                };
                CellSnapshot { x, y, glyph, queue }
            })
            .collect();

        let bits = self
            .bits()
            .map(|(id, bit)| BitSnapshot {
                id,
                x: bit.x,
                y: bit.y,
                direction: bit.direction,
                value: bit.value,
            })
            .collect();

        PlayfieldSnapshot {
            tick: self.sim_state.tick,
            width: self.grid.width(),
            height: self.grid.height(),
            halted: self.halted,
            cells,
            bits,
        }
    }

    fn compute_state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        hash.write_u64(self.sim_state.tick);

        for (_, bit) in self.bits() {
            hash.write_i32(bit.x);
            hash.write_i32(bit.y);
            hash.write_u8(bit.direction as u8);
            hash.write_u8(bit.value as u8);
        }

        for (_, _, cell) in self.grid.iter() {
            if let Cell::Device(device) = cell {
                hash.write_i32(device.glyph() as i32);
            }
        }

        for collector in &self.collectors {
            hash.write_u8(collector.open as u8);
            hash.write_u64(collector.queue.len() as u64);
            for bit in &collector.queue {
                hash.write_u8(bit.value as u8);
            }
        }

        for source in &self.sources {
            hash.write_u64(source.queue.len() as u64);
        }

        for sink in &self.sinks {
            hash.write_u64(sink.tokens().len() as u64);
            for &token in sink.tokens() {
                hash.write_u64(token as u64);
            }
        }

        hash.finish()
    }
}
