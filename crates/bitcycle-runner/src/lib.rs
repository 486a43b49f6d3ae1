//! Wall-clock driver for the BitCycle engine.
//!
//! The engine itself has no notion of real time; this crate paces it. A
//! [`Runner`] repeatedly advances one *frame*: every `frames_per_tick`-th
//! frame executes a simulation tick, the frames in between exist only so a
//! renderer can interpolate bit motion. Speed changes are staged and applied
//! at the start of the next frame, never to a tick already in progress, and
//! pausing is idempotent.

use bitcycle_core::engine::Engine;
use bitcycle_core::query::PlayfieldSnapshot;
use std::io::Write;
use std::time::Duration;

pub const DEFAULT_TICKS_PER_SECOND: u32 = 10;
pub const DEFAULT_FRAMES_PER_TICK: u32 = 1;

// ---------------------------------------------------------------------------
// Speed
// ---------------------------------------------------------------------------

/// Pacing configuration: logical tick rate and render subdivision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Speed {
    /// Simulation ticks per wall-clock second.
    pub ticks_per_second: u32,
    /// Frames rendered per tick; 1 disables interpolation frames.
    pub frames_per_tick: u32,
}

impl Speed {
    /// Replace zero fields with the defaults, keeping the rest.
    pub fn normalized(self) -> Speed {
        Speed {
            ticks_per_second: if self.ticks_per_second == 0 {
                DEFAULT_TICKS_PER_SECOND
            } else {
                self.ticks_per_second
            },
            frames_per_tick: if self.frames_per_tick == 0 {
                DEFAULT_FRAMES_PER_TICK
            } else {
                self.frames_per_tick
            },
        }
    }

    /// Wall-clock duration of one frame.
    pub fn frame_interval(self) -> Duration {
        let frames_per_second = self.ticks_per_second as f64 * self.frames_per_tick as f64;
        Duration::from_secs_f64(1.0 / frames_per_second)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Speed {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            frames_per_tick: DEFAULT_FRAMES_PER_TICK,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer seam
// ---------------------------------------------------------------------------

/// The rendering collaborator. Receives an owned snapshot every frame plus
/// the fraction (in `[0, 1)`) of the current tick the frame represents,
/// for interpolating bit positions.
pub trait Renderer {
    fn render(&mut self, snapshot: &PlayfieldSnapshot, fraction: f64);
}

/// Discards every frame. For headless runs.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &PlayfieldSnapshot, _fraction: f64) {}
}

/// Dumps the playfield as plain text, one frame per block.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, snapshot: &PlayfieldSnapshot, fraction: f64) {
        // Text output has no sub-cell positions; only whole ticks print.
        if fraction != 0.0 {
            return;
        }
        let _ = writeln!(self.out, "{}\n", snapshot.text());
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Paces an [`Engine`] against the wall clock and feeds a [`Renderer`].
pub struct Runner<R: Renderer> {
    engine: Engine,
    renderer: R,
    /// Speed in effect for the frame currently executing.
    speed: Speed,
    /// Staged speed, copied into `speed` at the start of the next frame.
    pending_speed: Speed,
    /// Frames completed within the current tick.
    frame: u32,
    running: bool,
}

impl<R: Renderer> Runner<R> {
    pub fn new(engine: Engine, renderer: R) -> Self {
        Self::with_speed(engine, renderer, Speed::default())
    }

    pub fn with_speed(engine: Engine, renderer: R, speed: Speed) -> Self {
        let speed = speed.normalized();
        Self {
            engine,
            renderer,
            speed,
            pending_speed: speed,
            frame: 0,
            running: false,
        }
    }

    /// Stage a new speed. Takes effect at the start of the next frame so an
    /// in-progress tick keeps the timing it started with.
    pub fn set_speed(&mut self, speed: Speed) {
        self.pending_speed = speed.normalized();
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }

    pub fn into_parts(self) -> (Engine, R) {
        (self.engine, self.renderer)
    }

    /// Stop the repeating loop. Safe to call any number of times.
    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance one frame. Every `frames_per_tick`-th frame runs a real tick;
    /// the others only re-render with an interpolation fraction.
    pub fn step_frame(&mut self) {
        self.speed = self.pending_speed;
        self.frame += 1;
        if self.frame >= self.speed.frames_per_tick {
            self.frame = 0;
            self.engine.tick();
            let snapshot = self.engine.snapshot();
            self.renderer.render(&snapshot, 0.0);
        } else {
            let snapshot = self.engine.snapshot();
            let fraction = self.frame as f64 / self.speed.frames_per_tick as f64;
            self.renderer.render(&snapshot, fraction);
        }
    }

    /// Manually advance one full tick. Cancels the repeating loop first so
    /// manual steps never interleave with paced ones.
    pub fn step_tick(&mut self) {
        self.pause();
        self.speed = self.pending_speed;
        self.frame = 0;
        self.engine.tick();
        let snapshot = self.engine.snapshot();
        self.renderer.render(&snapshot, 0.0);
    }

    /// Run frames until the engine halts (or `pause()` is observed after a
    /// frame). Sleeps between frames when `paced`; otherwise runs flat out.
    /// Returns the number of ticks executed by this call.
    pub fn run_to_halt(&mut self, paced: bool) -> u64 {
        self.running = true;
        let start_tick = self.engine.sim_state.tick;
        while self.running && !self.engine.is_halted() {
            self.step_frame();
            if paced && !self.engine.is_halted() {
                std::thread::sleep(self.speed.frame_interval());
            }
        }
        self.running = false;
        self.engine.sim_state.tick - start_tick
    }
}
