//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::engine::Engine;
use crate::grid::ProgramSpec;
use crate::io::IoFormat;
use crate::sim::SimulationStrategy;

/// Load a program with no inputs, raw format, tick strategy.
pub fn load(code: &str) -> Engine {
    load_with(code, &[], IoFormat::Raw)
}

/// Load a program with inputs and an explicit I/O format.
pub fn load_with(code: &str, inputs: &[&str], format: IoFormat) -> Engine {
    Engine::load(
        &ProgramSpec::from_code(code)
            .with_inputs(inputs)
            .with_format(format),
        SimulationStrategy::Tick,
    )
    .expect("program should load")
}

/// Tick until the engine halts, panicking if it runs past `max_ticks`.
/// Returns the number of ticks executed.
pub fn run_to_halt(engine: &mut Engine, max_ticks: u64) -> u64 {
    let mut ticks = 0;
    while !engine.is_halted() {
        assert!(
            ticks < max_ticks,
            "program still running after {max_ticks} ticks"
        );
        engine.tick();
        ticks += 1;
    }
    ticks
}

/// Load, run to halt, and return every sink's rendered output text.
pub fn run_program(code: &str, inputs: &[&str], format: IoFormat) -> Vec<String> {
    let mut engine = load_with(code, inputs, format);
    run_to_halt(&mut engine, 100_000);
    sink_texts(&engine)
}

/// The decoded token stream of one sink.
pub fn sink_tokens(engine: &Engine, sink: usize) -> Vec<i64> {
    engine.sinks()[sink].tokens().to_vec()
}

/// Rendered output text of every sink, in creation order.
pub fn sink_texts(engine: &Engine) -> Vec<String> {
    engine.sinks().iter().map(|s| s.text()).collect()
}
