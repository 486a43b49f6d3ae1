//! Headless end-to-end runs of small BitCycle programs.
//!
//! Each test loads a complete program, runs it to halt, and checks the sink
//! output (and sometimes intermediate playfield state) against a hand-traced
//! execution.

use bitcycle_core::io::IoFormat;
use bitcycle_core::test_utils::*;

// ============================================================================
// Straight-line data flow
// ============================================================================

#[test]
fn passthrough_copies_raw_input() {
    let mut engine = load_with("?>!", &["101"], IoFormat::Raw);
    let ticks = run_to_halt(&mut engine, 100);
    assert_eq!(ticks, 6);
    assert_eq!(sink_texts(&engine), vec!["101"]);
}

#[test]
fn missing_input_lines_read_as_empty() {
    // No input supplied: the source starts closed and the program halts on
    // its first tick with an empty raw sink.
    let mut engine = load("?>!");
    run_to_halt(&mut engine, 100);
    assert_eq!(engine.sim_state.tick, 0);
    assert_eq!(sink_texts(&engine), vec![""]);
}

#[test]
fn expanded_program_gets_breathing_room() {
    use bitcycle_core::engine::Engine;
    use bitcycle_core::grid::ProgramSpec;
    use bitcycle_core::sim::SimulationStrategy;

    let spec = ProgramSpec::from_code("?>!")
        .with_inputs(&["1"])
        .expanded();
    let mut engine = Engine::load(&spec, SimulationStrategy::Tick).unwrap();

    // One blank row around each program row, one blank column around each
    // program column.
    assert_eq!(engine.grid().width(), 7);
    assert_eq!(engine.grid().height(), 3);

    run_to_halt(&mut engine, 100);
    assert_eq!(engine.sim_state.tick, 5);
    assert_eq!(sink_texts(&engine), vec!["1"]);
}

// ============================================================================
// Branching devices
// ============================================================================

#[test]
fn splitter_forks_bit_and_inverse() {
    // The kept bit turns right (south) into the lower sink; the spawned
    // inverse turns left (north) into the upper sink.
    let mut engine = load_with(" !\n?~\n !", &["10"], IoFormat::Raw);
    run_to_halt(&mut engine, 100);
    // Upper sink sees the inverses, lower sink the originals.
    assert_eq!(sink_texts(&engine), vec!["01", "10"]);
}

#[test]
fn gate_routes_by_bit_value() {
    // `+` sends 1-bits right (south) and 0-bits left (north).
    let mut engine = load_with(" !\n?+\n !", &["10"], IoFormat::Raw);
    run_to_halt(&mut engine, 100);
    assert_eq!(sink_texts(&engine), vec!["0", "1"]);
}

#[test]
fn demux_passes_first_bit_and_latches() {
    // First bit (0) latches `{` and passes through to the sink; later bits
    // are deflected west into the source, which absorbs them.
    let mut engine = load_with("?=!", &["011"], IoFormat::Raw);
    run_to_halt(&mut engine, 100);
    assert_eq!(sink_texts(&engine), vec!["0"]);
}

#[test]
fn demux_latched_open_passes_everything() {
    // A 1 first: the latch becomes `}` (east), so the whole stream flows on.
    let mut engine = load_with("?=!", &["111"], IoFormat::Raw);
    run_to_halt(&mut engine, 100);
    assert_eq!(sink_texts(&engine), vec!["111"]);
}

// ============================================================================
// Mirrors and the activation reset
// ============================================================================

#[test]
fn mirror_fires_once_then_rearms_on_activation() {
    // The first bit reflects south into collector A; the fired mirror lets
    // the second bit pass straight through and off the field. When A opens,
    // the global reset rearms the mirror.
    let mut engine = load_with("? \\\n  A!", &["11"], IoFormat::Raw);
    run_to_halt(&mut engine, 100);

    assert_eq!(engine.sim_state.tick, 8);
    assert_eq!(sink_texts(&engine), vec!["1"]);

    // The reset restored the `\` glyph before halt.
    assert_eq!(engine.snapshot().glyph_at(2, 0), '\\');
}

// ============================================================================
// Halt device
// ============================================================================

#[test]
fn halt_device_ends_tick_immediately() {
    // The bit reaches `@` on the second tick; the source still holds data,
    // but nothing else runs. The unsigned sink flushes its empty buffer to
    // a 0 token on halt.
    let mut engine = load_with("?@!", &["2"], IoFormat::Unsigned);
    run_to_halt(&mut engine, 100);

    assert!(engine.is_halted());
    assert_eq!(engine.sim_state.tick, 1);
    assert_eq!(sink_tokens(&engine, 0), vec![0]);
}

#[test]
fn blank_program_halts_immediately() {
    let mut engine = load("   ");
    let ticks = run_to_halt(&mut engine, 10);
    // The single tick call halts before bookkeeping runs.
    assert_eq!(ticks, 1);
    assert_eq!(engine.sim_state.tick, 0);
    assert!(engine.is_halted());
}
