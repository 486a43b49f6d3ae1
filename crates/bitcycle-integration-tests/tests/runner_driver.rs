//! Driving the engine through the runner crate.

use bitcycle_core::io::IoFormat;
use bitcycle_core::test_utils::load_with;
use bitcycle_runner::{NullRenderer, Runner, Speed, TextRenderer};

#[test]
fn headless_run_reaches_halt_with_correct_output() {
    let engine = load_with("?AB!", &["10"], IoFormat::Raw);
    let mut runner = Runner::new(engine, NullRenderer);
    let ticks = runner.run_to_halt(false);

    let engine = runner.into_engine();
    assert!(engine.is_halted());
    assert_eq!(ticks, engine.sim_state.tick);
    assert_eq!(engine.sinks()[0].text(), "10");
}

#[test]
fn text_renderer_prints_one_playfield_per_tick() {
    let engine = load_with("?>!", &["1"], IoFormat::Raw);
    let mut runner = Runner::new(engine, TextRenderer::new(Vec::new()));
    runner.run_to_halt(false);

    let (engine, renderer) = runner.into_parts();
    let ticks = engine.sim_state.tick;
    let out = String::from_utf8(renderer.into_inner()).unwrap();
    // One frame per completed tick, plus the frame of the halting tick.
    let frames = out.split("\n\n").filter(|f| !f.trim().is_empty()).count();
    assert_eq!(frames as u64, ticks + 1);
    // The device row is present in every frame.
    assert!(out.contains('>'));
}

#[test]
fn interpolation_frames_slow_the_tick_rate() {
    let engine = load_with("?>!", &["1"], IoFormat::Raw);
    let mut runner = Runner::with_speed(
        engine,
        NullRenderer,
        Speed {
            ticks_per_second: 1000,
            frames_per_tick: 3,
        },
    );
    for _ in 0..9 {
        runner.step_frame();
    }
    assert_eq!(runner.engine().sim_state.tick, 3);
}

#[test]
fn staged_speed_change_survives_a_manual_step() {
    let engine = load_with("?AB!", &["10"], IoFormat::Raw);
    let mut runner = Runner::new(engine, NullRenderer);
    runner.set_speed(Speed {
        ticks_per_second: 60,
        frames_per_tick: 2,
    });
    runner.step_tick();
    assert_eq!(runner.speed().ticks_per_second, 60);
    assert_eq!(runner.speed().frames_per_tick, 2);
}
