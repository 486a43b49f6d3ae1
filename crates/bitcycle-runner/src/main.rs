//! BitCycle command-line runner.
//!
//! Loads a program from a source file (or a JSON program bundle), runs it to
//! halt, and prints each sink's output. `--display` additionally renders the
//! playfield as text after every tick.

use bitcycle_core::engine::Engine;
use bitcycle_core::grid::{LoadError, ProgramSpec};
use bitcycle_core::io::IoFormat;
use bitcycle_core::sim::SimulationStrategy;
use bitcycle_runner::{NullRenderer, Renderer, Runner, Speed, TextRenderer};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bitcycle")]
#[command(about = "Run a BitCycle program")]
struct Cli {
    /// Path to the program source (or a JSON bundle with --json)
    program: PathBuf,

    /// Input value for the next '?' source; repeat for multiple sources
    #[arg(short, long = "input")]
    inputs: Vec<String>,

    /// I/O format: raw, unsigned, or signed
    #[arg(short, long, default_value = "raw")]
    format: String,

    /// Interleave blank rows and columns before running
    #[arg(short, long)]
    expand: bool,

    /// Simulation ticks per second while displaying
    #[arg(short = 's', long, default_value_t = bitcycle_runner::DEFAULT_TICKS_PER_SECOND)]
    ticks_per_second: u32,

    /// Render frames per tick while displaying
    #[arg(long, default_value_t = bitcycle_runner::DEFAULT_FRAMES_PER_TICK)]
    frames_per_tick: u32,

    /// Render the playfield after every tick, paced to --ticks-per-second
    #[arg(short, long)]
    display: bool,

    /// Abort after this many ticks (0 = no limit)
    #[arg(long, default_value = "0")]
    max_ticks: u64,

    /// Treat the program file as a JSON bundle (code, inputs, format, ...)
    #[arg(long)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Input(#[from] bitcycle_core::io::InputError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Data(#[from] bitcycle_core::data_loader::DataLoadError),

    #[error("program did not halt within {0} ticks")]
    TickLimit(u64),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitcycle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&cli.program).map_err(|source| CliError::Io {
        path: cli.program.clone(),
        source,
    })?;

    let mut speed = Speed {
        ticks_per_second: cli.ticks_per_second,
        frames_per_tick: cli.frames_per_tick,
    };

    let inputs: Vec<&str> = cli.inputs.iter().map(String::as_str).collect();

    let spec = if cli.json {
        let data = bitcycle_core::data_loader::load_program_json(&text)?;
        if let Some(tps) = data.ticks_per_second {
            speed.ticks_per_second = tps;
        }
        if let Some(fpt) = data.frames_per_tick {
            speed.frames_per_tick = fpt;
        }
        let mut spec = data.to_spec()?;
        // Command-line inputs override the bundle's.
        if !inputs.is_empty() {
            spec = spec.with_inputs(&inputs);
        }
        spec
    } else {
        let format = IoFormat::parse(&cli.format)?;
        let mut spec = ProgramSpec::from_code(&text)
            .with_inputs(&inputs)
            .with_format(format);
        if cli.expand {
            spec = spec.expanded();
        }
        spec
    };

    let engine = Engine::load(&spec, SimulationStrategy::Tick)?;
    info!(
        width = engine.grid().width(),
        height = engine.grid().height(),
        sinks = engine.sinks().len(),
        "program loaded"
    );

    let engine = if cli.display {
        run_engine(
            Runner::with_speed(engine, TextRenderer::new(std::io::stdout()), speed),
            cli.max_ticks,
            true,
        )?
    } else {
        run_engine(Runner::new(engine, NullRenderer), cli.max_ticks, false)?
    };

    info!(ticks = engine.sim_state.tick, "program halted");
    for (i, sink) in engine.sinks().iter().enumerate() {
        println!("Out{}: {}", i + 1, sink.text());
    }
    Ok(())
}

fn run_engine<R: Renderer>(
    mut runner: Runner<R>,
    max_ticks: u64,
    paced: bool,
) -> Result<Engine, CliError> {
    if max_ticks == 0 {
        runner.run_to_halt(paced);
    } else {
        while !runner.engine().is_halted() {
            if runner.engine().sim_state.tick >= max_ticks {
                return Err(CliError::TickLimit(max_ticks));
            }
            runner.step_tick();
            if paced {
                std::thread::sleep(runner.speed().frame_interval());
            }
        }
    }
    Ok(runner.into_engine())
}
