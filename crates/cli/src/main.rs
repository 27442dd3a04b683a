//! Logic-chip exerciser CLI.
//!
//! This binary runs one chip family's stimulus script against the fixture. It performs:
//! 1. **Configuration:** Loads an optional JSON config and applies command-line overrides.
//! 2. **Transport:** Opens the fixture's serial port, or seats a behavioural model in a
//!    simulated fixture with `--simulate`.
//! 3. **Exercise:** Runs the SRAM, ICM7170 or Z80 PIO script and prints the verdict.
//!
//! Exit status is 0 when the chip passed, 1 when any check failed, and 2 when the run
//! could not be completed.

use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use chipex_core::common::ExerciseError;
use chipex_core::config::{Config, ExerciseConfig};
use chipex_core::devices::{Icm7170, SramModel, Z80Pio};
use chipex_core::fixture::{SerialFixture, SimFixture, Transport};
use chipex_core::profile::SramSize;
use chipex_core::vector::FrameOrder;
use chipex_core::{Verdict, exercise_pio, exercise_rtc, exercise_sram};

#[derive(Parser, Debug)]
#[command(
    name = "chipex",
    author,
    version,
    about = "Exercise a logic chip seated in the test fixture",
    long_about = "Drive the serial test fixture through a chip family's stimulus script and report pass or fail.\n\nExamples:\n  chipex sram --size 32 --sizing\n  chipex --port /dev/ttyACM1 rtc\n  chipex --simulate pio"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Serial device of the fixture (overrides the config file).
    #[arg(long, global = true)]
    port: Option<String>,

    /// Link speed in baud (overrides the config file).
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log every vector exchanged with the fixture.
    #[arg(short, long, global = true)]
    debug: bool,

    /// Run against a simulated chip instead of the fixture.
    #[arg(long, global = true)]
    simulate: bool,

    /// Input frames list line I0 first (older firmware).
    #[arg(long, global = true)]
    lsb_first: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Exercise a byte-wide SRAM.
    Sram {
        /// Capacity in kilobytes (8, 32, 128, 256 or 512).
        #[arg(short, long)]
        size: SramSize,

        /// Re-read every address after each pattern without rewriting.
        #[arg(long)]
        retention: bool,

        /// Probe for address aliasing before the sweep.
        #[arg(long)]
        sizing: bool,

        /// Skip the write/disable/read sweep.
        #[arg(long)]
        no_read_write: bool,
    },

    /// Exercise an ICM7170 real-time clock.
    Rtc,

    /// Exercise a Z80 PIO.
    Pio,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let code = match execute(&cli) {
        Ok(verdict) if verdict.passed() => {
            println!("PASS ({} checks)", verdict.checks());
            0
        }
        Ok(verdict) => {
            for failure in verdict.failures() {
                println!("Test failed: {failure}");
            }
            println!(
                "FAIL ({} of {} checks failed)",
                verdict.failure_count(),
                verdict.checks()
            );
            1
        }
        Err(e) => {
            error!("{e}");
            eprintln!("[!] {e}");
            2
        }
    };
    process::exit(code);
}

/// Installs the log subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let fallback = if debug { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the configuration, opens the transport and runs the selected script.
fn execute(cli: &Cli) -> Result<Verdict, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(port) = &cli.port {
        config.fixture.port.clone_from(port);
    }
    if let Some(baud) = cli.baud {
        config.fixture.baud_rate = baud;
    }
    config.fixture.trace_vectors |= cli.debug;
    if cli.lsb_first {
        config.fixture.frame_order = FrameOrder::LsbFirst;
    }
    if let Commands::Sram {
        retention,
        sizing,
        no_read_write,
        ..
    } = cli.command
    {
        config.exercise.retention |= retention;
        config.exercise.sizing |= sizing;
        config.exercise.read_write &= !no_read_write;
    }

    let mut transport: Box<dyn Transport> = if cli.simulate {
        simulated(&cli.command, config.fixture.frame_order)?
    } else {
        let port = serialport::new(&config.fixture.port, config.fixture.baud_rate)
            .timeout(Duration::from_millis(config.fixture.read_timeout_ms))
            .open()?;
        Box::new(
            SerialFixture::new(port)
                .with_vector_trace(config.fixture.trace_vectors)
                .with_frame_order(config.fixture.frame_order),
        )
    };

    Ok(exercise(transport.as_mut(), &cli.command, &config.exercise)?)
}

/// Seats the model matching `command` in a simulated fixture speaking `order`.
fn simulated(
    command: &Commands,
    order: FrameOrder,
) -> Result<Box<dyn Transport>, Box<dyn Error>> {
    Ok(match *command {
        Commands::Sram { size, .. } => {
            Box::new(SimFixture::new(SramModel::new(size)?).with_frame_order(order))
        }
        Commands::Rtc => Box::new(SimFixture::new(Icm7170::new()?).with_frame_order(order)),
        Commands::Pio => Box::new(SimFixture::new(Z80Pio::new()?).with_frame_order(order)),
    })
}

fn exercise(
    transport: &mut dyn Transport,
    command: &Commands,
    config: &ExerciseConfig,
) -> Result<Verdict, ExerciseError> {
    match *command {
        Commands::Sram { size, .. } => exercise_sram(transport, size, config),
        Commands::Rtc => exercise_rtc(transport, config),
        Commands::Pio => exercise_pio(transport, config),
    }
}
