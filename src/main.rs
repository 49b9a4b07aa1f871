//! Command-line interface for kraftwerk
//!
//! # Usage Examples
//!
//! ```bash
//! # List presets
//! kraftwerk list
//!
//! # Sample a preset with a fixed seed
//! kraftwerk sample flat-map-list --seed 42 --count 5
//!
//! # Trace each value, including unlabeled nodes
//! kraftwerk sample optional --seed 42 --count 2 --verbose-trace
//!
//! # Debug logging of seeds and worker splits
//! RUST_LOG=kraftwerk=debug kraftwerk sample ints --workers 4
//! ```

use clap::{Parser, Subcommand};
use kraftwerk::SampleOpts;

#[derive(Parser)]
#[command(name = "kraftwerk")]
#[command(about = "Sample, trace and replay deterministic random generators")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print values from a preset generator
    Sample {
        /// Preset name (see `kraftwerk list`)
        preset: String,

        #[command(flatten)]
        opts: SampleOpts,
    },
    /// List available presets
    List,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Sample { preset, opts } => kraftwerk::run_sample(&preset, &opts, &mut out),
        Commands::List => kraftwerk::write_preset_list(&mut out),
    }
}
