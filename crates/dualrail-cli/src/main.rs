//! Dualrail Command-Line Interface
//!
//! Converts gate-level circuits (JSON instruction lists) into dual-rail
//! linear-optical circuits, and runs them on the local reference simulator.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{catalog, convert, simulate, version};
use config::Config;

/// Dualrail - gate-to-linear-optics conversion for photonic processors
#[derive(Parser)]
#[command(name = "dualrail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "DUALRAIL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON document
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a circuit into a linear-optical circuit
    Convert {
        /// Input file (JSON instruction list)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of qubits (overrides the circuit file and configuration)
        #[arg(short = 'n', long)]
        num_qubits: Option<usize>,

        /// Post-select the last CNOT instead of heralding it
        #[arg(long)]
        postselect: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Convert a circuit and run it on the reference simulator
    Simulate {
        /// Input file (JSON instruction list)
        #[arg(short, long)]
        input: PathBuf,

        /// Number of qubits (overrides the circuit file and configuration)
        #[arg(short = 'n', long)]
        num_qubits: Option<usize>,

        /// Post-select the last CNOT instead of heralding it
        #[arg(long)]
        postselect: bool,

        /// Logical input state, qubit 0 first (e.g. "10")
        #[arg(long)]
        input_bits: Option<String>,

        /// Number of shots to sample
        #[arg(short, long, default_value = "1024")]
        shots: usize,

        /// Seed for shot sampling (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List the gadgets of the standard catalog
    Catalog,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Setup logging
    let filter = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            num_qubits,
            postselect,
            format,
        } => convert::execute(
            &config,
            &input,
            output.as_deref(),
            num_qubits,
            postselect,
            format,
        ),

        Commands::Simulate {
            input,
            num_qubits,
            postselect,
            input_bits,
            shots,
            seed,
            format,
        } => simulate::execute(
            &config,
            &input,
            num_qubits,
            postselect,
            input_bits.as_deref(),
            shots,
            seed,
            format,
        ),

        Commands::Catalog => {
            catalog::execute();
            Ok(())
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
