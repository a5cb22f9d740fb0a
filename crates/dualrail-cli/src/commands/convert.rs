//! Convert command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use super::common::{CircuitReport, build_converter, load_program};
use crate::OutputFormat;
use crate::config::Config;

/// Execute the convert command.
pub fn execute(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    num_qubits: Option<usize>,
    postselect: bool,
    format: OutputFormat,
) -> Result<()> {
    let program = load_program(input)?;
    let converter = build_converter(config, &program, num_qubits, None)?;
    let use_postselection = postselect || config.converter.use_postselection;

    let circuit = converter.convert(&program.instructions, use_postselection)?;
    info!(
        placements = circuit.placements().len(),
        modes = circuit.num_modes(),
        "converted {}",
        input.display()
    );

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&CircuitReport::new(&circuit))?,
        OutputFormat::Text => circuit.to_string(),
    };

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            eprintln!(
                "{} Converted {} instructions into {} placements on {} modes",
                style("✓").green().bold(),
                program.instructions.len(),
                circuit.placements().len(),
                circuit.num_modes()
            );
            eprintln!("  Output: {}", style(path.display()).green());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
