//! Simulate command implementation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use dualrail_optics::{DecodedDistribution, Simulator, decode_distribution, samples_from_counts};

use super::common::{build_converter, load_program, parse_bits, print_counts};
use crate::OutputFormat;
use crate::config::Config;

/// JSON output of the simulate command.
#[derive(Debug, Serialize)]
struct SimulationReport {
    num_qubits: usize,
    shots: usize,
    physical_performance: f64,
    #[serde(flatten)]
    decoded: DecodedDistribution,
    counts: BTreeMap<String, usize>,
    samples: Vec<Vec<u8>>,
    rejected_shots: usize,
}

/// Execute the simulate command.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    input: &Path,
    num_qubits: Option<usize>,
    postselect: bool,
    input_bits: Option<&str>,
    shots: usize,
    seed: Option<u64>,
    format: OutputFormat,
) -> Result<()> {
    let program = load_program(input)?;
    let source = input_bits
        .map(|bits| -> Result<_> {
            Ok(config.source.clone().with_logical_input(parse_bits(bits)?))
        })
        .transpose()?;
    let converter = build_converter(config, &program, num_qubits, source)?;
    let use_postselection = postselect || config.converter.use_postselection;

    let circuit = converter.convert(&program.instructions, use_postselection)?;
    let result = Simulator::new(config.simulator).run(&circuit)?;
    let decoded = decode_distribution(&result.distribution, circuit.num_qubits());

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let fock_counts = result.sample_counts(shots, &mut rng);
    let sample_set = samples_from_counts(&fock_counts, circuit.num_qubits());
    debug!(
        shots,
        rejected = sample_set.rejected_shots,
        "Sampled simulation outcomes"
    );

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for sample in &sample_set.samples {
        let bits: String = sample.iter().map(|b| if *b == 1 { '1' } else { '0' }).collect();
        *counts.entry(bits).or_insert(0) += 1;
    }

    if format == OutputFormat::Json {
        let report = SimulationReport {
            num_qubits: circuit.num_qubits(),
            shots,
            physical_performance: result.physical_performance,
            decoded,
            counts,
            samples: sample_set.samples,
            rejected_shots: sample_set.rejected_shots,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Simulated {} qubits on {} modes",
        style("→").cyan().bold(),
        circuit.num_qubits(),
        circuit.num_modes()
    );
    println!(
        "  Physical performance: {}",
        style(format!("{:.6}", result.physical_performance)).yellow()
    );
    if !circuit.source().is_perfect() {
        println!(
            "  {} the reference simulator treats the source as ideal",
            style("note:").dim()
        );
    }

    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        shots
    );
    print_counts(&counts, shots);

    if sample_set.rejected_shots > 0 {
        println!(
            "\n  Rejected shots: {}",
            style(sample_set.rejected_shots).red()
        );
    }
    if !decoded.rejected.is_empty() {
        println!(
            "  Leakage: {} ({} undecodable states)",
            style(format!("{:.3e}", decoded.leakage)).red(),
            decoded.rejected.len()
        );
    }

    Ok(())
}
