//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::{Deserialize, Serialize};

use dualrail_ir::GateInstruction;
use dualrail_optics::{
    Component, Herald, LinearOpticsConverter, OpticalCircuit, OpticalElement, PostSelection,
    Source,
};

use crate::config::Config;

/// Instruction file contents.
///
/// Either a bare JSON array of instructions or an object that also states
/// the qubit count.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProgramFile {
    Bare(Vec<GateInstruction>),
    Described {
        #[serde(default)]
        num_qubits: Option<usize>,
        instructions: Vec<GateInstruction>,
    },
}

/// A loaded instruction list.
#[derive(Debug, Clone)]
pub struct Program {
    pub num_qubits: Option<usize>,
    pub instructions: Vec<GateInstruction>,
}

/// Load an instruction list from a JSON file.
pub fn load_program(path: &Path) -> Result<Program> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    parse_program(&source).with_context(|| format!("Invalid instruction file: {}", path.display()))
}

/// Parse instruction-file JSON.
pub fn parse_program(source: &str) -> Result<Program> {
    let program = match serde_json::from_str(source)? {
        ProgramFile::Bare(instructions) => Program {
            num_qubits: None,
            instructions,
        },
        ProgramFile::Described {
            num_qubits,
            instructions,
        } => Program {
            num_qubits,
            instructions,
        },
    };
    Ok(program)
}

/// Build a converter for `program`.
///
/// The qubit count comes from the `--num-qubits` flag, then the instruction
/// file, then the configuration.
pub fn build_converter(
    config: &Config,
    program: &Program,
    num_qubits: Option<usize>,
    source: Option<Source>,
) -> Result<LinearOpticsConverter> {
    let mut converter_config = config.converter_config();
    if let Some(source) = source {
        converter_config = converter_config.with_source(source);
    }
    let mut converter = LinearOpticsConverter::new(converter_config)?;
    if let Some(n) = num_qubits.or(program.num_qubits) {
        converter.set_num_qubits(n)?;
    }
    Ok(converter)
}

/// Parse a bit string such as `"101"` (qubit 0 first).
pub fn parse_bits(bits: &str) -> Result<Vec<bool>> {
    bits.chars()
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => anyhow::bail!("Invalid input bit '{other}' in '{bits}'"),
        })
        .collect()
}

/// One placement in a [`CircuitReport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementReport {
    pub modes: Vec<usize>,
    pub component: String,
    /// Phase shifters and beam splitters of a one-qubit gate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<OpticalElement>,
}

/// Serializable summary of a converted circuit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircuitReport {
    pub num_qubits: usize,
    pub num_modes: usize,
    pub input_state: String,
    pub placements: Vec<PlacementReport>,
    pub heralds: Vec<Herald>,
    pub postselections: Vec<PostSelection>,
    pub nominal_success_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_name: Option<String>,
    pub source: Source,
}

impl CircuitReport {
    pub fn new(circuit: &OpticalCircuit) -> Self {
        Self {
            num_qubits: circuit.num_qubits(),
            num_modes: circuit.num_modes(),
            input_state: circuit.input_state().to_string(),
            placements: circuit
                .placements()
                .iter()
                .map(|p| PlacementReport {
                    modes: p.modes.clone(),
                    component: p.component.label(),
                    elements: match &p.component {
                        Component::OneQubit(gate) => gate.decompose().0,
                        _ => Vec::new(),
                    },
                })
                .collect(),
            heralds: circuit.heralds().to_vec(),
            postselections: circuit.postselections().to_vec(),
            nominal_success_probability: circuit.nominal_success_probability(),
            backend_name: circuit.backend_name().map(str::to_string),
            source: circuit.source().clone(),
        }
    }
}

/// Print sampled counts with percentage bars, most frequent first.
pub fn print_counts(counts: &BTreeMap<String, usize>, shots: usize) {
    let mut sorted: Vec<(&String, &usize)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));
    let total = shots.max(1) as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
