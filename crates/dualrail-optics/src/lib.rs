//! Dual-rail linear-optics conversion
//!
//! This crate turns gate-level circuits into linear-optical circuits for
//! photonic processors that encode each qubit in one photon shared between
//! two modes.
//!
//! # Architecture
//!
//! - **Mode layout**: qubit `q` lives on modes `2q` and `2q + 1`
//!   ([`modes_of`]). Ancilla modes introduced by gadgets are appended after
//!   the data modes in the order they are allocated.
//! - **Single-qubit gates** become a [`OneQubitGate`] on the qubit's mode
//!   pair. It decomposes into phase shifters and one beam splitter.
//! - **SWAP** is a single mode permutation.
//! - **CNOT / CZ** use a [`Gadget`] from a [`Catalog`]. When the target is not
//!   the qubit directly above the control, the blocks in between are rotated
//!   into place with a [`Permutation`] and rotated back afterwards.
//! - **Heralding**: heralded gadgets inject one photon per ancilla and succeed
//!   when those photons come out again. The post-selected CNOT needs vacuum
//!   ancillas and one photon per data pair at the output; only the last CNOT
//!   may use it.
//!
//! [`Simulator`] is a permanent-based reference backend for small circuits
//! and [`decode`] reads qubit values back from Fock outcomes.
//!
//! # Example
//!
//! ```rust
//! use dualrail_ir::{GateInstruction, QubitId};
//! use dualrail_optics::{ConverterConfig, LinearOpticsConverter, Simulator, decode_distribution};
//!
//! let converter = LinearOpticsConverter::new(ConverterConfig::new().with_num_qubits(2))?;
//! let bell = [
//!     GateInstruction::hadamard(QubitId(0)),
//!     GateInstruction::cnot(QubitId(0), QubitId(1)),
//! ];
//! let circuit = converter.convert(&bell, true)?;
//! assert_eq!(circuit.input_state().to_string(), "|1,0,1,0,0,0⟩");
//!
//! let result = Simulator::default().run(&circuit)?;
//! let decoded = decode_distribution(&result.distribution, 2);
//! assert!((decoded.probabilities["00"] - 0.5).abs() < 1e-9);
//! assert!((decoded.probabilities["11"] - 0.5).abs() < 1e-9);
//! # Ok::<(), dualrail_optics::OpticsError>(())
//! ```

pub mod catalog;
pub mod circuit;
pub mod component;
pub mod converter;
pub mod decode;
pub mod error;
pub mod fock;
pub mod matrix;
pub mod mode;
pub mod permutation;
pub mod simulate;
pub mod source;

pub use catalog::{Catalog, GadgetUsage, StandardCatalog};
pub use circuit::{Herald, OpticalCircuit, Placement, PostSelection};
pub use component::{Component, Gadget, GadgetKind, OneQubitGate, OpticalElement};
pub use converter::{ConverterConfig, LinearOpticsConverter, MAX_QUBITS};
pub use decode::{
    DecodedDistribution, SampleSet, decode, decode_bitstring, decode_distribution,
    samples_from_counts,
};
pub use error::{DecodeError, OpticsError, OpticsResult};
pub use fock::FockState;
pub use mode::{Mode, mode_pair, modes_of};
pub use permutation::Permutation;
pub use simulate::{PHOTON_LIMIT, Simulation, Simulator, SimulatorConfig};
pub use source::Source;
