//! Error types for the optics crate.

use dualrail_ir::IrError;
use thiserror::Error;

/// Result type for conversion and simulation.
pub type OpticsResult<T> = Result<T, OpticsError>;

/// Errors raised while converting or simulating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpticsError {
    /// Conversion was requested before a qubit count was configured.
    #[error(
        "Number of qubits is not configured: build the converter with \
         ConverterConfig::with_num_qubits or call set_num_qubits before converting"
    )]
    MissingQubitCount,

    /// Invalid converter or source configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A gate wire lies outside the configured qubit range.
    #[error("Gate '{gate}' uses wire {wire}, but only {num_qubits} qubits are configured")]
    WireOutOfRange {
        /// Gate name.
        gate: String,
        /// Offending wire.
        wire: u32,
        /// Configured qubit count.
        num_qubits: usize,
    },

    /// The instruction cannot be expressed as a linear-optical component.
    #[error("Unsupported gate '{gate}': {reason}")]
    UnsupportedGate {
        /// Gate name.
        gate: String,
        /// Why the gate was rejected.
        reason: String,
    },

    /// The catalog has no gadget for a two-qubit gate.
    #[error("Catalog '{catalog}' has no gadget for gate '{gate}'")]
    MissingGadget {
        /// Gate name.
        gate: String,
        /// Catalog name.
        catalog: String,
    },

    /// A permutation vector is not a bijection.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    /// The gate could not be resolved to a unitary.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// A measured state could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The reference simulator refused or failed a run.
    #[error("Simulation error: {0}")]
    Simulation(String),
}

/// Errors raised while decoding Fock states into qubit values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A qubit's mode pair does not hold exactly one photon.
    #[error("Cannot decode {state}: qubit {qubit} has occupation ({even},{odd})")]
    Undecodable {
        /// The Fock state, formatted.
        state: String,
        /// Offending qubit.
        qubit: usize,
        /// Photons in the even (logical 0) mode.
        even: usize,
        /// Photons in the odd (logical 1) mode.
        odd: usize,
    },

    /// The state has fewer modes than the qubits require.
    #[error("Cannot decode {state}: {num_qubits} qubits need {needed} modes, state has {modes}")]
    ModeCount {
        /// The Fock state, formatted.
        state: String,
        /// Requested qubit count.
        num_qubits: usize,
        /// Modes required.
        needed: usize,
        /// Modes present.
        modes: usize,
    },

    /// Text could not be parsed as a Fock state.
    #[error("Invalid Fock state '{0}': expected a form like |1,0,0,1>")]
    InvalidFock(String),
}
