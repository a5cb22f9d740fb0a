//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur when resolving gate instructions.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name is not one of the recognised standard gates.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Gate has no single-qubit unitary definition.
    #[error("Gate '{gate_name}' acts on {num_qubits} qubits and has no 2x2 unitary")]
    NotSingleQubit {
        /// Name of the gate.
        gate_name: String,
        /// Number of qubits the gate acts on.
        num_qubits: u32,
    },

    /// Gate received the wrong number of parameters.
    #[error("Gate '{gate_name}' requires {expected} parameters, got {got}")]
    ParameterCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of parameters.
        expected: usize,
        /// Actual number of parameters provided.
        got: usize,
    },

    /// Explicit matrix has the wrong number of elements.
    #[error("Matrix for gate '{gate_name}' has {got} elements, expected {expected}")]
    MatrixShape {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of elements.
        expected: usize,
        /// Actual number of elements.
        got: usize,
    },

    /// Qubit index does not fit a `QubitId`.
    #[error("Qubit index {0} exceeds the largest qubit id {max}", max = u32::MAX)]
    QubitOutOfRange(usize),

    /// Explicit matrix is not unitary.
    #[error("Matrix for gate '{0}' is not unitary")]
    NotUnitary(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
