//! Gate instructions: a gate name applied to one or more wires.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::qubit::QubitId;
use crate::unitary::Unitary2x2;

/// A single instruction of a gate-level circuit.
///
/// In JSON an instruction looks like
/// `{"name": "RZ", "wires": [0], "params": [0.5]}`. Complex matrix entries are
/// written as `[re, im]` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInstruction {
    /// Symbolic gate name, e.g. `Hadamard`, `cx`, `barrier`.
    pub name: String,
    /// Wires the gate acts on. For two-qubit gates wire 0 is the control.
    pub wires: Vec<QubitId>,
    /// Rotation angles, if the gate takes any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
    /// Explicit row-major unitary, used for single-qubit gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<Vec<Complex64>>,
}

impl GateInstruction {
    /// Create an instruction from a gate name and its wires.
    pub fn new(name: impl Into<String>, wires: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            name: name.into(),
            wires: wires.into_iter().collect(),
            params: vec![],
            matrix: None,
        }
    }

    /// Attach rotation parameters.
    #[must_use]
    pub fn with_params(mut self, params: impl IntoIterator<Item = f64>) -> Self {
        self.params = params.into_iter().collect();
        self
    }

    /// Attach an explicit row-major unitary.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Unitary2x2) -> Self {
        self.matrix = Some(matrix.data.to_vec());
        self
    }

    /// Hadamard on `q`.
    pub fn hadamard(q: QubitId) -> Self {
        Self::new("Hadamard", [q])
    }

    /// Pauli-X on `q`.
    pub fn pauli_x(q: QubitId) -> Self {
        Self::new("PauliX", [q])
    }

    /// S gate on `q`.
    pub fn s(q: QubitId) -> Self {
        Self::new("S", [q])
    }

    /// RX(theta) on `q`.
    pub fn rx(q: QubitId, theta: f64) -> Self {
        Self::new("RX", [q]).with_params([theta])
    }

    /// RZ(theta) on `q`.
    pub fn rz(q: QubitId, theta: f64) -> Self {
        Self::new("RZ", [q]).with_params([theta])
    }

    /// CNOT with `control` and `target`.
    pub fn cnot(control: QubitId, target: QubitId) -> Self {
        Self::new("CNOT", [control, target])
    }

    /// CZ on `a` and `b`.
    pub fn cz(a: QubitId, b: QubitId) -> Self {
        Self::new("CZ", [a, b])
    }

    /// SWAP of `a` and `b`.
    pub fn swap(a: QubitId, b: QubitId) -> Self {
        Self::new("SWAP", [a, b])
    }

    /// Barrier across `qubits`.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new("barrier", qubits)
    }

    /// Measurement of `q`.
    pub fn measure(q: QubitId) -> Self {
        Self::new("measure", [q])
    }

    /// Number of wires.
    #[inline]
    pub fn arity(&self) -> usize {
        self.wires.len()
    }

    /// Canonical gate name, if the name is recognised.
    pub fn canonical_name(&self) -> Option<&'static str> {
        StandardGate::canonical_name(&self.name)
    }

    /// Check if this is a CNOT, under any accepted spelling.
    pub fn is_cnot(&self) -> bool {
        self.canonical_name() == Some("cx")
    }

    /// Check if this is a barrier.
    pub fn is_barrier(&self) -> bool {
        self.name.eq_ignore_ascii_case("barrier")
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        self.name.eq_ignore_ascii_case("measure")
    }

    /// Resolve the 2x2 unitary of a single-qubit instruction.
    ///
    /// An explicit matrix takes precedence over the gate's symbolic
    /// definition.
    pub fn unitary(&self) -> IrResult<Unitary2x2> {
        if let Some(matrix) = &self.matrix {
            return Unitary2x2::from_row_major(&self.name, matrix);
        }
        StandardGate::from_name(&self.name, &self.params)?.unitary()
    }
}
