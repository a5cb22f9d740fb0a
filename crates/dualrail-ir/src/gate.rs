//! Standard gate vocabulary.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::unitary::Unitary2x2;

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// SWAP gate.
    Swap,
}

/// Canonical name and parameter count for every accepted spelling.
fn lookup(name: &str) -> Option<(&'static str, usize)> {
    let entry = match name {
        "Identity" | "id" | "i" | "I" => ("id", 0),
        "PauliX" | "x" | "X" => ("x", 0),
        "PauliY" | "y" | "Y" => ("y", 0),
        "PauliZ" | "z" | "Z" => ("z", 0),
        "Hadamard" | "h" | "H" => ("h", 0),
        "S" | "s" => ("s", 0),
        "Adjoint(S)" | "sdg" => ("sdg", 0),
        "T" | "t" => ("t", 0),
        "Adjoint(T)" | "tdg" => ("tdg", 0),
        "SX" | "sx" => ("sx", 0),
        "Adjoint(SX)" | "sxdg" => ("sxdg", 0),
        "RX" | "rx" => ("rx", 1),
        "RY" | "ry" => ("ry", 1),
        "RZ" | "rz" => ("rz", 1),
        "PhaseShift" | "p" | "phase" => ("p", 1),
        "U3" | "u" | "u3" => ("u", 3),
        "CNOT" | "cx" | "CX" => ("cx", 0),
        "CZ" | "cz" => ("cz", 0),
        "SWAP" | "swap" => ("swap", 0),
        _ => return None,
    };
    Some(entry)
}

impl StandardGate {
    /// Resolve a gate name (PennyLane or OpenQASM spelling) with its parameters.
    pub fn from_name(name: &str, params: &[f64]) -> IrResult<Self> {
        let (canonical, expected) =
            lookup(name).ok_or_else(|| IrError::UnknownGate(name.to_string()))?;
        if params.len() != expected {
            return Err(IrError::ParameterCountMismatch {
                gate_name: name.to_string(),
                expected,
                got: params.len(),
            });
        }
        let gate = match canonical {
            "id" => StandardGate::I,
            "x" => StandardGate::X,
            "y" => StandardGate::Y,
            "z" => StandardGate::Z,
            "h" => StandardGate::H,
            "s" => StandardGate::S,
            "sdg" => StandardGate::Sdg,
            "t" => StandardGate::T,
            "tdg" => StandardGate::Tdg,
            "sx" => StandardGate::SX,
            "sxdg" => StandardGate::SXdg,
            "rx" => StandardGate::Rx(params[0]),
            "ry" => StandardGate::Ry(params[0]),
            "rz" => StandardGate::Rz(params[0]),
            "p" => StandardGate::P(params[0]),
            "u" => StandardGate::U(params[0], params[1], params[2]),
            "cx" => StandardGate::CX,
            "cz" => StandardGate::CZ,
            _ => StandardGate::Swap,
        };
        Ok(gate)
    }

    /// Canonical (OpenQASM-style) name for any accepted spelling.
    pub fn canonical_name(name: &str) -> Option<&'static str> {
        lookup(name).map(|(canonical, _)| canonical)
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::Swap => "swap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => 2,
            _ => 1,
        }
    }

    /// The 2x2 unitary of a single-qubit gate.
    pub fn unitary(&self) -> IrResult<Unitary2x2> {
        let u = match *self {
            StandardGate::I => Unitary2x2::identity(),
            StandardGate::X => Unitary2x2::x(),
            StandardGate::Y => Unitary2x2::y(),
            StandardGate::Z => Unitary2x2::z(),
            StandardGate::H => Unitary2x2::h(),
            StandardGate::S => Unitary2x2::s(),
            StandardGate::Sdg => Unitary2x2::sdg(),
            StandardGate::T => Unitary2x2::t(),
            StandardGate::Tdg => Unitary2x2::tdg(),
            StandardGate::SX => Unitary2x2::sx(),
            StandardGate::SXdg => Unitary2x2::sxdg(),
            StandardGate::Rx(theta) => Unitary2x2::rx(theta),
            StandardGate::Ry(theta) => Unitary2x2::ry(theta),
            StandardGate::Rz(theta) => Unitary2x2::rz(theta),
            StandardGate::P(lambda) => Unitary2x2::p(lambda),
            StandardGate::U(theta, phi, lambda) => Unitary2x2::u(theta, phi, lambda),
            StandardGate::CX | StandardGate::CZ | StandardGate::Swap => {
                return Err(IrError::NotSingleQubit {
                    gate_name: self.name().to_string(),
                    num_qubits: self.num_qubits(),
                });
            }
        };
        Ok(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_same_gate() {
        assert_eq!(
            StandardGate::from_name("Hadamard", &[]).unwrap(),
            StandardGate::from_name("h", &[]).unwrap()
        );
        assert_eq!(StandardGate::from_name("CNOT", &[]).unwrap(), StandardGate::CX);
        assert_eq!(StandardGate::from_name("cx", &[]).unwrap(), StandardGate::CX);
        assert_eq!(StandardGate::canonical_name("Adjoint(T)"), Some("tdg"));
        assert_eq!(StandardGate::canonical_name("Toffoli"), None);
    }

    #[test]
    fn test_parameterized_gate() {
        let gate = StandardGate::from_name("RZ", &[0.5]).unwrap();
        assert_eq!(gate, StandardGate::Rz(0.5));
        assert_eq!(gate.name(), "rz");

        let err = StandardGate::from_name("RZ", &[]).unwrap_err();
        assert!(matches!(
            err,
            IrError::ParameterCountMismatch {
                expected: 1,
                got: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_gate() {
        let err = StandardGate::from_name("Toffoli", &[]).unwrap_err();
        assert!(matches!(err, IrError::UnknownGate(ref n) if n == "Toffoli"));
    }

    #[test]
    fn test_num_qubits() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::U(0.1, 0.2, 0.3).num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::Swap.num_qubits(), 2);
    }

    #[test]
    fn test_two_qubit_gate_has_no_2x2_unitary() {
        let err = StandardGate::CZ.unitary().unwrap_err();
        assert!(matches!(err, IrError::NotSingleQubit { num_qubits: 2, .. }));
    }
}
