//! Dualrail Gate Intermediate Representation
//!
//! This crate provides the gate-level vocabulary consumed by the dualrail
//! linear-optics converter: qubit identifiers, the recognised standard gates
//! and the [`GateInstruction`] records that make up a circuit.
//!
//! # Overview
//!
//! A circuit is an ordered slice of [`GateInstruction`]s. Each instruction
//! carries a symbolic gate name, the wires it acts on and, optionally, rotation
//! parameters or an explicit unitary matrix. Gate names are resolved through
//! [`StandardGate::from_name`], which accepts both PennyLane-style names
//! (`Hadamard`, `PauliX`, `CNOT`) and OpenQASM-style names (`h`, `x`, `cx`).
//!
//! # Example: a Bell-pair preparation
//!
//! ```rust
//! use dualrail_ir::{GateInstruction, QubitId};
//!
//! let circuit = vec![
//!     GateInstruction::hadamard(QubitId(0)),
//!     GateInstruction::cnot(QubitId(0), QubitId(1)),
//! ];
//!
//! assert_eq!(circuit[0].arity(), 1);
//! assert!(circuit[1].is_cnot());
//!
//! let h = circuit[0].unitary().unwrap();
//! assert!((h * h).is_identity());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Accepted names |
//! |------|--------|----------------|
//! | Identity | 1 | `Identity`, `id`, `i` |
//! | Paulis | 1 | `PauliX`/`x`, `PauliY`/`y`, `PauliZ`/`z` |
//! | Hadamard | 1 | `Hadamard`, `h` |
//! | S, S† | 1 | `S`, `s`, `Adjoint(S)`, `sdg` |
//! | T, T† | 1 | `T`, `t`, `Adjoint(T)`, `tdg` |
//! | √X, √X† | 1 | `SX`, `sx`, `Adjoint(SX)`, `sxdg` |
//! | Rotations | 1 | `RX`/`rx`, `RY`/`ry`, `RZ`/`rz`, `PhaseShift`/`p` |
//! | U(θ,φ,λ) | 1 | `U3`, `u`, `u3` |
//! | CNOT | 2 | `CNOT`, `cx` |
//! | CZ | 2 | `CZ`, `cz` |
//! | SWAP | 2 | `SWAP`, `swap` |

pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod unitary;

pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::GateInstruction;
pub use qubit::QubitId;
pub use unitary::Unitary2x2;
