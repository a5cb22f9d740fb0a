//! Optical components placed on modes of a circuit.

use std::fmt;

use dualrail_ir::Unitary2x2;
use serde::{Deserialize, Serialize};

use crate::matrix::{ModeMatrix, embed, identity};
use crate::permutation::Permutation;

const PHASE_EPSILON: f64 = 1e-10;

/// Elementary two-mode optical element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpticalElement {
    /// Phase shift `phi` on the second rail of the pair.
    PhaseShifter {
        /// Phase in radians.
        phi: f64,
    },
    /// Beam splitter `[[cos θ/2, -sin θ/2], [sin θ/2, cos θ/2]]`.
    BeamSplitter {
        /// Mixing angle in radians.
        theta: f64,
    },
}

impl OpticalElement {
    /// Transfer matrix on the two rails.
    pub fn matrix(&self) -> Unitary2x2 {
        match *self {
            OpticalElement::PhaseShifter { phi } => Unitary2x2::p(phi),
            OpticalElement::BeamSplitter { theta } => Unitary2x2::ry(theta),
        }
    }
}

impl fmt::Display for OpticalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpticalElement::PhaseShifter { phi } => write!(f, "PS(φ={phi:.6})"),
            OpticalElement::BeamSplitter { theta } => write!(f, "BS(θ={theta:.6})"),
        }
    }
}

/// Phase shifter on the second rail, or nothing for a vanishing phase.
fn phase_shifter(phi: f64) -> Option<OpticalElement> {
    let phi = Unitary2x2::normalize_angle(phi);
    (phi.abs() > PHASE_EPSILON).then_some(OpticalElement::PhaseShifter { phi })
}

/// A single-qubit gate acting on one dual-rail mode pair.
#[derive(Debug, Clone, PartialEq)]
pub struct OneQubitGate {
    /// Label, normally the source gate name.
    pub name: String,
    /// The gate's 2x2 unitary.
    pub unitary: Unitary2x2,
}

impl OneQubitGate {
    /// Create a gate from its label and unitary.
    pub fn new(name: impl Into<String>, unitary: Unitary2x2) -> Self {
        Self {
            name: name.into(),
            unitary,
        }
    }

    /// Decompose into phase shifters on the second rail and at most one beam
    /// splitter, in the order light meets them.
    ///
    /// Returns the elements and the global phase left over. Diagonal gates
    /// decompose into phase shifters only.
    pub fn decompose(&self) -> (Vec<OpticalElement>, f64) {
        let (alpha, beta, gamma, phase) = self.unitary.zyz_decomposition();
        let global_phase = Unitary2x2::normalize_angle(phase - (alpha + gamma) / 2.0);

        let elements = if beta.abs() < PHASE_EPSILON {
            phase_shifter(alpha + gamma).into_iter().collect()
        } else {
            phase_shifter(gamma)
                .into_iter()
                .chain(std::iter::once(OpticalElement::BeamSplitter { theta: beta }))
                .chain(phase_shifter(alpha))
                .collect()
        };
        (elements, global_phase)
    }

    /// Transfer matrix on the gate's two modes.
    pub fn matrix(&self) -> ModeMatrix {
        let d = self.unitary.data;
        ndarray::array![[d[0], d[1]], [d[2], d[3]]]
    }
}

/// Whether a gadget succeeds on a herald pattern or needs output post-selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GadgetKind {
    /// Success is flagged by the ancilla detection pattern alone.
    Heralded,
    /// Success also requires one photon in each data pair at the output.
    PostSelected,
}

impl fmt::Display for GadgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GadgetKind::Heralded => write!(f, "heralded"),
            GadgetKind::PostSelected => write!(f, "post-selected"),
        }
    }
}

/// A multi-mode two-qubit gate implementation.
///
/// Ports are ordered `[c0, c1, t0, t1, ancilla...]`: the control pair, the
/// target pair, then one port per ancilla mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Gadget {
    /// Display name, e.g. `Heralded CNOT`.
    pub name: String,
    /// Canonical gate this gadget implements.
    pub gate: String,
    /// Heralded or post-selected.
    pub kind: GadgetKind,
    /// Transfer matrix over all ports.
    pub matrix: ModeMatrix,
    /// Photons injected into (and expected out of) each ancilla port.
    pub heralds: Vec<usize>,
    /// Probability that a valid input is transformed correctly.
    pub success_probability: f64,
}

impl Gadget {
    /// Total number of ports.
    pub fn num_modes(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of ancilla ports.
    pub fn num_ancillas(&self) -> usize {
        self.heralds.len()
    }

    /// Check whether the output data pairs must be post-selected.
    pub fn requires_postselection(&self) -> bool {
        self.kind == GadgetKind::PostSelected
    }
}

/// A component placed in an optical circuit.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// A single-qubit gate on one mode pair.
    OneQubit(OneQubitGate),
    /// A reordering of modes.
    Permutation(Permutation),
    /// A two-qubit gadget.
    Gadget(Gadget),
}

impl Component {
    /// Number of modes the component acts on.
    pub fn num_modes(&self) -> usize {
        match self {
            Component::OneQubit(_) => 2,
            Component::Permutation(p) => p.len(),
            Component::Gadget(g) => g.num_modes(),
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> String {
        match self {
            Component::OneQubit(g) => g.name.clone(),
            Component::Permutation(p) => format!("PERM{:?}", p.as_slice()),
            Component::Gadget(g) => g.name.clone(),
        }
    }

    /// Transfer matrix over the component's own modes.
    pub fn matrix(&self) -> ModeMatrix {
        match self {
            Component::OneQubit(g) => g.matrix(),
            Component::Permutation(p) => p.matrix(),
            Component::Gadget(g) => g.matrix.clone(),
        }
    }
}

/// Build a gadget matrix from a sequence of two-mode operations on its ports.
pub(crate) fn compose_on_ports(n: usize, steps: &[([usize; 2], ModeMatrix)]) -> ModeMatrix {
    steps.iter().fold(identity(n), |acc, (ports, local)| {
        embed(n, ports, local).dot(&acc)
    })
}
