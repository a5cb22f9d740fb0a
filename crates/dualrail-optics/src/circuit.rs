//! The composed optical circuit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::{OpticsError, OpticsResult};
use crate::fock::FockState;
use crate::matrix::{ModeMatrix, embed, identity};
use crate::mode::{Mode, data_modes};
use crate::source::Source;

/// A component placed on a list of circuit modes.
///
/// Port `r` of the component is wired to mode `modes[r]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Circuit modes, one per component port.
    pub modes: Vec<Mode>,
    /// The placed component.
    pub component: Component,
}

/// An ancilla mode and the photon number injected into and expected out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Herald {
    /// Ancilla mode.
    pub mode: Mode,
    /// Photon number.
    pub photons: usize,
}

/// Requires exactly one photon in each listed mode pair at the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSelection {
    /// Mode pairs (dual-rail qubits) that must each hold one photon.
    pub pairs: Vec<(Mode, Mode)>,
}

impl PostSelection {
    /// Check the rule against an output state.
    pub fn accepts(&self, state: &FockState) -> bool {
        self.pairs
            .iter()
            .all(|&(even, odd)| state.get(even) + state.get(odd) == 1)
    }
}

/// A linear-optical circuit produced by one conversion.
///
/// Modes `0..2n` carry the `n` qubits; ancilla modes follow in allocation
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticalCircuit {
    num_qubits: usize,
    num_modes: usize,
    placements: Vec<Placement>,
    heralds: Vec<Herald>,
    postselections: Vec<PostSelection>,
    input_state: FockState,
    source: Source,
    backend_name: Option<String>,
}

impl OpticalCircuit {
    /// An empty circuit on the data modes of `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        let num_modes = data_modes(num_qubits);
        Self {
            num_qubits,
            num_modes,
            placements: vec![],
            heralds: vec![],
            postselections: vec![],
            input_state: FockState::vacuum(num_modes),
            source: Source::perfect(),
            backend_name: None,
        }
    }

    /// Append fresh ancilla modes after every mode allocated so far.
    pub fn allocate_ancillas(&mut self, photons: &[usize]) -> Vec<Mode> {
        let start = self.num_modes;
        self.num_modes += photons.len();
        photons
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let mode = start + i;
                self.heralds.push(Herald { mode, photons: n });
                mode
            })
            .collect()
    }

    /// Place a component on `modes`.
    pub fn place(&mut self, modes: Vec<Mode>, component: Component) -> OpticsResult<()> {
        if modes.len() != component.num_modes() {
            return Err(OpticsError::Configuration(format!(
                "component '{}' has {} ports but was placed on {} modes",
                component.label(),
                component.num_modes(),
                modes.len()
            )));
        }
        if let Some(&bad) = modes.iter().find(|&&m| m >= self.num_modes) {
            return Err(OpticsError::Configuration(format!(
                "component '{}' placed on mode {bad}, circuit has {} modes",
                component.label(),
                self.num_modes
            )));
        }
        self.placements.push(Placement { modes, component });
        Ok(())
    }

    /// Register a post-selection rule.
    pub fn add_postselection(&mut self, rule: PostSelection) {
        self.postselections.push(rule);
    }

    pub(crate) fn set_input_state(&mut self, state: FockState) {
        self.input_state = state;
    }

    pub(crate) fn set_source(&mut self, source: Source) {
        self.source = source;
    }

    pub(crate) fn set_backend_name(&mut self, name: Option<String>) {
        self.backend_name = name;
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total number of modes, ancillas included.
    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    /// Number of modes carrying qubits.
    pub fn num_data_modes(&self) -> usize {
        data_modes(self.num_qubits)
    }

    /// Placements in the order light meets them.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// Ancilla modes with their herald photon numbers.
    pub fn heralds(&self) -> &[Herald] {
        &self.heralds
    }

    /// Registered post-selection rules.
    pub fn postselections(&self) -> &[PostSelection] {
        &self.postselections
    }

    /// Photon occupation fed into the circuit.
    pub fn input_state(&self) -> &FockState {
        &self.input_state
    }

    /// Source descriptor forwarded to the backend.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Backend hint forwarded to the executor.
    pub fn backend_name(&self) -> Option<&str> {
        self.backend_name.as_deref()
    }

    /// Product of the nominal success probabilities of all gadgets.
    pub fn nominal_success_probability(&self) -> f64 {
        self.placements
            .iter()
            .filter_map(|p| match &p.component {
                Component::Gadget(g) => Some(g.success_probability),
                _ => None,
            })
            .product()
    }

    /// Check an output state against the heralds and post-selection rules.
    pub fn accepts(&self, state: &FockState) -> bool {
        self.heralds.iter().all(|h| state.get(h.mode) == h.photons)
            && self.postselections.iter().all(|rule| rule.accepts(state))
    }

    /// Single-photon transfer matrix of the whole circuit.
    pub fn unitary(&self) -> ModeMatrix {
        self.placements
            .iter()
            .fold(identity(self.num_modes), |acc, p| {
                embed(self.num_modes, &p.modes, &p.component.matrix()).dot(&acc)
            })
    }
}

impl fmt::Display for OpticalCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "OpticalCircuit: {} qubits, {} modes ({} data, {} ancilla)",
            self.num_qubits,
            self.num_modes,
            self.num_data_modes(),
            self.heralds.len()
        )?;
        writeln!(f, "  input: {}", self.input_state)?;
        for (i, p) in self.placements.iter().enumerate() {
            write!(f, "  [{i}] {:?} {}", p.modes, p.component.label())?;
            if let Component::OneQubit(gate) = &p.component {
                for element in gate.decompose().0 {
                    write!(f, " {element}")?;
                }
            }
            writeln!(f)?;
        }
        for h in &self.heralds {
            writeln!(f, "  herald: mode {} = {}", h.mode, h.photons)?;
        }
        for rule in &self.postselections {
            writeln!(f, "  post-select: one photon in each of {:?}", rule.pairs)?;
        }
        Ok(())
    }
}
