//! Catalogs of two-qubit gadgets.
//!
//! The standard catalog carries CNOT and CZ, each in a heralded and a
//! post-selected variant:
//!
//! | Gadget | Ancillas | Heralds | Success |
//! |--------|----------|---------|---------|
//! | Heralded CZ / CNOT | 2 | one photon each | 2/27 |
//! | Post-selected CZ / CNOT | 2 | vacuum | 1/9 |
//!
//! The heralded CZ is Knill's construction acting on the `|1⟩` rails of both
//! qubits together with two single-photon ancillas. The post-selected CZ uses
//! three 1/3 beam splitters, two of them coupling the `|0⟩` rails to vacuum
//! ancillas. CNOT variants add Hadamards on the target rails.

use std::fmt::Debug;

use ndarray::array;
use num_complex::Complex64;
use rustc_hash::FxHashMap;

use crate::component::{Gadget, GadgetKind, compose_on_ports};
use crate::matrix::{ModeMatrix, embed};

/// Where a gadget lookup sits among the circuit's CNOTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GadgetUsage {
    /// 1-based index of this CNOT, or 0 for gates that are not CNOTs.
    pub occurrence: usize,
    /// Number of CNOTs in the circuit.
    pub total: usize,
}

/// A source of two-qubit gadgets, keyed by canonical gate name.
pub trait Catalog: Debug + Send + Sync {
    /// Catalog name.
    fn name(&self) -> &str;

    /// Gadget implementing `gate` in the requested variant.
    fn gadget(&self, gate: &str, kind: GadgetKind) -> Option<Gadget>;

    /// Canonical names of the gates this catalog covers.
    fn gates(&self) -> Vec<String>;

    /// Pick the variant for one occurrence of `gate`.
    ///
    /// By default only the last CNOT is post-selected, and only when
    /// post-selection is enabled. Every other gadget is heralded.
    ///
    /// The post-selection check runs on the final output. Gadgets placed
    /// after the post-selected CNOT (CZs, which carry occurrence 0) can turn
    /// its failure events into states with one photon per pair, so those
    /// pass the check and show up as wrong bit strings. Circuits that need a
    /// clean result should end their two-qubit gates with the CNOT, or
    /// override this method.
    fn select_kind(&self, gate: &str, usage: GadgetUsage, use_postselection: bool) -> GadgetKind {
        let _ = gate;
        if use_postselection && usage.occurrence > 0 && usage.occurrence == usage.total {
            GadgetKind::PostSelected
        } else {
            GadgetKind::Heralded
        }
    }
}

/// Built-in catalog with heralded and post-selected CNOT and CZ.
#[derive(Debug, Clone)]
pub struct StandardCatalog {
    gadgets: FxHashMap<(String, GadgetKind), Gadget>,
}

impl StandardCatalog {
    /// Build the catalog.
    pub fn new() -> Self {
        let gadgets = [
            heralded_cz(),
            heralded_cnot(),
            postselected_cz(),
            postselected_cnot(),
        ]
        .into_iter()
        .map(|g| ((g.gate.clone(), g.kind), g))
        .collect();
        Self { gadgets }
    }
}

impl Default for StandardCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for StandardCatalog {
    fn name(&self) -> &str {
        "standard"
    }

    fn gadget(&self, gate: &str, kind: GadgetKind) -> Option<Gadget> {
        self.gadgets.get(&(gate.to_string(), kind)).cloned()
    }

    fn gates(&self) -> Vec<String> {
        let mut gates: Vec<String> = self.gadgets.keys().map(|(g, _)| g.clone()).collect();
        gates.sort();
        gates.dedup();
        gates
    }
}

const C0: usize = 0;
const C1: usize = 1;
const T0: usize = 2;
const T1: usize = 3;
const A0: usize = 4;
const A1: usize = 5;
const NUM_PORTS: usize = 6;

fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn hadamard() -> ModeMatrix {
    let s = std::f64::consts::FRAC_1_SQRT_2;
    array![[re(s), re(s)], [re(s), re(-s)]]
}

/// Beam splitter with reflectivity `eta` on an ordered port pair. The second
/// port picks up the sign flip.
fn beam_splitter(eta: f64) -> ModeMatrix {
    let r = eta.sqrt();
    let t = (1.0 - eta).sqrt();
    array![[re(r), re(t)], [re(t), re(-r)]]
}

/// Knill's four-mode network on `[c1, t1, a0, a1]`, rows are output modes.
fn knill_core() -> ModeMatrix {
    let s2 = 2.0_f64.sqrt();
    let s6 = 6.0_f64.sqrt();
    let p = (3.0 + s6).sqrt();
    let m = (3.0 - s6).sqrt();
    let q = ((3.0 + s6) / 2.0).sqrt();
    let w = (1.0 / 6.0 - 1.0 / (3.0 * s6)).sqrt();
    array![
        [re(-1.0 / 3.0), re(-s2 / 3.0), re(s2 / 3.0), re(2.0 / 3.0)],
        [re(s2 / 3.0), re(-1.0 / 3.0), re(-2.0 / 3.0), re(s2 / 3.0)],
        [re(-p / 3.0), re(m / 3.0), re(-q / 3.0), re(w)],
        [re(-m / 3.0), re(-p / 3.0), re(-w), re(-q / 3.0)]
    ]
}

fn with_target_hadamards(core: &ModeMatrix) -> ModeMatrix {
    let h = embed(NUM_PORTS, &[T0, T1], &hadamard());
    h.dot(core).dot(&h)
}

fn heralded_cz_matrix() -> ModeMatrix {
    embed(NUM_PORTS, &[C1, T1, A0, A1], &knill_core())
}

fn postselected_cz_matrix() -> ModeMatrix {
    let third = beam_splitter(1.0 / 3.0);
    compose_on_ports(
        NUM_PORTS,
        &[
            ([C1, T1], third.clone()),
            ([C0, A0], third.clone()),
            ([A1, T0], third),
        ],
    )
}

/// Heralded CZ: one photon in and out of each ancilla.
pub fn heralded_cz() -> Gadget {
    Gadget {
        name: "Heralded CZ".to_string(),
        gate: "cz".to_string(),
        kind: GadgetKind::Heralded,
        matrix: heralded_cz_matrix(),
        heralds: vec![1, 1],
        success_probability: 2.0 / 27.0,
    }
}

/// Heralded CNOT: the heralded CZ between Hadamards on the target.
pub fn heralded_cnot() -> Gadget {
    Gadget {
        name: "Heralded CNOT".to_string(),
        gate: "cx".to_string(),
        kind: GadgetKind::Heralded,
        matrix: with_target_hadamards(&heralded_cz_matrix()),
        heralds: vec![1, 1],
        success_probability: 2.0 / 27.0,
    }
}

/// Post-selected CZ with two vacuum ancillas.
pub fn postselected_cz() -> Gadget {
    Gadget {
        name: "Post-selected CZ".to_string(),
        gate: "cz".to_string(),
        kind: GadgetKind::PostSelected,
        matrix: postselected_cz_matrix(),
        heralds: vec![0, 0],
        success_probability: 1.0 / 9.0,
    }
}

/// Post-selected CNOT: the post-selected CZ between Hadamards on the target.
pub fn postselected_cnot() -> Gadget {
    Gadget {
        name: "Post-selected CNOT".to_string(),
        gate: "cx".to_string(),
        kind: GadgetKind::PostSelected,
        matrix: with_target_hadamards(&postselected_cz_matrix()),
        heralds: vec![0, 0],
        success_probability: 1.0 / 9.0,
    }
}
