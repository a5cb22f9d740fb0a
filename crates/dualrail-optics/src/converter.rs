//! Gate-to-linear-optics conversion.

use std::sync::Arc;

use dualrail_ir::{GateInstruction, QubitId};
use tracing::{debug, info, instrument};

use crate::catalog::{Catalog, GadgetUsage, StandardCatalog};
use crate::circuit::{OpticalCircuit, PostSelection};
use crate::component::{Component, Gadget, OneQubitGate};
use crate::error::{OpticsError, OpticsResult};
use crate::fock::FockState;
use crate::mode::{Mode, mode_pair, modes_of};
use crate::permutation::Permutation;
use crate::source::Source;

/// Largest qubit count a converter accepts.
pub const MAX_QUBITS: usize = 1 << 20;

/// Converter configuration.
///
/// ```rust
/// use dualrail_optics::{ConverterConfig, LinearOpticsConverter};
///
/// let converter = LinearOpticsConverter::new(
///     ConverterConfig::new().with_num_qubits(2).with_backend_name("sim:local"),
/// )?;
/// assert_eq!(converter.num_qubits(), Some(2));
/// # Ok::<(), dualrail_optics::OpticsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConverterConfig {
    /// Gadget catalog; the standard catalog when `None`.
    pub catalog: Option<Arc<dyn Catalog>>,
    /// Opaque backend hint copied onto every produced circuit.
    pub backend_name: Option<String>,
    /// Photon-source descriptor.
    pub source: Source,
    /// Number of qubits; may also be set later on the converter.
    pub num_qubits: Option<usize>,
}

impl ConverterConfig {
    /// Configuration with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom gadget catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Catalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Set the backend hint.
    #[must_use]
    pub fn with_backend_name(mut self, name: impl Into<String>) -> Self {
        self.backend_name = Some(name.into());
        self
    }

    /// Set the source descriptor.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = source;
        self
    }

    /// Set the qubit count.
    #[must_use]
    pub fn with_num_qubits(mut self, num_qubits: usize) -> Self {
        self.num_qubits = Some(num_qubits);
        self
    }
}

/// Converts gate-level circuits into dual-rail linear-optical circuits.
///
/// The converter holds configuration only. Each [`convert`](Self::convert)
/// call builds its own circuit, so one converter can serve many threads.
#[derive(Debug, Clone)]
pub struct LinearOpticsConverter {
    catalog: Arc<dyn Catalog>,
    backend_name: Option<String>,
    source: Source,
    num_qubits: Option<usize>,
}

impl LinearOpticsConverter {
    /// Create a converter, validating the configuration.
    pub fn new(config: ConverterConfig) -> OpticsResult<Self> {
        config.source.validate()?;
        if let Some(n) = config.num_qubits {
            check_num_qubits(n, &config.source)?;
        }
        Ok(Self {
            catalog: config
                .catalog
                .unwrap_or_else(|| Arc::new(StandardCatalog::new())),
            backend_name: config.backend_name,
            source: config.source,
            num_qubits: config.num_qubits,
        })
    }

    /// Set the qubit count after construction.
    pub fn set_num_qubits(&mut self, num_qubits: usize) -> OpticsResult<()> {
        check_num_qubits(num_qubits, &self.source)?;
        self.num_qubits = Some(num_qubits);
        Ok(())
    }

    /// Configured qubit count.
    pub fn num_qubits(&self) -> Option<usize> {
        self.num_qubits
    }

    /// The gadget catalog in use.
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// The source descriptor.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Convert `instructions` into an optical circuit.
    ///
    /// With `use_postselection` the last CNOT uses the post-selected gadget
    /// (as chosen by the catalog); all others are heralded.
    #[instrument(skip(self, instructions), fields(num_instructions = instructions.len()))]
    pub fn convert(
        &self,
        instructions: &[GateInstruction],
        use_postselection: bool,
    ) -> OpticsResult<OpticalCircuit> {
        let num_qubits = self.num_qubits.ok_or(OpticsError::MissingQubitCount)?;
        let total_cnots = instructions.iter().filter(|i| i.is_cnot()).count();
        let mut circuit = OpticalCircuit::new(num_qubits);
        let mut cnots_seen = 0;

        for inst in instructions {
            if inst.is_barrier() {
                continue;
            }
            if inst.is_measure() {
                return Err(unsupported(inst, "measurement is not a linear-optical operation"));
            }
            if inst.arity() == 0 || inst.arity() > 2 {
                return Err(unsupported(
                    inst,
                    &format!("acts on {} wires; only 1 or 2 are supported", inst.arity()),
                ));
            }
            if let Some(&wire) = inst.wires.iter().find(|w| w.index() >= num_qubits) {
                return Err(OpticsError::WireOutOfRange {
                    gate: inst.name.clone(),
                    wire: wire.0,
                    num_qubits,
                });
            }

            if inst.arity() == 1 {
                self.place_one_qubit(&mut circuit, inst)?;
                continue;
            }

            let (control, target) = (inst.wires[0], inst.wires[1]);
            if control == target {
                return Err(unsupported(inst, &format!("control and target are both {control}")));
            }
            if inst.canonical_name() == Some("swap") {
                place_swap(&mut circuit, control, target)?;
                continue;
            }

            let usage = if inst.is_cnot() {
                cnots_seen += 1;
                GadgetUsage {
                    occurrence: cnots_seen,
                    total: total_cnots,
                }
            } else {
                GadgetUsage {
                    occurrence: 0,
                    total: total_cnots,
                }
            };
            let gate = inst.canonical_name().unwrap_or(inst.name.as_str());
            let kind = self.catalog.select_kind(gate, usage, use_postselection);
            let gadget =
                self.catalog
                    .gadget(gate, kind)
                    .ok_or_else(|| OpticsError::MissingGadget {
                        gate: inst.name.clone(),
                        catalog: self.catalog.name().to_string(),
                    })?;
            place_gadget(&mut circuit, gadget, control, target)?;
        }

        circuit.set_input_state(self.input_state(&circuit));
        circuit.set_source(self.source.clone());
        circuit.set_backend_name(self.backend_name.clone());

        info!(
            placements = circuit.placements().len(),
            modes = circuit.num_modes(),
            cnots = total_cnots,
            "Conversion complete"
        );
        Ok(circuit)
    }

    fn place_one_qubit(
        &self,
        circuit: &mut OpticalCircuit,
        inst: &GateInstruction,
    ) -> OpticsResult<()> {
        let unitary = inst.unitary()?;
        let (even, odd) = modes_of(inst.wires[0]);
        debug!(gate = %inst.name, modes = ?[even, odd], "Placing one-qubit gate");
        circuit.place(
            vec![even, odd],
            Component::OneQubit(OneQubitGate::new(inst.name.clone(), unitary)),
        )
    }

    /// Dual-rail input for every qubit followed by the herald photons.
    fn input_state(&self, circuit: &OpticalCircuit) -> FockState {
        let data = (0..circuit.num_qubits()).flat_map(|q| {
            if self.source.logical_bit(q) {
                [0, 1]
            } else {
                [1, 0]
            }
        });
        let heralds = circuit.heralds().iter().map(|h| h.photons);
        FockState::new(data.chain(heralds).collect())
    }
}

fn check_num_qubits(num_qubits: usize, source: &Source) -> OpticsResult<()> {
    if num_qubits == 0 {
        return Err(OpticsError::Configuration(
            "number of qubits must be positive".to_string(),
        ));
    }
    if num_qubits > MAX_QUBITS {
        return Err(OpticsError::Configuration(format!(
            "{num_qubits} qubits exceed the limit of {MAX_QUBITS}"
        )));
    }
    if let Some(bits) = &source.logical_input {
        if bits.len() != num_qubits {
            return Err(OpticsError::Configuration(format!(
                "source prepares {} qubits but the converter has {num_qubits}",
                bits.len()
            )));
        }
    }
    Ok(())
}

fn unsupported(inst: &GateInstruction, reason: &str) -> OpticsError {
    OpticsError::UnsupportedGate {
        gate: inst.name.clone(),
        reason: reason.to_string(),
    }
}

/// Modes from the lower to the upper block of two qubits, inclusive.
fn span(a: QubitId, b: QubitId) -> (usize, Vec<Mode>) {
    let lo = a.index().min(b.index());
    let hi = a.index().max(b.index());
    (lo, (mode_pair(lo).0..=mode_pair(hi).1).collect())
}

fn place_swap(circuit: &mut OpticalCircuit, a: QubitId, b: QubitId) -> OpticsResult<()> {
    let (_, modes) = span(a, b);
    let blocks = modes.len() / 2;
    let perm = Permutation::block_swap(blocks, 0, blocks - 1);
    debug!(modes = ?modes, vector = ?perm.as_slice(), "Placing SWAP permutation");
    circuit.place(modes, Component::Permutation(perm))
}

fn place_gadget(
    circuit: &mut OpticalCircuit,
    gadget: Gadget,
    control: QubitId,
    target: QubitId,
) -> OpticsResult<()> {
    let ancillas = circuit.allocate_ancillas(&gadget.heralds);
    let postselect = gadget.requires_postselection();

    if target.index() == control.index() + 1 {
        let (c0, c1) = modes_of(control);
        let (t0, t1) = modes_of(target);
        let mut modes = vec![c0, c1, t0, t1];
        modes.extend(&ancillas);
        debug!(gadget = %gadget.name, modes = ?modes, "Placing gadget");
        circuit.place(modes, Component::Gadget(gadget))?;
    } else {
        let (lo, span_modes) = span(control, target);
        let rotation = Permutation::block_rotation(span_modes.len() / 2);
        let rotated = |q: QubitId| span_modes[0] + rotation.destination(2 * (q.index() - lo));
        let (rc, rt) = (rotated(control), rotated(target));
        let mut modes = vec![rc, rc + 1, rt, rt + 1];
        modes.extend(&ancillas);
        let inverse = rotation.inverse();

        debug!(
            gadget = %gadget.name,
            modes = ?modes,
            rotation = ?rotation.as_slice(),
            "Placing gadget between block rotations"
        );
        circuit.place(span_modes.clone(), Component::Permutation(rotation))?;
        circuit.place(modes, Component::Gadget(gadget))?;
        circuit.place(span_modes, Component::Permutation(inverse))?;
    }

    if postselect {
        circuit.add_postselection(PostSelection {
            pairs: vec![modes_of(control), modes_of(target)],
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::GadgetKind;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn converter(n: usize) -> LinearOpticsConverter {
        LinearOpticsConverter::new(ConverterConfig::new().with_num_qubits(n)).unwrap()
    }

    fn permutation_vectors(circuit: &OpticalCircuit) -> Vec<Vec<usize>> {
        circuit
            .placements()
            .iter()
            .filter_map(|p| match &p.component {
                Component::Permutation(perm) => Some(perm.as_slice().to_vec()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_single_qubit_gates_one_placement_each() {
        let circuit = converter(3)
            .convert(
                &[
                    GateInstruction::hadamard(q(0)),
                    GateInstruction::pauli_x(q(2)),
                    GateInstruction::rx(q(1), 0.3),
                ],
                false,
            )
            .unwrap();
        let modes: Vec<_> = circuit.placements().iter().map(|p| p.modes.clone()).collect();
        assert_eq!(modes, vec![vec![0, 1], vec![4, 5], vec![2, 3]]);
        assert_eq!(circuit.num_modes(), 6);
    }

    #[test]
    fn test_hadamard_single_qubit() {
        let circuit = converter(1)
            .convert(&[GateInstruction::hadamard(q(0))], false)
            .unwrap();
        assert_eq!(circuit.input_state(), &FockState::new(vec![1, 0]));
        assert_eq!(circuit.placements().len(), 1);
    }

    #[test]
    fn test_swap_is_one_permutation() {
        for inst in [
            GateInstruction::swap(q(0), q(1)),
            GateInstruction::swap(q(1), q(0)),
        ] {
            let circuit = converter(2).convert(&[inst], false).unwrap();
            assert_eq!(circuit.placements().len(), 1);
            assert_eq!(circuit.placements()[0].modes, vec![0, 1, 2, 3]);
            assert_eq!(permutation_vectors(&circuit), vec![vec![2, 3, 0, 1]]);
        }
    }

    #[test]
    fn test_heralded_bell() {
        let circuit = converter(2)
            .convert(
                &[
                    GateInstruction::hadamard(q(0)),
                    GateInstruction::cnot(q(0), q(1)),
                ],
                false,
            )
            .unwrap();
        assert_eq!(circuit.num_modes(), 6);
        assert_eq!(circuit.num_data_modes(), 4);
        assert_eq!(circuit.placements().len(), 2);
        assert_eq!(circuit.input_state().to_string(), "|1,0,1,0,1,1⟩");
        assert!(circuit.postselections().is_empty());
        assert_eq!(circuit.placements()[1].modes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_postselected_bell() {
        let circuit = converter(2)
            .convert(
                &[
                    GateInstruction::hadamard(q(0)),
                    GateInstruction::cnot(q(0), q(1)),
                ],
                true,
            )
            .unwrap();
        assert_eq!(circuit.input_state().to_string(), "|1,0,1,0,0,0⟩");
        assert_eq!(circuit.postselections().len(), 1);
        assert_eq!(circuit.postselections()[0].pairs, vec![(0, 1), (2, 3)]);
        match &circuit.placements()[1].component {
            Component::Gadget(g) => assert_eq!(g.kind, GadgetKind::PostSelected),
            other => panic!("expected gadget, got {}", other.label()),
        }
    }

    #[test]
    fn test_reversed_cnot_uses_two_permutations() {
        let circuit = converter(2)
            .convert(
                &[
                    GateInstruction::hadamard(q(0)),
                    GateInstruction::cnot(q(1), q(0)),
                ],
                false,
            )
            .unwrap();
        assert_eq!(circuit.placements().len(), 4);
        assert_eq!(
            permutation_vectors(&circuit),
            vec![vec![2, 3, 0, 1], vec![2, 3, 0, 1]]
        );
        assert_eq!(circuit.placements()[2].modes, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_distant_cnot_rotation() {
        let circuit = converter(3)
            .convert(
                &[
                    GateInstruction::hadamard(q(0)),
                    GateInstruction::cnot(q(0), q(2)),
                ],
                false,
            )
            .unwrap();
        assert_eq!(circuit.num_modes(), 8);
        assert_eq!(
            permutation_vectors(&circuit),
            vec![vec![4, 5, 0, 1, 2, 3], vec![2, 3, 4, 5, 0, 1]]
        );
        assert_eq!(circuit.placements()[1].modes, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(circuit.placements()[2].modes, vec![4, 5, 2, 3, 6, 7]);
    }

    #[test]
    fn test_only_last_cnot_is_postselected() {
        let circuit = converter(3)
            .convert(
                &[
                    GateInstruction::cnot(q(0), q(1)),
                    GateInstruction::cz(q(1), q(2)),
                    GateInstruction::cnot(q(1), q(2)),
                ],
                true,
            )
            .unwrap();
        let kinds: Vec<_> = circuit
            .placements()
            .iter()
            .filter_map(|p| match &p.component {
                Component::Gadget(g) => Some(g.kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                GadgetKind::Heralded,
                GadgetKind::Heralded,
                GadgetKind::PostSelected
            ]
        );
        assert_eq!(circuit.num_modes(), 12);
        assert_eq!(circuit.input_state().to_string(), "|1,0,1,0,1,0,1,1,1,1,0,0⟩");
    }

    #[test]
    fn test_gadgets_after_last_cnot_stay_heralded() {
        let circuit = converter(2)
            .convert(
                &[
                    GateInstruction::hadamard(q(0)),
                    GateInstruction::cnot(q(0), q(1)),
                    GateInstruction::cz(q(0), q(1)),
                ],
                true,
            )
            .unwrap();
        let kinds: Vec<_> = circuit
            .placements()
            .iter()
            .filter_map(|p| match &p.component {
                Component::Gadget(g) => Some(g.kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, vec![GadgetKind::PostSelected, GadgetKind::Heralded]);
        assert_eq!(circuit.postselections().len(), 1);
        assert_eq!(circuit.input_state().to_string(), "|1,0,1,0,0,0,1,1⟩");
    }

    #[test]
    fn test_idempotent() {
        let conv = converter(3);
        let program = [
            GateInstruction::hadamard(q(0)),
            GateInstruction::cnot(q(2), q(0)),
            GateInstruction::s(q(1)),
        ];
        let a = conv.convert(&program, true).unwrap();
        let b = conv.convert(&program, true).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_barrier_skipped_measure_rejected() {
        let conv = converter(2);
        let circuit = conv
            .convert(&[GateInstruction::barrier([q(0), q(1)])], false)
            .unwrap();
        assert!(circuit.placements().is_empty());

        let err = conv
            .convert(&[GateInstruction::measure(q(0))], false)
            .unwrap_err();
        assert!(matches!(err, OpticsError::UnsupportedGate { ref gate, .. } if gate == "measure"));
    }

    #[test]
    fn test_missing_qubit_count() {
        let conv = LinearOpticsConverter::new(ConverterConfig::new()).unwrap();
        let err = conv
            .convert(&[GateInstruction::hadamard(q(0))], false)
            .unwrap_err();
        assert!(matches!(err, OpticsError::MissingQubitCount));

        let mut conv = conv;
        conv.set_num_qubits(1).unwrap();
        assert!(conv.convert(&[GateInstruction::hadamard(q(0))], false).is_ok());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        let err = LinearOpticsConverter::new(ConverterConfig::new().with_num_qubits(0)).unwrap_err();
        assert!(matches!(err, OpticsError::Configuration(_)));
    }

    #[test]
    fn test_oversized_qubit_count_rejected() {
        let err = LinearOpticsConverter::new(ConverterConfig::new().with_num_qubits(4_000_000_000))
            .unwrap_err();
        assert!(matches!(err, OpticsError::Configuration(_)));

        let mut conv = converter(2);
        assert!(conv.set_num_qubits(MAX_QUBITS + 1).is_err());
        assert_eq!(conv.num_qubits(), Some(2));
        assert!(conv.set_num_qubits(MAX_QUBITS).is_ok());
    }

    #[test]
    fn test_arity_and_wire_errors() {
        let conv = converter(2);
        let toffoli = GateInstruction::new("Toffoli", [q(0), q(1), q(2)]);
        let err = conv.convert(&[toffoli], false).unwrap_err();
        assert!(err.to_string().contains("3 wires"));

        let err = conv
            .convert(&[GateInstruction::hadamard(q(5))], false)
            .unwrap_err();
        assert!(matches!(err, OpticsError::WireOutOfRange { wire: 5, .. }));

        let err = conv
            .convert(&[GateInstruction::cnot(q(1), q(1))], false)
            .unwrap_err();
        assert!(matches!(err, OpticsError::UnsupportedGate { .. }));

        let err = conv
            .convert(&[GateInstruction::new("iSWAP", [q(0), q(1)])], false)
            .unwrap_err();
        assert!(matches!(err, OpticsError::MissingGadget { .. }));
    }

    #[test]
    fn test_logical_input() {
        let conv = LinearOpticsConverter::new(
            ConverterConfig::new()
                .with_num_qubits(2)
                .with_source(Source::perfect().with_logical_input([true, false])),
        )
        .unwrap();
        let circuit = conv.convert(&[], false).unwrap();
        assert_eq!(circuit.input_state().to_string(), "|0,1,1,0⟩");

        let err = LinearOpticsConverter::new(
            ConverterConfig::new()
                .with_num_qubits(3)
                .with_source(Source::perfect().with_logical_input([true])),
        )
        .unwrap_err();
        assert!(matches!(err, OpticsError::Configuration(_)));
    }

    #[test]
    fn test_backend_name_and_source_forwarded() {
        let conv = LinearOpticsConverter::new(
            ConverterConfig::new()
                .with_num_qubits(1)
                .with_backend_name("qpu:ascella"),
        )
        .unwrap();
        let circuit = conv.convert(&[], false).unwrap();
        assert_eq!(circuit.backend_name(), Some("qpu:ascella"));
        assert!(circuit.source().is_perfect());
    }

    #[test]
    fn test_converter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LinearOpticsConverter>();
    }
}
