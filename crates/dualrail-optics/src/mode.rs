//! Dual-rail mode indexing.
//!
//! Qubit `q` is carried by one photon in modes `2q` and `2q + 1`: a photon in
//! the even mode is logical 0, a photon in the odd mode is logical 1.

use dualrail_ir::QubitId;

/// Index of an optical mode.
pub type Mode = usize;

/// The (even, odd) mode pair of a wire.
#[inline]
pub fn modes_of(wire: QubitId) -> (Mode, Mode) {
    mode_pair(wire.index())
}

/// The (even, odd) mode pair of qubit index `q`.
#[inline]
pub fn mode_pair(q: usize) -> (Mode, Mode) {
    (2 * q, 2 * q + 1)
}

/// Number of data modes needed for `num_qubits` qubits.
#[inline]
pub fn data_modes(num_qubits: usize) -> usize {
    2 * num_qubits
}
