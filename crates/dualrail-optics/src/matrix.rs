//! Mode-transfer matrices.
//!
//! `U[[out, in]]` is the amplitude for a single photon entering mode `in` to
//! leave through mode `out`. Components applied in sequence compose as
//! `U_last · … · U_first`.

use ndarray::Array2;
use num_complex::Complex64;

use crate::mode::Mode;

/// Single-photon transfer matrix over a set of modes.
pub type ModeMatrix = Array2<Complex64>;

/// Identity on `n` modes.
pub fn identity(n: usize) -> ModeMatrix {
    Array2::from_diag_elem(n, Complex64::new(1.0, 0.0))
}

/// Embed a component matrix acting on `modes` into an `n`-mode identity.
///
/// Row and column `r` of `local` map to global mode `modes[r]`.
pub fn embed(n: usize, modes: &[Mode], local: &ModeMatrix) -> ModeMatrix {
    let mut global = identity(n);
    for (r, &mr) in modes.iter().enumerate() {
        for (c, &mc) in modes.iter().enumerate() {
            global[[mr, mc]] = local[[r, c]];
        }
    }
    global
}

/// Check `U·U† = I` within `tolerance`.
pub fn is_unitary(u: &ModeMatrix, tolerance: f64) -> bool {
    if !u.is_square() {
        return false;
    }
    let dagger = u.t().mapv(|z| z.conj());
    let product = u.dot(&dagger);
    let id = identity(u.nrows());
    product
        .iter()
        .zip(id.iter())
        .all(|(a, b)| (a - b).norm() < tolerance)
}
