//! 2x2 unitary matrices for single-qubit gates.
//!
//! Every single-qubit instruction is resolved to a [`Unitary2x2`] before it is
//! turned into an optical component. The ZYZ decomposition is what the optical
//! layer uses to realise a gate as phase shifters and a beam splitter.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{IrError, IrResult};

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 matrix from its elements.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    /// Build a unitary from a row-major slice, checking shape and unitarity.
    pub fn from_row_major(gate_name: &str, elements: &[Complex64]) -> IrResult<Self> {
        if elements.len() != 4 {
            return Err(IrError::MatrixShape {
                gate_name: gate_name.to_string(),
                expected: 4,
                got: elements.len(),
            });
        }
        let u = Self::new(elements[0], elements[1], elements[2], elements[3]);
        if !u.is_unitary(1e-8) {
            return Err(IrError::NotUnitary(gate_name.to_string()));
        }
        Ok(u)
    }

    /// Element at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * 2 + col]
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
        )
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = 1.0 / 2.0_f64.sqrt();
        Self::new(
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(-s, 0.0),
        )
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Y matrix.
    pub fn y() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Z matrix.
    pub fn z() -> Self {
        Self::p(PI)
    }

    /// Create an S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::p(PI / 2.0)
    }

    /// Create an S-dagger gate.
    pub fn sdg() -> Self {
        Self::p(-PI / 2.0)
    }

    /// Create a T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    /// Create a T-dagger gate.
    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// Create an SX gate (sqrt(X)).
    pub fn sx() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::new(half + half_i, half - half_i, half - half_i, half + half_i)
    }

    /// Create an SX-dagger gate.
    pub fn sxdg() -> Self {
        let half = Complex64::new(0.5, 0.0);
        let half_i = Complex64::new(0.0, 0.5);
        Self::new(half - half_i, half + half_i, half + half_i, half - half_i)
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::new(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Create a phase gate P(lambda).
    pub fn p(lambda: f64) -> Self {
        Self::new(
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::from_polar(1.0, lambda),
        )
    }

    /// Create a U gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check `U·U† = I` within `tolerance`.
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        let product = self.mul(&self.dagger());
        let id = Self::identity();
        product
            .data
            .iter()
            .zip(id.data.iter())
            .all(|(a, b)| (a - b).norm() < tolerance)
    }

    /// Check whether both off-diagonal elements vanish.
    pub fn is_diagonal(&self) -> bool {
        self.data[1].norm() < EPSILON && self.data[2].norm() < EPSILON
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, _, _, d] = self.data;
        self.is_diagonal() && (a - d).norm() < EPSILON
    }

    /// Check element-wise equality up to a global phase.
    pub fn approx_eq_up_to_phase(&self, other: &Self, tolerance: f64) -> bool {
        // Use the largest element of `other` as the phase reference.
        let (idx, _) = other
            .data
            .iter()
            .enumerate()
            .fold((0, 0.0), |(bi, bn), (i, z)| {
                if z.norm() > bn { (i, z.norm()) } else { (bi, bn) }
            });
        if self.data[idx].norm() < EPSILON {
            return false;
        }
        let phase = other.data[idx] / self.data[idx];
        if (phase.norm() - 1.0).abs() > tolerance {
            return false;
        }
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| (a * phase - b).norm() < tolerance)
    }

    /// Decompose into RZ(alpha) * RY(beta) * RZ(gamma) * `global_phase`.
    ///
    /// Returns (alpha, beta, gamma, `global_phase`).
    #[allow(clippy::no_effect_underscore_binding)]
    pub fn zyz_decomposition(&self) -> (f64, f64, f64, f64) {
        let [a, b, c, d] = self.data;

        let det = a * d - b * c;
        let global_phase = det.arg() / 2.0;

        // Remove global phase to get an SU(2) matrix.
        let phase_factor = Complex64::from_polar(1.0, -global_phase);
        let a = a * phase_factor;
        let b = b * phase_factor;
        let c = c * phase_factor;

        // For SU(2): U = [[cos(b/2)*e^(-i(a+g)/2), -sin(b/2)*e^(-i(a-g)/2)],
        //                 [sin(b/2)*e^(i(a-g)/2),   cos(b/2)*e^(i(a+g)/2)]]
        let beta = 2.0 * c.norm().atan2(a.norm());

        if beta.abs() < EPSILON {
            let alpha_plus_gamma = -2.0 * a.arg();
            return (
                alpha_plus_gamma / 2.0,
                0.0,
                alpha_plus_gamma / 2.0,
                global_phase,
            );
        }

        if (beta - PI).abs() < EPSILON {
            let alpha_minus_gamma = -2.0 * (-b).arg();
            return (
                alpha_minus_gamma / 2.0,
                PI,
                -alpha_minus_gamma / 2.0,
                global_phase,
            );
        }

        let alpha_plus_gamma = -2.0 * a.arg();
        let alpha_minus_gamma = 2.0 * c.arg();

        let alpha = f64::midpoint(alpha_plus_gamma, alpha_minus_gamma);
        let gamma = (alpha_plus_gamma - alpha_minus_gamma) / 2.0;

        (alpha, beta, gamma, global_phase)
    }

    /// Normalize angles to [-pi, pi].
    pub fn normalize_angle(angle: f64) -> f64 {
        if angle.is_nan() || angle.is_infinite() {
            return 0.0;
        }
        let mut a = angle.rem_euclid(2.0 * PI);
        if a > PI {
            a -= 2.0 * PI;
        }
        a
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}
