//! Mode permutations.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, OpticsResult};
use crate::matrix::ModeMatrix;

/// A permutation of modes: input mode `i` leaves through mode `vector[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    vector: Vec<usize>,
}

impl Permutation {
    /// Create a permutation, checking that `vector` is a bijection on `0..n`.
    pub fn new(vector: Vec<usize>) -> OpticsResult<Self> {
        let n = vector.len();
        let mut seen = vec![false; n];
        for &target in &vector {
            if target >= n {
                return Err(OpticsError::InvalidPermutation(format!(
                    "{vector:?}: mode {target} out of range for {n} modes"
                )));
            }
            if std::mem::replace(&mut seen[target], true) {
                return Err(OpticsError::InvalidPermutation(format!(
                    "{vector:?}: mode {target} appears twice"
                )));
            }
        }
        Ok(Self { vector })
    }

    /// The identity on `n` modes.
    pub fn identity(n: usize) -> Self {
        Self {
            vector: (0..n).collect(),
        }
    }

    /// Exchange two-mode blocks `a` and `b` within `num_blocks` blocks.
    pub fn block_swap(num_blocks: usize, a: usize, b: usize) -> Self {
        let vector = (0..2 * num_blocks)
            .map(|i| {
                let (block, rail) = (i / 2, i % 2);
                let dest = if block == a {
                    b
                } else if block == b {
                    a
                } else {
                    block
                };
                2 * dest + rail
            })
            .collect();
        Self { vector }
    }

    /// Rotate `num_blocks` two-mode blocks: block 0 moves to the top and every
    /// other block moves down by one.
    pub fn block_rotation(num_blocks: usize) -> Self {
        let vector = (0..2 * num_blocks)
            .map(|i| {
                let (block, rail) = (i / 2, i % 2);
                let dest = if block == 0 { num_blocks - 1 } else { block - 1 };
                2 * dest + rail
            })
            .collect();
        Self { vector }
    }

    /// The inverse permutation.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut vector = vec![0; self.vector.len()];
        for (i, &target) in self.vector.iter().enumerate() {
            vector[target] = i;
        }
        Self { vector }
    }

    /// Output mode of input mode `i`.
    #[inline]
    pub fn destination(&self, i: usize) -> usize {
        self.vector[i]
    }

    /// Number of modes permuted.
    #[inline]
    pub fn len(&self) -> usize {
        self.vector.len()
    }

    /// Check whether the permutation acts on no modes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }

    /// Check whether every mode maps to itself.
    pub fn is_identity(&self) -> bool {
        self.vector.iter().enumerate().all(|(i, &t)| i == t)
    }

    /// The permutation vector.
    pub fn as_slice(&self) -> &[usize] {
        &self.vector
    }

    /// Transfer matrix with `U[[vector[i], i]] = 1`.
    pub fn matrix(&self) -> ModeMatrix {
        let n = self.vector.len();
        let mut u = ModeMatrix::zeros((n, n));
        for (i, &target) in self.vector.iter().enumerate() {
            u[[target, i]] = Complex64::new(1.0, 0.0);
        }
        u
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = OpticsError;

    fn try_from(vector: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(vector)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.vector
    }
}
