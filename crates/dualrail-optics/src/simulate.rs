//! Reference Fock-space simulator for small circuits.
//!
//! Output amplitudes are permanents of sub-matrices of the circuit's
//! single-photon transfer matrix:
//!
//! ```text
//! ⟨out|U|in⟩ = perm(U[out_rows, in_cols]) / sqrt(Π n_in! · Π n_out!)
//! ```
//!
//! Only outputs that satisfy the heralds and post-selection rules are
//! evaluated. Their total probability is the circuit's physical performance;
//! the returned distribution is renormalised over them.

use std::collections::BTreeMap;

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::circuit::OpticalCircuit;
use crate::error::{OpticsError, OpticsResult};
use crate::fock::FockState;
use crate::matrix::ModeMatrix;

/// Largest photon number any simulation accepts. Permanents are evaluated
/// over subsets indexed by a 64-bit mask.
pub const PHOTON_LIMIT: usize = 63;

/// Limits and tolerances for the reference simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Largest photon number accepted.
    pub max_photons: usize,
    /// Largest mode count accepted.
    pub max_modes: usize,
    /// Largest number of candidate output states evaluated.
    pub max_states: usize,
    /// Probabilities below this are dropped before renormalising.
    pub prune_threshold: f64,
}

impl SimulatorConfig {
    /// Check that the limits are usable.
    pub fn validate(&self) -> OpticsResult<()> {
        if self.max_photons == 0 || self.max_modes == 0 || self.max_states == 0 {
            return Err(OpticsError::Configuration(
                "simulator limits must be greater than 0".to_string(),
            ));
        }
        if self.max_photons > PHOTON_LIMIT {
            return Err(OpticsError::Configuration(format!(
                "max_photons is {} but at most {PHOTON_LIMIT} photons can be simulated",
                self.max_photons
            )));
        }
        if !(0.0..1.0).contains(&self.prune_threshold) {
            return Err(OpticsError::Configuration(format!(
                "prune_threshold must lie in [0, 1), got {}",
                self.prune_threshold
            )));
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_photons: 10,
            max_modes: 32,
            max_states: 1_000_000,
            prune_threshold: 1e-12,
        }
    }
}

/// Result of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Probabilities of accepted outputs, restricted to the data modes.
    pub distribution: BTreeMap<FockState, f64>,
    /// Probability that an output passes the heralds and post-selection.
    pub physical_performance: f64,
}

impl Simulation {
    /// Draw `shots` outcomes from the distribution.
    ///
    /// Every shot is one accepted run; rejected runs are not counted.
    pub fn sample_counts<R: Rng + ?Sized>(
        &self,
        shots: usize,
        rng: &mut R,
    ) -> BTreeMap<FockState, usize> {
        let mut counts = BTreeMap::new();
        let cumulative: Vec<(f64, &FockState)> = self
            .distribution
            .iter()
            .scan(0.0, |acc, (state, p)| {
                *acc += p;
                Some((*acc, state))
            })
            .collect();
        let Some(&(total, last)) = cumulative.last() else {
            return counts;
        };

        for _ in 0..shots {
            let r: f64 = rng.r#gen::<f64>() * total;
            let i = cumulative.partition_point(|(c, _)| *c <= r);
            let state = cumulative.get(i).map_or(last, |(_, s)| *s);
            *counts.entry(state.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Permanent-based simulator.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator with the given limits.
    pub fn new(config: SimulatorConfig) -> Self {
        Self { config }
    }

    /// The simulator limits.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run `circuit` on its own input state.
    #[instrument(skip_all, fields(modes = circuit.num_modes(), photons = circuit.input_state().photon_count()))]
    pub fn run(&self, circuit: &OpticalCircuit) -> OpticsResult<Simulation> {
        let input = circuit.input_state();
        let photons = input.photon_count();
        let num_modes = circuit.num_modes();
        let max_photons = self.config.max_photons.min(PHOTON_LIMIT);
        if photons > max_photons {
            return Err(OpticsError::Simulation(format!(
                "{photons} photons exceed the limit of {max_photons}"
            )));
        }
        if num_modes > self.config.max_modes {
            return Err(OpticsError::Simulation(format!(
                "{num_modes} modes exceed the limit of {}",
                self.config.max_modes
            )));
        }

        let herald_tail: Vec<usize> = circuit.heralds().iter().map(|h| h.photons).collect();
        let herald_photons: usize = herald_tail.iter().sum();
        let data_modes = circuit.num_data_modes();
        let Some(data_photons) = photons.checked_sub(herald_photons) else {
            return Err(OpticsError::Simulation(format!(
                "heralds expect {herald_photons} photons but only {photons} are injected"
            )));
        };
        let candidates = num_outputs(data_modes, data_photons);
        if candidates > self.config.max_states as u128 {
            return Err(OpticsError::Simulation(format!(
                "{candidates} candidate outputs exceed the limit of {}",
                self.config.max_states
            )));
        }

        let unitary = circuit.unitary();
        let in_cols = expand(input.occupation());
        let in_norm = factorial_product(input.occupation());

        let mut accepted: FxHashMap<FockState, f64> = FxHashMap::default();
        let mut physical_performance = 0.0;
        for data in compositions(data_photons, data_modes) {
            let output = FockState::new(data).extended(&herald_tail);
            if !circuit.accepts(&output) {
                continue;
            }
            let p = probability(&unitary, &in_cols, in_norm, output.occupation());
            physical_performance += p;
            if p >= self.config.prune_threshold {
                *accepted.entry(output.truncated(data_modes)).or_default() += p;
            }
        }
        debug!(
            accepted = accepted.len(),
            physical_performance, "Simulation complete"
        );

        let kept: f64 = accepted.values().sum();
        let distribution = if kept > 0.0 {
            accepted.into_iter().map(|(s, p)| (s, p / kept)).collect()
        } else {
            BTreeMap::new()
        };
        Ok(Simulation {
            distribution,
            physical_performance,
        })
    }
}

/// Probability of one output occupation.
fn probability(unitary: &ModeMatrix, in_cols: &[usize], in_norm: f64, out: &[usize]) -> f64 {
    let rows = expand(out);
    let n = rows.len();
    let sub = ModeMatrix::from_shape_fn((n, n), |(r, c)| unitary[[rows[r], in_cols[c]]]);
    permanent(&sub).norm_sqr() / (in_norm * factorial_product(out))
}

/// Repeat each mode index by its occupation.
fn expand(occupation: &[usize]) -> Vec<usize> {
    occupation
        .iter()
        .enumerate()
        .flat_map(|(mode, &n)| std::iter::repeat_n(mode, n))
        .collect()
}

fn factorial_product(occupation: &[usize]) -> f64 {
    occupation
        .iter()
        .map(|&n| (1..=n).map(|k| k as f64).product::<f64>())
        .product()
}

/// Permanent of a square matrix by Ryser's formula with Gray-code ordering.
///
/// # Panics
///
/// Panics if the matrix has more than [`PHOTON_LIMIT`] rows.
pub fn permanent(a: &ModeMatrix) -> Complex64 {
    let n = a.nrows();
    assert!(n <= PHOTON_LIMIT, "permanent of a {n}x{n} matrix is out of range");
    if n == 0 {
        return Complex64::new(1.0, 0.0);
    }
    let mut row_sums = vec![Complex64::new(0.0, 0.0); n];
    let mut total = Complex64::new(0.0, 0.0);
    let mut gray: u64 = 0;
    for k in 1..(1_u64 << n) {
        let j = k.trailing_zeros() as usize;
        gray ^= 1 << j;
        let added = gray & (1 << j) != 0;
        for (i, sum) in row_sums.iter_mut().enumerate() {
            if added {
                *sum += a[[i, j]];
            } else {
                *sum -= a[[i, j]];
            }
        }
        let product: Complex64 = row_sums.iter().product();
        if gray.count_ones() % 2 == 0 {
            total += product;
        } else {
            total -= product;
        }
    }
    if n % 2 == 0 { total } else { -total }
}

/// Number of ways to put `photons` photons into `modes` modes.
fn num_outputs(modes: usize, photons: usize) -> u128 {
    if modes == 0 {
        return u128::from(photons == 0);
    }
    // C(photons + modes - 1, photons)
    let mut acc: u128 = 1;
    for i in 0..photons as u128 {
        acc = acc.saturating_mul(modes as u128 + i) / (i + 1);
    }
    acc
}

/// All occupations of `modes` modes holding `photons` photons, starting with
/// every photon in the first mode.
fn compositions(photons: usize, modes: usize) -> Vec<Vec<usize>> {
    fn fill(rest: usize, prefix: &mut Vec<usize>, modes: usize, out: &mut Vec<Vec<usize>>) {
        if prefix.len() + 1 == modes {
            prefix.push(rest);
            out.push(prefix.clone());
            prefix.pop();
            return;
        }
        for n in (0..=rest).rev() {
            prefix.push(n);
            fill(rest - n, prefix, modes, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    if modes == 0 {
        if photons == 0 {
            out.push(vec![]);
        }
        return out;
    }
    fill(photons, &mut Vec::with_capacity(modes), modes, &mut out);
    out
}
