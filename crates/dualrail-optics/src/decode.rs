//! Decoding Fock outcomes into qubit values.
//!
//! Each qubit's mode pair must hold exactly one photon: `|1,0⟩` reads as 0 and
//! `|0,1⟩` as 1. Bit strings list qubit 0 first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DecodeError;
use crate::fock::FockState;
use crate::mode::{data_modes, mode_pair};

/// Decode the first `num_qubits` mode pairs of `state`.
pub fn decode(state: &FockState, num_qubits: usize) -> Result<Vec<u8>, DecodeError> {
    let needed = data_modes(num_qubits);
    if state.num_modes() < needed {
        return Err(DecodeError::ModeCount {
            state: state.to_string(),
            num_qubits,
            needed,
            modes: state.num_modes(),
        });
    }
    (0..num_qubits)
        .map(|q| {
            let (even, odd) = mode_pair(q);
            match (state.get(even), state.get(odd)) {
                (1, 0) => Ok(0),
                (0, 1) => Ok(1),
                (even, odd) => Err(DecodeError::Undecodable {
                    state: state.to_string(),
                    qubit: q,
                    even,
                    odd,
                }),
            }
        })
        .collect()
}

/// Decode into a bit string such as `"01"`.
pub fn decode_bitstring(state: &FockState, num_qubits: usize) -> Result<String, DecodeError> {
    Ok(decode(state, num_qubits)?
        .into_iter()
        .map(|b| if b == 1 { '1' } else { '0' })
        .collect())
}

/// A Fock distribution folded onto qubit bit strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedDistribution {
    /// Probability per bit string.
    pub probabilities: BTreeMap<String, f64>,
    /// States that did not decode.
    pub rejected: Vec<FockState>,
    /// Total probability of the rejected states.
    pub leakage: f64,
}

/// Fold a Fock distribution into bit-string probabilities.
pub fn decode_distribution(
    distribution: &BTreeMap<FockState, f64>,
    num_qubits: usize,
) -> DecodedDistribution {
    let mut decoded = DecodedDistribution::default();
    for (state, &p) in distribution {
        match decode_bitstring(state, num_qubits) {
            Ok(bits) => *decoded.probabilities.entry(bits).or_default() += p,
            Err(e) => {
                warn!(state = %state, probability = p, "Rejected outcome: {e}");
                decoded.rejected.push(state.clone());
                decoded.leakage += p;
            }
        }
    }
    decoded
}

/// Per-shot bit vectors expanded from sample counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSet {
    /// One bit vector per accepted shot.
    pub samples: Vec<Vec<u8>>,
    /// Number of shots whose state did not decode.
    pub rejected_shots: usize,
}

/// Expand `counts` into one bit vector per shot, skipping undecodable states.
pub fn samples_from_counts(counts: &BTreeMap<FockState, usize>, num_qubits: usize) -> SampleSet {
    let mut set = SampleSet::default();
    for (state, &count) in counts {
        match decode(state, num_qubits) {
            Ok(bits) => set
                .samples
                .extend(std::iter::repeat_n(bits, count)),
            Err(e) => {
                warn!(state = %state, count, "Skipping undecodable samples: {e}");
                set.rejected_shots += count;
            }
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fock(s: &str) -> FockState {
        s.parse().unwrap()
    }

    #[test]
    fn test_decode_pairs() {
        assert_eq!(decode(&fock("|1,0,0,1⟩"), 2).unwrap(), vec![0, 1]);
        assert_eq!(decode_bitstring(&fock("|0,1,1,0⟩"), 2).unwrap(), "10");
    }

    #[test]
    fn test_decode_ignores_trailing_modes() {
        assert_eq!(decode(&fock("|0,1,1,1⟩"), 1).unwrap(), vec![1]);
    }

    #[test]
    fn test_decode_rejects() {
        let err = decode(&fock("|2,0,1,0⟩"), 2).unwrap_err();
        match err {
            DecodeError::Undecodable {
                state,
                qubit,
                even,
                odd,
            } => {
                assert_eq!(state, "|2,0,1,0⟩");
                assert_eq!((qubit, even, odd), (0, 2, 0));
            }
            other => panic!("unexpected error {other}"),
        }

        let err = decode(&fock("|1,0⟩"), 2).unwrap_err();
        assert!(matches!(err, DecodeError::ModeCount { needed: 4, .. }));
    }

    #[test]
    fn test_decode_distribution_collects_leakage() {
        let mut dist = BTreeMap::new();
        dist.insert(fock("|1,0,1,0⟩"), 0.5);
        dist.insert(fock("|0,1,0,1⟩"), 0.4);
        dist.insert(fock("|0,0,2,0⟩"), 0.1);
        let decoded = decode_distribution(&dist, 2);
        assert_eq!(decoded.probabilities["00"], 0.5);
        assert_eq!(decoded.probabilities["11"], 0.4);
        assert_eq!(decoded.rejected, vec![fock("|0,0,2,0⟩")]);
        assert!((decoded.leakage - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_samples_from_counts() {
        let mut counts = BTreeMap::new();
        counts.insert(fock("|1,0⟩"), 2);
        counts.insert(fock("|0,1⟩"), 1);
        counts.insert(fock("|1,1⟩"), 3);
        let set = samples_from_counts(&counts, 1);
        assert_eq!(set.samples.len(), 3);
        assert_eq!(set.samples.iter().filter(|s| s[0] == 1).count(), 1);
        assert_eq!(set.rejected_shots, 3);
    }
}
