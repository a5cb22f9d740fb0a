//! Photon-source descriptor.
//!
//! The converter does not model noise; the descriptor is carried on the
//! produced circuit for the backend that executes it. The one field the
//! converter reads is `logical_input`, which selects the basis state each
//! qubit is prepared in.

use serde::{Deserialize, Serialize};

use crate::error::{OpticsError, OpticsResult};

fn default_one() -> f64 {
    1.0
}

/// Single-photon source characteristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Probability that a pulse emits a photon.
    #[serde(default = "default_one")]
    pub brightness: f64,
    /// Second-order correlation g2(0); 0 for a pure single-photon source.
    #[serde(default)]
    pub g2: f64,
    /// Two-photon indistinguishability (HOM visibility).
    #[serde(default = "default_one")]
    pub indistinguishability: f64,
    /// End-to-end transmittance of the optical path.
    #[serde(default = "default_one")]
    pub transmittance: f64,
    /// Per-qubit logical preparation; `None` prepares every qubit in `|0⟩`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_input: Option<Vec<bool>>,
}

impl Default for Source {
    fn default() -> Self {
        Self::perfect()
    }
}

impl Source {
    /// An ideal source: bright, pure and indistinguishable photons.
    pub fn perfect() -> Self {
        Self {
            brightness: 1.0,
            g2: 0.0,
            indistinguishability: 1.0,
            transmittance: 1.0,
            logical_input: None,
        }
    }

    /// Set the logical basis state each qubit starts in.
    #[must_use]
    pub fn with_logical_input(mut self, bits: impl IntoIterator<Item = bool>) -> Self {
        self.logical_input = Some(bits.into_iter().collect());
        self
    }

    /// Check whether the source is free of imperfections.
    pub fn is_perfect(&self) -> bool {
        self.brightness == 1.0
            && self.g2 == 0.0
            && self.indistinguishability == 1.0
            && self.transmittance == 1.0
    }

    /// Check that every probability-like field lies in `[0, 1]`.
    pub fn validate(&self) -> OpticsResult<()> {
        for (name, value) in [
            ("brightness", self.brightness),
            ("g2", self.g2),
            ("indistinguishability", self.indistinguishability),
            ("transmittance", self.transmittance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(OpticsError::Configuration(format!(
                    "source {name} must lie in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Logical value qubit `q` is prepared in.
    pub fn logical_bit(&self, q: usize) -> bool {
        self.logical_input
            .as_ref()
            .and_then(|bits| bits.get(q).copied())
            .unwrap_or(false)
    }
}
