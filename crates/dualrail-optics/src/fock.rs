//! Fock states: photon occupation numbers per mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;
use crate::mode::Mode;

/// Photon counts for each mode, written `|1,0,0,1⟩`.
///
/// Serialized as its text form so it can key JSON maps.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FockState(Vec<usize>);

impl FockState {
    /// Create a state from occupation numbers.
    pub fn new(occupation: Vec<usize>) -> Self {
        Self(occupation)
    }

    /// The vacuum on `num_modes` modes.
    pub fn vacuum(num_modes: usize) -> Self {
        Self(vec![0; num_modes])
    }

    /// Number of modes.
    #[inline]
    pub fn num_modes(&self) -> usize {
        self.0.len()
    }

    /// Total photon number.
    pub fn photon_count(&self) -> usize {
        self.0.iter().sum()
    }

    /// Occupation of `mode`, zero past the end.
    #[inline]
    pub fn get(&self, mode: Mode) -> usize {
        self.0.get(mode).copied().unwrap_or(0)
    }

    /// Occupation numbers as a slice.
    pub fn occupation(&self) -> &[usize] {
        &self.0
    }

    /// Keep only the first `num_modes` modes.
    #[must_use]
    pub fn truncated(&self, num_modes: usize) -> Self {
        Self(self.0.iter().take(num_modes).copied().collect())
    }

    /// Append modes with the given occupations.
    #[must_use]
    pub fn extended(&self, tail: &[usize]) -> Self {
        let mut occupation = self.0.clone();
        occupation.extend_from_slice(tail);
        Self(occupation)
    }
}

impl From<Vec<usize>> for FockState {
    fn from(occupation: Vec<usize>) -> Self {
        Self(occupation)
    }
}

impl fmt::Display for FockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("|")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{n}")?;
        }
        f.write_str("⟩")
    }
}

impl FromStr for FockState {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidFock(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('|')
            .and_then(|rest| rest.strip_suffix('⟩').or_else(|| rest.strip_suffix('>')))
            .ok_or_else(invalid)?;
        if inner.trim().is_empty() {
            return Ok(Self(vec![]));
        }
        inner
            .split(',')
            .map(|n| n.trim().parse::<usize>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<FockState> for String {
    fn from(state: FockState) -> Self {
        state.to_string()
    }
}

impl TryFrom<String> for FockState {
    type Error = DecodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let state = FockState::new(vec![1, 0, 1, 0, 1, 1]);
        assert_eq!(state.to_string(), "|1,0,1,0,1,1⟩");
        assert_eq!(FockState::vacuum(0).to_string(), "|⟩");
    }

    #[test]
    fn test_parse_both_brackets() {
        let a: FockState = "|1,0,0,1⟩".parse().unwrap();
        let b: FockState = "|1, 0, 0, 1>".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.photon_count(), 2);
        assert!("1,0".parse::<FockState>().is_err());
        assert!("|1,x>".parse::<FockState>().is_err());
    }

    #[test]
    fn test_truncate_and_extend() {
        let state = FockState::new(vec![0, 1, 1, 0]);
        assert_eq!(state.truncated(2), FockState::new(vec![0, 1]));
        assert_eq!(state.extended(&[1, 1]).num_modes(), 6);
        assert_eq!(state.get(10), 0);
    }

    #[test]
    fn test_serde_as_string() {
        let state = FockState::new(vec![1, 0]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"|1,0⟩\"");
        let back: FockState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
