//! Qubit identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IrError;

/// Index of a logical qubit (a circuit wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The wire index as a `usize`.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl TryFrom<usize> for QubitId {
    type Error = IrError;

    fn try_from(id: usize) -> Result<Self, Self::Error> {
        u32::try_from(id)
            .map(QubitId)
            .map_err(|_| IrError::QubitOutOfRange(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        assert_eq!(format!("{}", QubitId(0)), "q0");
        assert_eq!(format!("{}", QubitId(12)), "q12");
    }

    #[test]
    fn test_qubit_from_index() {
        assert_eq!(QubitId::try_from(7_usize).unwrap(), QubitId(7));
        assert_eq!(QubitId::try_from(u32::MAX as usize).unwrap(), QubitId(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            QubitId::try_from(u32::MAX as usize + 1),
            Err(IrError::QubitOutOfRange(_))
        ));
    }

    #[test]
    fn test_qubit_serde_transparent() {
        let json = serde_json::to_string(&QubitId(3)).unwrap();
        assert_eq!(json, "3");
        let back: QubitId = serde_json::from_str("3").unwrap();
        assert_eq!(back, QubitId(3));
    }
}
