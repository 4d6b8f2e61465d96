//! Order decision outcome.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Final, externally visible decision for an order.
///
/// This is a closed set. The engine's internal "inventory is fine, keep going"
/// signal is deliberately not a variant here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Accept,
    Hold,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "ACCEPT",
            Decision::Hold => "HOLD",
            Decision::Reject => "REJECT",
        }
    }
}

impl core::fmt::Display for Decision {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACCEPT" => Ok(Decision::Accept),
            "HOLD" => Ok(Decision::Hold),
            "REJECT" => Ok(Decision::Reject),
            other => Err(DomainError::validation(format!("unknown decision: {other}"))),
        }
    }
}
