//! Diagnostics attached to a transaction.
//!
//! Problems are pass-through data: decoded from JSON and handed to the
//! caller as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One diagnostic record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Problem {
    #[serde(alias = "type")]
    pub kind: String,
    pub message: String,
    pub report: String,
    pub path: String,
    pub error_code: String,
    pub is_error: bool,
    pub is_exception: bool,
}

impl Problem {
    /// Decode a JSON array of problems.
    pub fn list_from_json(bytes: &[u8]) -> Result<Vec<Problem>> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = if self.is_exception {
            "exception"
        } else if self.is_error {
            "error"
        } else {
            "warning"
        };
        write!(f, "[{}] {}", severity, self.error_code)?;
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        Ok(())
    }
}
