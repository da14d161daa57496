//! Contract version strings.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{AppError, Result};

/// Dotted contract version such as `1.0.20`.
///
/// Components that are not unsigned integers are ignored; missing trailing
/// components compare as zero, so `1.0` equals `1`.
#[derive(Debug, Clone)]
pub struct ContractVersion {
    value: String,
    parts: Vec<u32>,
}

impl ContractVersion {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let parts = value.split('.').filter_map(|part| part.trim().parse().ok()).collect();
        Self { value, parts }
    }

    /// The version as reported by the contract.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Numeric components.
    pub fn parts(&self) -> &[u32] {
        &self.parts
    }

    /// Fail unless the version has exactly `size` numeric components.
    pub fn require_size(&self, size: usize) -> Result<&Self> {
        if self.parts.len() != size {
            return Err(AppError::UnsupportedVersion(format!(
                "Invalid contract version '{}': expected {size} components",
                self.value
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for ContractVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Ord for ContractVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| {
                let this = self.parts.get(i).copied().unwrap_or(0);
                let that = other.parts.get(i).copied().unwrap_or(0);
                this.cmp(&that)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ContractVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ContractVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ContractVersion {}
