// ⚙️ Catalog Configuration - Policy as Data
// Overdue threshold and default category are tunable; loan limits are fixed policy.

use anyhow::{Context as AnyhowContext, Result as AnyhowResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, Result};

// ============================================================================
// LOAN POLICY
// ============================================================================

/// Fixed loan-limit table, one entry per patron category.
pub struct LoanPolicy;

impl LoanPolicy {
    pub const STUDENT_LIMIT: usize = 3;
    pub const FACULTY_LIMIT: usize = 5;
    pub const STAFF_LIMIT: usize = 10;
}

// ============================================================================
// CATALOG CONFIG
// ============================================================================

/// Days a book may stay borrowed before it counts as overdue.
pub const DEFAULT_OVERDUE_THRESHOLD_DAYS: i64 = 15;

/// Category assigned to books registered without one.
pub const DEFAULT_BOOK_CATEGORY: &str = "General";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Overdue threshold in days (exclusive: exactly this many days is not overdue)
    #[serde(default = "default_overdue_threshold_days")]
    pub overdue_threshold_days: i64,

    /// Category used when a book is registered without one
    #[serde(default = "default_book_category")]
    pub default_book_category: String,
}

fn default_overdue_threshold_days() -> i64 {
    DEFAULT_OVERDUE_THRESHOLD_DAYS
}

fn default_book_category() -> String {
    DEFAULT_BOOK_CATEGORY.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            overdue_threshold_days: default_overdue_threshold_days(),
            default_book_category: default_book_category(),
        }
    }
}

impl CatalogConfig {
    /// Parse and validate a JSON config document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: CatalogConfig =
            serde_json::from_str(content).map_err(|e| CatalogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AnyhowResult<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config = CatalogConfig::from_json_str(&content)
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))?;

        Ok(config)
    }

    /// Reject values that would make the policy meaningless
    pub fn validate(&self) -> Result<()> {
        if self.overdue_threshold_days < 0 {
            return Err(CatalogError::Config(format!(
                "overdue_threshold_days must be non-negative, got {}",
                self.overdue_threshold_days
            )));
        }
        if Duration::try_days(self.overdue_threshold_days).is_none() {
            return Err(CatalogError::Config(format!(
                "overdue_threshold_days is too large, got {}",
                self.overdue_threshold_days
            )));
        }
        if self.default_book_category.trim().is_empty() {
            return Err(CatalogError::Config(
                "default_book_category must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
