//! Session configuration
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_TOTAL_ITEMS, DUPLICATE_CAP, INITIAL_BAG_COUNT, ITEMS_PER_BAG};
use crate::policy::PlacementLimits;

/// Errors raised when bagging configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BaggingConfigError {
    #[error("items_per_bag must be at least 1")]
    ItemsPerBagZero,
    #[error("duplicate_cap must be at least 1")]
    DuplicateCapZero,
    #[error("initial_bags must be at least 1")]
    NoInitialBags,
}

/// Tunable limits for a bagging session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaggingConfig {
    #[serde(default = "BaggingConfig::default_items_per_bag")]
    pub items_per_bag: usize,
    #[serde(default = "BaggingConfig::default_duplicate_cap")]
    pub duplicate_cap: usize,
    #[serde(default = "BaggingConfig::default_initial_bags")]
    pub initial_bags: usize,
    #[serde(default = "BaggingConfig::default_total_items")]
    pub total_items: usize,
}

impl BaggingConfig {
    const fn default_items_per_bag() -> usize {
        ITEMS_PER_BAG
    }

    const fn default_duplicate_cap() -> usize {
        DUPLICATE_CAP
    }

    const fn default_initial_bags() -> usize {
        INITIAL_BAG_COUNT
    }

    const fn default_total_items() -> usize {
        DEFAULT_TOTAL_ITEMS
    }

    /// Get default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON string. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn with_total_items(mut self, total_items: usize) -> Self {
        self.total_items = total_items;
        self
    }

    /// Check the limits are usable.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), BaggingConfigError> {
        if self.items_per_bag == 0 {
            return Err(BaggingConfigError::ItemsPerBagZero);
        }
        if self.duplicate_cap == 0 {
            return Err(BaggingConfigError::DuplicateCapZero);
        }
        if self.initial_bags == 0 {
            return Err(BaggingConfigError::NoInitialBags);
        }
        Ok(())
    }

    #[must_use]
    pub const fn limits(&self) -> PlacementLimits {
        PlacementLimits {
            items_per_bag: self.items_per_bag,
            duplicate_cap: self.duplicate_cap,
        }
    }
}

impl Default for BaggingConfig {
    fn default() -> Self {
        Self {
            items_per_bag: Self::default_items_per_bag(),
            duplicate_cap: Self::default_duplicate_cap(),
            initial_bags: Self::default_initial_bags(),
            total_items: Self::default_total_items(),
        }
    }
}
