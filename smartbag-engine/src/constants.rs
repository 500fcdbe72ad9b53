//! Centralized capacity and tuning constants for the bagging engine.
//!
//! These values define the default limits applied by the placement policy.
//! `BaggingConfig` starts from them; anything else that needs a limit reads
//! it from the config rather than from here.

// Bag limits ---------------------------------------------------------------
pub const ITEMS_PER_BAG: usize = 5;
pub const DUPLICATE_CAP: usize = 2;
pub const INITIAL_BAG_COUNT: usize = 3;

// Session defaults ---------------------------------------------------------
pub const DEFAULT_TOTAL_ITEMS: usize = 20;
pub const DEFAULT_SESSION_SEED: u64 = 1337;

// Naming -------------------------------------------------------------------
pub(crate) const BAG_NAME_PREFIX: &str = "Bag";
pub(crate) const BAG_ID_PREFIX: &str = "bag";
pub(crate) const INSTANCE_ID_PREFIX: &str = "item";

// Bundled data -------------------------------------------------------------
pub(crate) const DEFAULT_CATALOG_JSON: &str = include_str!("../assets/catalog.json");
