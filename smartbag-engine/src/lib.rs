//! Smart Bagging Engine
//!
//! Platform-agnostic core for the checkout bagging assistant. Items are fed
//! one at a time and each is assigned to a bag by a small ordered rule set.
//! This crate has no UI or platform-specific dependencies; callers own the
//! session state and render it however they like.

pub mod bag;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod item;
pub mod policy;
pub mod session;
pub mod shared;
pub mod stream;

// Re-export commonly used types
pub use bag::Bag;
pub use catalog::{Catalog, CatalogError, StaticCatalog};
pub use config::{BaggingConfig, BaggingConfigError};
pub use error::BaggingError;
pub use event::PlacementEvent;
pub use item::{Category, CategorySet, Item, Position, base_name};
pub use policy::{
    BagPolicy, CategoryRule, DEFAULT_RULES, Placement, PlacementDecision, PlacementLimits,
    PlacementReason, RuleKind, select_bag,
};
pub use session::{BaggingSession, PlacedStep, Progress};
pub use shared::SharedSession;
pub use stream::{ItemStream, build_item_stream};

/// Trait for abstracting where item catalogs come from
/// Platform-specific implementations should provide this
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the catalog a session's item stream is built from
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;
}

/// Entry point binding a catalog source to session configuration
pub struct BaggingEngine<S>
where
    S: CatalogSource,
{
    source: S,
    config: BaggingConfig,
}

impl<S> BaggingEngine<S>
where
    S: CatalogSource,
    BaggingError: From<S::Error>,
{
    /// Create a new engine with the provided catalog source and config
    pub const fn new(source: S, config: BaggingConfig) -> Self {
        Self { source, config }
    }

    #[must_use]
    pub const fn config(&self) -> &BaggingConfig {
        &self.config
    }

    /// Build an empty session whose stream is drawn from the source's catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or validated, or the
    /// config is invalid.
    pub fn create_session(&self, seed: u64) -> Result<BaggingSession, BaggingError> {
        let catalog = self.source.load_catalog()?;
        catalog.validate()?;
        BaggingSession::new(&catalog, &self.config, seed)
    }

    /// Build a session and bag its first item
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be built or has no items.
    pub fn start_session(&self, seed: u64) -> Result<PlacedStep, BaggingError> {
        self.create_session(seed)?.place_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("catalog offline")]
    struct Offline;

    impl From<Offline> for BaggingError {
        fn from(_: Offline) -> Self {
            Self::EmptyCatalog
        }
    }

    struct OfflineSource;

    impl CatalogSource for OfflineSource {
        type Error = Offline;

        fn load_catalog(&self) -> Result<Catalog, Self::Error> {
            Err(Offline)
        }
    }

    #[test]
    fn engine_starts_session_with_first_item_bagged() {
        let engine = BaggingEngine::new(
            StaticCatalog::bundled().unwrap(),
            BaggingConfig::default_config(),
        );
        let step = engine.start_session(42).unwrap();
        assert_eq!(step.session.current_item_index(), 1);
        assert_eq!(step.session.total_items(), 20);
        assert_eq!(step.event.bag_name, "Bag 1");
    }

    #[test]
    fn engine_validates_source_catalog() {
        let untagged = Catalog::from_items(vec![Item::new(
            "ghost",
            "Ghost",
            "box",
            &[],
            Position::Middle,
        )]);
        let engine = BaggingEngine::new(StaticCatalog::new(untagged), BaggingConfig::default());
        assert!(matches!(
            engine.create_session(1),
            Err(BaggingError::Catalog(CatalogError::NoCategories { .. }))
        ));
    }

    #[test]
    fn engine_propagates_source_errors() {
        let engine = BaggingEngine::new(OfflineSource, BaggingConfig::default());
        assert!(engine.create_session(1).is_err());
    }
}
