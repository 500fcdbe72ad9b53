//! Item catalog: the fixed templates a session's item stream is built from
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use thiserror::Error;

use crate::CatalogSource;
use crate::constants::DEFAULT_CATALOG_JSON;
use crate::item::Item;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no items")]
    Empty,
    #[error("catalog item '{id}' has no categories")]
    NoCategories { id: String },
    #[error("catalog item id '{id}' appears more than once")]
    DuplicateId { id: String },
}

/// Ordered list of item templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Catalog {
    pub items: Vec<Item>,
}

impl Catalog {
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The bundled seven-item grocery catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset is malformed.
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_JSON)
    }

    /// Check the catalog can seed a session.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in catalog order.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for item in &self.items {
            if item.category.is_empty() {
                return Err(CatalogError::NoCategories {
                    id: item.id.clone(),
                });
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: item.id.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Catalog source backed by an in-memory catalog, the bundled one by default.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    catalog: Catalog,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Wrap the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Catalog::load_default().map(Self::new)
    }
}

impl CatalogSource for StaticCatalog {
    type Error = Infallible;

    fn load_catalog(&self) -> Result<Catalog, Self::Error> {
        Ok(self.catalog.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Category, Position};

    #[test]
    fn bundled_catalog_matches_checkout_lineup() {
        let catalog = Catalog::load_default().unwrap();
        let names: Vec<_> = catalog.items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Milk",
                "Eggs",
                "Bread",
                "Cereal",
                "Bananas",
                "Ground Beef",
                "Bleach"
            ]
        );
        let beef = catalog.find("ground-beef").unwrap();
        assert_eq!(beef.category.as_slice(), &[Category::Meat, Category::Cold]);
        assert_eq!(beef.position, Position::Bottom);
        assert!(catalog.find("bleach").unwrap().is_chemical());
    }

    #[test]
    fn validate_rejects_empty_and_untagged() {
        assert!(matches!(Catalog::default().validate(), Err(CatalogError::Empty)));

        let untagged = Catalog::from_items(vec![Item::new(
            "ghost",
            "Ghost",
            "box",
            &[],
            Position::Middle,
        )]);
        assert!(matches!(
            untagged.validate(),
            Err(CatalogError::NoCategories { id }) if id == "ghost"
        ));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let json = r#"{"items":[
            {"id":"a","name":"A","icon":"a","category":["regular"],"position":"top"},
            {"id":"a","name":"B","icon":"b","category":["cold"],"position":"top"}
        ]}"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId { id }) if id == "a"
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Catalog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
        assert!(err.to_string().starts_with("catalog JSON is malformed"));
    }

    #[test]
    fn static_source_hands_out_copies() {
        let source = StaticCatalog::bundled().unwrap();
        let first = source.load_catalog().unwrap();
        let second = source.load_catalog().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
    }
}
