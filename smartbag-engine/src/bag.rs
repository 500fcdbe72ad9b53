//! Shopping bags and their contents
use serde::{Deserialize, Serialize};

use crate::constants::{BAG_ID_PREFIX, BAG_NAME_PREFIX};
use crate::error::BaggingError;
use crate::item::{Category, Item, Position, base_name};
use crate::policy::PlacementLimits;

/// A bag at the packing station. Items keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    items: Vec<Item>,
}

impl Bag {
    /// Empty bag numbered `number` (1-based), e.g. "Bag 4".
    #[must_use]
    pub fn numbered(number: usize) -> Self {
        Self {
            id: format!("{BAG_ID_PREFIX}-{number}"),
            name: format!("{BAG_NAME_PREFIX} {number}"),
            items: Vec::new(),
        }
    }

    /// The first `count` bags of a fresh session.
    #[must_use]
    pub fn initial_set(count: usize) -> Vec<Self> {
        (1..=count).map(Self::numbered).collect()
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
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
    pub fn is_full(&self, items_per_bag: usize) -> bool {
        self.items.len() >= items_per_bag
    }

    #[must_use]
    pub fn contains_category(&self, category: Category) -> bool {
        self.items.iter().any(|item| item.category.contains(&category))
    }

    #[must_use]
    pub fn contains_chemical(&self) -> bool {
        self.contains_category(Category::Chemical)
    }

    /// How many items in the bag share the base name of `name`.
    #[must_use]
    pub fn count_base_name(&self, name: &str) -> usize {
        let wanted = base_name(name);
        self.items
            .iter()
            .filter(|item| item.base_name() == wanted)
            .count()
    }

    /// Items packed at `position`, in insertion order.
    pub fn items_at(&self, position: Position) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(move |item| item.position == position)
    }

    /// Check a bag that did not come from the stepper, e.g. one restored
    /// from a saved session.
    ///
    /// # Errors
    ///
    /// Returns an error if the bag holds more items than `items_per_bag`, or
    /// more copies of one product than `duplicate_cap`.
    pub fn check_limits(&self, limits: PlacementLimits) -> Result<(), BaggingError> {
        if self.items.len() > limits.items_per_bag {
            return Err(BaggingError::OverfullBag {
                bag: self.name.clone(),
                len: self.items.len(),
                limit: limits.items_per_bag,
            });
        }
        for item in &self.items {
            let count = self.count_base_name(&item.name);
            if count > limits.duplicate_cap {
                return Err(BaggingError::DuplicateCapExceeded {
                    bag: self.name.clone(),
                    name: item.base_name().to_string(),
                    count,
                    limit: limits.duplicate_cap,
                });
            }
        }
        Ok(())
    }

    /// Copy of this bag with `item` appended. Limits are not checked here;
    /// the placement policy is what keeps bags within them.
    #[must_use]
    pub fn with_item(&self, item: Item) -> Self {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.items.iter().cloned());
        items.push(item);
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            items,
        }
    }
}
