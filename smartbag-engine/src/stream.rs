//! Item stream: the catalog repeated out to a session's target length
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

use crate::item::Item;

/// Read-only, cheaply clonable sequence of item templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemStream(Arc<[Item]>);

impl Default for ItemStream {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl ItemStream {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.0.get(index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Item] {
        &self.0
    }
}

impl Deref for ItemStream {
    type Target = [Item];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Item>> for ItemStream {
    fn from(items: Vec<Item>) -> Self {
        Self(items.into())
    }
}

/// Repeat `catalog` in order until `total_items` templates are produced.
///
/// The first pass is copied verbatim. Every later pass appends ` (n)` to the
/// names, where `n` is the 1-based pass number, so repeats can be told apart.
/// An empty catalog yields an empty stream.
#[must_use]
pub fn build_item_stream(catalog: &[Item], total_items: usize) -> ItemStream {
    if catalog.is_empty() {
        return ItemStream::default();
    }
    let items: Vec<Item> = (0..total_items)
        .map(|index| {
            let template = &catalog[index % catalog.len()];
            let pass = index / catalog.len();
            if pass == 0 {
                template.clone()
            } else {
                Item {
                    name: format!("{} ({})", template.name, pass + 1),
                    ..template.clone()
                }
            }
        })
        .collect();
    ItemStream::from(items)
}
