//! Placement events emitted by the session stepper.
//!
//! Each successful step yields one event. The session keeps them in order,
//! so a session's history is enough to replay where every item went.

use serde::{Deserialize, Serialize};

use crate::item::Position;
use crate::policy::PlacementReason;

/// Record of a single item landing in a bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementEvent {
    /// Index of the placed item in the session's stream.
    pub seq: usize,
    /// Fresh instance id given to the item when it was placed.
    pub item_id: String,
    /// Catalog template the item was drawn from.
    pub template_id: String,
    pub item_name: String,
    pub bag_index: usize,
    pub bag_id: String,
    pub bag_name: String,
    pub position: Position,
    pub reason: PlacementReason,
    /// Whether the step had to open a new bag.
    pub opened_new_bag: bool,
}

impl PlacementEvent {
    /// Short headline for a toast, e.g. "Bagged: Milk".
    #[must_use]
    pub fn title(&self) -> String {
        format!("Bagged: {}", self.item_name)
    }

    /// e.g. "Placed in Bag 2 at bottom position".
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "Placed in {} at {} position",
            self.bag_name, self.position
        )
    }
}
