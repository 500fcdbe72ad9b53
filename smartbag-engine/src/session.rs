//! Bagging session: caller-owned state threaded through placement steps.
//!
//! Sessions are values. `place_next` never mutates `self`; it returns a new
//! session with a copied bag list and the cursor advanced by one. Replaying
//! the same steps from the same starting session always produces the same
//! bags.
use log::info;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::bag::Bag;
use crate::catalog::Catalog;
use crate::config::BaggingConfig;
use crate::constants::INSTANCE_ID_PREFIX;
use crate::error::BaggingError;
use crate::event::PlacementEvent;
use crate::item::Item;
use crate::policy::{BagPolicy, Placement, PlacementLimits};
use crate::stream::{ItemStream, build_item_stream};

/// How far through the stream a session is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub placed: usize,
    pub total: usize,
}

impl Progress {
    #[must_use]
    pub const fn remaining(self) -> usize {
        self.total.saturating_sub(self.placed)
    }

    /// Percentage bagged, 100 for an empty session.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.placed as f64 / self.total as f64 * 100.0
        }
    }
}

/// Result of a successful step: the next session and what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedStep {
    pub session: BaggingSession,
    pub event: PlacementEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionState")]
pub struct BaggingSession {
    bags: Vec<Bag>,
    current_item_index: usize,
    total_items: usize,
    stream: ItemStream,
    seed: u64,
    limits: PlacementLimits,
    initial_bags: usize,
    history: Vec<PlacementEvent>,
}

/// Wire shape of a saved session, checked before it becomes a session.
#[derive(Deserialize)]
struct SessionState {
    bags: Vec<Bag>,
    current_item_index: usize,
    total_items: usize,
    stream: ItemStream,
    seed: u64,
    limits: PlacementLimits,
    initial_bags: usize,
    #[serde(default)]
    history: Vec<PlacementEvent>,
}

impl TryFrom<SessionState> for BaggingSession {
    type Error = BaggingError;

    fn try_from(state: SessionState) -> Result<Self, Self::Error> {
        if state.total_items != state.stream.len() {
            return Err(BaggingError::StreamLengthMismatch {
                claimed: state.total_items,
                actual: state.stream.len(),
            });
        }
        if state.current_item_index > state.total_items {
            return Err(BaggingError::CursorOutOfRange {
                index: state.current_item_index,
                total: state.total_items,
            });
        }
        check_bags(&state.bags, state.limits)?;
        Ok(Self {
            bags: state.bags,
            current_item_index: state.current_item_index,
            total_items: state.total_items,
            stream: state.stream,
            seed: state.seed,
            limits: state.limits,
            initial_bags: state.initial_bags,
            history: state.history,
        })
    }
}

fn check_bags(bags: &[Bag], limits: PlacementLimits) -> Result<(), BaggingError> {
    bags.iter().try_for_each(|bag| bag.check_limits(limits))
}

impl BaggingSession {
    /// Fresh session over `catalog` repeated out to `config.total_items`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, or the catalog is empty
    /// while items are expected.
    pub fn new(
        catalog: &Catalog,
        config: &BaggingConfig,
        seed: u64,
    ) -> Result<Self, BaggingError> {
        config.validate()?;
        if catalog.is_empty() && config.total_items > 0 {
            return Err(BaggingError::EmptyCatalog);
        }
        let stream = build_item_stream(&catalog.items, config.total_items);
        Ok(Self::from_stream(stream, config, seed))
    }

    /// Session over a prepared stream; `total_items` is the stream length.
    #[must_use]
    pub fn from_stream(stream: ItemStream, config: &BaggingConfig, seed: u64) -> Self {
        Self {
            bags: Bag::initial_set(config.initial_bags),
            current_item_index: 0,
            total_items: stream.len(),
            stream,
            seed,
            limits: config.limits(),
            initial_bags: config.initial_bags,
            history: Vec::new(),
        }
    }

    /// Create a session and place its first item, the way a checkout screen
    /// bags the first scan as soon as it opens.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be built or has no items.
    pub fn start(
        catalog: &Catalog,
        config: &BaggingConfig,
        seed: u64,
    ) -> Result<PlacedStep, BaggingError> {
        Self::new(catalog, config, seed)?.place_next()
    }

    /// Replace the bag list with a prepared layout.
    ///
    /// # Errors
    ///
    /// Returns an error if any bag already breaks this session's capacity
    /// or duplicate cap.
    pub fn with_bags(mut self, bags: Vec<Bag>) -> Result<Self, BaggingError> {
        check_bags(&bags, self.limits)?;
        self.bags = bags;
        Ok(self)
    }

    #[must_use]
    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    #[must_use]
    pub const fn current_item_index(&self) -> usize {
        self.current_item_index
    }

    #[must_use]
    pub const fn total_items(&self) -> usize {
        self.total_items
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn limits(&self) -> PlacementLimits {
        self.limits
    }

    #[must_use]
    pub fn stream(&self) -> &ItemStream {
        &self.stream
    }

    /// Events for every step taken so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[PlacementEvent] {
        &self.history
    }

    #[must_use]
    pub const fn progress(&self) -> Progress {
        Progress {
            placed: self.current_item_index,
            total: self.total_items,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.current_item_index >= self.total_items
    }

    /// Template of the item the next step will place.
    #[must_use]
    pub fn peek_next(&self) -> Option<&Item> {
        if self.is_complete() {
            return None;
        }
        self.stream.get(self.current_item_index)
    }

    /// Item names per bag, in bag order.
    #[must_use]
    pub fn layout(&self) -> Vec<Vec<&str>> {
        self.bags
            .iter()
            .map(|bag| bag.items().iter().map(|item| item.name.as_str()).collect())
            .collect()
    }

    /// Fresh session over the same stream and seed.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self {
            bags: Bag::initial_set(self.initial_bags),
            current_item_index: 0,
            total_items: self.total_items,
            stream: self.stream.clone(),
            seed: self.seed,
            limits: self.limits,
            initial_bags: self.initial_bags,
            history: Vec::new(),
        }
    }

    /// Place the next item under the default tiers and this session's limits.
    ///
    /// # Errors
    ///
    /// Returns [`BaggingError::NoMoreItems`] once every item has been placed.
    pub fn place_next(&self) -> Result<PlacedStep, BaggingError> {
        self.place_next_with(&BagPolicy::new(self.limits))
    }

    /// Place the next item using `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`BaggingError::NoMoreItems`] once every item has been placed.
    pub fn place_next_with(&self, policy: &BagPolicy) -> Result<PlacedStep, BaggingError> {
        let index = self.current_item_index;
        let exhausted = BaggingError::NoMoreItems {
            placed: index,
            total: self.total_items,
        };
        if self.is_complete() {
            return Err(exhausted);
        }
        let template = self.stream.get(index).ok_or(exhausted)?;
        let item = template.with_instance_id(instance_id(self.seed, index));
        let decision = policy.decide(&item, &self.bags);

        let mut bags = self.bags.clone();
        let (bag_index, opened_new_bag) = match decision.placement {
            Placement::Existing(bag_index) => (bag_index, false),
            Placement::NewBag => {
                bags.push(Bag::numbered(bags.len() + 1));
                info!("opened {} for {}", bags[bags.len() - 1].name, item.name);
                (bags.len() - 1, true)
            }
        };
        let bag = &mut bags[bag_index];
        let event = PlacementEvent {
            seq: index,
            item_id: item.id.clone(),
            template_id: template.id.clone(),
            item_name: item.name.clone(),
            bag_index,
            bag_id: bag.id.clone(),
            bag_name: bag.name.clone(),
            position: item.position,
            reason: decision.reason,
            opened_new_bag,
        };
        *bag = bag.with_item(item);

        let mut history = self.history.clone();
        history.push(event.clone());
        let session = Self {
            bags,
            current_item_index: index + 1,
            total_items: self.total_items,
            stream: self.stream.clone(),
            seed: self.seed,
            limits: self.limits,
            initial_bags: self.initial_bags,
            history,
        };
        Ok(PlacedStep { session, event })
    }

    /// Step until the stream is exhausted, returning the final session and
    /// the events of the steps taken by this call.
    #[must_use]
    pub fn run_to_completion(&self) -> (Self, Vec<PlacementEvent>) {
        let mut session = self.clone();
        let mut events = Vec::with_capacity(self.progress().remaining());
        while let Ok(step) = session.place_next() {
            events.push(step.event);
            session = step.session;
        }
        (session, events)
    }
}

/// Instance id for the item at `index`. Unique within a session: the index
/// is embedded, and the seeded suffix distinguishes sessions.
fn instance_id(seed: u64, index: usize) -> String {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    rng.set_stream(index as u64);
    format!("{INSTANCE_ID_PREFIX}-{index:04}-{:08x}", rng.next_u32())
}
