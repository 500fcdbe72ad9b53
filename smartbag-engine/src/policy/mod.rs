//! Bag assignment policy
//!
//! Pure decision procedure: given an item and the current bags, pick the
//! first bag that fits or signal that a new one is needed. Bags are always
//! scanned left to right and the lowest qualifying index wins.
//!
//! A bag is *base-eligible* for an item when it has room, holds fewer than
//! `duplicate_cap` items with the same base name, and would not mix a
//! chemical with a non-chemical. The first category rule that applies to the
//! item then narrows the choice; if it finds nothing, or no rule applies, the
//! first base-eligible bag is used.
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::bag::Bag;
use crate::constants::{DUPLICATE_CAP, ITEMS_PER_BAG};
use crate::item::Item;

mod rules;

pub use rules::{CategoryRule, DEFAULT_RULES, RuleKind};

/// Capacity and duplicate limits applied to every bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementLimits {
    pub items_per_bag: usize,
    pub duplicate_cap: usize,
}

impl Default for PlacementLimits {
    fn default() -> Self {
        Self {
            items_per_bag: ITEMS_PER_BAG,
            duplicate_cap: DUPLICATE_CAP,
        }
    }
}

/// Where an item should go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Index into the bag list.
    Existing(usize),
    /// No bag fits; the caller appends a fresh one.
    NewBag,
}

/// Why the policy chose what it chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementReason {
    /// A category rule found a matching bag.
    Rule(RuleKind),
    /// No rule matched; first bag with room was used.
    Fallback,
    /// Nothing had room.
    NewBag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementDecision {
    pub placement: Placement,
    pub reason: PlacementReason,
}

/// Ordered rule tiers plus the limits they operate under.
#[derive(Debug, Clone)]
pub struct BagPolicy {
    limits: PlacementLimits,
    rules: Vec<CategoryRule>,
}

impl Default for BagPolicy {
    fn default() -> Self {
        Self::new(PlacementLimits::default())
    }
}

impl BagPolicy {
    /// Policy with the default chemical → cold → fresh tiers.
    #[must_use]
    pub fn new(limits: PlacementLimits) -> Self {
        Self::with_rules(limits, DEFAULT_RULES.to_vec())
    }

    /// Policy with a custom tier list, evaluated in the given order.
    #[must_use]
    pub fn with_rules(limits: PlacementLimits, rules: Vec<CategoryRule>) -> Self {
        Self { limits, rules }
    }

    #[must_use]
    pub const fn limits(&self) -> PlacementLimits {
        self.limits
    }

    #[must_use]
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// The tier that governs `item`, if any.
    #[must_use]
    pub fn governing_rule(&self, item: &Item) -> Option<&CategoryRule> {
        self.rules.iter().find(|rule| rule.applies_to(item))
    }

    /// Room, duplicate cap and chemical isolation.
    #[must_use]
    pub fn is_base_eligible(&self, item: &Item, bag: &Bag) -> bool {
        if bag.is_full(self.limits.items_per_bag) {
            trace!("{} rejected for {}: full", bag.name, item.name);
            return false;
        }
        if bag.count_base_name(&item.name) >= self.limits.duplicate_cap {
            trace!(
                "{} rejected for {}: duplicate cap reached",
                bag.name, item.name
            );
            return false;
        }
        if !bag.is_empty() && bag.contains_chemical() != item.is_chemical() {
            trace!(
                "{} rejected for {}: chemical isolation",
                bag.name, item.name
            );
            return false;
        }
        true
    }

    fn first_eligible(
        &self,
        item: &Item,
        bags: &[Bag],
        accepts: impl Fn(&Bag) -> bool,
    ) -> Option<usize> {
        bags.iter()
            .position(|bag| self.is_base_eligible(item, bag) && accepts(bag))
    }

    /// Decide where `item` goes and record which tier decided.
    #[must_use]
    pub fn decide(&self, item: &Item, bags: &[Bag]) -> PlacementDecision {
        let by_rule = self.governing_rule(item).and_then(|rule| {
            self.first_eligible(item, bags, |bag| rule.accepts(bag))
                .map(|index| (index, PlacementReason::Rule(rule.kind)))
        });
        let decision = match by_rule.or_else(|| {
            self.first_eligible(item, bags, |_| true)
                .map(|index| (index, PlacementReason::Fallback))
        }) {
            Some((index, reason)) => PlacementDecision {
                placement: Placement::Existing(index),
                reason,
            },
            None => PlacementDecision {
                placement: Placement::NewBag,
                reason: PlacementReason::NewBag,
            },
        };
        debug!(
            "policy placed {} via {:?}: {:?}",
            item.name, decision.reason, decision.placement
        );
        decision
    }

    #[must_use]
    pub fn select(&self, item: &Item, bags: &[Bag]) -> Placement {
        self.decide(item, bags).placement
    }
}

/// Select a bag for `item` under the default limits and tiers.
#[must_use]
pub fn select_bag(item: &Item, bags: &[Bag]) -> Placement {
    BagPolicy::default().select(item, bags)
}
