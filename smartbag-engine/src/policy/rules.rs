use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bag::Bag;
use crate::item::{Category, Item};

/// Identifies a category rule tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Chemicals only join chemical bags or start an empty one.
    Chemical,
    /// Cold items seek a bag that already holds something cold.
    Cold,
    /// Produce and meat seek a bag that already holds produce or meat.
    Fresh,
}

impl RuleKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chemical => "chemical",
            Self::Cold => "cold",
            Self::Fresh => "fresh",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tier of the placement policy: which items it governs and which bags
/// it will accept for them.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub kind: RuleKind,
    applies: fn(&Item) -> bool,
    accepts: fn(&Bag) -> bool,
}

impl CategoryRule {
    #[must_use]
    pub const fn new(
        kind: RuleKind,
        applies: fn(&Item) -> bool,
        accepts: fn(&Bag) -> bool,
    ) -> Self {
        Self {
            kind,
            applies,
            accepts,
        }
    }

    #[must_use]
    pub fn applies_to(&self, item: &Item) -> bool {
        (self.applies)(item)
    }

    #[must_use]
    pub fn accepts(&self, bag: &Bag) -> bool {
        (self.accepts)(bag)
    }
}

fn is_fresh(item: &Item) -> bool {
    item.has_category(Category::Produce) || item.has_category(Category::Meat)
}

fn is_cold(item: &Item) -> bool {
    item.has_category(Category::Cold)
}

fn chemical_or_empty(bag: &Bag) -> bool {
    bag.is_empty() || bag.contains_chemical()
}

fn holds_cold(bag: &Bag) -> bool {
    bag.contains_category(Category::Cold)
}

fn holds_fresh(bag: &Bag) -> bool {
    bag.items().iter().any(is_fresh)
}

/// Tiers in priority order. The first tier that applies to an item governs it.
pub const DEFAULT_RULES: [CategoryRule; 3] = [
    CategoryRule::new(RuleKind::Chemical, Item::is_chemical, chemical_or_empty),
    CategoryRule::new(RuleKind::Cold, is_cold, holds_cold),
    CategoryRule::new(RuleKind::Fresh, is_fresh, holds_fresh),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Position;

    fn item(tags: &[Category]) -> Item {
        Item::new("t", "Thing", "box", tags, Position::Middle)
    }

    #[test]
    fn default_rules_are_ordered_chemical_cold_fresh() {
        let kinds: Vec<_> = DEFAULT_RULES.iter().map(|rule| rule.kind).collect();
        assert_eq!(kinds, [RuleKind::Chemical, RuleKind::Cold, RuleKind::Fresh]);
    }

    #[test]
    fn applies_predicates_follow_tags() {
        let [chemical, cold, fresh] = DEFAULT_RULES;
        assert!(chemical.applies_to(&item(&[Category::Chemical])));
        assert!(!chemical.applies_to(&item(&[Category::Regular])));
        assert!(cold.applies_to(&item(&[Category::Cold, Category::Heavy])));
        assert!(fresh.applies_to(&item(&[Category::Meat])));
        assert!(fresh.applies_to(&item(&[Category::Produce])));
        let glowing = item(&[Category::Unrecognized("glowing".to_string())]);
        assert!(!fresh.applies_to(&glowing));
    }

    #[test]
    fn chemical_rule_accepts_empty_bags_but_cold_does_not() {
        let empty = Bag::numbered(1);
        assert!(DEFAULT_RULES[0].accepts(&empty));
        assert!(!DEFAULT_RULES[1].accepts(&empty));
        assert!(!DEFAULT_RULES[2].accepts(&empty));

        let with_banana = empty.with_item(item(&[Category::Produce]));
        assert!(DEFAULT_RULES[2].accepts(&with_banana));
        assert!(!DEFAULT_RULES[0].accepts(&with_banana));
    }
}
