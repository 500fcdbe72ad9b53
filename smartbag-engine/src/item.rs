//! Grocery items and their packing tags
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Packing tag attached to an item. An item may carry several.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Heavy,
    Cold,
    Fragile,
    Chemical,
    Produce,
    Meat,
    Regular,
    /// Any tag outside the known set, kept as written. Matches no category
    /// rule.
    Unrecognized(String),
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Heavy,
        Self::Cold,
        Self::Fragile,
        Self::Chemical,
        Self::Produce,
        Self::Meat,
        Self::Regular,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heavy => "heavy",
            Self::Cold => "cold",
            Self::Fragile => "fragile",
            Self::Chemical => "chemical",
            Self::Produce => "produce",
            Self::Meat => "meat",
            Self::Regular => "regular",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or(())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        value
            .trim()
            .to_ascii_lowercase()
            .parse()
            .unwrap_or(Self::Unrecognized(value))
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// Tags carried by a single item.
pub type CategorySet = SmallVec<[Category; 4]>;

/// Where an item sits inside a bag. Only used for display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Bottom,
    #[default]
    Middle,
    Top,
}

impl Position {
    /// Display order, top of the bag first.
    pub const STACKED: [Self; 3] = [Self::Top, Self::Middle, Self::Bottom];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bottom => "bottom",
            Self::Middle => "middle",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom" => Ok(Self::Bottom),
            "middle" => Ok(Self::Middle),
            "top" => Ok(Self::Top),
            _ => Err(()),
        }
    }
}

/// A grocery item, either a catalog template or a placed instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    /// Symbolic glyph key; the engine never interprets it.
    pub icon: String,
    pub category: CategorySet,
    #[serde(default)]
    pub position: Position,
}

impl Item {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        category: &[Category],
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            category: category.iter().cloned().collect(),
            position,
        }
    }

    #[must_use]
    pub fn has_category(&self, category: Category) -> bool {
        self.category.contains(&category)
    }

    #[must_use]
    pub fn is_chemical(&self) -> bool {
        self.has_category(Category::Chemical)
    }

    /// Display name with any padding suffix removed.
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Copy of this item carrying a new instance id.
    #[must_use]
    pub fn with_instance_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Comma-separated tag list, in catalog order.
    #[must_use]
    pub fn category_label(&self) -> String {
        self.category
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn suffix_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r" \(\d+\)$").ok())
        .as_ref()
}

/// Strip a trailing ` (n)` copy marker from `name`.
#[must_use]
pub fn base_name(name: &str) -> &str {
    suffix_pattern()
        .and_then(|pattern| pattern.find(name))
        .map_or(name, |found| &name[..found.start()])
}
