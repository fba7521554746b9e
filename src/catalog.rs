//! Category catalog and the active selection drawn from it.
//!
//! The catalog is fixed for the life of the process. The active set is a
//! snapshot handed to each render pass; the engine never mutates it.

use crate::error::{CircumplexError, InvalidInput, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Categories shown when nothing else is selected.
pub const DEFAULT_ACTIVE: &[&str] = &["joy", "sadness", "anger", "love"];

/// Built-in emotion catalog as (id, name, hex color).
const EMOTIONS: &[(&str, &str, &str)] = &[
    ("fear", "Fear", "#8B5CF6"),
    ("joy", "Joy", "#FFD700"),
    ("sadness", "Sadness", "#00D4FF"),
    ("surprise", "Surprise", "#F59E0B"),
    ("anger", "Anger", "#FF4757"),
    ("disgust", "Disgust", "#10B981"),
    ("anticipation", "Anticipation", "#9D4EDD"),
    ("trust", "Trust", "#06D6A0"),
    ("love", "Love", "#FF6B9D"),
    ("confusion", "Confusion", "#FB8500"),
    ("excitement", "Excitement", "#FF006E"),
    ("calm", "Calm", "#4ECDC4"),
    ("hope", "Hope", "#45B7D1"),
    ("frustration", "Frustration", "#E74C3C"),
    ("gratitude", "Gratitude", "#F39C12"),
    ("compassion", "Compassion", "#A855F7"),
];

/// An sRGB color, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self, InvalidInput> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(InvalidInput::Color(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| InvalidInput::Color(hex.to_string()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_hex())
    }
}

impl TryFrom<String> for RgbColor {
    type Error = InvalidInput;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<RgbColor> for String {
    fn from(color: RgbColor) -> Self {
        color.to_hex()
    }
}

/// One labeled category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable key; also the seed for every derived attribute.
    pub id: String,
    /// Display label.
    pub name: String,
    pub color: RgbColor,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: RgbColor) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
        }
    }
}

/// The static list of categories the active set is drawn from.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty list or repeated ids.
    pub fn new(categories: Vec<Category>) -> Result<Self> {
        if categories.is_empty() {
            return Err(InvalidInput::EmptyCatalog.into());
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.as_str()) {
                return Err(InvalidInput::DuplicateCategory(category.id.clone()).into());
            }
        }

        Ok(Self { categories })
    }

    /// The built-in sixteen-emotion catalog.
    pub fn emotions() -> Self {
        let categories = EMOTIONS
            .iter()
            .map(|(id, name, hex)| {
                // Built-in table is well-formed.
                let color = RgbColor::from_hex(hex).unwrap_or(RgbColor::new(255, 255, 255));
                Category::new(*id, *name, color)
            })
            .collect();
        Self { categories }
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Every id in the catalog, in catalog order.
    pub fn ids(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::emotions()
    }
}

/// Outcome of [`ActiveSet::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Activated,
    Deactivated,
}

/// The categories currently selected for display.
///
/// Never empty. Ids are kept in catalog order, which is also the order
/// categories are arranged around the circle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSet {
    ids: Vec<String>,
}

impl ActiveSet {
    pub fn new<I, S>(catalog: &Catalog, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self { ids: Vec::new() };
        for id in ids {
            let id = id.as_ref();
            if set.contains(id) {
                return Err(InvalidInput::DuplicateCategory(id.to_string()).into());
            }
            set.insert(catalog, id)?;
        }

        if set.ids.is_empty() {
            return Err(InvalidInput::EmptyActiveSet.into());
        }
        Ok(set)
    }

    /// The default selection, restricted to ids the catalog knows about.
    /// Falls back to the first catalog entry when none of them are present.
    pub fn default_for(catalog: &Catalog) -> Self {
        let mut ids: Vec<String> = catalog
            .iter()
            .filter(|c| DEFAULT_ACTIVE.contains(&c.id.as_str()))
            .map(|c| c.id.clone())
            .collect();
        if ids.is_empty() {
            ids.extend(catalog.iter().take(1).map(|c| c.id.clone()));
        }
        Self { ids }
    }

    fn insert(&mut self, catalog: &Catalog, id: &str) -> Result<()> {
        let rank = catalog
            .position(id)
            .ok_or_else(|| InvalidInput::UnknownCategory(id.to_string()))?;
        let at = self
            .ids
            .iter()
            .position(|existing| catalog.position(existing).is_some_and(|r| r > rank))
            .unwrap_or(self.ids.len());
        self.ids.insert(at, id.to_string());
        Ok(())
    }

    /// Add `id`. Activating an id that is already active is a no-op.
    pub fn activate(&mut self, catalog: &Catalog, id: &str) -> Result<()> {
        if self.contains(id) {
            return Ok(());
        }
        self.insert(catalog, id)
    }

    /// Remove `id`, refusing to empty the set.
    pub fn deactivate(&mut self, id: &str) -> Result<()> {
        let Some(index) = self.ids.iter().position(|existing| existing == id) else {
            return Err(InvalidInput::UnknownCategory(id.to_string()).into());
        };
        if self.ids.len() == 1 {
            return Err(InvalidInput::LastActiveCategory(id.to_string()).into());
        }
        self.ids.remove(index);
        Ok(())
    }

    pub fn toggle(&mut self, catalog: &Catalog, id: &str) -> Result<Toggle> {
        if self.contains(id) {
            self.deactivate(id)?;
            Ok(Toggle::Deactivated)
        } else {
            self.insert(catalog, id)?;
            Ok(Toggle::Activated)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve ids against the catalog in arrangement order.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> Result<Vec<&'c Category>> {
        self.ids
            .iter()
            .map(|id| {
                catalog
                    .get(id)
                    .ok_or_else(|| CircumplexError::from(InvalidInput::UnknownCategory(id.clone())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(RgbColor::from_hex("#FFD700").unwrap(), RgbColor::new(255, 215, 0));
        assert_eq!(RgbColor::from_hex("00d4ff").unwrap(), RgbColor::new(0, 212, 255));
        assert!(RgbColor::from_hex("#FFF").is_err());
        assert!(RgbColor::from_hex("#GG0000").is_err());
    }

    #[test]
    fn color_serializes_as_hex() {
        let json = serde_json::to_string(&RgbColor::new(255, 107, 157)).unwrap();
        assert_eq!(json, "\"#FF6B9D\"");
        let back: RgbColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RgbColor::new(255, 107, 157));
    }

    #[test]
    fn builtin_catalog_has_sixteen_unique_emotions() {
        let catalog = Catalog::emotions();
        assert_eq!(catalog.len(), 16);
        assert!(Catalog::new(catalog.iter().cloned().collect()).is_ok());
        assert_eq!(catalog.get("joy").unwrap().color, RgbColor::new(0xFF, 0xD7, 0x00));
    }

    #[test]
    fn empty_or_duplicate_catalog_is_rejected() {
        assert!(matches!(
            Catalog::new(Vec::new()),
            Err(CircumplexError::InvalidInput(InvalidInput::EmptyCatalog))
        ));

        let dup = vec![
            Category::new("a", "A", RgbColor::new(1, 2, 3)),
            Category::new("a", "A again", RgbColor::new(1, 2, 3)),
        ];
        assert!(matches!(
            Catalog::new(dup),
            Err(CircumplexError::InvalidInput(InvalidInput::DuplicateCategory(id))) if id == "a"
        ));
    }

    #[test]
    fn active_set_follows_catalog_order() {
        let catalog = Catalog::emotions();
        let set = ActiveSet::new(&catalog, ["love", "joy", "anger"]).unwrap();
        assert_eq!(set.ids(), ["joy", "anger", "love"]);

        let mut set = set;
        set.activate(&catalog, "fear").unwrap();
        assert_eq!(set.ids().first().map(String::as_str), Some("fear"));
    }

    #[test]
    fn default_selection_matches_builtin_defaults() {
        let set = ActiveSet::default_for(&Catalog::emotions());
        assert_eq!(set.ids(), ["joy", "sadness", "anger", "love"]);
    }

    #[test]
    fn removing_last_category_is_rejected() {
        let catalog = Catalog::emotions();
        let mut set = ActiveSet::new(&catalog, ["joy", "sadness"]).unwrap();

        assert_eq!(set.toggle(&catalog, "sadness").unwrap(), Toggle::Deactivated);
        let err = set.toggle(&catalog, "joy").unwrap_err();
        assert!(matches!(
            err,
            CircumplexError::InvalidInput(InvalidInput::LastActiveCategory(_))
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn unknown_and_empty_selections_are_rejected() {
        let catalog = Catalog::emotions();
        assert!(ActiveSet::new(&catalog, ["boredom"]).is_err());
        assert!(ActiveSet::new(&catalog, Vec::<String>::new()).is_err());
        assert!(ActiveSet::new(&catalog, ["joy", "joy"]).is_err());
    }
}
