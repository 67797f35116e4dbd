//! Decision catalog: display text and hero-archetype mapping for every
//! choice offered anywhere in the story graph.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a single player decision, unique across the whole graph.
pub type DecisionId = i32;

const DEFAULT_DECISION_DATA: &str = include_str!("../assets/data/decisions.json");

// The opening branch of chapter one. Each decision fixes the hero archetype
// for the rest of the run; the climax gate reaches back to it.
pub const DEC_TAKE_UP_SWORD: DecisionId = 1;
pub const DEC_OPEN_GRIMOIRE: DecisionId = 2;
pub const DEC_SLIP_INTO_SHADOWS: DecisionId = 3;

/// The role fixed by the player's very first decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroArchetype {
    Warrior,
    Mage,
    Rogue,
}

impl HeroArchetype {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warrior => "warrior",
            Self::Mage => "mage",
            Self::Rogue => "rogue",
        }
    }
}

impl fmt::Display for HeroArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HeroArchetype {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warrior" => Ok(Self::Warrior),
            "mage" => Ok(Self::Mage),
            "rogue" => Ok(Self::Rogue),
            _ => Err(()),
        }
    }
}

/// A single choice the player can take at a branch point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub id: DecisionId,
    pub text: String,
    /// Only the opening-branch decisions carry an archetype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<HeroArchetype>,
}

/// Container for all decision data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DecisionCatalog {
    pub decisions: Vec<Decision>,
}

impl DecisionCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            decisions: Vec::new(),
        }
    }

    /// Load the catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid decision data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the catalog shipped with the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_DECISION_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, id: DecisionId) -> Option<&Decision> {
        self.decisions.iter().find(|d| d.id == id)
    }

    /// Display text for a decision. Unknown ids resolve to the empty string
    /// rather than an error: persisted runs may reference ids that have
    /// since left the catalog.
    #[must_use]
    pub fn text(&self, id: DecisionId) -> &str {
        self.get(id).map_or("", |d| d.text.as_str())
    }

    /// Hero archetype implied by a decision; `None` for every decision
    /// outside the opening branch.
    #[must_use]
    pub fn archetype(&self, id: DecisionId) -> Option<HeroArchetype> {
        self.get(id).and_then(|d| d.archetype)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Decision> {
        self.decisions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

impl<'a> IntoIterator for &'a DecisionCatalog {
    type Item = &'a Decision;
    type IntoIter = std::slice::Iter<'a, Decision>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_catalog_parses_and_is_populated() {
        let catalog = DecisionCatalog::load_from_static();
        assert!(!catalog.is_empty());
        assert_eq!(catalog.text(DEC_TAKE_UP_SWORD), "Take up your father's sword");
    }

    #[test]
    fn unknown_decision_resolves_to_empty_text() {
        let catalog = DecisionCatalog::load_from_static();
        assert_eq!(catalog.text(999), "");
        assert_eq!(catalog.text(-4), "");
    }

    #[test]
    fn only_opening_branch_carries_archetypes() {
        let catalog = DecisionCatalog::load_from_static();
        assert_eq!(
            catalog.archetype(DEC_TAKE_UP_SWORD),
            Some(HeroArchetype::Warrior)
        );
        assert_eq!(
            catalog.archetype(DEC_OPEN_GRIMOIRE),
            Some(HeroArchetype::Mage)
        );
        assert_eq!(
            catalog.archetype(DEC_SLIP_INTO_SHADOWS),
            Some(HeroArchetype::Rogue)
        );
        for decision in &catalog {
            if decision.id > DEC_SLIP_INTO_SHADOWS {
                assert_eq!(catalog.archetype(decision.id), None, "id {}", decision.id);
            }
        }
        assert_eq!(catalog.archetype(999), None);
    }

    #[test]
    fn decision_ids_are_unique() {
        let catalog = DecisionCatalog::load_from_static();
        let mut ids: Vec<_> = catalog.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn archetype_round_trips_through_strings() {
        for archetype in [
            HeroArchetype::Warrior,
            HeroArchetype::Mage,
            HeroArchetype::Rogue,
        ] {
            assert_eq!(archetype.as_str().parse(), Ok(archetype));
        }
        assert_eq!("paladin".parse::<HeroArchetype>(), Err(()));
    }
}
