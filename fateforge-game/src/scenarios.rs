//! Scenario catalog: the narrative beats of the story graph, with the
//! decisions each one offers.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::decisions::DecisionId;

/// Identifier of a scenario state. `0` is the none/uninitialized sentinel,
/// `-1` the finished terminal; positive ids are in-story beats.
pub type StateId = i32;

/// Sentinel for "no scenario" / unknown transitions.
pub const STATE_NONE: StateId = 0;
/// Terminal state of a completed run.
pub const STATE_FINISHED: StateId = -1;

/// Asset shown when a state id has no catalog entry.
pub const NOT_FOUND_ILLUSTRATION: &str = "art/not_found.png";
/// Placeholder narrative for unknown state ids.
pub const NARRATIVE_PLACEHOLDER: &str = "...";

const DEFAULT_SCENARIO_DATA: &str = include_str!("../assets/data/scenarios.json");

/// One narrative beat in the story graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: StateId,
    pub text: String,
    /// Opaque asset reference for the beat's illustration.
    pub illustration: String,
    /// Decisions offered at this beat, in display order. Empty means the
    /// beat auto-advances on the next tap.
    #[serde(default)]
    pub decisions: SmallVec<[DecisionId; 4]>,
}

/// Container for all scenario data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioCatalog {
    pub scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Load the catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid scenario data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load the catalog shipped with the crate.
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_SCENARIO_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, id: StateId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    /// Narrative text for a state. Unknown ids get a placeholder rather
    /// than an error so a resumed run can survive catalog drift.
    #[must_use]
    pub fn narrative(&self, id: StateId) -> &str {
        self.get(id).map_or(NARRATIVE_PLACEHOLDER, |s| s.text.as_str())
    }

    /// Illustration reference for a state, or the not-found asset.
    #[must_use]
    pub fn illustration(&self, id: StateId) -> &str {
        self.get(id)
            .map_or(NOT_FOUND_ILLUSTRATION, |s| s.illustration.as_str())
    }

    /// Decisions offered at a state, empty for linear and unknown states.
    #[must_use]
    pub fn offered(&self, id: StateId) -> &[DecisionId] {
        self.get(id).map_or(&[], |s| s.decisions.as_slice())
    }

    /// Whether `decision` is among the decisions offered at `state`.
    #[must_use]
    pub fn offers(&self, state: StateId, decision: DecisionId) -> bool {
        self.offered(state).contains(&decision)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalog {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
