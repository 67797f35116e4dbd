//! The persisted run record and its lifecycle phases.
use serde::{Deserialize, Serialize};

use crate::decisions::DecisionId;
use crate::scenarios::{STATE_FINISHED, STATE_NONE, StateId};

/// Lifecycle phase of the (at most one) run on this device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run exists yet.
    NoRun,
    /// A run is underway and being persisted after every advance.
    InProgress,
    /// The terminal state was reached; the record stays until the player
    /// submits or discards it.
    Finished,
}

/// One player's in-flight or completed playthrough. The whole record is
/// overwritten on every advance; there is no append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioProgress {
    /// Current scenario state, `0` before the first advance.
    pub current_state: StateId,
    /// Decisions taken so far, in chronological order.
    #[serde(default)]
    pub decisions_taken: Vec<DecisionId>,
    /// Unix epoch milliseconds of the first persistence.
    pub started_at: i64,
}

impl ScenarioProgress {
    /// A fresh, not-yet-advanced run stamped with its start time.
    #[must_use]
    pub const fn new(started_at: i64) -> Self {
        Self {
            current_state: STATE_NONE,
            decisions_taken: Vec::new(),
            started_at,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.current_state == STATE_FINISHED
    }

    /// The archetype-fixing decision made at the opening branch, if any.
    #[must_use]
    pub fn first_decision(&self) -> Option<DecisionId> {
        self.decisions_taken.first().copied()
    }

    /// Record one advance: replace the state and, when a decision was
    /// actually taken, append it. Callers persist the record afterwards so
    /// both fields land together.
    pub fn record_advance(&mut self, decision: Option<DecisionId>, next: StateId) {
        if let Some(decision) = decision {
            self.decisions_taken.push(decision);
        }
        self.current_state = next;
    }

    /// Serialize to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a valid run; storage
    /// backends treat that as "no run found".
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_run_starts_at_the_sentinel() {
        let run = ScenarioProgress::new(1_700_000_000_000);
        assert_eq!(run.current_state, STATE_NONE);
        assert!(run.decisions_taken.is_empty());
        assert!(!run.is_finished());
        assert_eq!(run.first_decision(), None);
    }

    #[test]
    fn record_advance_appends_and_replaces_together() {
        let mut run = ScenarioProgress::new(0);
        run.record_advance(None, 1);
        assert_eq!(run.current_state, 1);
        assert!(run.decisions_taken.is_empty());
        run.record_advance(Some(1), 3);
        assert_eq!(run.current_state, 3);
        assert_eq!(run.decisions_taken, vec![1]);
        assert_eq!(run.first_decision(), Some(1));
    }

    #[test]
    fn json_round_trip_preserves_the_record() {
        let mut run = ScenarioProgress::new(1_712_000_123_456);
        run.record_advance(None, 1);
        run.record_advance(Some(1), 3);
        run.record_advance(Some(4), 5);
        let json = run.to_json().unwrap();
        let restored = ScenarioProgress::from_json(&json).unwrap();
        assert_eq!(restored, run);
    }

    #[test]
    fn missing_decision_list_deserializes_as_empty() {
        let run =
            ScenarioProgress::from_json(r#"{"current_state":1,"started_at":42}"#).unwrap();
        assert_eq!(run.current_state, 1);
        assert!(run.decisions_taken.is_empty());
        assert_eq!(run.started_at, 42);
    }

    #[test]
    fn finished_flag_follows_the_terminal_state() {
        let mut run = ScenarioProgress::new(0);
        run.record_advance(None, STATE_FINISHED);
        assert!(run.is_finished());
    }
}
