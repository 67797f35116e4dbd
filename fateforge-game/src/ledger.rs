//! Types exchanged with the remote score ledger.
use serde::{Deserialize, Serialize};

use crate::decisions::{DecisionId, HeroArchetype};
use crate::rating::Grade;

/// The payload submitted for a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePayload {
    pub rating_grade: Grade,
    pub hero_archetype: HeroArchetype,
    pub decisions: Vec<DecisionId>,
}

/// A score record as echoed back by the ledger after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub rating_grade: Grade,
    pub hero_archetype: HeroArchetype,
    #[serde(default)]
    pub decisions: Vec<DecisionId>,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

/// Whoever is signed in on this device. Submission is only permitted when
/// one of these exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorIdentity {
    pub name: String,
    /// Opaque bearer token handed to the ledger client.
    pub token: String,
}

/// A per-field validation message from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Structured submission failure. The one error class that reaches the
/// player as a warning; the local run stays persisted so they can resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("{title}: {message}")]
pub struct LedgerError {
    /// HTTP-like status, `0` when the request never reached the server.
    pub status: u16,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub field_errors: Vec<FieldError>,
}

impl LedgerError {
    /// A transport-level failure with no server response to decode.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            title: "Submission failed".to_string(),
            message: message.into(),
            field_errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_with_grade_and_archetype_tags() {
        let payload = ScorePayload {
            rating_grade: Grade::A,
            hero_archetype: HeroArchetype::Warrior,
            decisions: vec![1, 4, 10, 12, 13],
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""rating_grade":"A""#));
        assert!(json.contains(r#""hero_archetype":"warrior""#));
        let back: ScorePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn ledger_error_displays_title_and_message() {
        let err = LedgerError {
            status: 422,
            title: "Score rejected".to_string(),
            message: "validation failed".to_string(),
            field_errors: vec![FieldError {
                field: "decisions".to_string(),
                message: "must not be empty".to_string(),
            }],
        };
        assert_eq!(err.to_string(), "Score rejected: validation failed");
    }

    #[test]
    fn transport_errors_carry_no_status() {
        let err = LedgerError::transport("connection refused");
        assert_eq!(err.status, 0);
        assert!(err.field_errors.is_empty());
    }
}
