//! Fateforge Narrative Engine
//!
//! Platform-agnostic core for the Fateforge interactive-fiction game: the
//! branching story graph, the deterministic progression state machine, the
//! outcome rating, and the seams to persistence and the remote score
//! ledger. Front ends (web, terminal) provide the seam implementations.

pub mod decisions;
pub mod engine;
pub mod ledger;
pub mod progress;
pub mod rating;
pub mod scenarios;
pub mod transition;

use async_trait::async_trait;
use std::sync::Mutex;

// Re-export commonly used types
pub use decisions::{
    DEC_OPEN_GRIMOIRE, DEC_SLIP_INTO_SHADOWS, DEC_TAKE_UP_SWORD, Decision, DecisionCatalog,
    DecisionId, HeroArchetype,
};
pub use engine::{ScenarioEngine, SceneView, SubmitError};
pub use ledger::{ActorIdentity, FieldError, LedgerError, RemoteRecord, ScorePayload};
pub use progress::{RunPhase, ScenarioProgress};
pub use rating::{FAVORABLE_DECISIONS, Grade, compute_rating};
pub use scenarios::{
    NARRATIVE_PLACEHOLDER, NOT_FOUND_ILLUSTRATION, STATE_FINISHED, STATE_NONE, Scenario,
    ScenarioCatalog, StateId,
};
pub use transition::{STATE_CLIMAX_GATE, edges, next_state};

/// Trait for the durable, per-profile run store.
/// Platform-specific implementations should provide this.
pub trait RunStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Overwrite the persisted run with `run`. Writes must be atomic per
    /// call: a reader never observes a new state without its decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save_run(&self, run: &ScenarioProgress) -> Result<(), Self::Error>;

    /// Load the persisted run, if any. A record that fails to parse is
    /// treated as "no run found" and discarded, never repaired.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, not for corruption.
    fn load_run(&self) -> Result<Option<ScenarioProgress>, Self::Error>;

    /// Delete the persisted run. Deleting an absent run is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    fn clear_run(&self) -> Result<(), Self::Error>;
}

/// Trait for the remote score ledger. The one genuinely asynchronous call
/// in the system; implementations attach the actor's token themselves.
#[async_trait]
pub trait ScoreLedger {
    /// Submit a finished run's score.
    ///
    /// # Errors
    ///
    /// Returns a structured [`LedgerError`] on transport, validation or
    /// auth failure; the caller keeps the local run in every error case.
    async fn submit_score(
        &self,
        actor: &ActorIdentity,
        payload: &ScorePayload,
    ) -> Result<RemoteRecord, LedgerError>;
}

/// Trait for session/auth state: who, if anyone, is signed in right now.
pub trait ActorProvider {
    fn current_actor(&self) -> Option<ActorIdentity>;
}

impl<T: RunStorage> RunStorage for &T {
    type Error = T::Error;

    fn save_run(&self, run: &ScenarioProgress) -> Result<(), Self::Error> {
        (**self).save_run(run)
    }

    fn load_run(&self) -> Result<Option<ScenarioProgress>, Self::Error> {
        (**self).load_run()
    }

    fn clear_run(&self) -> Result<(), Self::Error> {
        (**self).clear_run()
    }
}

#[async_trait]
impl<T: ScoreLedger + Sync> ScoreLedger for &T {
    async fn submit_score(
        &self,
        actor: &ActorIdentity,
        payload: &ScorePayload,
    ) -> Result<RemoteRecord, LedgerError> {
        (**self).submit_score(actor, payload).await
    }
}

impl<T: ActorProvider> ActorProvider for &T {
    fn current_actor(&self) -> Option<ActorIdentity> {
        (**self).current_actor()
    }
}

/// In-memory run store for tests and ephemeral sessions. Stores the
/// serialized form so corruption handling can be exercised too.
#[derive(Debug, Default)]
pub struct MemoryRunStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryRunStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with raw JSON, valid or not.
    #[must_use]
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(json.into())),
        }
    }

    /// The raw persisted JSON, if a run is stored.
    #[must_use]
    pub fn stored_json(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner).clone()
    }
}

impl RunStorage for MemoryRunStorage {
    type Error = std::convert::Infallible;

    fn save_run(&self, run: &ScenarioProgress) -> Result<(), Self::Error> {
        let json = run.to_json().unwrap_or_default();
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(json);
        Ok(())
    }

    fn load_run(&self) -> Result<Option<ScenarioProgress>, Self::Error> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match slot.as_deref().map(ScenarioProgress::from_json) {
            Some(Ok(run)) => Ok(Some(run)),
            Some(Err(_)) => {
                // Corrupt record: discard, start fresh.
                *slot = None;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn clear_run(&self) -> Result<(), Self::Error> {
        *self
            .slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Fixed actor provider: either nobody, or one signed-in identity.
#[derive(Debug, Clone, Default)]
pub struct StaticActor {
    actor: Option<ActorIdentity>,
}

impl StaticActor {
    /// Nobody is signed in.
    #[must_use]
    pub const fn none() -> Self {
        Self { actor: None }
    }

    /// A signed-in actor with the given name and token.
    #[must_use]
    pub fn signed_in(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            actor: Some(ActorIdentity {
                name: name.into(),
                token: token.into(),
            }),
        }
    }
}

impl ActorProvider for StaticActor {
    fn current_actor(&self) -> Option<ActorIdentity> {
        self.actor.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trips_a_run() {
        let storage = MemoryRunStorage::new();
        let mut run = ScenarioProgress::new(7);
        run.record_advance(Some(1), 3);
        storage.save_run(&run).unwrap();
        assert_eq!(storage.load_run().unwrap(), Some(run));
    }

    #[test]
    fn memory_storage_treats_corruption_as_no_run() {
        let storage = MemoryRunStorage::with_raw("{not json");
        assert_eq!(storage.load_run().unwrap(), None);
        // The corrupt record was discarded, not kept around.
        assert!(storage.stored_json().is_none());
    }

    #[test]
    fn memory_storage_clear_is_idempotent() {
        let storage = MemoryRunStorage::new();
        storage.clear_run().unwrap();
        storage.save_run(&ScenarioProgress::new(0)).unwrap();
        storage.clear_run().unwrap();
        storage.clear_run().unwrap();
        assert_eq!(storage.load_run().unwrap(), None);
    }

    #[test]
    fn static_actor_reports_sign_in_state() {
        assert!(StaticActor::none().current_actor().is_none());
        let actor = StaticActor::signed_in("mira", "tok-123").current_actor().unwrap();
        assert_eq!(actor.name, "mira");
        assert_eq!(actor.token, "tok-123");
    }
}
