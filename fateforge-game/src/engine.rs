//! The progression engine: owns the one run on this device and drives it
//! through the story graph, persistence and score submission.
use chrono::Utc;

use crate::decisions::{Decision, DecisionCatalog, DecisionId, HeroArchetype};
use crate::ledger::{LedgerError, RemoteRecord, ScorePayload};
use crate::progress::{RunPhase, ScenarioProgress};
use crate::rating::{Grade, compute_rating};
use crate::scenarios::{STATE_NONE, ScenarioCatalog, StateId};
use crate::transition::next_state;
use crate::{ActorProvider, RunStorage, ScoreLedger};

/// Everything the UI needs to render the current beat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView {
    pub text: String,
    pub illustration: String,
    /// Decisions offered at this beat, resolved to full catalog entries.
    /// Empty means "tap to continue".
    pub decisions: Vec<Decision>,
}

/// Why a submission attempt did not produce a remote record.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError<E>
where
    E: std::error::Error,
{
    #[error("no run exists on this device")]
    NoRun,
    #[error("the run has not reached an ending yet")]
    NotFinished,
    /// The caller should route the player to sign-in; the ledger is never
    /// contacted without an actor.
    #[error("sign in before submitting a score")]
    NotAuthenticated,
    #[error("the run carries no archetype-fixing decision")]
    NoArchetype,
    /// The run stays persisted so the player can resubmit.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("storage error: {0}")]
    Storage(E),
}

/// Drives one player's run. Owns the catalogs and the platform seams; the
/// run itself is an explicit field, not module state, so independent
/// engines can coexist in tests.
pub struct ScenarioEngine<S, L, A>
where
    S: RunStorage,
    L: ScoreLedger,
    A: ActorProvider,
{
    decisions: DecisionCatalog,
    scenarios: ScenarioCatalog,
    storage: S,
    ledger: L,
    auth: A,
    run: Option<ScenarioProgress>,
}

impl<S, L, A> ScenarioEngine<S, L, A>
where
    S: RunStorage,
    L: ScoreLedger,
    A: ActorProvider,
{
    /// Build an engine over the shipped catalogs and resume any persisted
    /// run. A record the storage could not parse counts as no run.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend itself fails.
    pub fn new(storage: S, ledger: L, auth: A) -> Result<Self, S::Error> {
        Self::with_catalogs(
            DecisionCatalog::load_from_static(),
            ScenarioCatalog::load_from_static(),
            storage,
            ledger,
            auth,
        )
    }

    /// Build an engine over explicit catalogs (tests exercise drifted or
    /// empty catalogs this way).
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend itself fails.
    pub fn with_catalogs(
        decisions: DecisionCatalog,
        scenarios: ScenarioCatalog,
        storage: S,
        ledger: L,
        auth: A,
    ) -> Result<Self, S::Error> {
        let run = storage.load_run()?;
        Ok(Self {
            decisions,
            scenarios,
            storage,
            ledger,
            auth,
            run,
        })
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        match &self.run {
            None => RunPhase::NoRun,
            Some(run) if run.is_finished() => RunPhase::Finished,
            Some(_) => RunPhase::InProgress,
        }
    }

    #[must_use]
    pub fn current_state(&self) -> StateId {
        self.run.as_ref().map_or(STATE_NONE, |run| run.current_state)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.run.as_ref().is_some_and(ScenarioProgress::is_finished)
    }

    /// The run record, if one exists.
    #[must_use]
    pub fn run(&self) -> Option<&ScenarioProgress> {
        self.run.as_ref()
    }

    /// Resolve the current state through the catalogs. Unknown states come
    /// back with placeholder text and the not-found illustration.
    #[must_use]
    pub fn scene_view(&self) -> SceneView {
        let state = self.current_state();
        let decisions = self
            .scenarios
            .offered(state)
            .iter()
            .filter_map(|&id| self.decisions.get(id))
            .cloned()
            .collect();
        SceneView {
            text: self.scenarios.narrative(state).to_string(),
            illustration: self.scenarios.illustration(state).to_string(),
            decisions,
        }
    }

    /// Advance the run by one step and persist the result.
    ///
    /// The first call creates the run. A decision is recorded only when the
    /// current beat actually offers it; anything else is treated as no
    /// decision, so branch beats self-loop ("awaiting input") without
    /// polluting the history. Advancing a finished run is a silent no-op:
    /// terminal screens tend to double-fire.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated record fails; the
    /// in-memory run is not advanced in that case.
    pub fn advance(&mut self, decision: Option<DecisionId>) -> Result<RunPhase, S::Error> {
        if self.is_finished() {
            return Ok(RunPhase::Finished);
        }
        let mut run = self
            .run
            .clone()
            .unwrap_or_else(|| ScenarioProgress::new(Utc::now().timestamp_millis()));
        let taken = decision.filter(|&d| self.scenarios.offers(run.current_state, d));
        let next = next_state(run.current_state, taken, &run.decisions_taken);
        if taken.is_none() && next == run.current_state && self.run.is_some() {
            // Awaiting input at a branch: nothing mutated, nothing to write.
            return Ok(self.phase());
        }
        run.record_advance(taken, next);
        self.storage.save_run(&run)?;
        self.run = Some(run);
        Ok(self.phase())
    }

    /// The grade for a finished run; `None` while the story is still going.
    #[must_use]
    pub fn outcome_rating(&self) -> Option<Grade> {
        self.run
            .as_ref()
            .filter(|run| run.is_finished())
            .map(|run| compute_rating(&run.decisions_taken))
    }

    /// The archetype fixed by the opening-branch decision, if one was made.
    #[must_use]
    pub fn hero_archetype(&self) -> Option<HeroArchetype> {
        self.run
            .as_ref()
            .and_then(ScenarioProgress::first_decision)
            .and_then(|id| self.decisions.archetype(id))
    }

    /// Submit the finished run to the remote ledger and, only on confirmed
    /// success, delete the local record. On any failure the record stays so
    /// the player can retry by resubmitting.
    ///
    /// # Errors
    ///
    /// See [`SubmitError`] for the ways this can refuse or fail.
    pub async fn submit_current_run(&mut self) -> Result<RemoteRecord, SubmitError<S::Error>> {
        let run = self.run.as_ref().ok_or(SubmitError::NoRun)?;
        if !run.is_finished() {
            return Err(SubmitError::NotFinished);
        }
        let actor = self
            .auth
            .current_actor()
            .ok_or(SubmitError::NotAuthenticated)?;
        let hero_archetype = run
            .first_decision()
            .and_then(|id| self.decisions.archetype(id))
            .ok_or(SubmitError::NoArchetype)?;
        let payload = ScorePayload {
            rating_grade: compute_rating(&run.decisions_taken),
            hero_archetype,
            decisions: run.decisions_taken.clone(),
        };
        let record = self.ledger.submit_score(&actor, &payload).await?;
        self.storage.clear_run().map_err(SubmitError::Storage)?;
        self.run = None;
        Ok(record)
    }

    /// Throw the run away without submitting. No remote call is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails to clear the record.
    pub fn discard_current_run(&mut self) -> Result<(), S::Error> {
        self.storage.clear_run()?;
        self.run = None;
        Ok(())
    }
}
