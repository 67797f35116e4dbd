//! The story graph's transition function.
//!
//! The graph is kept as a flat edge table so tests can sweep it for
//! completeness instead of auditing nested conditionals. `next_state` is
//! pure and total: every input resolves to a state, never an error.
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::decisions::{
    DEC_OPEN_GRIMOIRE, DEC_SLIP_INTO_SHADOWS, DEC_TAKE_UP_SWORD, DecisionId,
};
use crate::scenarios::{STATE_FINISHED, STATE_NONE, StateId};

/// The climax gate: the one node that ignores its direct input and branches
/// on the first decision ever recorded in the run.
pub const STATE_CLIMAX_GATE: StateId = 17;

/// Every edge in the story graph. `None` is the "tap to continue" edge of a
/// linear beat; `Some(d)` a branch taken with decision `d`.
const EDGES: &[(StateId, Option<DecisionId>, StateId)] = &[
    // Prologue. The (0, none) edge is the start of a fresh run.
    (STATE_NONE, None, 1),
    (1, None, 2),
    // The call: the opening branch fixes the hero archetype.
    (2, Some(DEC_TAKE_UP_SWORD), 3),
    (2, Some(DEC_OPEN_GRIMOIRE), 7),
    (2, Some(DEC_SLIP_INTO_SHADOWS), 11),
    // Warrior arc.
    (3, None, 4),
    (4, Some(4), 5),
    (4, Some(5), 6),
    (5, None, 15),
    (6, None, 15),
    // Mage arc.
    (7, None, 8),
    (8, Some(6), 9),
    (8, Some(7), 10),
    (9, None, 15),
    (10, None, 15),
    // Rogue arc.
    (11, None, 12),
    (12, Some(8), 13),
    (12, Some(9), 14),
    (13, None, 15),
    (14, None, 15),
    // Convergence and the road to the keep.
    (15, None, 16),
    (16, Some(10), STATE_CLIMAX_GATE),
    (16, Some(11), STATE_CLIMAX_GATE),
    // Archetype confrontations, two endings each.
    (18, Some(13), 19),
    (18, Some(14), 20),
    (21, Some(15), 22),
    (21, Some(16), 23),
    (24, Some(17), 25),
    (24, Some(18), 26),
    // Ending beats flow into the terminal state.
    (19, None, STATE_FINISHED),
    (20, None, STATE_FINISHED),
    (22, None, STATE_FINISHED),
    (23, None, STATE_FINISHED),
    (25, None, STATE_FINISHED),
    (26, None, STATE_FINISHED),
];

static EDGE_TABLE: Lazy<HashMap<(StateId, Option<DecisionId>), StateId>> = Lazy::new(|| {
    EDGES
        .iter()
        .map(|&(state, decision, next)| ((state, decision), next))
        .collect()
});

static STATES_WITH_EDGES: Lazy<std::collections::HashSet<StateId>> =
    Lazy::new(|| EDGES.iter().map(|&(state, _, _)| state).collect());

/// All edges of the graph, exposed for completeness sweeps in tests.
#[must_use]
pub fn edges() -> &'static [(StateId, Option<DecisionId>, StateId)] {
    EDGES
}

/// Advance the story graph by one step.
///
/// Resolution order:
/// 1. the climax gate branches on the first decision in `taken`, ignoring
///    `chosen` entirely;
/// 2. an exact `(current, Some(chosen))` edge;
/// 3. the `(current, None)` edge, so linear beats advance even when handed
///    a stale decision;
/// 4. a self-loop when `current` has edges but none matched, which the UI
///    reads as "awaiting input" at a branch;
/// 5. the `0` sentinel for states the graph does not know.
#[must_use]
pub fn next_state(current: StateId, chosen: Option<DecisionId>, taken: &[DecisionId]) -> StateId {
    if current == STATE_CLIMAX_GATE {
        return climax_branch(taken);
    }
    if chosen.is_some() {
        if let Some(&next) = EDGE_TABLE.get(&(current, chosen)) {
            return next;
        }
    }
    if let Some(&next) = EDGE_TABLE.get(&(current, None)) {
        return next;
    }
    if STATES_WITH_EDGES.contains(&current) {
        current
    } else {
        STATE_NONE
    }
}

/// The climax gate reaches back to the archetype choice made at the very
/// start of the run, not to whatever was tapped at the gate itself.
fn climax_branch(taken: &[DecisionId]) -> StateId {
    match taken.first() {
        Some(&DEC_TAKE_UP_SWORD) => 18,
        Some(&DEC_OPEN_GRIMOIRE) => 21,
        Some(&DEC_SLIP_INTO_SHADOWS) => 24,
        _ => STATE_NONE,
    }
}
