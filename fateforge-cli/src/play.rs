//! Scene rendering and the scripted/interactive play drivers.
use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use fateforge_game::{DecisionId, Grade, HeroArchetype, ScenarioEngine, SceneView, StaticActor};

use crate::ledger::HttpScoreLedger;
use crate::storage::FileRunStorage;

pub type CliEngine = ScenarioEngine<FileRunStorage, HttpScoreLedger, StaticActor>;

/// Upper bound on steps per run; the longest designed path is 11.
const MAX_STEPS: usize = 64;

/// What a finished run looks like on stdout with `--json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub grade: Grade,
    pub hero_archetype: Option<HeroArchetype>,
    pub decisions: Vec<DecisionId>,
    pub started_at: i64,
}

impl RunSummary {
    #[must_use]
    pub fn from_engine(engine: &CliEngine) -> Option<Self> {
        let run = engine.run()?;
        Some(Self {
            grade: engine.outcome_rating()?,
            hero_archetype: engine.hero_archetype(),
            decisions: run.decisions_taken.clone(),
            started_at: run.started_at,
        })
    }
}

fn render_scene(view: &SceneView) {
    println!();
    println!("{}", format!("[{}]", view.illustration).dimmed());
    println!("{}", view.text);
    for (index, decision) in view.decisions.iter().enumerate() {
        println!("  {} {}", format!("{}.", index + 1).bold(), decision.text);
    }
}

/// Play a run from a decision script, consuming one entry per branch beat.
/// Linear beats advance on their own.
pub fn run_scripted(engine: &mut CliEngine, script: &[DecisionId], quiet: bool) -> Result<()> {
    let mut script = script.iter();
    for _ in 0..MAX_STEPS {
        if engine.is_finished() {
            return Ok(());
        }
        let view = engine.scene_view();
        if engine.run().is_some() && !quiet {
            render_scene(&view);
        }
        let decision = if view.decisions.is_empty() {
            None
        } else {
            let Some(&choice) = script.next() else {
                bail!("decision script ran out at state {}", engine.current_state());
            };
            if !view.decisions.iter().any(|d| d.id == choice) {
                bail!(
                    "decision {choice} is not offered at state {}",
                    engine.current_state()
                );
            }
            Some(choice)
        };
        engine
            .advance(decision)
            .context("could not persist the run")?;
    }
    bail!("the story did not finish within {MAX_STEPS} steps");
}

/// Interactive loop: render each beat, read the player's pick from stdin.
/// `q` stops and keeps the save for next time.
pub fn run_interactive(engine: &mut CliEngine) -> Result<()> {
    // Enter the prologue before the first render.
    if engine.run().is_none() {
        engine
            .advance(None)
            .context("could not persist the run")?;
    }
    let stdin = io::stdin();
    for _ in 0..MAX_STEPS * 4 {
        if engine.is_finished() {
            return Ok(());
        }
        let view = engine.scene_view();
        render_scene(&view);
        let decision = if view.decisions.is_empty() {
            print!("{}", "[Enter] to continue, q to quit: ".dimmed());
            io::stdout().flush()?;
            let mut line = String::new();
            stdin.read_line(&mut line)?;
            if line.trim().eq_ignore_ascii_case("q") {
                println!("Saved. See you on the road.");
                return Ok(());
            }
            None
        } else {
            print!("{}", "Your choice (number, q to quit): ".dimmed());
            io::stdout().flush()?;
            let mut line = String::new();
            stdin.read_line(&mut line)?;
            let input = line.trim();
            if input.eq_ignore_ascii_case("q") {
                println!("Saved. See you on the road.");
                return Ok(());
            }
            match input.parse::<usize>() {
                Ok(pick) if (1..=view.decisions.len()).contains(&pick) => {
                    Some(view.decisions[pick - 1].id)
                }
                _ => {
                    println!("{}", "Pick one of the numbered choices.".yellow());
                    continue;
                }
            }
        };
        engine
            .advance(decision)
            .context("could not persist the run")?;
    }
    bail!("too many turns without reaching an ending");
}
