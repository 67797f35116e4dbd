mod ledger;
mod play;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use fateforge_game::{
    DecisionCatalog, DecisionId, ScenarioEngine, StaticActor, SubmitError,
};
use ledger::HttpScoreLedger;
use play::{CliEngine, RunSummary};
use storage::FileRunStorage;

const TOKEN_ENV_VAR: &str = "FATEFORGE_TOKEN";

#[derive(Debug, Parser)]
#[command(name = "fateforge", version)]
#[command(about = "Fateforge - a branching tale of the Dread King's fall")]
struct Args {
    /// Path of the local save file
    #[arg(long, default_value = "fateforge-save.json")]
    save_file: PathBuf,

    /// Base URL of the score ledger
    #[arg(long, default_value = "http://localhost:8080")]
    ledger_url: String,

    /// Display name for the leaderboard
    #[arg(long, default_value = "adventurer")]
    player: String,

    /// Bearer token for the ledger (falls back to FATEFORGE_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Play a scripted run: comma-separated decision ids, one per branch
    #[arg(long)]
    choices: Option<String>,

    /// Print the finished run as JSON instead of prose
    #[arg(long)]
    json: bool,

    /// List the decision catalog and exit
    #[arg(long)]
    list_decisions: bool,

    /// Discard the persisted run and exit
    #[arg(long)]
    discard: bool,

    /// Keep the finished run local; never contact the ledger
    #[arg(long)]
    no_submit: bool,
}

impl Args {
    fn actor(&self) -> StaticActor {
        let token = self
            .token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok());
        match token {
            Some(token) => StaticActor::signed_in(self.player.clone(), token),
            None => StaticActor::none(),
        }
    }
}

fn parse_choices(raw: &str) -> Result<Vec<DecisionId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<DecisionId>()
                .with_context(|| format!("'{part}' is not a decision id"))
        })
        .collect()
}

fn list_decisions() {
    let catalog = DecisionCatalog::load_from_static();
    println!("Available decisions:");
    for decision in &catalog {
        let archetype = decision
            .archetype
            .map(|a| format!("  ({a})"))
            .unwrap_or_default();
        println!("  {:>3}  {}{archetype}", decision.id, decision.text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_decisions {
        list_decisions();
        return Ok(());
    }

    let storage = FileRunStorage::new(&args.save_file);
    let ledger = HttpScoreLedger::new(&args.ledger_url);
    let mut engine = ScenarioEngine::new(storage, ledger, args.actor())
        .with_context(|| format!("could not read save file {}", args.save_file.display()))?;

    if args.discard {
        engine
            .discard_current_run()
            .context("could not discard the save")?;
        println!("Save discarded.");
        return Ok(());
    }

    match &args.choices {
        Some(raw) => {
            let script = parse_choices(raw)?;
            play::run_scripted(&mut engine, &script, args.json)?;
        }
        None => play::run_interactive(&mut engine)?,
    }

    if engine.is_finished() {
        finish(&mut engine, &args).await?;
    }
    Ok(())
}

async fn finish(engine: &mut CliEngine, args: &Args) -> Result<()> {
    if args.json {
        let summary = RunSummary::from_engine(engine).context("finished run went missing")?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let grade = engine.outcome_rating().context("finished run went missing")?;
        let hero = engine
            .hero_archetype()
            .map_or_else(|| "unknown".to_string(), |a| a.to_string());
        println!();
        println!(
            "{} Hero: {}  Grade: {}",
            "The tale is told.".bold(),
            hero.cyan(),
            grade.to_string().green().bold()
        );
    }

    if args.no_submit {
        log::info!("submission skipped; run kept at {}", args.save_file.display());
        return Ok(());
    }

    // Interactive runs ask first; scripted runs submit right away.
    if args.choices.is_none() && !confirm_submission()? {
        println!("Kept locally. Run again to submit or pass --discard to drop it.");
        return Ok(());
    }

    match engine.submit_current_run().await {
        Ok(record) => {
            println!(
                "Score posted to the ledger ({} as {}). Local save cleared.",
                record.rating_grade,
                record.owner_name.as_deref().unwrap_or("anonymous")
            );
        }
        Err(SubmitError::NotAuthenticated) => {
            println!(
                "{}",
                format!(
                    "Not signed in: pass --token or set {TOKEN_ENV_VAR} to post this score. \
                     The run is kept locally; resubmit any time."
                )
                .yellow()
            );
        }
        Err(SubmitError::Ledger(err)) => {
            println!("{}", format!("{}: {}", err.title, err.message).red());
            for field in &err.field_errors {
                println!("  - {}: {}", field.field, field.message);
            }
            println!("The run is kept locally; resubmit any time.");
        }
        Err(err) => return Err(err).context("score submission failed"),
    }
    Ok(())
}

fn confirm_submission() -> Result<bool> {
    use std::io::Write;
    print!("Post this score to the ledger? [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
