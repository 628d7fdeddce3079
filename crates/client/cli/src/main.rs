//! Headless skirmish runner.
//!
//! Loads content (bundled, or from a data directory), lets the opportunist AI
//! play the player side, and prints the battle log with the board before and
//! after the fight.
mod board;
mod config;
mod report;

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tactics_content::{ConfigLoader, EncounterLoader, ItemLoader, bundled};
use tactics_core::{Encounter, Faction, TurnAdvance};
use tactics_runtime::{
    Event, OpportunistProvider, ProviderRegistry, Session, SessionConfig, SessionStatus, Topic,
};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::config::CliConfig;
use crate::report::BattleLog;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_env().with_args(std::env::args().skip(1));
    let encounter = match &config.data_dir {
        Some(dir) => load_dir(dir)?,
        None => load_bundled()?,
    };

    let mut providers = ProviderRegistry::new();
    providers.register(Faction::Player, OpportunistProvider);
    let mut session = Session::new(encounter, providers, SessionConfig::from_env());
    session.start()?;

    if config.show_board {
        println!("{}", opening_board(session.encounter()));
    }

    let names: HashMap<_, _> = session
        .encounter()
        .roster()
        .iter()
        .map(|unit| (unit.id, unit.name.clone()))
        .collect();
    let log = BattleLog::new(names);
    let mut receivers = session
        .events()
        .subscribe_multiple(&[Topic::Turn, Topic::Combat, Topic::Vision]);

    let max_steps = session.config().max_steps;
    let mut status = SessionStatus::Running;
    while status == SessionStatus::Running {
        if session.steps() >= max_steps {
            anyhow::bail!("skirmish did not finish within {max_steps} steps");
        }
        status = session.step().await?;
        print_events(&log, &mut receivers);
    }

    if let SessionStatus::RoundLimit { round } = status {
        println!("== stalemate after {} rounds ==", round.saturating_sub(1));
    }
    if config.show_board {
        println!("\n{}", board::render(session.encounter(), None));
    }
    Ok(())
}

/// Prints everything published since the last call, topic by topic.
fn print_events(log: &BattleLog, receivers: &mut [(Topic, broadcast::Receiver<Event>)]) {
    for (topic, rx) in receivers.iter_mut() {
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if let Some(line) = log.line(&event) {
                        println!("{line}");
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "cli", topic = ?topic, skipped, "battle log fell behind");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }
}

fn load_bundled() -> Result<Encounter> {
    let rules = ConfigLoader::parse(bundled::CONFIG)?;
    let catalog = ItemLoader::parse(bundled::ITEMS)?;
    let spec = EncounterLoader::parse(bundled::SKIRMISH)?;
    EncounterLoader::build(&spec, &rules, &catalog).context("bundled skirmish is invalid")
}

fn load_dir(dir: &Path) -> Result<Encounter> {
    let rules = ConfigLoader::load(&dir.join("config.toml"))?;
    let catalog = ItemLoader::load(&dir.join("items.ron"))?;
    EncounterLoader::load(&dir.join("skirmish.ron"), &rules, &catalog)
}

/// Board with the first unit's reach overlaid.
fn opening_board(encounter: &Encounter) -> String {
    let mut preview = encounter.clone();
    let first = match preview.advance_turn() {
        TurnAdvance::Next(unit) => Some(unit),
        TurnAdvance::Blocked(_) | TurnAdvance::GameOver => None,
    };
    let reach = first.map(|unit| preview.compute_reachable_selected(unit));
    board::render(&preview, reach.as_ref())
}
