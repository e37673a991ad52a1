//! teamgen - split a pickup game into even teams

use anyhow::{Context, Result};
use balance_cli::{apply_overrides, base_config, load_players, Overrides};
use balance_core::export::{describe_swap, render_metrics};
use balance_core::engine::MatchFormat;
use balance_core::models::{Roster, RosterEntry};
use balance_core::{BalanceError, BalanceSession};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "teamgen")]
#[command(about = "Balance players into even teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the saved roster grouped by position
    Roster,

    /// Generate balanced teams
    Generate {
        /// JSON array of players; the saved roster is used when omitted
        #[arg(long)]
        players: Option<PathBuf>,

        /// Match format: 5, 7, 8 or 11 a side
        #[arg(long)]
        format: Option<usize>,

        /// Custom players per team (at least 3)
        #[arg(long)]
        per_team: Option<usize>,

        /// Number of teams
        #[arg(long)]
        teams: Option<usize>,

        /// Seed for reproducible teams
        #[arg(long)]
        seed: Option<u64>,

        /// Run simulated annealing after the initial split
        #[arg(long, default_value = "false")]
        anneal: bool,

        /// Annealing iterations (implies --anneal)
        #[arg(long)]
        iterations: Option<usize>,

        /// Apply best swaps until none improves
        #[arg(long, default_value = "false")]
        refine: bool,

        /// Balancer config JSON (overrides BALANCE_CONFIG_PATH)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Roster => print_roster(),
        Commands::Generate { players, format, per_team, teams, seed, anneal, iterations, refine, config } => {
            let overrides = Overrides { format, per_team, teams, seed, anneal, iterations };
            generate(players, config, &overrides, refine)
        }
    }
}

fn print_roster() -> Result<()> {
    let roster = Roster::saved();
    let entries: Vec<&RosterEntry> = roster.entries.iter().collect();
    for (section, members) in Roster::grouped(&entries) {
        println!("{section}");
        for entry in members {
            let gk = if entry.is_gk { " (GK)" } else { "" };
            println!("  {:<12} {:>4.1}{gk}", entry.name, entry.rating);
        }
    }
    Ok(())
}

fn generate(
    players: Option<PathBuf>,
    config: Option<PathBuf>,
    overrides: &Overrides,
    refine: bool,
) -> Result<()> {
    let config = apply_overrides(base_config(config.as_deref())?, overrides)?;
    let shape = config.shape;
    info!(
        teams = shape.teams,
        format = %MatchFormat::from_players(shape.per_team).label(),
        seed = ?config.seed,
        "generating teams"
    );

    let mut session = BalanceSession::new(config)?;
    session.confirm_setup(shape)?;
    match players {
        Some(path) => {
            for draft in load_players(&path)? {
                session
                    .add_player(&draft)
                    .with_context(|| format!("cannot add player '{}'", draft.name))?;
            }
        }
        None => {
            session.add_from_roster(&Roster::saved().entries)?;
        }
    }

    session.generate()?;

    if refine {
        match session.refine() {
            Ok(report) => info!(swaps = report.swaps.len(), "refinement settled"),
            Err(BalanceError::BudgetExceeded(reason)) => warn!("{reason}"),
            Err(e) => return Err(e.into()),
        }
    }

    let metrics = session.metrics().context("no teams generated")?;
    println!("{}", render_metrics(metrics));

    if let Some(report) = session.last_anneal() {
        println!(
            "Annealing: {:.4} → {:.4} ({} of {} moves accepted)",
            report.initial_variance, report.variance, report.accepted, report.iterations
        );
        if let Some(reason) = &report.halted {
            warn!("annealing stopped early: {reason}");
        }
    }

    match session.suggest_swap()? {
        Some(suggestion) => println!("{}", describe_swap(&suggestion)),
        None => println!("No single swap improves balance"),
    }

    println!();
    println!("{}", session.message().unwrap_or_default());
    Ok(())
}
