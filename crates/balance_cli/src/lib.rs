//! Helpers behind the `teamgen` binary: player files and config overrides.

use anyhow::{bail, Context, Result};
use balance_core::engine::{BalancerConfig, MatchFormat};
use balance_core::models::PlayerDraft;
use std::fs;
use std::path::Path;

/// Command line overrides applied on top of a loaded [`BalancerConfig`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub format: Option<usize>,
    pub per_team: Option<usize>,
    pub teams: Option<usize>,
    pub seed: Option<u64>,
    pub anneal: bool,
    pub iterations: Option<usize>,
}

/// Read a JSON array of players (`name`, `rating`, `position`, optional `is_gk`).
pub fn load_players(path: &Path) -> Result<Vec<PlayerDraft>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read players file {}", path.display()))?;
    let drafts: Vec<PlayerDraft> = serde_json::from_str(&content)
        .with_context(|| format!("invalid players file {}", path.display()))?;
    if drafts.is_empty() {
        bail!("players file {} is empty", path.display());
    }
    Ok(drafts)
}

/// Config file given on the command line, else `BALANCE_CONFIG_PATH`, else defaults.
pub fn base_config(path: Option<&Path>) -> Result<BalancerConfig> {
    let config = match path {
        Some(path) => {
            let path = path.to_str().context("config path is not valid UTF-8")?;
            BalancerConfig::load(path)?
        }
        None => BalancerConfig::from_env()?,
    };
    Ok(config)
}

pub fn apply_overrides(mut config: BalancerConfig, overrides: &Overrides) -> Result<BalancerConfig> {
    let teams = overrides.teams.unwrap_or(config.shape.teams);

    let format = match (overrides.per_team, overrides.format) {
        (Some(per_team), _) => MatchFormat::Custom(per_team),
        (None, Some(size)) => match MatchFormat::from_players(size) {
            MatchFormat::Custom(other) => bail!("unknown format {other}, expected 5, 7, 8 or 11"),
            preset => preset,
        },
        (None, None) => MatchFormat::from_players(config.shape.per_team),
    };
    config.shape = BalancerConfig::for_format(format, teams)?.shape;

    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }

    if overrides.anneal || overrides.iterations.is_some() {
        let mut schedule = config.anneal.take().unwrap_or_default();
        if let Some(iterations) = overrides.iterations {
            schedule.iterations = iterations;
        }
        config.anneal = Some(schedule);
    }

    config.validate()?;
    Ok(config)
}
