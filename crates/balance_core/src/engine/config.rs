//! Balancer configuration
//!
//! Shape of the match, optional annealing schedule and RNG seed. Presets cover
//! the usual small-sided formats; a JSON override file can be named through
//! the `BALANCE_CONFIG_PATH` environment variable.

use super::anneal::AnnealConfig;
use crate::error::{BalanceError, Result};
use crate::models::TeamShape;
use serde::{Deserialize, Serialize};
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "BALANCE_CONFIG_PATH";

pub const MIN_CUSTOM_PER_TEAM: usize = 3;
pub const MIN_TEAMS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchFormat {
    #[serde(rename = "5-a-side")]
    FiveASide,
    #[serde(rename = "7-a-side")]
    SevenASide,
    #[serde(rename = "8-a-side")]
    EightASide,
    #[serde(rename = "11-a-side")]
    ElevenASide,
    #[serde(rename = "custom")]
    Custom(usize),
}

impl MatchFormat {
    pub fn players_per_team(&self) -> usize {
        match self {
            MatchFormat::FiveASide => 5,
            MatchFormat::SevenASide => 7,
            MatchFormat::EightASide => 8,
            MatchFormat::ElevenASide => 11,
            MatchFormat::Custom(n) => *n,
        }
    }

    /// Named format for a side size, `Custom` otherwise.
    pub fn from_players(per_team: usize) -> Self {
        match per_team {
            5 => MatchFormat::FiveASide,
            7 => MatchFormat::SevenASide,
            8 => MatchFormat::EightASide,
            11 => MatchFormat::ElevenASide,
            n => MatchFormat::Custom(n),
        }
    }

    pub fn label(&self) -> String {
        format!("{}-a-side", self.players_per_team())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancerConfig {
    pub shape: TeamShape,
    /// Annealing pass run after partitioning; `None` skips it.
    #[serde(default)]
    pub anneal: Option<AnnealConfig>,
    /// Fixed seed for reproducible generations.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Cap on best-swap rounds during refinement.
    #[serde(default = "default_max_refine_rounds")]
    pub max_refine_rounds: usize,
}

fn default_max_refine_rounds() -> usize {
    64
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            shape: TeamShape::default(),
            anneal: None,
            seed: None,
            max_refine_rounds: default_max_refine_rounds(),
        }
    }
}

impl BalancerConfig {
    pub fn new(shape: TeamShape) -> Self {
        Self { shape, ..Self::default() }
    }

    /// Preset for a match format. Custom sides need at least three players and
    /// every preset needs at least two teams.
    pub fn for_format(format: MatchFormat, teams: usize) -> Result<Self> {
        if let MatchFormat::Custom(n) = format {
            if n < MIN_CUSTOM_PER_TEAM {
                return Err(BalanceError::InvalidInput(format!(
                    "custom formats need at least {MIN_CUSTOM_PER_TEAM} players per team, got {n}"
                )));
            }
        }
        if teams < MIN_TEAMS {
            return Err(BalanceError::InvalidInput(format!(
                "at least {MIN_TEAMS} teams are required, got {teams}"
            )));
        }
        Ok(Self::new(TeamShape::new(teams, format.players_per_team())?))
    }

    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = Some(anneal);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;
        if let Some(anneal) = &self.anneal {
            anneal.validate()?;
        }
        if self.max_refine_rounds == 0 {
            return Err(BalanceError::InvalidInput(
                "max_refine_rounds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BalanceError::Config(format!("Failed to read config file '{path}': {e}")))?;
        Self::from_json(&content).map_err(|e| {
            BalanceError::Config(format!("Invalid config in '{path}': {e}"))
        })
    }

    /// Load the file named by `BALANCE_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::load(path)
    }
}
