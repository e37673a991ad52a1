//! JSON API for team generation
//!
//! String in, string out, for front ends that only speak JSON.

use crate::engine::{find_best_swap, AnnealConfig, Balancer, BalancerConfig, Metrics, SwapSuggestion};
use crate::error::{BalanceError, Result};
use crate::export::render_message;
use crate::models::{Allocation, Player, PlayerDraft, PlayerId, PlayerValidator, TeamShape, ValidationError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

pub const SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    SCHEMA_VERSION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub players: Vec<PlayerDraft>,
    pub players_per_team: usize,
    pub number_of_teams: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub anneal: Option<AnnealConfig>,
    /// Apply best swaps until settled after generating.
    #[serde(default)]
    pub refine: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub schema_version: u8,
    pub teams: Allocation,
    pub strengths: Vec<f64>,
    pub variance: f64,
    /// Zero-based index of the bib team.
    pub bib_team: usize,
    pub suggestion: Option<SwapSuggestion>,
    pub message: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    pub teams: Allocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapResponse {
    pub schema_version: u8,
    pub strengths: Vec<f64>,
    pub variance: f64,
    pub suggestion: Option<SwapSuggestion>,
}

fn check_schema(version: u8) -> Result<()> {
    if version != SCHEMA_VERSION {
        return Err(BalanceError::InvalidInput(format!(
            "unsupported schema version {version}, expected {SCHEMA_VERSION}"
        )));
    }
    Ok(())
}

fn admit_players(drafts: &[PlayerDraft]) -> Result<Vec<Player>> {
    let mut names = HashSet::with_capacity(drafts.len());
    drafts
        .iter()
        .enumerate()
        .map(|(i, draft)| {
            PlayerValidator::validate_draft(draft)?;
            let name = draft.name.trim().to_string();
            if !names.insert(name.clone()) {
                return Err(ValidationError::DuplicateName(name).into());
            }
            Ok(Player {
                id: PlayerId(i as u32 + 1),
                name,
                rating: draft.rating,
                is_gk: draft.is_goalkeeper(),
                position: draft.position,
            })
        })
        .collect()
}

pub fn generate_teams(request: &GenerateRequest) -> Result<GenerateResponse> {
    check_schema(request.schema_version)?;
    let shape = TeamShape::new(request.number_of_teams, request.players_per_team)?;
    let players = admit_players(&request.players)?;

    let mut config = BalancerConfig::new(shape);
    config.anneal = request.anneal.clone();
    config.seed = request.seed;
    let mut balancer = Balancer::new(config)?;

    let generated = balancer.generate(&players)?;
    let mut allocation = generated.allocation;
    let mut metrics = generated.metrics;
    let mut warnings = Vec::new();

    if let Some(reason) = generated.anneal.and_then(|r| r.halted) {
        warnings.push(format!("annealing stopped early: {reason}"));
    }

    if request.refine {
        match balancer.refine(&mut allocation) {
            Ok(report) => metrics = report.metrics,
            Err(BalanceError::BudgetExceeded(reason)) => {
                warn!(reason = %reason, "refinement hit its round cap");
                warnings.push(reason);
                metrics = Metrics::of(&allocation)?;
            }
            Err(e) => return Err(e),
        }
    }

    let bib_team = balancer.rng_mut().gen_range(0..shape.teams);
    let suggestion = find_best_swap(&allocation)?;
    let message = render_message(&allocation, Some(bib_team));

    info!(players = players.len(), variance = metrics.variance, "generate request served");
    Ok(GenerateResponse {
        schema_version: SCHEMA_VERSION,
        teams: allocation,
        strengths: metrics.strengths,
        variance: metrics.variance,
        bib_team,
        suggestion,
        message,
        warnings,
    })
}

pub fn generate_teams_json(request_json: &str) -> Result<String> {
    let request: GenerateRequest = serde_json::from_str(request_json)?;
    let response = generate_teams(&request)?;
    Ok(serde_json::to_string(&response)?)
}

pub fn suggest_swap(request: &SwapRequest) -> Result<SwapResponse> {
    check_schema(request.schema_version)?;
    let metrics = Metrics::of(&request.teams)?;
    let suggestion = find_best_swap(&request.teams)?;
    Ok(SwapResponse {
        schema_version: SCHEMA_VERSION,
        strengths: metrics.strengths,
        variance: metrics.variance,
        suggestion,
    })
}

pub fn suggest_swap_json(request_json: &str) -> Result<String> {
    let request: SwapRequest = serde_json::from_str(request_json)?;
    let response = suggest_swap(&request)?;
    Ok(serde_json::to_string(&response)?)
}
