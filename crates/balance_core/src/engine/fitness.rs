//! Balance metrics
//!
//! A team's strength is the mean rating of its players; an allocation's
//! imbalance is the population variance of its team strengths.

use crate::error::{BalanceError, Result};
use crate::models::{Allocation, Player};
use serde::{Deserialize, Serialize};

/// Mean rating. An empty team has strength 0.
pub fn strength(players: &[Player]) -> f64 {
    if players.is_empty() {
        return 0.0;
    }
    players.iter().map(|p| p.rating).sum::<f64>() / players.len() as f64
}

/// Population variance (divides by `n`).
pub fn variance(strengths: &[f64]) -> Result<f64> {
    if strengths.is_empty() {
        return Err(BalanceError::InvalidInput(
            "variance of an empty strength sequence is undefined".to_string(),
        ));
    }
    let n = strengths.len() as f64;
    let mean = strengths.iter().sum::<f64>() / n;
    Ok(strengths.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n)
}

pub fn team_strengths(allocation: &Allocation) -> Vec<f64> {
    allocation.teams.iter().map(|t| strength(&t.players)).collect()
}

pub fn allocation_variance(allocation: &Allocation) -> Result<f64> {
    variance(&team_strengths(allocation))
}

/// Per-team strength plus overall variance for one allocation state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    pub strengths: Vec<f64>,
    pub variance: f64,
}

impl Metrics {
    pub fn of(allocation: &Allocation) -> Result<Self> {
        let strengths = team_strengths(allocation);
        let variance = variance(&strengths)?;
        Ok(Self { strengths, variance })
    }
}
