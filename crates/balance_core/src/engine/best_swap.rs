//! Exhaustive single-swap search
//!
//! Every cross-team pair of players is tried once. Candidates are scored
//! without touching the allocation; only the two affected team strengths are
//! recomputed per candidate.

use super::fitness::{team_strengths, variance};
use crate::error::{BalanceError, Result};
use crate::models::{Allocation, Player, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Best improving swap found for an allocation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapSuggestion {
    pub team_a: usize,
    pub player_a: PlayerId,
    pub name_a: String,
    pub team_b: usize,
    pub player_b: PlayerId,
    pub name_b: String,
    pub current_variance: f64,
    pub new_variance: f64,
    /// `current_variance - new_variance`, always positive.
    pub delta: f64,
}

/// Strength of `team` if the player in `slot` were replaced by `incoming`.
/// Sums in slot order so the result matches scoring the swapped team directly.
fn swapped_strength(team: &[Player], slot: usize, incoming: &Player) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    let total: f64 = team
        .iter()
        .enumerate()
        .map(|(k, p)| if k == slot { incoming.rating } else { p.rating })
        .sum();
    total / team.len() as f64
}

/// Search all swaps and return the one with the lowest resulting variance, if
/// it is strictly lower than the current variance.
///
/// Team pairs `(i, j)` with `i < j` are visited in ascending order, then the
/// players of `i` and of `j` in team order. Ties keep the first candidate.
pub fn find_best_swap(allocation: &Allocation) -> Result<Option<SwapSuggestion>> {
    let base = team_strengths(allocation);
    let current_variance = variance(&base)?;

    let mut best: Option<(usize, usize, usize, usize, f64)> = None;
    let mut best_variance = current_variance;
    let mut scratch = base.clone();

    let n = allocation.team_count();
    for ti in 0..n {
        for tj in (ti + 1)..n {
            let team_i = &allocation.teams[ti].players;
            let team_j = &allocation.teams[tj].players;
            for (si, pi) in team_i.iter().enumerate() {
                for (sj, pj) in team_j.iter().enumerate() {
                    scratch[ti] = swapped_strength(team_i, si, pj);
                    scratch[tj] = swapped_strength(team_j, sj, pi);
                    let candidate = variance(&scratch)?;
                    if candidate < best_variance {
                        best_variance = candidate;
                        best = Some((ti, si, tj, sj, candidate));
                    }
                }
            }
            scratch[ti] = base[ti];
            scratch[tj] = base[tj];
        }
    }

    let suggestion = best.map(|(ti, si, tj, sj, new_variance)| {
        let pi = &allocation.teams[ti].players[si];
        let pj = &allocation.teams[tj].players[sj];
        SwapSuggestion {
            team_a: ti,
            player_a: pi.id,
            name_a: pi.name.clone(),
            team_b: tj,
            player_b: pj.id,
            name_b: pj.name.clone(),
            current_variance,
            new_variance,
            delta: current_variance - new_variance,
        }
    });

    match &suggestion {
        Some(s) => debug!(
            from = current_variance,
            to = s.new_variance,
            a = %s.name_a,
            b = %s.name_b,
            "best swap found"
        ),
        None => debug!(variance = current_variance, "no improving swap"),
    }
    Ok(suggestion)
}

/// Apply a previously suggested swap.
///
/// Fails with `StaleReference` if either player has left its stated team since
/// the suggestion was made. The allocation is untouched on failure.
pub fn apply_swap(allocation: &mut Allocation, suggestion: &SwapSuggestion) -> Result<()> {
    let stale = |team: usize, name: &str| BalanceError::StaleReference {
        team,
        player: name.to_string(),
    };
    if suggestion.team_a == suggestion.team_b {
        return Err(BalanceError::InvalidInput("swap must involve two different teams".to_string()));
    }
    let slot_a = allocation
        .team(suggestion.team_a)
        .and_then(|t| t.position_of(suggestion.player_a))
        .ok_or_else(|| stale(suggestion.team_a, &suggestion.name_a))?;
    let slot_b = allocation
        .team(suggestion.team_b)
        .and_then(|t| t.position_of(suggestion.player_b))
        .ok_or_else(|| stale(suggestion.team_b, &suggestion.name_b))?;

    allocation.swap_slots(suggestion.team_a, slot_a, suggestion.team_b, slot_b);
    Ok(())
}

/// Unconditionally exchange two players identified by team and id.
///
/// Fails with `NotFound` when a team index is out of range or the player is
/// not in the stated team.
pub fn swap_players(
    allocation: &mut Allocation,
    team_a: usize,
    player_a: PlayerId,
    team_b: usize,
    player_b: PlayerId,
) -> Result<()> {
    if team_a == team_b {
        return Err(BalanceError::InvalidInput("swap must involve two different teams".to_string()));
    }
    let find = |team: usize, id: PlayerId| {
        allocation
            .team(team)
            .and_then(|t| t.position_of(id))
            .ok_or(BalanceError::NotFound { team, player: id.to_string() })
    };
    let slot_a = find(team_a, player_a)?;
    let slot_b = find(team_b, player_b)?;

    allocation.swap_slots(team_a, slot_a, team_b, slot_b);
    Ok(())
}
