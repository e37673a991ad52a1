//! Initial allocation with goalkeeper seeding
//!
//! Goalkeepers and outfield players are shuffled separately. Each team takes
//! one goalkeeper while they last, then everyone else (surplus goalkeepers
//! included) is dealt round-robin into teams that still have room.

use crate::error::{BalanceError, Result};
use crate::models::{Allocation, Player, Team, TeamShape};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Uniformly shuffled copy of `items`. The input is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

pub fn partition<R: Rng + ?Sized>(
    players: &[Player],
    shape: TeamShape,
    rng: &mut R,
) -> Result<Allocation> {
    shape.validate()?;
    if players.len() != shape.total() {
        return Err(BalanceError::ShapeMismatch { expected: shape.total(), found: players.len() });
    }

    let mut seen = HashSet::with_capacity(players.len());
    if let Some(dup) = players.iter().find(|p| !seen.insert(p.id)) {
        return Err(BalanceError::InvalidInput(format!(
            "player {} ({}) supplied more than once",
            dup.id, dup.name
        )));
    }

    let (gks, others): (Vec<Player>, Vec<Player>) = players.iter().cloned().partition(|p| p.is_gk);
    let gks = shuffled(&gks, rng);
    let others = shuffled(&others, rng);

    let mut teams: Vec<Team> = (0..shape.teams).map(|_| Team::with_capacity(shape.per_team)).collect();

    let seeded = gks.len().min(shape.teams);
    for (team, gk) in teams.iter_mut().zip(gks.iter()) {
        team.players.push(gk.clone());
    }

    let remainder = others.into_iter().chain(gks.into_iter().skip(seeded));
    let mut cursor = 0;
    for player in remainder {
        while teams[cursor].len() >= shape.per_team {
            cursor = (cursor + 1) % shape.teams;
        }
        teams[cursor].players.push(player);
        cursor = (cursor + 1) % shape.teams;
    }

    debug!(teams = shape.teams, per_team = shape.per_team, seeded_gks = seeded, "partitioned players");
    Ok(Allocation::new(teams))
}
