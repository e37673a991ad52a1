use super::{Player, PlayerId};
use crate::error::{BalanceError, Result};
use serde::{Deserialize, Serialize};

/// Target layout: how many teams and how many players in each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamShape {
    pub teams: usize,
    pub per_team: usize,
}

impl Default for TeamShape {
    fn default() -> Self {
        Self { teams: 2, per_team: 5 }
    }
}

impl TeamShape {
    pub fn new(teams: usize, per_team: usize) -> Result<Self> {
        let shape = Self { teams, per_team };
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> Result<()> {
        if self.teams == 0 {
            return Err(BalanceError::InvalidInput("number of teams must be positive".to_string()));
        }
        if self.per_team == 0 {
            return Err(BalanceError::InvalidInput(
                "players per team must be positive".to_string(),
            ));
        }
        if self.teams.checked_mul(self.per_team).is_none() {
            return Err(BalanceError::InvalidInput(format!(
                "{} teams of {} players is too large",
                self.teams, self.per_team
            )));
        }
        Ok(())
    }

    /// Players required to fill every team. Saturates for shapes that fail
    /// [`TeamShape::validate`].
    pub fn total(&self) -> usize {
        self.teams.saturating_mul(self.per_team)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Team {
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(players: Vec<Player>) -> Self {
        Self { players }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { players: Vec::with_capacity(capacity) }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    /// Index of the player within this team, if present.
    pub fn position_of(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn goalkeeper_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_gk).count()
    }

    pub fn strength(&self) -> f64 {
        crate::engine::fitness::strength(&self.players)
    }
}

/// Ordered teams produced by one generation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Allocation {
    pub teams: Vec<Team>,
}

impl Allocation {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn from_rosters(rosters: Vec<Vec<Player>>) -> Self {
        Self { teams: rosters.into_iter().map(Team::new).collect() }
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn team(&self, index: usize) -> Option<&Team> {
        self.teams.get(index)
    }

    pub fn player_count(&self) -> usize {
        self.teams.iter().map(Team::len).sum()
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.teams.iter().flat_map(|t| t.players.iter())
    }

    /// Find a player anywhere in the allocation: `(team, slot)`.
    pub fn locate(&self, id: PlayerId) -> Option<(usize, usize)> {
        self.teams
            .iter()
            .enumerate()
            .find_map(|(ti, team)| team.position_of(id).map(|slot| (ti, slot)))
    }

    /// Exchange two slots in different teams. Callers check bounds first.
    pub(crate) fn swap_slots(&mut self, team_a: usize, slot_a: usize, team_b: usize, slot_b: usize) {
        debug_assert_ne!(team_a, team_b);
        let (lo, lo_slot, hi, hi_slot) = if team_a < team_b {
            (team_a, slot_a, team_b, slot_b)
        } else {
            (team_b, slot_b, team_a, slot_a)
        };
        let (left, right) = self.teams.split_at_mut(hi);
        std::mem::swap(&mut left[lo].players[lo_slot], &mut right[0].players[hi_slot]);
    }
}
