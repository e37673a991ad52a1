//! Balancing session
//!
//! Owns everything one organizer works on between resets: the confirmed match
//! shape, the player pool, the current teams and their metrics, and which team
//! wears the bibs. All mutation goes through `&mut self`.

use crate::engine::{
    shuffled, AnnealReport, Balancer, BalancerConfig, Metrics, RefineReport, SwapSuggestion,
};
use crate::error::{BalanceError, Result};
use crate::export::render_message;
use crate::models::{
    Allocation, Player, PlayerDraft, PlayerId, PlayerValidator, RosterEntry, TeamShape,
    ValidationError,
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub struct BalanceSession<R = ChaCha8Rng> {
    balancer: Balancer<R>,
    setup_confirmed: bool,
    players: Vec<Player>,
    next_id: u32,
    allocation: Option<Allocation>,
    metrics: Option<Metrics>,
    last_anneal: Option<AnnealReport>,
    bib_team: Option<usize>,
}

impl BalanceSession<ChaCha8Rng> {
    pub fn new(config: BalancerConfig) -> Result<Self> {
        Ok(Self::from_balancer(Balancer::new(config)?))
    }
}

impl<R: Rng> BalanceSession<R> {
    pub fn with_rng(config: BalancerConfig, rng: R) -> Result<Self> {
        Ok(Self::from_balancer(Balancer::with_rng(config, rng)?))
    }

    fn from_balancer(balancer: Balancer<R>) -> Self {
        Self {
            balancer,
            setup_confirmed: false,
            players: Vec::new(),
            next_id: 1,
            allocation: None,
            metrics: None,
            last_anneal: None,
            bib_team: None,
        }
    }

    // ========================
    // Setup and player pool
    // ========================

    pub fn shape(&self) -> TeamShape {
        self.balancer.config().shape
    }

    pub fn is_setup_confirmed(&self) -> bool {
        self.setup_confirmed
    }

    /// Fix the match shape. Fails if the pool already holds more players than
    /// the new shape needs.
    pub fn confirm_setup(&mut self, shape: TeamShape) -> Result<()> {
        if self.players.len() > shape.total() {
            return Err(BalanceError::InvalidInput(format!(
                "{} players already added, shape only takes {}",
                self.players.len(),
                shape.total()
            )));
        }
        self.balancer.set_shape(shape)?;
        self.setup_confirmed = true;
        debug!(teams = shape.teams, per_team = shape.per_team, "setup confirmed");
        Ok(())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Players still needed to fill the shape.
    pub fn remaining(&self) -> usize {
        self.shape().total().saturating_sub(self.players.len())
    }

    fn ensure_open_pool(&self) -> Result<()> {
        if !self.setup_confirmed {
            return Err(BalanceError::InvalidInput("match setup is not confirmed".to_string()));
        }
        if self.remaining() == 0 {
            return Err(BalanceError::InvalidInput("player pool is already full".to_string()));
        }
        Ok(())
    }

    fn has_name(&self, name: &str) -> bool {
        self.players.iter().any(|p| p.name == name)
    }

    fn admit(&mut self, draft: &PlayerDraft) -> PlayerId {
        let id = PlayerId(self.next_id);
        self.next_id += 1;
        self.players.push(Player {
            id,
            name: draft.name.trim().to_string(),
            rating: draft.rating,
            is_gk: draft.is_goalkeeper(),
            position: draft.position,
        });
        id
    }

    /// Validate and add one player. Names must be unique within the session.
    pub fn add_player(&mut self, draft: &PlayerDraft) -> Result<PlayerId> {
        self.ensure_open_pool()?;
        PlayerValidator::validate_draft(draft)?;
        if self.has_name(draft.name.trim()) {
            return Err(ValidationError::DuplicateName(draft.name.trim().to_string()).into());
        }
        Ok(self.admit(draft))
    }

    /// Add saved players until the pool is full. Names already present are
    /// skipped. Returns how many were added.
    pub fn add_from_roster(&mut self, entries: &[RosterEntry]) -> Result<usize> {
        self.ensure_open_pool()?;
        let mut added = 0;
        for entry in entries {
            if self.remaining() == 0 {
                break;
            }
            if self.has_name(&entry.name) {
                continue;
            }
            let draft = entry.to_draft();
            PlayerValidator::validate_draft(&draft)?;
            self.admit(&draft);
            added += 1;
        }
        debug!(added, remaining = self.remaining(), "roster players added");
        Ok(added)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(idx))
    }

    // ========================
    // Generation and swaps
    // ========================

    /// Draw a random ordering of the pool and build new teams. The bib team is
    /// picked afresh for every generation.
    pub fn generate(&mut self) -> Result<Metrics> {
        let shape = self.shape();
        if self.players.len() != shape.total() {
            return Err(BalanceError::ShapeMismatch {
                expected: shape.total(),
                found: self.players.len(),
            });
        }

        let sample = shuffled(&self.players, self.balancer.rng_mut());
        let generated = self.balancer.generate(&sample)?;
        let bib_team = self.balancer.rng_mut().gen_range(0..shape.teams);

        info!(bib_team = bib_team + 1, variance = generated.metrics.variance, "session generated teams");
        self.allocation = Some(generated.allocation);
        self.metrics = Some(generated.metrics.clone());
        self.last_anneal = generated.anneal;
        self.bib_team = Some(bib_team);
        Ok(generated.metrics)
    }

    pub fn allocation(&self) -> Option<&Allocation> {
        self.allocation.as_ref()
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    pub fn last_anneal(&self) -> Option<&AnnealReport> {
        self.last_anneal.as_ref()
    }

    pub fn bib_team(&self) -> Option<usize> {
        self.bib_team
    }

    fn current(&self) -> Result<&Allocation> {
        self.allocation
            .as_ref()
            .ok_or_else(|| BalanceError::InvalidInput("no teams generated yet".to_string()))
    }

    pub fn suggest_swap(&self) -> Result<Option<SwapSuggestion>> {
        self.balancer.suggest_swap(self.current()?)
    }

    pub fn apply_suggested_swap(&mut self, suggestion: &SwapSuggestion) -> Result<Metrics> {
        let allocation = self
            .allocation
            .as_mut()
            .ok_or_else(|| BalanceError::InvalidInput("no teams generated yet".to_string()))?;
        let metrics = self.balancer.apply_swap(allocation, suggestion)?;
        self.metrics = Some(metrics.clone());
        Ok(metrics)
    }

    pub fn apply_manual_swap(
        &mut self,
        team_a: usize,
        player_a: PlayerId,
        team_b: usize,
        player_b: PlayerId,
    ) -> Result<Metrics> {
        let allocation = self
            .allocation
            .as_mut()
            .ok_or_else(|| BalanceError::InvalidInput("no teams generated yet".to_string()))?;
        let metrics = self.balancer.apply_manual_swap(allocation, team_a, player_a, team_b, player_b)?;
        self.metrics = Some(metrics.clone());
        Ok(metrics)
    }

    /// Apply best swaps until settled. Metrics are refreshed even when the
    /// round cap is hit.
    pub fn refine(&mut self) -> Result<RefineReport> {
        let allocation = self
            .allocation
            .as_mut()
            .ok_or_else(|| BalanceError::InvalidInput("no teams generated yet".to_string()))?;
        let result = self.balancer.refine(allocation);
        self.metrics = Some(self.balancer.metrics(allocation)?);
        result
    }

    /// Shareable team sheet for the current teams.
    pub fn message(&self) -> Option<String> {
        self.allocation.as_ref().map(|a| render_message(a, self.bib_team))
    }

    /// Clear everything the session owns. The configured balancer and its RNG
    /// stream are kept.
    pub fn reset(&mut self) {
        self.setup_confirmed = false;
        self.players.clear();
        self.next_id = 1;
        self.allocation = None;
        self.metrics = None;
        self.last_anneal = None;
        self.bib_team = None;
        debug!("session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnnealConfig;
    use crate::models::{Position, Roster};

    fn session(seed: u64) -> BalanceSession {
        BalanceSession::new(BalancerConfig::default().with_seed(seed)).unwrap()
    }

    fn full_session(seed: u64) -> BalanceSession {
        let mut s = session(seed);
        s.confirm_setup(TeamShape::new(2, 5).unwrap()).unwrap();
        s.add_from_roster(&Roster::saved().entries).unwrap();
        s
    }

    #[test]
    fn test_add_requires_setup() {
        let mut s = session(0);
        let err = s.add_player(&PlayerDraft::new("Bell", 9.0, Position::Midfielder)).unwrap_err();
        assert!(matches!(err, BalanceError::InvalidInput(_)));
    }

    #[test]
    fn test_add_player_validates_and_assigns_ids() {
        let mut s = session(0);
        s.confirm_setup(TeamShape::new(2, 3).unwrap()).unwrap();
        let a = s.add_player(&PlayerDraft::new("Bell", 9.0, Position::Midfielder)).unwrap();
        let b = s.add_player(&PlayerDraft::new("Stokes", 6.0, Position::Goalkeeper)).unwrap();
        assert_ne!(a, b);
        assert!(s.players()[1].is_gk);
        assert_eq!(s.remaining(), 4);

        let dup = s.add_player(&PlayerDraft::new("Bell", 5.0, Position::Any)).unwrap_err();
        assert!(matches!(dup, BalanceError::Validation(ValidationError::DuplicateName(_))));
        let bad = s.add_player(&PlayerDraft::new("", 5.0, Position::Any)).unwrap_err();
        assert!(matches!(bad, BalanceError::Validation(ValidationError::InvalidName(_))));
        let bad = s.add_player(&PlayerDraft::new("Owen", 11.0, Position::Any)).unwrap_err();
        assert!(matches!(bad, BalanceError::Validation(ValidationError::InvalidRating(_))));
    }

    #[test]
    fn test_roster_fill_stops_at_capacity() {
        let s = full_session(0);
        assert_eq!(s.players().len(), 10);
        assert_eq!(s.remaining(), 0);
        assert_eq!(s.players()[0].name, "Bell");

        let mut s = s;
        let err = s.add_player(&PlayerDraft::new("Extra", 5.0, Position::Any)).unwrap_err();
        assert!(matches!(err, BalanceError::InvalidInput(_)));
    }

    #[test]
    fn test_remove_player_frees_a_slot() {
        let mut s = full_session(0);
        let id = s.players()[3].id;
        let removed = s.remove_player(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(s.remaining(), 1);
        assert!(s.remove_player(id).is_none());
        s.add_player(&PlayerDraft::new("Extra", 5.0, Position::Any)).unwrap();
        assert_eq!(s.remaining(), 0);
    }

    #[test]
    fn test_generate_requires_full_pool() {
        let mut s = session(0);
        s.confirm_setup(TeamShape::new(2, 5).unwrap()).unwrap();
        s.add_player(&PlayerDraft::new("Bell", 9.0, Position::Midfielder)).unwrap();
        let err = s.generate().unwrap_err();
        assert!(matches!(err, BalanceError::ShapeMismatch { expected: 10, found: 1 }));
        assert!(s.allocation().is_none());
    }

    #[test]
    fn test_generate_sets_state() {
        let mut s = full_session(17);
        let metrics = s.generate().unwrap();
        let allocation = s.allocation().unwrap();
        assert_eq!(allocation.team_count(), 2);
        assert_eq!(allocation.player_count(), 10);
        assert_eq!(s.metrics(), Some(&metrics));
        assert!(s.bib_team().unwrap() < 2);

        let message = s.message().unwrap();
        assert!(message.contains("*Team 1*"));
        assert!(message.contains("*Team 2*"));
        assert_eq!(message.matches(crate::export::BIB_MARKER).count(), 1);
    }

    #[test]
    fn test_suggest_and_apply_refreshes_metrics() {
        let mut s = full_session(3);
        s.generate().unwrap();
        let before = s.metrics().unwrap().variance;
        if let Some(suggestion) = s.suggest_swap().unwrap() {
            let after = s.apply_suggested_swap(&suggestion).unwrap();
            assert!(after.variance < before);
            assert_eq!(s.metrics().unwrap(), &after);

            let stale = s.apply_suggested_swap(&suggestion).unwrap_err();
            assert!(matches!(stale, BalanceError::StaleReference { .. }));
        }
    }

    #[test]
    fn test_manual_swap_and_back() {
        let mut s = full_session(5);
        s.generate().unwrap();
        let original = s.allocation().unwrap().clone();
        let variance = s.metrics().unwrap().variance;

        let a = original.teams[0].players[0].id;
        let b = original.teams[1].players[2].id;
        s.apply_manual_swap(0, a, 1, b).unwrap();
        let restored = s.apply_manual_swap(1, a, 0, b).unwrap();

        assert_eq!(s.allocation().unwrap(), &original);
        assert_eq!(restored.variance, variance);
    }

    #[test]
    fn test_swaps_before_generate_fail() {
        let mut s = session(0);
        assert!(s.suggest_swap().is_err());
        assert!(s.refine().is_err());
        assert!(s.apply_manual_swap(0, PlayerId(1), 1, PlayerId(2)).is_err());
    }

    #[test]
    fn test_refine_settles() {
        let mut s = full_session(9);
        s.generate().unwrap();
        let report = s.refine().unwrap();
        assert_eq!(s.metrics().unwrap(), &report.metrics);
        assert!(s.suggest_swap().unwrap().is_none());
    }

    #[test]
    fn test_seeded_sessions_agree() {
        let config = BalancerConfig::default().with_seed(77).with_anneal(AnnealConfig::with_iterations(200));
        let mut a = BalanceSession::new(config.clone()).unwrap();
        let mut b = BalanceSession::new(config).unwrap();
        for s in [&mut a, &mut b] {
            s.confirm_setup(TeamShape::new(3, 4).unwrap()).unwrap();
            s.add_from_roster(&Roster::saved().entries).unwrap();
            s.generate().unwrap();
        }
        assert_eq!(a.allocation(), b.allocation());
        assert_eq!(a.bib_team(), b.bib_team());
        assert!(a.last_anneal().is_some());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut s = full_session(1);
        s.generate().unwrap();
        s.reset();
        assert!(!s.is_setup_confirmed());
        assert!(s.players().is_empty());
        assert!(s.allocation().is_none());
        assert!(s.metrics().is_none());
        assert!(s.bib_team().is_none());
        assert!(s.message().is_none());
    }
}
