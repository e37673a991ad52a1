//! Balancing orchestrator
//!
//! Entry point for callers: partition, optional annealing, then best-swap
//! suggestions and swaps against the caller's allocation. Every state change
//! returns fresh metrics.

use super::anneal::{anneal, AnnealReport};
use super::best_swap::{apply_swap, find_best_swap, swap_players, SwapSuggestion};
use super::budget::SearchBudget;
use super::config::BalancerConfig;
use super::fitness::Metrics;
use super::partition::partition;
use crate::error::{BalanceError, Result};
use crate::models::{Allocation, Player, PlayerId, TeamShape};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generated {
    pub allocation: Allocation,
    pub metrics: Metrics,
    /// Variance straight out of the partitioner.
    pub partition_variance: f64,
    pub anneal: Option<AnnealReport>,
}

/// Swaps applied by [`Balancer::refine`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefineReport {
    pub swaps: Vec<SwapSuggestion>,
    pub initial_variance: f64,
    pub metrics: Metrics,
}

pub struct Balancer<R = ChaCha8Rng> {
    config: BalancerConfig,
    rng: R,
}

impl Balancer<ChaCha8Rng> {
    /// Seeded from `config.seed`, or from the thread RNG when no seed is set.
    pub fn new(config: BalancerConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Balancer<R> {
    pub fn with_rng(config: BalancerConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &BalancerConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn set_shape(&mut self, shape: TeamShape) -> Result<()> {
        shape.validate()?;
        self.config.shape = shape;
        Ok(())
    }

    /// Partition `players` into the configured shape, then anneal if enabled.
    pub fn generate(&mut self, players: &[Player]) -> Result<Generated> {
        let shape = self.config.shape;
        if players.len() != shape.total() {
            return Err(BalanceError::ShapeMismatch { expected: shape.total(), found: players.len() });
        }

        let initial = partition(players, shape, &mut self.rng)?;
        let partition_variance = Metrics::of(&initial)?.variance;

        let (allocation, anneal_report) = match &self.config.anneal {
            Some(schedule) => {
                let (best, report) = anneal(&initial, schedule, &mut self.rng)?.into_parts();
                (best, Some(report))
            }
            None => (initial, None),
        };
        let metrics = Metrics::of(&allocation)?;

        info!(
            teams = shape.teams,
            per_team = shape.per_team,
            partition_variance,
            variance = metrics.variance,
            annealed = anneal_report.is_some(),
            "teams generated"
        );
        Ok(Generated { allocation, metrics, partition_variance, anneal: anneal_report })
    }

    pub fn suggest_swap(&self, allocation: &Allocation) -> Result<Option<SwapSuggestion>> {
        find_best_swap(allocation)
    }

    pub fn apply_swap(
        &self,
        allocation: &mut Allocation,
        suggestion: &SwapSuggestion,
    ) -> Result<Metrics> {
        apply_swap(allocation, suggestion)?;
        let metrics = Metrics::of(allocation)?;
        debug!(a = %suggestion.name_a, b = %suggestion.name_b, variance = metrics.variance, "swap applied");
        Ok(metrics)
    }

    /// Exchange two explicitly chosen players regardless of the effect on balance.
    pub fn apply_manual_swap(
        &self,
        allocation: &mut Allocation,
        team_a: usize,
        player_a: PlayerId,
        team_b: usize,
        player_b: PlayerId,
    ) -> Result<Metrics> {
        swap_players(allocation, team_a, player_a, team_b, player_b)?;
        let metrics = Metrics::of(allocation)?;
        debug!(%player_a, %player_b, variance = metrics.variance, "manual swap applied");
        Ok(metrics)
    }

    /// Apply best swaps until none improves.
    ///
    /// Fails with `BudgetExceeded` if swaps are still improving after
    /// `max_refine_rounds`; the swaps already made stay applied.
    pub fn refine(&self, allocation: &mut Allocation) -> Result<RefineReport> {
        let initial_variance = Metrics::of(allocation)?.variance;
        let mut swaps = Vec::new();
        let mut budget = SearchBudget::iterations(self.config.max_refine_rounds);

        while budget.tick() {
            match find_best_swap(allocation)? {
                Some(suggestion) => {
                    apply_swap(allocation, &suggestion)?;
                    swaps.push(suggestion);
                }
                None => {
                    let metrics = Metrics::of(allocation)?;
                    debug!(rounds = swaps.len(), variance = metrics.variance, "refinement settled");
                    return Ok(RefineReport { swaps, initial_variance, metrics });
                }
            }
        }

        let metrics = Metrics::of(allocation)?;
        if find_best_swap(allocation)?.is_some() {
            let reason = budget.exceeded_reason().unwrap_or_default();
            return Err(BalanceError::BudgetExceeded(format!(
                "refinement still improving after {} rounds (variance {:.4}): {reason}",
                swaps.len(),
                metrics.variance
            )));
        }
        debug!(rounds = swaps.len(), variance = metrics.variance, "refinement settled at round cap");
        Ok(RefineReport { swaps, initial_variance, metrics })
    }

    pub fn metrics(&self, allocation: &Allocation) -> Result<Metrics> {
        Metrics::of(allocation)
    }
}
