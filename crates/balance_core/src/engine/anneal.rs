//! Simulated annealing over the swap neighbourhood
//!
//! Each step swaps one random player between two random teams and keeps the
//! move under the Metropolis rule. The best allocation seen is returned, which
//! may differ from where the walk ends.

use super::budget::SearchBudget;
use super::fitness::allocation_variance;
use crate::error::{BalanceError, Result};
use crate::models::Allocation;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealConfig {
    pub iterations: usize,
    pub initial_temperature: f64,
    /// Multiplicative decay applied after every iteration.
    pub cooling_rate: f64,
    /// Temperature floor, keeps `exp(-delta / t)` finite.
    pub min_temperature: f64,
    /// Optional wall-clock cap for the whole pass.
    pub max_wall_ms: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            initial_temperature: 0.5,
            cooling_rate: 0.995,
            min_temperature: 1e-4,
            max_wall_ms: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_iterations(iterations: usize) -> Self {
        Self { iterations, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(BalanceError::InvalidInput("anneal iterations must be positive".to_string()));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(BalanceError::InvalidInput(format!(
                "cooling rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }
        if !(self.min_temperature > 0.0) || !(self.initial_temperature > 0.0) {
            return Err(BalanceError::InvalidInput("temperatures must be positive".to_string()));
        }
        if self.min_temperature > self.initial_temperature {
            return Err(BalanceError::InvalidInput(format!(
                "min temperature {} exceeds initial temperature {}",
                self.min_temperature, self.initial_temperature
            )));
        }
        Ok(())
    }

    #[inline]
    fn cool(&self, temperature: f64) -> f64 {
        (temperature * self.cooling_rate).max(self.min_temperature)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealOutcome {
    /// Lowest-variance allocation visited.
    pub allocation: Allocation,
    pub variance: f64,
    pub initial_variance: f64,
    pub iterations: usize,
    pub accepted: usize,
    /// Iterations wasted because a drawn team was empty.
    pub skipped: usize,
    pub final_temperature: f64,
    /// Set when the wall-clock cap stopped the pass early.
    pub halted: Option<String>,
}

impl AnnealOutcome {
    /// Split into the best allocation and the run statistics.
    pub fn into_parts(self) -> (Allocation, AnnealReport) {
        let report = AnnealReport {
            initial_variance: self.initial_variance,
            variance: self.variance,
            iterations: self.iterations,
            accepted: self.accepted,
            skipped: self.skipped,
            halted: self.halted,
        };
        (self.allocation, report)
    }
}

/// Statistics of an annealing pass, without the allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealReport {
    pub initial_variance: f64,
    pub variance: f64,
    pub iterations: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub halted: Option<String>,
}

/// Run one annealing pass starting from `initial`.
///
/// An iteration that draws an empty team is skipped but still cools the
/// temperature, so a seeded run always consumes the same schedule.
pub fn anneal<R: Rng + ?Sized>(
    initial: &Allocation,
    config: &AnnealConfig,
    rng: &mut R,
) -> Result<AnnealOutcome> {
    config.validate()?;

    let mut current = initial.clone();
    let mut current_variance = allocation_variance(&current)?;
    let initial_variance = current_variance;
    let mut best = current.clone();
    let mut best_variance = current_variance;

    let mut temperature = config.initial_temperature;
    let mut iterations = 0;
    let mut accepted = 0;
    let mut skipped = 0;
    let mut halted = None;

    let n = current.team_count();
    if n >= 2 {
        let mut budget = SearchBudget::new(config.max_wall_ms, None);
        for _ in 0..config.iterations {
            if !budget.tick() {
                halted = budget.exceeded_reason();
                break;
            }
            iterations += 1;

            let a = rng.gen_range(0..n);
            let mut b = rng.gen_range(0..n - 1);
            if b >= a {
                b += 1;
            }

            let (len_a, len_b) = (current.teams[a].len(), current.teams[b].len());
            if len_a == 0 || len_b == 0 {
                skipped += 1;
                temperature = config.cool(temperature);
                continue;
            }
            let slot_a = rng.gen_range(0..len_a);
            let slot_b = rng.gen_range(0..len_b);

            // Trial the move in place; a swap is its own inverse.
            current.swap_slots(a, slot_a, b, slot_b);
            let candidate_variance = allocation_variance(&current)?;
            let delta = candidate_variance - current_variance;

            let accept = delta < 0.0 || rng.gen::<f64>() < (-delta / temperature).exp();
            if accept {
                accepted += 1;
                current_variance = candidate_variance;
                if current_variance < best_variance {
                    best_variance = current_variance;
                    best = current.clone();
                }
            } else {
                current.swap_slots(a, slot_a, b, slot_b);
            }

            temperature = config.cool(temperature);
        }
    }

    if let Some(reason) = &halted {
        warn!(reason = %reason, iterations, best = best_variance, "annealing halted early");
    }
    debug!(
        from = initial_variance,
        to = best_variance,
        iterations,
        accepted,
        skipped,
        "annealing pass finished"
    );

    Ok(AnnealOutcome {
        allocation: best,
        variance: best_variance,
        initial_variance,
        iterations,
        accepted,
        skipped,
        final_temperature: temperature,
        halted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fitness::Metrics;
    use crate::models::{Player, Position, Team};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn skewed(teams: usize, per_team: usize) -> Allocation {
        // Strongest players packed into the first teams.
        let mut id = 0;
        let rosters: Vec<Vec<Player>> = (0..teams)
            .map(|t| {
                (0..per_team)
                    .map(|_| {
                        id += 1;
                        let rating = 10.0 - (t * per_team) as f64 * 8.0 / (teams * per_team) as f64;
                        Player::new(id, format!("P{id}"), rating.max(1.0), Position::Any)
                    })
                    .collect()
            })
            .collect();
        Allocation::from_rosters(rosters)
    }

    #[test]
    fn test_default_schedule() {
        let config = AnnealConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.initial_temperature, 0.5);
        assert_eq!(config.cooling_rate, 0.995);
        assert_eq!(config.min_temperature, 1e-4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_schedules_rejected() {
        let bad_rate = AnnealConfig { cooling_rate: 1.0, ..Default::default() };
        assert!(bad_rate.validate().is_err());
        let bad_floor = AnnealConfig { min_temperature: 1.0, ..Default::default() };
        assert!(bad_floor.validate().is_err());
        assert!(AnnealConfig::with_iterations(0).validate().is_err());
    }

    #[test]
    fn test_temperature_floor() {
        let config = AnnealConfig::default();
        let mut t = config.initial_temperature;
        for _ in 0..10_000 {
            t = config.cool(t);
        }
        assert_eq!(t, config.min_temperature);
    }

    #[test]
    fn test_anneal_improves_skewed_allocation() {
        let start = skewed(3, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let outcome = anneal(&start, &AnnealConfig::default(), &mut rng).unwrap();

        assert!(outcome.variance < outcome.initial_variance);
        assert_eq!(outcome.iterations, 1000);
        assert_eq!(outcome.skipped, 0);
        assert!(outcome.halted.is_none());
        assert_eq!(Metrics::of(&outcome.allocation).unwrap().variance, outcome.variance);
        assert!(outcome.allocation.teams.iter().all(|t| t.len() == 5));
        assert_eq!(outcome.allocation.player_count(), 15);
    }

    #[test]
    fn test_anneal_is_deterministic_for_seed() {
        let start = skewed(4, 4);
        let config = AnnealConfig::with_iterations(500);
        let a = anneal(&start, &config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = anneal(&start, &config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_team_is_returned_unchanged() {
        let start = skewed(1, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = anneal(&start, &AnnealConfig::default(), &mut rng).unwrap();
        assert_eq!(outcome.allocation, start);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.variance, 0.0);
    }

    #[test]
    fn test_empty_teams_are_skipped_and_cool() {
        let start = Allocation::new(vec![Team::default(), Team::default()]);
        let config = AnnealConfig::with_iterations(10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = anneal(&start, &config, &mut rng).unwrap();

        assert_eq!(outcome.skipped, 10);
        assert_eq!(outcome.accepted, 0);
        let mut expected = config.initial_temperature;
        for _ in 0..10 {
            expected = config.cool(expected);
        }
        assert_eq!(outcome.final_temperature, expected);
    }

    fn balanced() -> Allocation {
        // Strengths 6 and 6: every swap is neutral or worse.
        Allocation::from_rosters(vec![
            vec![Player::new(1, "A", 10.0, Position::Any), Player::new(2, "B", 2.0, Position::Any)],
            vec![Player::new(3, "C", 8.0, Position::Any), Player::new(4, "D", 4.0, Position::Any)],
        ])
    }

    #[test]
    fn test_uphill_moves_are_accepted_when_warm() {
        let start = balanced();
        let config = AnnealConfig { iterations: 200, initial_temperature: 5.0, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let outcome = anneal(&start, &config, &mut rng).unwrap();

        // The start is a global minimum, so the first accepted move is uphill.
        assert!(outcome.accepted > 0);
        assert_eq!(outcome.variance, 0.0);
        // Only strictly better states replace the best, so the walk's detours
        // never leak into the result.
        assert_eq!(outcome.allocation, start);
    }

    #[test]
    fn test_uphill_moves_are_rejected_when_cold() {
        let start = balanced();
        let config = AnnealConfig {
            iterations: 200,
            initial_temperature: 1e-3,
            min_temperature: 1e-4,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let outcome = anneal(&start, &config, &mut rng).unwrap();

        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.allocation, start);
    }

    #[test]
    fn test_wall_clock_halt_keeps_best_so_far() {
        let start = skewed(2, 3);
        let config = AnnealConfig { iterations: 50_000_000, max_wall_ms: Some(1), ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let outcome = anneal(&start, &config, &mut rng).unwrap();
        assert!(outcome.iterations < config.iterations);
        assert!(outcome.halted.is_some());
        assert!(outcome.variance <= outcome.initial_variance);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// The returned best never scores worse than the starting point.
            #[test]
            fn prop_best_never_worse_than_initial(
                teams in 2usize..5,
                per_team in 1usize..6,
                seed in any::<u64>()
            ) {
                let start = skewed(teams, per_team);
                let config = AnnealConfig::with_iterations(200);
                let outcome = anneal(&start, &config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
                prop_assert!(outcome.variance <= outcome.initial_variance);
                prop_assert_eq!(outcome.allocation.player_count(), teams * per_team);
            }
        }
    }
}
