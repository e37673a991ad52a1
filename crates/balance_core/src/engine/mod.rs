//! # Balancing engine
//!
//! - `fitness`: team strength and variance
//! - `partition`: goalkeeper-aware initial allocation
//! - `best_swap`: exhaustive single-swap search and swap application
//! - `anneal`: simulated annealing refinement
//! - `balancer`: orchestrator tying the passes together

pub mod anneal;
pub mod balancer;
pub mod best_swap;
pub mod budget;
pub mod config;
pub mod fitness;
pub mod partition;

pub use anneal::{anneal, AnnealConfig, AnnealOutcome, AnnealReport};
pub use balancer::{Balancer, Generated, RefineReport};
pub use best_swap::{apply_swap, find_best_swap, swap_players, SwapSuggestion};
pub use budget::SearchBudget;
pub use config::{BalancerConfig, MatchFormat, CONFIG_PATH_ENV};
pub use fitness::{allocation_variance, strength, team_strengths, variance, Metrics};
pub use partition::{partition, shuffled};
