//! # balance_core - Pickup Game Team Balancer
//!
//! Splits a pool of rated players into even teams for casual matches.
//!
//! ## Features
//! - Goalkeeper-aware initial partition (one keeper per team where possible)
//! - Exhaustive best-swap suggestions with deterministic tie breaking
//! - Optional simulated annealing refinement
//! - Seedable RNG everywhere (same seed = same teams)
//! - JSON API and chat-ready team sheets

pub mod api;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod state;

// Re-export main API
pub use api::{generate_teams_json, suggest_swap_json, GenerateRequest, GenerateResponse, SCHEMA_VERSION};
pub use engine::{AnnealConfig, Balancer, BalancerConfig, MatchFormat, Metrics, SwapSuggestion};
pub use error::{BalanceError, Result};
pub use models::{Allocation, Player, PlayerDraft, PlayerId, Position, Roster, Team, TeamShape};
pub use state::BalanceSession;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
