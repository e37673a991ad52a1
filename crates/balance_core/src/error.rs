use crate::models::validation::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("Shape mismatch: expected {expected} players, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Stale reference: player {player} is no longer in team {team}")]
    StaleReference { team: usize, player: String },

    #[error("Not found: player {player} in team {team}")]
    NotFound { team: usize, player: String },

    #[error("Budget exceeded: {0}")]
    BudgetExceeded(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BalanceError {
    /// Errors the caller can recover from by refreshing state or fixing input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            BalanceError::StaleReference { .. } => true,
            BalanceError::NotFound { .. } => true,
            BalanceError::BudgetExceeded(_) => true,
            BalanceError::Validation(_) => true,
            BalanceError::ShapeMismatch { .. } => false,
            BalanceError::InvalidInput(_) => false,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BalanceError>;
