//! Validation for player intake
//!
//! Mirrors the intake form rules: a name must be present and the rating must
//! sit on the 1-10 scale.

use super::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 10.0;
pub const MAX_NAME_LEN: usize = 50;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid rating: {0}. Must be between 1 and 10")]
    InvalidRating(f64),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),
}

/// Unvalidated player as entered by an organizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDraft {
    pub name: String,
    pub rating: f64,
    #[serde(default)]
    pub position: Position,
    /// Explicit goalkeeper flag. Defaults to `position == GK`.
    #[serde(default)]
    pub is_gk: Option<bool>,
}

impl PlayerDraft {
    pub fn new(name: impl Into<String>, rating: f64, position: Position) -> Self {
        Self { name: name.into(), rating, position, is_gk: None }
    }

    pub fn is_goalkeeper(&self) -> bool {
        self.is_gk.unwrap_or(self.position == Position::Goalkeeper)
    }
}

pub struct PlayerValidator;

impl PlayerValidator {
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidName("Name cannot be empty".to_string()));
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::InvalidName(format!(
                "Name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }

        Ok(())
    }

    pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
        if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ValidationError::InvalidRating(rating));
        }
        Ok(())
    }

    pub fn validate_draft(draft: &PlayerDraft) -> Result<(), ValidationError> {
        Self::validate_name(&draft.name)?;
        Self::validate_rating(draft.rating)?;
        Ok(())
    }
}
