use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable per-session identity of a player.
///
/// Names are display attributes; swaps and lookups go through the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Preferred playing position. Informational only, never used by allocation.
///
/// Deserializes leniently through [`Position::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Position {
    #[serde(rename = "DEF")]
    Defender,
    #[serde(rename = "MID")]
    Midfielder,
    #[serde(rename = "ATT")]
    Attacker,
    #[serde(rename = "GK")]
    Goalkeeper,
    #[default]
    #[serde(rename = "Any")]
    Any,
}

impl Position {
    /// Roster section order used by pickers.
    pub const SECTIONS: [Position; 5] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Attacker,
        Position::Any,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Attacker => "ATT",
            Position::Goalkeeper => "GK",
            Position::Any => "Any",
        }
    }

    /// Parse a position code. Unknown codes map to `Any`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "DEF" => Position::Defender,
            "MID" => Position::Midfielder,
            "ATT" => Position::Attacker,
            "GK" => Position::Goalkeeper,
            _ => Position::Any,
        }
    }
}

impl From<String> for Position {
    fn from(code: String) -> Self {
        Position::from_code(&code)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub rating: f64,
    #[serde(default)]
    pub is_gk: bool,
    #[serde(default)]
    pub position: Position,
}

impl Player {
    /// Create a player. The goalkeeper flag follows the position; use
    /// [`Player::with_gk`] for players who keep goal outside their listed position.
    pub fn new(id: u32, name: impl Into<String>, rating: f64, position: Position) -> Self {
        Self {
            id: PlayerId(id),
            name: name.into(),
            rating,
            is_gk: position == Position::Goalkeeper,
            position,
        }
    }

    pub fn with_gk(mut self, is_gk: bool) -> Self {
        self.is_gk = is_gk;
        self
    }
}
