//! Saved player roster
//!
//! Regulars that can be added to a session without re-entering ratings.

use super::validation::PlayerDraft;
use super::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub rating: f64,
    #[serde(default)]
    pub is_gk: bool,
    #[serde(default)]
    pub position: Position,
}

impl RosterEntry {
    pub fn new(name: &str, rating: f64, is_gk: bool, position: Position) -> Self {
        Self { name: name.to_string(), rating, is_gk, position }
    }

    pub fn to_draft(&self) -> PlayerDraft {
        PlayerDraft {
            name: self.name.clone(),
            rating: self.rating,
            position: self.position,
            is_gk: Some(self.is_gk),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub entries: Vec<RosterEntry>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::saved()
    }
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    /// The regular Sunday squad.
    pub fn saved() -> Self {
        use Position::*;
        Self::new(vec![
            RosterEntry::new("Bell", 9.0, false, Midfielder),
            RosterEntry::new("Ky", 10.0, false, Midfielder),
            RosterEntry::new("Jon C", 7.0, false, Defender),
            RosterEntry::new("Jord", 9.0, false, Defender),
            RosterEntry::new("Callum", 7.0, false, Defender),
            RosterEntry::new("OB", 7.0, false, Midfielder),
            RosterEntry::new("Matts", 7.0, false, Midfielder),
            RosterEntry::new("Kie", 7.0, false, Defender),
            RosterEntry::new("Cob", 7.0, false, Midfielder),
            RosterEntry::new("Middle", 6.0, false, Defender),
            RosterEntry::new("Owen", 8.0, false, Midfielder),
            RosterEntry::new("Ant", 7.0, true, Attacker),
            RosterEntry::new("Stokes", 6.0, true, Defender),
            RosterEntry::new("Hannon", 6.0, false, Midfielder),
            RosterEntry::new("Matt Field", 6.0, false, Attacker),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries whose names are not in `taken`, in roster order.
    pub fn available<'a, I>(&'a self, taken: I) -> Vec<&'a RosterEntry>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let taken: Vec<String> = taken.into_iter().map(|n| n.as_ref().to_string()).collect();
        self.entries.iter().filter(|e| !taken.iter().any(|n| n == &e.name)).collect()
    }

    /// Group entries by listed position in section order, skipping empty sections.
    pub fn grouped<'a>(entries: &[&'a RosterEntry]) -> Vec<(Position, Vec<&'a RosterEntry>)> {
        Position::SECTIONS
            .iter()
            .map(|section| {
                let members: Vec<&RosterEntry> =
                    entries.iter().copied().filter(|e| e.position == *section).collect();
                (*section, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }
}
