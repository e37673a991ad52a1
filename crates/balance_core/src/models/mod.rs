pub mod player;
pub mod roster;
pub mod team;
pub mod validation;

pub use player::{Player, PlayerId, Position};
pub use roster::{Roster, RosterEntry};
pub use team::{Allocation, Team, TeamShape};
pub use validation::{PlayerDraft, PlayerValidator, ValidationError};
