//! Session state
//!
//! One explicit context object per organizer. Nothing here is global.

pub mod session;

pub use session::BalanceSession;
