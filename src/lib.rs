//! Court Rota - round matchmaking for club court sessions
//!
//! This library assigns the participants present at a session to concurrent
//! head-to-head matches, round after round. Teams are generated per format
//! from each participant's category and preferences, candidate matches are
//! scored by strength imbalance, and a greedy selector fills the available
//! courts without double-booking anyone. A repeat-avoidance history keeps
//! recently played matchups off the courts for a configurable cooldown.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchHistory, Matcher, RoundError};
pub use models::{Category, Format, MatchupKey, Participant, RoundPolicy, RoundResult, ScheduledMatch};
pub use services::{HistoryStore, RosterStore, RoundService, ServiceError, StoreError};
