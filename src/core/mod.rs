// Core algorithm exports
pub mod candidates;
pub mod history;
pub mod matcher;
pub mod selector;
pub mod teams;

pub use candidates::{build_candidates, is_cooling_down};
pub use history::MatchHistory;
pub use matcher::{Matcher, RoundError};
pub use selector::select_matches;
pub use teams::{generate_teams, generate_teams_for};
