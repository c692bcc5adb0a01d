use std::path::PathBuf;
use thiserror::Error;
use crate::core::MatchHistory;
use crate::models::Participant;

/// Errors that can occur when reading or writing persisted state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt persisted state in {location}: {reason}")]
    Corrupt { location: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn corrupt(location: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Persistence for the participant roster
///
/// Implementations must preserve participant order across a load/save cycle
/// and return an empty roster when nothing has been saved yet.
pub trait RosterStore: Send + Sync {
    fn load(&self) -> Result<Vec<Participant>, StoreError>;
    fn save(&self, participants: &[Participant]) -> Result<(), StoreError>;
}

/// Persistence for the repeat-avoidance history
///
/// Implementations return an empty history when nothing has been saved yet.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Result<MatchHistory, StoreError>;
    fn save(&self, history: &MatchHistory) -> Result<(), StoreError>;
}

/// Reject rosters with duplicate, empty or separator-bearing ids, or out-of-range strengths
pub fn check_roster(location: &str, participants: &[Participant]) -> Result<(), StoreError> {
    let mut seen = std::collections::HashSet::with_capacity(participants.len());
    for participant in participants {
        participant
            .check()
            .map_err(|reason| StoreError::corrupt(location, reason))?;
        if !seen.insert(participant.id.as_str()) {
            return Err(StoreError::corrupt(
                location,
                format!("duplicate participant id '{}'", participant.id),
            ));
        }
    }
    Ok(())
}
