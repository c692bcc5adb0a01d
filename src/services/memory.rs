use std::sync::{Mutex, PoisonError};
use crate::core::MatchHistory;
use crate::models::Participant;
use crate::services::store::{check_roster, HistoryStore, RosterStore, StoreError};

/// In-process roster store
#[derive(Debug, Default)]
pub struct MemoryRosterStore {
    participants: Mutex<Vec<Participant>>,
}

impl MemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants: Mutex::new(participants),
        }
    }
}

impl RosterStore for MemoryRosterStore {
    fn load(&self) -> Result<Vec<Participant>, StoreError> {
        let participants = self
            .participants
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        check_roster("memory roster", &participants)?;
        Ok(participants)
    }

    fn save(&self, participants: &[Participant]) -> Result<(), StoreError> {
        *self.participants.lock().unwrap_or_else(PoisonError::into_inner) = participants.to_vec();
        Ok(())
    }
}

/// In-process history store that counts writes
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    state: Mutex<(MatchHistory, usize)>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(history: MatchHistory) -> Self {
        Self {
            state: Mutex::new((history, 0)),
        }
    }

    /// Number of times `save` has been called
    pub fn save_count(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).1
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<MatchHistory, StoreError> {
        Ok(self.state.lock().unwrap_or_else(PoisonError::into_inner).0.clone())
    }

    fn save(&self, history: &MatchHistory) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.0 = history.clone();
        state.1 += 1;
        Ok(())
    }
}
