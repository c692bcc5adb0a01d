use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, info};
use crate::core::{MatchHistory, Matcher, RoundError};
use crate::models::{check_identity, Participant, RoundPolicy, RoundResult, UpdateParticipantRequest};
use crate::services::store::{HistoryStore, RosterStore, StoreError};

/// Errors returned by the round service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("Participant already exists: {0}")]
    DuplicateParticipant(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),
}

/// Round generation and roster management over a pair of stores
///
/// Every load-modify-save sequence runs under a single writer lock, so
/// concurrent callers are applied one after another and no history update
/// is lost.
pub struct RoundService {
    roster: Arc<dyn RosterStore>,
    history: Arc<dyn HistoryStore>,
    matcher: Matcher,
    max_history_age: Option<u32>,
    write_lock: Mutex<()>,
}

impl RoundService {
    pub fn new(
        roster: Arc<dyn RosterStore>,
        history: Arc<dyn HistoryStore>,
        matcher: Matcher,
    ) -> Self {
        Self {
            roster,
            history,
            matcher,
            max_history_age: None,
            write_lock: Mutex::new(()),
        }
    }

    /// Drop history entries older than `max_age` whenever history is written
    pub fn with_max_history_age(mut self, max_age: Option<u32>) -> Self {
        self.max_history_age = max_age;
        self
    }

    pub fn defaults(&self) -> RoundPolicy {
        self.matcher.defaults()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Generate the next round from the stored roster
    pub fn generate_round(
        &self,
        slot_capacity: Option<i64>,
        cooldown_rounds: Option<i64>,
    ) -> Result<RoundResult, ServiceError> {
        let policy = self.matcher.resolve_policy(slot_capacity, cooldown_rounds)?;
        let _guard = self.lock();
        let participants = self.roster.load()?;
        self.run_round(&participants, policy)
    }

    /// Generate the next round for a caller-supplied participant list
    pub fn generate_round_for(
        &self,
        participants: &[Participant],
        slot_capacity: Option<i64>,
        cooldown_rounds: Option<i64>,
    ) -> Result<RoundResult, ServiceError> {
        let policy = self.matcher.resolve_policy(slot_capacity, cooldown_rounds)?;
        validate_roster(participants)?;
        let _guard = self.lock();
        self.run_round(participants, policy)
    }

    // Caller must hold the writer lock
    fn run_round(
        &self,
        participants: &[Participant],
        policy: RoundPolicy,
    ) -> Result<RoundResult, ServiceError> {
        if !participants.iter().any(|p| p.available) {
            info!("No participants available, skipping round");
            return Ok(RoundResult::default());
        }

        let mut history = self.history.load()?;
        let result = self.matcher.generate_round(participants, &mut history, policy);

        if !result.matches.is_empty() {
            if let Some(max_age) = self.max_history_age {
                let pruned = history.prune(max_age);
                if pruned > 0 {
                    debug!("Pruned {} history entries older than {} rounds", pruned, max_age);
                }
            }
            self.history.save(&history)?;
        }

        info!(
            "Round generated: {} matches on {} slots, {} unassigned (from {} candidates)",
            result.matches.len(),
            policy.slot_capacity,
            result.unassigned.len(),
            result.total_candidates
        );

        Ok(result)
    }

    pub fn participants(&self) -> Result<Vec<Participant>, ServiceError> {
        Ok(self.roster.load()?)
    }

    pub fn add_participant(&self, participant: Participant) -> Result<Participant, ServiceError> {
        participant.check().map_err(ServiceError::InvalidParticipant)?;

        let _guard = self.lock();
        let mut participants = self.roster.load()?;
        if participants.iter().any(|p| p.id == participant.id) {
            return Err(ServiceError::DuplicateParticipant(participant.id));
        }

        participants.push(participant.clone());
        self.roster.save(&participants)?;

        info!("Added participant {}", participant.id);
        Ok(participant)
    }

    pub fn update_participant(
        &self,
        id: &str,
        update: &UpdateParticipantRequest,
    ) -> Result<Participant, ServiceError> {
        let _guard = self.lock();
        let mut participants = self.roster.load()?;
        let participant = participants
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::ParticipantNotFound(id.to_string()))?;

        update.apply(participant);
        participant.check().map_err(ServiceError::InvalidParticipant)?;
        let updated = participant.clone();
        self.roster.save(&participants)?;

        debug!("Updated participant {}", id);
        Ok(updated)
    }

    pub fn remove_participant(&self, id: &str) -> Result<(), ServiceError> {
        let _guard = self.lock();
        let mut participants = self.roster.load()?;
        let before = participants.len();
        participants.retain(|p| p.id != id);
        if participants.len() == before {
            return Err(ServiceError::ParticipantNotFound(id.to_string()));
        }

        self.roster.save(&participants)?;
        info!("Removed participant {}", id);
        Ok(())
    }

    /// Mark exactly the listed participants as available
    pub fn set_availability(&self, available_ids: &[String]) -> Result<Vec<Participant>, ServiceError> {
        let _guard = self.lock();
        let mut participants = self.roster.load()?;

        if let Some(unknown) = available_ids
            .iter()
            .find(|id| !participants.iter().any(|p| &p.id == *id))
        {
            return Err(ServiceError::ParticipantNotFound(unknown.clone()));
        }

        for participant in participants.iter_mut() {
            participant.available = available_ids.contains(&participant.id);
        }
        self.roster.save(&participants)?;

        info!("{} of {} participants checked in", available_ids.len(), participants.len());
        Ok(participants)
    }

    pub fn history(&self) -> Result<MatchHistory, ServiceError> {
        Ok(self.history.load()?)
    }

    pub fn clear_history(&self) -> Result<(), ServiceError> {
        let _guard = self.lock();
        self.history.save(&MatchHistory::new())?;
        info!("Match history cleared");
        Ok(())
    }
}

/// Identities must be non-empty and free of the matchup key separator
pub fn validate_identity(id: &str) -> Result<(), ServiceError> {
    check_identity(id).map_err(ServiceError::InvalidParticipant)
}

/// Check a caller-supplied participant list the way a stored roster is checked
pub fn validate_roster(participants: &[Participant]) -> Result<(), ServiceError> {
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        participant.check().map_err(ServiceError::InvalidParticipant)?;
        if !seen.insert(participant.id.as_str()) {
            return Err(ServiceError::DuplicateParticipant(participant.id.clone()));
        }
    }
    Ok(())
}
