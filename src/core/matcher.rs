use std::collections::BTreeSet;
use thiserror::Error;
use crate::core::{
    candidates::build_candidates,
    history::MatchHistory,
    selector::select_matches,
    teams::generate_teams,
};
use crate::models::{Match, Participant, RoundPolicy, RoundResult, ScheduledMatch};

/// Errors raised while validating round parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("{name} must be between 0 and {max}, got {value}")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        max: u64,
    },
}

/// Round orchestrator - runs the matchmaking pipeline for one round
///
/// # Pipeline Stages
/// 1. Availability filter
/// 2. Team generation
/// 3. Candidate matches (overlap and cooldown exclusion)
/// 4. Greedy slot selection
/// 5. History update
#[derive(Debug, Clone)]
pub struct Matcher {
    defaults: RoundPolicy,
}

impl Matcher {
    pub fn new(defaults: RoundPolicy) -> Self {
        Self { defaults }
    }

    pub fn with_default_policy() -> Self {
        Self {
            defaults: RoundPolicy::default(),
        }
    }

    pub fn defaults(&self) -> RoundPolicy {
        self.defaults
    }

    /// Validate caller-supplied parameters, falling back to the configured defaults
    pub fn resolve_policy(
        &self,
        slot_capacity: Option<i64>,
        cooldown_rounds: Option<i64>,
    ) -> Result<RoundPolicy, RoundError> {
        let slot_capacity = match slot_capacity {
            Some(value) => usize::try_from(value).map_err(|_| RoundError::InvalidParameter {
                name: "slot_capacity",
                value,
                max: usize::MAX as u64,
            })?,
            None => self.defaults.slot_capacity,
        };

        let cooldown_rounds = match cooldown_rounds {
            Some(value) => u32::try_from(value).map_err(|_| RoundError::InvalidParameter {
                name: "cooldown_rounds",
                value,
                max: u32::MAX as u64,
            })?,
            None => self.defaults.cooldown_rounds,
        };

        Ok(RoundPolicy {
            slot_capacity,
            cooldown_rounds,
        })
    }

    /// Generate one round and apply it to `history`
    ///
    /// Only participants marked available take part. The history is aged
    /// and updated only when at least one match is selected.
    ///
    /// # Arguments
    /// * `participants` - The roster, in roster order
    /// * `history` - Repeat-avoidance memory, updated in place
    /// * `policy` - Slot capacity and cooldown for this round
    pub fn generate_round(
        &self,
        participants: &[Participant],
        history: &mut MatchHistory,
        policy: RoundPolicy,
    ) -> RoundResult {
        let available: Vec<&Participant> = participants.iter().filter(|p| p.available).collect();

        if available.is_empty() {
            return RoundResult::default();
        }

        let teams = generate_teams(&available);
        let candidates = build_candidates(&teams, history, policy.cooldown_rounds);
        let total_candidates = candidates.len();

        tracing::debug!(
            "Built {} candidates from {} teams ({} available participants)",
            total_candidates,
            teams.len(),
            available.len()
        );

        let selected = select_matches(candidates, policy.slot_capacity);

        history.record_round(selected.iter().map(Match::key));

        let booked: BTreeSet<&str> = selected
            .iter()
            .flat_map(|m| m.participants.iter().copied())
            .collect();

        let unassigned = available
            .iter()
            .filter(|p| !booked.contains(p.id.as_str()))
            .map(|&p| p.clone())
            .collect();

        let matches = selected
            .iter()
            .enumerate()
            .map(|(slot, m)| ScheduledMatch::from_match(slot + 1, m))
            .collect();

        RoundResult {
            matches,
            unassigned,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_policy()
    }
}
