use crate::core::history::MatchHistory;
use crate::models::{Match, MatchupKey, Team};

/// Build every legal head-to-head candidate from the generated teams
///
/// This is Stage 2 of the round pipeline. Teams are paired in generation
/// order; a pair is dropped when the formats differ, when a participant
/// would be on both sides, or when the matchup was played fewer than
/// `cooldown_rounds` rounds ago.
pub fn build_candidates<'a>(
    teams: &[Team<'a>],
    history: &MatchHistory,
    cooldown_rounds: u32,
) -> Vec<Match<'a>> {
    let mut candidates = Vec::new();

    for (i, first) in teams.iter().enumerate() {
        for second in &teams[i + 1..] {
            if first.format != second.format {
                continue;
            }
            if !first.member_ids.is_disjoint(&second.member_ids) {
                continue;
            }

            let key = MatchupKey::new(first.member_ids.union(&second.member_ids).copied());
            if is_cooling_down(history, &key, cooldown_rounds) {
                continue;
            }

            candidates.push(Match::new(first.clone(), second.clone()));
        }
    }

    candidates
}

/// True if the matchup was last played fewer than `cooldown_rounds` rounds ago
#[inline]
pub fn is_cooling_down(history: &MatchHistory, key: &MatchupKey, cooldown_rounds: u32) -> bool {
    history
        .age(key)
        .map_or(false, |age| age < cooldown_rounds)
}
