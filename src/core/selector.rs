use std::collections::BTreeSet;
use crate::models::Match;

/// Pick non-overlapping matches for the available slots
///
/// This is Stage 3 of the round pipeline. Candidates are ordered by
/// imbalance with a stable sort, so the earliest generated candidate wins
/// a tie. Each candidate is accepted when none of its participants is
/// already booked. Greedy; it never revisits an accepted match.
pub fn select_matches<'a>(mut candidates: Vec<Match<'a>>, slot_capacity: usize) -> Vec<Match<'a>> {
    candidates.sort_by_key(|m| m.imbalance);

    let mut selected = Vec::with_capacity(slot_capacity.min(candidates.len()));
    let mut booked: BTreeSet<&'a str> = BTreeSet::new();

    for candidate in candidates {
        if selected.len() >= slot_capacity {
            break;
        }
        if !booked.is_disjoint(&candidate.participants) {
            continue;
        }
        booked.extend(candidate.participants.iter().copied());
        selected.push(candidate);
    }

    selected
}
