use crate::models::{Category, Format, Participant, Team};

/// Enumerate every valid team for every format
///
/// This is Stage 1 of the round pipeline. Formats are visited in
/// `Format::ALL` order and participants in roster order, so the output
/// order is stable for a given input and drives tie-breaking downstream.
pub fn generate_teams<'a>(participants: &[&'a Participant]) -> Vec<Team<'a>> {
    Format::ALL
        .iter()
        .flat_map(|&format| generate_teams_for(format, participants))
        .collect()
}

/// Enumerate the teams for a single format
pub fn generate_teams_for<'a>(format: Format, participants: &[&'a Participant]) -> Vec<Team<'a>> {
    let eligible = |category: Category| -> Vec<&'a Participant> {
        participants
            .iter()
            .copied()
            .filter(|p| p.category == category && p.plays(format))
            .collect()
    };

    match format {
        Format::DoublesA => unordered_pairs(format, &eligible(Category::A)),
        Format::DoublesB => unordered_pairs(format, &eligible(Category::B)),
        Format::Mixed => {
            let side_a = eligible(Category::A);
            let side_b = eligible(Category::B);
            side_a
                .iter()
                .flat_map(|&a| side_b.iter().map(move |&b| Team::new(format, vec![a, b])))
                .collect()
        }
        Format::SinglesA => singletons(format, &eligible(Category::A)),
        Format::SinglesB => singletons(format, &eligible(Category::B)),
    }
}

#[inline]
fn unordered_pairs<'a>(format: Format, eligible: &[&'a Participant]) -> Vec<Team<'a>> {
    let mut teams = Vec::with_capacity(eligible.len() * eligible.len().saturating_sub(1) / 2);
    for (i, &first) in eligible.iter().enumerate() {
        for &second in &eligible[i + 1..] {
            teams.push(Team::new(format, vec![first, second]));
        }
    }
    teams
}

#[inline]
fn singletons<'a>(format: Format, eligible: &[&'a Participant]) -> Vec<Team<'a>> {
    eligible.iter().map(|&p| Team::new(format, vec![p])).collect()
}
