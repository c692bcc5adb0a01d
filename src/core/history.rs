use std::collections::BTreeMap;
use crate::models::MatchupKey;

/// Repeat-avoidance memory: rounds since each matchup was last played
///
/// Age 0 means the matchup was played in the most recent round. Entries are
/// kept until explicitly pruned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchHistory {
    entries: BTreeMap<MatchupKey, u32>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn age(&self, key: &MatchupKey) -> Option<u32> {
        self.entries.get(key).copied()
    }

    /// Age every entry by one round
    pub fn bump_all(&mut self) {
        for age in self.entries.values_mut() {
            *age = age.saturating_add(1);
        }
    }

    /// Mark a matchup as played this round
    pub fn reset(&mut self, key: MatchupKey) {
        self.entries.insert(key, 0);
    }

    /// Apply one round: age everything, then zero the matchups just played.
    ///
    /// A round with no matches leaves the history untouched.
    pub fn record_round<I>(&mut self, played: I)
    where
        I: IntoIterator<Item = MatchupKey>,
    {
        let mut played = played.into_iter().peekable();
        if played.peek().is_none() {
            return;
        }
        self.bump_all();
        for key in played {
            self.reset(key);
        }
    }

    /// Drop entries older than `max_age`; returns how many were removed
    pub fn prune(&mut self, max_age: u32) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, age| *age <= max_age);
        before - self.entries.len()
    }

    pub fn insert(&mut self, key: MatchupKey, age: u32) {
        self.entries.insert(key, age);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MatchupKey, u32)> {
        self.entries.iter().map(|(key, age)| (key, *age))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(MatchupKey, u32)> for MatchHistory {
    fn from_iter<T: IntoIterator<Item = (MatchupKey, u32)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
