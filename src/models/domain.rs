use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One of the two mutually exclusive participant classes used for format eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "A", alias = "M")]
    A,
    #[serde(rename = "B", alias = "F")]
    B,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::A => write!(f, "A"),
            Category::B => write!(f, "B"),
        }
    }
}

/// Contest format with a fixed team size and category rule
///
/// The legacy two-letter codes (MD, WD, XD, MS, WS) are accepted when
/// reading rosters written by the old application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[serde(alias = "MD")]
    DoublesA,
    #[serde(alias = "WD")]
    DoublesB,
    #[serde(alias = "XD")]
    Mixed,
    #[serde(alias = "MS")]
    SinglesA,
    #[serde(alias = "WS")]
    SinglesB,
}

impl Format {
    /// Every format, in team generation order
    pub const ALL: [Format; 5] = [
        Format::DoublesA,
        Format::DoublesB,
        Format::Mixed,
        Format::SinglesA,
        Format::SinglesB,
    ];

    /// Number of participants on each side
    pub fn team_size(self) -> usize {
        match self {
            Format::DoublesA | Format::DoublesB | Format::Mixed => 2,
            Format::SinglesA | Format::SinglesB => 1,
        }
    }

    /// Whether a participant of `category` may appear on a team of this format.
    ///
    /// Mixed admits both categories; the one-of-each rule is enforced when
    /// the pairs are built.
    pub fn admits(self, category: Category) -> bool {
        match self {
            Format::DoublesA | Format::SinglesA => category == Category::A,
            Format::DoublesB | Format::SinglesB => category == Category::B,
            Format::Mixed => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Format::DoublesA => "doubles_a",
            Format::DoublesB => "doubles_b",
            Format::Mixed => "mixed",
            Format::SinglesA => "singles_a",
            Format::SinglesB => "singles_b",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster entry for one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(alias = "name")]
    pub id: String,
    #[serde(alias = "gender")]
    pub category: Category,
    #[serde(alias = "skill")]
    pub strength: i64,
    #[serde(alias = "preferences", default)]
    pub formats: BTreeSet<Format>,
    #[serde(
        alias = "present",
        default = "default_true",
        deserialize_with = "deserialize_availability"
    )]
    pub available: bool,
}

impl Participant {
    /// Largest absolute strength accepted on a roster
    pub const MAX_STRENGTH: i64 = 1 << 60;

    pub fn new(
        id: impl Into<String>,
        category: Category,
        strength: i64,
        formats: impl IntoIterator<Item = Format>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            strength,
            formats: formats.into_iter().collect(),
            available: true,
        }
    }

    /// True if the participant wants to play `format` and their category allows it
    #[inline]
    pub fn plays(&self, format: Format) -> bool {
        self.formats.contains(&format) && format.admits(self.category)
    }

    /// Check the identity and strength invariants, returning the reason on failure
    pub fn check(&self) -> Result<(), String> {
        check_identity(&self.id)?;
        if self.strength.unsigned_abs() > Self::MAX_STRENGTH.unsigned_abs() {
            return Err(format!(
                "participant '{}' has strength {} outside ±{}",
                self.id,
                self.strength,
                Self::MAX_STRENGTH
            ));
        }
        Ok(())
    }
}

/// Identities must be non-empty and free of the matchup key separator
pub fn check_identity(id: &str) -> Result<(), String> {
    if id.trim().is_empty() {
        return Err("id must not be empty".to_string());
    }
    if id.contains(MatchupKey::SEPARATOR) {
        return Err(format!(
            "id '{}' must not contain '{}'",
            id,
            MatchupKey::SEPARATOR
        ));
    }
    Ok(())
}

fn default_true() -> bool { true }

#[derive(Deserialize)]
#[serde(untagged)]
enum Availability {
    Flag(bool),
    Legacy(String),
}

/// Accepts `true`/`false` as well as the legacy `"yes"`/`"no"` strings
fn deserialize_availability<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Availability::deserialize(deserializer)? {
        Availability::Flag(flag) => Ok(flag),
        Availability::Legacy(value) => match value.as_str() {
            "yes" => Ok(true),
            "no" => Ok(false),
            other => Err(de::Error::custom(format!(
                "invalid availability '{}', expected true/false or yes/no",
                other
            ))),
        },
    }
}

/// A group of one or two participants assembled for a single format
#[derive(Debug, Clone)]
pub struct Team<'a> {
    pub format: Format,
    pub members: Vec<&'a Participant>,
    pub strength: i64,
    pub member_ids: BTreeSet<&'a str>,
}

impl<'a> Team<'a> {
    pub fn new(format: Format, members: Vec<&'a Participant>) -> Self {
        let strength = members
            .iter()
            .fold(0i64, |total, p| total.saturating_add(p.strength));
        let member_ids = members.iter().map(|p| p.id.as_str()).collect();
        Self {
            format,
            members,
            strength,
            member_ids,
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.members.iter().map(|p| p.id.clone()).collect()
    }
}

/// Two disjoint teams of the same format, scored by strength imbalance
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub team1: Team<'a>,
    pub team2: Team<'a>,
    pub imbalance: u64,
    pub participants: BTreeSet<&'a str>,
}

impl<'a> Match<'a> {
    pub fn new(team1: Team<'a>, team2: Team<'a>) -> Self {
        let imbalance = team1.strength.abs_diff(team2.strength);
        let participants = team1.member_ids.union(&team2.member_ids).copied().collect();
        Self {
            team1,
            team2,
            imbalance,
            participants,
        }
    }

    pub fn format(&self) -> Format {
        self.team1.format
    }

    pub fn key(&self) -> MatchupKey {
        MatchupKey::new(self.participants.iter().copied())
    }
}

/// Identity of a matchup for repeat avoidance: every participant in the
/// match, regardless of how they were split into teams.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchupKey(BTreeSet<String>);

impl MatchupKey {
    /// Separator used in the persisted form; identities may not contain it
    pub const SEPARATOR: &'static str = ";";

    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sorted identities joined by the separator
    pub fn encode(&self) -> String {
        let ids: Vec<&str> = self.ids().collect();
        ids.join(Self::SEPARATOR)
    }

    /// Parse the persisted form. Returns `None` for an empty key or an empty identity.
    pub fn decode(encoded: &str) -> Option<Self> {
        if encoded.is_empty() {
            return None;
        }
        let ids: BTreeSet<String> = encoded
            .split(Self::SEPARATOR)
            .map(str::to_string)
            .collect();
        if ids.iter().any(String::is_empty) {
            return None;
        }
        Some(Self(ids))
    }
}

impl fmt::Display for MatchupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Owned view of a selected match, ready for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub court: usize,
    pub format: Format,
    pub team1: Vec<String>,
    pub team2: Vec<String>,
    pub imbalance: u64,
}

impl ScheduledMatch {
    pub fn from_match(court: usize, selected: &Match<'_>) -> Self {
        Self {
            court,
            format: selected.format(),
            team1: selected.team1.ids(),
            team2: selected.team2.ids(),
            imbalance: selected.imbalance,
        }
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.team1.iter().chain(self.team2.iter()).map(String::as_str)
    }

    pub fn key(&self) -> MatchupKey {
        MatchupKey::new(self.participants())
    }
}

/// Outcome of one round
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundResult {
    pub matches: Vec<ScheduledMatch>,
    pub unassigned: Vec<Participant>,
    pub total_candidates: usize,
}

/// Round parameters after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPolicy {
    pub slot_capacity: usize,
    pub cooldown_rounds: u32,
}

impl Default for RoundPolicy {
    fn default() -> Self {
        Self {
            slot_capacity: 10,
            cooldown_rounds: 3,
        }
    }
}
