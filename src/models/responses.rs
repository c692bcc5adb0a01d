use serde::{Deserialize, Serialize};
use crate::models::domain::{Participant, ScheduledMatch};

/// Response for the generate round endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResponse {
    pub matches: Vec<ScheduledMatch>,
    pub unassigned: Vec<String>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response listing the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResponse {
    pub participants: Vec<Participant>,
    pub count: usize,
}

/// One persisted repeat-avoidance entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryView {
    pub participants: Vec<String>,
    pub age: u32,
}

/// Response listing the match history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<HistoryEntryView>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
