// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{check_identity, Category, Format, Match, MatchupKey, Participant, RoundPolicy, RoundResult, ScheduledMatch, Team};
pub use requests::{AddParticipantRequest, GenerateRoundRequest, SetAvailabilityRequest, UpdateParticipantRequest};
pub use responses::{ErrorResponse, HealthResponse, HistoryEntryView, HistoryResponse, RosterResponse, RoundResponse};
