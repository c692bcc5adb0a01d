use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;
use crate::models::domain::{Category, Format, Participant};

/// Request to generate the next round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRoundRequest {
    #[serde(alias = "slot_capacity", rename = "slotCapacity", default)]
    pub slot_capacity: Option<i64>,
    #[serde(alias = "cooldown_rounds", rename = "cooldownRounds", default)]
    pub cooldown_rounds: Option<i64>,
}

/// Request to add a participant to the roster
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddParticipantRequest {
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    pub category: Category,
    #[validate(range(min = -1000, max = 1000))]
    pub strength: i64,
    #[serde(default)]
    pub formats: BTreeSet<Format>,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl From<AddParticipantRequest> for Participant {
    fn from(req: AddParticipantRequest) -> Self {
        Participant {
            id: req.id,
            category: req.category,
            strength: req.strength,
            formats: req.formats,
            available: req.available,
        }
    }
}

/// Partial update of a participant; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateParticipantRequest {
    #[serde(default)]
    pub category: Option<Category>,
    #[validate(range(min = -1000, max = 1000))]
    #[serde(default)]
    pub strength: Option<i64>,
    #[serde(default)]
    pub formats: Option<BTreeSet<Format>>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl UpdateParticipantRequest {
    pub fn apply(&self, participant: &mut Participant) {
        if let Some(category) = self.category {
            participant.category = category;
        }
        if let Some(strength) = self.strength {
            participant.strength = strength;
        }
        if let Some(formats) = &self.formats {
            participant.formats = formats.clone();
        }
        if let Some(available) = self.available {
            participant.available = available;
        }
    }
}

/// Check-in request: listed participants are present, everyone else is not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAvailabilityRequest {
    #[serde(alias = "available_ids", rename = "availableIds")]
    pub available_ids: Vec<String>,
}

fn default_true() -> bool {
    true
}
