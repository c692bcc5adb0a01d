use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    AddParticipantRequest, ErrorResponse, GenerateRoundRequest, HealthResponse, HistoryEntryView,
    HistoryResponse, Participant, RosterResponse, RoundResponse, SetAvailabilityRequest,
    UpdateParticipantRequest,
};
use crate::services::{RoundService, ServiceError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RoundService>,
}

/// Configure round and roster routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/participants", web::get().to(list_participants))
        .route("/participants", web::post().to(add_participant))
        .route("/participants/availability", web::post().to(set_availability))
        .route("/participants/{id}", web::put().to(update_participant))
        .route("/participants/{id}", web::delete().to(remove_participant))
        .route("/rounds", web::post().to(generate_round))
        .route("/history", web::get().to(get_history))
        .route("/history", web::delete().to(clear_history));
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn service_error_response(err: &ServiceError) -> HttpResponse {
    let (status, error) = match err {
        ServiceError::Round(_) => (StatusCode::BAD_REQUEST, "invalid_parameter"),
        ServiceError::InvalidParticipant(_) => (StatusCode::BAD_REQUEST, "invalid_participant"),
        ServiceError::ParticipantNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        ServiceError::DuplicateParticipant(_) => (StatusCode::CONFLICT, "duplicate_participant"),
        ServiceError::Store(e) if e.is_corrupt() => (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_state"),
        ServiceError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
    };

    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::warn!("Request rejected: {}", err);
    }

    error_response(status, error, err.to_string())
}

/// Run a store-touching service call off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, HttpResponse>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    match web::block(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(service_error_response(&e)),
        Err(e) => {
            tracing::error!("Blocking task failed: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                e.to_string(),
            ))
        }
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/participants
async fn list_participants(state: web::Data<AppState>) -> HttpResponse {
    let service = state.service.clone();
    match run_blocking(move || service.participants()).await {
        Ok(participants) => HttpResponse::Ok().json(RosterResponse {
            count: participants.len(),
            participants,
        }),
        Err(resp) => resp,
    }
}

/// Add participant endpoint
///
/// POST /api/v1/participants
///
/// Request body:
/// ```json
/// {
///   "id": "string",
///   "category": "A|B",
///   "strength": 5,
///   "formats": ["doubles_a", "mixed"],
///   "available": true
/// }
/// ```
async fn add_participant(
    state: web::Data<AppState>,
    req: web::Json<AddParticipantRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for add_participant request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let service = state.service.clone();
    let participant: Participant = req.into_inner().into();
    match run_blocking(move || service.add_participant(participant)).await {
        Ok(participant) => HttpResponse::Created().json(participant),
        Err(resp) => resp,
    }
}

/// PUT /api/v1/participants/{id}
async fn update_participant(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateParticipantRequest>,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let service = state.service.clone();
    let id = path.into_inner();
    let update = req.into_inner();
    match run_blocking(move || service.update_participant(&id, &update)).await {
        Ok(participant) => HttpResponse::Ok().json(participant),
        Err(resp) => resp,
    }
}

/// DELETE /api/v1/participants/{id}
async fn remove_participant(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let service = state.service.clone();
    let id = path.into_inner();
    match run_blocking(move || service.remove_participant(&id)).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(resp) => resp,
    }
}

/// Check-in endpoint
///
/// POST /api/v1/participants/availability
///
/// Everyone listed becomes available for the next round, everyone else does not.
async fn set_availability(
    state: web::Data<AppState>,
    req: web::Json<SetAvailabilityRequest>,
) -> HttpResponse {
    let service = state.service.clone();
    let ids = req.into_inner().available_ids;
    match run_blocking(move || service.set_availability(&ids)).await {
        Ok(participants) => HttpResponse::Ok().json(RosterResponse {
            count: participants.len(),
            participants,
        }),
        Err(resp) => resp,
    }
}

/// Generate round endpoint
///
/// POST /api/v1/rounds
///
/// Request body (both fields optional, configured defaults apply):
/// ```json
/// {
///   "slotCapacity": 10,
///   "cooldownRounds": 3
/// }
/// ```
async fn generate_round(
    state: web::Data<AppState>,
    req: web::Json<GenerateRoundRequest>,
) -> HttpResponse {
    let service = state.service.clone();
    let GenerateRoundRequest {
        slot_capacity,
        cooldown_rounds,
    } = req.into_inner();

    match run_blocking(move || service.generate_round(slot_capacity, cooldown_rounds)).await {
        Ok(result) => HttpResponse::Ok().json(RoundResponse {
            matches: result.matches,
            unassigned: result.unassigned.into_iter().map(|p| p.id).collect(),
            total_candidates: result.total_candidates,
        }),
        Err(resp) => resp,
    }
}

/// GET /api/v1/history
async fn get_history(state: web::Data<AppState>) -> HttpResponse {
    let service = state.service.clone();
    match run_blocking(move || service.history()).await {
        Ok(history) => {
            let entries: Vec<HistoryEntryView> = history
                .iter()
                .map(|(key, age)| HistoryEntryView {
                    participants: key.ids().map(str::to_string).collect(),
                    age,
                })
                .collect();
            HttpResponse::Ok().json(HistoryResponse {
                count: entries.len(),
                entries,
            })
        }
        Err(resp) => resp,
    }
}

/// DELETE /api/v1/history
async fn clear_history(state: web::Data<AppState>) -> HttpResponse {
    let service = state.service.clone();
    match run_blocking(move || service.clear_history()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(resp) => resp,
    }
}
