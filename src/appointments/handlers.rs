use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{parse_when, AppointmentResponse, CreateAppointmentRequest},
    repo::NewAppointment,
};
use crate::{auth::extractors::AuthUser, error::ApiError, extract::ApiJson, state::AppState};

pub fn appointment_routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route("/appointments/:id", delete(delete_appointment))
}

#[instrument(skip(state))]
pub async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<AppointmentResponse>>, ApiError> {
    let items = state
        .store
        .list_appointments(user_id)
        .await?
        .into_iter()
        .map(AppointmentResponse::from)
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state, body))]
pub async fn create_appointment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentResponse>), ApiError> {
    let title = body
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::validation("Title is required"))?;
    let scheduled_at = body
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Date is required"))
        .and_then(|d| parse_when(d).ok_or_else(|| ApiError::validation("Invalid date")))?;

    let appointment = state
        .store
        .create_appointment(
            user_id,
            NewAppointment {
                title,
                scheduled_at,
                location: body.location.unwrap_or_default().trim().to_string(),
                notes: body.notes.filter(|n| !n.trim().is_empty()),
            },
        )
        .await?;

    info!(user_id = %user_id, appointment_id = %appointment.id, "appointment created");
    Ok((StatusCode::CREATED, Json(appointment.into())))
}

#[instrument(skip(state))]
pub async fn delete_appointment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.store.delete_appointment(user_id, id).await? {
        return Err(ApiError::NotFound("Appointment not found".into()));
    }
    info!(user_id = %user_id, appointment_id = %id, "appointment deleted");
    Ok(StatusCode::NO_CONTENT)
}
