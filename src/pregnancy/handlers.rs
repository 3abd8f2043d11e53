use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use time::{Date, OffsetDateTime};
use tracing::{info, instrument};

use super::dto::{parse_start_date, PregnancyResponse, ProgressResponse, SavePregnancyRequest};
use crate::{auth::extractors::AuthUser, error::ApiError, extract::ApiJson, state::AppState};

pub fn pregnancy_routes() -> Router<AppState> {
    Router::new()
        .route("/pregnancy", get(get_pregnancy).post(save_pregnancy))
        .route("/pregnancy/progress", get(get_progress))
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// GET /pregnancy: the caller's record, or `{}` when none was saved yet.
#[instrument(skip(state))]
pub async fn get_pregnancy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, ApiError> {
    let record = state.store.find_pregnancy(user_id).await?;
    Ok(match record {
        Some(r) => Json(PregnancyResponse::from_record(r, today())).into_response(),
        None => Json(json!({})).into_response(),
    })
}

/// POST /pregnancy { startDate }
#[instrument(skip(state, payload))]
pub async fn save_pregnancy(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<SavePregnancyRequest>,
) -> Result<(StatusCode, Json<PregnancyResponse>), ApiError> {
    let raw = payload
        .start_date
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Start date is required"))?;
    let start_date = parse_start_date(&raw)
        .ok_or_else(|| ApiError::validation("Start date must be YYYY-MM-DD or RFC 3339"))?;

    let record = state.store.upsert_pregnancy(user_id, start_date).await?;

    info!(user_id = %user_id, start_date = %record.start_date, "pregnancy saved");
    Ok((
        StatusCode::CREATED,
        Json(PregnancyResponse::from_record(record, today())),
    ))
}

#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProgressResponse>, ApiError> {
    let record = state
        .store
        .find_pregnancy(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No pregnancy information saved".into()))?;

    Ok(Json(ProgressResponse::for_start(record.start_date, today())))
}
