use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, instrument};

use super::repo::WeekNote;
use crate::{
    auth::extractors::AuthUser, error::ApiError, extract::ApiJson,
    pregnancy::progress::FULL_TERM_WEEKS, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SaveNoteRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub week: i16,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<WeekNote> for NoteResponse {
    fn from(n: WeekNote) -> Self {
        Self {
            week: n.week,
            content: n.content,
            updated_at: n.updated_at,
        }
    }
}

pub fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/:week", put(save_note))
}

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = state.store.list_notes(user_id).await?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

/// PUT /notes/:week { content }; saving the same week again overwrites it.
#[instrument(skip(state, body))]
pub async fn save_note(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(week): Path<i16>,
    ApiJson(body): ApiJson<SaveNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    if !(1..=FULL_TERM_WEEKS as i16).contains(&week) {
        return Err(ApiError::validation("Week must be between 1 and 40"));
    }
    let content = body
        .content
        .ok_or_else(|| ApiError::validation("Content is required"))?;

    let note = state.store.upsert_note(user_id, week, &content).await?;

    info!(user_id = %user_id, week, "note saved");
    Ok(Json(note.into()))
}
