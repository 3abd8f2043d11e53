mod dto;
pub mod handlers;
pub mod progress;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::pregnancy_routes()
}
