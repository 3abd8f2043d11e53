use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Authentication failures. All of them surface as 401.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no token provided")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to a client. Unknown-user and wrong-password are
    /// reported identically; internal details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Auth(AuthError::NotFound | AuthError::InvalidCredentials) => {
                "Invalid email or password".into()
            }
            ApiError::Auth(AuthError::MissingToken) => "No token provided".into(),
            ApiError::Auth(AuthError::InvalidToken) => "Invalid token".into(),
            ApiError::Auth(AuthError::Expired) => "Token expired".into(),
            ApiError::Validation(msg) | ApiError::Conflict(msg) | ApiError::NotFound(msg) => {
                msg.clone()
            }
            ApiError::Internal(_) => "Internal server error".into(),
        }
    }

    /// Logs internal errors once, right before they are turned into a response.
    pub(crate) fn log_if_internal(&self) {
        if let ApiError::Internal(e) = self {
            error!(error = %format!("{e:#}"), "internal error");
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_if_internal();
        let status = self.status();
        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
