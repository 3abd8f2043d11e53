use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, ChangePasswordRequest, CredentialsResponse, GuardResponse,
            LoginRequest, LoginResponse, PublicUser, RegisterRequest,
        },
        extractors::{AuthUser, MaybeAuthUser},
        guard, services,
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/credentials", post(credentials))
        .route("/auth/register", post(register))
        .route("/auth/password", post(change_password))
        .route("/auth/guard", get(guard_decision))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

/// `/auth/login` failures: `{success: false, error}`.
pub struct LoginRejection(ApiError);

impl From<ApiError> for LoginRejection {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl IntoResponse for LoginRejection {
    fn into_response(self) -> Response {
        self.0.log_if_internal();
        let body = json!({ "success": false, "error": self.0.public_message() });
        (self.0.status(), Json(body)).into_response()
    }
}

/// `/auth/credentials` failures: `{message}`.
pub struct CredentialsRejection(ApiError);

impl From<ApiError> for CredentialsRejection {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl IntoResponse for CredentialsRejection {
    fn into_response(self) -> Response {
        self.0.log_if_internal();
        let body = json!({ "message": self.0.public_message() });
        (self.0.status(), Json(body)).into_response()
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<ApiJson<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, LoginRejection> {
    let ApiJson(payload) = payload?;
    let (email, password) = payload
        .required()
        .ok_or_else(|| ApiError::validation("Email and password are required"))?;

    let session = services::login(state.store.as_ref(), &state.jwt, &email, &password).await?;

    info!(user_id = %session.user.id, "user logged in");
    Ok(Json(LoginResponse {
        success: true,
        user: session.user,
        token: session.token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn credentials(
    State(state): State<AppState>,
    payload: Result<ApiJson<LoginRequest>, ApiError>,
) -> Result<Json<CredentialsResponse>, CredentialsRejection> {
    let ApiJson(payload) = payload?;
    let (email, password) = payload
        .required()
        .ok_or_else(|| ApiError::validation("Email and password are required"))?;

    let session = services::login(state.store.as_ref(), &state.jwt, &email, &password).await?;

    info!(user_id = %session.user.id, "user logged in with credentials");
    Ok(Json(CredentialsResponse {
        message: "Login successful".into(),
        user: session.user,
        token: session.token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::validation("Email and password are required"));
    };

    let user = services::register(
        state.store.as_ref(),
        &email,
        &password,
        payload.name.as_deref(),
    )
    .await?;
    let session = services::issue_session(&state.jwt, &user)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: session.user,
            token: session.token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    let (Some(current), Some(new)) = (payload.current_password, payload.new_password) else {
        return Err(ApiError::validation(
            "Current and new password are required",
        ));
    };

    services::change_password(state.store.as_ref(), user_id, &current, &new).await?;

    info!(user_id = %user_id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(PublicUser::from(&user)))
}

pub async fn guard_decision(MaybeAuthUser(user): MaybeAuthUser) -> Json<GuardResponse> {
    let authenticated = user.is_some();
    Json(GuardResponse {
        authenticated,
        redirect: guard::redirect_for(authenticated),
        token_storage_key: guard::TOKEN_STORAGE_KEY,
    })
}
