//! Navigation decision for clients gating the pregnancy pages. Not a security
//! boundary; protected endpoints are guarded by [`super::extractors::AuthUser`].

pub const LOGIN_PATH: &str = "/login";
pub const PROTECTED_PATH: &str = "/gestacao";

/// Key under which browser clients keep the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "auth-token";

pub fn redirect_for(authenticated: bool) -> &'static str {
    if authenticated {
        PROTECTED_PATH
    } else {
        LOGIN_PATH
    }
}
