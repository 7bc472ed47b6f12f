use axum::http::{header, HeaderMap};

use crate::server::{
    error::{auth::AuthError, Error},
    model::{app::AppState, auth::ApiClient},
    service::auth::AuthService,
};

/// Token of an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(token.trim()).filter(|token| !token.is_empty())
}

/// Authenticates the publisher application calling the API
///
/// # Returns
/// - `Ok(ApiClient)`: the application, its publisher and the access token used
/// - `Err(Error::AuthError(AuthError::MissingBearerToken))`: no bearer token was sent
/// - `Err(Error::AuthError(AuthError::InvalidBearerToken))`: the token is unknown, revoked,
///   expired, or its application or publisher was discarded
pub async fn api_client(state: &AppState, headers: &HeaderMap) -> Result<ApiClient, Error> {
    let Some(token) = bearer_token(headers) else {
        return Err(AuthError::MissingBearerToken.into());
    };

    AuthService::new(&state.db).authenticate_bearer(token).await
}
