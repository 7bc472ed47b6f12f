use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found or discarded despite having an active session")]
    UserNotInDatabase(Uuid),
    #[error("Failed to sign in user due to invalid email or password")]
    InvalidCredentials,
    #[error("Invitation token is unknown or was already used")]
    InvalidInvitation,
    #[error("Authorization header is missing or is not a bearer token")]
    MissingBearerToken,
    #[error("Bearer token is unknown, revoked or expired")]
    InvalidBearerToken,
    #[error("User {user_id} is not allowed to {action}")]
    Forbidden { user_id: Uuid, action: &'static str },
}

impl AuthError {
    fn not_signed_in() -> Response {
        error_response(
            StatusCode::UNAUTHORIZED,
            "Vous devez vous connecter pour continuer.",
        )
    }

    fn bearer_challenge(message: &str) -> Response {
        let mut resp = error_response(StatusCode::UNAUTHORIZED, message);
        resp.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            header::HeaderValue::from_static("Bearer realm=\"Passerelle\""),
        );
        resp
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            Self::UserNotInSession => {
                tracing::debug!("{}", self);

                Self::not_signed_in()
            }
            Self::UserNotInDatabase(user_id) => {
                tracing::debug!(user_id = %user_id, "{}", self);

                Self::not_signed_in()
            }
            Self::InvalidCredentials => {
                tracing::debug!("{}", self);

                error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Adresse e-mail ou mot de passe invalide.",
                )
            }
            Self::InvalidInvitation => {
                tracing::debug!("{}", self);

                error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Cette invitation est invalide ou a déjà été utilisée.",
                )
            }
            Self::MissingBearerToken => {
                tracing::debug!("{}", self);

                Self::bearer_challenge("Jeton d'accès manquant.")
            }
            Self::InvalidBearerToken => {
                tracing::debug!("{}", self);

                Self::bearer_challenge("Jeton d'accès invalide.")
            }
            Self::Forbidden { user_id, action } => {
                tracing::debug!(user_id = %user_id, action = action, "{}", self);

                error_response(
                    StatusCode::FORBIDDEN,
                    "Vous n'êtes pas autorisé à effectuer cette action.",
                )
            }
        }
    }
}
