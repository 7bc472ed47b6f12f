//! Error types for the Passerelle server application.
//!
//! Each concern (authentication, configuration, records, content negotiation, validation,
//! workflow rules) has its own error type implementing `IntoResponse`, and all of them fold
//! into [`Error`] so handlers can use the `?` operator throughout.

pub mod auth;
pub mod config;
pub mod format;
pub mod record;
pub mod validation;
pub mod workflow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        auth::AuthError, config::ConfigError, format::FormatError, record::RecordError,
        validation::ValidationErrors, workflow::WorkflowError,
    },
};

/// Main error type for the Passerelle server application.
///
/// Aggregates the domain-specific error types and external library errors. The
/// `IntoResponse` implementation delegates to the domain errors, which know their status
/// code, while library errors become a logged 500.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - Authentication & authorization errors (401, 403, failed sign in)
/// - Record errors (404 not found, 410 discarded)
/// - Format errors (406 not acceptable, 501 variant not implemented)
/// - Validation & workflow errors (422)
/// - External library errors (database, sessions, HTTP client, CSV parsing)
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication or authorization error.
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Requested record is missing, out of scope or discarded.
    #[error(transparent)]
    RecordError(#[from] RecordError),
    /// Requested representation is not available.
    #[error(transparent)]
    FormatError(#[from] FormatError),
    /// Submitted attributes are invalid.
    #[error(transparent)]
    ValidationErrors(#[from] ValidationErrors),
    /// Action not allowed in the record's current state.
    #[error(transparent)]
    WorkflowError(#[from] WorkflowError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in Passerelle's code.
    #[error("Internal error with Passerelle's code: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// HTTP client error while downloading import sources.
    #[error(transparent)]
    HttpClientError(#[from] reqwest::Error),
    /// Malformed CSV import source.
    #[error(transparent)]
    CsvError(#[from] csv::Error),
    /// IO error (binding the listener, serving).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

impl From<sea_orm::TransactionError<Error>> for Error {
    fn from(err: sea_orm::TransactionError<Error>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(err) => Self::DbErr(err),
            sea_orm::TransactionError::Transaction(err) => err,
        }
    }
}

/// Converts application errors into HTTP responses.
///
/// # Returns
/// - 401/403/422 - Authentication & authorization errors
/// - 404/410 - Record errors
/// - 406/501 - Format errors
/// - 422 - Validation & workflow errors
/// - 500 Internal Server Error - For all other errors (with error logging)
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::RecordError(err) => err.into_response(),
            Self::FormatError(err) => err.into_response(),
            Self::ValidationErrors(err) => err.into_response(),
            Self::WorkflowError(err) => err.into_response(),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the error message and returns a generic message to the client to avoid leaking
/// implementation details.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorDto {
                error: "Internal server error".to_string(),
            }),
        )
            .into_response()
    }
}

/// Build a JSON error response with the given status and message.
pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}
