use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum RecordError {
    /// Record does not exist or is outside of the caller's scope
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: Uuid },
    /// Record exists but was discarded
    #[error("{resource} {id} was discarded")]
    Discarded { resource: &'static str, id: Uuid },
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::NotFound { .. } => error_response(
                StatusCode::NOT_FOUND,
                "La ressource demandée est introuvable.",
            ),
            Self::Discarded { .. } => error_response(
                StatusCode::GONE,
                "La ressource demandée a été supprimée.",
            ),
        }
    }
}
