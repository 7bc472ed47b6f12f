use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Accept header does not allow a JSON response")]
    NotAcceptable,
    #[error("Response variant {0:?} is not implemented for this resource")]
    VariantNotImplemented(String),
}

impl IntoResponse for FormatError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        match self {
            Self::NotAcceptable => error_response(
                StatusCode::NOT_ACCEPTABLE,
                "Format de réponse non disponible.",
            ),
            Self::VariantNotImplemented(_) => error_response(
                StatusCode::NOT_IMPLEMENTED,
                "Variante de réponse non disponible.",
            ),
        }
    }
}
