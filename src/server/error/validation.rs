use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ValidationErrorDto;

/// Field errors accumulated while validating submitted attributes.
///
/// Services push every failing rule, then call [`ValidationErrors::into_result`] so the
/// client receives all problems at once.
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("Validation failed for fields: {}", self.fields().join(", "))]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single failing field.
    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    /// `Ok(())` when no rule failed, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorDto {
                error: "Les données soumises sont invalides.".to_string(),
                errors: self.errors,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ValidationErrors;

    /// Expect messages for the same field to accumulate
    #[test]
    fn accumulates_messages_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("siren", "doit être rempli(e)");
        errors.add("siren", "n'est pas valide");
        errors.add("name", "doit être rempli(e)");

        assert_eq!(errors.fields(), vec!["name", "siren"]);
        assert!(errors.into_result().is_err());
    }

    /// Expect Ok when nothing was added
    #[test]
    fn empty_errors_are_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
