use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The response when an error occurs with a request
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorDto {
    /// The error message
    pub error: String,
}

/// The response when submitted attributes are invalid
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationErrorDto {
    /// The error message
    pub error: String,
    /// Error messages per invalid field
    pub errors: BTreeMap<String, Vec<String>>,
}
