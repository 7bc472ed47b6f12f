use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    model::{
        api::{ErrorDto, ValidationErrorDto},
        report::{ReportDto, ReportForm},
        transmission::TransmissionDto,
    },
    server::{
        controller::{
            api::API_TAG,
            util::{bearer::api_client, format::accept_json},
        },
        error::Error,
        model::app::AppState,
        service::{report::ReportService, transmission::TransmissionService},
    },
};

/// Creates a completed report within one of the publisher's transmissions
///
/// # Responses
/// - 201 (Created): The created report
/// - 401 (Unauthorized): Missing or invalid bearer token
/// - 404 (Not Found): The transmission doesn't exist or belongs to another publisher
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 422 (Unprocessable Entity): Invalid or incomplete report, or transmission already
///   completed
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    post,
    path = "/api/transmissions/{id}/signalements",
    tag = API_TAG,
    params(("id" = Uuid, Path, description = "Transmission ID")),
    request_body = ReportForm,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Report created", body = ReportDto),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 404, description = "Transmission not found", body = ErrorDto),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 422, description = "Invalid report", body = ValidationErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<ReportForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let client = api_client(&state, &headers).await?;

    let transmission = TransmissionService::new(&state.db)
        .find_for_client(&client, id)
        .await?;
    let report = ReportService::new(&state.db)
        .create_in_transmission(&transmission, form)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// Completes one of the publisher's transmissions, packaging its reports
///
/// # Responses
/// - 200 (Success): The completed transmission with its packages
/// - 401 (Unauthorized): Missing or invalid bearer token
/// - 404 (Not Found): The transmission doesn't exist or belongs to another publisher
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 422 (Unprocessable Entity): Transmission already completed or empty, or no DDFIP
///   covers a report
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    put,
    path = "/api/transmissions/{id}/finalisation",
    tag = API_TAG,
    params(("id" = Uuid, Path, description = "Transmission ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Transmission completed", body = TransmissionDto),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 404, description = "Transmission not found", body = ErrorDto),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 422, description = "Transmission can't be completed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let client = api_client(&state, &headers).await?;

    let transmission_service = TransmissionService::new(&state.db);
    let transmission = transmission_service.find_for_client(&client, id).await?;
    let transmission = transmission_service.complete(transmission).await?;

    Ok(Json(transmission))
}
