use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    model::{
        api::{ErrorDto, ValidationErrorDto},
        list::{ListDto, PaginationDto},
        organization::CollectivityDto,
        transmission::{CreateTransmissionForm, TransmissionDto},
    },
    server::{
        controller::{
            api::API_TAG,
            util::{bearer::api_client, format::accept_json, params::ListParams},
        },
        data::collectivity::CollectivityScope,
        error::Error,
        model::app::AppState,
        service::{collectivity::CollectivityService, transmission::TransmissionService},
    },
};

/// Lists the kept collectivities managed by the client's publisher
///
/// # Responses
/// - 200 (Success): Paginated collectivities
/// - 401 (Unauthorized): Missing or invalid bearer token
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    get,
    path = "/api/collectivites",
    tag = API_TAG,
    params(ListParams),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Collectivities of the publisher", body = ListDto<CollectivityDto>),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let client = api_client(&state, &headers).await?;

    let mut query = params.list_query();
    query.discarded = false;

    let page = CollectivityService::new(&state.db)
        .list(&CollectivityScope::Publisher(client.publisher_id()), &query)
        .await?;

    Ok(Json(ListDto {
        pagination: PaginationDto {
            page: page.page,
            items: page.items,
            total: page.total,
            pages: page.pages,
        },
        records: page.records.into_iter().map(CollectivityDto::from).collect(),
        notice: None,
    }))
}

/// Opens a transmission on behalf of one of the publisher's collectivities
///
/// The transmission is a sandbox one when requested or when the application itself is a
/// sandbox application.
///
/// # Responses
/// - 201 (Created): The opened transmission
/// - 401 (Unauthorized): Missing or invalid bearer token
/// - 404 (Not Found): The collectivity doesn't exist, is discarded or is managed by another
///   publisher
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 500 (Internal Server Error): Database error
#[utoipa::path(
    post,
    path = "/api/collectivites/{id}/transmissions",
    tag = API_TAG,
    params(("id" = Uuid, Path, description = "Collectivity ID")),
    request_body = CreateTransmissionForm,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Transmission opened", body = TransmissionDto),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorDto),
        (status = 404, description = "Collectivity not found", body = ErrorDto),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 422, description = "Invalid body", body = ValidationErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_transmission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(form): Json<CreateTransmissionForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let client = api_client(&state, &headers).await?;

    let transmission_service = TransmissionService::new(&state.db);
    let transmission = transmission_service
        .create_for_client(&client, id, form)
        .await?;

    tracing::info!(
        transmission_id = %transmission.id,
        application_id = %client.application.id,
        "opened API transmission"
    );

    Ok((
        StatusCode::CREATED,
        Json(transmission_service.dto(transmission).await?),
    ))
}
