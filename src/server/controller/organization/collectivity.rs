use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::organization::CollectivityForm,
    server::{
        controller::{
            collectivity::OWN,
            util::params::{ListParams, RedirectParams},
        },
        error::Error,
        model::app::AppState,
    },
};

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    OWN.index(state, session, headers, params).await
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    OWN.show(state, session, headers, id).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<CollectivityForm>,
) -> Result<impl IntoResponse, Error> {
    OWN.create(state, session, headers, params, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<CollectivityForm>,
) -> Result<impl IntoResponse, Error> {
    OWN.update(state, session, headers, id, params, form).await
}

pub async fn discard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    OWN.discard(state, session, headers, id, params).await
}

pub async fn undiscard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    OWN.undiscard(state, session, headers, id, params).await
}

pub async fn discard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    OWN.discard_many(state, session, headers, params).await
}

pub async fn undiscard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    OWN.undiscard_many(state, session, headers, params).await
}
