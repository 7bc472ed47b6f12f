use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{
        notice::NoticeDto,
        organization::{DdfipDto, DdfipForm},
    },
    server::{
        controller::util::{
            format::{accept_json, negotiate},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        data::discard::DiscardRepository,
        error::Error,
        model::app::AppState,
        policy::{authorize, organization::can_manage_organizations},
        service::ddfip::DdfipService,
    },
};

static INDEX_PATH: &str = "/ddfips";
static UNDISCARD_PATH: &str = "/ddfips/undiscard";

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    negotiate(&headers, false)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "list ddfips")?;

    let page = DdfipService::new(&state.db)
        .list(&params.list_query())
        .await?
        .map(DdfipDto::from);

    list_response(&session, page).await
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "show ddfip")?;

    let ddfip = DdfipService::new(&state.db).get(id).await?;

    record_response(&session, DdfipDto::from(ddfip)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<DdfipForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "create ddfip")?;

    let ddfip = DdfipService::new(&state.db).create(form).await?;

    tracing::info!("User {} created ddfip {}", user.id(), ddfip.id);

    redirect_with_notice(
        &session,
        NoticeDto::success("Une nouvelle DDFIP a été ajoutée avec succès."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<DdfipForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "update ddfip")?;

    DdfipService::new(&state.db).update(id, form).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Les modifications ont été enregistrées avec succès."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn discard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "discard ddfip")?;

    DdfipService::new(&state.db).find(id).await?;
    DiscardRepository::new(&state.db)
        .discard::<entity::ddfip::Entity>(id)
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("La DDFIP a été supprimée.", UNDISCARD_PATH, &[id]),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn undiscard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "undiscard ddfip")?;

    DdfipService::new(&state.db).find(id).await?;
    DiscardRepository::new(&state.db)
        .undiscard::<entity::ddfip::Entity>(id)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression de la DDFIP a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn discard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "discard ddfips")?;

    let (ids, query) = params.bulk(false)?;
    let matching = DdfipService::new(&state.db).ids(&query).await?;
    let ids = DiscardRepository::new(&state.db)
        .discard_many::<entity::ddfip::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("Les DDFIPs sélectionnées ont été supprimées.", UNDISCARD_PATH, &ids),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn undiscard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "undiscard ddfips")?;

    let (ids, query) = params.bulk(true)?;
    let matching = DdfipService::new(&state.db).ids(&query).await?;
    DiscardRepository::new(&state.db)
        .undiscard_many::<entity::ddfip::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression des DDFIPs sélectionnées a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}
