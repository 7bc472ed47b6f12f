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
        organization::{DgfipDto, DgfipForm},
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
        service::dgfip::DgfipService,
    },
};

static INDEX_PATH: &str = "/dgfips";
static UNDISCARD_PATH: &str = "/dgfips/undiscard";

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    negotiate(&headers, false)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "list dgfips")?;

    let page = DgfipService::new(&state.db)
        .list(&params.list_query())
        .await?
        .map(DgfipDto::from);

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
    authorize(&user, can_manage_organizations(&user), "show dgfip")?;

    let dgfip = DgfipService::new(&state.db).get(id).await?;

    record_response(&session, DgfipDto::from(dgfip)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<DgfipForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "create dgfip")?;

    let dgfip = DgfipService::new(&state.db).create(form).await?;

    tracing::info!("User {} created dgfip {}", user.id(), dgfip.id);

    redirect_with_notice(
        &session,
        NoticeDto::success("Une nouvelle DGFIP a été ajoutée avec succès."),
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
    Json(form): Json<DgfipForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "update dgfip")?;

    DgfipService::new(&state.db).update(id, form).await?;

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
    authorize(&user, can_manage_organizations(&user), "discard dgfip")?;

    DgfipService::new(&state.db).find(id).await?;
    DiscardRepository::new(&state.db)
        .discard::<entity::dgfip::Entity>(id)
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("La DGFIP a été supprimée.", UNDISCARD_PATH, &[id]),
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
    authorize(&user, can_manage_organizations(&user), "undiscard dgfip")?;

    DgfipService::new(&state.db).undiscard(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression de la DGFIP a été annulée."),
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
    authorize(&user, can_manage_organizations(&user), "discard dgfips")?;

    let (ids, query) = params.bulk(false)?;
    let matching = DgfipService::new(&state.db).ids(&query).await?;
    let ids = DiscardRepository::new(&state.db)
        .discard_many::<entity::dgfip::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("Les DGFIPs sélectionnées ont été supprimées.", UNDISCARD_PATH, &ids),
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
    authorize(&user, can_manage_organizations(&user), "undiscard dgfips")?;

    let dgfip_service = DgfipService::new(&state.db);
    let (ids, query) = params.bulk(true)?;
    let matching = dgfip_service.ids(&query).await?;

    // Only one DGFIP may be kept, restoring stops at the first conflict
    for id in ids.resolve(matching) {
        dgfip_service.undiscard(id).await?;
    }

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression des DGFIPs sélectionnées a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}
