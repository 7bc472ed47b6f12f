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
        oauth::{OauthApplicationDto, OauthApplicationForm},
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
        policy::{oauth::oauth_owner, scoped},
        service::oauth::OauthApplicationService,
    },
};

static INDEX_PATH: &str = "/organisation/oauth_applications";
static UNDISCARD_PATH: &str = "/organisation/oauth_applications/undiscard";

/// Publisher owning the applications, 403 for anyone but its admins
async fn owner(state: &AppState, session: &Session, action: &'static str) -> Result<Uuid, Error> {
    let user = current_user(state, session).await?;

    scoped(&user, oauth_owner(&user), action)
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    negotiate(&headers, false)?;
    let owner_id = owner(&state, &session, "list oauth applications").await?;

    let page = OauthApplicationService::new(&state.db)
        .list(owner_id, &params.list_query())
        .await?;

    list_response(&session, page).await
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let owner_id = owner(&state, &session, "show oauth application").await?;

    let application = OauthApplicationService::new(&state.db)
        .get(owner_id, id)
        .await?;

    record_response(&session, OauthApplicationDto::from(application)).await
}

/// Registers an application, its secret is only shown in the notice body
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<OauthApplicationForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let owner_id = owner(&state, &session, "create oauth application").await?;

    let created = OauthApplicationService::new(&state.db)
        .create(owner_id, form)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success(format!(
            "L'application {} a été ajoutée avec succès.",
            created.application.name
        ))
        .with_body(created.secret),
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
    Json(form): Json<OauthApplicationForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let owner_id = owner(&state, &session, "update oauth application").await?;

    OauthApplicationService::new(&state.db)
        .update(owner_id, id, form)
        .await?;

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
    let owner_id = owner(&state, &session, "discard oauth application").await?;

    OauthApplicationService::new(&state.db)
        .discard(owner_id, id)
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("L'application a été supprimée.", UNDISCARD_PATH, &[id]),
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
    let owner_id = owner(&state, &session, "undiscard oauth application").await?;

    OauthApplicationService::new(&state.db)
        .undiscard(owner_id, id)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression de l'application a été annulée."),
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
    let owner_id = owner(&state, &session, "discard oauth applications").await?;

    let (ids, query) = params.bulk(false)?;
    let matching = OauthApplicationService::new(&state.db)
        .ids(owner_id, &query)
        .await?;
    let ids = DiscardRepository::new(&state.db)
        .discard_many::<entity::oauth_application::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        discard_notice(
            "Les applications sélectionnées ont été supprimées.",
            UNDISCARD_PATH,
            &ids,
        ),
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
    let owner_id = owner(&state, &session, "undiscard oauth applications").await?;

    let (ids, query) = params.bulk(true)?;
    let matching = OauthApplicationService::new(&state.db)
        .ids(owner_id, &query)
        .await?;
    DiscardRepository::new(&state.db)
        .undiscard_many::<entity::oauth_application::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression des applications sélectionnées a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}
