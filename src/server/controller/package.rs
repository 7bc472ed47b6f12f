use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{notice::NoticeDto, package::PackageAssignForm},
    server::{
        controller::util::{
            format::{accept_json, negotiate},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        error::Error,
        model::{app::AppState, auth::CurrentUser},
        policy::{
            authorize,
            package::{can_discard_package, can_manage_package, package_scope},
        },
        service::package::PackageService,
    },
};

static INDEX_PATH: &str = "/paquets";

/// Loads a package, 403 unless the user is one of its DDFIP admins
async fn authorize_management(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
    action: &'static str,
) -> Result<(), Error> {
    let package = PackageService::new(&state.db).find(id).await?;

    authorize(user, can_manage_package(user, &package), action)
}

/// Loads a package, 403 unless the user belongs to the collectivity that sent it
async fn authorize_withdrawal(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
    action: &'static str,
) -> Result<(), Error> {
    let package = PackageService::new(&state.db).find(id).await?;

    authorize(user, can_discard_package(user, &package), action)
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    negotiate(&headers, false)?;
    let user = current_user(&state, &session).await?;

    let page = PackageService::new(&state.db)
        .list(&package_scope(&user), &params.list_query())
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
    let user = current_user(&state, &session).await?;

    let package_service = PackageService::new(&state.db);
    let package = package_service.get(id).await?;
    let visible = package_service
        .is_visible(&package_scope(&user), id)
        .await?;
    authorize(&user, visible, "show package")?;

    record_response(&session, package_service.dto(package)).await
}

pub async fn acknowledge(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize_management(&state, &user, id, "acknowledge package").await?;

    PackageService::new(&state.db).acknowledge(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La réception du paquet a été confirmée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn assign(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<PackageAssignForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize_management(&state, &user, id, "assign package").await?;

    PackageService::new(&state.db)
        .assign(id, form.office_id)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le paquet a été assigné au guichet."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn reject(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize_management(&state, &user, id, "reject package").await?;

    PackageService::new(&state.db).reject(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le paquet a été rejeté."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn reset(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize_management(&state, &user, id, "reset package").await?;

    PackageService::new(&state.db).reset(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("L'assignation du paquet a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

/// Withdraws a package the DDFIP has not acknowledged yet
pub async fn discard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize_withdrawal(&state, &user, id, "discard package").await?;

    PackageService::new(&state.db).discard(id).await?;

    redirect_with_notice(
        &session,
        discard_notice(
            "Le paquet a été retiré.",
            &format!("{}/{}/undiscard", INDEX_PATH, id),
            &[id],
        ),
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
    authorize_withdrawal(&state, &user, id, "undiscard package").await?;

    PackageService::new(&state.db).undiscard(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le retrait du paquet a été annulé."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}
