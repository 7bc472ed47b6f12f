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
        report::{ReportDecisionForm, ReportForm},
    },
    server::{
        controller::util::{
            format::{accept_json, negotiate},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        data::report::ReportScope,
        error::Error,
        model::{app::AppState, auth::CurrentUser, db::ReportModel},
        policy::{
            authorize,
            report::{can_decide_report, can_edit_report, report_scope, reporting_collectivity},
            scoped,
        },
        service::report::ReportService,
    },
};

static INDEX_PATH: &str = "/signalements";
static UNDISCARD_PATH: &str = "/signalements/undiscard";

/// Report in any state the user may edit, 403 otherwise
async fn editable_report(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
    action: &'static str,
) -> Result<ReportModel, Error> {
    let report = ReportService::new(&state.db).find(id).await?;
    authorize(user, can_edit_report(user, &report), action)?;

    Ok(report)
}

/// Report the user may decide on, 403 when its package is handled by someone else
async fn decidable_report(
    state: &AppState,
    user: &CurrentUser,
    id: Uuid,
    action: &'static str,
) -> Result<ReportModel, Error> {
    let report_service = ReportService::new(&state.db);
    let report = report_service.get(id).await?;
    let package = report_service.package(&report).await?;
    authorize(user, can_decide_report(user, &package), action)?;

    Ok(report)
}

/// Collectivity whose reports the user discards in bulk
fn bulk_scope(user: &CurrentUser, action: &'static str) -> Result<ReportScope, Error> {
    scoped(user, reporting_collectivity(user), action).map(ReportScope::Collectivity)
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    negotiate(&headers, false)?;
    let user = current_user(&state, &session).await?;

    let page = ReportService::new(&state.db)
        .list(&report_scope(&user), &params.list_query())
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

    let report_service = ReportService::new(&state.db);
    report_service.find(id).await?;
    let visible = report_service.is_visible(&report_scope(&user), id).await?;
    authorize(&user, visible, "show report")?;

    let report = report_service.get(id).await?;

    record_response(&session, report_service.dto(report).await?).await
}

/// Creates a draft report for the user's collectivity
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<ReportForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    let collectivity_id = scoped(&user, reporting_collectivity(&user), "create report")?;

    ReportService::new(&state.db)
        .create(collectivity_id, form)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le signalement a été créé avec succès."),
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
    Json(form): Json<ReportForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    editable_report(&state, &user, id, "update report").await?;

    ReportService::new(&state.db).update(id, form).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Les modifications ont été enregistrées avec succès."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    editable_report(&state, &user, id, "complete report").await?;

    ReportService::new(&state.db).complete(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le signalement est prêt à être transmis."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn uncomplete(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    editable_report(&state, &user, id, "uncomplete report").await?;

    ReportService::new(&state.db).uncomplete(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le signalement a été repassé en brouillon."),
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
    editable_report(&state, &user, id, "discard report").await?;

    ReportService::new(&state.db).discard(id).await?;

    redirect_with_notice(
        &session,
        discard_notice("Le signalement a été supprimé.", UNDISCARD_PATH, &[id]),
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
    editable_report(&state, &user, id, "undiscard report").await?;

    ReportService::new(&state.db).undiscard(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression du signalement a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

/// Discards the selected draft & ready reports, transmitted ones are left untouched
pub async fn discard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    let scope = bulk_scope(&user, "discard reports")?;

    let report_service = ReportService::new(&state.db);
    let (ids, query) = params.bulk(false)?;
    let matching = report_service.ids(&scope, &query).await?;
    let ids = report_service.discard_many(&ids.resolve(matching)).await?;

    redirect_with_notice(
        &session,
        discard_notice(
            "Les signalements sélectionnés ont été supprimés.",
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
    let user = current_user(&state, &session).await?;
    let scope = bulk_scope(&user, "undiscard reports")?;

    let report_service = ReportService::new(&state.db);
    let (ids, query) = params.bulk(true)?;
    let matching = report_service.ids(&scope, &query).await?;
    report_service
        .undiscard_many(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression des signalements sélectionnés a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn approve(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<ReportDecisionForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    decidable_report(&state, &user, id, "approve report").await?;

    ReportService::new(&state.db).approve(id, form).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le signalement a été approuvé."),
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
    Json(form): Json<ReportDecisionForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    decidable_report(&state, &user, id, "reject report").await?;

    ReportService::new(&state.db).reject(id, form).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Le signalement a été rejeté."),
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
    decidable_report(&state, &user, id, "reset report").await?;

    ReportService::new(&state.db).reset(id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La décision sur le signalement a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}
