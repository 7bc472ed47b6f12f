use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::notice::NoticeDto,
    server::{
        controller::util::{
            format::accept_json,
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{record_response, redirect_with_notice},
        },
        data::report::ReportScope,
        error::Error,
        model::{app::AppState, auth::CurrentUser, db::TransmissionModel},
        policy::{scoped, transmission::transmitting_collectivity},
        service::{report::ReportService, transmission::TransmissionService},
    },
};

static REPORTS_PATH: &str = "/signalements";
static TRANSMISSION_PATH: &str = "/transmission";

/// Active transmission of the user's collectivity, opened when there is none
async fn active_transmission(
    state: &AppState,
    user: &CurrentUser,
    action: &'static str,
) -> Result<TransmissionModel, Error> {
    let collectivity_id = scoped(user, transmitting_collectivity(user), action)?;

    TransmissionService::new(&state.db)
        .active(collectivity_id, user.id())
        .await
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    let transmission = active_transmission(&state, &user, "show transmission").await?;

    let transmission = TransmissionService::new(&state.db)
        .dto(transmission)
        .await?;

    record_response(&session, transmission).await
}

/// Adds the selected reports, those that can't be transmitted are skipped
pub async fn add_reports(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    let transmission = active_transmission(&state, &user, "add reports to transmission").await?;

    let (ids, query) = params.bulk(false)?;
    let matching = ReportService::new(&state.db)
        .ids(&ReportScope::Collectivity(transmission.collectivity_id), &query)
        .await?;
    let added = TransmissionService::new(&state.db)
        .add_reports(&transmission, &ids.resolve(matching))
        .await?;

    let header = match added.len() {
        0 => "Aucun signalement n'a été ajouté à la transmission.".to_string(),
        1 => "1 signalement a été ajouté à la transmission.".to_string(),
        count => format!("{} signalements ont été ajoutés à la transmission.", count),
    };

    redirect_with_notice(
        &session,
        NoticeDto::success(header),
        params.redirect.as_deref(),
        TRANSMISSION_PATH,
    )
    .await
}

pub async fn remove_reports(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    let transmission =
        active_transmission(&state, &user, "remove reports from transmission").await?;

    let (ids, query) = params.bulk(false)?;
    let matching = ReportService::new(&state.db)
        .ids(&ReportScope::Collectivity(transmission.collectivity_id), &query)
        .await?;
    TransmissionService::new(&state.db)
        .remove_reports(&transmission, &ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Les signalements ont été retirés de la transmission."),
        params.redirect.as_deref(),
        TRANSMISSION_PATH,
    )
    .await
}

/// Packages the transmission's reports for their DDFIPs
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    let transmission = active_transmission(&state, &user, "complete transmission").await?;

    let transmission = TransmissionService::new(&state.db)
        .complete(transmission)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success(format!(
            "La transmission a été effectuée, {} paquet(s) ont été envoyés.",
            transmission.packages.len()
        )),
        params.redirect.as_deref(),
        REPORTS_PATH,
    )
    .await
}
