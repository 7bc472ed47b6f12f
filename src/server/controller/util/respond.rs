use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{
        list::{ListDto, PaginationDto, RecordDto},
        notice::{NoticeActionDto, NoticeDto},
    },
    server::{data::listing::Page, error::Error, model::session::notice::SessionNotice},
};

/// Local path `redirect` when it is one, `fallback` otherwise
///
/// Absolute URLs and protocol-relative paths (`//host`) are never followed.
pub fn safe_redirect<'a>(redirect: Option<&'a str>, fallback: &'a str) -> &'a str {
    match redirect {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => fallback,
    }
}

/// Index document with the pending flash notice
pub async fn list_response<T: Serialize>(session: &Session, page: Page<T>) -> Result<Response, Error> {
    let notice = SessionNotice::pop(session).await?;

    Ok(Json(ListDto {
        records: page.records,
        pagination: PaginationDto {
            page: page.page,
            items: page.items,
            total: page.total,
            pages: page.pages,
        },
        notice,
    })
    .into_response())
}

/// Record document with the pending flash notice
pub async fn record_response<T: Serialize>(session: &Session, record: T) -> Result<Response, Error> {
    let notice = SessionNotice::pop(session).await?;

    Ok((StatusCode::OK, Json(RecordDto { record, notice })).into_response())
}

/// Stores `notice` for the next document and answers `303 See Other`
pub async fn redirect_with_notice(
    session: &Session,
    notice: NoticeDto,
    redirect: Option<&str>,
    fallback: &str,
) -> Result<Response, Error> {
    SessionNotice::insert(session, notice).await?;

    Ok(Redirect::to(safe_redirect(redirect, fallback)).into_response())
}

/// Notice of a discard, with an "Annuler" action restoring exactly `ids`
pub fn discard_notice(header: &str, undiscard_url: &str, ids: &[Uuid]) -> NoticeDto {
    let ids = ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join(",");

    NoticeDto::success(header).with_action(NoticeActionDto {
        label: "Annuler".to_string(),
        method: "PATCH".to_string(),
        url: undiscard_url.to_string(),
        params: serde_json::json!({ "ids": ids }),
    })
}
