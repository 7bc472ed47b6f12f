//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with their extractors, the way the router would call them,
//! against an in-memory database and session.

mod api;
mod auth;
mod organization;
mod package;
mod publisher;
mod report;
mod territory;
mod user;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use passerelle::server::{error::Error, model::session::user::SessionUserId};
use passerelle_test_utils::prelude::*;
use uuid::Uuid;

/// Response of a handler, errors included
fn respond<R: IntoResponse>(result: Result<R, Error>) -> Response {
    match result {
        Ok(resp) => resp.into_response(),
        Err(err) => err.into_response(),
    }
}

fn status<R: IntoResponse>(result: Result<R, Error>) -> StatusCode {
    respond(result).status()
}

/// `Location` header of a redirect
fn location(resp: &Response) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn accept(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(value));
    headers
}

async fn sign_in(test: &TestContext, user_id: Uuid) {
    SessionUserId::insert(&test.session, user_id).await.unwrap();
}
