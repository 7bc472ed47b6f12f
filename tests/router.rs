//! Requests sent through the full router, session layer included.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use passerelle::server::{model::app::AppState, router};
use passerelle_test_utils::prelude::*;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

fn app(test: &TestContext) -> Router {
    router::routes()
        .with_state(test.to_app_state::<AppState>())
        .layer(SessionManagerLayer::new(MemoryStore::default()))
}

/// Expect the OpenAPI document to list the publisher API and its bearer scheme
#[tokio::test]
async fn serves_openapi_document() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::get("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert!(doc["paths"]["/api/collectivites"].is_object());
    assert!(doc["paths"]["/api/transmissions/{id}/finalisation"].is_object());
    assert!(doc["components"]["securitySchemes"]["bearer"].is_object());

    Ok(())
}

/// Expect web routes to answer 401 without a signed in session
#[tokio::test]
async fn requires_signed_in_session() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;

    let resp = app(&test)
        .oneshot(
            Request::get("/signalements")
                .header(header::ACCEPT, "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
