use axum::{
    body::to_bytes,
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use chrono::NaiveDate;
use passerelle::{
    model::{report::ReportForm, transmission::CreateTransmissionForm},
    server::{
        controller::{
            api::{collectivity, transmission},
            util::params::ListParams,
        },
        model::app::AppState,
    },
};
use uuid::Uuid;

use super::*;

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

async fn json_body(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Expect requests without a valid bearer token to be refused
#[tokio::test]
async fn requires_bearer_token() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let state = test.to_app_state::<AppState>();

    let missing = collectivity::index(
        State(state.clone()),
        HeaderMap::new(),
        Query(ListParams::default()),
    )
    .await;
    assert_eq!(status(missing), StatusCode::UNAUTHORIZED);

    let unknown = collectivity::index(
        State(state),
        bearer("not-a-token"),
        Query(ListParams::default()),
    )
    .await;
    assert_eq!(status(unknown), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Expect only the collectivities of the client's publisher to be listed
#[tokio::test]
async fn lists_publisher_collectivities() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let other = test.organization().insert_publisher("432611257").await?;
    let managed = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", Some(publisher.id))
        .await?;
    test.organization()
        .insert_commune_collectivity(&territories.commune, "200067106", Some(other.id))
        .await?;
    test.auth().insert_access_token(publisher.id).await?;

    let resp = respond(
        collectivity::index(
            State(test.to_app_state::<AppState>()),
            bearer(TEST_ACCESS_TOKEN),
            Query(ListParams::default()),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], managed.id.to_string());
    assert!(body["notice"].is_null());

    Ok(())
}

/// Expect collectivities of another publisher to be reported missing
#[tokio::test]
async fn hides_other_publishers_collectivities() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let other = test.organization().insert_publisher("432611257").await?;
    let foreign = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", Some(other.id))
        .await?;
    test.auth().insert_access_token(publisher.id).await?;

    let result = collectivity::create_transmission(
        State(test.to_app_state::<AppState>()),
        bearer(TEST_ACCESS_TOKEN),
        Path(foreign.id),
        Json(CreateTransmissionForm { sandbox: false }),
    )
    .await;

    assert_eq!(status(result), StatusCode::NOT_FOUND);

    Ok(())
}

/// Expect a transmission to be opened, filled with a report and completed into a package
#[tokio::test]
async fn transmits_reports_through_api() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", Some(publisher.id))
        .await?;
    test.organization()
        .insert_ddfip(TEST_CODE_DEPARTEMENT)
        .await?;
    test.auth().insert_access_token(publisher.id).await?;
    let state = test.to_app_state::<AppState>();

    let opened = respond(
        collectivity::create_transmission(
            State(state.clone()),
            bearer(TEST_ACCESS_TOKEN),
            Path(collectivity.id),
            Json(CreateTransmissionForm { sandbox: false }),
        )
        .await,
    );
    assert_eq!(opened.status(), StatusCode::CREATED);
    let opened = json_body(opened).await;
    assert_eq!(opened["publisher_id"], publisher.id.to_string());
    let transmission_id: Uuid = opened["id"].as_str().unwrap().parse().unwrap();

    let report = respond(
        transmission::create_report(
            State(state.clone()),
            bearer(TEST_ACCESS_TOKEN),
            Path(transmission_id),
            Json(ReportForm {
                form_type: Some("evaluation_local_habitation".to_string()),
                anomalies: Some(vec!["affectation".to_string()]),
                code_insee: Some(TEST_CODE_INSEE.to_string()),
                date_constat: NaiveDate::from_ymd_opt(2026, 5, 2),
                situation_invariant: Some("0123456789".to_string()),
                ..Default::default()
            }),
        )
        .await,
    );
    assert_eq!(report.status(), StatusCode::CREATED);

    let completed = respond(
        transmission::complete(State(state), bearer(TEST_ACCESS_TOKEN), Path(transmission_id))
            .await,
    );
    assert_eq!(completed.status(), StatusCode::OK);
    let completed = json_body(completed).await;
    assert!(!completed["completed_at"].is_null());
    assert_eq!(completed["packages"].as_array().unwrap().len(), 1);

    Ok(())
}

/// Expect a report missing required fields to be refused
#[tokio::test]
async fn refuses_incomplete_api_report() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", Some(publisher.id))
        .await?;
    test.auth().insert_access_token(publisher.id).await?;
    let state = test.to_app_state::<AppState>();

    let opened = respond(
        collectivity::create_transmission(
            State(state.clone()),
            bearer(TEST_ACCESS_TOKEN),
            Path(collectivity.id),
            Json(CreateTransmissionForm { sandbox: true }),
        )
        .await,
    );
    let transmission_id: Uuid = json_body(opened).await["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let result = transmission::create_report(
        State(state),
        bearer(TEST_ACCESS_TOKEN),
        Path(transmission_id),
        Json(ReportForm {
            form_type: Some("evaluation_local_habitation".to_string()),
            ..Default::default()
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}
