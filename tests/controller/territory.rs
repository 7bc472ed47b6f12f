use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    Json,
};
use passerelle::{
    model::territory::TerritoryForm,
    server::{
        controller::{
            territory::{commune, import},
            util::{
                format::ACCEPT_VARIANT_HEADER,
                params::{ListParams, RedirectParams},
            },
        },
        model::app::AppState,
    },
};

use super::*;

/// Expect communes to be suggested by INSEE code
#[tokio::test]
async fn autocompletes_communes() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let user = test
        .user()
        .insert_user("Publisher", publisher.id, "jeanne@editeur.fr")
        .await?;
    sign_in(&test, user.id).await;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_VARIANT_HEADER, HeaderValue::from_static("autocomplete"));

    let resp = respond(
        commune::index(
            State(test.to_app_state::<AppState>()),
            test.session.clone(),
            headers,
            Query(ListParams {
                search: Some(TEST_CODE_INSEE.to_string()),
                ..Default::default()
            }),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let items: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["value"], TEST_CODE_INSEE);
    assert_eq!(
        items[0]["label"],
        format!("{} ({})", territories.commune.name, TEST_CODE_INSEE)
    );

    Ok(())
}

/// Expect renaming to be reserved to super admins
#[tokio::test]
async fn reserves_renaming_to_super_admins() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    let super_admin = test.user().insert_super_admin().await?;
    let state = test.to_app_state::<AppState>();
    let form = TerritoryForm {
        name: Some("Pau".to_string()),
    };

    sign_in(&test, admin.id).await;
    let forbidden = commune::update(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Path(territories.commune.id),
        Query(RedirectParams { redirect: None }),
        Json(form.clone()),
    )
    .await;
    assert_eq!(status(forbidden), StatusCode::FORBIDDEN);

    sign_in(&test, super_admin.id).await;
    let resp = respond(
        commune::update(
            State(state),
            test.session.clone(),
            HeaderMap::new(),
            Path(territories.commune.id),
            Query(RedirectParams { redirect: None }),
            Json(form),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/territoires/communes"));

    Ok(())
}

/// Expect imports to be started by super admins only
#[tokio::test]
async fn starts_import_for_super_admins() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    let super_admin = test.user().insert_super_admin().await?;
    let state = test.to_app_state::<AppState>();

    sign_in(&test, admin.id).await;
    let forbidden = import(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Query(RedirectParams { redirect: None }),
    )
    .await;
    assert_eq!(status(forbidden), StatusCode::FORBIDDEN);

    sign_in(&test, super_admin.id).await;
    let started = import(
        State(state),
        test.session.clone(),
        HeaderMap::new(),
        Query(RedirectParams { redirect: None }),
    )
    .await;
    assert_eq!(status(started), StatusCode::SEE_OTHER);

    Ok(())
}
