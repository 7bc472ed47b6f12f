use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode},
    Json,
};
use passerelle::{
    model::organization::PublisherForm,
    server::{
        controller::{
            ddfip,
            publisher::{create, discard, discard_many, index, undiscard_many},
            util::{
                format::ACCEPT_VARIANT_HEADER,
                params::{ListParams, RedirectParams},
            },
        },
        model::{app::AppState, session::notice::SessionNotice},
    },
};
use sea_orm::EntityTrait;

use super::*;

fn no_redirect() -> Query<RedirectParams> {
    Query(RedirectParams { redirect: None })
}

/// Expect a discard to be undone with the "Annuler" action of its notice
#[tokio::test]
async fn discards_and_restores_publisher() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let admin = test.user().insert_super_admin().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    sign_in(&test, admin.id).await;
    let state = test.to_app_state::<AppState>();

    let resp = respond(
        discard(
            State(state.clone()),
            test.session.clone(),
            HeaderMap::new(),
            Path(publisher.id),
            no_redirect(),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/editeurs"));

    let notice = SessionNotice::pop(&test.session).await.unwrap().unwrap();
    let action = &notice.actions[0];
    assert_eq!(action.label, "Annuler");
    assert_eq!(action.url, "/editeurs/undiscard");
    assert_eq!(action.params["ids"], publisher.id.to_string());

    let stored = entity::prelude::Publisher::find_by_id(publisher.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert!(stored.discarded_at.is_some());

    let restore = undiscard_many(
        State(state),
        test.session.clone(),
        HeaderMap::new(),
        Query(ListParams {
            ids: Some(publisher.id.to_string()),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(status(restore), StatusCode::SEE_OTHER);

    let stored = entity::prelude::Publisher::find_by_id(publisher.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert!(stored.discarded_at.is_none());

    Ok(())
}

/// Expect an invalid form to be refused without persisting anything
#[tokio::test]
async fn refuses_invalid_publisher() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let admin = test.user().insert_super_admin().await?;
    sign_in(&test, admin.id).await;

    let result = create(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        no_redirect(),
        Json(PublisherForm {
            name: Some("Fiscalité & Territoire".to_string()),
            siren: Some("123".to_string()),
            ..Default::default()
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(entity::prelude::Publisher::find()
        .all(&test.db)
        .await?
        .is_empty());

    Ok(())
}

/// Expect users other than super admins to be forbidden
#[tokio::test]
async fn forbids_organization_admins() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let result = index(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Query(ListParams::default()),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect 406 for clients which don't accept JSON
#[tokio::test]
async fn refuses_html_index() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let admin = test.user().insert_super_admin().await?;
    sign_in(&test, admin.id).await;

    let result = index(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        accept("text/html"),
        Query(ListParams::default()),
    )
    .await;

    assert_eq!(status(result), StatusCode::NOT_ACCEPTABLE);

    Ok(())
}

/// Expect `ids=all` to discard only the publishers matching the search
#[tokio::test]
async fn discards_all_matching_search() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let admin = test.user().insert_super_admin().await?;
    let matching = test.organization().insert_publisher("511022394").await?;
    let other = test.organization().insert_publisher("432611257").await?;
    sign_in(&test, admin.id).await;

    let result = discard_many(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Query(ListParams {
            ids: Some("all".to_string()),
            search: Some("511022394".to_string()),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(status(result), StatusCode::SEE_OTHER);

    let matching = entity::prelude::Publisher::find_by_id(matching.id)
        .one(&test.db)
        .await?
        .unwrap();
    let other = entity::prelude::Publisher::find_by_id(other.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert!(matching.discarded_at.is_some());
    assert!(other.discarded_at.is_none());

    Ok(())
}

/// Expect the autocomplete variant to be served for publishers but not for DDFIPs
#[tokio::test]
async fn negotiates_autocomplete_variant() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let admin = test.user().insert_super_admin().await?;
    test.organization().insert_publisher("511022394").await?;
    sign_in(&test, admin.id).await;
    let state = test.to_app_state::<AppState>();

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_VARIANT_HEADER, HeaderValue::from_static("autocomplete"));

    let publishers = index(
        State(state.clone()),
        test.session.clone(),
        headers.clone(),
        Query(ListParams::default()),
    )
    .await;
    assert_eq!(status(publishers), StatusCode::OK);

    let ddfips = ddfip::index(
        State(state),
        test.session.clone(),
        headers,
        Query(ListParams::default()),
    )
    .await;
    assert_eq!(status(ddfips), StatusCode::NOT_IMPLEMENTED);

    Ok(())
}
