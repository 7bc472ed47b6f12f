use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use passerelle::{
    model::{oauth::OauthApplicationForm, organization::CollectivityForm},
    server::{
        controller::{
            organization::{collectivity, oauth},
            util::params::RedirectParams,
        },
        model::{app::AppState, session::notice::SessionNotice},
    },
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::*;

/// Expect a publisher admin to be refused another publisher's collectivity
#[tokio::test]
async fn forbids_other_publishers_collectivity() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let other = test.organization().insert_publisher("432611257").await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", Some(other.id))
        .await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let result = collectivity::show(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Path(collectivity.id),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect collectivities created by a publisher admin to be attached to their publisher
#[tokio::test]
async fn attaches_created_collectivity_to_publisher() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let other = test.organization().insert_publisher("432611257").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let resp = respond(
        collectivity::create(
            State(test.to_app_state::<AppState>()),
            test.session.clone(),
            HeaderMap::new(),
            Query(RedirectParams { redirect: None }),
            Json(CollectivityForm {
                territory_type: Some("Commune".to_string()),
                territory_id: Some(territories.commune.id),
                publisher_id: Some(other.id.to_string()),
                name: Some("Commune de Pau".to_string()),
                siren: Some("216401024".to_string()),
                ..Default::default()
            }),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/organisation/collectivites"));

    let created = entity::prelude::Collectivity::find()
        .filter(entity::collectivity::Column::Siren.eq("216401024"))
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(created.publisher_id, Some(publisher.id));

    Ok(())
}

/// Expect the client secret to be shown once, in the creation notice
#[tokio::test]
async fn shows_oauth_secret_in_notice() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let result = oauth::create(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Query(RedirectParams { redirect: None }),
        Json(OauthApplicationForm {
            name: Some("Logiciel Fiscalité".to_string()),
            redirect_uri: None,
            sandbox: Some(true),
        }),
    )
    .await;
    assert_eq!(status(result), StatusCode::SEE_OTHER);

    let notice = SessionNotice::pop(&test.session).await.unwrap().unwrap();
    let secret = notice.body.unwrap();
    let application = entity::prelude::OauthApplication::find()
        .filter(entity::oauth_application::Column::OwnerId.eq(publisher.id))
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(application.secret_digest, digest(&secret));

    Ok(())
}

/// Expect members who are not organization admins to be refused OAuth applications
#[tokio::test]
async fn forbids_oauth_to_non_admins() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let application = test.auth().insert_oauth_application(publisher.id).await?;
    let member = test
        .user()
        .insert_user("Publisher", publisher.id, "jeanne@editeur.fr")
        .await?;
    sign_in(&test, member.id).await;

    let result = oauth::show(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Path(application.id),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}
