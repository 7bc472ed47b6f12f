use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use passerelle::{
    model::package::PackageAssignForm,
    server::{
        controller::{
            package::{acknowledge, assign, discard, show},
            util::params::RedirectParams,
        },
        model::app::AppState,
    },
};
use sea_orm::EntityTrait;

use super::*;

fn no_redirect() -> Query<RedirectParams> {
    Query(RedirectParams { redirect: None })
}

/// Expect an admin of the receiving DDFIP to acknowledge the package
#[tokio::test]
async fn acknowledges_package_of_own_ddfip() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", None)
        .await?;
    let ddfip = test
        .organization()
        .insert_ddfip(TEST_CODE_DEPARTEMENT)
        .await?;
    let (_, package, _) = test
        .report()
        .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
        .await?;
    let admin = test
        .user()
        .insert_admin("DDFIP", ddfip.id, "admin@dgfip.finances.gouv.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let resp = respond(
        acknowledge(
            State(test.to_app_state::<AppState>()),
            test.session.clone(),
            HeaderMap::new(),
            Path(package.id),
            no_redirect(),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/paquets"));

    let package = entity::prelude::Package::find_by_id(package.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert!(package.acknowledged_at.is_some());

    Ok(())
}

/// Expect admins of another DDFIP to be refused
#[tokio::test]
async fn forbids_other_ddfip_admins() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", None)
        .await?;
    let ddfip = test
        .organization()
        .insert_ddfip(TEST_CODE_DEPARTEMENT)
        .await?;
    let other_ddfip = test.organization().insert_ddfip("33").await?;
    let (_, package, _) = test
        .report()
        .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
        .await?;
    let admin = test
        .user()
        .insert_admin("DDFIP", other_ddfip.id, "admin@dgfip.finances.gouv.fr")
        .await?;
    sign_in(&test, admin.id).await;
    let state = test.to_app_state::<AppState>();

    let acknowledged = acknowledge(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Path(package.id),
        no_redirect(),
    )
    .await;
    assert_eq!(status(acknowledged), StatusCode::FORBIDDEN);

    let shown = show(
        State(state),
        test.session.clone(),
        HeaderMap::new(),
        Path(package.id),
    )
    .await;
    assert_eq!(status(shown), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect packages to be assigned to an office of the DDFIP
#[tokio::test]
async fn assigns_package_to_office() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", None)
        .await?;
    let ddfip = test
        .organization()
        .insert_ddfip(TEST_CODE_DEPARTEMENT)
        .await?;
    let office = test
        .organization()
        .insert_office(ddfip.id, &["evaluation_local_habitation"])
        .await?;
    let (_, package, _) = test
        .report()
        .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
        .await?;
    let admin = test
        .user()
        .insert_admin("DDFIP", ddfip.id, "admin@dgfip.finances.gouv.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let result = assign(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Path(package.id),
        no_redirect(),
        Json(PackageAssignForm {
            office_id: office.id,
        }),
    )
    .await;
    assert_eq!(status(result), StatusCode::SEE_OTHER);

    let package = entity::prelude::Package::find_by_id(package.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(package.office_id, Some(office.id));
    assert!(package.assigned_at.is_some());

    Ok(())
}

/// Expect the collectivity to withdraw its package, which then answers 410
#[tokio::test]
async fn withdraws_unacknowledged_package() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", None)
        .await?;
    let ddfip = test
        .organization()
        .insert_ddfip(TEST_CODE_DEPARTEMENT)
        .await?;
    let (_, package, _) = test
        .report()
        .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
        .await?;
    let user = test
        .user()
        .insert_user("Collectivity", collectivity.id, "agent@pau.fr")
        .await?;
    sign_in(&test, user.id).await;
    let state = test.to_app_state::<AppState>();

    let discarded = discard(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Path(package.id),
        no_redirect(),
    )
    .await;
    assert_eq!(status(discarded), StatusCode::SEE_OTHER);

    let shown = show(
        State(state),
        test.session.clone(),
        HeaderMap::new(),
        Path(package.id),
    )
    .await;
    assert_eq!(status(shown), StatusCode::GONE);

    Ok(())
}
