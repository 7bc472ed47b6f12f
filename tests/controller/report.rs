use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use passerelle::{
    model::report::ReportForm,
    server::{
        controller::{
            report::{complete, create, discard, update},
            transmission,
            util::params::{ListParams, RedirectParams},
        },
        model::app::AppState,
    },
};
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter};

use super::*;

fn no_redirect() -> Query<RedirectParams> {
    Query(RedirectParams { redirect: None })
}

/// Expect a collectivity user to create a report, then to complete it
#[tokio::test]
async fn creates_and_completes_report() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", None)
        .await?;
    let user = test
        .user()
        .insert_user("Collectivity", collectivity.id, "agent@pau.fr")
        .await?;
    sign_in(&test, user.id).await;
    let state = test.to_app_state::<AppState>();

    let created = respond(
        create(
            State(state.clone()),
            test.session.clone(),
            HeaderMap::new(),
            no_redirect(),
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
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&created), Some("/signalements"));

    let report = entity::prelude::Report::find()
        .filter(entity::report::Column::CollectivityId.eq(collectivity.id))
        .one(&test.db)
        .await?
        .unwrap();
    assert!(report.completed_at.is_none());

    let completed = complete(
        State(state),
        test.session.clone(),
        HeaderMap::new(),
        Path(report.id),
        no_redirect(),
    )
    .await;
    assert_eq!(status(completed), StatusCode::SEE_OTHER);

    let report = entity::prelude::Report::find_by_id(report.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert!(report.completed_at.is_some());

    Ok(())
}

/// Expect users outside collectivities to be refused report creation
#[tokio::test]
async fn forbids_creation_outside_collectivities() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let user = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    sign_in(&test, user.id).await;

    let result = create(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        no_redirect(),
        Json(ReportForm {
            form_type: Some("evaluation_local_habitation".to_string()),
            ..Default::default()
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect completed reports added to the transmission to be packaged for the DDFIP
#[tokio::test]
async fn transmits_completed_reports() -> Result<(), TestError> {
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
    let completed = test
        .report()
        .insert_completed_report(collectivity.id, TEST_CODE_INSEE)
        .await?;
    let draft = test
        .report()
        .insert_report(collectivity.id, "evaluation_local_habitation")
        .await?;
    let user = test
        .user()
        .insert_user("Collectivity", collectivity.id, "agent@pau.fr")
        .await?;
    sign_in(&test, user.id).await;
    let state = test.to_app_state::<AppState>();

    let added = transmission::add_reports(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Query(ListParams {
            ids: Some("all".to_string()),
            ..Default::default()
        }),
    )
    .await;
    assert_eq!(status(added), StatusCode::SEE_OTHER);

    let resp = respond(
        transmission::complete(
            State(state),
            test.session.clone(),
            HeaderMap::new(),
            no_redirect(),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/signalements"));

    let packages = entity::prelude::Package::find().all(&test.db).await?;
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].ddfip_id, ddfip.id);

    let completed = entity::prelude::Report::find_by_id(completed.id)
        .one(&test.db)
        .await?
        .unwrap();
    let draft = entity::prelude::Report::find_by_id(draft.id)
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(completed.package_id, Some(packages[0].id));
    assert!(completed.reference.is_some());
    assert!(draft.package_id.is_none());

    Ok(())
}

/// Expect an empty transmission to be refused
#[tokio::test]
async fn refuses_empty_transmission() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", None)
        .await?;
    let user = test
        .user()
        .insert_user("Collectivity", collectivity.id, "agent@pau.fr")
        .await?;
    sign_in(&test, user.id).await;

    let result = transmission::complete(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        no_redirect(),
    )
    .await;

    assert_eq!(status(result), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

/// Expect a transmitted report to be kept
#[tokio::test]
async fn refuses_discarding_packaged_report() -> Result<(), TestError> {
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
    let (_, _, report) = test
        .report()
        .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
        .await?;
    let user = test
        .user()
        .insert_user("Collectivity", collectivity.id, "agent@pau.fr")
        .await?;
    sign_in(&test, user.id).await;

    let result = discard(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Path(report.id),
        no_redirect(),
    )
    .await;

    assert_eq!(status(result), StatusCode::UNPROCESSABLE_ENTITY);

    Ok(())
}

/// Expect reports created through the API to stay read-only on the web
#[tokio::test]
async fn forbids_editing_api_reports() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let territories = test.territory().insert_test_territories().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let collectivity = test
        .organization()
        .insert_commune_collectivity(&territories.commune, "216401024", Some(publisher.id))
        .await?;
    let report = test
        .report()
        .insert_report(collectivity.id, "evaluation_local_habitation")
        .await?;
    let mut report_am = report.into_active_model();
    report_am.publisher_id = ActiveValue::Set(Some(publisher.id));
    let report = report_am.update(&test.db).await?;
    let user = test
        .user()
        .insert_user("Collectivity", collectivity.id, "agent@pau.fr")
        .await?;
    sign_in(&test, user.id).await;

    let result = update(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Path(report.id),
        no_redirect(),
        Json(ReportForm {
            observations: Some("Local transformé en commerce".to_string()),
            ..Default::default()
        }),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}
