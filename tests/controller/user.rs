use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use passerelle::{
    model::{auth::InvitationForm, user::UserForm},
    server::{
        controller::{auth::accept_invitation, organization, user, util::params::RedirectParams},
        model::{
            app::AppState,
            session::{notice::SessionNotice, user::SessionUserId},
        },
    },
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::*;

fn no_redirect() -> Query<RedirectParams> {
    Query(RedirectParams { redirect: None })
}

/// Expect the invitation token to be given in the notice, then to let the user choose a password
#[tokio::test]
async fn invites_member_of_own_organization() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;
    let state = test.to_app_state::<AppState>();

    let resp = respond(
        organization::user::create(
            State(state.clone()),
            test.session.clone(),
            HeaderMap::new(),
            no_redirect(),
            Json(UserForm {
                email: Some("Jeanne@Editeur.fr".to_string()),
                first_name: Some("Jeanne".to_string()),
                last_name: Some("Dupont".to_string()),
                ..Default::default()
            }),
        )
        .await,
    );
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/organisation/utilisateurs"));

    let invited = entity::prelude::User::find()
        .filter(entity::user::Column::Email.eq("jeanne@editeur.fr"))
        .one(&test.db)
        .await?
        .unwrap();
    assert_eq!(invited.organization_id, publisher.id);

    let token = SessionNotice::pop(&test.session)
        .await
        .unwrap()
        .and_then(|notice| notice.body)
        .unwrap();

    let session = test.new_session();
    let accepted = accept_invitation(
        State(state),
        session.clone(),
        HeaderMap::new(),
        Json(InvitationForm {
            token,
            password: TEST_PASSWORD.to_string(),
            password_confirmation: TEST_PASSWORD.to_string(),
        }),
    )
    .await;
    assert_eq!(status(accepted), StatusCode::SEE_OTHER);
    assert_eq!(SessionUserId::get(&session).await.unwrap(), Some(invited.id));

    Ok(())
}

/// Expect an organization admin to be refused users of another organization
#[tokio::test]
async fn forbids_other_organizations_users() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let other = test.organization().insert_publisher("432611257").await?;
    let admin = test
        .user()
        .insert_admin("Publisher", publisher.id, "admin@editeur.fr")
        .await?;
    let stranger = test
        .user()
        .insert_user("Publisher", other.id, "jeanne@autre-editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;

    let result = organization::user::show(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Path(stranger.id),
    )
    .await;

    assert_eq!(status(result), StatusCode::FORBIDDEN);

    Ok(())
}

/// Expect a discarded user to answer 410 until restored
#[tokio::test]
async fn answers_gone_for_discarded_user() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let admin = test.user().insert_super_admin().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let member = test
        .user()
        .insert_user("Publisher", publisher.id, "jeanne@editeur.fr")
        .await?;
    sign_in(&test, admin.id).await;
    let state = test.to_app_state::<AppState>();

    let discarded = user::discard(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Path(member.id),
        no_redirect(),
    )
    .await;
    assert_eq!(status(discarded), StatusCode::SEE_OTHER);

    let gone = user::show(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Path(member.id),
    )
    .await;
    assert_eq!(status(gone), StatusCode::GONE);

    let restored = user::undiscard(
        State(state.clone()),
        test.session.clone(),
        HeaderMap::new(),
        Path(member.id),
        no_redirect(),
    )
    .await;
    assert_eq!(status(restored), StatusCode::SEE_OTHER);

    let shown = user::show(
        State(state),
        test.session.clone(),
        HeaderMap::new(),
        Path(member.id),
    )
    .await;
    assert_eq!(status(shown), StatusCode::OK);

    Ok(())
}
