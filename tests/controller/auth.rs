use axum::{extract::State, http::StatusCode, Json};
use passerelle::{
    model::auth::LoginForm,
    server::{
        controller::auth::{account, login, logout},
        model::{app::AppState, session::user::SessionUserId},
    },
};

use super::*;

fn login_form(email: &str, password: &str) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: password.to_string(),
        redirect: Some("/signalements".to_string()),
    }
}

/// Expect a redirect to the requested page and the user ID in session
#[tokio::test]
async fn signs_in_with_password() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let user = test
        .user()
        .insert_user_with_password("Publisher", publisher.id, "jeanne@acme.fr")
        .await?;

    let resp = respond(
        login(
            State(test.to_app_state::<AppState>()),
            test.session.clone(),
            HeaderMap::new(),
            Json(login_form("jeanne@acme.fr", TEST_PASSWORD)),
        )
        .await,
    );

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/signalements"));
    assert_eq!(SessionUserId::get(&test.session).await.unwrap(), Some(user.id));

    Ok(())
}

/// Expect 422 and no session user on a wrong password
#[tokio::test]
async fn refuses_wrong_password() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    test.user()
        .insert_user_with_password("Publisher", publisher.id, "jeanne@acme.fr")
        .await?;

    let result = login(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        HeaderMap::new(),
        Json(login_form("jeanne@acme.fr", "not-the-password")),
    )
    .await;

    assert_eq!(status(result), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}

/// Expect 401 when nobody is signed in, 200 once signed in
#[tokio::test]
async fn returns_signed_in_account() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let user = test
        .user()
        .insert_user("Publisher", publisher.id, "jeanne@acme.fr")
        .await?;
    let state = test.to_app_state::<AppState>();

    let anonymous = account(State(state.clone()), test.session.clone(), HeaderMap::new()).await;
    assert_eq!(status(anonymous), StatusCode::UNAUTHORIZED);

    sign_in(&test, user.id).await;
    let signed_in = account(State(state), test.session.clone(), HeaderMap::new()).await;
    assert_eq!(status(signed_in), StatusCode::OK);

    Ok(())
}

/// Expect 406 when the client only accepts HTML
#[tokio::test]
async fn refuses_html_clients() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let user = test
        .user()
        .insert_user("Publisher", publisher.id, "jeanne@acme.fr")
        .await?;
    sign_in(&test, user.id).await;

    let result = account(
        State(test.to_app_state::<AppState>()),
        test.session.clone(),
        accept("text/html"),
    )
    .await;

    assert_eq!(status(result), StatusCode::NOT_ACCEPTABLE);

    Ok(())
}

/// Expect signing out to clear the session and redirect to the sign in page
#[tokio::test]
async fn signs_out() -> Result<(), TestError> {
    let test = TestBuilder::new().with_tables().build().await?;
    let publisher = test.organization().insert_publisher("511022394").await?;
    let user = test
        .user()
        .insert_user("Publisher", publisher.id, "jeanne@acme.fr")
        .await?;
    sign_in(&test, user.id).await;

    let resp = respond(logout(test.session.clone()).await);

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/connexion"));
    assert!(SessionUserId::get(&test.session).await.unwrap().is_none());

    Ok(())
}
