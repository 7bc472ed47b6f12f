use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect},
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, ValidationErrorDto},
        auth::{AccountDto, InvitationForm, LoginForm, OrganizationSummaryDto},
        list::RecordDto,
        notice::NoticeDto,
        user::UserDto,
    },
    server::{
        controller::util::{
            format::accept_json,
            get_user::current_user,
            respond::{record_response, redirect_with_notice, safe_redirect},
        },
        error::Error,
        model::{app::AppState, session::user::SessionUserId},
        service::auth::AuthService,
    },
};

pub static AUTH_TAG: &str = "auth";

/// Path users land on after signing in
pub static HOME_PATH: &str = "/compte";

/// Signs a user in with email and password
///
/// Stores the user ID in a fresh session and redirects to the `redirect` path when it is a
/// local one.
///
/// # Responses
/// - 303 (See Other): Signed in, redirect to the requested page or to the account page
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 422 (Unprocessable Entity): Unknown email, wrong password, discarded user or user who
///   never chose a password
/// - 500 (Internal Server Error): Database or session error
#[utoipa::path(
    post,
    path = "/connexion",
    tag = AUTH_TAG,
    request_body = LoginForm,
    responses(
        (status = 303, description = "Signed in, redirect to the requested local path"),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 422, description = "Invalid email or password", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(form): Json<LoginForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;

    let user = AuthService::new(&state.db)
        .login(form.email.trim(), &form.password)
        .await?;

    session.cycle_id().await?;
    SessionUserId::insert(&session, user.id).await?;

    tracing::debug!("User {} signed in", user.id);

    Ok(Redirect::to(safe_redirect(form.redirect.as_deref(), HOME_PATH)))
}

/// Signs the user out by clearing their session
///
/// # Responses
/// - 303 (See Other): Signed out, redirect to the sign in route
/// - 500 (Internal Server Error): There was an issue clearing the session
#[utoipa::path(
    delete,
    path = "/deconnexion",
    tag = AUTH_TAG,
    responses(
        (status = 303, description = "Signed out, redirect to the sign in route"),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, Error> {
    // Clearing a session that was never stored fails, only clear signed in sessions
    if SessionUserId::get(&session).await?.is_some() {
        session.clear().await;
    }

    Ok(Redirect::to("/connexion"))
}

/// Returns the signed in user and their organization
///
/// # Responses
/// - 200 (OK): The signed in user
/// - 401 (Unauthorized): Nobody is signed in, or the user was discarded meanwhile
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 500 (Internal Server Error): Database or session error
#[utoipa::path(
    get,
    path = "/compte",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Signed in user", body = RecordDto<AccountDto>),
        (status = 401, description = "Not signed in", body = ErrorDto),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn account(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;

    let account = AccountDto {
        organization: OrganizationSummaryDto {
            organization_type: user.organization_type().as_str().to_string(),
            id: user.organization_id(),
            name: user.organization.name().to_string(),
        },
        user: UserDto::new(user.user, user.office_ids),
    };

    record_response(&session, account).await
}

/// Accepts an invitation by choosing a password
///
/// The invited user is signed in right away.
///
/// # Responses
/// - 303 (See Other): Password saved, redirect to the account page
/// - 406 (Not Acceptable): The client doesn't accept JSON
/// - 422 (Unprocessable Entity): Password too short or not confirmed, or invitation unknown
///   or already used
/// - 500 (Internal Server Error): Database or session error
#[utoipa::path(
    post,
    path = "/invitation",
    tag = AUTH_TAG,
    request_body = InvitationForm,
    responses(
        (status = 303, description = "Password saved, redirect to the account page"),
        (status = 406, description = "JSON is not accepted", body = ErrorDto),
        (status = 422, description = "Invalid password or invitation", body = ValidationErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Json(form): Json<InvitationForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;

    let user = AuthService::new(&state.db).accept_invitation(form).await?;

    session.cycle_id().await?;
    SessionUserId::insert(&session, user.id).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Votre mot de passe a été enregistré."),
        None,
        HOME_PATH,
    )
    .await
}
