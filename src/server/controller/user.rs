use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{notice::NoticeDto, user::UserForm},
    server::{
        controller::util::{
            format::{accept_json, negotiate},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        data::{discard::DiscardRepository, user::UserScope},
        error::Error,
        model::{app::AppState, auth::CurrentUser, organization::OrganizationType},
        policy::{
            authorize, scoped,
            user::{own_organization_scope, user_scope},
        },
        service::user::UserService,
    },
};

/// Where users are administered and who may do it.
pub(crate) struct UserArea {
    index_path: &'static str,
    undiscard_path: &'static str,
    scope_of: fn(&CurrentUser) -> Option<UserScope>,
}

/// `/utilisateurs`, super admins and organization admins
pub(crate) const ADMIN: UserArea = UserArea {
    index_path: "/utilisateurs",
    undiscard_path: "/utilisateurs/undiscard",
    scope_of: user_scope,
};

/// `/organisation/utilisateurs`, organization admins
pub(crate) const OWN: UserArea = UserArea {
    index_path: "/organisation/utilisateurs",
    undiscard_path: "/organisation/utilisateurs/undiscard",
    scope_of: own_organization_scope,
};

/// Organization new users join, forced for admins restricted to their own members
fn forced_organization(user: &CurrentUser, scope: &UserScope) -> Option<(OrganizationType, Uuid)> {
    match scope {
        UserScope::All => None,
        UserScope::Organization { .. } => Some((user.organization_type(), user.organization_id())),
    }
}

impl UserArea {
    async fn scope(
        &self,
        state: &AppState,
        session: &Session,
        action: &'static str,
    ) -> Result<(CurrentUser, UserScope), Error> {
        let user = current_user(state, session).await?;
        let scope = scoped(&user, (self.scope_of)(&user), action)?;

        Ok((user, scope))
    }

    /// Loads the targeted user in any state, 403 when outside the caller's scope
    async fn authorize_member(
        &self,
        state: &AppState,
        session: &Session,
        id: Uuid,
        action: &'static str,
    ) -> Result<CurrentUser, Error> {
        let (user, scope) = self.scope(state, session, action).await?;
        let member = UserService::new(&state.db).find(id).await?;
        authorize(&user, scope.covers(&member), action)?;

        Ok(user)
    }

    pub(crate) async fn index(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: ListParams,
    ) -> Result<Response, Error> {
        negotiate(&headers, false)?;
        let (_, scope) = self.scope(&state, &session, "list users").await?;

        let page = UserService::new(&state.db)
            .list(&scope, &params.list_query())
            .await?;

        list_response(&session, page).await
    }

    pub(crate) async fn show(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        id: Uuid,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        self.authorize_member(&state, &session, id, "show user").await?;

        let user = UserService::new(&state.db).get(id).await?;

        record_response(&session, user).await
    }

    /// Invites a user, the invitation token is only shown in the notice body
    pub(crate) async fn create(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: RedirectParams,
        form: UserForm,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let (user, scope) = self.scope(&state, &session, "create user").await?;

        let invited = UserService::new(&state.db)
            .create(&user, form, forced_organization(&user, &scope))
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success(format!(
                "Une invitation a été envoyée à {}.",
                invited.user.email
            ))
            .with_body(invited.invitation_token),
            params.redirect.as_deref(),
            self.index_path,
        )
        .await
    }

    pub(crate) async fn update(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        id: Uuid,
        params: RedirectParams,
        form: UserForm,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let user = self
            .authorize_member(&state, &session, id, "update user")
            .await?;

        UserService::new(&state.db).update(&user, id, form).await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("Les modifications ont été enregistrées avec succès."),
            params.redirect.as_deref(),
            self.index_path,
        )
        .await
    }

    pub(crate) async fn discard(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        id: Uuid,
        params: RedirectParams,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        self.authorize_member(&state, &session, id, "discard user")
            .await?;

        DiscardRepository::new(&state.db)
            .discard::<entity::user::Entity>(id)
            .await?;

        redirect_with_notice(
            &session,
            discard_notice("L'utilisateur a été supprimé.", self.undiscard_path, &[id]),
            params.redirect.as_deref(),
            self.index_path,
        )
        .await
    }

    pub(crate) async fn undiscard(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        id: Uuid,
        params: RedirectParams,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        self.authorize_member(&state, &session, id, "undiscard user")
            .await?;

        DiscardRepository::new(&state.db)
            .undiscard::<entity::user::Entity>(id)
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("La suppression de l'utilisateur a été annulée."),
            params.redirect.as_deref(),
            self.index_path,
        )
        .await
    }

    pub(crate) async fn discard_many(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: ListParams,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let (_, scope) = self.scope(&state, &session, "discard users").await?;

        let (ids, query) = params.bulk(false)?;
        let matching = UserService::new(&state.db).ids(&scope, &query).await?;
        let ids = DiscardRepository::new(&state.db)
            .discard_many::<entity::user::Entity>(&ids.resolve(matching))
            .await?;

        redirect_with_notice(
            &session,
            discard_notice(
                "Les utilisateurs sélectionnés ont été supprimés.",
                self.undiscard_path,
                &ids,
            ),
            params.redirect.as_deref(),
            self.index_path,
        )
        .await
    }

    pub(crate) async fn undiscard_many(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: ListParams,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let (_, scope) = self.scope(&state, &session, "undiscard users").await?;

        let (ids, query) = params.bulk(true)?;
        let matching = UserService::new(&state.db).ids(&scope, &query).await?;
        DiscardRepository::new(&state.db)
            .undiscard_many::<entity::user::Entity>(&ids.resolve(matching))
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("La suppression des utilisateurs sélectionnés a été annulée."),
            params.redirect.as_deref(),
            self.index_path,
        )
        .await
    }
}

pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.index(state, session, headers, params).await
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.show(state, session, headers, id).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.create(state, session, headers, params, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<UserForm>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.update(state, session, headers, id, params, form).await
}

pub async fn discard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.discard(state, session, headers, id, params).await
}

pub async fn undiscard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.undiscard(state, session, headers, id, params).await
}

pub async fn discard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.discard_many(state, session, headers, params).await
}

pub async fn undiscard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.undiscard_many(state, session, headers, params).await
}
