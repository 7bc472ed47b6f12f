use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{
        notice::NoticeDto,
        organization::{CollectivityDto, CollectivityForm},
    },
    server::{
        controller::util::{
            format::{accept_json, negotiate},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        data::{collectivity::CollectivityScope, discard::DiscardRepository},
        error::Error,
        model::{app::AppState, auth::CurrentUser, db::CollectivityModel},
        policy::{
            authorize,
            organization::{collectivity_scope, own_collectivity_scope},
            scoped,
        },
        service::collectivity::CollectivityService,
    },
};

/// Where collectivities are administered and who may do it.
pub(crate) struct CollectivityArea {
    index_path: &'static str,
    undiscard_path: &'static str,
    scope_of: fn(&CurrentUser) -> Option<CollectivityScope>,
}

/// `/collectivites`, super admins and publisher admins
pub(crate) const ADMIN: CollectivityArea = CollectivityArea {
    index_path: "/collectivites",
    undiscard_path: "/collectivites/undiscard",
    scope_of: collectivity_scope,
};

/// `/organisation/collectivites`, publisher admins
pub(crate) const OWN: CollectivityArea = CollectivityArea {
    index_path: "/organisation/collectivites",
    undiscard_path: "/organisation/collectivites/undiscard",
    scope_of: own_collectivity_scope,
};

impl CollectivityArea {
    async fn scope(
        &self,
        state: &AppState,
        session: &Session,
        action: &'static str,
    ) -> Result<(CurrentUser, CollectivityScope), Error> {
        let user = current_user(state, session).await?;
        let scope = scoped(&user, (self.scope_of)(&user), action)?;

        Ok((user, scope))
    }

    /// Collectivity in any state, 403 when outside the user's scope
    async fn find(
        &self,
        state: &AppState,
        session: &Session,
        id: Uuid,
        action: &'static str,
    ) -> Result<(CollectivityScope, CollectivityModel), Error> {
        let (user, scope) = self.scope(state, session, action).await?;
        let collectivity = CollectivityService::new(&state.db).find(id).await?;
        authorize(&user, scope.covers(&collectivity), action)?;

        Ok((scope, collectivity))
    }

    pub(crate) async fn index(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: ListParams,
    ) -> Result<Response, Error> {
        negotiate(&headers, false)?;
        let (_, scope) = self.scope(&state, &session, "list collectivities").await?;

        let page = CollectivityService::new(&state.db)
            .list(&scope, &params.list_query())
            .await?
            .map(CollectivityDto::from);

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
        self.find(&state, &session, id, "show collectivity").await?;

        let collectivity = CollectivityService::new(&state.db).get(id).await?;

        record_response(&session, CollectivityDto::from(collectivity)).await
    }

    /// Creates a collectivity, managed by the user's publisher when they are restricted to one
    pub(crate) async fn create(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: RedirectParams,
        form: CollectivityForm,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let (user, scope) = self.scope(&state, &session, "create collectivity").await?;

        let collectivity = CollectivityService::new(&state.db)
            .create(form, scope.publisher_id())
            .await?;

        tracing::info!("User {} created collectivity {}", user.id(), collectivity.id);

        redirect_with_notice(
            &session,
            NoticeDto::success("Une nouvelle collectivité a été ajoutée avec succès."),
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
        form: CollectivityForm,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let (scope, _) = self.find(&state, &session, id, "update collectivity").await?;

        CollectivityService::new(&state.db)
            .update(id, form, scope.publisher_id())
            .await?;

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
        self.find(&state, &session, id, "discard collectivity").await?;

        DiscardRepository::new(&state.db)
            .discard::<entity::collectivity::Entity>(id)
            .await?;

        redirect_with_notice(
            &session,
            discard_notice("La collectivité a été supprimée.", self.undiscard_path, &[id]),
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
        self.find(&state, &session, id, "undiscard collectivity").await?;

        DiscardRepository::new(&state.db)
            .undiscard::<entity::collectivity::Entity>(id)
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("La suppression de la collectivité a été annulée."),
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
        let (_, scope) = self.scope(&state, &session, "discard collectivities").await?;

        let (ids, query) = params.bulk(false)?;
        let matching = CollectivityService::new(&state.db).ids(&scope, &query).await?;
        let ids = DiscardRepository::new(&state.db)
            .discard_many::<entity::collectivity::Entity>(&ids.resolve(matching))
            .await?;

        redirect_with_notice(
            &session,
            discard_notice(
                "Les collectivités sélectionnées ont été supprimées.",
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
        let (_, scope) = self.scope(&state, &session, "undiscard collectivities").await?;

        let (ids, query) = params.bulk(true)?;
        let matching = CollectivityService::new(&state.db).ids(&scope, &query).await?;
        DiscardRepository::new(&state.db)
            .undiscard_many::<entity::collectivity::Entity>(&ids.resolve(matching))
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("La suppression des collectivités sélectionnées a été annulée."),
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
    Json(form): Json<CollectivityForm>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.create(state, session, headers, params, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<CollectivityForm>,
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

/// Discards the selected collectivities, `ids=all` selecting every one matching `search`
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
