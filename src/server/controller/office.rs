use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{notice::NoticeDto, organization::OfficeForm},
    server::{
        controller::util::{
            format::{accept_json, negotiate},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        data::{discard::DiscardRepository, office::OfficeScope},
        error::Error,
        model::{app::AppState, auth::CurrentUser},
        policy::{
            authorize,
            office::{office_scope, own_office_scope},
            scoped,
        },
        service::office::OfficeService,
    },
};

/// Where offices are administered and who may do it.
pub(crate) struct OfficeArea {
    index_path: &'static str,
    undiscard_path: &'static str,
    scope_of: fn(&CurrentUser) -> Option<OfficeScope>,
}

/// `/utilisateurs`, super admins and organization admins
pub(crate) const ADMIN: OfficeArea = OfficeArea {
    index_path: "/guichets",
    undiscard_path: "/guichets/undiscard",
    scope_of: office_scope,
};

/// `/organisation/utilisateurs`, organization admins
pub(crate) const OWN: OfficeArea = OfficeArea {
    index_path: "/organisation/guichets",
    undiscard_path: "/organisation/guichets/undiscard",
    scope_of: own_office_scope,
};

impl OfficeArea {
    async fn scope(
        &self,
        state: &AppState,
        session: &Session,
        action: &'static str,
    ) -> Result<(CurrentUser, OfficeScope), Error> {
        let user = current_user(state, session).await?;
        let scope = scoped(&user, (self.scope_of)(&user), action)?;

        Ok((user, scope))
    }

    /// Loads the targeted office in any state, 403 when it belongs to another DDFIP
    async fn authorize_office(
        &self,
        state: &AppState,
        session: &Session,
        id: Uuid,
        action: &'static str,
    ) -> Result<(), Error> {
        let (user, scope) = self.scope(state, session, action).await?;
        let office = OfficeService::new(&state.db).find(id).await?;

        authorize(&user, scope.covers(office.ddfip_id), action)
    }

    pub(crate) async fn index(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: ListParams,
    ) -> Result<Response, Error> {
        negotiate(&headers, false)?;
        let (_, scope) = self.scope(&state, &session, "list offices").await?;

        let page = OfficeService::new(&state.db)
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
        self.authorize_office(&state, &session, id, "show office").await?;

        let office = OfficeService::new(&state.db).get(id).await?;

        record_response(&session, office).await
    }

    /// Creates an office, in the user's DDFIP when they are restricted to it
    pub(crate) async fn create(
        &self,
        state: AppState,
        session: Session,
        headers: HeaderMap,
        params: RedirectParams,
        form: OfficeForm,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        let (user, scope) = self.scope(&state, &session, "create office").await?;

        let office = OfficeService::new(&state.db)
            .create(form, scope.ddfip_id())
            .await?;

        tracing::info!("User {} created office {}", user.id(), office.id);

        redirect_with_notice(
            &session,
            NoticeDto::success("Un nouveau guichet a été ajouté avec succès."),
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
        form: OfficeForm,
    ) -> Result<Response, Error> {
        accept_json(&headers)?;
        self.authorize_office(&state, &session, id, "update office")
            .await?;

        OfficeService::new(&state.db).update(id, form).await?;

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
        self.authorize_office(&state, &session, id, "discard office")
            .await?;

        DiscardRepository::new(&state.db)
            .discard::<entity::office::Entity>(id)
            .await?;

        redirect_with_notice(
            &session,
            discard_notice("Le guichet a été supprimé.", self.undiscard_path, &[id]),
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
        self.authorize_office(&state, &session, id, "undiscard office")
            .await?;

        DiscardRepository::new(&state.db)
            .undiscard::<entity::office::Entity>(id)
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("La suppression du guichet a été annulée."),
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
        let (_, scope) = self.scope(&state, &session, "discard offices").await?;

        let (ids, query) = params.bulk(false)?;
        let matching = OfficeService::new(&state.db).ids(&scope, &query).await?;
        let ids = DiscardRepository::new(&state.db)
            .discard_many::<entity::office::Entity>(&ids.resolve(matching))
            .await?;

        redirect_with_notice(
            &session,
            discard_notice(
                "Les guichets sélectionnés ont été supprimés.",
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
        let (_, scope) = self.scope(&state, &session, "undiscard offices").await?;

        let (ids, query) = params.bulk(true)?;
        let matching = OfficeService::new(&state.db).ids(&scope, &query).await?;
        DiscardRepository::new(&state.db)
            .undiscard_many::<entity::office::Entity>(&ids.resolve(matching))
            .await?;

        redirect_with_notice(
            &session,
            NoticeDto::success("La suppression des guichets sélectionnés a été annulée."),
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
    Json(form): Json<OfficeForm>,
) -> Result<impl IntoResponse, Error> {
    ADMIN.create(state, session, headers, params, form).await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<OfficeForm>,
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
