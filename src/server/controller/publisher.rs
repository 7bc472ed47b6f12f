use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    model::{
        list::AutocompleteItemDto,
        notice::NoticeDto,
        organization::{PublisherDto, PublisherForm},
    },
    server::{
        controller::util::{
            format::{accept_json, negotiate, Variant},
            get_user::current_user,
            params::{ListParams, RedirectParams},
            respond::{discard_notice, list_response, record_response, redirect_with_notice},
        },
        data::discard::DiscardRepository,
        error::Error,
        model::app::AppState,
        policy::{authorize, organization::can_manage_organizations},
        service::publisher::PublisherService,
    },
};

static INDEX_PATH: &str = "/editeurs";
static UNDISCARD_PATH: &str = "/editeurs/undiscard";

/// Lists publishers, or their autocomplete variant
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    let variant = negotiate(&headers, true)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "list publishers")?;

    let publisher_service = PublisherService::new(&state.db);

    match variant {
        Variant::Autocomplete => {
            let items: Vec<AutocompleteItemDto> = publisher_service
                .list(&params.autocomplete_query())
                .await?
                .records
                .into_iter()
                .map(|publisher| AutocompleteItemDto {
                    label: format!("{} ({})", publisher.name, publisher.siren),
                    value: publisher.id.to_string(),
                })
                .collect();

            Ok(Json(items).into_response())
        }
        Variant::Full => {
            let page = publisher_service
                .list(&params.list_query())
                .await?
                .map(PublisherDto::from);

            list_response(&session, page).await
        }
    }
}

pub async fn show(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "show publisher")?;

    let publisher = PublisherService::new(&state.db).get(id).await?;

    record_response(&session, PublisherDto::from(publisher)).await
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
    Json(form): Json<PublisherForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "create publisher")?;

    let publisher = PublisherService::new(&state.db).create(form).await?;

    tracing::info!("User {} created publisher {}", user.id(), publisher.id);

    redirect_with_notice(
        &session,
        NoticeDto::success("Un nouvel éditeur a été ajouté avec succès."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn update(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
    Json(form): Json<PublisherForm>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "update publisher")?;

    PublisherService::new(&state.db).update(id, form).await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("Les modifications ont été enregistrées avec succès."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn discard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "discard publisher")?;

    PublisherService::new(&state.db).find(id).await?;
    DiscardRepository::new(&state.db)
        .discard::<entity::publisher::Entity>(id)
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("L'éditeur a été supprimé.", UNDISCARD_PATH, &[id]),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn undiscard(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "undiscard publisher")?;

    PublisherService::new(&state.db).find(id).await?;
    DiscardRepository::new(&state.db)
        .undiscard::<entity::publisher::Entity>(id)
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression de l'éditeur a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

/// Discards the selected publishers, `ids=all` selecting every publisher matching `search`
pub async fn discard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "discard publishers")?;

    let (ids, query) = params.bulk(false)?;
    let matching = PublisherService::new(&state.db).ids(&query).await?;
    let ids = DiscardRepository::new(&state.db)
        .discard_many::<entity::publisher::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        discard_notice("Les éditeurs sélectionnés ont été supprimés.", UNDISCARD_PATH, &ids),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}

pub async fn undiscard_many(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_organizations(&user), "undiscard publishers")?;

    let (ids, query) = params.bulk(true)?;
    let matching = PublisherService::new(&state.db).ids(&query).await?;
    DiscardRepository::new(&state.db)
        .undiscard_many::<entity::publisher::Entity>(&ids.resolve(matching))
        .await?;

    redirect_with_notice(
        &session,
        NoticeDto::success("La suppression des éditeurs sélectionnés a été annulée."),
        params.redirect.as_deref(),
        INDEX_PATH,
    )
    .await
}
