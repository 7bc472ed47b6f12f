use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::notice::NoticeDto,
    server::{
        controller::util::{
            format::accept_json, get_user::current_user, params::RedirectParams,
            respond::redirect_with_notice,
        },
        error::Error,
        model::app::AppState,
        policy::{authorize, territory::can_manage_territories},
        task::territory::spawn_territory_import,
    },
};

/// Index, show & rename handlers of one territory kind
macro_rules! territory_controller {
    (
        $module:ident,
        index_path: $index_path:literal,
        resource: $resource:literal,
        list: $list:ident,
        autocomplete: $autocomplete:ident,
        get: $get:ident,
        rename: $rename:ident $(,)?
    ) => {
        pub mod $module {
            use axum::{
                extract::{Path, Query, State},
                http::HeaderMap,
                response::IntoResponse,
                Json,
            };
            use tower_sessions::Session;
            use uuid::Uuid;

            use crate::{
                model::{notice::NoticeDto, territory::TerritoryForm},
                server::{
                    controller::util::{
                        format::{accept_json, negotiate, Variant},
                        get_user::current_user,
                        params::{ListParams, RedirectParams},
                        respond::{list_response, record_response, redirect_with_notice},
                    },
                    error::Error,
                    model::app::AppState,
                    policy::{
                        authorize,
                        territory::{can_manage_territories, can_read_territories},
                    },
                    service::territory::TerritoryService,
                },
            };

            pub async fn index(
                State(state): State<AppState>,
                session: Session,
                headers: HeaderMap,
                Query(params): Query<ListParams>,
            ) -> Result<impl IntoResponse, Error> {
                let variant = negotiate(&headers, true)?;
                let user = current_user(&state, &session).await?;
                authorize(&user, can_read_territories(&user), concat!("list ", $resource))?;

                let territory_service = TerritoryService::new(&state.db);

                match variant {
                    Variant::Autocomplete => {
                        let items = territory_service
                            .$autocomplete(&params.autocomplete_query())
                            .await?;

                        Ok(Json(items).into_response())
                    }
                    Variant::Full => {
                        let page = territory_service.$list(&params.list_query()).await?;

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
                authorize(&user, can_read_territories(&user), concat!("show ", $resource))?;

                let territory = TerritoryService::new(&state.db).$get(id).await?;

                record_response(&session, territory).await
            }

            pub async fn update(
                State(state): State<AppState>,
                session: Session,
                headers: HeaderMap,
                Path(id): Path<Uuid>,
                Query(params): Query<RedirectParams>,
                Json(form): Json<TerritoryForm>,
            ) -> Result<impl IntoResponse, Error> {
                accept_json(&headers)?;
                let user = current_user(&state, &session).await?;
                authorize(&user, can_manage_territories(&user), concat!("rename ", $resource))?;

                TerritoryService::new(&state.db).$rename(id, form).await?;

                redirect_with_notice(
                    &session,
                    NoticeDto::success("Les modifications ont été enregistrées avec succès."),
                    params.redirect.as_deref(),
                    $index_path,
                )
                .await
            }
        }
    };
}

territory_controller!(
    region,
    index_path: "/territoires/regions",
    resource: "regions",
    list: list_regions,
    autocomplete: autocomplete_regions,
    get: get_region,
    rename: rename_region,
);

territory_controller!(
    departement,
    index_path: "/territoires/departements",
    resource: "departements",
    list: list_departements,
    autocomplete: autocomplete_departements,
    get: get_departement,
    rename: rename_departement,
);

territory_controller!(
    epci,
    index_path: "/territoires/epcis",
    resource: "epcis",
    list: list_epcis,
    autocomplete: autocomplete_epcis,
    get: get_epci,
    rename: rename_epci,
);

territory_controller!(
    commune,
    index_path: "/territoires/communes",
    resource: "communes",
    list: list_communes,
    autocomplete: autocomplete_communes,
    get: get_commune,
    rename: rename_commune,
);

/// Starts importing every configured territory source, the import runs in the background
pub async fn import(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Query(params): Query<RedirectParams>,
) -> Result<impl IntoResponse, Error> {
    accept_json(&headers)?;
    let user = current_user(&state, &session).await?;
    authorize(&user, can_manage_territories(&user), "import territories")?;

    spawn_territory_import(
        state.db.clone(),
        state.http_client.clone(),
        state.territory_sources.clone(),
    );

    tracing::info!("User {} started a territory import", user.id());

    redirect_with_notice(
        &session,
        NoticeDto::success("La mise à jour des territoires a été lancée."),
        params.redirect.as_deref(),
        "/territoires/communes",
    )
    .await
}
