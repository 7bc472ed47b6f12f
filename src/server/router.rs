//! HTTP routing and OpenAPI documentation configuration.
//!
//! Authentication and publisher API endpoints are registered with their OpenAPI
//! specifications, collected into one document served by Swagger UI at `/api/docs`. The
//! web resource routes are registered on the same router without documentation.

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// Builds the application's HTTP router with every endpoint and the Swagger UI.
///
/// # Routes
/// - `/connexion`, `/deconnexion`, `/compte`, `/invitation`: authentication
/// - `/editeurs`, `/collectivites`, `/ddfips`, `/dgfips`, `/guichets`, `/utilisateurs`:
///   administration
/// - `/organisation/*`: organization admins managing their own organization
/// - `/territoires/*`: territories and their import
/// - `/signalements`, `/transmission`, `/paquets`: report workflow
/// - `/api/*`: publisher API
///
/// The OpenAPI document is available at `/api/docs/openapi.json`.
pub fn routes() -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Passerelle", description = "Passerelle API"),
        modifiers(&BearerSecurity),
        tags(
            (name = controller::auth::AUTH_TAG, description = "Authentication routes"),
            (name = controller::api::API_TAG, description = "Publisher API routes"),
        )
    )]
    struct ApiDoc;

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::auth::account))
        .routes(routes!(controller::auth::accept_invitation))
        .routes(routes!(controller::api::collectivity::index))
        .routes(routes!(controller::api::collectivity::create_transmission))
        .routes(routes!(controller::api::transmission::create_report))
        .routes(routes!(controller::api::transmission::complete))
        .split_for_parts();

    routes
        .merge(organization_routes())
        .merge(territory_routes())
        .merge(report_routes())
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
}

/// CRUD routes of a resource with single and bulk discard
macro_rules! resource_routes {
    ($router:expr, $path:literal, $($controller:ident)::+) => {{
        use crate::server::controller::$($controller)::+ as c;

        $router
            .route(
                $path,
                get(c::index).post(c::create).delete(c::discard_many),
            )
            .route(concat!($path, "/undiscard"), patch(c::undiscard_many))
            .route(
                concat!($path, "/{id}"),
                get(c::show).patch(c::update).delete(c::discard),
            )
            .route(concat!($path, "/{id}/undiscard"), patch(c::undiscard))
    }};
}

fn organization_routes() -> Router<AppState> {
    let router = Router::new();
    let router = resource_routes!(router, "/editeurs", publisher);
    let router = resource_routes!(router, "/collectivites", collectivity);
    let router = resource_routes!(router, "/ddfips", ddfip);
    let router = resource_routes!(router, "/dgfips", dgfip);
    let router = resource_routes!(router, "/guichets", office);
    let router = resource_routes!(router, "/utilisateurs", user);
    let router = resource_routes!(
        router,
        "/organisation/utilisateurs",
        organization::user
    );
    let router = resource_routes!(
        router,
        "/organisation/collectivites",
        organization::collectivity
    );
    let router = resource_routes!(
        router,
        "/organisation/guichets",
        organization::office
    );

    resource_routes!(
        router,
        "/organisation/oauth_applications",
        organization::oauth
    )
}

fn territory_routes() -> Router<AppState> {
    use controller::territory::{commune, departement, epci, import, region};

    Router::new()
        .route("/territoires", patch(import))
        .route("/territoires/regions", get(region::index))
        .route(
            "/territoires/regions/{id}",
            get(region::show).patch(region::update),
        )
        .route("/territoires/departements", get(departement::index))
        .route(
            "/territoires/departements/{id}",
            get(departement::show).patch(departement::update),
        )
        .route("/territoires/epcis", get(epci::index))
        .route(
            "/territoires/epcis/{id}",
            get(epci::show).patch(epci::update),
        )
        .route("/territoires/communes", get(commune::index))
        .route(
            "/territoires/communes/{id}",
            get(commune::show).patch(commune::update),
        )
}

fn report_routes() -> Router<AppState> {
    use controller::{package, report, transmission};

    let router = resource_routes!(Router::new(), "/signalements", report);

    router
        .route(
            "/signalements/{id}/completion",
            patch(report::complete).delete(report::uncomplete),
        )
        .route("/signalements/{id}/approbation", patch(report::approve))
        .route("/signalements/{id}/rejet", patch(report::reject))
        .route("/signalements/{id}/reinitialisation", patch(report::reset))
        .route("/transmission", get(transmission::show))
        .route(
            "/transmission/signalements",
            post(transmission::add_reports).delete(transmission::remove_reports),
        )
        .route("/transmission/finalisation", put(transmission::complete))
        .route("/paquets", get(package::index))
        .route(
            "/paquets/{id}",
            get(package::show).delete(package::discard),
        )
        .route("/paquets/{id}/undiscard", patch(package::undiscard))
        .route("/paquets/{id}/accuse", patch(package::acknowledge))
        .route("/paquets/{id}/assignation", patch(package::assign))
        .route("/paquets/{id}/rejet", patch(package::reject))
        .route("/paquets/{id}/reinitialisation", patch(package::reset))
}
