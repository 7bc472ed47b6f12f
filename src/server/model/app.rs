use sea_orm::DatabaseConnection;

use crate::server::config::TerritorySources;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// HTTP client used to download territory import sources
    pub http_client: reqwest::Client,
    pub territory_sources: TerritorySources,
}

impl From<(DatabaseConnection, reqwest::Client)> for AppState {
    fn from((db, http_client): (DatabaseConnection, reqwest::Client)) -> Self {
        Self {
            db,
            http_client,
            territory_sources: TerritorySources::default(),
        }
    }
}
