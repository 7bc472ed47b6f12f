use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

use crate::server::{config::TerritorySources, service::territory::TerritoryService};

/// Starts a territory import in the background
///
/// The request that triggers the import returns right away; the outcome is only logged.
pub fn spawn_territory_import(
    db: DatabaseConnection,
    http_client: reqwest::Client,
    sources: TerritorySources,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("Starting territory import");

        match TerritoryService::new(&db).import(&http_client, &sources).await {
            Ok(summary) => tracing::info!(
                regions = summary.regions,
                departements = summary.departements,
                epcis = summary.epcis,
                communes = summary.communes,
                "Territory import completed"
            ),
            Err(err) => tracing::error!("Territory import failed: {}", err),
        }
    })
}

#[cfg(test)]
mod tests {
    use passerelle_test_utils::prelude::*;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use crate::server::{config::TerritorySources, task::territory::spawn_territory_import};

    /// Expect the spawned import to write the downloaded rows
    #[tokio::test]
    async fn imports_in_background() -> Result<(), TestError> {
        let test = TestBuilder::new()
            .with_tables()
            .with_csv_endpoint(
                "/departements.csv",
                "code_departement,code_region,name\n64,75,Pyrénées-Atlantiques\n",
                1,
            )
            .build()
            .await?;
        let sources = TerritorySources {
            departements_url: Some(format!("{}/departements.csv", test.server_url())),
            ..Default::default()
        };

        spawn_territory_import(test.db.clone(), test.http_client.clone(), sources)
            .await
            .unwrap();

        test.assert_mocks();
        assert_eq!(
            entity::prelude::Departement::find().count(&test.db).await?,
            1
        );

        Ok(())
    }
}
