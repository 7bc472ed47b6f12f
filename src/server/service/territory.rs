use sea_orm::DatabaseConnection;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    model::{
        list::AutocompleteItemDto,
        territory::{CommuneDto, DepartementDto, EpciDto, RegionDto, TerritoryForm},
    },
    server::{
        config::TerritorySources,
        data::{
            listing::{ListQuery, Page},
            territory::{
                commune::CommuneRepository, departement::DepartementRepository,
                epci::EpciRepository, region::RegionRepository, CommuneRow, DepartementRow,
                EpciRow, RegionRow,
            },
        },
        error::{validation::ValidationErrors, Error},
        service::found,
        util::validation::required,
    },
};

/// Rows written per upsert statement, keeps communes imports under the bind parameter limit
const IMPORT_CHUNK_SIZE: usize = 1000;

/// Number of rows written by an import, per territory kind
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportSummary {
    pub regions: u64,
    pub departements: u64,
    pub epcis: u64,
    pub communes: u64,
}

fn new_name(current: &str, form: TerritoryForm) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = required(&mut errors, "name", form.name, Some(current));
    errors.into_result()?;

    Ok(name.unwrap_or_default())
}

pub struct TerritoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TerritoryService<'a> {
    /// Creates a new instance of [`TerritoryService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_regions(&self, query: &ListQuery) -> Result<Page<RegionDto>, Error> {
        Ok(RegionRepository::new(self.db)
            .list(query)
            .await?
            .map(RegionDto::from))
    }

    pub async fn autocomplete_regions(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AutocompleteItemDto>, Error> {
        Ok(RegionRepository::new(self.db)
            .autocomplete(query)
            .await?
            .into_iter()
            .map(|region| AutocompleteItemDto {
                label: format!("{} ({})", region.name, region.code_region),
                value: region.code_region,
            })
            .collect())
    }

    pub async fn get_region(&self, id: Uuid) -> Result<RegionDto, Error> {
        let region = found(RegionRepository::new(self.db).find_by_id(id).await?, "region", id)?;

        Ok(region.into())
    }

    pub async fn rename_region(&self, id: Uuid, form: TerritoryForm) -> Result<RegionDto, Error> {
        let repo = RegionRepository::new(self.db);
        let region = found(repo.find_by_id(id).await?, "region", id)?;
        let name = new_name(&region.name, form)?;

        Ok(repo.update_name(region, name).await?.into())
    }

    pub async fn list_departements(&self, query: &ListQuery) -> Result<Page<DepartementDto>, Error> {
        Ok(DepartementRepository::new(self.db)
            .list(query)
            .await?
            .map(DepartementDto::from))
    }

    pub async fn autocomplete_departements(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AutocompleteItemDto>, Error> {
        Ok(DepartementRepository::new(self.db)
            .autocomplete(query)
            .await?
            .into_iter()
            .map(|departement| AutocompleteItemDto {
                label: format!("{} ({})", departement.name, departement.code_departement),
                value: departement.code_departement,
            })
            .collect())
    }

    pub async fn get_departement(&self, id: Uuid) -> Result<DepartementDto, Error> {
        let departement = found(
            DepartementRepository::new(self.db).find_by_id(id).await?,
            "departement",
            id,
        )?;

        Ok(departement.into())
    }

    pub async fn rename_departement(
        &self,
        id: Uuid,
        form: TerritoryForm,
    ) -> Result<DepartementDto, Error> {
        let repo = DepartementRepository::new(self.db);
        let departement = found(repo.find_by_id(id).await?, "departement", id)?;
        let name = new_name(&departement.name, form)?;

        Ok(repo.update_name(departement, name).await?.into())
    }

    pub async fn list_epcis(&self, query: &ListQuery) -> Result<Page<EpciDto>, Error> {
        Ok(EpciRepository::new(self.db)
            .list(query)
            .await?
            .map(EpciDto::from))
    }

    pub async fn autocomplete_epcis(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AutocompleteItemDto>, Error> {
        Ok(EpciRepository::new(self.db)
            .autocomplete(query)
            .await?
            .into_iter()
            .map(|epci| AutocompleteItemDto {
                label: format!("{} ({})", epci.name, epci.siren),
                value: epci.siren,
            })
            .collect())
    }

    pub async fn get_epci(&self, id: Uuid) -> Result<EpciDto, Error> {
        let epci = found(EpciRepository::new(self.db).find_by_id(id).await?, "epci", id)?;

        Ok(epci.into())
    }

    pub async fn rename_epci(&self, id: Uuid, form: TerritoryForm) -> Result<EpciDto, Error> {
        let repo = EpciRepository::new(self.db);
        let epci = found(repo.find_by_id(id).await?, "epci", id)?;
        let name = new_name(&epci.name, form)?;

        Ok(repo.update_name(epci, name).await?.into())
    }

    pub async fn list_communes(&self, query: &ListQuery) -> Result<Page<CommuneDto>, Error> {
        Ok(CommuneRepository::new(self.db)
            .list(query)
            .await?
            .map(CommuneDto::from))
    }

    pub async fn autocomplete_communes(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<AutocompleteItemDto>, Error> {
        Ok(CommuneRepository::new(self.db)
            .autocomplete(query)
            .await?
            .into_iter()
            .map(|commune| AutocompleteItemDto {
                label: format!("{} ({})", commune.name, commune.code_insee),
                value: commune.code_insee,
            })
            .collect())
    }

    pub async fn get_commune(&self, id: Uuid) -> Result<CommuneDto, Error> {
        let commune = found(
            CommuneRepository::new(self.db).find_by_id(id).await?,
            "commune",
            id,
        )?;

        Ok(commune.into())
    }

    pub async fn rename_commune(&self, id: Uuid, form: TerritoryForm) -> Result<CommuneDto, Error> {
        let repo = CommuneRepository::new(self.db);
        let commune = found(repo.find_by_id(id).await?, "commune", id)?;
        let name = new_name(&commune.name, form)?;

        Ok(repo.update_name(commune, name).await?.into())
    }

    /// Downloads the configured CSV sources and upserts their rows by code
    ///
    /// Sources are imported from the largest territories down to communes, a missing URL
    /// skips that kind.
    pub async fn import(
        &self,
        http_client: &reqwest::Client,
        sources: &TerritorySources,
    ) -> Result<ImportSummary, Error> {
        let mut summary = ImportSummary::default();

        if let Some(url) = &sources.regions_url {
            let rows: Vec<RegionRow> = fetch_rows(http_client, url).await?;
            let repo = RegionRepository::new(self.db);
            for chunk in rows.chunks(IMPORT_CHUNK_SIZE) {
                summary.regions += repo.upsert_many(chunk.to_vec()).await?;
            }
        }

        if let Some(url) = &sources.departements_url {
            let rows: Vec<DepartementRow> = fetch_rows(http_client, url).await?;
            let repo = DepartementRepository::new(self.db);
            for chunk in rows.chunks(IMPORT_CHUNK_SIZE) {
                summary.departements += repo.upsert_many(chunk.to_vec()).await?;
            }
        }

        if let Some(url) = &sources.epcis_url {
            let rows: Vec<EpciRow> = fetch_rows(http_client, url).await?;
            let repo = EpciRepository::new(self.db);
            for chunk in rows.chunks(IMPORT_CHUNK_SIZE) {
                summary.epcis += repo.upsert_many(chunk.to_vec()).await?;
            }
        }

        if let Some(url) = &sources.communes_url {
            let rows: Vec<CommuneRow> = fetch_rows(http_client, url).await?;
            let repo = CommuneRepository::new(self.db);
            for chunk in rows.chunks(IMPORT_CHUNK_SIZE) {
                summary.communes += repo.upsert_many(chunk.to_vec()).await?;
            }
        }

        Ok(summary)
    }
}

/// Downloads a CSV document and deserializes its rows using the header line
async fn fetch_rows<T: DeserializeOwned>(
    http_client: &reqwest::Client,
    url: &str,
) -> Result<Vec<T>, Error> {
    let body = http_client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(body.as_ref());

    let rows = reader.deserialize().collect::<Result<Vec<T>, csv::Error>>()?;

    tracing::debug!(url = %url, rows = rows.len(), "downloaded territory source");

    Ok(rows)
}

#[cfg(test)]
mod tests {

    mod rename {
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::territory::TerritoryForm,
            server::{error::Error, service::territory::TerritoryService},
        };

        /// Expect a blank name to be refused
        #[tokio::test]
        async fn requires_name() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;

            let territory_service = TerritoryService::new(&test.db);
            let renamed = territory_service
                .rename_commune(
                    territories.commune.id,
                    TerritoryForm {
                        name: Some("Pau".to_string()),
                    },
                )
                .await.unwrap();
            let blank = territory_service
                .rename_commune(
                    territories.commune.id,
                    TerritoryForm {
                        name: Some("  ".to_string()),
                    },
                )
                .await;

            assert_eq!(renamed.name, "Pau");
            assert!(matches!(blank, Err(Error::ValidationErrors(_))));

            Ok(())
        }
    }

    mod import {
        use passerelle_test_utils::prelude::*;
        use sea_orm::{EntityTrait, PaginatorTrait};

        use crate::server::{config::TerritorySources, service::territory::TerritoryService};

        /// Expect rows to be inserted, then updated by code on the next import
        #[tokio::test]
        async fn upserts_rows_by_code() -> Result<(), TestError> {
            let test = TestBuilder::new()
                .with_tables()
                .with_csv_endpoint(
                    "/regions.csv",
                    "code_region,name\n75,Nouvelle-Aquitaine\n76,Occitanie\n",
                    2,
                )
                .with_csv_endpoint(
                    "/communes.csv",
                    "code_insee,name,code_departement,siren_epci,code_arrondissement\n\
                     64102,Pau,64,200067106,\n\
                     64024,Anglet,64,,643\n",
                    2,
                )
                .build()
                .await?;
            let sources = TerritorySources {
                regions_url: Some(format!("{}/regions.csv", test.server_url())),
                departements_url: None,
                epcis_url: None,
                communes_url: Some(format!("{}/communes.csv", test.server_url())),
            };

            let territory_service = TerritoryService::new(&test.db);
            let first = territory_service
                .import(&test.http_client, &sources)
                .await
                .unwrap();
            territory_service
                .import(&test.http_client, &sources)
                .await
                .unwrap();

            test.assert_mocks();
            assert_eq!(first.regions, 2);
            assert_eq!(first.communes, 2);
            assert_eq!(entity::prelude::Region::find().count(&test.db).await?, 2);
            let communes = entity::prelude::Commune::find().all(&test.db).await?;
            assert_eq!(communes.len(), 2);
            let anglet = communes.iter().find(|c| c.code_insee == "64024").unwrap();
            assert!(anglet.siren_epci.is_none());
            assert_eq!(anglet.code_arrondissement.as_deref(), Some("643"));

            Ok(())
        }
    }
}
