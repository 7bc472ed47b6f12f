//! Territory repositories: regions, départements, EPCIs and communes.
//!
//! Territories are not soft-deletable, they are upserted by code from the import sources.

pub mod commune;
pub mod departement;
pub mod epci;
pub mod region;

use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use serde::Deserialize;
use uuid::Uuid;

use crate::server::model::{
    db::{CommuneModel, DepartementModel, EpciModel, RegionModel},
    organization::TerritoryType,
};

/// Region row of an import source
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RegionRow {
    pub code_region: String,
    pub name: String,
}

/// Département row of an import source
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DepartementRow {
    pub code_departement: String,
    pub code_region: String,
    pub name: String,
}

/// EPCI row of an import source
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct EpciRow {
    pub siren: String,
    pub name: String,
    pub nature: Option<String>,
    pub code_departement: Option<String>,
}

/// Commune row of an import source
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CommuneRow {
    pub code_insee: String,
    pub name: String,
    pub code_departement: String,
    pub siren_epci: Option<String>,
    pub code_arrondissement: Option<String>,
}

/// Territory administered by a collectivity.
#[derive(Clone, Debug, PartialEq)]
pub enum Territory {
    Commune(CommuneModel),
    Epci(EpciModel),
    Departement(DepartementModel),
    Region(RegionModel),
}

impl Territory {
    pub fn territory_type(&self) -> TerritoryType {
        match self {
            Self::Commune(_) => TerritoryType::Commune,
            Self::Epci(_) => TerritoryType::Epci,
            Self::Departement(_) => TerritoryType::Departement,
            Self::Region(_) => TerritoryType::Region,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Commune(commune) => &commune.name,
            Self::Epci(epci) => &epci.name,
            Self::Departement(departement) => &departement.name,
            Self::Region(region) => &region.name,
        }
    }
}

/// Load the territory of the given type & ID.
pub async fn find_territory<C: ConnectionTrait>(
    db: &C,
    territory_type: TerritoryType,
    territory_id: Uuid,
) -> Result<Option<Territory>, DbErr> {
    let territory = match territory_type {
        TerritoryType::Commune => entity::prelude::Commune::find_by_id(territory_id)
            .one(db)
            .await?
            .map(Territory::Commune),
        TerritoryType::Epci => entity::prelude::Epci::find_by_id(territory_id)
            .one(db)
            .await?
            .map(Territory::Epci),
        TerritoryType::Departement => entity::prelude::Departement::find_by_id(territory_id)
            .one(db)
            .await?
            .map(Territory::Departement),
        TerritoryType::Region => entity::prelude::Region::find_by_id(territory_id)
            .one(db)
            .await?
            .map(Territory::Region),
    };

    Ok(territory)
}
