use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegionDto {
    pub id: Uuid,
    pub code_region: String,
    pub name: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DepartementDto {
    pub id: Uuid,
    pub code_departement: String,
    pub code_region: String,
    pub name: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EpciDto {
    pub id: Uuid,
    pub siren: String,
    pub name: String,
    pub nature: Option<String>,
    pub code_departement: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CommuneDto {
    pub id: Uuid,
    pub code_insee: String,
    pub name: String,
    pub code_departement: String,
    pub siren_epci: Option<String>,
    pub code_arrondissement: Option<String>,
    pub updated_at: NaiveDateTime,
}

/// Territories can only be renamed, codes come from the imports.
#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TerritoryForm {
    pub name: Option<String>,
}

impl From<entity::region::Model> for RegionDto {
    fn from(model: entity::region::Model) -> Self {
        Self {
            id: model.id,
            code_region: model.code_region,
            name: model.name,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::departement::Model> for DepartementDto {
    fn from(model: entity::departement::Model) -> Self {
        Self {
            id: model.id,
            code_departement: model.code_departement,
            code_region: model.code_region,
            name: model.name,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::epci::Model> for EpciDto {
    fn from(model: entity::epci::Model) -> Self {
        Self {
            id: model.id,
            siren: model.siren,
            name: model.name,
            nature: model.nature,
            code_departement: model.code_departement,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::commune::Model> for CommuneDto {
    fn from(model: entity::commune::Model) -> Self {
        Self {
            id: model.id,
            code_insee: model.code_insee,
            name: model.name,
            code_departement: model.code_departement,
            siren_epci: model.siren_epci,
            code_arrondissement: model.code_arrondissement,
            updated_at: model.updated_at,
        }
    }
}
