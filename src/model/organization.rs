use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contact person of an organization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PublisherDto {
    pub id: Uuid,
    pub name: String,
    pub siren: String,
    pub email: Option<String>,
    pub contact: ContactDto,
    pub domain_restriction: Option<String>,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CollectivityDto {
    pub id: Uuid,
    pub territory_type: String,
    pub territory_id: Uuid,
    pub publisher_id: Option<Uuid>,
    pub name: String,
    pub siren: String,
    pub contact: ContactDto,
    pub domain_restriction: Option<String>,
    pub allow_publisher_management: bool,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DdfipDto {
    pub id: Uuid,
    pub code_departement: String,
    pub name: String,
    pub contact: ContactDto,
    pub domain_restriction: Option<String>,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DgfipDto {
    pub id: Uuid,
    pub name: String,
    pub contact: ContactDto,
    pub domain_restriction: Option<String>,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OfficeDto {
    pub id: Uuid,
    pub ddfip_id: Uuid,
    pub name: String,
    pub competences: Vec<String>,
    pub codes_insee: Vec<String>,
    pub user_ids: Vec<Uuid>,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Submitted contact attributes.
///
/// Absent fields are left unchanged, an empty string clears the value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactForm {
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PublisherForm {
    pub name: Option<String>,
    pub siren: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub contact: ContactForm,
    pub domain_restriction: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CollectivityForm {
    pub territory_type: Option<String>,
    pub territory_id: Option<Uuid>,
    /// Publisher ID, an empty string detaches the collectivity from its publisher
    pub publisher_id: Option<String>,
    pub name: Option<String>,
    pub siren: Option<String>,
    #[serde(flatten)]
    pub contact: ContactForm,
    pub domain_restriction: Option<String>,
    pub allow_publisher_management: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DdfipForm {
    pub code_departement: Option<String>,
    pub name: Option<String>,
    #[serde(flatten)]
    pub contact: ContactForm,
    pub domain_restriction: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DgfipForm {
    pub name: Option<String>,
    #[serde(flatten)]
    pub contact: ContactForm,
    pub domain_restriction: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OfficeForm {
    pub ddfip_id: Option<Uuid>,
    pub name: Option<String>,
    pub competences: Option<Vec<String>>,
    /// Replaces the communes covered by the office
    pub codes_insee: Option<Vec<String>>,
    /// Replaces the office members
    pub user_ids: Option<Vec<Uuid>>,
}

impl From<entity::publisher::Model> for PublisherDto {
    fn from(model: entity::publisher::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            siren: model.siren,
            email: model.email,
            contact: ContactDto {
                first_name: model.contact_first_name,
                last_name: model.contact_last_name,
                email: model.contact_email,
                phone: model.contact_phone,
            },
            domain_restriction: model.domain_restriction,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::collectivity::Model> for CollectivityDto {
    fn from(model: entity::collectivity::Model) -> Self {
        Self {
            id: model.id,
            territory_type: model.territory_type,
            territory_id: model.territory_id,
            publisher_id: model.publisher_id,
            name: model.name,
            siren: model.siren,
            contact: ContactDto {
                first_name: model.contact_first_name,
                last_name: model.contact_last_name,
                email: model.contact_email,
                phone: model.contact_phone,
            },
            domain_restriction: model.domain_restriction,
            allow_publisher_management: model.allow_publisher_management,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::ddfip::Model> for DdfipDto {
    fn from(model: entity::ddfip::Model) -> Self {
        Self {
            id: model.id,
            code_departement: model.code_departement,
            name: model.name,
            contact: ContactDto {
                first_name: model.contact_first_name,
                last_name: model.contact_last_name,
                email: model.contact_email,
                phone: model.contact_phone,
            },
            domain_restriction: model.domain_restriction,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<entity::dgfip::Model> for DgfipDto {
    fn from(model: entity::dgfip::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            contact: ContactDto {
                first_name: model.contact_first_name,
                last_name: model.contact_last_name,
                email: model.contact_email,
                phone: model.contact_phone,
            },
            domain_restriction: model.domain_restriction,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
