use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PackageDto {
    pub id: Uuid,
    pub reference: String,
    /// Derived from the package's timestamps
    pub status: String,
    pub form_type: String,
    pub collectivity_id: Uuid,
    pub publisher_id: Option<Uuid>,
    pub ddfip_id: Uuid,
    pub transmission_id: Uuid,
    pub office_id: Option<Uuid>,
    pub sandbox: bool,
    pub transmitted_at: NaiveDateTime,
    pub acknowledged_at: Option<NaiveDateTime>,
    pub assigned_at: Option<NaiveDateTime>,
    pub rejected_at: Option<NaiveDateTime>,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PackageAssignForm {
    pub office_id: Uuid,
}

impl PackageDto {
    /// Builds the document of a package whose workflow status was already derived
    pub fn new(model: entity::package::Model, status: &str) -> Self {
        Self {
            id: model.id,
            reference: model.reference,
            status: status.to_string(),
            form_type: model.form_type,
            collectivity_id: model.collectivity_id,
            publisher_id: model.publisher_id,
            ddfip_id: model.ddfip_id,
            transmission_id: model.transmission_id,
            office_id: model.office_id,
            sandbox: model.sandbox,
            transmitted_at: model.transmitted_at,
            acknowledged_at: model.acknowledged_at,
            assigned_at: model.assigned_at,
            rejected_at: model.rejected_at,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
