use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::package::PackageDto;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TransmissionDto {
    pub id: Uuid,
    pub collectivity_id: Uuid,
    pub user_id: Option<Uuid>,
    pub publisher_id: Option<Uuid>,
    pub oauth_application_id: Option<Uuid>,
    pub sandbox: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub report_ids: Vec<Uuid>,
    pub packages: Vec<PackageDto>,
    pub created_at: NaiveDateTime,
}

/// Body of `POST /api/collectivites/{id}/transmissions`
#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateTransmissionForm {
    /// Reports of a sandbox transmission are never visible to the DGFIP
    #[serde(default)]
    pub sandbox: bool,
}
