use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub organization_type: String,
    pub organization_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_admin: bool,
    pub super_admin: bool,
    pub office_ids: Vec<Uuid>,
    pub invited_at: Option<NaiveDateTime>,
    pub last_sign_in_at: Option<NaiveDateTime>,
    pub sign_in_count: i32,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserForm {
    /// `Publisher`, `Collectivity`, `DDFIP` or `DGFIP`
    pub organization_type: Option<String>,
    pub organization_id: Option<Uuid>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_admin: Option<bool>,
    pub super_admin: Option<bool>,
    /// Offices of the user's DDFIP, replaces the current memberships
    pub office_ids: Option<Vec<Uuid>>,
}

impl UserDto {
    pub fn new(model: entity::user::Model, office_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            organization_type: model.organization_type,
            organization_id: model.organization_id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            organization_admin: model.organization_admin,
            super_admin: model.super_admin,
            office_ids,
            invited_at: model.invited_at,
            last_sign_in_at: model.last_sign_in_at,
            sign_in_count: model.sign_in_count,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
