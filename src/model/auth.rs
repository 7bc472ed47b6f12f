use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::user::UserDto;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Local path to redirect to after signing in
    pub redirect: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct InvitationForm {
    pub token: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrganizationSummaryDto {
    pub organization_type: String,
    pub id: Uuid,
    pub name: String,
}

/// The signed in user and their organization
#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AccountDto {
    pub user: UserDto,
    pub organization: OrganizationSummaryDto,
}
