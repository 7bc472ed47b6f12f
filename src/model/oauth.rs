use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OauthApplicationDto {
    pub id: Uuid,
    pub name: String,
    pub uid: String,
    pub redirect_uri: Option<String>,
    pub sandbox: bool,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OauthApplicationForm {
    pub name: Option<String>,
    pub redirect_uri: Option<String>,
    pub sandbox: Option<bool>,
}

impl From<entity::oauth_application::Model> for OauthApplicationDto {
    fn from(model: entity::oauth_application::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            uid: model.uid,
            redirect_uri: model.redirect_uri,
            sandbox: model.sandbox,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
