use sea_orm::EntityTrait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    constant::TEST_ACCESS_TOKEN,
    error::TestError,
    fixtures::factory,
    model::{OauthAccessTokenModel, OauthApplicationModel},
    TestContext,
};

impl TestContext {
    pub fn auth<'a>(&'a self) -> AuthFixtures<'a> {
        AuthFixtures { context: self }
    }
}

pub struct AuthFixtures<'a> {
    context: &'a TestContext,
}

/// Hex encoded SHA-256 digest, matching how secrets and tokens are stored.
pub fn digest(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

impl<'a> AuthFixtures<'a> {
    pub async fn save_oauth_application(
        &self,
        model: OauthApplicationModel,
    ) -> Result<OauthApplicationModel, TestError> {
        Ok(entity::prelude::OauthApplication::insert(
            entity::oauth_application::ActiveModel::from(model),
        )
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn save_access_token(
        &self,
        model: OauthAccessTokenModel,
    ) -> Result<OauthAccessTokenModel, TestError> {
        Ok(entity::prelude::OauthAccessToken::insert(
            entity::oauth_access_token::ActiveModel::from(model),
        )
        .exec_with_returning(&self.context.db)
        .await?)
    }

    pub async fn insert_oauth_application(
        &self,
        publisher_id: Uuid,
    ) -> Result<OauthApplicationModel, TestError> {
        let uid = Uuid::new_v4().simple().to_string();

        self.save_oauth_application(factory::oauth_application(publisher_id, &uid))
            .await
    }

    /// Insert an OAuth application for `publisher_id` and an access token whose plain value
    /// is [`TEST_ACCESS_TOKEN`].
    pub async fn insert_access_token(
        &self,
        publisher_id: Uuid,
    ) -> Result<(OauthApplicationModel, OauthAccessTokenModel), TestError> {
        let application = self.insert_oauth_application(publisher_id).await?;
        let token = self
            .save_access_token(factory::access_token(application.id, TEST_ACCESS_TOKEN))
            .await?;

        Ok((application, token))
    }
}
