use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};
use uuid::Uuid;

use crate::{
    constant::TEST_PASSWORD, error::TestError, fixtures::factory, model::UserModel, TestContext,
};

impl TestContext {
    pub fn user<'a>(&'a self) -> UserFixtures<'a> {
        UserFixtures { context: self }
    }
}

pub struct UserFixtures<'a> {
    context: &'a TestContext,
}

/// Hash `password` the way the application stores password digests.
pub fn hash_password(password: &str) -> Result<String, TestError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TestError::PasswordHash(e.to_string()))
}

impl<'a> UserFixtures<'a> {
    pub async fn save_user(&self, model: UserModel) -> Result<UserModel, TestError> {
        Ok(
            entity::prelude::User::insert(entity::user::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    /// Insert a regular user of the given organization without password.
    pub async fn insert_user(
        &self,
        organization_type: &str,
        organization_id: Uuid,
        email: &str,
    ) -> Result<UserModel, TestError> {
        self.save_user(factory::user(organization_type, organization_id, email))
            .await
    }

    /// Insert a user whose password is [`TEST_PASSWORD`].
    pub async fn insert_user_with_password(
        &self,
        organization_type: &str,
        organization_id: Uuid,
        email: &str,
    ) -> Result<UserModel, TestError> {
        let model = UserModel {
            password_digest: Some(hash_password(TEST_PASSWORD)?),
            ..factory::user(organization_type, organization_id, email)
        };

        self.save_user(model).await
    }

    /// Insert an organization admin.
    pub async fn insert_admin(
        &self,
        organization_type: &str,
        organization_id: Uuid,
        email: &str,
    ) -> Result<UserModel, TestError> {
        let model = UserModel {
            organization_admin: true,
            ..factory::user(organization_type, organization_id, email)
        };

        self.save_user(model).await
    }

    /// Insert a super admin belonging to a fresh DGFIP.
    pub async fn insert_super_admin(&self) -> Result<UserModel, TestError> {
        let dgfip = self.context.organization().insert_dgfip().await?;
        let model = UserModel {
            super_admin: true,
            organization_admin: true,
            ..factory::user("DGFIP", dgfip.id, "admin@dgfip.finances.gouv.fr")
        };

        self.save_user(model).await
    }

    pub async fn add_user_to_office(
        &self,
        user_id: Uuid,
        office_id: Uuid,
    ) -> Result<entity::office_user::Model, TestError> {
        Ok(
            entity::prelude::OfficeUser::insert(entity::office_user::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                office_id: ActiveValue::Set(office_id),
                user_id: ActiveValue::Set(user_id),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
