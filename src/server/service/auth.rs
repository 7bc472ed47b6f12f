use std::str::FromStr;

use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::auth::InvitationForm,
    server::{
        data::{
            oauth::AccessTokenRepository, office::OfficeRepository,
            organization::find_organization, publisher::PublisherRepository,
            user::UserRepository,
        },
        error::{auth::AuthError, validation::ValidationErrors, Error},
        model::{
            auth::{ApiClient, CurrentUser},
            db::UserModel,
            organization::OrganizationType,
        },
        util::secret::{digest, hash_password, verify_password},
    },
};

pub const MIN_PASSWORD_LENGTH: usize = 12;

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verifies credentials and records the sign in
    ///
    /// Unknown emails, discarded users, users who never accepted their invitation and
    /// wrong passwords all answer the same [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<UserModel, Error> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_email(email).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };

        let password_matches = match user.password_digest.clone() {
            Some(password_digest) => {
                verify_password(password.to_string(), password_digest).await?
            }
            None => false,
        };

        if user.discarded_at.is_some() || !password_matches {
            tracing::debug!("Refused sign in for user {}", user.id);
            return Err(AuthError::InvalidCredentials.into());
        }

        user_repo.track_sign_in(user.id).await?;

        Ok(user)
    }

    /// Sets the password of an invited user and consumes the invitation
    pub async fn accept_invitation(&self, form: InvitationForm) -> Result<UserModel, Error> {
        let mut errors = ValidationErrors::new();
        if form.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("password", "est trop court (12 caractères minimum)");
        }
        if form.password != form.password_confirmation {
            errors.add("password_confirmation", "ne correspond pas au mot de passe");
        }
        errors.into_result()?;

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo
            .find_by_invitation_digest(&digest(form.token.trim()))
            .await?
        else {
            return Err(AuthError::InvalidInvitation.into());
        };

        let password_digest = hash_password(form.password).await?;

        let mut user = user.into_active_model();
        user.password_digest = ActiveValue::Set(Some(password_digest));
        user.invitation_digest = ActiveValue::Set(None);

        Ok(user_repo.update(user).await?)
    }

    /// Loads the signed in user with their organization and offices
    ///
    /// Returns `None` when the user, or their organization, is missing or discarded.
    pub async fn current_user(&self, user_id: Uuid) -> Result<Option<CurrentUser>, Error> {
        let Some(user) = UserRepository::new(self.db).find_kept(user_id).await? else {
            return Ok(None);
        };

        let organization_type = OrganizationType::from_str(&user.organization_type)
            .map_err(|_| Error::ParseError(user.organization_type.clone()))?;
        let organization = find_organization(self.db, organization_type, user.organization_id)
            .await?
            .filter(|organization| !organization.is_discarded());

        let Some(organization) = organization else {
            tracing::warn!(
                "User {} belongs to a missing or discarded organization {}",
                user.id,
                user.organization_id
            );
            return Ok(None);
        };

        let office_ids = OfficeRepository::new(self.db)
            .kept_office_ids_for_user(user.id)
            .await?;

        Ok(Some(CurrentUser {
            user,
            organization,
            office_ids,
        }))
    }

    /// Authenticates a publisher application from a bearer token
    pub async fn authenticate_bearer(&self, token: &str) -> Result<ApiClient, Error> {
        let Some((token, application)) = AccessTokenRepository::new(self.db)
            .find_active_by_digest(&digest(token))
            .await?
        else {
            return Err(AuthError::InvalidBearerToken.into());
        };

        let Some(publisher) = PublisherRepository::new(self.db)
            .find_kept(application.owner_id)
            .await?
        else {
            return Err(AuthError::InvalidBearerToken.into());
        };

        Ok(ApiClient {
            publisher,
            application,
            token,
        })
    }
}

#[cfg(test)]
mod tests {

    mod login {
        use passerelle_test_utils::prelude::*;

        use crate::server::{
            data::discard::DiscardRepository,
            error::{auth::AuthError, Error},
            service::auth::AuthService,
        };

        /// Expect valid credentials to sign in and be tracked
        #[tokio::test]
        async fn signs_in_with_valid_credentials() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            let user = test
                .user()
                .insert_user_with_password("Publisher", publisher.id, "jeanne@acme.fr")
                .await?;

            let auth_service = AuthService::new(&test.db);
            let result = auth_service.login("jeanne@acme.fr", TEST_PASSWORD).await;

            assert!(result.is_ok());
            assert_eq!(result.unwrap().id, user.id);

            Ok(())
        }

        /// Expect wrong passwords and discarded users to be refused alike
        #[tokio::test]
        async fn refuses_invalid_credentials() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            test.user()
                .insert_user_with_password("Publisher", publisher.id, "jeanne@acme.fr")
                .await?;
            let discarded = test
                .user()
                .insert_user_with_password("Publisher", publisher.id, "paul@acme.fr")
                .await?;
            DiscardRepository::new(&test.db)
                .discard::<entity::user::Entity>(discarded.id)
                .await?;

            let auth_service = AuthService::new(&test.db);
            let wrong_password = auth_service.login("jeanne@acme.fr", "not the password").await;
            let discarded = auth_service.login("paul@acme.fr", TEST_PASSWORD).await;
            let unknown = auth_service.login("nobody@acme.fr", TEST_PASSWORD).await;

            for result in [wrong_password, discarded, unknown] {
                assert!(matches!(
                    result,
                    Err(Error::AuthError(AuthError::InvalidCredentials))
                ));
            }

            Ok(())
        }
    }

    mod accept_invitation {
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::auth::InvitationForm,
            server::{
                error::{auth::AuthError, Error},
                service::auth::AuthService,
            },
        };

        /// Expect the password to be set and the invitation consumed
        #[tokio::test]
        async fn sets_password_once() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            test.user()
                .save_user(entity::user::Model {
                    invitation_digest: Some(digest("invitation")),
                    ..factory::user("Publisher", publisher.id, "jeanne@acme.fr")
                })
                .await?;

            let form = InvitationForm {
                token: "invitation".to_string(),
                password: "un mot de passe solide".to_string(),
                password_confirmation: "un mot de passe solide".to_string(),
            };

            let auth_service = AuthService::new(&test.db);
            let accepted = auth_service.accept_invitation(form.clone()).await;
            let replayed = auth_service.accept_invitation(form).await;

            assert!(accepted.is_ok());
            let user = accepted.unwrap();
            assert!(user.password_digest.is_some());
            assert!(user.invitation_digest.is_none());
            assert!(matches!(
                replayed,
                Err(Error::AuthError(AuthError::InvalidInvitation))
            ));
            assert!(auth_service
                .login("jeanne@acme.fr", "un mot de passe solide")
                .await
                .is_ok());

            Ok(())
        }

        /// Expect short or mismatching passwords to be refused
        #[tokio::test]
        async fn validates_password() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;

            let auth_service = AuthService::new(&test.db);
            let result = auth_service
                .accept_invitation(InvitationForm {
                    token: "invitation".to_string(),
                    password: "court".to_string(),
                    password_confirmation: "autre".to_string(),
                })
                .await;

            let Err(Error::ValidationErrors(errors)) = result else {
                panic!("expected validation errors");
            };
            assert_eq!(errors.fields(), vec!["password", "password_confirmation"]);

            Ok(())
        }
    }

    mod current_user {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::server::service::auth::AuthService;

        /// Expect members of a discarded organization to be signed out
        #[tokio::test]
        async fn ignores_discarded_organization() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test
                .organization()
                .save_publisher(entity::publisher::Model {
                    discarded_at: Some(Utc::now().naive_utc()),
                    ..factory::publisher("511022394")
                })
                .await?;
            let user = test
                .user()
                .insert_user("Publisher", publisher.id, "jeanne@acme.fr")
                .await?;

            let auth_service = AuthService::new(&test.db);

            assert!(auth_service.current_user(user.id).await.unwrap().is_none());

            Ok(())
        }

        /// Expect DDFIP members to carry their kept offices
        #[tokio::test]
        async fn loads_offices() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let ddfip = test.organization().insert_ddfip("64").await?;
            let office = test
                .organization()
                .insert_office(ddfip.id, &["evaluation_local_habitation"])
                .await?;
            let user = test
                .user()
                .insert_user("DDFIP", ddfip.id, "agent@dgfip.finances.gouv.fr")
                .await?;
            test.user().add_user_to_office(user.id, office.id).await?;

            let auth_service = AuthService::new(&test.db);
            let current = auth_service.current_user(user.id).await.unwrap().unwrap();

            assert_eq!(current.office_ids, vec![office.id]);
            assert_eq!(current.ddfip_id(), Some(ddfip.id));

            Ok(())
        }
    }

    mod authenticate_bearer {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::server::{
            error::{auth::AuthError, Error},
            service::auth::AuthService,
        };

        /// Expect a valid token to authenticate its publisher
        #[tokio::test]
        async fn authenticates_publisher() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            test.auth().insert_access_token(publisher.id).await?;

            let auth_service = AuthService::new(&test.db);
            let client = auth_service.authenticate_bearer(TEST_ACCESS_TOKEN).await;

            assert!(client.is_ok());
            assert_eq!(client.unwrap().publisher_id(), publisher.id);

            Ok(())
        }

        /// Expect tokens of discarded publishers and unknown tokens to be refused
        #[tokio::test]
        async fn refuses_invalid_tokens() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test
                .organization()
                .save_publisher(entity::publisher::Model {
                    discarded_at: Some(Utc::now().naive_utc()),
                    ..factory::publisher("511022394")
                })
                .await?;
            test.auth().insert_access_token(publisher.id).await?;

            let auth_service = AuthService::new(&test.db);

            for token in [TEST_ACCESS_TOKEN, "unknown"] {
                assert!(matches!(
                    auth_service.authenticate_bearer(token).await,
                    Err(Error::AuthError(AuthError::InvalidBearerToken))
                ));
            }

            Ok(())
        }
    }
}
