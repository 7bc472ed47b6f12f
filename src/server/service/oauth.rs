use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::oauth::{OauthApplicationDto, OauthApplicationForm},
    server::{
        data::{
            discard::DiscardRepository,
            listing::{ListQuery, Page},
            oauth::OauthApplicationRepository,
        },
        error::{record::RecordError, validation::ValidationErrors, Error},
        model::db::OauthApplicationModel,
        service::kept,
        util::{
            secret::{digest, generate_token},
            validation::{required, Field, INVALID},
        },
    },
};

/// Application created along with its plain secret, only available at that moment
pub struct CreatedApplication {
    pub application: OauthApplicationDto,
    pub secret: String,
}

fn is_redirect_uri(value: &str) -> bool {
    value.starts_with("https://")
        || value.starts_with("http://localhost")
        || value.starts_with("http://127.0.0.1")
}

pub struct OauthApplicationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OauthApplicationService<'a> {
    /// Creates a new instance of [`OauthApplicationService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        owner_id: Uuid,
        query: &ListQuery,
    ) -> Result<Page<OauthApplicationDto>, Error> {
        Ok(OauthApplicationRepository::new(self.db)
            .list(owner_id, query)
            .await?
            .map(OauthApplicationDto::from))
    }

    pub async fn ids(&self, owner_id: Uuid, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(OauthApplicationRepository::new(self.db)
            .ids(owner_id, query)
            .await?)
    }

    /// Finds an application of `owner_id` in any state
    ///
    /// Applications of other publishers are reported missing.
    pub async fn find(&self, owner_id: Uuid, id: Uuid) -> Result<OauthApplicationModel, Error> {
        OauthApplicationRepository::new(self.db)
            .find(id)
            .await?
            .filter(|application| application.owner_id == owner_id)
            .ok_or_else(|| {
                RecordError::NotFound {
                    resource: "oauth_application",
                    id,
                }
                .into()
            })
    }

    /// Finds a kept application of `owner_id`, 410 when discarded
    pub async fn get(&self, owner_id: Uuid, id: Uuid) -> Result<OauthApplicationModel, Error> {
        let application = self.find(owner_id, id).await?;

        kept(Some(application), "oauth_application", id)
    }

    /// Registers an application for a publisher
    ///
    /// The client secret is generated here and only its digest is stored.
    pub async fn create(
        &self,
        owner_id: Uuid,
        form: OauthApplicationForm,
    ) -> Result<CreatedApplication, Error> {
        let mut errors = ValidationErrors::new();
        let name = required(&mut errors, "name", form.name, None);
        let redirect_uri = Field::from_form(form.redirect_uri).into_column(None);
        if redirect_uri.as_deref().is_some_and(|uri| !is_redirect_uri(uri)) {
            errors.add("redirect_uri", INVALID);
        }
        errors.into_result()?;

        let secret = generate_token();
        let application = OauthApplicationRepository::new(self.db)
            .create(entity::oauth_application::ActiveModel {
                owner_id: ActiveValue::Set(owner_id),
                name: ActiveValue::Set(name.unwrap_or_default()),
                uid: ActiveValue::Set(generate_token()),
                secret_digest: ActiveValue::Set(digest(&secret)),
                redirect_uri: ActiveValue::Set(redirect_uri),
                sandbox: ActiveValue::Set(form.sandbox.unwrap_or(false)),
                discarded_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            owner_id = %owner_id,
            "registered OAuth application"
        );

        Ok(CreatedApplication {
            application: application.into(),
            secret,
        })
    }

    /// Updates name, redirect URI and sandbox flag of a kept application
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        form: OauthApplicationForm,
    ) -> Result<OauthApplicationDto, Error> {
        let current = self.get(owner_id, id).await?;

        let mut errors = ValidationErrors::new();
        let name = required(&mut errors, "name", form.name, Some(current.name.as_str()));
        let redirect_uri =
            Field::from_form(form.redirect_uri).into_column(current.redirect_uri.clone());
        if redirect_uri.as_deref().is_some_and(|uri| !is_redirect_uri(uri)) {
            errors.add("redirect_uri", INVALID);
        }
        errors.into_result()?;

        let sandbox = form.sandbox.unwrap_or(current.sandbox);
        let mut application = current.into_active_model();
        application.name = ActiveValue::Set(name.unwrap_or_default());
        application.redirect_uri = ActiveValue::Set(redirect_uri);
        application.sandbox = ActiveValue::Set(sandbox);

        Ok(OauthApplicationRepository::new(self.db)
            .update(application)
            .await?
            .into())
    }

    pub async fn discard(&self, owner_id: Uuid, id: Uuid) -> Result<bool, Error> {
        self.find(owner_id, id).await?;

        Ok(DiscardRepository::new(self.db)
            .discard::<entity::oauth_application::Entity>(id)
            .await?)
    }

    pub async fn undiscard(&self, owner_id: Uuid, id: Uuid) -> Result<bool, Error> {
        self.find(owner_id, id).await?;

        Ok(DiscardRepository::new(self.db)
            .undiscard::<entity::oauth_application::Entity>(id)
            .await?)
    }
}

#[cfg(test)]
mod tests {

    mod create {
        use passerelle_test_utils::prelude::*;
        use sea_orm::EntityTrait;

        use crate::{
            model::oauth::OauthApplicationForm,
            server::{error::Error, service::oauth::OauthApplicationService},
        };

        /// Expect the secret to be returned in clear and stored as a digest
        #[tokio::test]
        async fn stores_secret_digest() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;

            let oauth_service = OauthApplicationService::new(&test.db);
            let created = oauth_service
                .create(
                    publisher.id,
                    OauthApplicationForm {
                        name: Some("Logiciel Fiscalité".to_string()),
                        redirect_uri: Some("https://logiciel.example.fr/callback".to_string()),
                        sandbox: Some(true),
                    },
                )
                .await
                .unwrap();

            let stored = entity::prelude::OauthApplication::find_by_id(created.application.id)
                .one(&test.db)
                .await?
                .unwrap();
            assert_ne!(stored.secret_digest, created.secret);
            assert_eq!(stored.secret_digest, digest(&created.secret));
            assert!(stored.sandbox);

            Ok(())
        }

        /// Expect plain HTTP redirect URIs to be refused
        #[tokio::test]
        async fn refuses_insecure_redirect_uri() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;

            let oauth_service = OauthApplicationService::new(&test.db);
            let result = oauth_service
                .create(
                    publisher.id,
                    OauthApplicationForm {
                        name: Some("Logiciel Fiscalité".to_string()),
                        redirect_uri: Some("http://logiciel.example.fr/callback".to_string()),
                        sandbox: None,
                    },
                )
                .await;

            assert!(
                matches!(result, Err(Error::ValidationErrors(errors)) if errors.contains("redirect_uri"))
            );

            Ok(())
        }
    }

    mod find {
        use passerelle_test_utils::prelude::*;

        use crate::server::{
            error::{record::RecordError, Error},
            service::oauth::OauthApplicationService,
        };

        /// Expect another publisher's application to be reported missing
        #[tokio::test]
        async fn hides_other_publishers_applications() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            let other = test.organization().insert_publisher("432611257").await?;
            let application = test.auth().insert_oauth_application(other.id).await?;

            let oauth_service = OauthApplicationService::new(&test.db);
            let result = oauth_service.find(publisher.id, application.id).await;

            assert!(matches!(
                result,
                Err(Error::RecordError(RecordError::NotFound { .. }))
            ));

            Ok(())
        }
    }
}
