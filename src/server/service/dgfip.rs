use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::organization::DgfipForm,
    server::{
        data::{
            dgfip::DgfipRepository,
            discard::DiscardRepository,
            listing::{ListQuery, Page},
        },
        error::{validation::ValidationErrors, workflow::WorkflowError, Error},
        model::db::DgfipModel,
        service::{domain_restriction, found, kept, Contact},
        util::validation::required,
    },
};

pub struct DgfipService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DgfipService<'a> {
    /// Creates a new instance of [`DgfipService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<DgfipModel>, Error> {
        Ok(DgfipRepository::new(self.db).list(query).await?)
    }

    pub async fn ids(&self, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(DgfipRepository::new(self.db).ids(query).await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<DgfipModel, Error> {
        found(DgfipRepository::new(self.db).find(id).await?, "dgfip", id)
    }

    pub async fn get(&self, id: Uuid) -> Result<DgfipModel, Error> {
        kept(DgfipRepository::new(self.db).find(id).await?, "dgfip", id)
    }

    /// Creates the DGFIP, refused while another one is kept
    pub async fn create(&self, form: DgfipForm) -> Result<DgfipModel, Error> {
        let dgfip = self.validate(None, form)?;

        if DgfipRepository::new(self.db).kept_exists(None).await? {
            return Err(WorkflowError::DgfipAlreadyExists.into());
        }

        Ok(DgfipRepository::new(self.db).create(dgfip).await?)
    }

    pub async fn update(&self, id: Uuid, form: DgfipForm) -> Result<DgfipModel, Error> {
        let current = self.get(id).await?;
        let dgfip = self.validate(Some(current), form)?;

        Ok(DgfipRepository::new(self.db).update(dgfip).await?)
    }

    /// Restores a DGFIP, refused while another one is kept
    pub async fn undiscard(&self, id: Uuid) -> Result<bool, Error> {
        let dgfip = self.find(id).await?;

        if dgfip.discarded_at.is_some()
            && DgfipRepository::new(self.db).kept_exists(Some(id)).await?
        {
            return Err(WorkflowError::DgfipAlreadyExists.into());
        }

        Ok(DiscardRepository::new(self.db)
            .undiscard::<entity::dgfip::Entity>(id)
            .await?)
    }

    fn validate(
        &self,
        current: Option<DgfipModel>,
        form: DgfipForm,
    ) -> Result<entity::dgfip::ActiveModel, Error> {
        let mut errors = ValidationErrors::new();

        let name = required(
            &mut errors,
            "name",
            form.name,
            current.as_ref().map(|d| d.name.as_str()),
        );
        let contact = current
            .as_ref()
            .map(|d| Contact {
                first_name: d.contact_first_name.clone(),
                last_name: d.contact_last_name.clone(),
                email: d.contact_email.clone(),
                phone: d.contact_phone.clone(),
            })
            .unwrap_or_default()
            .apply(&mut errors, form.contact);
        let domain = domain_restriction(
            &mut errors,
            form.domain_restriction,
            current.as_ref().and_then(|d| d.domain_restriction.clone()),
        );

        errors.into_result()?;

        let mut dgfip = match current {
            Some(current) => current.into_active_model(),
            None => entity::dgfip::ActiveModel {
                discarded_at: ActiveValue::Set(None),
                ..Default::default()
            },
        };
        dgfip.name = ActiveValue::Set(name.unwrap_or_default());
        dgfip.contact_first_name = ActiveValue::Set(contact.first_name);
        dgfip.contact_last_name = ActiveValue::Set(contact.last_name);
        dgfip.contact_email = ActiveValue::Set(contact.email);
        dgfip.contact_phone = ActiveValue::Set(contact.phone);
        dgfip.domain_restriction = ActiveValue::Set(domain);

        Ok(dgfip)
    }
}

#[cfg(test)]
mod tests {

    mod create {
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::organization::DgfipForm,
            server::{
                error::{workflow::WorkflowError, Error},
                service::dgfip::DgfipService,
            },
        };

        /// Expect a second kept DGFIP to be refused
        #[tokio::test]
        async fn allows_a_single_kept_dgfip() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            test.organization().insert_dgfip().await?;

            let dgfip_service = DgfipService::new(&test.db);
            let result = dgfip_service
                .create(DgfipForm {
                    name: Some("DGFIP".to_string()),
                    ..Default::default()
                })
                .await;

            assert!(matches!(
                result,
                Err(Error::WorkflowError(WorkflowError::DgfipAlreadyExists))
            ));

            Ok(())
        }
    }

    mod undiscard {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::server::{
            error::{workflow::WorkflowError, Error},
            service::dgfip::DgfipService,
        };

        /// Expect restoring a DGFIP next to a kept one to be refused
        #[tokio::test]
        async fn refuses_second_kept_dgfip() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            test.organization().insert_dgfip().await?;
            let discarded = test
                .organization()
                .save_dgfip(entity::dgfip::Model {
                    discarded_at: Some(Utc::now().naive_utc()),
                    ..factory::dgfip()
                })
                .await?;

            let dgfip_service = DgfipService::new(&test.db);
            let result = dgfip_service.undiscard(discarded.id).await;

            assert!(matches!(
                result,
                Err(Error::WorkflowError(WorkflowError::DgfipAlreadyExists))
            ));

            Ok(())
        }
    }
}
