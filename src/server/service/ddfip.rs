use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::organization::DdfipForm,
    server::{
        data::{
            ddfip::DdfipRepository,
            listing::{ListQuery, Page},
            territory::departement::DepartementRepository,
        },
        error::{validation::ValidationErrors, Error},
        model::db::DdfipModel,
        service::{domain_restriction, found, kept, Contact},
        util::validation::{check_format, is_code_departement, required, UNKNOWN},
    },
};

pub struct DdfipService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DdfipService<'a> {
    /// Creates a new instance of [`DdfipService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<DdfipModel>, Error> {
        Ok(DdfipRepository::new(self.db).list(query).await?)
    }

    pub async fn ids(&self, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(DdfipRepository::new(self.db).ids(query).await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<DdfipModel, Error> {
        found(DdfipRepository::new(self.db).find(id).await?, "ddfip", id)
    }

    pub async fn get(&self, id: Uuid) -> Result<DdfipModel, Error> {
        kept(DdfipRepository::new(self.db).find(id).await?, "ddfip", id)
    }

    /// Creates a DDFIP for an existing département
    pub async fn create(&self, form: DdfipForm) -> Result<DdfipModel, Error> {
        let ddfip = self.validate(None, form).await?;

        Ok(DdfipRepository::new(self.db).create(ddfip).await?)
    }

    pub async fn update(&self, id: Uuid, form: DdfipForm) -> Result<DdfipModel, Error> {
        let current = self.get(id).await?;
        let ddfip = self.validate(Some(current), form).await?;

        Ok(DdfipRepository::new(self.db).update(ddfip).await?)
    }

    async fn validate(
        &self,
        current: Option<DdfipModel>,
        form: DdfipForm,
    ) -> Result<entity::ddfip::ActiveModel, Error> {
        let mut errors = ValidationErrors::new();

        let name = required(
            &mut errors,
            "name",
            form.name,
            current.as_ref().map(|d| d.name.as_str()),
        );
        let code_departement = required(
            &mut errors,
            "code_departement",
            form.code_departement,
            current.as_ref().map(|d| d.code_departement.as_str()),
        );
        check_format(
            &mut errors,
            "code_departement",
            code_departement.as_deref(),
            is_code_departement,
        );

        if let Some(code) = code_departement.as_deref().filter(|c| is_code_departement(c)) {
            if DepartementRepository::new(self.db)
                .find_by_code(code)
                .await?
                .is_none()
            {
                errors.add("code_departement", UNKNOWN);
            }
        }

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

        let mut ddfip = match current {
            Some(current) => current.into_active_model(),
            None => entity::ddfip::ActiveModel {
                discarded_at: ActiveValue::Set(None),
                ..Default::default()
            },
        };
        ddfip.name = ActiveValue::Set(name.unwrap_or_default());
        ddfip.code_departement = ActiveValue::Set(code_departement.unwrap_or_default());
        ddfip.contact_first_name = ActiveValue::Set(contact.first_name);
        ddfip.contact_last_name = ActiveValue::Set(contact.last_name);
        ddfip.contact_email = ActiveValue::Set(contact.email);
        ddfip.contact_phone = ActiveValue::Set(contact.phone);
        ddfip.domain_restriction = ActiveValue::Set(domain);

        Ok(ddfip)
    }
}

#[cfg(test)]
mod tests {

    mod create {
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::organization::DdfipForm,
            server::{error::Error, service::ddfip::DdfipService},
        };

        /// Expect the département to exist
        #[tokio::test]
        async fn requires_existing_departement() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            test.territory().insert_test_territories().await?;

            let ddfip_service = DdfipService::new(&test.db);
            let unknown = ddfip_service
                .create(DdfipForm {
                    code_departement: Some("40".to_string()),
                    name: Some("DDFIP des Landes".to_string()),
                    ..Default::default()
                })
                .await;
            let created = ddfip_service
                .create(DdfipForm {
                    code_departement: Some(TEST_CODE_DEPARTEMENT.to_string()),
                    name: Some("DDFIP des Pyrénées-Atlantiques".to_string()),
                    ..Default::default()
                })
                .await;

            assert!(
                matches!(unknown, Err(Error::ValidationErrors(e)) if e.contains("code_departement"))
            );
            assert!(created.is_ok());

            Ok(())
        }
    }
}
