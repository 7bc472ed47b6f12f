use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::organization::PublisherForm,
    server::{
        data::{
            listing::{ListQuery, Page},
            publisher::PublisherRepository,
        },
        error::{validation::ValidationErrors, Error},
        model::db::PublisherModel,
        service::{domain_restriction, found, kept, Contact},
        util::validation::{check_format, is_email, is_siren, required, Field, TAKEN},
    },
};

pub struct PublisherService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PublisherService<'a> {
    /// Creates a new instance of [`PublisherService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<PublisherModel>, Error> {
        Ok(PublisherRepository::new(self.db).list(query).await?)
    }

    /// IDs matching `query`, for bulk actions
    pub async fn ids(&self, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(PublisherRepository::new(self.db).ids(query).await?)
    }

    /// Finds a publisher in any state, 404 when missing
    pub async fn find(&self, id: Uuid) -> Result<PublisherModel, Error> {
        found(
            PublisherRepository::new(self.db).find(id).await?,
            "publisher",
            id,
        )
    }

    /// Finds a kept publisher, 404 when missing and 410 when discarded
    pub async fn get(&self, id: Uuid) -> Result<PublisherModel, Error> {
        kept(
            PublisherRepository::new(self.db).find(id).await?,
            "publisher",
            id,
        )
    }

    /// Creates a publisher
    ///
    /// # Returns
    /// - `Ok(PublisherModel)`: the created publisher
    /// - `Err(Error::ValidationErrors(_))`: name or SIREN missing, malformed field, or SIREN
    ///   already used by a kept publisher
    pub async fn create(&self, form: PublisherForm) -> Result<PublisherModel, Error> {
        let publisher = self.validate(None, form).await?;

        Ok(PublisherRepository::new(self.db).create(publisher).await?)
    }

    /// Updates a kept publisher, fields absent from `form` are left unchanged
    pub async fn update(&self, id: Uuid, form: PublisherForm) -> Result<PublisherModel, Error> {
        let current = self.get(id).await?;
        let publisher = self.validate(Some(current), form).await?;

        Ok(PublisherRepository::new(self.db).update(publisher).await?)
    }

    async fn validate(
        &self,
        current: Option<PublisherModel>,
        form: PublisherForm,
    ) -> Result<entity::publisher::ActiveModel, Error> {
        let mut errors = ValidationErrors::new();

        let name = required(
            &mut errors,
            "name",
            form.name,
            current.as_ref().map(|p| p.name.as_str()),
        );
        let siren = required(
            &mut errors,
            "siren",
            form.siren,
            current.as_ref().map(|p| p.siren.as_str()),
        );
        check_format(&mut errors, "siren", siren.as_deref(), is_siren);

        if let Some(siren) = siren.as_deref().filter(|s| is_siren(s)) {
            let except = current.as_ref().map(|p| p.id);
            if PublisherRepository::new(self.db)
                .siren_taken(siren, except)
                .await?
            {
                errors.add("siren", TAKEN);
            }
        }

        let email = Field::from_form(form.email)
            .into_column(current.as_ref().and_then(|p| p.email.clone()));
        check_format(&mut errors, "email", email.as_deref(), is_email);

        let contact = current
            .as_ref()
            .map(|p| Contact {
                first_name: p.contact_first_name.clone(),
                last_name: p.contact_last_name.clone(),
                email: p.contact_email.clone(),
                phone: p.contact_phone.clone(),
            })
            .unwrap_or_default()
            .apply(&mut errors, form.contact);
        let domain = domain_restriction(
            &mut errors,
            form.domain_restriction,
            current.as_ref().and_then(|p| p.domain_restriction.clone()),
        );

        errors.into_result()?;

        let mut publisher = match current {
            Some(current) => current.into_active_model(),
            None => entity::publisher::ActiveModel {
                discarded_at: ActiveValue::Set(None),
                ..Default::default()
            },
        };
        publisher.name = ActiveValue::Set(name.unwrap_or_default());
        publisher.siren = ActiveValue::Set(siren.unwrap_or_default());
        publisher.email = ActiveValue::Set(email);
        publisher.contact_first_name = ActiveValue::Set(contact.first_name);
        publisher.contact_last_name = ActiveValue::Set(contact.last_name);
        publisher.contact_email = ActiveValue::Set(contact.email);
        publisher.contact_phone = ActiveValue::Set(contact.phone);
        publisher.domain_restriction = ActiveValue::Set(domain);

        Ok(publisher)
    }
}
