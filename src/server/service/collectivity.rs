use std::str::FromStr;

use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::organization::CollectivityForm,
    server::{
        data::{
            collectivity::{CollectivityRepository, CollectivityScope},
            listing::{ListQuery, Page},
            publisher::PublisherRepository,
            territory::find_territory,
        },
        error::{validation::ValidationErrors, Error},
        model::{db::CollectivityModel, organization::TerritoryType},
        service::{domain_restriction, found, kept, Contact},
        util::validation::{check_format, is_siren, required, Field, BLANK, INVALID, TAKEN, UNKNOWN},
    },
};

pub struct CollectivityService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CollectivityService<'a> {
    /// Creates a new instance of [`CollectivityService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        scope: &CollectivityScope,
        query: &ListQuery,
    ) -> Result<Page<CollectivityModel>, Error> {
        Ok(CollectivityRepository::new(self.db)
            .list(scope, query)
            .await?)
    }

    pub async fn ids(&self, scope: &CollectivityScope, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(CollectivityRepository::new(self.db).ids(scope, query).await?)
    }

    /// Finds a collectivity in any state, 404 when missing
    pub async fn find(&self, id: Uuid) -> Result<CollectivityModel, Error> {
        found(
            CollectivityRepository::new(self.db).find(id).await?,
            "collectivity",
            id,
        )
    }

    /// Finds a kept collectivity, 404 when missing and 410 when discarded
    pub async fn get(&self, id: Uuid) -> Result<CollectivityModel, Error> {
        kept(
            CollectivityRepository::new(self.db).find(id).await?,
            "collectivity",
            id,
        )
    }

    /// Creates a collectivity
    ///
    /// `publisher_id` forces the managing publisher, used when a publisher admin creates one
    /// of their collectivities. Otherwise the form's `publisher_id` applies.
    pub async fn create(
        &self,
        form: CollectivityForm,
        publisher_id: Option<Uuid>,
    ) -> Result<CollectivityModel, Error> {
        let collectivity = self.validate(None, form, publisher_id).await?;

        Ok(CollectivityRepository::new(self.db)
            .create(collectivity)
            .await?)
    }

    /// Updates a kept collectivity, fields absent from `form` are left unchanged
    pub async fn update(
        &self,
        id: Uuid,
        form: CollectivityForm,
        publisher_id: Option<Uuid>,
    ) -> Result<CollectivityModel, Error> {
        let current = self.get(id).await?;
        let collectivity = self.validate(Some(current), form, publisher_id).await?;

        Ok(CollectivityRepository::new(self.db)
            .update(collectivity)
            .await?)
    }

    async fn validate(
        &self,
        current: Option<CollectivityModel>,
        form: CollectivityForm,
        forced_publisher_id: Option<Uuid>,
    ) -> Result<entity::collectivity::ActiveModel, Error> {
        let mut errors = ValidationErrors::new();

        let name = required(
            &mut errors,
            "name",
            form.name,
            current.as_ref().map(|c| c.name.as_str()),
        );
        let siren = required(
            &mut errors,
            "siren",
            form.siren,
            current.as_ref().map(|c| c.siren.as_str()),
        );
        check_format(&mut errors, "siren", siren.as_deref(), is_siren);

        if let Some(siren) = siren.as_deref().filter(|s| is_siren(s)) {
            let except = current.as_ref().map(|c| c.id);
            if CollectivityRepository::new(self.db)
                .siren_taken(siren, except)
                .await?
            {
                errors.add("siren", TAKEN);
            }
        }

        let territory_type = form
            .territory_type
            .or_else(|| current.as_ref().map(|c| c.territory_type.clone()));
        let territory_id = form
            .territory_id
            .or_else(|| current.as_ref().map(|c| c.territory_id));

        let territory = match (territory_type.as_deref(), territory_id) {
            (Some(territory_type), Some(territory_id)) => {
                match TerritoryType::from_str(territory_type) {
                    Ok(territory_type) => {
                        let territory =
                            find_territory(self.db, territory_type, territory_id).await?;
                        if territory.is_none() {
                            errors.add("territory_id", UNKNOWN);
                        }
                        territory.map(|_| (territory_type, territory_id))
                    }
                    Err(()) => {
                        errors.add("territory_type", INVALID);
                        None
                    }
                }
            }
            (territory_type, territory_id) => {
                if territory_type.is_none() {
                    errors.add("territory_type", BLANK);
                }
                if territory_id.is_none() {
                    errors.add("territory_id", BLANK);
                }
                None
            }
        };

        let publisher_id = match forced_publisher_id {
            Some(publisher_id) => Some(publisher_id),
            None => match Field::from_form(form.publisher_id) {
                Field::Unchanged => current.as_ref().and_then(|c| c.publisher_id),
                Field::Cleared => None,
                Field::Set(value) => match Uuid::parse_str(&value) {
                    Ok(publisher_id) => {
                        if PublisherRepository::new(self.db)
                            .find_kept(publisher_id)
                            .await?
                            .is_none()
                        {
                            errors.add("publisher_id", UNKNOWN);
                        }
                        Some(publisher_id)
                    }
                    Err(_) => {
                        errors.add("publisher_id", INVALID);
                        None
                    }
                },
            },
        };

        let contact = current
            .as_ref()
            .map(|c| Contact {
                first_name: c.contact_first_name.clone(),
                last_name: c.contact_last_name.clone(),
                email: c.contact_email.clone(),
                phone: c.contact_phone.clone(),
            })
            .unwrap_or_default()
            .apply(&mut errors, form.contact);
        let domain = domain_restriction(
            &mut errors,
            form.domain_restriction,
            current.as_ref().and_then(|c| c.domain_restriction.clone()),
        );
        let allow_publisher_management = form
            .allow_publisher_management
            .or_else(|| current.as_ref().map(|c| c.allow_publisher_management))
            .unwrap_or(false);

        errors.into_result()?;

        let (territory_type, territory_id) = territory.ok_or_else(|| {
            Error::InternalError("Validated collectivity has no territory".to_string())
        })?;

        let mut collectivity = match current {
            Some(current) => current.into_active_model(),
            None => entity::collectivity::ActiveModel {
                discarded_at: ActiveValue::Set(None),
                ..Default::default()
            },
        };
        collectivity.territory_type = ActiveValue::Set(territory_type.as_str().to_string());
        collectivity.territory_id = ActiveValue::Set(territory_id);
        collectivity.publisher_id = ActiveValue::Set(publisher_id);
        collectivity.name = ActiveValue::Set(name.unwrap_or_default());
        collectivity.siren = ActiveValue::Set(siren.unwrap_or_default());
        collectivity.contact_first_name = ActiveValue::Set(contact.first_name);
        collectivity.contact_last_name = ActiveValue::Set(contact.last_name);
        collectivity.contact_email = ActiveValue::Set(contact.email);
        collectivity.contact_phone = ActiveValue::Set(contact.phone);
        collectivity.domain_restriction = ActiveValue::Set(domain);
        collectivity.allow_publisher_management = ActiveValue::Set(allow_publisher_management);

        Ok(collectivity)
    }
}
