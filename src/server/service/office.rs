use std::str::FromStr;

use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::organization::{OfficeDto, OfficeForm},
    server::{
        data::{
            ddfip::DdfipRepository,
            listing::{ListQuery, Page},
            office::{OfficeRepository, OfficeScope},
            territory::commune::CommuneRepository,
            user::UserRepository,
        },
        error::{validation::ValidationErrors, Error},
        model::{
            db::OfficeModel,
            organization::OrganizationType,
            report::{json_strings, FormType},
        },
        service::{found, kept},
        util::validation::{required, BLANK, INVALID, UNKNOWN},
    },
};

pub struct OfficeService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> OfficeService<'a> {
    /// Creates a new instance of [`OfficeService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists offices along with their communes and members
    pub async fn list(
        &self,
        scope: &OfficeScope,
        query: &ListQuery,
    ) -> Result<Page<OfficeDto>, Error> {
        let page = OfficeRepository::new(self.db).list(scope, query).await?;

        let mut records = Vec::with_capacity(page.records.len());
        for office in &page.records {
            records.push(self.to_dto(office.clone()).await?);
        }

        Ok(Page {
            records,
            page: page.page,
            items: page.items,
            total: page.total,
            pages: page.pages,
        })
    }

    pub async fn ids(&self, scope: &OfficeScope, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(OfficeRepository::new(self.db).ids(scope, query).await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<OfficeModel, Error> {
        found(OfficeRepository::new(self.db).find(id).await?, "office", id)
    }

    pub async fn get(&self, id: Uuid) -> Result<OfficeDto, Error> {
        let office = kept(OfficeRepository::new(self.db).find(id).await?, "office", id)?;

        self.to_dto(office).await
    }

    /// Creates an office
    ///
    /// `ddfip_id` forces the DDFIP, used when a DDFIP admin creates one of their offices.
    /// Submitted `codes_insee` and `user_ids` become the office's communes and members.
    pub async fn create(&self, form: OfficeForm, ddfip_id: Option<Uuid>) -> Result<OfficeDto, Error> {
        let validated = self.validate(None, form, ddfip_id).await?;

        let txn = self.db.begin().await?;
        let office_repo = OfficeRepository::new(&txn);
        let office = office_repo.create(validated.office).await?;
        office_repo
            .replace_communes(office.id, &validated.codes_insee.unwrap_or_default())
            .await?;
        office_repo
            .replace_users(office.id, &validated.user_ids.unwrap_or_default())
            .await?;
        txn.commit().await?;

        self.to_dto(office).await
    }

    /// Updates a kept office, replacing communes and members when they are submitted
    pub async fn update(&self, id: Uuid, form: OfficeForm) -> Result<OfficeDto, Error> {
        let current = kept(OfficeRepository::new(self.db).find(id).await?, "office", id)?;
        let validated = self.validate(Some(current), form, None).await?;

        let txn = self.db.begin().await?;
        let office_repo = OfficeRepository::new(&txn);
        let office = office_repo.update(validated.office).await?;
        if let Some(codes_insee) = validated.codes_insee {
            office_repo.replace_communes(office.id, &codes_insee).await?;
        }
        if let Some(user_ids) = validated.user_ids {
            office_repo.replace_users(office.id, &user_ids).await?;
        }
        txn.commit().await?;

        self.to_dto(office).await
    }

    async fn to_dto(&self, office: OfficeModel) -> Result<OfficeDto, Error> {
        let office_repo = OfficeRepository::new(self.db);
        let codes_insee = office_repo.codes_insee(office.id).await?;
        let user_ids = office_repo.user_ids(office.id).await?;

        Ok(OfficeDto {
            id: office.id,
            ddfip_id: office.ddfip_id,
            name: office.name,
            competences: json_strings(&office.competences),
            codes_insee,
            user_ids,
            discarded_at: office.discarded_at,
            created_at: office.created_at,
            updated_at: office.updated_at,
        })
    }

    async fn validate(
        &self,
        current: Option<OfficeModel>,
        form: OfficeForm,
        forced_ddfip_id: Option<Uuid>,
    ) -> Result<ValidatedOffice, Error> {
        let mut errors = ValidationErrors::new();

        let name = required(
            &mut errors,
            "name",
            form.name,
            current.as_ref().map(|o| o.name.as_str()),
        );

        // An office never moves to another DDFIP
        let ddfip_id = current
            .as_ref()
            .map(|o| o.ddfip_id)
            .or(forced_ddfip_id)
            .or(form.ddfip_id);
        let ddfip = match ddfip_id {
            Some(ddfip_id) => {
                let ddfip = DdfipRepository::new(self.db).find_kept(ddfip_id).await?;
                if ddfip.is_none() {
                    errors.add("ddfip_id", UNKNOWN);
                }
                ddfip
            }
            None => {
                errors.add("ddfip_id", BLANK);
                None
            }
        };

        let competences = form
            .competences
            .or_else(|| current.as_ref().map(|o| json_strings(&o.competences)))
            .unwrap_or_default();
        if competences.is_empty() {
            errors.add("competences", BLANK);
        } else if competences.iter().any(|c| FormType::from_str(c).is_err()) {
            errors.add("competences", INVALID);
        }

        let codes_insee = form.codes_insee.map(|codes| {
            let mut codes: Vec<String> = codes.into_iter().map(|c| c.trim().to_string()).collect();
            codes.sort();
            codes.dedup();
            codes
        });
        if let (Some(codes_insee), Some(ddfip)) = (&codes_insee, &ddfip) {
            let communes = CommuneRepository::new(self.db)
                .find_in_departement(&ddfip.code_departement, codes_insee)
                .await?;
            if communes.len() != codes_insee.len() {
                errors.add("codes_insee", INVALID);
            }
        }

        let user_ids = form.user_ids.map(|mut ids| {
            ids.sort();
            ids.dedup();
            ids
        });
        if let (Some(user_ids), Some(ddfip)) = (&user_ids, &ddfip) {
            let users = UserRepository::new(self.db)
                .find_kept_in_organization(OrganizationType::Ddfip.as_str(), ddfip.id, user_ids)
                .await?;
            if users.len() != user_ids.len() {
                errors.add("user_ids", INVALID);
            }
        }

        errors.into_result()?;

        let ddfip = ddfip.ok_or_else(|| {
            Error::InternalError("Validated office has no DDFIP".to_string())
        })?;

        let mut office = match current {
            Some(current) => current.into_active_model(),
            None => entity::office::ActiveModel {
                discarded_at: ActiveValue::Set(None),
                ..Default::default()
            },
        };
        office.ddfip_id = ActiveValue::Set(ddfip.id);
        office.name = ActiveValue::Set(name.unwrap_or_default());
        office.competences = ActiveValue::Set(serde_json::json!(competences));

        Ok(ValidatedOffice {
            office,
            codes_insee,
            user_ids,
        })
    }
}

struct ValidatedOffice {
    office: entity::office::ActiveModel,
    codes_insee: Option<Vec<String>>,
    user_ids: Option<Vec<Uuid>>,
}
