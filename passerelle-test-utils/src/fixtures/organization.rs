use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    error::TestError,
    fixtures::factory,
    model::{
        CollectivityModel, CommuneModel, DdfipModel, DgfipModel, OfficeModel, PublisherModel,
    },
    TestContext,
};

impl TestContext {
    pub fn organization<'a>(&'a self) -> OrganizationFixtures<'a> {
        OrganizationFixtures { context: self }
    }
}

pub struct OrganizationFixtures<'a> {
    context: &'a TestContext,
}

impl<'a> OrganizationFixtures<'a> {
    pub async fn save_publisher(&self, model: PublisherModel) -> Result<PublisherModel, TestError> {
        Ok(
            entity::prelude::Publisher::insert(entity::publisher::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_collectivity(
        &self,
        model: CollectivityModel,
    ) -> Result<CollectivityModel, TestError> {
        Ok(
            entity::prelude::Collectivity::insert(entity::collectivity::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_ddfip(&self, model: DdfipModel) -> Result<DdfipModel, TestError> {
        Ok(
            entity::prelude::Ddfip::insert(entity::ddfip::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_dgfip(&self, model: DgfipModel) -> Result<DgfipModel, TestError> {
        Ok(
            entity::prelude::Dgfip::insert(entity::dgfip::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_office(&self, model: OfficeModel) -> Result<OfficeModel, TestError> {
        Ok(
            entity::prelude::Office::insert(entity::office::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn insert_publisher(&self, siren: &str) -> Result<PublisherModel, TestError> {
        self.save_publisher(factory::publisher(siren)).await
    }

    /// Insert a collectivity whose territory is `commune`.
    pub async fn insert_commune_collectivity(
        &self,
        commune: &CommuneModel,
        siren: &str,
        publisher_id: Option<Uuid>,
    ) -> Result<CollectivityModel, TestError> {
        self.save_collectivity(factory::collectivity(
            "Commune",
            commune.id,
            siren,
            publisher_id,
        ))
        .await
    }

    pub async fn insert_ddfip(&self, code_departement: &str) -> Result<DdfipModel, TestError> {
        self.save_ddfip(factory::ddfip(code_departement)).await
    }

    pub async fn insert_dgfip(&self) -> Result<DgfipModel, TestError> {
        self.save_dgfip(factory::dgfip()).await
    }

    pub async fn insert_office(
        &self,
        ddfip_id: Uuid,
        competences: &[&str],
    ) -> Result<OfficeModel, TestError> {
        self.save_office(factory::office(ddfip_id, competences))
            .await
    }

    /// Attach `code_insee` to the office's communes.
    pub async fn add_commune_to_office(
        &self,
        office_id: Uuid,
        code_insee: &str,
    ) -> Result<entity::office_commune::Model, TestError> {
        Ok(
            entity::prelude::OfficeCommune::insert(entity::office_commune::ActiveModel {
                id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
                office_id: sea_orm::ActiveValue::Set(office_id),
                code_insee: sea_orm::ActiveValue::Set(code_insee.to_string()),
                created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
            })
            .exec_with_returning(&self.context.db)
            .await?,
        )
    }
}
