use chrono::Utc;
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    error::TestError,
    fixtures::factory,
    model::{PackageModel, ReportModel, TransmissionModel},
    TestContext,
};

impl TestContext {
    pub fn report<'a>(&'a self) -> ReportFixtures<'a> {
        ReportFixtures { context: self }
    }
}

pub struct ReportFixtures<'a> {
    context: &'a TestContext,
}

impl<'a> ReportFixtures<'a> {
    pub async fn save_report(&self, model: ReportModel) -> Result<ReportModel, TestError> {
        Ok(
            entity::prelude::Report::insert(entity::report::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_transmission(
        &self,
        model: TransmissionModel,
    ) -> Result<TransmissionModel, TestError> {
        Ok(
            entity::prelude::Transmission::insert(entity::transmission::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_package(&self, model: PackageModel) -> Result<PackageModel, TestError> {
        Ok(
            entity::prelude::Package::insert(entity::package::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    /// Insert an empty draft report.
    pub async fn insert_report(
        &self,
        collectivity_id: Uuid,
        form_type: &str,
    ) -> Result<ReportModel, TestError> {
        self.save_report(factory::report(collectivity_id, form_type))
            .await
    }

    /// Insert a filled in, completed report located in `code_insee`.
    pub async fn insert_completed_report(
        &self,
        collectivity_id: Uuid,
        code_insee: &str,
    ) -> Result<ReportModel, TestError> {
        let model = ReportModel {
            completed_at: Some(Utc::now().naive_utc()),
            ..factory::complete_report(collectivity_id, code_insee)
        };

        self.save_report(model).await
    }

    /// Insert an in-progress web transmission.
    pub async fn insert_transmission(
        &self,
        collectivity_id: Uuid,
        user_id: Option<Uuid>,
    ) -> Result<TransmissionModel, TestError> {
        self.save_transmission(factory::transmission(collectivity_id, user_id))
            .await
    }

    /// Insert a completed transmission with one package holding one transmitted report.
    ///
    /// # Returns
    /// - `(transmission, package, report)`
    pub async fn insert_transmitted_report(
        &self,
        collectivity_id: Uuid,
        ddfip_id: Uuid,
        code_insee: &str,
        reference: &str,
    ) -> Result<(TransmissionModel, PackageModel, ReportModel), TestError> {
        let now = Utc::now().naive_utc();

        let transmission = self
            .save_transmission(TransmissionModel {
                completed_at: Some(now),
                ..factory::transmission(collectivity_id, None)
            })
            .await?;

        let package = self
            .save_package(factory::package(
                reference,
                "evaluation_local_habitation",
                collectivity_id,
                ddfip_id,
                transmission.id,
            ))
            .await?;

        let report = self
            .save_report(ReportModel {
                transmission_id: Some(transmission.id),
                package_id: Some(package.id),
                reference: Some(format!("{}-00001", reference)),
                completed_at: Some(now),
                ..factory::complete_report(collectivity_id, code_insee)
            })
            .await?;

        Ok((transmission, package, report))
    }
}
