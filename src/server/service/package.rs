use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::package::PackageDto,
    server::{
        data::{
            discard::DiscardRepository,
            listing::{ListQuery, Page},
            office::OfficeRepository,
            package::{PackageRepository, PackageScope},
            report::ReportRepository,
        },
        error::{workflow::WorkflowError, Error},
        model::{db::PackageModel, report::PackageStatus},
        service::{found, kept},
    },
};

fn dto(package: PackageModel) -> PackageDto {
    let status = PackageStatus::of(&package);
    PackageDto::new(package, status.as_str())
}

pub struct PackageService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PackageService<'a> {
    /// Creates a new instance of [`PackageService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        scope: &PackageScope,
        query: &ListQuery,
    ) -> Result<Page<PackageDto>, Error> {
        Ok(PackageRepository::new(self.db)
            .list(scope, query)
            .await?
            .map(dto))
    }

    pub async fn ids(&self, scope: &PackageScope, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(PackageRepository::new(self.db).ids(scope, query).await?)
    }

    /// Finds a package in any state, 404 when missing
    pub async fn find(&self, id: Uuid) -> Result<PackageModel, Error> {
        found(PackageRepository::new(self.db).find(id).await?, "package", id)
    }

    /// Whether the package belongs to `scope`
    pub async fn is_visible(&self, scope: &PackageScope, id: Uuid) -> Result<bool, Error> {
        Ok(PackageRepository::new(self.db)
            .find_in_scope(scope, id)
            .await?
            .is_some())
    }

    pub fn dto(&self, package: PackageModel) -> PackageDto {
        dto(package)
    }

    /// Acknowledges reception of a package, acknowledging twice keeps the first date
    pub async fn acknowledge(&self, id: Uuid) -> Result<PackageDto, Error> {
        let package = self.get(id).await?;
        if package.acknowledged_at.is_some() {
            return Ok(dto(package));
        }

        let mut package_am = package.into_active_model();
        package_am.acknowledged_at = ActiveValue::Set(Some(Utc::now().naive_utc()));

        Ok(dto(PackageRepository::new(self.db).update(package_am).await?))
    }

    /// Assigns a package to a kept office of its DDFIP
    ///
    /// Assigning also acknowledges the package when needed and lifts a previous rejection.
    pub async fn assign(&self, id: Uuid, office_id: Uuid) -> Result<PackageDto, Error> {
        let package = self.get(id).await?;

        let office = OfficeRepository::new(self.db)
            .find_kept_in_ddfip(package.ddfip_id, &[office_id])
            .await?
            .into_iter()
            .next()
            .ok_or(WorkflowError::OfficeOutsideDdfip)?;

        let now = Utc::now().naive_utc();
        let acknowledged_at = package.acknowledged_at.unwrap_or(now);

        let mut package_am = package.into_active_model();
        package_am.office_id = ActiveValue::Set(Some(office.id));
        package_am.assigned_at = ActiveValue::Set(Some(now));
        package_am.acknowledged_at = ActiveValue::Set(Some(acknowledged_at));
        package_am.rejected_at = ActiveValue::Set(None);

        let package = PackageRepository::new(self.db).update(package_am).await?;

        tracing::debug!(
            package_id = %package.id,
            office_id = %office.id,
            "assigned package"
        );

        Ok(dto(package))
    }

    /// Rejects a package as a whole, refused once it is assigned
    pub async fn reject(&self, id: Uuid) -> Result<PackageDto, Error> {
        let package = self.get(id).await?;
        if package.assigned_at.is_some() {
            return Err(WorkflowError::PackageAssigned.into());
        }

        let now = Utc::now().naive_utc();
        let acknowledged_at = package.acknowledged_at.unwrap_or(now);

        let mut package_am = package.into_active_model();
        package_am.rejected_at = ActiveValue::Set(Some(now));
        package_am.acknowledged_at = ActiveValue::Set(Some(acknowledged_at));

        Ok(dto(PackageRepository::new(self.db).update(package_am).await?))
    }

    /// Clears the assignment and the rejection of a package whose reports are undecided
    pub async fn reset(&self, id: Uuid) -> Result<PackageDto, Error> {
        let package = self.get(id).await?;

        if ReportRepository::new(self.db)
            .count_decided_in_package(package.id)
            .await?
            > 0
        {
            return Err(WorkflowError::PackageDecided.into());
        }

        let mut package_am = package.into_active_model();
        package_am.office_id = ActiveValue::Set(None);
        package_am.assigned_at = ActiveValue::Set(None);
        package_am.rejected_at = ActiveValue::Set(None);

        Ok(dto(PackageRepository::new(self.db).update(package_am).await?))
    }

    /// Withdraws a package the DDFIP did not acknowledge yet
    ///
    /// Its reports stay attached to it and can't be edited or transmitted again until the
    /// package is undiscarded, which is the only way to get them back.
    pub async fn discard(&self, id: Uuid) -> Result<bool, Error> {
        self.unacknowledged(id).await?;

        Ok(DiscardRepository::new(self.db)
            .discard::<entity::package::Entity>(id)
            .await?)
    }

    pub async fn undiscard(&self, id: Uuid) -> Result<bool, Error> {
        self.unacknowledged(id).await?;

        Ok(DiscardRepository::new(self.db)
            .undiscard::<entity::package::Entity>(id)
            .await?)
    }

    /// Kept package, 404 when missing and 410 when discarded
    pub async fn get(&self, id: Uuid) -> Result<PackageModel, Error> {
        kept(PackageRepository::new(self.db).find(id).await?, "package", id)
    }

    async fn unacknowledged(&self, id: Uuid) -> Result<PackageModel, Error> {
        let package = self.find(id).await?;
        if package.acknowledged_at.is_some() {
            return Err(WorkflowError::PackageAcknowledged.into());
        }

        Ok(package)
    }
}

#[cfg(test)]
mod tests {

    mod workflow {
        use passerelle_test_utils::prelude::*;
        use sea_orm::EntityTrait;

        use crate::server::{
            error::{record::RecordError, workflow::WorkflowError, Error},
            service::package::PackageService,
        };

        /// Expect acknowledging twice to keep the first date
        #[tokio::test]
        async fn acknowledges_once() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let (_, package, _) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;

            let package_service = PackageService::new(&test.db);
            let first = package_service.acknowledge(package.id).await.unwrap();
            let second = package_service.acknowledge(package.id).await.unwrap();

            assert_eq!(first.status, "acknowledged");
            assert_eq!(first.acknowledged_at, second.acknowledged_at);

            Ok(())
        }

        /// Expect assignment to an office of the DDFIP only, then rejection to be refused
        #[tokio::test]
        async fn assigns_to_office_of_ddfip() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let other_ddfip = test.organization().insert_ddfip("33").await?;
            let office = test
                .organization()
                .insert_office(ddfip.id, &["evaluation_local_habitation"])
                .await?;
            let foreign_office = test
                .organization()
                .insert_office(other_ddfip.id, &["evaluation_local_habitation"])
                .await?;
            let (_, package, _) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;

            let package_service = PackageService::new(&test.db);
            let foreign = package_service.assign(package.id, foreign_office.id).await;
            assert!(matches!(
                foreign,
                Err(Error::WorkflowError(WorkflowError::OfficeOutsideDdfip))
            ));

            let assigned = package_service.assign(package.id, office.id).await.unwrap();
            assert_eq!(assigned.status, "assigned");
            assert_eq!(assigned.office_id, Some(office.id));
            assert!(assigned.acknowledged_at.is_some());

            let rejected = package_service.reject(package.id).await;
            assert!(matches!(
                rejected,
                Err(Error::WorkflowError(WorkflowError::PackageAssigned))
            ));

            let reset = package_service.reset(package.id).await.unwrap();
            assert_eq!(reset.status, "acknowledged");
            assert!(reset.office_id.is_none());

            Ok(())
        }

        /// Expect the collectivity to withdraw a package until it is acknowledged
        #[tokio::test]
        async fn discards_before_acknowledgement() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let (_, first, _) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;
            let (_, second, _) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0002")
                .await?;

            let package_service = PackageService::new(&test.db);
            assert!(package_service.discard(first.id).await.unwrap());
            assert!(matches!(
                package_service.acknowledge(first.id).await,
                Err(Error::RecordError(RecordError::Discarded { .. }))
            ));
            assert!(package_service.undiscard(first.id).await.unwrap());

            package_service.acknowledge(second.id).await.unwrap();
            assert!(matches!(
                package_service.discard(second.id).await,
                Err(Error::WorkflowError(WorkflowError::PackageAcknowledged))
            ));

            Ok(())
        }
    
        /// Expect a withdrawn package to keep its reports until it is restored
        #[tokio::test]
        async fn keeps_reports_while_withdrawn() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let (_, package, report) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;

            let package_service = PackageService::new(&test.db);
            assert!(package_service.discard(package.id).await.unwrap());
            let withdrawn = entity::prelude::Report::find_by_id(report.id)
                .one(&test.db)
                .await?
                .unwrap();
            assert_eq!(withdrawn.package_id, Some(package.id));

            assert!(package_service.undiscard(package.id).await.unwrap());
            let restored = package_service.acknowledge(package.id).await.unwrap();
            assert_eq!(restored.status, "acknowledged");

            Ok(())
        }
    }
}
