use sea_orm::EntityTrait;

use crate::{
    constant::{TEST_CODE_DEPARTEMENT, TEST_CODE_INSEE, TEST_CODE_REGION, TEST_SIREN_EPCI},
    error::TestError,
    fixtures::factory,
    model::{CommuneModel, DepartementModel, EpciModel, RegionModel},
    TestContext,
};

impl TestContext {
    pub fn territory<'a>(&'a self) -> TerritoryFixtures<'a> {
        TerritoryFixtures { context: self }
    }
}

pub struct TerritoryFixtures<'a> {
    context: &'a TestContext,
}

/// Territories inserted by [`TerritoryFixtures::insert_test_territories`]
pub struct TestTerritories {
    pub region: RegionModel,
    pub departement: DepartementModel,
    pub epci: EpciModel,
    pub commune: CommuneModel,
}

impl<'a> TerritoryFixtures<'a> {
    pub async fn save_region(&self, model: RegionModel) -> Result<RegionModel, TestError> {
        Ok(
            entity::prelude::Region::insert(entity::region::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_departement(
        &self,
        model: DepartementModel,
    ) -> Result<DepartementModel, TestError> {
        Ok(
            entity::prelude::Departement::insert(entity::departement::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_epci(&self, model: EpciModel) -> Result<EpciModel, TestError> {
        Ok(
            entity::prelude::Epci::insert(entity::epci::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn save_commune(&self, model: CommuneModel) -> Result<CommuneModel, TestError> {
        Ok(
            entity::prelude::Commune::insert(entity::commune::ActiveModel::from(model))
                .exec_with_returning(&self.context.db)
                .await?,
        )
    }

    pub async fn insert_region(&self, code_region: &str) -> Result<RegionModel, TestError> {
        self.save_region(factory::region(code_region)).await
    }

    pub async fn insert_departement(
        &self,
        code_departement: &str,
        code_region: &str,
    ) -> Result<DepartementModel, TestError> {
        self.save_departement(factory::departement(code_departement, code_region))
            .await
    }

    pub async fn insert_epci(
        &self,
        siren: &str,
        code_departement: &str,
    ) -> Result<EpciModel, TestError> {
        self.save_epci(factory::epci(siren, Some(code_departement)))
            .await
    }

    pub async fn insert_commune(
        &self,
        code_insee: &str,
        code_departement: &str,
        siren_epci: Option<&str>,
    ) -> Result<CommuneModel, TestError> {
        self.save_commune(factory::commune(code_insee, code_departement, siren_epci))
            .await
    }

    /// Insert a region, one of its départements, an EPCI of that département and one of the
    /// EPCI's communes using the test codes from [`crate::constant`].
    pub async fn insert_test_territories(&self) -> Result<TestTerritories, TestError> {
        let region = self.insert_region(TEST_CODE_REGION).await?;
        let departement = self
            .insert_departement(TEST_CODE_DEPARTEMENT, TEST_CODE_REGION)
            .await?;
        let epci = self
            .insert_epci(TEST_SIREN_EPCI, TEST_CODE_DEPARTEMENT)
            .await?;
        let commune = self
            .insert_commune(TEST_CODE_INSEE, TEST_CODE_DEPARTEMENT, Some(TEST_SIREN_EPCI))
            .await?;

        Ok(TestTerritories {
            region,
            departement,
            epci,
            commune,
        })
    }
}
