use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::server::{
    data::{
        listing::{self, ListQuery, Page},
        territory::RegionRow,
    },
    model::db::RegionModel,
};

pub struct RegionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RegionRepository<'a, C> {
    /// Creates a new instance of [`RegionRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<RegionModel>, DbErr> {
        entity::prelude::Region::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_code(&self, code_region: &str) -> Result<Option<RegionModel>, DbErr> {
        entity::prelude::Region::find()
            .filter(entity::region::Column::CodeRegion.eq(code_region))
            .one(self.db)
            .await
    }

    /// Lists regions matching the search on name & code
    pub async fn list(&self, query: &ListQuery) -> Result<Page<RegionModel>, DbErr> {
        let select = listing::filter_search(
            entity::prelude::Region::find(),
            query,
            &[
                entity::region::Column::Name,
                entity::region::Column::CodeRegion,
            ],
        );
        let select = listing::order(
            select,
            query,
            &[
                ("name", entity::region::Column::Name),
                ("code", entity::region::Column::CodeRegion),
            ],
            entity::region::Column::CodeRegion,
        );

        listing::paginate(select, query, self.db).await
    }

    /// First 50 regions matching the search, for autocomplete inputs
    pub async fn autocomplete(&self, query: &ListQuery) -> Result<Vec<RegionModel>, DbErr> {
        listing::filter_search(
            entity::prelude::Region::find(),
            query,
            &[
                entity::region::Column::Name,
                entity::region::Column::CodeRegion,
            ],
        )
        .order_by_asc(entity::region::Column::Name)
        .limit(50)
        .all(self.db)
        .await
    }

    pub async fn update_name(&self, region: RegionModel, name: String) -> Result<RegionModel, DbErr> {
        let mut region_am = region.into_active_model();
        region_am.name = ActiveValue::Set(name);
        region_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        region_am.update(self.db).await
    }

    /// Inserts or updates regions by code, returning the number of rows written
    pub async fn upsert_many(&self, rows: Vec<RegionRow>) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len() as u64;
        let now = Utc::now().naive_utc();
        let regions = rows.into_iter().map(|row| entity::region::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            code_region: ActiveValue::Set(row.code_region),
            name: ActiveValue::Set(row.name),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        });

        entity::prelude::Region::insert_many(regions)
            .on_conflict(
                OnConflict::column(entity::region::Column::CodeRegion)
                    .update_columns([
                        entity::region::Column::Name,
                        entity::region::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {

    mod upsert_many {
        use passerelle_test_utils::prelude::*;

        use crate::server::data::territory::{region::RegionRepository, RegionRow};

        /// Expect existing regions to be renamed instead of duplicated
        #[tokio::test]
        async fn updates_existing_codes() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let existing = test.territory().insert_region("75").await?;

            let region_repo = RegionRepository::new(&test.db);
            region_repo
                .upsert_many(vec![
                    RegionRow {
                        code_region: "75".to_string(),
                        name: "Nouvelle-Aquitaine".to_string(),
                    },
                    RegionRow {
                        code_region: "76".to_string(),
                        name: "Occitanie".to_string(),
                    },
                ])
                .await?;

            let updated = region_repo.find_by_code("75").await?.unwrap();
            assert_eq!(updated.id, existing.id);
            assert_eq!(updated.name, "Nouvelle-Aquitaine");
            assert!(region_repo.find_by_code("76").await?.is_some());

            Ok(())
        }
    }
}
