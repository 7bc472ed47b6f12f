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
        territory::DepartementRow,
    },
    model::db::DepartementModel,
};

pub struct DepartementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DepartementRepository<'a, C> {
    /// Creates a new instance of [`DepartementRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DepartementModel>, DbErr> {
        entity::prelude::Departement::find_by_id(id)
            .one(self.db)
            .await
    }

    pub async fn find_by_code(
        &self,
        code_departement: &str,
    ) -> Result<Option<DepartementModel>, DbErr> {
        entity::prelude::Departement::find()
            .filter(entity::departement::Column::CodeDepartement.eq(code_departement))
            .one(self.db)
            .await
    }

    /// Lists départements matching the search on name & code
    pub async fn list(&self, query: &ListQuery) -> Result<Page<DepartementModel>, DbErr> {
        let select = listing::filter_search(
            entity::prelude::Departement::find(),
            query,
            &[
                entity::departement::Column::Name,
                entity::departement::Column::CodeDepartement,
            ],
        );
        let select = listing::order(
            select,
            query,
            &[
                ("name", entity::departement::Column::Name),
                ("code", entity::departement::Column::CodeDepartement),
                ("region", entity::departement::Column::CodeRegion),
            ],
            entity::departement::Column::CodeDepartement,
        );

        listing::paginate(select, query, self.db).await
    }

    /// First 50 départements matching the search, for autocomplete inputs
    pub async fn autocomplete(&self, query: &ListQuery) -> Result<Vec<DepartementModel>, DbErr> {
        listing::filter_search(
            entity::prelude::Departement::find(),
            query,
            &[
                entity::departement::Column::Name,
                entity::departement::Column::CodeDepartement,
            ],
        )
        .order_by_asc(entity::departement::Column::CodeDepartement)
        .limit(50)
        .all(self.db)
        .await
    }

    pub async fn update_name(
        &self,
        departement: DepartementModel,
        name: String,
    ) -> Result<DepartementModel, DbErr> {
        let mut departement_am = departement.into_active_model();
        departement_am.name = ActiveValue::Set(name);
        departement_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        departement_am.update(self.db).await
    }

    /// Inserts or updates départements by code, returning the number of rows written
    pub async fn upsert_many(&self, rows: Vec<DepartementRow>) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len() as u64;
        let now = Utc::now().naive_utc();
        let departements = rows
            .into_iter()
            .map(|row| entity::departement::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                code_departement: ActiveValue::Set(row.code_departement),
                code_region: ActiveValue::Set(row.code_region),
                name: ActiveValue::Set(row.name),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            });

        entity::prelude::Departement::insert_many(departements)
            .on_conflict(
                OnConflict::column(entity::departement::Column::CodeDepartement)
                    .update_columns([
                        entity::departement::Column::CodeRegion,
                        entity::departement::Column::Name,
                        entity::departement::Column::UpdatedAt,
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

    mod list {
        use passerelle_test_utils::prelude::*;

        use crate::server::data::{
            listing::ListQuery, territory::departement::DepartementRepository,
        };

        /// Expect search to match the département code
        #[tokio::test]
        async fn searches_by_code() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            test.territory().insert_departement("64", "75").await?;
            test.territory().insert_departement("40", "75").await?;

            let departement_repo = DepartementRepository::new(&test.db);
            let page = departement_repo
                .list(&ListQuery {
                    search: Some("64".to_string()),
                    ..Default::default()
                })
                .await?;

            assert_eq!(page.total, 1);
            assert_eq!(page.records[0].code_departement, "64");

            Ok(())
        }
    }
}
