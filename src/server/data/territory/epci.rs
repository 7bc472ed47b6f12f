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
        territory::EpciRow,
    },
    model::db::EpciModel,
};

pub struct EpciRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EpciRepository<'a, C> {
    /// Creates a new instance of [`EpciRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EpciModel>, DbErr> {
        entity::prelude::Epci::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_siren(&self, siren: &str) -> Result<Option<EpciModel>, DbErr> {
        entity::prelude::Epci::find()
            .filter(entity::epci::Column::Siren.eq(siren))
            .one(self.db)
            .await
    }

    /// Lists EPCIs matching the search on name & SIREN
    pub async fn list(&self, query: &ListQuery) -> Result<Page<EpciModel>, DbErr> {
        let select = listing::filter_search(
            entity::prelude::Epci::find(),
            query,
            &[entity::epci::Column::Name, entity::epci::Column::Siren],
        );
        let select = listing::order(
            select,
            query,
            &[
                ("name", entity::epci::Column::Name),
                ("siren", entity::epci::Column::Siren),
                ("departement", entity::epci::Column::CodeDepartement),
            ],
            entity::epci::Column::Name,
        );

        listing::paginate(select, query, self.db).await
    }

    /// First 50 EPCIs matching the search, for autocomplete inputs
    pub async fn autocomplete(&self, query: &ListQuery) -> Result<Vec<EpciModel>, DbErr> {
        listing::filter_search(
            entity::prelude::Epci::find(),
            query,
            &[entity::epci::Column::Name, entity::epci::Column::Siren],
        )
        .order_by_asc(entity::epci::Column::Name)
        .limit(50)
        .all(self.db)
        .await
    }

    pub async fn update_name(&self, epci: EpciModel, name: String) -> Result<EpciModel, DbErr> {
        let mut epci_am = epci.into_active_model();
        epci_am.name = ActiveValue::Set(name);
        epci_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        epci_am.update(self.db).await
    }

    /// Inserts or updates EPCIs by SIREN, returning the number of rows written
    pub async fn upsert_many(&self, rows: Vec<EpciRow>) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len() as u64;
        let now = Utc::now().naive_utc();
        let epcis = rows.into_iter().map(|row| entity::epci::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            siren: ActiveValue::Set(row.siren),
            name: ActiveValue::Set(row.name),
            nature: ActiveValue::Set(row.nature),
            code_departement: ActiveValue::Set(row.code_departement),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        });

        entity::prelude::Epci::insert_many(epcis)
            .on_conflict(
                OnConflict::column(entity::epci::Column::Siren)
                    .update_columns([
                        entity::epci::Column::Name,
                        entity::epci::Column::Nature,
                        entity::epci::Column::CodeDepartement,
                        entity::epci::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(count)
    }
}
