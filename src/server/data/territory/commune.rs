use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
};
use uuid::Uuid;

use crate::server::{
    data::{
        listing::{self, ListQuery, Page},
        territory::{CommuneRow, Territory},
    },
    model::db::CommuneModel,
};

pub struct CommuneRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CommuneRepository<'a, C> {
    /// Creates a new instance of [`CommuneRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CommuneModel>, DbErr> {
        entity::prelude::Commune::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_code(&self, code_insee: &str) -> Result<Option<CommuneModel>, DbErr> {
        entity::prelude::Commune::find()
            .filter(entity::commune::Column::CodeInsee.eq(code_insee))
            .one(self.db)
            .await
    }

    /// Communes among `codes_insee` located in `code_departement`
    pub async fn find_in_departement(
        &self,
        code_departement: &str,
        codes_insee: &[String],
    ) -> Result<Vec<CommuneModel>, DbErr> {
        entity::prelude::Commune::find()
            .filter(entity::commune::Column::CodeDepartement.eq(code_departement))
            .filter(entity::commune::Column::CodeInsee.is_in(codes_insee.iter().cloned()))
            .all(self.db)
            .await
    }

    /// Finds the commune `code_insee` when it lies within `territory`
    pub async fn find_in_territory(
        &self,
        code_insee: &str,
        territory: &Territory,
    ) -> Result<Option<CommuneModel>, DbErr> {
        let select = entity::prelude::Commune::find()
            .filter(entity::commune::Column::CodeInsee.eq(code_insee));

        let select = match territory {
            Territory::Commune(commune) => {
                select.filter(entity::commune::Column::Id.eq(commune.id))
            }
            Territory::Epci(epci) => {
                select.filter(entity::commune::Column::SirenEpci.eq(epci.siren.as_str()))
            }
            Territory::Departement(departement) => select.filter(
                entity::commune::Column::CodeDepartement
                    .eq(departement.code_departement.as_str()),
            ),
            Territory::Region(region) => select.filter(
                entity::commune::Column::CodeDepartement.in_subquery(
                    entity::prelude::Departement::find()
                        .select_only()
                        .column(entity::departement::Column::CodeDepartement)
                        .filter(
                            entity::departement::Column::CodeRegion
                                .eq(region.code_region.as_str()),
                        )
                        .into_query(),
                ),
            ),
        };

        select.one(self.db).await
    }

    /// Lists communes matching the search on name & INSEE code
    pub async fn list(&self, query: &ListQuery) -> Result<Page<CommuneModel>, DbErr> {
        let select = listing::filter_search(
            entity::prelude::Commune::find(),
            query,
            &[
                entity::commune::Column::Name,
                entity::commune::Column::CodeInsee,
            ],
        );
        let select = listing::order(
            select,
            query,
            &[
                ("name", entity::commune::Column::Name),
                ("code", entity::commune::Column::CodeInsee),
                ("departement", entity::commune::Column::CodeDepartement),
                ("epci", entity::commune::Column::SirenEpci),
            ],
            entity::commune::Column::CodeInsee,
        );

        listing::paginate(select, query, self.db).await
    }

    /// First 50 communes matching the search, for autocomplete inputs
    pub async fn autocomplete(&self, query: &ListQuery) -> Result<Vec<CommuneModel>, DbErr> {
        listing::filter_search(
            entity::prelude::Commune::find(),
            query,
            &[
                entity::commune::Column::Name,
                entity::commune::Column::CodeInsee,
            ],
        )
        .order_by_asc(entity::commune::Column::Name)
        .limit(50)
        .all(self.db)
        .await
    }

    pub async fn update_name(
        &self,
        commune: CommuneModel,
        name: String,
    ) -> Result<CommuneModel, DbErr> {
        let mut commune_am = commune.into_active_model();
        commune_am.name = ActiveValue::Set(name);
        commune_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        commune_am.update(self.db).await
    }

    /// Inserts or updates communes by INSEE code, returning the number of rows written
    pub async fn upsert_many(&self, rows: Vec<CommuneRow>) -> Result<u64, DbErr> {
        if rows.is_empty() {
            return Ok(0);
        }

        let count = rows.len() as u64;
        let now = Utc::now().naive_utc();
        let communes = rows.into_iter().map(|row| entity::commune::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            code_insee: ActiveValue::Set(row.code_insee),
            name: ActiveValue::Set(row.name),
            code_departement: ActiveValue::Set(row.code_departement),
            siren_epci: ActiveValue::Set(row.siren_epci),
            code_arrondissement: ActiveValue::Set(row.code_arrondissement),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        });

        entity::prelude::Commune::insert_many(communes)
            .on_conflict(
                OnConflict::column(entity::commune::Column::CodeInsee)
                    .update_columns([
                        entity::commune::Column::Name,
                        entity::commune::Column::CodeDepartement,
                        entity::commune::Column::SirenEpci,
                        entity::commune::Column::CodeArrondissement,
                        entity::commune::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(count)
    }
}
