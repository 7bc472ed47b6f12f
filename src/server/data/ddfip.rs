use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::DdfipModel,
};

pub struct DdfipRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DdfipRepository<'a, C> {
    /// Creates a new instance of [`DdfipRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a DDFIP, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<DdfipModel>, DbErr> {
        entity::prelude::Ddfip::find_by_id(id).one(self.db).await
    }

    pub async fn find_kept(&self, id: Uuid) -> Result<Option<DdfipModel>, DbErr> {
        entity::prelude::Ddfip::find_by_id(id)
            .filter(entity::ddfip::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    /// Oldest kept DDFIP of a département, the one receiving its packages
    pub async fn find_kept_by_departement(
        &self,
        code_departement: &str,
    ) -> Result<Option<DdfipModel>, DbErr> {
        entity::prelude::Ddfip::find()
            .filter(entity::ddfip::Column::CodeDepartement.eq(code_departement))
            .filter(entity::ddfip::Column::DiscardedAt.is_null())
            .order_by_asc(entity::ddfip::Column::CreatedAt)
            .one(self.db)
            .await
    }

    fn filtered(&self, query: &ListQuery) -> Select<entity::ddfip::Entity> {
        listing::filter(
            entity::prelude::Ddfip::find(),
            query,
            &[
                entity::ddfip::Column::Name,
                entity::ddfip::Column::CodeDepartement,
            ],
        )
    }

    /// Lists DDFIPs matching the search on name & département code
    pub async fn list(&self, query: &ListQuery) -> Result<Page<DdfipModel>, DbErr> {
        let select = listing::order(
            self.filtered(query),
            query,
            &[
                ("name", entity::ddfip::Column::Name),
                ("departement", entity::ddfip::Column::CodeDepartement),
            ],
            entity::ddfip::Column::CodeDepartement,
        );

        listing::paginate(select, query, self.db).await
    }

    /// IDs of every DDFIP matching the search
    pub async fn ids(&self, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(self.filtered(query), entity::ddfip::Column::Id, self.db).await
    }

    pub async fn create(
        &self,
        mut ddfip: entity::ddfip::ActiveModel,
    ) -> Result<DdfipModel, DbErr> {
        let now = Utc::now().naive_utc();
        ddfip.id = ActiveValue::Set(Uuid::new_v4());
        ddfip.created_at = ActiveValue::Set(now);
        ddfip.updated_at = ActiveValue::Set(now);

        ddfip.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut ddfip: entity::ddfip::ActiveModel,
    ) -> Result<DdfipModel, DbErr> {
        ddfip.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        ddfip.update(self.db).await
    }
}
