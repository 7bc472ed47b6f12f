use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::DgfipModel,
};

pub struct DgfipRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DgfipRepository<'a, C> {
    /// Creates a new instance of [`DgfipRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a DGFIP, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<DgfipModel>, DbErr> {
        entity::prelude::Dgfip::find_by_id(id).one(self.db).await
    }

    pub async fn find_kept(&self, id: Uuid) -> Result<Option<DgfipModel>, DbErr> {
        entity::prelude::Dgfip::find_by_id(id)
            .filter(entity::dgfip::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    /// Whether a kept DGFIP other than `except` exists
    pub async fn kept_exists(&self, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut select =
            entity::prelude::Dgfip::find().filter(entity::dgfip::Column::DiscardedAt.is_null());

        if let Some(id) = except {
            select = select.filter(entity::dgfip::Column::Id.ne(id));
        }

        Ok(select.count(self.db).await? > 0)
    }

    fn filtered(&self, query: &ListQuery) -> Select<entity::dgfip::Entity> {
        listing::filter(
            entity::prelude::Dgfip::find(),
            query,
            &[entity::dgfip::Column::Name],
        )
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<DgfipModel>, DbErr> {
        let select = listing::order(
            self.filtered(query),
            query,
            &[("name", entity::dgfip::Column::Name)],
            entity::dgfip::Column::Name,
        );

        listing::paginate(select, query, self.db).await
    }

    pub async fn ids(&self, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(self.filtered(query), entity::dgfip::Column::Id, self.db).await
    }

    pub async fn create(
        &self,
        mut dgfip: entity::dgfip::ActiveModel,
    ) -> Result<DgfipModel, DbErr> {
        let now = Utc::now().naive_utc();
        dgfip.id = ActiveValue::Set(Uuid::new_v4());
        dgfip.created_at = ActiveValue::Set(now);
        dgfip.updated_at = ActiveValue::Set(now);

        dgfip.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut dgfip: entity::dgfip::ActiveModel,
    ) -> Result<DgfipModel, DbErr> {
        dgfip.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        dgfip.update(self.db).await
    }
}
