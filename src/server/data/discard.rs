//! Soft delete ("discard") support shared by every discardable table.
//!
//! A record is kept while `discarded_at` is null. Discarding sets it, undiscarding clears
//! it; both are idempotent and the bulk variants return the IDs they actually changed so
//! the undo notice can target exactly those records.

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use uuid::Uuid;

/// Entities carrying a `discarded_at` column.
pub trait DiscardableEntity: EntityTrait {
    /// Name used in record errors, e.g. `publisher`
    const RESOURCE: &'static str;

    fn id_column() -> Self::Column;

    fn discarded_at_column() -> Self::Column;

    fn updated_at_column() -> Self::Column;
}

/// Records carrying a `discarded_at` column.
pub trait DiscardableModel {
    fn is_discarded(&self) -> bool;
}

macro_rules! discardable {
    ($module:ident, $resource:literal) => {
        impl DiscardableModel for entity::$module::Model {
            fn is_discarded(&self) -> bool {
                self.discarded_at.is_some()
            }
        }

        impl DiscardableEntity for entity::$module::Entity {
            const RESOURCE: &'static str = $resource;

            fn id_column() -> Self::Column {
                entity::$module::Column::Id
            }

            fn discarded_at_column() -> Self::Column {
                entity::$module::Column::DiscardedAt
            }

            fn updated_at_column() -> Self::Column {
                entity::$module::Column::UpdatedAt
            }
        }
    };
}

discardable!(publisher, "publisher");
discardable!(collectivity, "collectivity");
discardable!(ddfip, "ddfip");
discardable!(dgfip, "dgfip");
discardable!(office, "office");
discardable!(user, "user");
discardable!(report, "report");
discardable!(package, "package");
discardable!(oauth_application, "oauth_application");

pub struct DiscardRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> DiscardRepository<'a, C> {
    /// Creates a new instance of [`DiscardRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Discards a kept record
    ///
    /// Returns `true` when the record was kept and is now discarded.
    pub async fn discard<E>(&self, id: Uuid) -> Result<bool, DbErr>
    where
        E: DiscardableEntity,
    {
        Ok(!self.discard_many::<E>(&[id]).await?.is_empty())
    }

    /// Restores a discarded record
    ///
    /// Returns `true` when the record was discarded and is now kept.
    pub async fn undiscard<E>(&self, id: Uuid) -> Result<bool, DbErr>
    where
        E: DiscardableEntity,
    {
        Ok(!self.undiscard_many::<E>(&[id]).await?.is_empty())
    }

    /// Discards every kept record among `ids`, returning the IDs that changed
    pub async fn discard_many<E>(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr>
    where
        E: DiscardableEntity,
    {
        let now = Utc::now().naive_utc();

        self.set_discarded_at::<E>(ids, true, Some(now)).await
    }

    /// Restores every discarded record among `ids`, returning the IDs that changed
    pub async fn undiscard_many<E>(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr>
    where
        E: DiscardableEntity,
    {
        self.set_discarded_at::<E>(ids, false, None).await
    }

    async fn set_discarded_at<E>(
        &self,
        ids: &[Uuid],
        kept: bool,
        discarded_at: Option<NaiveDateTime>,
    ) -> Result<Vec<Uuid>, DbErr>
    where
        E: DiscardableEntity,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let state = if kept {
            E::discarded_at_column().is_null()
        } else {
            E::discarded_at_column().is_not_null()
        };

        let changed: Vec<Uuid> = E::find()
            .select_only()
            .column(E::id_column())
            .filter(E::id_column().is_in(ids.iter().copied()))
            .filter(state)
            .into_tuple()
            .all(self.db)
            .await?;

        if changed.is_empty() {
            return Ok(changed);
        }

        E::update_many()
            .col_expr(E::discarded_at_column(), Expr::value(discarded_at))
            .col_expr(
                E::updated_at_column(),
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(E::id_column().is_in(changed.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(changed)
    }
}
