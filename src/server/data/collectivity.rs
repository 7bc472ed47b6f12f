use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::CollectivityModel,
};

/// Collectivities visible to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum CollectivityScope {
    All,
    /// Collectivities managed by a publisher
    Publisher(Uuid),
}

impl CollectivityScope {
    pub fn covers(&self, collectivity: &CollectivityModel) -> bool {
        match self {
            Self::All => true,
            Self::Publisher(publisher_id) => collectivity.publisher_id == Some(*publisher_id),
        }
    }

    /// Publisher forced on collectivities created within this scope
    pub fn publisher_id(&self) -> Option<Uuid> {
        match self {
            Self::All => None,
            Self::Publisher(publisher_id) => Some(*publisher_id),
        }
    }
}

pub struct CollectivityRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CollectivityRepository<'a, C> {
    /// Creates a new instance of [`CollectivityRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a collectivity, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<CollectivityModel>, DbErr> {
        entity::prelude::Collectivity::find_by_id(id)
            .one(self.db)
            .await
    }

    pub async fn find_kept(&self, id: Uuid) -> Result<Option<CollectivityModel>, DbErr> {
        entity::prelude::Collectivity::find_by_id(id)
            .filter(entity::collectivity::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    /// Whether a kept collectivity other than `except` already uses `siren`
    pub async fn siren_taken(&self, siren: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut select = entity::prelude::Collectivity::find()
            .filter(entity::collectivity::Column::Siren.eq(siren))
            .filter(entity::collectivity::Column::DiscardedAt.is_null());

        if let Some(id) = except {
            select = select.filter(entity::collectivity::Column::Id.ne(id));
        }

        Ok(select.count(self.db).await? > 0)
    }

    fn filtered(
        &self,
        scope: &CollectivityScope,
        query: &ListQuery,
    ) -> Select<entity::collectivity::Entity> {
        let select = match scope {
            CollectivityScope::All => entity::prelude::Collectivity::find(),
            CollectivityScope::Publisher(publisher_id) => entity::prelude::Collectivity::find()
                .filter(entity::collectivity::Column::PublisherId.eq(*publisher_id)),
        };

        listing::filter(
            select,
            query,
            &[
                entity::collectivity::Column::Name,
                entity::collectivity::Column::Siren,
            ],
        )
    }

    /// Lists collectivities in scope matching the search on name & SIREN
    pub async fn list(
        &self,
        scope: &CollectivityScope,
        query: &ListQuery,
    ) -> Result<Page<CollectivityModel>, DbErr> {
        let select = listing::order(
            self.filtered(scope, query),
            query,
            &[
                ("name", entity::collectivity::Column::Name),
                ("siren", entity::collectivity::Column::Siren),
                ("publisher", entity::collectivity::Column::PublisherId),
                ("created_at", entity::collectivity::Column::CreatedAt),
            ],
            entity::collectivity::Column::Name,
        );

        listing::paginate(select, query, self.db).await
    }

    /// IDs of every collectivity in scope matching the search
    pub async fn ids(&self, scope: &CollectivityScope, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(
            self.filtered(scope, query),
            entity::collectivity::Column::Id,
            self.db,
        )
        .await
    }

    pub async fn create(
        &self,
        mut collectivity: entity::collectivity::ActiveModel,
    ) -> Result<CollectivityModel, DbErr> {
        let now = Utc::now().naive_utc();
        collectivity.id = ActiveValue::Set(Uuid::new_v4());
        collectivity.created_at = ActiveValue::Set(now);
        collectivity.updated_at = ActiveValue::Set(now);

        collectivity.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut collectivity: entity::collectivity::ActiveModel,
    ) -> Result<CollectivityModel, DbErr> {
        collectivity.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        collectivity.update(self.db).await
    }
}

#[cfg(test)]
mod tests {

    mod list {
        use passerelle_test_utils::prelude::*;

        use crate::server::data::{
            collectivity::{CollectivityRepository, CollectivityScope},
            listing::ListQuery,
        };

        /// Expect a publisher scope to only list the publisher's collectivities
        #[tokio::test]
        async fn restricts_to_publisher() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            test.organization()
                .insert_commune_collectivity(&territories.commune, "216401024", Some(publisher.id))
                .await?;
            test.organization()
                .insert_commune_collectivity(&territories.commune, "216400257", None)
                .await?;

            let collectivity_repo = CollectivityRepository::new(&test.db);
            let all = collectivity_repo
                .list(&CollectivityScope::All, &ListQuery::default())
                .await?;
            let owned = collectivity_repo
                .list(
                    &CollectivityScope::Publisher(publisher.id),
                    &ListQuery::default(),
                )
                .await?;

            assert_eq!(all.total, 2);
            assert_eq!(owned.total, 1);
            assert_eq!(owned.records[0].siren, "216401024");

            Ok(())
        }
    }
}
