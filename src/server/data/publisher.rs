use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::PublisherModel,
};

pub struct PublisherRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PublisherRepository<'a, C> {
    /// Creates a new instance of [`PublisherRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a publisher, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<PublisherModel>, DbErr> {
        entity::prelude::Publisher::find_by_id(id).one(self.db).await
    }

    pub async fn find_kept(&self, id: Uuid) -> Result<Option<PublisherModel>, DbErr> {
        entity::prelude::Publisher::find_by_id(id)
            .filter(entity::publisher::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    /// Whether a kept publisher other than `except` already uses `siren`
    pub async fn siren_taken(&self, siren: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut select = entity::prelude::Publisher::find()
            .filter(entity::publisher::Column::Siren.eq(siren))
            .filter(entity::publisher::Column::DiscardedAt.is_null());

        if let Some(id) = except {
            select = select.filter(entity::publisher::Column::Id.ne(id));
        }

        Ok(select.count(self.db).await? > 0)
    }

    fn filtered(&self, query: &ListQuery) -> Select<entity::publisher::Entity> {
        listing::filter(
            entity::prelude::Publisher::find(),
            query,
            &[
                entity::publisher::Column::Name,
                entity::publisher::Column::Siren,
                entity::publisher::Column::Email,
            ],
        )
    }

    /// Lists publishers matching the search on name, SIREN & email
    pub async fn list(&self, query: &ListQuery) -> Result<Page<PublisherModel>, DbErr> {
        let select = listing::order(
            self.filtered(query),
            query,
            &[
                ("name", entity::publisher::Column::Name),
                ("siren", entity::publisher::Column::Siren),
                ("created_at", entity::publisher::Column::CreatedAt),
            ],
            entity::publisher::Column::Name,
        );

        listing::paginate(select, query, self.db).await
    }

    /// IDs of every publisher matching the search
    pub async fn ids(&self, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(self.filtered(query), entity::publisher::Column::Id, self.db).await
    }

    pub async fn create(
        &self,
        mut publisher: entity::publisher::ActiveModel,
    ) -> Result<PublisherModel, DbErr> {
        let now = Utc::now().naive_utc();
        publisher.id = ActiveValue::Set(Uuid::new_v4());
        publisher.created_at = ActiveValue::Set(now);
        publisher.updated_at = ActiveValue::Set(now);

        publisher.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut publisher: entity::publisher::ActiveModel,
    ) -> Result<PublisherModel, DbErr> {
        publisher.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        publisher.update(self.db).await
    }
}

#[cfg(test)]
mod tests {

    mod siren_taken {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::server::data::publisher::PublisherRepository;

        /// Expect a kept publisher to reserve its SIREN
        #[tokio::test]
        async fn detects_kept_publisher() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;

            let publisher_repo = PublisherRepository::new(&test.db);

            assert!(publisher_repo.siren_taken("511022394", None).await?);
            assert!(
                !publisher_repo
                    .siren_taken("511022394", Some(publisher.id))
                    .await?
            );

            Ok(())
        }

        /// Expect a discarded publisher to release its SIREN
        #[tokio::test]
        async fn ignores_discarded_publisher() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            test.organization()
                .save_publisher(entity::publisher::Model {
                    discarded_at: Some(Utc::now().naive_utc()),
                    ..factory::publisher("511022394")
                })
                .await?;

            let publisher_repo = PublisherRepository::new(&test.db);

            assert!(!publisher_repo.siren_taken("511022394", None).await?);

            Ok(())
        }
    }

    mod list {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::server::data::{listing::ListQuery, publisher::PublisherRepository};

        /// Expect the default scope to hide discarded publishers
        #[tokio::test]
        async fn lists_kept_or_discarded() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            test.organization().insert_publisher("511022394").await?;
            test.organization()
                .save_publisher(entity::publisher::Model {
                    discarded_at: Some(Utc::now().naive_utc()),
                    ..factory::publisher("732829320")
                })
                .await?;

            let publisher_repo = PublisherRepository::new(&test.db);
            let kept = publisher_repo.list(&ListQuery::default()).await?;
            let discarded = publisher_repo
                .list(&ListQuery {
                    discarded: true,
                    ..Default::default()
                })
                .await?;

            assert_eq!(kept.total, 1);
            assert_eq!(kept.records[0].siren, "511022394");
            assert_eq!(discarded.total, 1);
            assert_eq!(discarded.records[0].siren, "732829320");

            Ok(())
        }
    }
}
