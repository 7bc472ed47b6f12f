use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::server::model::db::TransmissionModel;

pub struct TransmissionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TransmissionRepository<'a, C> {
    /// Creates a new instance of [`TransmissionRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<TransmissionModel>, DbErr> {
        entity::prelude::Transmission::find_by_id(id)
            .one(self.db)
            .await
    }

    /// In-progress web transmission of a collectivity
    pub async fn find_active_web(
        &self,
        collectivity_id: Uuid,
    ) -> Result<Option<TransmissionModel>, DbErr> {
        entity::prelude::Transmission::find()
            .filter(entity::transmission::Column::CollectivityId.eq(collectivity_id))
            .filter(entity::transmission::Column::PublisherId.is_null())
            .filter(entity::transmission::Column::CompletedAt.is_null())
            .order_by_asc(entity::transmission::Column::CreatedAt)
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        mut transmission: entity::transmission::ActiveModel,
    ) -> Result<TransmissionModel, DbErr> {
        let now = Utc::now().naive_utc();
        transmission.id = ActiveValue::Set(Uuid::new_v4());
        transmission.created_at = ActiveValue::Set(now);
        transmission.updated_at = ActiveValue::Set(now);

        transmission.insert(self.db).await
    }

    /// Marks a transmission as completed
    pub async fn complete(&self, transmission: TransmissionModel) -> Result<TransmissionModel, DbErr> {
        let now = Utc::now().naive_utc();
        let mut transmission: entity::transmission::ActiveModel = transmission.into();
        transmission.completed_at = ActiveValue::Set(Some(now));
        transmission.updated_at = ActiveValue::Set(now);

        transmission.update(self.db).await
    }
}

#[cfg(test)]
mod tests {

    mod find_active_web {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::server::data::transmission::TransmissionRepository;

        /// Expect completed and API transmissions to be ignored
        #[tokio::test]
        async fn ignores_completed_and_api_transmissions() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", Some(publisher.id))
                .await?;
            test.report()
                .save_transmission(entity::transmission::Model {
                    completed_at: Some(Utc::now().naive_utc()),
                    ..factory::transmission(collectivity.id, None)
                })
                .await?;
            test.report()
                .save_transmission(entity::transmission::Model {
                    publisher_id: Some(publisher.id),
                    ..factory::transmission(collectivity.id, None)
                })
                .await?;

            let transmission_repo = TransmissionRepository::new(&test.db);
            assert!(transmission_repo
                .find_active_web(collectivity.id)
                .await?
                .is_none());

            let active = test
                .report()
                .insert_transmission(collectivity.id, None)
                .await?;
            let found = transmission_repo.find_active_web(collectivity.id).await?;

            assert_eq!(found.map(|t| t.id), Some(active.id));

            Ok(())
        }
    }
}
