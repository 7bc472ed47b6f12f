use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260901_000006_create_collectivity_table::Collectivities,
    m20260901_000009_create_user_table::Users,
    m20260901_000005_create_publisher_table::Publishers,
    m20260901_000013_create_oauth_application_table::OauthApplications,
};

static IDX_TRANSMISSIONS_COLLECTIVITY_ID: &str = "idx-transmissions-collectivity_id";
static IDX_TRANSMISSIONS_PUBLISHER_ID: &str = "idx-transmissions-publisher_id";
static FK_TRANSMISSIONS_COLLECTIVITY_ID: &str = "fk-transmissions-collectivity_id";
static FK_TRANSMISSIONS_USER_ID: &str = "fk-transmissions-user_id";
static FK_TRANSMISSIONS_PUBLISHER_ID: &str = "fk-transmissions-publisher_id";
static FK_TRANSMISSIONS_OAUTH_APPLICATION_ID: &str = "fk-transmissions-oauth_application_id";
static UNIQ_TRANSMISSIONS_COLLECTIVITY_ID: &str = "idx-transmissions-collectivity_id-active";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transmissions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Transmissions::Id))
                    .col(uuid(Transmissions::CollectivityId))
                    .col(uuid_null(Transmissions::UserId))
                    .col(uuid_null(Transmissions::PublisherId))
                    .col(uuid_null(Transmissions::OauthApplicationId))
                    .col(boolean(Transmissions::Sandbox).default(false))
                    .col(timestamp_null(Transmissions::CompletedAt))
                    .col(timestamp(Transmissions::CreatedAt))
                    .col(timestamp(Transmissions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TRANSMISSIONS_COLLECTIVITY_ID)
                    .table(Transmissions::Table)
                    .col(Transmissions::CollectivityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TRANSMISSIONS_PUBLISHER_ID)
                    .table(Transmissions::Table)
                    .col(Transmissions::PublisherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_TRANSMISSIONS_COLLECTIVITY_ID)
                    .from_tbl(Transmissions::Table)
                    .from_col(Transmissions::CollectivityId)
                    .to_tbl(Collectivities::Table)
                    .to_col(Collectivities::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_TRANSMISSIONS_USER_ID)
                    .from_tbl(Transmissions::Table)
                    .from_col(Transmissions::UserId)
                    .to_tbl(Users::Table)
                    .to_col(Users::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_TRANSMISSIONS_PUBLISHER_ID)
                    .from_tbl(Transmissions::Table)
                    .from_col(Transmissions::PublisherId)
                    .to_tbl(Publishers::Table)
                    .to_col(Publishers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_TRANSMISSIONS_OAUTH_APPLICATION_ID)
                    .from_tbl(Transmissions::Table)
                    .from_col(Transmissions::OauthApplicationId)
                    .to_tbl(OauthApplications::Table)
                    .to_col(OauthApplications::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{}\" ON transmissions (collectivity_id) WHERE completed_at IS NULL AND publisher_id IS NULL",
                UNIQ_TRANSMISSIONS_COLLECTIVITY_ID
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS \"{}\"", UNIQ_TRANSMISSIONS_COLLECTIVITY_ID))
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_TRANSMISSIONS_OAUTH_APPLICATION_ID)
                    .table(Transmissions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_TRANSMISSIONS_PUBLISHER_ID)
                    .table(Transmissions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_TRANSMISSIONS_USER_ID)
                    .table(Transmissions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_TRANSMISSIONS_COLLECTIVITY_ID)
                    .table(Transmissions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_TRANSMISSIONS_PUBLISHER_ID).table(Transmissions::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_TRANSMISSIONS_COLLECTIVITY_ID).table(Transmissions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transmissions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Transmissions {
    Table,
    Id,
    CollectivityId,
    UserId,
    PublisherId,
    OauthApplicationId,
    Sandbox,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
