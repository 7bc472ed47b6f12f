use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000005_create_publisher_table::Publishers;

static IDX_COLLECTIVITIES_PUBLISHER_ID: &str = "idx-collectivities-publisher_id";
static IDX_COLLECTIVITIES_DISCARDED_AT: &str = "idx-collectivities-discarded_at";
static FK_COLLECTIVITIES_PUBLISHER_ID: &str = "fk-collectivities-publisher_id";
static UNIQ_COLLECTIVITIES_SIREN: &str = "idx-collectivities-siren-kept";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Collectivities::Table)
                    .if_not_exists()
                    .col(pk_uuid(Collectivities::Id))
                    .col(string(Collectivities::TerritoryType))
                    .col(uuid(Collectivities::TerritoryId))
                    .col(uuid_null(Collectivities::PublisherId))
                    .col(string(Collectivities::Name))
                    .col(string(Collectivities::Siren))
                    .col(string_null(Collectivities::ContactFirstName))
                    .col(string_null(Collectivities::ContactLastName))
                    .col(string_null(Collectivities::ContactEmail))
                    .col(string_null(Collectivities::ContactPhone))
                    .col(string_null(Collectivities::DomainRestriction))
                    .col(boolean(Collectivities::AllowPublisherManagement).default(false))
                    .col(timestamp_null(Collectivities::DiscardedAt))
                    .col(timestamp(Collectivities::CreatedAt))
                    .col(timestamp(Collectivities::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COLLECTIVITIES_PUBLISHER_ID)
                    .table(Collectivities::Table)
                    .col(Collectivities::PublisherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COLLECTIVITIES_DISCARDED_AT)
                    .table(Collectivities::Table)
                    .col(Collectivities::DiscardedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_COLLECTIVITIES_PUBLISHER_ID)
                    .from_tbl(Collectivities::Table)
                    .from_col(Collectivities::PublisherId)
                    .to_tbl(Publishers::Table)
                    .to_col(Publishers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{}\" ON collectivities (siren) WHERE discarded_at IS NULL",
                UNIQ_COLLECTIVITIES_SIREN
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS \"{}\"", UNIQ_COLLECTIVITIES_SIREN))
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_COLLECTIVITIES_PUBLISHER_ID)
                    .table(Collectivities::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_COLLECTIVITIES_DISCARDED_AT).table(Collectivities::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_COLLECTIVITIES_PUBLISHER_ID).table(Collectivities::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Collectivities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Collectivities {
    Table,
    Id,
    TerritoryType,
    TerritoryId,
    PublisherId,
    Name,
    Siren,
    ContactFirstName,
    ContactLastName,
    ContactEmail,
    ContactPhone,
    DomainRestriction,
    AllowPublisherManagement,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
