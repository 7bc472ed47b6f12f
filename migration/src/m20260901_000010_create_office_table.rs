use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000007_create_ddfip_table::Ddfips;

static IDX_OFFICES_DDFIP_ID: &str = "idx-offices-ddfip_id";
static FK_OFFICES_DDFIP_ID: &str = "fk-offices-ddfip_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offices::Table)
                    .if_not_exists()
                    .col(pk_uuid(Offices::Id))
                    .col(uuid(Offices::DdfipId))
                    .col(string(Offices::Name))
                    .col(json(Offices::Competences))
                    .col(timestamp_null(Offices::DiscardedAt))
                    .col(timestamp(Offices::CreatedAt))
                    .col(timestamp(Offices::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OFFICES_DDFIP_ID)
                    .table(Offices::Table)
                    .col(Offices::DdfipId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OFFICES_DDFIP_ID)
                    .from_tbl(Offices::Table)
                    .from_col(Offices::DdfipId)
                    .to_tbl(Ddfips::Table)
                    .to_col(Ddfips::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OFFICES_DDFIP_ID)
                    .table(Offices::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OFFICES_DDFIP_ID).table(Offices::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Offices::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Offices {
    Table,
    Id,
    DdfipId,
    Name,
    Competences,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
