use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000010_create_office_table::Offices;

static IDX_OFFICE_COMMUNES_OFFICE_ID: &str = "idx-office_communes-office_id";
static IDX_OFFICE_COMMUNES_CODE_INSEE: &str = "idx-office_communes-code_insee";
static FK_OFFICE_COMMUNES_OFFICE_ID: &str = "fk-office_communes-office_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfficeCommunes::Table)
                    .if_not_exists()
                    .col(pk_uuid(OfficeCommunes::Id))
                    .col(uuid(OfficeCommunes::OfficeId))
                    .col(string(OfficeCommunes::CodeInsee))
                    .col(timestamp(OfficeCommunes::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OFFICE_COMMUNES_OFFICE_ID)
                    .table(OfficeCommunes::Table)
                    .col(OfficeCommunes::OfficeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OFFICE_COMMUNES_CODE_INSEE)
                    .table(OfficeCommunes::Table)
                    .col(OfficeCommunes::CodeInsee)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OFFICE_COMMUNES_OFFICE_ID)
                    .from_tbl(OfficeCommunes::Table)
                    .from_col(OfficeCommunes::OfficeId)
                    .to_tbl(Offices::Table)
                    .to_col(Offices::Id)
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
                    .name(FK_OFFICE_COMMUNES_OFFICE_ID)
                    .table(OfficeCommunes::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OFFICE_COMMUNES_CODE_INSEE).table(OfficeCommunes::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OFFICE_COMMUNES_OFFICE_ID).table(OfficeCommunes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OfficeCommunes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OfficeCommunes {
    Table,
    Id,
    OfficeId,
    CodeInsee,
    CreatedAt,
}
