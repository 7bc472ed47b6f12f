use sea_orm_migration::{prelude::*, schema::*};

static IDX_COMMUNES_CODE_DEPARTEMENT: &str = "idx-communes-code_departement";
static IDX_COMMUNES_SIREN_EPCI: &str = "idx-communes-siren_epci";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Communes::Table)
                    .if_not_exists()
                    .col(pk_uuid(Communes::Id))
                    .col(string_uniq(Communes::CodeInsee))
                    .col(string(Communes::Name))
                    .col(string(Communes::CodeDepartement))
                    .col(string_null(Communes::SirenEpci))
                    .col(string_null(Communes::CodeArrondissement))
                    .col(timestamp(Communes::CreatedAt))
                    .col(timestamp(Communes::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COMMUNES_CODE_DEPARTEMENT)
                    .table(Communes::Table)
                    .col(Communes::CodeDepartement)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_COMMUNES_SIREN_EPCI)
                    .table(Communes::Table)
                    .col(Communes::SirenEpci)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_COMMUNES_SIREN_EPCI).table(Communes::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_COMMUNES_CODE_DEPARTEMENT).table(Communes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Communes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Communes {
    Table,
    Id,
    CodeInsee,
    Name,
    CodeDepartement,
    SirenEpci,
    CodeArrondissement,
    CreatedAt,
    UpdatedAt,
}
