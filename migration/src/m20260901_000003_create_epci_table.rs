use sea_orm_migration::{prelude::*, schema::*};

static IDX_EPCIS_CODE_DEPARTEMENT: &str = "idx-epcis-code_departement";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Epcis::Table)
                    .if_not_exists()
                    .col(pk_uuid(Epcis::Id))
                    .col(string_uniq(Epcis::Siren))
                    .col(string(Epcis::Name))
                    .col(string_null(Epcis::Nature))
                    .col(string_null(Epcis::CodeDepartement))
                    .col(timestamp(Epcis::CreatedAt))
                    .col(timestamp(Epcis::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EPCIS_CODE_DEPARTEMENT)
                    .table(Epcis::Table)
                    .col(Epcis::CodeDepartement)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_EPCIS_CODE_DEPARTEMENT).table(Epcis::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Epcis::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Epcis {
    Table,
    Id,
    Siren,
    Name,
    Nature,
    CodeDepartement,
    CreatedAt,
    UpdatedAt,
}
