use sea_orm_migration::{prelude::*, schema::*};

static IDX_DEPARTEMENTS_CODE_REGION: &str = "idx-departements-code_region";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Departements::Table)
                    .if_not_exists()
                    .col(pk_uuid(Departements::Id))
                    .col(string_uniq(Departements::CodeDepartement))
                    .col(string(Departements::CodeRegion))
                    .col(string(Departements::Name))
                    .col(timestamp(Departements::CreatedAt))
                    .col(timestamp(Departements::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DEPARTEMENTS_CODE_REGION)
                    .table(Departements::Table)
                    .col(Departements::CodeRegion)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_DEPARTEMENTS_CODE_REGION).table(Departements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departements::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Departements {
    Table,
    Id,
    CodeDepartement,
    CodeRegion,
    Name,
    CreatedAt,
    UpdatedAt,
}
