use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Regions::Table)
                    .if_not_exists()
                    .col(pk_uuid(Regions::Id))
                    .col(string_uniq(Regions::CodeRegion))
                    .col(string(Regions::Name))
                    .col(timestamp(Regions::CreatedAt))
                    .col(timestamp(Regions::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Regions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Regions {
    Table,
    Id,
    CodeRegion,
    Name,
    CreatedAt,
    UpdatedAt,
}
