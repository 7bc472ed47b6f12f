use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dgfips::Table)
                    .if_not_exists()
                    .col(pk_uuid(Dgfips::Id))
                    .col(string(Dgfips::Name))
                    .col(string_null(Dgfips::ContactFirstName))
                    .col(string_null(Dgfips::ContactLastName))
                    .col(string_null(Dgfips::ContactEmail))
                    .col(string_null(Dgfips::ContactPhone))
                    .col(string_null(Dgfips::DomainRestriction))
                    .col(timestamp_null(Dgfips::DiscardedAt))
                    .col(timestamp(Dgfips::CreatedAt))
                    .col(timestamp(Dgfips::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dgfips::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Dgfips {
    Table,
    Id,
    Name,
    ContactFirstName,
    ContactLastName,
    ContactEmail,
    ContactPhone,
    DomainRestriction,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
