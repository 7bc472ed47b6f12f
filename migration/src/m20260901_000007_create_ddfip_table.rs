use sea_orm_migration::{prelude::*, schema::*};

static IDX_DDFIPS_CODE_DEPARTEMENT: &str = "idx-ddfips-code_departement";
static IDX_DDFIPS_DISCARDED_AT: &str = "idx-ddfips-discarded_at";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Ddfips::Table)
                    .if_not_exists()
                    .col(pk_uuid(Ddfips::Id))
                    .col(string(Ddfips::CodeDepartement))
                    .col(string(Ddfips::Name))
                    .col(string_null(Ddfips::ContactFirstName))
                    .col(string_null(Ddfips::ContactLastName))
                    .col(string_null(Ddfips::ContactEmail))
                    .col(string_null(Ddfips::ContactPhone))
                    .col(string_null(Ddfips::DomainRestriction))
                    .col(timestamp_null(Ddfips::DiscardedAt))
                    .col(timestamp(Ddfips::CreatedAt))
                    .col(timestamp(Ddfips::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DDFIPS_CODE_DEPARTEMENT)
                    .table(Ddfips::Table)
                    .col(Ddfips::CodeDepartement)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DDFIPS_DISCARDED_AT)
                    .table(Ddfips::Table)
                    .col(Ddfips::DiscardedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_DDFIPS_DISCARDED_AT).table(Ddfips::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_DDFIPS_CODE_DEPARTEMENT).table(Ddfips::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Ddfips::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Ddfips {
    Table,
    Id,
    CodeDepartement,
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
