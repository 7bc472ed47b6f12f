use sea_orm_migration::{prelude::*, schema::*};

static IDX_PUBLISHERS_DISCARDED_AT: &str = "idx-publishers-discarded_at";
static UNIQ_PUBLISHERS_SIREN: &str = "idx-publishers-siren-kept";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Publishers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Publishers::Id))
                    .col(string(Publishers::Name))
                    .col(string(Publishers::Siren))
                    .col(string_null(Publishers::Email))
                    .col(string_null(Publishers::ContactFirstName))
                    .col(string_null(Publishers::ContactLastName))
                    .col(string_null(Publishers::ContactEmail))
                    .col(string_null(Publishers::ContactPhone))
                    .col(string_null(Publishers::DomainRestriction))
                    .col(timestamp_null(Publishers::DiscardedAt))
                    .col(timestamp(Publishers::CreatedAt))
                    .col(timestamp(Publishers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PUBLISHERS_DISCARDED_AT)
                    .table(Publishers::Table)
                    .col(Publishers::DiscardedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"{}\" ON publishers (siren) WHERE discarded_at IS NULL",
                UNIQ_PUBLISHERS_SIREN
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS \"{}\"", UNIQ_PUBLISHERS_SIREN))
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_PUBLISHERS_DISCARDED_AT).table(Publishers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Publishers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Publishers {
    Table,
    Id,
    Name,
    Siren,
    Email,
    ContactFirstName,
    ContactLastName,
    ContactEmail,
    ContactPhone,
    DomainRestriction,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
