use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000005_create_publisher_table::Publishers;

static IDX_OAUTH_APPLICATIONS_OWNER_ID: &str = "idx-oauth_applications-owner_id";
static FK_OAUTH_APPLICATIONS_OWNER_ID: &str = "fk-oauth_applications-owner_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OauthApplications::Table)
                    .if_not_exists()
                    .col(pk_uuid(OauthApplications::Id))
                    .col(uuid(OauthApplications::OwnerId))
                    .col(string(OauthApplications::Name))
                    .col(string_uniq(OauthApplications::Uid))
                    .col(string(OauthApplications::SecretDigest))
                    .col(string_null(OauthApplications::RedirectUri))
                    .col(boolean(OauthApplications::Sandbox).default(false))
                    .col(timestamp_null(OauthApplications::DiscardedAt))
                    .col(timestamp(OauthApplications::CreatedAt))
                    .col(timestamp(OauthApplications::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OAUTH_APPLICATIONS_OWNER_ID)
                    .table(OauthApplications::Table)
                    .col(OauthApplications::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OAUTH_APPLICATIONS_OWNER_ID)
                    .from_tbl(OauthApplications::Table)
                    .from_col(OauthApplications::OwnerId)
                    .to_tbl(Publishers::Table)
                    .to_col(Publishers::Id)
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
                    .name(FK_OAUTH_APPLICATIONS_OWNER_ID)
                    .table(OauthApplications::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OAUTH_APPLICATIONS_OWNER_ID).table(OauthApplications::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OauthApplications::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OauthApplications {
    Table,
    Id,
    OwnerId,
    Name,
    Uid,
    SecretDigest,
    RedirectUri,
    Sandbox,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
