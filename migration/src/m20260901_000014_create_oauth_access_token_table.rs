use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260901_000013_create_oauth_application_table::OauthApplications;

static IDX_OAUTH_ACCESS_TOKENS_APPLICATION_ID: &str = "idx-oauth_access_tokens-application_id";
static FK_OAUTH_ACCESS_TOKENS_APPLICATION_ID: &str = "fk-oauth_access_tokens-application_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OauthAccessTokens::Table)
                    .if_not_exists()
                    .col(pk_uuid(OauthAccessTokens::Id))
                    .col(uuid(OauthAccessTokens::ApplicationId))
                    .col(string_uniq(OauthAccessTokens::TokenDigest))
                    .col(big_integer_null(OauthAccessTokens::ExpiresIn))
                    .col(timestamp_null(OauthAccessTokens::RevokedAt))
                    .col(timestamp(OauthAccessTokens::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OAUTH_ACCESS_TOKENS_APPLICATION_ID)
                    .table(OauthAccessTokens::Table)
                    .col(OauthAccessTokens::ApplicationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OAUTH_ACCESS_TOKENS_APPLICATION_ID)
                    .from_tbl(OauthAccessTokens::Table)
                    .from_col(OauthAccessTokens::ApplicationId)
                    .to_tbl(OauthApplications::Table)
                    .to_col(OauthApplications::Id)
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
                    .name(FK_OAUTH_ACCESS_TOKENS_APPLICATION_ID)
                    .table(OauthAccessTokens::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OAUTH_ACCESS_TOKENS_APPLICATION_ID).table(OauthAccessTokens::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OauthAccessTokens::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OauthAccessTokens {
    Table,
    Id,
    ApplicationId,
    TokenDigest,
    ExpiresIn,
    RevokedAt,
    CreatedAt,
}
