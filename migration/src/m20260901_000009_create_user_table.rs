use sea_orm_migration::{prelude::*, schema::*};

static IDX_USERS_ORGANIZATION_ID: &str = "idx-users-organization_id";
static IDX_USERS_INVITATION_DIGEST: &str = "idx-users-invitation_digest";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_uuid(Users::Id))
                    .col(string(Users::OrganizationType))
                    .col(uuid(Users::OrganizationId))
                    .col(string_uniq(Users::Email))
                    .col(string(Users::FirstName))
                    .col(string(Users::LastName))
                    .col(boolean(Users::OrganizationAdmin).default(false))
                    .col(boolean(Users::SuperAdmin).default(false))
                    .col(string_null(Users::PasswordDigest))
                    .col(string_null(Users::InvitationDigest))
                    .col(timestamp_null(Users::InvitedAt))
                    .col(timestamp_null(Users::LastSignInAt))
                    .col(integer(Users::SignInCount).default(0))
                    .col(timestamp_null(Users::DiscardedAt))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USERS_ORGANIZATION_ID)
                    .table(Users::Table)
                    .col(Users::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USERS_INVITATION_DIGEST)
                    .table(Users::Table)
                    .col(Users::InvitationDigest)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(IDX_USERS_INVITATION_DIGEST).table(Users::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_USERS_ORGANIZATION_ID).table(Users::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    OrganizationType,
    OrganizationId,
    Email,
    FirstName,
    LastName,
    OrganizationAdmin,
    SuperAdmin,
    PasswordDigest,
    InvitationDigest,
    InvitedAt,
    LastSignInAt,
    SignInCount,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
