use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260901_000010_create_office_table::Offices,
    m20260901_000009_create_user_table::Users,
};

static IDX_OFFICE_USERS_OFFICE_ID: &str = "idx-office_users-office_id";
static IDX_OFFICE_USERS_USER_ID: &str = "idx-office_users-user_id";
static FK_OFFICE_USERS_OFFICE_ID: &str = "fk-office_users-office_id";
static FK_OFFICE_USERS_USER_ID: &str = "fk-office_users-user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OfficeUsers::Table)
                    .if_not_exists()
                    .col(pk_uuid(OfficeUsers::Id))
                    .col(uuid(OfficeUsers::OfficeId))
                    .col(uuid(OfficeUsers::UserId))
                    .col(timestamp(OfficeUsers::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OFFICE_USERS_OFFICE_ID)
                    .table(OfficeUsers::Table)
                    .col(OfficeUsers::OfficeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_OFFICE_USERS_USER_ID)
                    .table(OfficeUsers::Table)
                    .col(OfficeUsers::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OFFICE_USERS_OFFICE_ID)
                    .from_tbl(OfficeUsers::Table)
                    .from_col(OfficeUsers::OfficeId)
                    .to_tbl(Offices::Table)
                    .to_col(Offices::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_OFFICE_USERS_USER_ID)
                    .from_tbl(OfficeUsers::Table)
                    .from_col(OfficeUsers::UserId)
                    .to_tbl(Users::Table)
                    .to_col(Users::Id)
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
                    .name(FK_OFFICE_USERS_USER_ID)
                    .table(OfficeUsers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_OFFICE_USERS_OFFICE_ID)
                    .table(OfficeUsers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OFFICE_USERS_USER_ID).table(OfficeUsers::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_OFFICE_USERS_OFFICE_ID).table(OfficeUsers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OfficeUsers::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum OfficeUsers {
    Table,
    Id,
    OfficeId,
    UserId,
    CreatedAt,
}
