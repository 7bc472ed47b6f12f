use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260901_000006_create_collectivity_table::Collectivities,
    m20260901_000005_create_publisher_table::Publishers,
    m20260901_000007_create_ddfip_table::Ddfips,
    m20260901_000015_create_transmission_table::Transmissions,
    m20260901_000010_create_office_table::Offices,
};

static IDX_PACKAGES_COLLECTIVITY_ID: &str = "idx-packages-collectivity_id";
static IDX_PACKAGES_DDFIP_ID: &str = "idx-packages-ddfip_id";
static IDX_PACKAGES_TRANSMISSION_ID: &str = "idx-packages-transmission_id";
static IDX_PACKAGES_OFFICE_ID: &str = "idx-packages-office_id";
static FK_PACKAGES_COLLECTIVITY_ID: &str = "fk-packages-collectivity_id";
static FK_PACKAGES_PUBLISHER_ID: &str = "fk-packages-publisher_id";
static FK_PACKAGES_DDFIP_ID: &str = "fk-packages-ddfip_id";
static FK_PACKAGES_TRANSMISSION_ID: &str = "fk-packages-transmission_id";
static FK_PACKAGES_OFFICE_ID: &str = "fk-packages-office_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Packages::Table)
                    .if_not_exists()
                    .col(pk_uuid(Packages::Id))
                    .col(string_uniq(Packages::Reference))
                    .col(string(Packages::FormType))
                    .col(uuid(Packages::CollectivityId))
                    .col(uuid_null(Packages::PublisherId))
                    .col(uuid(Packages::DdfipId))
                    .col(uuid(Packages::TransmissionId))
                    .col(uuid_null(Packages::OfficeId))
                    .col(boolean(Packages::Sandbox).default(false))
                    .col(timestamp(Packages::TransmittedAt))
                    .col(timestamp_null(Packages::AcknowledgedAt))
                    .col(timestamp_null(Packages::AssignedAt))
                    .col(timestamp_null(Packages::RejectedAt))
                    .col(timestamp_null(Packages::DiscardedAt))
                    .col(timestamp(Packages::CreatedAt))
                    .col(timestamp(Packages::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PACKAGES_COLLECTIVITY_ID)
                    .table(Packages::Table)
                    .col(Packages::CollectivityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PACKAGES_DDFIP_ID)
                    .table(Packages::Table)
                    .col(Packages::DdfipId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PACKAGES_TRANSMISSION_ID)
                    .table(Packages::Table)
                    .col(Packages::TransmissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PACKAGES_OFFICE_ID)
                    .table(Packages::Table)
                    .col(Packages::OfficeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGES_COLLECTIVITY_ID)
                    .from_tbl(Packages::Table)
                    .from_col(Packages::CollectivityId)
                    .to_tbl(Collectivities::Table)
                    .to_col(Collectivities::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGES_PUBLISHER_ID)
                    .from_tbl(Packages::Table)
                    .from_col(Packages::PublisherId)
                    .to_tbl(Publishers::Table)
                    .to_col(Publishers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGES_DDFIP_ID)
                    .from_tbl(Packages::Table)
                    .from_col(Packages::DdfipId)
                    .to_tbl(Ddfips::Table)
                    .to_col(Ddfips::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGES_TRANSMISSION_ID)
                    .from_tbl(Packages::Table)
                    .from_col(Packages::TransmissionId)
                    .to_tbl(Transmissions::Table)
                    .to_col(Transmissions::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGES_OFFICE_ID)
                    .from_tbl(Packages::Table)
                    .from_col(Packages::OfficeId)
                    .to_tbl(Offices::Table)
                    .to_col(Offices::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGES_OFFICE_ID)
                    .table(Packages::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGES_TRANSMISSION_ID)
                    .table(Packages::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGES_DDFIP_ID)
                    .table(Packages::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGES_PUBLISHER_ID)
                    .table(Packages::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGES_COLLECTIVITY_ID)
                    .table(Packages::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_PACKAGES_OFFICE_ID).table(Packages::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_PACKAGES_TRANSMISSION_ID).table(Packages::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_PACKAGES_DDFIP_ID).table(Packages::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_PACKAGES_COLLECTIVITY_ID).table(Packages::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Packages::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Packages {
    Table,
    Id,
    Reference,
    FormType,
    CollectivityId,
    PublisherId,
    DdfipId,
    TransmissionId,
    OfficeId,
    Sandbox,
    TransmittedAt,
    AcknowledgedAt,
    AssignedAt,
    RejectedAt,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
