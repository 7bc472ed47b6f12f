use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260901_000006_create_collectivity_table::Collectivities,
    m20260901_000005_create_publisher_table::Publishers,
    m20260901_000015_create_transmission_table::Transmissions,
    m20260901_000016_create_package_table::Packages,
};

static IDX_REPORTS_COLLECTIVITY_ID: &str = "idx-reports-collectivity_id";
static IDX_REPORTS_TRANSMISSION_ID: &str = "idx-reports-transmission_id";
static IDX_REPORTS_PACKAGE_ID: &str = "idx-reports-package_id";
static FK_REPORTS_COLLECTIVITY_ID: &str = "fk-reports-collectivity_id";
static FK_REPORTS_PUBLISHER_ID: &str = "fk-reports-publisher_id";
static FK_REPORTS_TRANSMISSION_ID: &str = "fk-reports-transmission_id";
static FK_REPORTS_PACKAGE_ID: &str = "fk-reports-package_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(pk_uuid(Reports::Id))
                    .col(uuid(Reports::CollectivityId))
                    .col(uuid_null(Reports::PublisherId))
                    .col(uuid_null(Reports::TransmissionId))
                    .col(uuid_null(Reports::PackageId))
                    .col(string_null(Reports::Reference))
                    .col(string(Reports::FormType))
                    .col(json(Reports::Anomalies))
                    .col(string(Reports::Priority))
                    .col(string_null(Reports::CodeInsee))
                    .col(date_null(Reports::DateConstat))
                    .col(integer_null(Reports::SituationAnneeMajic))
                    .col(string_null(Reports::SituationInvariant))
                    .col(string_null(Reports::SituationParcelle))
                    .col(string_null(Reports::SituationAdresse))
                    .col(string_null(Reports::SituationProprietaire))
                    .col(string_null(Reports::SituationCategorie))
                    .col(string_null(Reports::PropositionCategorie))
                    .col(string_null(Reports::PropositionAdresse))
                    .col(integer_null(Reports::PropositionSurface))
                    .col(text_null(Reports::Observations))
                    .col(boolean(Reports::Sandbox).default(false))
                    .col(timestamp_null(Reports::CompletedAt))
                    .col(timestamp_null(Reports::ApprovedAt))
                    .col(timestamp_null(Reports::RejectedAt))
                    .col(text_null(Reports::Reponse))
                    .col(timestamp_null(Reports::DiscardedAt))
                    .col(timestamp(Reports::CreatedAt))
                    .col(timestamp(Reports::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REPORTS_COLLECTIVITY_ID)
                    .table(Reports::Table)
                    .col(Reports::CollectivityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REPORTS_TRANSMISSION_ID)
                    .table(Reports::Table)
                    .col(Reports::TransmissionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_REPORTS_PACKAGE_ID)
                    .table(Reports::Table)
                    .col(Reports::PackageId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REPORTS_COLLECTIVITY_ID)
                    .from_tbl(Reports::Table)
                    .from_col(Reports::CollectivityId)
                    .to_tbl(Collectivities::Table)
                    .to_col(Collectivities::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REPORTS_PUBLISHER_ID)
                    .from_tbl(Reports::Table)
                    .from_col(Reports::PublisherId)
                    .to_tbl(Publishers::Table)
                    .to_col(Publishers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REPORTS_TRANSMISSION_ID)
                    .from_tbl(Reports::Table)
                    .from_col(Reports::TransmissionId)
                    .to_tbl(Transmissions::Table)
                    .to_col(Transmissions::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_REPORTS_PACKAGE_ID)
                    .from_tbl(Reports::Table)
                    .from_col(Reports::PackageId)
                    .to_tbl(Packages::Table)
                    .to_col(Packages::Id)
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
                    .name(FK_REPORTS_PACKAGE_ID)
                    .table(Reports::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REPORTS_TRANSMISSION_ID)
                    .table(Reports::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REPORTS_PUBLISHER_ID)
                    .table(Reports::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_REPORTS_COLLECTIVITY_ID)
                    .table(Reports::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_REPORTS_PACKAGE_ID).table(Reports::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_REPORTS_TRANSMISSION_ID).table(Reports::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name(IDX_REPORTS_COLLECTIVITY_ID).table(Reports::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Reports {
    Table,
    Id,
    CollectivityId,
    PublisherId,
    TransmissionId,
    PackageId,
    Reference,
    FormType,
    Anomalies,
    Priority,
    CodeInsee,
    DateConstat,
    SituationAnneeMajic,
    SituationInvariant,
    SituationParcelle,
    SituationAdresse,
    SituationProprietaire,
    SituationCategorie,
    PropositionCategorie,
    PropositionAdresse,
    PropositionSurface,
    Observations,
    Sandbox,
    CompletedAt,
    ApprovedAt,
    RejectedAt,
    Reponse,
    DiscardedAt,
    CreatedAt,
    UpdatedAt,
}
