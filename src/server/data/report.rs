use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, IntoCondition, SelectStatement},
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, QueryTrait, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::ReportModel,
};

/// Reports visible to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum ReportScope {
    /// Every non-sandbox report
    All,
    /// Reports of one collectivity
    Collectivity(Uuid),
    /// Reports a publisher created through the API
    Publisher(Uuid),
    /// Non-sandbox reports transmitted to a DDFIP
    Ddfip(Uuid),
    /// Reports in packages assigned to one of these offices
    Offices(Vec<Uuid>),
    /// Every transmitted non-sandbox report
    Transmitted,
}

impl ReportScope {
    fn condition(&self) -> Condition {
        use entity::report::Column;

        match self {
            Self::All => Condition::all().add(Column::Sandbox.eq(false)),
            Self::Collectivity(collectivity_id) => {
                Condition::all().add(Column::CollectivityId.eq(*collectivity_id))
            }
            Self::Publisher(publisher_id) => {
                Condition::all().add(Column::PublisherId.eq(*publisher_id))
            }
            Self::Ddfip(ddfip_id) => Condition::all()
                .add(Column::Sandbox.eq(false))
                .add(Column::PackageId.in_subquery(kept_packages(
                    entity::package::Column::DdfipId.eq(*ddfip_id),
                ))),
            Self::Offices(office_ids) => Condition::all()
                .add(Column::Sandbox.eq(false))
                .add(Column::PackageId.in_subquery(kept_packages(
                    Condition::all()
                        .add(entity::package::Column::OfficeId.is_in(office_ids.iter().copied()))
                        .add(entity::package::Column::AssignedAt.is_not_null()),
                ))),
            Self::Transmitted => Condition::all()
                .add(Column::Sandbox.eq(false))
                .add(Column::PackageId.is_not_null()),
        }
    }
}

fn kept_packages(condition: impl IntoCondition) -> SelectStatement {
    entity::prelude::Package::find()
        .select_only()
        .column(entity::package::Column::Id)
        .filter(condition)
        .filter(entity::package::Column::DiscardedAt.is_null())
        .into_query()
}

pub struct ReportRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ReportRepository<'a, C> {
    /// Creates a new instance of [`ReportRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a report, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<ReportModel>, DbErr> {
        entity::prelude::Report::find_by_id(id).one(self.db).await
    }

    /// Finds a report, kept or discarded, when it belongs to `scope`
    pub async fn find_in_scope(
        &self,
        scope: &ReportScope,
        id: Uuid,
    ) -> Result<Option<ReportModel>, DbErr> {
        entity::prelude::Report::find_by_id(id)
            .filter(scope.condition())
            .one(self.db)
            .await
    }

    fn filtered(&self, scope: &ReportScope, query: &ListQuery) -> Select<entity::report::Entity> {
        listing::filter(
            entity::prelude::Report::find().filter(scope.condition()),
            query,
            &[
                entity::report::Column::Reference,
                entity::report::Column::CodeInsee,
                entity::report::Column::SituationInvariant,
                entity::report::Column::SituationAdresse,
                entity::report::Column::FormType,
            ],
        )
    }

    /// Lists reports in scope matching the search on reference, commune, invariant & address
    pub async fn list(
        &self,
        scope: &ReportScope,
        query: &ListQuery,
    ) -> Result<Page<ReportModel>, DbErr> {
        let select = listing::order(
            self.filtered(scope, query),
            query,
            &[
                ("reference", entity::report::Column::Reference),
                ("form_type", entity::report::Column::FormType),
                ("priority", entity::report::Column::Priority),
                ("code_insee", entity::report::Column::CodeInsee),
                ("created_at", entity::report::Column::CreatedAt),
            ],
            entity::report::Column::CreatedAt,
        );

        listing::paginate(select, query, self.db).await
    }

    pub async fn ids(&self, scope: &ReportScope, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(
            self.filtered(scope, query),
            entity::report::Column::Id,
            self.db,
        )
        .await
    }

    /// Kept, completed, unpackaged web reports of a collectivity among `ids`
    pub async fn find_transmissible(
        &self,
        collectivity_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ReportModel>, DbErr> {
        entity::prelude::Report::find()
            .filter(entity::report::Column::Id.is_in(ids.iter().copied()))
            .filter(entity::report::Column::CollectivityId.eq(collectivity_id))
            .filter(entity::report::Column::PublisherId.is_null())
            .filter(entity::report::Column::PackageId.is_null())
            .filter(entity::report::Column::CompletedAt.is_not_null())
            .filter(entity::report::Column::DiscardedAt.is_null())
            .all(self.db)
            .await
    }

    /// IDs among `ids` of web reports not yet placed into a package
    pub async fn editable_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Report::find()
            .select_only()
            .column(entity::report::Column::Id)
            .filter(entity::report::Column::Id.is_in(ids.iter().copied()))
            .filter(entity::report::Column::PackageId.is_null())
            .filter(entity::report::Column::PublisherId.is_null())
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Kept reports attached to a transmission
    pub async fn find_by_transmission(
        &self,
        transmission_id: Uuid,
    ) -> Result<Vec<ReportModel>, DbErr> {
        entity::prelude::Report::find()
            .filter(entity::report::Column::TransmissionId.eq(transmission_id))
            .filter(entity::report::Column::DiscardedAt.is_null())
            .all(self.db)
            .await
    }

    /// IDs of the kept reports attached to a transmission
    pub async fn ids_by_transmission(&self, transmission_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        entity::prelude::Report::find()
            .select_only()
            .column(entity::report::Column::Id)
            .filter(entity::report::Column::TransmissionId.eq(transmission_id))
            .filter(entity::report::Column::DiscardedAt.is_null())
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Number of reports of a package already approved or rejected
    pub async fn count_decided_in_package(&self, package_id: Uuid) -> Result<u64, DbErr> {
        entity::prelude::Report::find()
            .filter(entity::report::Column::PackageId.eq(package_id))
            .filter(
                Condition::any()
                    .add(entity::report::Column::ApprovedAt.is_not_null())
                    .add(entity::report::Column::RejectedAt.is_not_null()),
            )
            .count(self.db)
            .await
    }

    /// Attaches reports to a transmission, returning how many were attached
    pub async fn attach_to_transmission(
        &self,
        transmission_id: Uuid,
        ids: &[Uuid],
    ) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::Report::update_many()
            .col_expr(
                entity::report::Column::TransmissionId,
                Expr::value(Some(transmission_id)),
            )
            .col_expr(
                entity::report::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::report::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Detaches reports from a transmission, returning how many were detached
    pub async fn detach_from_transmission(
        &self,
        transmission_id: Uuid,
        ids: &[Uuid],
    ) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::Report::update_many()
            .col_expr(
                entity::report::Column::TransmissionId,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                entity::report::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::report::Column::TransmissionId.eq(transmission_id))
            .filter(entity::report::Column::Id.is_in(ids.iter().copied()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Places a report into a package under its final reference
    pub async fn set_package(
        &self,
        report_id: Uuid,
        package_id: Uuid,
        reference: String,
    ) -> Result<(), DbErr> {
        entity::prelude::Report::update_many()
            .col_expr(entity::report::Column::PackageId, Expr::value(Some(package_id)))
            .col_expr(entity::report::Column::Reference, Expr::value(Some(reference)))
            .col_expr(
                entity::report::Column::UpdatedAt,
                Expr::value(Utc::now().naive_utc()),
            )
            .filter(entity::report::Column::Id.eq(report_id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    pub async fn create(
        &self,
        mut report: entity::report::ActiveModel,
    ) -> Result<ReportModel, DbErr> {
        let now = Utc::now().naive_utc();
        report.id = ActiveValue::Set(Uuid::new_v4());
        report.created_at = ActiveValue::Set(now);
        report.updated_at = ActiveValue::Set(now);

        report.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut report: entity::report::ActiveModel,
    ) -> Result<ReportModel, DbErr> {
        report.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        report.update(self.db).await
    }
}
