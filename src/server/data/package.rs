use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::PackageModel,
};

/// Packages visible to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum PackageScope {
    /// Every non-sandbox package
    All,
    Collectivity(Uuid),
    Publisher(Uuid),
    /// Non-sandbox packages transmitted to a DDFIP
    Ddfip(Uuid),
    /// Packages assigned to one of these offices
    Offices(Vec<Uuid>),
    /// Every non-sandbox package, for the DGFIP
    Transmitted,
}

impl PackageScope {
    fn condition(&self) -> Condition {
        use entity::package::Column;

        match self {
            Self::All | Self::Transmitted => Condition::all().add(Column::Sandbox.eq(false)),
            Self::Collectivity(collectivity_id) => {
                Condition::all().add(Column::CollectivityId.eq(*collectivity_id))
            }
            Self::Publisher(publisher_id) => {
                Condition::all().add(Column::PublisherId.eq(*publisher_id))
            }
            Self::Ddfip(ddfip_id) => Condition::all()
                .add(Column::Sandbox.eq(false))
                .add(Column::DdfipId.eq(*ddfip_id)),
            Self::Offices(office_ids) => Condition::all()
                .add(Column::Sandbox.eq(false))
                .add(Column::OfficeId.is_in(office_ids.iter().copied()))
                .add(Column::AssignedAt.is_not_null()),
        }
    }
}

pub struct PackageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PackageRepository<'a, C> {
    /// Creates a new instance of [`PackageRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a package, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<PackageModel>, DbErr> {
        entity::prelude::Package::find_by_id(id).one(self.db).await
    }

    /// Finds a package, kept or discarded, when it belongs to `scope`
    pub async fn find_in_scope(
        &self,
        scope: &PackageScope,
        id: Uuid,
    ) -> Result<Option<PackageModel>, DbErr> {
        entity::prelude::Package::find_by_id(id)
            .filter(scope.condition())
            .one(self.db)
            .await
    }

    /// Packages created by a transmission
    pub async fn find_by_transmission(
        &self,
        transmission_id: Uuid,
    ) -> Result<Vec<PackageModel>, DbErr> {
        entity::prelude::Package::find()
            .filter(entity::package::Column::TransmissionId.eq(transmission_id))
            .all(self.db)
            .await
    }

    /// Packages among `ids`, used to derive report statuses
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<PackageModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Package::find()
            .filter(entity::package::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await
    }

    fn filtered(&self, scope: &PackageScope, query: &ListQuery) -> Select<entity::package::Entity> {
        listing::filter(
            entity::prelude::Package::find().filter(scope.condition()),
            query,
            &[
                entity::package::Column::Reference,
                entity::package::Column::FormType,
            ],
        )
    }

    /// Lists packages in scope matching the search on reference & form type
    pub async fn list(
        &self,
        scope: &PackageScope,
        query: &ListQuery,
    ) -> Result<Page<PackageModel>, DbErr> {
        let select = listing::order(
            self.filtered(scope, query),
            query,
            &[
                ("reference", entity::package::Column::Reference),
                ("form_type", entity::package::Column::FormType),
                ("transmitted_at", entity::package::Column::TransmittedAt),
            ],
            entity::package::Column::Reference,
        );

        listing::paginate(select, query, self.db).await
    }

    pub async fn ids(&self, scope: &PackageScope, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(
            self.filtered(scope, query),
            entity::package::Column::Id,
            self.db,
        )
        .await
    }

    /// Highest sequence number used by references starting with `prefix`
    ///
    /// References read `<prefix>-NNNN`, e.g. `2026-05-0003` for the third package of May 2026.
    pub async fn last_sequence(&self, prefix: &str) -> Result<u32, DbErr> {
        let references: Vec<String> = entity::prelude::Package::find()
            .select_only()
            .column(entity::package::Column::Reference)
            .filter(entity::package::Column::Reference.starts_with(format!("{}-", prefix)))
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(references
            .iter()
            .filter_map(|reference| reference.rsplit('-').next()?.parse::<u32>().ok())
            .max()
            .unwrap_or(0))
    }

    pub async fn create(
        &self,
        mut package: entity::package::ActiveModel,
    ) -> Result<PackageModel, DbErr> {
        let now = Utc::now().naive_utc();
        package.id = ActiveValue::Set(Uuid::new_v4());
        package.created_at = ActiveValue::Set(now);
        package.updated_at = ActiveValue::Set(now);

        package.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut package: entity::package::ActiveModel,
    ) -> Result<PackageModel, DbErr> {
        package.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        package.update(self.db).await
    }
}
