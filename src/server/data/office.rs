use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::OfficeModel,
};

/// Offices visible to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum OfficeScope {
    All,
    Ddfip(Uuid),
}

impl OfficeScope {
    /// Whether offices of `ddfip_id` belong to this scope
    pub fn covers(&self, ddfip_id: Uuid) -> bool {
        match self {
            Self::All => true,
            Self::Ddfip(own) => *own == ddfip_id,
        }
    }

    /// DDFIP forced on offices created within this scope
    pub fn ddfip_id(&self) -> Option<Uuid> {
        match self {
            Self::All => None,
            Self::Ddfip(ddfip_id) => Some(*ddfip_id),
        }
    }
}

pub struct OfficeRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OfficeRepository<'a, C> {
    /// Creates a new instance of [`OfficeRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds an office, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<OfficeModel>, DbErr> {
        entity::prelude::Office::find_by_id(id).one(self.db).await
    }

    pub async fn find_kept(&self, id: Uuid) -> Result<Option<OfficeModel>, DbErr> {
        entity::prelude::Office::find_by_id(id)
            .filter(entity::office::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    fn filtered(&self, scope: &OfficeScope, query: &ListQuery) -> Select<entity::office::Entity> {
        let select = match scope {
            OfficeScope::All => entity::prelude::Office::find(),
            OfficeScope::Ddfip(ddfip_id) => entity::prelude::Office::find()
                .filter(entity::office::Column::DdfipId.eq(*ddfip_id)),
        };

        listing::filter(select, query, &[entity::office::Column::Name])
    }

    /// Lists offices in scope matching the search on name
    pub async fn list(
        &self,
        scope: &OfficeScope,
        query: &ListQuery,
    ) -> Result<Page<OfficeModel>, DbErr> {
        let select = listing::order(
            self.filtered(scope, query),
            query,
            &[
                ("name", entity::office::Column::Name),
                ("ddfip", entity::office::Column::DdfipId),
            ],
            entity::office::Column::Name,
        );

        listing::paginate(select, query, self.db).await
    }

    pub async fn ids(&self, scope: &OfficeScope, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(
            self.filtered(scope, query),
            entity::office::Column::Id,
            self.db,
        )
        .await
    }

    pub async fn create(
        &self,
        mut office: entity::office::ActiveModel,
    ) -> Result<OfficeModel, DbErr> {
        let now = Utc::now().naive_utc();
        office.id = ActiveValue::Set(Uuid::new_v4());
        office.created_at = ActiveValue::Set(now);
        office.updated_at = ActiveValue::Set(now);

        office.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut office: entity::office::ActiveModel,
    ) -> Result<OfficeModel, DbErr> {
        office.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        office.update(self.db).await
    }

    /// Codes INSEE of the communes covered by an office
    pub async fn codes_insee(&self, office_id: Uuid) -> Result<Vec<String>, DbErr> {
        entity::prelude::OfficeCommune::find()
            .select_only()
            .column(entity::office_commune::Column::CodeInsee)
            .filter(entity::office_commune::Column::OfficeId.eq(office_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// IDs of the users belonging to an office
    pub async fn user_ids(&self, office_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        entity::prelude::OfficeUser::find()
            .select_only()
            .column(entity::office_user::Column::UserId)
            .filter(entity::office_user::Column::OfficeId.eq(office_id))
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Replaces the communes covered by an office
    pub async fn replace_communes(&self, office_id: Uuid, codes_insee: &[String]) -> Result<(), DbErr> {
        entity::prelude::OfficeCommune::delete_many()
            .filter(entity::office_commune::Column::OfficeId.eq(office_id))
            .exec(self.db)
            .await?;

        if codes_insee.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let rows = codes_insee
            .iter()
            .map(|code_insee| entity::office_commune::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                office_id: ActiveValue::Set(office_id),
                code_insee: ActiveValue::Set(code_insee.clone()),
                created_at: ActiveValue::Set(now),
            });

        entity::prelude::OfficeCommune::insert_many(rows)
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// Replaces the users belonging to an office
    pub async fn replace_users(&self, office_id: Uuid, user_ids: &[Uuid]) -> Result<(), DbErr> {
        entity::prelude::OfficeUser::delete_many()
            .filter(entity::office_user::Column::OfficeId.eq(office_id))
            .exec(self.db)
            .await?;

        self.insert_memberships(user_ids.iter().map(|user_id| (office_id, *user_id)))
            .await
    }

    /// Replaces the offices a user belongs to
    pub async fn replace_user_offices(&self, user_id: Uuid, office_ids: &[Uuid]) -> Result<(), DbErr> {
        entity::prelude::OfficeUser::delete_many()
            .filter(entity::office_user::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        self.insert_memberships(office_ids.iter().map(|office_id| (*office_id, user_id)))
            .await
    }

    async fn insert_memberships(
        &self,
        memberships: impl Iterator<Item = (Uuid, Uuid)>,
    ) -> Result<(), DbErr> {
        let now = Utc::now().naive_utc();
        let rows: Vec<entity::office_user::ActiveModel> = memberships
            .map(|(office_id, user_id)| entity::office_user::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                office_id: ActiveValue::Set(office_id),
                user_id: ActiveValue::Set(user_id),
                created_at: ActiveValue::Set(now),
            })
            .collect();

        if rows.is_empty() {
            return Ok(());
        }

        entity::prelude::OfficeUser::insert_many(rows)
            .exec_without_returning(self.db)
            .await?;

        Ok(())
    }

    /// IDs of the kept offices a user belongs to
    pub async fn kept_office_ids_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        Ok(self
            .office_ids_for_users(&[user_id], true)
            .await?
            .remove(&user_id)
            .unwrap_or_default())
    }

    /// Office IDs grouped by user, optionally restricted to kept offices
    pub async fn office_ids_for_users(
        &self,
        user_ids: &[Uuid],
        kept_only: bool,
    ) -> Result<HashMap<Uuid, Vec<Uuid>>, DbErr> {
        let mut select = entity::prelude::OfficeUser::find()
            .select_only()
            .column(entity::office_user::Column::UserId)
            .column(entity::office_user::Column::OfficeId)
            .filter(entity::office_user::Column::UserId.is_in(user_ids.iter().copied()));

        if kept_only {
            select = select.filter(
                entity::office_user::Column::OfficeId.in_subquery(
                    sea_orm::QueryTrait::into_query(
                        entity::prelude::Office::find()
                            .select_only()
                            .column(entity::office::Column::Id)
                            .filter(entity::office::Column::DiscardedAt.is_null()),
                    ),
                ),
            );
        }

        let pairs: Vec<(Uuid, Uuid)> = select.into_tuple().all(self.db).await?;

        let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (user_id, office_id) in pairs {
            grouped.entry(user_id).or_default().push(office_id);
        }

        Ok(grouped)
    }

    /// Kept offices of a DDFIP among `ids`
    pub async fn find_kept_in_ddfip(
        &self,
        ddfip_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<OfficeModel>, DbErr> {
        entity::prelude::Office::find()
            .filter(entity::office::Column::DdfipId.eq(ddfip_id))
            .filter(entity::office::Column::Id.is_in(ids.iter().copied()))
            .filter(entity::office::Column::DiscardedAt.is_null())
            .all(self.db)
            .await
    }
}
