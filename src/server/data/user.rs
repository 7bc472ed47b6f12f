use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, ExprTrait, PaginatorTrait, QueryFilter, Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::UserModel,
};

/// Users visible to the caller
#[derive(Clone, Debug, PartialEq)]
pub enum UserScope {
    All,
    /// Members of one organization
    Organization {
        organization_type: String,
        organization_id: Uuid,
    },
}

impl UserScope {
    pub fn covers(&self, user: &UserModel) -> bool {
        match self {
            Self::All => true,
            Self::Organization {
                organization_type,
                organization_id,
            } => {
                user.organization_type == *organization_type
                    && user.organization_id == *organization_id
            }
        }
    }
}

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a user, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find_by_id(id).one(self.db).await
    }

    pub async fn find_kept(&self, id: Uuid) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find_by_id(id)
            .filter(entity::user::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    /// Finds a user by email, ignoring case
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await
    }

    /// Whether a user other than `except` already uses `email`
    pub async fn email_taken(&self, email: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut select = entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email.trim().to_lowercase()));

        if let Some(id) = except {
            select = select.filter(entity::user::Column::Id.ne(id));
        }

        Ok(select.count(self.db).await? > 0)
    }

    /// Finds a kept user holding a pending invitation
    pub async fn find_by_invitation_digest(
        &self,
        invitation_digest: &str,
    ) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::InvitationDigest.eq(invitation_digest))
            .filter(entity::user::Column::DiscardedAt.is_null())
            .one(self.db)
            .await
    }

    fn filtered(&self, scope: &UserScope, query: &ListQuery) -> Select<entity::user::Entity> {
        let select = match scope {
            UserScope::All => entity::prelude::User::find(),
            UserScope::Organization {
                organization_type,
                organization_id,
            } => entity::prelude::User::find()
                .filter(entity::user::Column::OrganizationType.eq(organization_type.as_str()))
                .filter(entity::user::Column::OrganizationId.eq(*organization_id)),
        };

        listing::filter(
            select,
            query,
            &[
                entity::user::Column::Email,
                entity::user::Column::FirstName,
                entity::user::Column::LastName,
            ],
        )
    }

    /// Lists users in scope matching the search on email & names
    pub async fn list(&self, scope: &UserScope, query: &ListQuery) -> Result<Page<UserModel>, DbErr> {
        let select = listing::order(
            self.filtered(scope, query),
            query,
            &[
                ("name", entity::user::Column::LastName),
                ("email", entity::user::Column::Email),
                ("organization", entity::user::Column::OrganizationId),
                ("created_at", entity::user::Column::CreatedAt),
            ],
            entity::user::Column::LastName,
        );

        listing::paginate(select, query, self.db).await
    }

    pub async fn ids(&self, scope: &UserScope, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(self.filtered(scope, query), entity::user::Column::Id, self.db).await
    }

    /// Kept users of an organization among `ids`
    pub async fn find_kept_in_organization(
        &self,
        organization_type: &str,
        organization_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<UserModel>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::OrganizationType.eq(organization_type))
            .filter(entity::user::Column::OrganizationId.eq(organization_id))
            .filter(entity::user::Column::Id.is_in(ids.iter().copied()))
            .filter(entity::user::Column::DiscardedAt.is_null())
            .all(self.db)
            .await
    }

    pub async fn create(&self, mut user: entity::user::ActiveModel) -> Result<UserModel, DbErr> {
        let now = Utc::now().naive_utc();
        user.id = ActiveValue::Set(Uuid::new_v4());
        user.created_at = ActiveValue::Set(now);
        user.updated_at = ActiveValue::Set(now);

        user.insert(self.db).await
    }

    pub async fn update(&self, mut user: entity::user::ActiveModel) -> Result<UserModel, DbErr> {
        user.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        user.update(self.db).await
    }

    /// Records a successful sign in
    pub async fn track_sign_in(&self, user_id: Uuid) -> Result<(), DbErr> {
        let now = Utc::now().naive_utc();

        entity::prelude::User::update_many()
            .col_expr(entity::user::Column::LastSignInAt, Expr::value(Some(now)))
            .col_expr(
                entity::user::Column::SignInCount,
                Expr::col(entity::user::Column::SignInCount).add(1),
            )
            .filter(entity::user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(())
    }
}
