use chrono::{TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    Select,
};
use uuid::Uuid;

use crate::server::{
    data::listing::{self, ListQuery, Page},
    model::db::{OauthAccessTokenModel, OauthApplicationModel},
};

pub struct OauthApplicationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> OauthApplicationRepository<'a, C> {
    /// Creates a new instance of [`OauthApplicationRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds an application, kept or discarded
    pub async fn find(&self, id: Uuid) -> Result<Option<OauthApplicationModel>, DbErr> {
        entity::prelude::OauthApplication::find_by_id(id)
            .one(self.db)
            .await
    }

    fn filtered(
        &self,
        owner_id: Uuid,
        query: &ListQuery,
    ) -> Select<entity::oauth_application::Entity> {
        listing::filter(
            entity::prelude::OauthApplication::find()
                .filter(entity::oauth_application::Column::OwnerId.eq(owner_id)),
            query,
            &[
                entity::oauth_application::Column::Name,
                entity::oauth_application::Column::Uid,
            ],
        )
    }

    /// Lists the applications of a publisher
    pub async fn list(
        &self,
        owner_id: Uuid,
        query: &ListQuery,
    ) -> Result<Page<OauthApplicationModel>, DbErr> {
        let select = listing::order(
            self.filtered(owner_id, query),
            query,
            &[
                ("name", entity::oauth_application::Column::Name),
                ("created_at", entity::oauth_application::Column::CreatedAt),
            ],
            entity::oauth_application::Column::Name,
        );

        listing::paginate(select, query, self.db).await
    }

    pub async fn ids(&self, owner_id: Uuid, query: &ListQuery) -> Result<Vec<Uuid>, DbErr> {
        listing::select_ids(
            self.filtered(owner_id, query),
            entity::oauth_application::Column::Id,
            self.db,
        )
        .await
    }

    pub async fn create(
        &self,
        mut application: entity::oauth_application::ActiveModel,
    ) -> Result<OauthApplicationModel, DbErr> {
        let now = Utc::now().naive_utc();
        application.id = ActiveValue::Set(Uuid::new_v4());
        application.created_at = ActiveValue::Set(now);
        application.updated_at = ActiveValue::Set(now);

        application.insert(self.db).await
    }

    pub async fn update(
        &self,
        mut application: entity::oauth_application::ActiveModel,
    ) -> Result<OauthApplicationModel, DbErr> {
        application.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        application.update(self.db).await
    }
}

pub struct AccessTokenRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AccessTokenRepository<'a, C> {
    /// Creates a new instance of [`AccessTokenRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Finds a usable token by digest along with its application
    ///
    /// Revoked or expired tokens and discarded applications are ignored.
    pub async fn find_active_by_digest(
        &self,
        token_digest: &str,
    ) -> Result<Option<(OauthAccessTokenModel, OauthApplicationModel)>, DbErr> {
        let found = entity::prelude::OauthAccessToken::find()
            .filter(entity::oauth_access_token::Column::TokenDigest.eq(token_digest))
            .filter(entity::oauth_access_token::Column::RevokedAt.is_null())
            .find_also_related(entity::prelude::OauthApplication)
            .one(self.db)
            .await?;

        let Some((token, Some(application))) = found else {
            return Ok(None);
        };

        if application.discarded_at.is_some() || is_expired(&token) {
            return Ok(None);
        }

        Ok(Some((token, application)))
    }
}

/// Lifetimes out of the representable range count as expired
fn is_expired(token: &OauthAccessTokenModel) -> bool {
    let Some(seconds) = token.expires_in else {
        return false;
    };

    match TimeDelta::try_seconds(seconds).and_then(|ttl| token.created_at.checked_add_signed(ttl)) {
        Some(expires_at) => expires_at <= Utc::now().naive_utc(),
        None => true,
    }
}
