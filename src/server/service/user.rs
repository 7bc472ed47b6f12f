use std::str::FromStr;

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::user::{UserDto, UserForm},
    server::{
        data::{
            listing::{ListQuery, Page},
            office::OfficeRepository,
            organization::find_organization,
            user::{UserRepository, UserScope},
        },
        error::{auth::AuthError, validation::ValidationErrors, Error},
        model::{auth::CurrentUser, db::UserModel, organization::OrganizationType},
        policy::user::can_grant_super_admin,
        service::{found, kept},
        util::{
            secret::{digest, generate_token},
            validation::{check_format, is_email, required, BLANK, INVALID, TAKEN, UNKNOWN},
        },
    },
};

/// User created along with the plain invitation token, only available at that moment
pub struct InvitedUser {
    pub user: UserDto,
    pub invitation_token: String,
}

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists users along with their kept offices
    pub async fn list(&self, scope: &UserScope, query: &ListQuery) -> Result<Page<UserDto>, Error> {
        let page = UserRepository::new(self.db).list(scope, query).await?;
        let user_ids: Vec<Uuid> = page.records.iter().map(|u| u.id).collect();
        let mut office_ids = OfficeRepository::new(self.db)
            .office_ids_for_users(&user_ids, true)
            .await?;

        Ok(page.map(|user| {
            let offices = office_ids.remove(&user.id).unwrap_or_default();
            UserDto::new(user, offices)
        }))
    }

    pub async fn ids(&self, scope: &UserScope, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(UserRepository::new(self.db).ids(scope, query).await?)
    }

    pub async fn find(&self, id: Uuid) -> Result<UserModel, Error> {
        found(UserRepository::new(self.db).find(id).await?, "user", id)
    }

    pub async fn get(&self, id: Uuid) -> Result<UserDto, Error> {
        let user = kept(UserRepository::new(self.db).find(id).await?, "user", id)?;

        self.to_dto(user).await
    }

    /// Creates a user and an invitation to choose a password
    ///
    /// `organization` forces the user's organization, used when organization admins invite
    /// their own members.
    ///
    /// # Returns
    /// - `Ok(InvitedUser)`: the user and the plain invitation token, only its digest is stored
    /// - `Err(Error::ValidationErrors(_))`: invalid or duplicate email, missing names, unknown
    ///   organization or offices outside the user's DDFIP
    /// - `Err(Error::AuthError(AuthError::Forbidden))`: `actor` may not grant super admin rights
    pub async fn create(
        &self,
        actor: &CurrentUser,
        form: UserForm,
        organization: Option<(OrganizationType, Uuid)>,
    ) -> Result<InvitedUser, Error> {
        let validated = self.validate(actor, None, form, organization).await?;
        let invitation_token = generate_token();

        let mut user = validated.user;
        user.password_digest = ActiveValue::Set(None);
        user.invitation_digest = ActiveValue::Set(Some(digest(&invitation_token)));
        user.invited_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
        user.last_sign_in_at = ActiveValue::Set(None);
        user.sign_in_count = ActiveValue::Set(0);
        user.discarded_at = ActiveValue::Set(None);

        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn).create(user).await?;
        if let Some(office_ids) = &validated.office_ids {
            OfficeRepository::new(&txn)
                .replace_user_offices(user.id, office_ids)
                .await?;
        }
        txn.commit().await?;

        tracing::info!("Invited user {} ({})", user.id, user.organization_type);

        Ok(InvitedUser {
            user: self.to_dto(user).await?,
            invitation_token,
        })
    }

    /// Updates a kept user, fields absent from `form` are left unchanged
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        form: UserForm,
    ) -> Result<UserDto, Error> {
        let current = kept(UserRepository::new(self.db).find(id).await?, "user", id)?;
        let organization = Some((
            OrganizationType::from_str(&current.organization_type)
                .map_err(|_| Error::ParseError(current.organization_type.clone()))?,
            current.organization_id,
        ));
        let validated = self
            .validate(actor, Some(current), form, organization)
            .await?;

        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn).update(validated.user).await?;
        if let Some(office_ids) = &validated.office_ids {
            OfficeRepository::new(&txn)
                .replace_user_offices(user.id, office_ids)
                .await?;
        }
        txn.commit().await?;

        self.to_dto(user).await
    }

    async fn to_dto(&self, user: UserModel) -> Result<UserDto, Error> {
        let office_ids = OfficeRepository::new(self.db)
            .kept_office_ids_for_user(user.id)
            .await?;

        Ok(UserDto::new(user, office_ids))
    }

    async fn validate(
        &self,
        actor: &CurrentUser,
        current: Option<UserModel>,
        form: UserForm,
        forced_organization: Option<(OrganizationType, Uuid)>,
    ) -> Result<ValidatedUser, Error> {
        let mut errors = ValidationErrors::new();
        let user_repo = UserRepository::new(self.db);

        let email = required(
            &mut errors,
            "email",
            form.email,
            current.as_ref().map(|u| u.email.as_str()),
        )
        .map(|email| email.to_lowercase());
        check_format(&mut errors, "email", email.as_deref(), is_email);

        if let Some(email) = email.as_deref().filter(|e| is_email(e)) {
            if user_repo
                .email_taken(email, current.as_ref().map(|u| u.id))
                .await?
            {
                errors.add("email", TAKEN);
            }
        }

        let first_name = required(
            &mut errors,
            "first_name",
            form.first_name,
            current.as_ref().map(|u| u.first_name.as_str()),
        );
        let last_name = required(
            &mut errors,
            "last_name",
            form.last_name,
            current.as_ref().map(|u| u.last_name.as_str()),
        );

        let organization = match forced_organization {
            Some(organization) => Some(organization),
            None => match (form.organization_type.as_deref(), form.organization_id) {
                (Some(organization_type), Some(organization_id)) => {
                    match OrganizationType::from_str(organization_type) {
                        Ok(organization_type) => Some((organization_type, organization_id)),
                        Err(()) => {
                            errors.add("organization_type", INVALID);
                            None
                        }
                    }
                }
                (organization_type, organization_id) => {
                    if organization_type.is_none() {
                        errors.add("organization_type", BLANK);
                    }
                    if organization_id.is_none() {
                        errors.add("organization_id", BLANK);
                    }
                    None
                }
            },
        };

        if let Some((organization_type, organization_id)) = organization {
            let exists = find_organization(self.db, organization_type, organization_id)
                .await?
                .is_some_and(|organization| !organization.is_discarded());
            if !exists {
                errors.add("organization_id", UNKNOWN);
            }
        }

        let current_super_admin = current.as_ref().is_some_and(|u| u.super_admin);
        let super_admin = form.super_admin.unwrap_or(current_super_admin);
        if super_admin != current_super_admin && !can_grant_super_admin(actor) {
            return Err(AuthError::Forbidden {
                user_id: actor.id(),
                action: "grant super admin",
            }
            .into());
        }

        let organization_admin = form
            .organization_admin
            .or_else(|| current.as_ref().map(|u| u.organization_admin))
            .unwrap_or(false);

        let office_ids = match (form.office_ids, organization) {
            (None, _) => None,
            (Some(office_ids), Some((OrganizationType::Ddfip, ddfip_id))) => {
                let mut office_ids = office_ids;
                office_ids.sort();
                office_ids.dedup();

                let offices = OfficeRepository::new(self.db)
                    .find_kept_in_ddfip(ddfip_id, &office_ids)
                    .await?;
                if offices.len() != office_ids.len() {
                    errors.add("office_ids", INVALID);
                }
                Some(office_ids)
            }
            (Some(office_ids), _) => {
                if !office_ids.is_empty() {
                    errors.add("office_ids", INVALID);
                }
                None
            }
        };

        errors.into_result()?;

        let (organization_type, organization_id) = organization.ok_or_else(|| {
            Error::InternalError("Validated user has no organization".to_string())
        })?;

        let mut user = match current {
            Some(current) => current.into_active_model(),
            None => entity::user::ActiveModel::default(),
        };
        user.organization_type = ActiveValue::Set(organization_type.as_str().to_string());
        user.organization_id = ActiveValue::Set(organization_id);
        user.email = ActiveValue::Set(email.unwrap_or_default());
        user.first_name = ActiveValue::Set(first_name.unwrap_or_default());
        user.last_name = ActiveValue::Set(last_name.unwrap_or_default());
        user.organization_admin = ActiveValue::Set(organization_admin);
        user.super_admin = ActiveValue::Set(super_admin);

        Ok(ValidatedUser { user, office_ids })
    }
}

struct ValidatedUser {
    user: entity::user::ActiveModel,
    office_ids: Option<Vec<Uuid>>,
}

#[cfg(test)]
mod tests {

    mod create {
        use passerelle_test_utils::prelude::*;
        use sea_orm::EntityTrait;

        use crate::{
            model::user::UserForm,
            server::{
                error::{auth::AuthError, Error},
                model::organization::OrganizationType,
                policy::test_users,
                service::user::UserService,
                util::secret::digest,
            },
        };

        /// Expect an invitation digest to be stored and the plain token returned
        #[tokio::test]
        async fn invites_user() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;

            let user_service = UserService::new(&test.db);
            let result = user_service
                .create(
                    &test_users::super_admin(),
                    UserForm {
                        email: Some("Jeanne@ACME.fr".to_string()),
                        first_name: Some("Jeanne".to_string()),
                        last_name: Some("Dupont".to_string()),
                        ..Default::default()
                    },
                    Some((OrganizationType::Publisher, publisher.id)),
                )
                .await;

            assert!(result.is_ok());
            let invited = result.unwrap();
            assert_eq!(invited.user.email, "jeanne@acme.fr");
            assert!(invited.user.invited_at.is_some());

            let stored = entity::user::Entity::find_by_id(invited.user.id)
                .one(&test.db)
                .await?
                .unwrap();
            assert_eq!(
                stored.invitation_digest,
                Some(digest(&invited.invitation_token))
            );

            Ok(())
        }

        /// Expect a duplicate email to be refused
        #[tokio::test]
        async fn rejects_duplicate_email() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;
            test.user()
                .insert_user("Publisher", publisher.id, "jeanne@acme.fr")
                .await?;

            let user_service = UserService::new(&test.db);
            let result = user_service
                .create(
                    &test_users::super_admin(),
                    UserForm {
                        email: Some("jeanne@acme.fr".to_string()),
                        first_name: Some("Jeanne".to_string()),
                        last_name: Some("Dupont".to_string()),
                        ..Default::default()
                    },
                    Some((OrganizationType::Publisher, publisher.id)),
                )
                .await;

            assert!(matches!(result, Err(Error::ValidationErrors(e)) if e.contains("email")));

            Ok(())
        }

        /// Expect organization admins not to grant super admin rights
        #[tokio::test]
        async fn forbids_granting_super_admin() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let publisher = test.organization().insert_publisher("511022394").await?;

            let user_service = UserService::new(&test.db);
            let result = user_service
                .create(
                    &test_users::publisher_user(true),
                    UserForm {
                        email: Some("jeanne@acme.fr".to_string()),
                        first_name: Some("Jeanne".to_string()),
                        last_name: Some("Dupont".to_string()),
                        super_admin: Some(true),
                        ..Default::default()
                    },
                    Some((OrganizationType::Publisher, publisher.id)),
                )
                .await;

            assert!(matches!(
                result,
                Err(Error::AuthError(AuthError::Forbidden { .. }))
            ));

            Ok(())
        }
    }

    mod update {
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::user::UserForm,
            server::{error::Error, policy::test_users, service::user::UserService},
        };

        /// Expect DDFIP users to only join offices of their DDFIP
        #[tokio::test]
        async fn restricts_offices_to_ddfip() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let ddfip = test.organization().insert_ddfip("64").await?;
            let other_ddfip = test.organization().insert_ddfip("40").await?;
            let office = test
                .organization()
                .insert_office(ddfip.id, &["evaluation_local_habitation"])
                .await?;
            let foreign_office = test
                .organization()
                .insert_office(other_ddfip.id, &["evaluation_local_habitation"])
                .await?;
            let user = test
                .user()
                .insert_user("DDFIP", ddfip.id, "agent@dgfip.finances.gouv.fr")
                .await?;

            let user_service = UserService::new(&test.db);
            let actor = test_users::super_admin();

            let updated = user_service
                .update(
                    &actor,
                    user.id,
                    UserForm {
                        office_ids: Some(vec![office.id]),
                        ..Default::default()
                    },
                )
                .await;
            let refused = user_service
                .update(
                    &actor,
                    user.id,
                    UserForm {
                        office_ids: Some(vec![foreign_office.id]),
                        ..Default::default()
                    },
                )
                .await;

            assert!(updated.is_ok());
            assert_eq!(updated.unwrap().office_ids, vec![office.id]);
            assert!(matches!(refused, Err(Error::ValidationErrors(e)) if e.contains("office_ids")));

            Ok(())
        }
    }
}
