//! Authorization rules.
//!
//! Policies are plain functions of the signed in [`CurrentUser`]: `can_*` answer a yes/no
//! question, `*_scope` return the records the user may see. Controllers call them before
//! any write, once the targeted record is loaded when the rule depends on it.

pub mod oauth;
pub mod office;
pub mod organization;
pub mod package;
pub mod report;
pub mod territory;
pub mod transmission;
pub mod user;

use crate::server::{
    error::{auth::AuthError, Error},
    model::auth::CurrentUser,
};

/// Turns a policy answer into a 403 when it is `false`
pub fn authorize(user: &CurrentUser, allowed: bool, action: &'static str) -> Result<(), Error> {
    if allowed {
        Ok(())
    } else {
        Err(AuthError::Forbidden {
            user_id: user.id(),
            action,
        }
        .into())
    }
}

/// Unwraps the scope granted to a user, 403 when none is
pub fn scoped<S>(user: &CurrentUser, scope: Option<S>, action: &'static str) -> Result<S, Error> {
    scope.ok_or_else(|| {
        AuthError::Forbidden {
            user_id: user.id(),
            action,
        }
        .into()
    })
}

#[cfg(test)]
pub(crate) mod test_users {
    use passerelle_test_utils::prelude::*;
    use uuid::Uuid;

    use crate::server::model::{auth::CurrentUser, organization::Organization};

    pub fn super_admin() -> CurrentUser {
        let dgfip = factory::dgfip();
        CurrentUser {
            user: entity::user::Model {
                super_admin: true,
                organization_admin: true,
                ..factory::user("DGFIP", dgfip.id, "admin@dgfip.finances.gouv.fr")
            },
            organization: Organization::Dgfip(dgfip),
            office_ids: Vec::new(),
        }
    }

    pub fn dgfip_user() -> CurrentUser {
        let dgfip = factory::dgfip();
        CurrentUser {
            user: factory::user("DGFIP", dgfip.id, "agent@dgfip.finances.gouv.fr"),
            organization: Organization::Dgfip(dgfip),
            office_ids: Vec::new(),
        }
    }

    pub fn publisher_user(admin: bool) -> CurrentUser {
        let publisher = factory::publisher("511022394");
        CurrentUser {
            user: entity::user::Model {
                organization_admin: admin,
                ..factory::user("Publisher", publisher.id, "dev@acme.fr")
            },
            organization: Organization::Publisher(publisher),
            office_ids: Vec::new(),
        }
    }

    pub fn collectivity_user(admin: bool) -> CurrentUser {
        let collectivity = factory::collectivity("Commune", Uuid::new_v4(), "216401024", None);
        CurrentUser {
            user: entity::user::Model {
                organization_admin: admin,
                ..factory::user("Collectivity", collectivity.id, "agent@pau.fr")
            },
            organization: Organization::Collectivity(collectivity),
            office_ids: Vec::new(),
        }
    }

    pub fn ddfip_user(admin: bool, office_ids: Vec<Uuid>) -> CurrentUser {
        let ddfip = factory::ddfip(TEST_CODE_DEPARTEMENT);
        CurrentUser {
            user: entity::user::Model {
                organization_admin: admin,
                ..factory::user("DDFIP", ddfip.id, "agent@dgfip.finances.gouv.fr")
            },
            organization: Organization::Ddfip(ddfip),
            office_ids,
        }
    }
}
