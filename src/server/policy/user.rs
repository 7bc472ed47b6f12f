use uuid::Uuid;

use crate::server::{
    data::user::UserScope,
    model::{auth::CurrentUser, organization::OrganizationType},
};

/// Users a user may administer
///
/// Super admins administer every user, organization admins their organization's members.
pub fn user_scope(user: &CurrentUser) -> Option<UserScope> {
    if user.is_super_admin() {
        return Some(UserScope::All);
    }

    own_organization_scope(user)
}

/// Members administered through `/organisation/utilisateurs`
pub fn own_organization_scope(user: &CurrentUser) -> Option<UserScope> {
    if !user.is_organization_admin() {
        return None;
    }

    Some(UserScope::Organization {
        organization_type: user.organization_type().as_str().to_string(),
        organization_id: user.organization_id(),
    })
}

/// Whether a user may administer users of the given organization
pub fn can_manage_members_of(
    user: &CurrentUser,
    organization_type: OrganizationType,
    organization_id: Uuid,
) -> bool {
    if user.is_super_admin() {
        return true;
    }

    user.is_organization_admin()
        && user.organization_type() == organization_type
        && user.organization_id() == organization_id
}

/// Only super admins may grant or revoke super admin rights
pub fn can_grant_super_admin(user: &CurrentUser) -> bool {
    user.is_super_admin()
}
