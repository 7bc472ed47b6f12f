use uuid::Uuid;

use crate::server::{data::office::OfficeScope, model::auth::CurrentUser};

/// Offices a user may administer: all for super admins, their DDFIP's for DDFIP admins
pub fn office_scope(user: &CurrentUser) -> Option<OfficeScope> {
    if user.is_super_admin() {
        return Some(OfficeScope::All);
    }

    own_office_scope(user)
}

/// Offices managed through `/organisation/guichets`, DDFIP admins only
pub fn own_office_scope(user: &CurrentUser) -> Option<OfficeScope> {
    match user.ddfip_id() {
        Some(ddfip_id) if user.is_organization_admin() => Some(OfficeScope::Ddfip(ddfip_id)),
        _ => None,
    }
}

/// Whether a user may administer offices of `ddfip_id`
pub fn can_manage_office(user: &CurrentUser, ddfip_id: Uuid) -> bool {
    office_scope(user).is_some_and(|scope| scope.covers(ddfip_id))
}
