use crate::server::model::auth::CurrentUser;

/// Any signed in user may browse territories
pub fn can_read_territories(_user: &CurrentUser) -> bool {
    true
}

/// Renaming and importing territories is reserved to super admins
pub fn can_manage_territories(user: &CurrentUser) -> bool {
    user.is_super_admin()
}
