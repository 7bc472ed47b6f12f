use uuid::Uuid;

use crate::server::model::auth::CurrentUser;

/// Publisher whose OAuth applications the user administers
pub fn oauth_owner(user: &CurrentUser) -> Option<Uuid> {
    user.publisher_id().filter(|_| user.is_organization_admin())
}
