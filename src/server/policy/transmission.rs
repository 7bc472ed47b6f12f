use uuid::Uuid;

use crate::server::model::auth::CurrentUser;

/// Collectivity whose reports the user transmits on the web
pub fn transmitting_collectivity(user: &CurrentUser) -> Option<Uuid> {
    user.collectivity_id()
}
