use crate::server::{data::collectivity::CollectivityScope, model::auth::CurrentUser};

/// Publishers, DDFIPs & DGFIPs are administered by super admins only
pub fn can_manage_organizations(user: &CurrentUser) -> bool {
    user.is_super_admin()
}

/// Collectivities a user may administer, `None` when none
///
/// Super admins administer every collectivity, publisher admins the ones they manage.
pub fn collectivity_scope(user: &CurrentUser) -> Option<CollectivityScope> {
    if user.is_super_admin() {
        return Some(CollectivityScope::All);
    }

    match user.publisher_id() {
        Some(publisher_id) if user.is_organization_admin() => {
            Some(CollectivityScope::Publisher(publisher_id))
        }
        _ => None,
    }
}

/// Collectivities managed through `/organisation`, publisher admins only
pub fn own_collectivity_scope(user: &CurrentUser) -> Option<CollectivityScope> {
    match user.publisher_id() {
        Some(publisher_id) if user.is_organization_admin() => {
            Some(CollectivityScope::Publisher(publisher_id))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::server::{
        data::collectivity::CollectivityScope,
        policy::{organization::*, test_users},
    };

    /// Expect only super admins to manage organizations
    #[test]
    fn manage_organizations_requires_super_admin() {
        assert!(can_manage_organizations(&test_users::super_admin()));
        assert!(!can_manage_organizations(&test_users::dgfip_user()));
        assert!(!can_manage_organizations(&test_users::publisher_user(true)));
    }

    /// Expect publisher admins to be scoped to their collectivities
    #[test]
    fn scopes_publisher_admin_collectivities() {
        let admin = test_users::publisher_user(true);

        assert_eq!(
            own_collectivity_scope(&admin),
            Some(CollectivityScope::Publisher(admin.organization_id()))
        );
        assert_eq!(own_collectivity_scope(&test_users::publisher_user(false)), None);
        assert_eq!(own_collectivity_scope(&test_users::collectivity_user(true)), None);
        assert_eq!(
            collectivity_scope(&test_users::super_admin()),
            Some(CollectivityScope::All)
        );
    }
}
