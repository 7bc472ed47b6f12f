use crate::server::{
    data::package::PackageScope,
    model::{auth::CurrentUser, db::PackageModel},
};

/// Packages the user may see, mirroring report visibility
pub fn package_scope(user: &CurrentUser) -> PackageScope {
    if user.is_super_admin() {
        return PackageScope::All;
    }

    if let Some(collectivity_id) = user.collectivity_id() {
        return PackageScope::Collectivity(collectivity_id);
    }

    if let Some(publisher_id) = user.publisher_id() {
        return PackageScope::Publisher(publisher_id);
    }

    if let Some(ddfip_id) = user.ddfip_id() {
        return if user.is_organization_admin() {
            PackageScope::Ddfip(ddfip_id)
        } else {
            PackageScope::Offices(user.office_ids.clone())
        };
    }

    PackageScope::Transmitted
}

/// DDFIP admins acknowledge, assign, reject & reset packages of their DDFIP
pub fn can_manage_package(user: &CurrentUser, package: &PackageModel) -> bool {
    user.is_organization_admin() && user.ddfip_id() == Some(package.ddfip_id)
}

/// The owning collectivity withdraws a package
pub fn can_discard_package(user: &CurrentUser, package: &PackageModel) -> bool {
    user.collectivity_id() == Some(package.collectivity_id)
}
