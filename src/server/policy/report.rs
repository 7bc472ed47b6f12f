use uuid::Uuid;

use crate::server::{
    data::report::ReportScope,
    model::{
        auth::CurrentUser,
        db::{PackageModel, ReportModel},
    },
};

/// Reports the user may see
pub fn report_scope(user: &CurrentUser) -> ReportScope {
    if user.is_super_admin() {
        return ReportScope::All;
    }

    if let Some(collectivity_id) = user.collectivity_id() {
        return ReportScope::Collectivity(collectivity_id);
    }

    if let Some(publisher_id) = user.publisher_id() {
        return ReportScope::Publisher(publisher_id);
    }

    if let Some(ddfip_id) = user.ddfip_id() {
        return if user.is_organization_admin() {
            ReportScope::Ddfip(ddfip_id)
        } else {
            ReportScope::Offices(user.office_ids.clone())
        };
    }

    ReportScope::Transmitted
}

/// Collectivity whose reports the user creates, collectivity users only
pub fn reporting_collectivity(user: &CurrentUser) -> Option<Uuid> {
    user.collectivity_id()
}

/// Collectivity users edit their own collectivity's web reports
///
/// Covers update, completion and discard. Reports made through the API belong to the
/// publisher and stay read-only on the web.
pub fn can_edit_report(user: &CurrentUser, report: &ReportModel) -> bool {
    user.collectivity_id() == Some(report.collectivity_id) && report.publisher_id.is_none()
}

/// DDFIP admins of the package's DDFIP and members of the assigned office decide on reports
pub fn can_decide_report(user: &CurrentUser, package: &PackageModel) -> bool {
    if user.ddfip_id() != Some(package.ddfip_id) {
        return false;
    }

    if user.is_organization_admin() {
        return true;
    }

    match package.office_id {
        Some(office_id) => package.assigned_at.is_some() && user.office_ids.contains(&office_id),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use passerelle_test_utils::prelude::*;
    use uuid::Uuid;

    use crate::server::{
        data::report::ReportScope,
        policy::{report::*, test_users},
    };

    /// Expect each organization kind to get its own visibility scope
    #[test]
    fn derives_scope_from_organization() {
        let office_id = Uuid::new_v4();
        let collectivity = test_users::collectivity_user(false);
        let publisher = test_users::publisher_user(false);
        let ddfip_admin = test_users::ddfip_user(true, Vec::new());

        assert_eq!(report_scope(&test_users::super_admin()), ReportScope::All);
        assert_eq!(
            report_scope(&collectivity),
            ReportScope::Collectivity(collectivity.organization_id())
        );
        assert_eq!(
            report_scope(&publisher),
            ReportScope::Publisher(publisher.organization_id())
        );
        assert_eq!(
            report_scope(&ddfip_admin),
            ReportScope::Ddfip(ddfip_admin.organization_id())
        );
        assert_eq!(
            report_scope(&test_users::ddfip_user(false, vec![office_id])),
            ReportScope::Offices(vec![office_id])
        );
        assert_eq!(report_scope(&test_users::dgfip_user()), ReportScope::Transmitted);
    }

    /// Expect API reports to stay read-only for the collectivity
    #[test]
    fn forbids_editing_api_reports() {
        let user = test_users::collectivity_user(false);
        let web_report = factory::report(user.organization_id(), "evaluation_local_habitation");
        let api_report = entity::report::Model {
            publisher_id: Some(Uuid::new_v4()),
            ..factory::report(user.organization_id(), "evaluation_local_habitation")
        };
        let other_report = factory::report(Uuid::new_v4(), "evaluation_local_habitation");

        assert_eq!(reporting_collectivity(&user), Some(user.organization_id()));
        assert_eq!(reporting_collectivity(&test_users::publisher_user(true)), None);
        assert!(can_edit_report(&user, &web_report));
        assert!(!can_edit_report(&user, &api_report));
        assert!(!can_edit_report(&user, &other_report));
    }

    /// Expect office members to decide only once the package is assigned to their office
    #[test]
    fn lets_assigned_office_members_decide() {
        let office_id = Uuid::new_v4();
        let member = test_users::ddfip_user(false, vec![office_id]);
        let package = factory::package(
            "2026-05-0001",
            "evaluation_local_habitation",
            Uuid::new_v4(),
            member.organization_id(),
            Uuid::new_v4(),
        );
        let assigned = entity::package::Model {
            office_id: Some(office_id),
            assigned_at: Some(Utc::now().naive_utc()),
            ..package.clone()
        };

        assert!(!can_decide_report(&member, &package));
        assert!(can_decide_report(&member, &assigned));

        let admin = test_users::ddfip_user(true, Vec::new());
        assert!(can_decide_report(
            &admin,
            &entity::package::Model {
                ddfip_id: admin.organization_id(),
                ..package
            }
        ));
    }
}
