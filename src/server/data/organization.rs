use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use uuid::Uuid;

use crate::server::model::organization::{Organization, OrganizationType};

/// Load the organization of the given type & ID, kept or discarded.
pub async fn find_organization<C: ConnectionTrait>(
    db: &C,
    organization_type: OrganizationType,
    organization_id: Uuid,
) -> Result<Option<Organization>, DbErr> {
    let organization = match organization_type {
        OrganizationType::Publisher => entity::prelude::Publisher::find_by_id(organization_id)
            .one(db)
            .await?
            .map(Organization::Publisher),
        OrganizationType::Collectivity => {
            entity::prelude::Collectivity::find_by_id(organization_id)
                .one(db)
                .await?
                .map(Organization::Collectivity)
        }
        OrganizationType::Ddfip => entity::prelude::Ddfip::find_by_id(organization_id)
            .one(db)
            .await?
            .map(Organization::Ddfip),
        OrganizationType::Dgfip => entity::prelude::Dgfip::find_by_id(organization_id)
            .one(db)
            .await?
            .map(Organization::Dgfip),
    };

    Ok(organization)
}

#[cfg(test)]
mod tests {
    use passerelle_test_utils::prelude::*;
    use uuid::Uuid;

    use crate::server::{
        data::organization::find_organization,
        model::organization::{Organization, OrganizationType},
    };

    /// Expect the organization to be loaded through its type only
    #[tokio::test]
    async fn loads_organization_by_type() -> Result<(), TestError> {
        let test = TestBuilder::new().with_tables().build().await?;
        let ddfip = test.organization().insert_ddfip("64").await?;

        let found = find_organization(&test.db, OrganizationType::Ddfip, ddfip.id).await?;
        let mismatched = find_organization(&test.db, OrganizationType::Dgfip, ddfip.id).await?;
        let missing = find_organization(&test.db, OrganizationType::Ddfip, Uuid::new_v4()).await?;

        assert!(matches!(found, Some(Organization::Ddfip(d)) if d.id == ddfip.id));
        assert!(mismatched.is_none());
        assert!(missing.is_none());

        Ok(())
    }
}
