use uuid::Uuid;

use crate::server::model::{
    db::{OauthAccessTokenModel, OauthApplicationModel, PublisherModel, UserModel},
    organization::{Organization, OrganizationType},
};

/// User signed in on the web surface, with their organization and office memberships.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: UserModel,
    pub organization: Organization,
    /// Kept offices the user belongs to, only DDFIP users have some
    pub office_ids: Vec<Uuid>,
}

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_super_admin(&self) -> bool {
        self.user.super_admin
    }

    pub fn is_organization_admin(&self) -> bool {
        self.user.organization_admin
    }

    pub fn organization_type(&self) -> OrganizationType {
        self.organization.organization_type()
    }

    pub fn organization_id(&self) -> Uuid {
        self.organization.id()
    }

    /// Collectivity ID when the user belongs to a collectivity
    pub fn collectivity_id(&self) -> Option<Uuid> {
        match &self.organization {
            Organization::Collectivity(collectivity) => Some(collectivity.id),
            _ => None,
        }
    }

    /// Publisher ID when the user belongs to a publisher
    pub fn publisher_id(&self) -> Option<Uuid> {
        match &self.organization {
            Organization::Publisher(publisher) => Some(publisher.id),
            _ => None,
        }
    }

    /// DDFIP ID when the user belongs to a DDFIP
    pub fn ddfip_id(&self) -> Option<Uuid> {
        match &self.organization {
            Organization::Ddfip(ddfip) => Some(ddfip.id),
            _ => None,
        }
    }

    pub fn is_dgfip(&self) -> bool {
        matches!(self.organization, Organization::Dgfip(_))
    }
}

/// Publisher application authenticated with a bearer token on the API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub publisher: PublisherModel,
    pub application: OauthApplicationModel,
    pub token: OauthAccessTokenModel,
}

impl ApiClient {
    pub fn publisher_id(&self) -> Uuid {
        self.publisher.id
    }
}
