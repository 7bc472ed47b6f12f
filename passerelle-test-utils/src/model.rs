//! Database model type aliases for test utilities.
//!
//! These aliases match those in the main passerelle crate so fixtures and tests read the same.

pub type RegionModel = entity::region::Model;
pub type DepartementModel = entity::departement::Model;
pub type EpciModel = entity::epci::Model;
pub type CommuneModel = entity::commune::Model;
pub type PublisherModel = entity::publisher::Model;
pub type CollectivityModel = entity::collectivity::Model;
pub type DdfipModel = entity::ddfip::Model;
pub type DgfipModel = entity::dgfip::Model;
pub type OfficeModel = entity::office::Model;
pub type UserModel = entity::user::Model;
pub type ReportModel = entity::report::Model;
pub type PackageModel = entity::package::Model;
pub type TransmissionModel = entity::transmission::Model;
pub type OauthApplicationModel = entity::oauth_application::Model;
pub type OauthAccessTokenModel = entity::oauth_access_token::Model;
