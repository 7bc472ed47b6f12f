//! Database model type aliases.
//!
//! Short names for the SeaORM models of the `entity` crate, used throughout the server.

/// Region, imported from the INSEE geographic code
pub type RegionModel = entity::region::Model;
/// Département, imported from the INSEE geographic code
pub type DepartementModel = entity::departement::Model;
/// EPCI (établissement public de coopération intercommunale)
pub type EpciModel = entity::epci::Model;
/// Commune, identified by its INSEE code
pub type CommuneModel = entity::commune::Model;

/// Software publisher transmitting reports on behalf of collectivities through the API
pub type PublisherModel = entity::publisher::Model;
/// Local authority (commune, EPCI, département or région) emitting reports
///
/// `territory_type` & `territory_id` point to the territory record the collectivity
/// administers.
pub type CollectivityModel = entity::collectivity::Model;
/// Departmental directorate of public finances receiving packages
pub type DdfipModel = entity::ddfip::Model;
/// General directorate of public finances, read access to every transmitted report
pub type DgfipModel = entity::dgfip::Model;
/// DDFIP service desk ("guichet") processing reports of its competences
pub type OfficeModel = entity::office::Model;
pub type OfficeUserModel = entity::office_user::Model;
pub type OfficeCommuneModel = entity::office_commune::Model;

/// User of any organization, `organization_type` & `organization_id` point to it
pub type UserModel = entity::user::Model;

pub type ReportModel = entity::report::Model;
pub type PackageModel = entity::package::Model;
pub type TransmissionModel = entity::transmission::Model;

pub type OauthApplicationModel = entity::oauth_application::Model;
pub type OauthAccessTokenModel = entity::oauth_access_token::Model;
