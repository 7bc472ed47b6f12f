//! Factory functions for generating mock database models.
//!
//! Provides pure functions returning in-memory models with standard test values. They don't
//! touch the database; fixtures insert them, and unit tests may use them directly. Tests
//! tweak fields (e.g. `discarded_at`) before handing a model to a `save_*` fixture.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::model::{
    CollectivityModel, CommuneModel, DdfipModel, DepartementModel, DgfipModel, EpciModel,
    OauthAccessTokenModel, OauthApplicationModel, OfficeModel, PackageModel, PublisherModel,
    RegionModel, ReportModel, TransmissionModel, UserModel,
};

/// Create a mock region model.
pub fn region(code_region: &str) -> RegionModel {
    let now = Utc::now().naive_utc();
    RegionModel {
        id: Uuid::new_v4(),
        code_region: code_region.to_string(),
        name: format!("Région {}", code_region),
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock département model attached to `code_region`.
pub fn departement(code_departement: &str, code_region: &str) -> DepartementModel {
    let now = Utc::now().naive_utc();
    DepartementModel {
        id: Uuid::new_v4(),
        code_departement: code_departement.to_string(),
        code_region: code_region.to_string(),
        name: format!("Département {}", code_departement),
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock EPCI model.
pub fn epci(siren: &str, code_departement: Option<&str>) -> EpciModel {
    let now = Utc::now().naive_utc();
    EpciModel {
        id: Uuid::new_v4(),
        siren: siren.to_string(),
        name: format!("CA {}", siren),
        nature: Some("CA".to_string()),
        code_departement: code_departement.map(str::to_string),
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock commune model.
///
/// # Arguments
/// - `code_insee` - Five character INSEE code, its first two characters should match the département
/// - `code_departement` - Département code
/// - `siren_epci` - SIREN of the EPCI the commune belongs to, if any
pub fn commune(code_insee: &str, code_departement: &str, siren_epci: Option<&str>) -> CommuneModel {
    let now = Utc::now().naive_utc();
    CommuneModel {
        id: Uuid::new_v4(),
        code_insee: code_insee.to_string(),
        name: format!("Commune {}", code_insee),
        code_departement: code_departement.to_string(),
        siren_epci: siren_epci.map(str::to_string),
        code_arrondissement: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn publisher(siren: &str) -> PublisherModel {
    let now = Utc::now().naive_utc();
    PublisherModel {
        id: Uuid::new_v4(),
        name: format!("Éditeur {}", siren),
        siren: siren.to_string(),
        email: Some(format!("contact@editeur-{}.fr", siren)),
        contact_first_name: None,
        contact_last_name: None,
        contact_email: None,
        contact_phone: None,
        domain_restriction: None,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock collectivity model.
///
/// # Arguments
/// - `territory_type` - One of `Commune`, `EPCI`, `Departement` or `Region`
/// - `territory_id` - ID of the territory record
/// - `siren` - SIREN of the collectivity
/// - `publisher_id` - Publisher managing the collectivity, if any
pub fn collectivity(
    territory_type: &str,
    territory_id: Uuid,
    siren: &str,
    publisher_id: Option<Uuid>,
) -> CollectivityModel {
    let now = Utc::now().naive_utc();
    CollectivityModel {
        id: Uuid::new_v4(),
        territory_type: territory_type.to_string(),
        territory_id,
        publisher_id,
        name: format!("Collectivité {}", siren),
        siren: siren.to_string(),
        contact_first_name: None,
        contact_last_name: None,
        contact_email: None,
        contact_phone: None,
        domain_restriction: None,
        allow_publisher_management: false,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn ddfip(code_departement: &str) -> DdfipModel {
    let now = Utc::now().naive_utc();
    DdfipModel {
        id: Uuid::new_v4(),
        code_departement: code_departement.to_string(),
        name: format!("DDFIP {}", code_departement),
        contact_first_name: None,
        contact_last_name: None,
        contact_email: None,
        contact_phone: None,
        domain_restriction: None,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn dgfip() -> DgfipModel {
    let now = Utc::now().naive_utc();
    DgfipModel {
        id: Uuid::new_v4(),
        name: "Direction Générale des Finances Publiques".to_string(),
        contact_first_name: None,
        contact_last_name: None,
        contact_email: None,
        contact_phone: None,
        domain_restriction: None,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock office model with the given competences (form types).
pub fn office(ddfip_id: Uuid, competences: &[&str]) -> OfficeModel {
    let now = Utc::now().naive_utc();
    OfficeModel {
        id: Uuid::new_v4(),
        ddfip_id,
        name: "SIP Bayonne".to_string(),
        competences: serde_json::json!(competences),
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock user model without password.
///
/// # Arguments
/// - `organization_type` - One of `Publisher`, `Collectivity`, `DDFIP` or `DGFIP`
/// - `organization_id` - ID of the organization record
/// - `email` - Unique email address
pub fn user(organization_type: &str, organization_id: Uuid, email: &str) -> UserModel {
    let now = Utc::now().naive_utc();
    UserModel {
        id: Uuid::new_v4(),
        organization_type: organization_type.to_string(),
        organization_id,
        email: email.to_string(),
        first_name: "Marc".to_string(),
        last_name: "Debomy".to_string(),
        organization_admin: false,
        super_admin: false,
        password_digest: None,
        invitation_digest: None,
        invited_at: None,
        last_sign_in_at: None,
        sign_in_count: 0,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock draft report for `collectivity_id`.
///
/// The report has no anomaly and no situation, it is not ready for completion.
pub fn report(collectivity_id: Uuid, form_type: &str) -> ReportModel {
    let now = Utc::now().naive_utc();
    ReportModel {
        id: Uuid::new_v4(),
        collectivity_id,
        publisher_id: None,
        transmission_id: None,
        package_id: None,
        reference: None,
        form_type: form_type.to_string(),
        anomalies: serde_json::json!([]),
        priority: "medium".to_string(),
        code_insee: None,
        date_constat: None,
        situation_annee_majic: None,
        situation_invariant: None,
        situation_parcelle: None,
        situation_adresse: None,
        situation_proprietaire: None,
        situation_categorie: None,
        proposition_categorie: None,
        proposition_adresse: None,
        proposition_surface: None,
        observations: None,
        sandbox: false,
        completed_at: None,
        approved_at: None,
        rejected_at: None,
        reponse: None,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock report filled in enough to pass completion checks.
///
/// Uses the `evaluation_local_habitation` form with an `affectation` anomaly.
/// `completed_at` is left empty.
pub fn complete_report(collectivity_id: Uuid, code_insee: &str) -> ReportModel {
    ReportModel {
        anomalies: serde_json::json!(["affectation"]),
        code_insee: Some(code_insee.to_string()),
        date_constat: NaiveDate::from_ymd_opt(2026, 5, 2),
        situation_annee_majic: Some(2025),
        situation_invariant: Some("0123456789".to_string()),
        situation_parcelle: Some("AB 0012".to_string()),
        situation_adresse: Some("12 rue des Arènes".to_string()),
        situation_proprietaire: Some("Jean Laborde".to_string()),
        ..report(collectivity_id, "evaluation_local_habitation")
    }
}

pub fn transmission(collectivity_id: Uuid, user_id: Option<Uuid>) -> TransmissionModel {
    let now = Utc::now().naive_utc();
    TransmissionModel {
        id: Uuid::new_v4(),
        collectivity_id,
        user_id,
        publisher_id: None,
        oauth_application_id: None,
        sandbox: false,
        completed_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock transmitted package.
pub fn package(
    reference: &str,
    form_type: &str,
    collectivity_id: Uuid,
    ddfip_id: Uuid,
    transmission_id: Uuid,
) -> PackageModel {
    let now = Utc::now().naive_utc();
    PackageModel {
        id: Uuid::new_v4(),
        reference: reference.to_string(),
        form_type: form_type.to_string(),
        collectivity_id,
        publisher_id: None,
        ddfip_id,
        transmission_id,
        office_id: None,
        sandbox: false,
        transmitted_at: now,
        acknowledged_at: None,
        assigned_at: None,
        rejected_at: None,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock OAuth application owned by `owner_id`.
///
/// `secret_digest` is the SHA-256 digest of `"secret"`.
pub fn oauth_application(owner_id: Uuid, uid: &str) -> OauthApplicationModel {
    let now = Utc::now().naive_utc();
    OauthApplicationModel {
        id: Uuid::new_v4(),
        owner_id,
        name: "Logiciel de gestion".to_string(),
        uid: uid.to_string(),
        secret_digest: crate::fixtures::auth::digest("secret"),
        redirect_uri: None,
        sandbox: false,
        discarded_at: None,
        created_at: now,
        updated_at: now,
    }
}

/// Create a mock access token whose digest matches `token`.
pub fn access_token(application_id: Uuid, token: &str) -> OauthAccessTokenModel {
    OauthAccessTokenModel {
        id: Uuid::new_v4(),
        application_id,
        token_digest: crate::fixtures::auth::digest(token),
        expires_in: Some(7200),
        revoked_at: None,
        created_at: Utc::now().naive_utc(),
    }
}
