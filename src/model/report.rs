use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::server::model::report::json_strings;

#[derive(Clone, Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReportDto {
    pub id: Uuid,
    pub reference: Option<String>,
    /// Derived from the report's and its package's timestamps
    pub status: String,
    pub form_type: String,
    pub anomalies: Vec<String>,
    pub priority: String,
    pub collectivity_id: Uuid,
    pub publisher_id: Option<Uuid>,
    pub transmission_id: Option<Uuid>,
    pub package_id: Option<Uuid>,
    pub code_insee: Option<String>,
    pub date_constat: Option<NaiveDate>,
    pub situation_annee_majic: Option<i32>,
    pub situation_invariant: Option<String>,
    pub situation_parcelle: Option<String>,
    pub situation_adresse: Option<String>,
    pub situation_proprietaire: Option<String>,
    pub situation_categorie: Option<String>,
    pub proposition_categorie: Option<String>,
    pub proposition_adresse: Option<String>,
    pub proposition_surface: Option<i32>,
    pub observations: Option<String>,
    pub sandbox: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub approved_at: Option<NaiveDateTime>,
    pub rejected_at: Option<NaiveDateTime>,
    pub reponse: Option<String>,
    pub discarded_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Submitted report attributes.
///
/// Absent fields are left unchanged, an empty string clears a text value.
#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReportForm {
    pub form_type: Option<String>,
    pub anomalies: Option<Vec<String>>,
    pub priority: Option<String>,
    pub code_insee: Option<String>,
    pub date_constat: Option<NaiveDate>,
    pub situation_annee_majic: Option<i32>,
    pub situation_invariant: Option<String>,
    pub situation_parcelle: Option<String>,
    pub situation_adresse: Option<String>,
    pub situation_proprietaire: Option<String>,
    pub situation_categorie: Option<String>,
    pub proposition_categorie: Option<String>,
    pub proposition_adresse: Option<String>,
    pub proposition_surface: Option<i32>,
    pub observations: Option<String>,
}

/// Answer given by the DDFIP when approving or rejecting a report.
#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReportDecisionForm {
    pub reponse: Option<String>,
}

impl ReportDto {
    /// Builds the document of a report whose workflow status was already derived
    pub fn new(model: entity::report::Model, status: &str) -> Self {
        let anomalies = json_strings(&model.anomalies);

        Self {
            id: model.id,
            reference: model.reference,
            status: status.to_string(),
            form_type: model.form_type,
            anomalies,
            priority: model.priority,
            collectivity_id: model.collectivity_id,
            publisher_id: model.publisher_id,
            transmission_id: model.transmission_id,
            package_id: model.package_id,
            code_insee: model.code_insee,
            date_constat: model.date_constat,
            situation_annee_majic: model.situation_annee_majic,
            situation_invariant: model.situation_invariant,
            situation_parcelle: model.situation_parcelle,
            situation_adresse: model.situation_adresse,
            situation_proprietaire: model.situation_proprietaire,
            situation_categorie: model.situation_categorie,
            proposition_categorie: model.proposition_categorie,
            proposition_adresse: model.proposition_adresse,
            proposition_surface: model.proposition_surface,
            observations: model.observations,
            sandbox: model.sandbox,
            completed_at: model.completed_at,
            approved_at: model.approved_at,
            rejected_at: model.rejected_at,
            reponse: model.reponse,
            discarded_at: model.discarded_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
