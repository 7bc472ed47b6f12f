use std::str::FromStr;

use crate::server::model::db::{PackageModel, ReportModel};

/// Kind of report form, stored in `reports.form_type`, `packages.form_type` and in
/// `offices.competences`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormType {
    EvaluationLocalHabitation,
    EvaluationLocalProfessionnel,
    CreationLocalHabitation,
    CreationLocalProfessionnel,
    OccupationLocalHabitation,
    OccupationLocalProfessionnel,
}

impl FormType {
    pub const ALL: [FormType; 6] = [
        FormType::EvaluationLocalHabitation,
        FormType::EvaluationLocalProfessionnel,
        FormType::CreationLocalHabitation,
        FormType::CreationLocalProfessionnel,
        FormType::OccupationLocalHabitation,
        FormType::OccupationLocalProfessionnel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EvaluationLocalHabitation => "evaluation_local_habitation",
            Self::EvaluationLocalProfessionnel => "evaluation_local_professionnel",
            Self::CreationLocalHabitation => "creation_local_habitation",
            Self::CreationLocalProfessionnel => "creation_local_professionnel",
            Self::OccupationLocalHabitation => "occupation_local_habitation",
            Self::OccupationLocalProfessionnel => "occupation_local_professionnel",
        }
    }

    /// Anomalies that may be reported on this form.
    pub fn anomalies(&self) -> &'static [Anomaly] {
        match self {
            Self::EvaluationLocalHabitation => &[
                Anomaly::Consistance,
                Anomaly::Affectation,
                Anomaly::Exoneration,
                Anomaly::Correctif,
                Anomaly::Adresse,
                Anomaly::Categorie,
            ],
            Self::EvaluationLocalProfessionnel => &[
                Anomaly::Consistance,
                Anomaly::Affectation,
                Anomaly::Exoneration,
                Anomaly::Adresse,
                Anomaly::Categorie,
            ],
            Self::CreationLocalHabitation | Self::CreationLocalProfessionnel => {
                &[Anomaly::OmissionBatie, Anomaly::ConstructionNeuve]
            }
            Self::OccupationLocalHabitation | Self::OccupationLocalProfessionnel => {
                &[Anomaly::Occupation]
            }
        }
    }

    /// Creation forms describe premises missing from the cadastre, they have no invariant.
    pub fn requires_invariant(&self) -> bool {
        !matches!(
            self,
            Self::CreationLocalHabitation | Self::CreationLocalProfessionnel
        )
    }
}

impl FromStr for FormType {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|form_type| form_type.as_str() == value)
            .ok_or(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anomaly {
    Consistance,
    Affectation,
    Exoneration,
    Correctif,
    Adresse,
    Categorie,
    OmissionBatie,
    ConstructionNeuve,
    Occupation,
}

impl Anomaly {
    pub const ALL: [Anomaly; 9] = [
        Anomaly::Consistance,
        Anomaly::Affectation,
        Anomaly::Exoneration,
        Anomaly::Correctif,
        Anomaly::Adresse,
        Anomaly::Categorie,
        Anomaly::OmissionBatie,
        Anomaly::ConstructionNeuve,
        Anomaly::Occupation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consistance => "consistance",
            Self::Affectation => "affectation",
            Self::Exoneration => "exoneration",
            Self::Correctif => "correctif",
            Self::Adresse => "adresse",
            Self::Categorie => "categorie",
            Self::OmissionBatie => "omission_batie",
            Self::ConstructionNeuve => "construction_neuve",
            Self::Occupation => "occupation",
        }
    }
}

impl FromStr for Anomaly {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|anomaly| anomaly.as_str() == value)
            .ok_or(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(()),
        }
    }
}

/// Report status, derived from the report's and its package's timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportStatus {
    Draft,
    Ready,
    Pending,
    Transmitted,
    Acknowledged,
    Assigned,
    Denied,
    Approved,
    Rejected,
}

impl ReportStatus {
    /// Derive the status of `report`, `package` being the report's package if any.
    pub fn of(report: &ReportModel, package: Option<&PackageModel>) -> Self {
        if report.approved_at.is_some() {
            return Self::Approved;
        }
        if report.rejected_at.is_some() {
            return Self::Rejected;
        }

        match package {
            Some(package) if package.rejected_at.is_some() => Self::Denied,
            Some(package) if package.assigned_at.is_some() => Self::Assigned,
            Some(package) if package.acknowledged_at.is_some() => Self::Acknowledged,
            Some(_) => Self::Transmitted,
            None if report.package_id.is_some() => Self::Transmitted,
            None if report.transmission_id.is_some() => Self::Pending,
            None if report.completed_at.is_some() => Self::Ready,
            None => Self::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Pending => "pending",
            Self::Transmitted => "transmitted",
            Self::Acknowledged => "acknowledged",
            Self::Assigned => "assigned",
            Self::Denied => "denied",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// Package status, derived from the package's timestamps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageStatus {
    Transmitted,
    Acknowledged,
    Assigned,
    Rejected,
}

impl PackageStatus {
    pub fn of(package: &PackageModel) -> Self {
        if package.rejected_at.is_some() {
            Self::Rejected
        } else if package.assigned_at.is_some() {
            Self::Assigned
        } else if package.acknowledged_at.is_some() {
            Self::Acknowledged
        } else {
            Self::Transmitted
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transmitted => "transmitted",
            Self::Acknowledged => "acknowledged",
            Self::Assigned => "assigned",
            Self::Rejected => "rejected",
        }
    }
}

/// Read a JSON list of strings, as stored in `reports.anomalies` and `offices.competences`.
pub fn json_strings(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|values| {
            values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use passerelle_test_utils::prelude::*;
    use uuid::Uuid;

    use super::{FormType, ReportStatus};

    /// Expect the status to follow the report through the workflow
    #[test]
    fn derives_report_status_from_timestamps() {
        let now = Utc::now().naive_utc();
        let collectivity_id = Uuid::new_v4();
        let mut report = factory::report(collectivity_id, "evaluation_local_habitation");
        assert_eq!(ReportStatus::of(&report, None), ReportStatus::Draft);

        report.completed_at = Some(now);
        assert_eq!(ReportStatus::of(&report, None), ReportStatus::Ready);

        report.transmission_id = Some(Uuid::new_v4());
        assert_eq!(ReportStatus::of(&report, None), ReportStatus::Pending);

        let mut package = factory::package(
            "2026-05-0001",
            "evaluation_local_habitation",
            collectivity_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        report.package_id = Some(package.id);
        assert_eq!(
            ReportStatus::of(&report, Some(&package)),
            ReportStatus::Transmitted
        );

        package.acknowledged_at = Some(now);
        package.assigned_at = Some(now);
        assert_eq!(
            ReportStatus::of(&report, Some(&package)),
            ReportStatus::Assigned
        );

        report.approved_at = Some(now);
        assert_eq!(
            ReportStatus::of(&report, Some(&package)),
            ReportStatus::Approved
        );
    }

    /// Expect a rejected package to deny its reports
    #[test]
    fn rejected_package_denies_reports() {
        let collectivity_id = Uuid::new_v4();
        let report = factory::report(collectivity_id, "evaluation_local_habitation");
        let mut package = factory::package(
            "2026-05-0001",
            "evaluation_local_habitation",
            collectivity_id,
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        package.rejected_at = Some(Utc::now().naive_utc());

        assert_eq!(
            ReportStatus::of(&report, Some(&package)),
            ReportStatus::Denied
        );
    }

    /// Expect creation forms to skip the invariant and restrict anomalies
    #[test]
    fn creation_forms_have_their_own_rules() {
        let form_type = FormType::CreationLocalHabitation;

        assert!(!form_type.requires_invariant());
        assert_eq!(form_type.anomalies().len(), 2);
        assert!(FormType::EvaluationLocalProfessionnel.requires_invariant());
    }
}
