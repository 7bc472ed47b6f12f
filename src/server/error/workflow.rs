use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Actions refused because of the record's current state.
#[derive(Error, Debug, PartialEq)]
pub enum WorkflowError {
    #[error("Report was already transmitted in a package")]
    ReportPackaged,
    #[error("Report was not transmitted to a DDFIP yet")]
    ReportNotTransmitted,
    #[error("Report's package is not assigned to an office")]
    ReportNotAssigned,
    #[error("Report was created through the API and can't be edited on the web")]
    ReportFromApi,
    #[error("Transmission is already completed")]
    TransmissionCompleted,
    #[error("Transmission has no report")]
    TransmissionEmpty,
    #[error("No DDFIP found for département {0}")]
    MissingDdfip(String),
    #[error("Package is assigned to an office")]
    PackageAssigned,
    #[error("Package was already acknowledged by its DDFIP")]
    PackageAcknowledged,
    #[error("Package contains reports that were already approved or rejected")]
    PackageDecided,
    #[error("Office does not belong to the package's DDFIP")]
    OfficeOutsideDdfip,
    #[error("Only one DGFIP can exist at a time")]
    DgfipAlreadyExists,
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        tracing::debug!("{}", self);

        let message = match self {
            Self::ReportPackaged => "Ce signalement a déjà été transmis.",
            Self::ReportNotTransmitted => "Ce signalement n'a pas encore été transmis.",
            Self::ReportNotAssigned => "Ce signalement n'a pas encore été assigné à un guichet.",
            Self::ReportFromApi => {
                "Ce signalement a été créé par un éditeur et ne peut être modifié."
            }
            Self::TransmissionCompleted => "Cette transmission est déjà finalisée.",
            Self::TransmissionEmpty => "Cette transmission ne contient aucun signalement.",
            Self::MissingDdfip(_) => "Aucune DDFIP ne couvre le département de ce signalement.",
            Self::PackageAssigned => "Ce paquet a déjà été assigné à un guichet.",
            Self::PackageAcknowledged => "Ce paquet a déjà été accusé de réception.",
            Self::PackageDecided => "Des signalements de ce paquet ont déjà été traités.",
            Self::OfficeOutsideDdfip => "Ce guichet n'appartient pas à la DDFIP du paquet.",
            Self::DgfipAlreadyExists => "Une DGFIP existe déjà.",
        };

        error_response(StatusCode::UNPROCESSABLE_ENTITY, message)
    }
}
