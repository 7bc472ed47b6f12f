use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use sea_orm::{ActiveValue, ConnectionTrait, DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::{
    model::{
        package::PackageDto,
        transmission::{CreateTransmissionForm, TransmissionDto},
    },
    server::{
        data::{
            collectivity::CollectivityRepository, ddfip::DdfipRepository,
            package::PackageRepository, report::ReportRepository,
            territory::commune::CommuneRepository, transmission::TransmissionRepository,
        },
        error::{record::RecordError, workflow::WorkflowError, Error},
        model::{
            auth::ApiClient,
            db::{DdfipModel, ReportModel, TransmissionModel},
            report::PackageStatus,
        },
        service::found,
    },
};

pub struct TransmissionService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TransmissionService<'a> {
    /// Creates a new instance of [`TransmissionService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find(&self, id: Uuid) -> Result<TransmissionModel, Error> {
        found(
            TransmissionRepository::new(self.db).find(id).await?,
            "transmission",
            id,
        )
    }

    /// In-progress web transmission of a collectivity, created on first use
    ///
    /// A collectivity has at most one in-progress transmission on the web surface.
    pub async fn active(
        &self,
        collectivity_id: Uuid,
        user_id: Uuid,
    ) -> Result<TransmissionModel, Error> {
        let transmission_repo = TransmissionRepository::new(self.db);

        if let Some(transmission) = transmission_repo.find_active_web(collectivity_id).await? {
            return Ok(transmission);
        }

        let transmission = transmission_repo
            .create(entity::transmission::ActiveModel {
                collectivity_id: ActiveValue::Set(collectivity_id),
                user_id: ActiveValue::Set(Some(user_id)),
                publisher_id: ActiveValue::Set(None),
                oauth_application_id: ActiveValue::Set(None),
                sandbox: ActiveValue::Set(false),
                completed_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?;

        tracing::debug!(
            transmission_id = %transmission.id,
            collectivity_id = %collectivity_id,
            "opened web transmission"
        );

        Ok(transmission)
    }

    /// Document of a transmission with its reports and packages
    pub async fn dto(&self, transmission: TransmissionModel) -> Result<TransmissionDto, Error> {
        let report_ids = ReportRepository::new(self.db)
            .ids_by_transmission(transmission.id)
            .await?;
        let packages = PackageRepository::new(self.db)
            .find_by_transmission(transmission.id)
            .await?
            .into_iter()
            .map(|package| {
                let status = PackageStatus::of(&package);
                PackageDto::new(package, status.as_str())
            })
            .collect();

        Ok(TransmissionDto {
            id: transmission.id,
            collectivity_id: transmission.collectivity_id,
            user_id: transmission.user_id,
            publisher_id: transmission.publisher_id,
            oauth_application_id: transmission.oauth_application_id,
            sandbox: transmission.sandbox,
            completed_at: transmission.completed_at,
            report_ids,
            packages,
            created_at: transmission.created_at,
        })
    }

    /// Adds reports to an in-progress transmission
    ///
    /// Only kept, completed and unpackaged web reports of the transmission's collectivity
    /// join, the others are skipped. Returns the IDs that joined.
    pub async fn add_reports(
        &self,
        transmission: &TransmissionModel,
        ids: &[Uuid],
    ) -> Result<Vec<Uuid>, Error> {
        if transmission.completed_at.is_some() {
            return Err(WorkflowError::TransmissionCompleted.into());
        }

        let report_repo = ReportRepository::new(self.db);
        let ids: Vec<Uuid> = report_repo
            .find_transmissible(transmission.collectivity_id, ids)
            .await?
            .into_iter()
            .map(|report| report.id)
            .collect();

        report_repo
            .attach_to_transmission(transmission.id, &ids)
            .await?;

        Ok(ids)
    }

    /// Removes reports from an in-progress transmission, returning how many left
    pub async fn remove_reports(
        &self,
        transmission: &TransmissionModel,
        ids: &[Uuid],
    ) -> Result<u64, Error> {
        if transmission.completed_at.is_some() {
            return Err(WorkflowError::TransmissionCompleted.into());
        }

        Ok(ReportRepository::new(self.db)
            .detach_from_transmission(transmission.id, ids)
            .await?)
    }

    /// Completes a transmission, packaging its reports for their DDFIPs
    ///
    /// Reports are grouped by DDFIP (the one covering the département of their commune)
    /// and form type. Each group becomes a package referenced `YYYY-MM-NNNN`, the sequence
    /// restarting every month, and each report of a package is referenced
    /// `<package reference>-NNNNN`. Everything happens in one database transaction.
    ///
    /// # Returns
    /// - `Ok(TransmissionDto)`: the completed transmission with its packages
    /// - `Err(Error::WorkflowError(_))`: transmission already completed or empty, or no
    ///   DDFIP covers the département of a report
    pub async fn complete(&self, transmission: TransmissionModel) -> Result<TransmissionDto, Error> {
        if transmission.completed_at.is_some() {
            return Err(WorkflowError::TransmissionCompleted.into());
        }

        let txn = self.db.begin().await?;

        let reports = ReportRepository::new(&txn)
            .find_by_transmission(transmission.id)
            .await?;
        if reports.is_empty() {
            return Err(WorkflowError::TransmissionEmpty.into());
        }

        let groups = group_reports(&txn, reports).await?;

        let now = Utc::now().naive_utc();
        let prefix = now.format("%Y-%m").to_string();
        let package_repo = PackageRepository::new(&txn);
        let report_repo = ReportRepository::new(&txn);
        let mut sequence = package_repo.last_sequence(&prefix).await?;

        for ((ddfip_id, form_type), reports) in groups {
            sequence += 1;
            let reference = format!("{}-{:04}", prefix, sequence);

            let package = package_repo
                .create(entity::package::ActiveModel {
                    reference: ActiveValue::Set(reference.clone()),
                    form_type: ActiveValue::Set(form_type),
                    collectivity_id: ActiveValue::Set(transmission.collectivity_id),
                    publisher_id: ActiveValue::Set(transmission.publisher_id),
                    ddfip_id: ActiveValue::Set(ddfip_id),
                    transmission_id: ActiveValue::Set(transmission.id),
                    office_id: ActiveValue::Set(None),
                    sandbox: ActiveValue::Set(transmission.sandbox),
                    transmitted_at: ActiveValue::Set(now),
                    acknowledged_at: ActiveValue::Set(None),
                    assigned_at: ActiveValue::Set(None),
                    rejected_at: ActiveValue::Set(None),
                    discarded_at: ActiveValue::Set(None),
                    ..Default::default()
                })
                .await?;

            for (index, report) in reports.iter().enumerate() {
                report_repo
                    .set_package(
                        report.id,
                        package.id,
                        format!("{}-{:05}", reference, index + 1),
                    )
                    .await?;
            }
        }

        let transmission = TransmissionRepository::new(&txn)
            .complete(transmission)
            .await?;

        txn.commit().await?;

        tracing::info!(
            transmission_id = %transmission.id,
            collectivity_id = %transmission.collectivity_id,
            "completed transmission"
        );

        self.dto(transmission).await
    }

    /// Opens a transmission for a publisher on behalf of one of its collectivities
    ///
    /// Collectivities the publisher doesn't manage are reported missing (404).
    pub async fn create_for_client(
        &self,
        client: &ApiClient,
        collectivity_id: Uuid,
        form: CreateTransmissionForm,
    ) -> Result<TransmissionModel, Error> {
        let collectivity = CollectivityRepository::new(self.db)
            .find_kept(collectivity_id)
            .await?
            .filter(|collectivity| collectivity.publisher_id == Some(client.publisher_id()))
            .ok_or(RecordError::NotFound {
                resource: "collectivity",
                id: collectivity_id,
            })?;

        Ok(TransmissionRepository::new(self.db)
            .create(entity::transmission::ActiveModel {
                collectivity_id: ActiveValue::Set(collectivity.id),
                user_id: ActiveValue::Set(None),
                publisher_id: ActiveValue::Set(Some(client.publisher_id())),
                oauth_application_id: ActiveValue::Set(Some(client.application.id)),
                sandbox: ActiveValue::Set(form.sandbox || client.application.sandbox),
                completed_at: ActiveValue::Set(None),
                ..Default::default()
            })
            .await?)
    }

    /// Transmission opened by the client's publisher, 404 otherwise
    pub async fn find_for_client(
        &self,
        client: &ApiClient,
        id: Uuid,
    ) -> Result<TransmissionModel, Error> {
        TransmissionRepository::new(self.db)
            .find(id)
            .await?
            .filter(|transmission| transmission.publisher_id == Some(client.publisher_id()))
            .ok_or_else(|| {
                RecordError::NotFound {
                    resource: "transmission",
                    id,
                }
                .into()
            })
    }
}

/// Groups reports by (DDFIP, form type), keeping the report order within a group
async fn group_reports<C: ConnectionTrait>(
    db: &C,
    reports: Vec<ReportModel>,
) -> Result<BTreeMap<(Uuid, String), Vec<ReportModel>>, Error> {
    let commune_repo = CommuneRepository::new(db);
    let ddfip_repo = DdfipRepository::new(db);

    let mut ddfips: HashMap<String, DdfipModel> = HashMap::new();
    let mut groups: BTreeMap<(Uuid, String), Vec<ReportModel>> = BTreeMap::new();

    for report in reports {
        let code_insee = report.code_insee.clone().unwrap_or_default();
        let Some(commune) = commune_repo.find_by_code(&code_insee).await? else {
            return Err(WorkflowError::MissingDdfip(code_insee).into());
        };

        let ddfip = match ddfips.get(&commune.code_departement) {
            Some(ddfip) => ddfip.clone(),
            None => {
                let Some(ddfip) = ddfip_repo
                    .find_kept_by_departement(&commune.code_departement)
                    .await?
                else {
                    tracing::warn!(
                        report_id = %report.id,
                        code_departement = %commune.code_departement,
                        "no DDFIP covers the report's département"
                    );
                    return Err(WorkflowError::MissingDdfip(commune.code_departement).into());
                };
                ddfips.insert(commune.code_departement.clone(), ddfip.clone());
                ddfip
            }
        };

        groups
            .entry((ddfip.id, report.form_type.clone()))
            .or_default()
            .push(report);
    }

    Ok(groups)
}
