use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, IntoActiveModel};
use uuid::Uuid;

use crate::{
    model::report::{ReportDecisionForm, ReportDto, ReportForm},
    server::{
        data::{
            collectivity::CollectivityRepository,
            discard::DiscardRepository,
            listing::{ListQuery, Page},
            package::PackageRepository,
            report::{ReportRepository, ReportScope},
            territory::{commune::CommuneRepository, find_territory},
        },
        error::{validation::ValidationErrors, workflow::WorkflowError, Error},
        model::{
            db::{CollectivityModel, PackageModel, ReportModel, TransmissionModel},
            organization::TerritoryType,
            report::{json_strings, Anomaly, FormType, Priority, ReportStatus},
        },
        service::{found, kept},
        util::validation::{check_format, is_code_insee, is_invariant, Field, BLANK, INVALID},
    },
};

const OUTSIDE_TERRITORY: &str = "n'est pas situé(e) sur le territoire de la collectivité";

/// Decision taken by the DDFIP on a transmitted report
#[derive(Clone, Copy, Debug, PartialEq)]
enum Decision {
    Approve,
    Reject,
    Reset,
}

pub struct ReportService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReportService<'a> {
    /// Creates a new instance of [`ReportService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists reports in scope with their derived status
    pub async fn list(&self, scope: &ReportScope, query: &ListQuery) -> Result<Page<ReportDto>, Error> {
        let page = ReportRepository::new(self.db).list(scope, query).await?;

        let package_ids: Vec<Uuid> = page.records.iter().filter_map(|r| r.package_id).collect();
        let packages: HashMap<Uuid, PackageModel> = PackageRepository::new(self.db)
            .find_many(&package_ids)
            .await?
            .into_iter()
            .map(|package| (package.id, package))
            .collect();

        Ok(page.map(|report| {
            let package = report.package_id.and_then(|id| packages.get(&id));
            let status = ReportStatus::of(&report, package);

            ReportDto::new(report, status.as_str())
        }))
    }

    pub async fn ids(&self, scope: &ReportScope, query: &ListQuery) -> Result<Vec<Uuid>, Error> {
        Ok(ReportRepository::new(self.db).ids(scope, query).await?)
    }

    /// Finds a report in any state, 404 when missing
    pub async fn find(&self, id: Uuid) -> Result<ReportModel, Error> {
        found(ReportRepository::new(self.db).find(id).await?, "report", id)
    }

    /// Finds a kept report, 404 when missing and 410 when discarded
    pub async fn get(&self, id: Uuid) -> Result<ReportModel, Error> {
        kept(ReportRepository::new(self.db).find(id).await?, "report", id)
    }

    /// Whether the report belongs to `scope`
    pub async fn is_visible(&self, scope: &ReportScope, id: Uuid) -> Result<bool, Error> {
        Ok(ReportRepository::new(self.db)
            .find_in_scope(scope, id)
            .await?
            .is_some())
    }

    /// Document of a report, with the status derived from its package
    pub async fn dto(&self, report: ReportModel) -> Result<ReportDto, Error> {
        let package = match report.package_id {
            Some(package_id) => PackageRepository::new(self.db).find(package_id).await?,
            None => None,
        };
        let status = ReportStatus::of(&report, package.as_ref());

        Ok(ReportDto::new(report, status.as_str()))
    }

    /// Package holding a transmitted report
    ///
    /// # Returns
    /// - `Ok(PackageModel)`: the report's package
    /// - `Err(Error::WorkflowError(WorkflowError::ReportNotTransmitted))`: the report is not
    ///   packaged yet
    pub async fn package(&self, report: &ReportModel) -> Result<PackageModel, Error> {
        let package = match report.package_id {
            Some(package_id) => PackageRepository::new(self.db).find(package_id).await?,
            None => None,
        };

        package.ok_or_else(|| WorkflowError::ReportNotTransmitted.into())
    }

    /// Creates a draft report for a collectivity
    pub async fn create(&self, collectivity_id: Uuid, form: ReportForm) -> Result<ReportDto, Error> {
        let mut errors = ValidationErrors::new();
        let mut report = blank_report(collectivity_id);
        apply(&mut errors, &mut report, form);
        errors.into_result()?;

        let report = ReportRepository::new(self.db)
            .create(entity::report::ActiveModel::from(report))
            .await?;

        self.dto(report).await
    }

    /// Creates a completed report within an API transmission
    ///
    /// The report belongs to the transmission's publisher and collectivity and must pass
    /// completion checks right away.
    pub async fn create_in_transmission(
        &self,
        transmission: &TransmissionModel,
        form: ReportForm,
    ) -> Result<ReportDto, Error> {
        if transmission.completed_at.is_some() {
            return Err(WorkflowError::TransmissionCompleted.into());
        }

        let collectivity = kept(
            CollectivityRepository::new(self.db)
                .find(transmission.collectivity_id)
                .await?,
            "collectivity",
            transmission.collectivity_id,
        )?;

        let mut errors = ValidationErrors::new();
        let mut report = ReportModel {
            publisher_id: transmission.publisher_id,
            transmission_id: Some(transmission.id),
            sandbox: transmission.sandbox,
            ..blank_report(collectivity.id)
        };
        apply(&mut errors, &mut report, form);
        self.check_completion(&mut errors, &report, &collectivity)
            .await?;
        errors.into_result()?;

        report.completed_at = Some(Utc::now().naive_utc());
        let report = ReportRepository::new(self.db)
            .create(entity::report::ActiveModel::from(report))
            .await?;

        self.dto(report).await
    }

    /// Updates a kept report that was not packaged yet
    ///
    /// A completed report stays completed, so the result must still pass completion checks.
    pub async fn update(&self, id: Uuid, form: ReportForm) -> Result<ReportDto, Error> {
        let mut report = self.editable(id).await?;

        let mut errors = ValidationErrors::new();
        apply(&mut errors, &mut report, form);

        if report.completed_at.is_some() {
            let collectivity = self.collectivity(&report).await?;
            self.check_completion(&mut errors, &report, &collectivity)
                .await?;
        }
        errors.into_result()?;

        let report = ReportRepository::new(self.db)
            .update(entity::report::ActiveModel::from(report))
            .await?;

        self.dto(report).await
    }

    /// Marks a report as completed, ready to be transmitted
    ///
    /// Completing an already completed report is a no-op.
    pub async fn complete(&self, id: Uuid) -> Result<ReportDto, Error> {
        let report = self.editable(id).await?;
        if report.completed_at.is_some() {
            return self.dto(report).await;
        }

        let mut errors = ValidationErrors::new();
        let collectivity = self.collectivity(&report).await?;
        self.check_completion(&mut errors, &report, &collectivity)
            .await?;
        errors.into_result()?;

        let mut report_am = report.into_active_model();
        report_am.completed_at = ActiveValue::Set(Some(Utc::now().naive_utc()));
        let report = ReportRepository::new(self.db).update(report_am).await?;

        self.dto(report).await
    }

    /// Turns a completed report back into a draft, removing it from its pending transmission
    pub async fn uncomplete(&self, id: Uuid) -> Result<ReportDto, Error> {
        let report = self.editable(id).await?;
        if report.completed_at.is_none() {
            return self.dto(report).await;
        }

        let mut report_am = report.into_active_model();
        report_am.completed_at = ActiveValue::Set(None);
        report_am.transmission_id = ActiveValue::Set(None);
        let report = ReportRepository::new(self.db).update(report_am).await?;

        self.dto(report).await
    }

    /// Discards a report that was not packaged yet
    pub async fn discard(&self, id: Uuid) -> Result<bool, Error> {
        let report = self.find(id).await?;
        if report.package_id.is_some() {
            return Err(WorkflowError::ReportPackaged.into());
        }

        Ok(DiscardRepository::new(self.db)
            .discard::<entity::report::Entity>(id)
            .await?)
    }

    pub async fn undiscard(&self, id: Uuid) -> Result<bool, Error> {
        self.find(id).await?;

        Ok(DiscardRepository::new(self.db)
            .undiscard::<entity::report::Entity>(id)
            .await?)
    }

    /// Discards the editable reports among `ids`, packaged and API reports are skipped
    pub async fn discard_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        let ids = ReportRepository::new(self.db).editable_ids(ids).await?;

        Ok(DiscardRepository::new(self.db)
            .discard_many::<entity::report::Entity>(&ids)
            .await?)
    }

    pub async fn undiscard_many(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, Error> {
        Ok(DiscardRepository::new(self.db)
            .undiscard_many::<entity::report::Entity>(ids)
            .await?)
    }

    /// Approves a report of an assigned package
    pub async fn approve(&self, id: Uuid, form: ReportDecisionForm) -> Result<ReportDto, Error> {
        self.decide(id, Decision::Approve, form).await
    }

    /// Rejects a report of an assigned package
    pub async fn reject(&self, id: Uuid, form: ReportDecisionForm) -> Result<ReportDto, Error> {
        self.decide(id, Decision::Reject, form).await
    }

    /// Cancels the decision taken on a report
    pub async fn reset(&self, id: Uuid) -> Result<ReportDto, Error> {
        self.decide(id, Decision::Reset, ReportDecisionForm::default())
            .await
    }

    async fn decide(
        &self,
        id: Uuid,
        decision: Decision,
        form: ReportDecisionForm,
    ) -> Result<ReportDto, Error> {
        let report = kept(ReportRepository::new(self.db).find(id).await?, "report", id)?;
        let package = self.package(&report).await?;

        if package.assigned_at.is_none() || package.rejected_at.is_some() {
            return Err(WorkflowError::ReportNotAssigned.into());
        }

        let now = Utc::now().naive_utc();
        let reponse = Field::from_form(form.reponse).into_column(report.reponse.clone());

        let mut report_am = report.into_active_model();
        match decision {
            Decision::Approve => {
                report_am.approved_at = ActiveValue::Set(Some(now));
                report_am.rejected_at = ActiveValue::Set(None);
                report_am.reponse = ActiveValue::Set(reponse);
            }
            Decision::Reject => {
                report_am.approved_at = ActiveValue::Set(None);
                report_am.rejected_at = ActiveValue::Set(Some(now));
                report_am.reponse = ActiveValue::Set(reponse);
            }
            Decision::Reset => {
                report_am.approved_at = ActiveValue::Set(None);
                report_am.rejected_at = ActiveValue::Set(None);
                report_am.reponse = ActiveValue::Set(None);
            }
        }
        let report = ReportRepository::new(self.db).update(report_am).await?;
        let status = ReportStatus::of(&report, Some(&package));

        Ok(ReportDto::new(report, status.as_str()))
    }

    /// Kept report still open to edition
    async fn editable(&self, id: Uuid) -> Result<ReportModel, Error> {
        let report = kept(ReportRepository::new(self.db).find(id).await?, "report", id)?;

        if report.package_id.is_some() {
            return Err(WorkflowError::ReportPackaged.into());
        }
        if report.publisher_id.is_some() {
            return Err(WorkflowError::ReportFromApi.into());
        }

        Ok(report)
    }

    async fn collectivity(&self, report: &ReportModel) -> Result<CollectivityModel, Error> {
        found(
            CollectivityRepository::new(self.db)
                .find(report.collectivity_id)
                .await?,
            "collectivity",
            report.collectivity_id,
        )
    }

    /// Rules a report must pass before it can be transmitted
    async fn check_completion(
        &self,
        errors: &mut ValidationErrors,
        report: &ReportModel,
        collectivity: &CollectivityModel,
    ) -> Result<(), Error> {
        let anomalies = json_strings(&report.anomalies);
        if anomalies.is_empty() {
            errors.add("anomalies", BLANK);
        }

        match report.code_insee.as_deref() {
            None => errors.add("code_insee", BLANK),
            Some(code_insee) if is_code_insee(code_insee) => {
                if !self.within_territory(code_insee, collectivity).await? {
                    errors.add("code_insee", OUTSIDE_TERRITORY);
                }
            }
            Some(_) => {}
        }

        if report.date_constat.is_none() {
            errors.add("date_constat", BLANK);
        }

        let form_type = report.form_type.parse::<FormType>().ok();
        if form_type.is_some_and(|form_type| form_type.requires_invariant())
            && report.situation_invariant.is_none()
        {
            errors.add("situation_invariant", BLANK);
        }

        let reported = |anomaly: Anomaly| anomalies.iter().any(|a| a == anomaly.as_str());
        if reported(Anomaly::Adresse) && report.proposition_adresse.is_none() {
            errors.add("proposition_adresse", BLANK);
        }
        if reported(Anomaly::Categorie) && report.proposition_categorie.is_none() {
            errors.add("proposition_categorie", BLANK);
        }
        if reported(Anomaly::Consistance) && report.proposition_surface.is_none() {
            errors.add("proposition_surface", BLANK);
        }

        Ok(())
    }

    async fn within_territory(
        &self,
        code_insee: &str,
        collectivity: &CollectivityModel,
    ) -> Result<bool, Error> {
        let Ok(territory_type) = collectivity.territory_type.parse::<TerritoryType>() else {
            tracing::warn!(
                collectivity_id = %collectivity.id,
                territory_type = %collectivity.territory_type,
                "collectivity has an unknown territory type"
            );
            return Ok(false);
        };

        let Some(territory) =
            find_territory(self.db, territory_type, collectivity.territory_id).await?
        else {
            return Ok(false);
        };

        Ok(CommuneRepository::new(self.db)
            .find_in_territory(code_insee, &territory)
            .await?
            .is_some())
    }
}

fn blank_report(collectivity_id: Uuid) -> ReportModel {
    let now = Utc::now().naive_utc();

    ReportModel {
        id: Uuid::new_v4(),
        collectivity_id,
        publisher_id: None,
        transmission_id: None,
        package_id: None,
        reference: None,
        form_type: String::new(),
        anomalies: serde_json::json!([]),
        priority: Priority::default().as_str().to_string(),
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

/// Applies submitted attributes to `report` and runs the base validations
fn apply(errors: &mut ValidationErrors, report: &mut ReportModel, form: ReportForm) {
    let form_type = match form.form_type.as_deref().map(str::trim) {
        Some("") => None,
        Some(submitted) => match submitted.parse::<FormType>() {
            Ok(form_type) => Some(form_type),
            Err(()) => {
                errors.add("form_type", INVALID);
                None
            }
        },
        None => report.form_type.parse::<FormType>().ok(),
    };
    match form_type {
        Some(form_type) => report.form_type = form_type.as_str().to_string(),
        None if !errors.contains("form_type") => errors.add("form_type", BLANK),
        None => {}
    }

    let mut anomalies = form
        .anomalies
        .map(|anomalies| {
            anomalies
                .into_iter()
                .map(|anomaly| anomaly.trim().to_string())
                .filter(|anomaly| !anomaly.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|| json_strings(&report.anomalies));
    let mut seen = HashSet::new();
    anomalies.retain(|anomaly| seen.insert(anomaly.clone()));
    if let Some(form_type) = form_type {
        let allowed = form_type.anomalies();
        let valid = anomalies.iter().all(|anomaly| {
            anomaly
                .parse::<Anomaly>()
                .is_ok_and(|anomaly| allowed.contains(&anomaly))
        });
        if !valid {
            errors.add("anomalies", INVALID);
        }
    }
    report.anomalies = serde_json::json!(anomalies);

    if let Some(priority) = form.priority {
        match priority.trim().parse::<Priority>() {
            Ok(priority) => report.priority = priority.as_str().to_string(),
            Err(()) => errors.add("priority", INVALID),
        }
    }

    report.code_insee = Field::from_form(form.code_insee).into_column(report.code_insee.take());
    check_format(errors, "code_insee", report.code_insee.as_deref(), is_code_insee);

    if let Some(date_constat) = form.date_constat {
        if date_constat > Utc::now().date_naive() {
            errors.add("date_constat", INVALID);
        }
        report.date_constat = Some(date_constat);
    }

    if let Some(annee) = form.situation_annee_majic {
        if !(1970..=Utc::now().year()).contains(&annee) {
            errors.add("situation_annee_majic", INVALID);
        }
        report.situation_annee_majic = Some(annee);
    }

    report.situation_invariant =
        Field::from_form(form.situation_invariant).into_column(report.situation_invariant.take());
    check_format(
        errors,
        "situation_invariant",
        report.situation_invariant.as_deref(),
        is_invariant,
    );

    report.situation_parcelle =
        Field::from_form(form.situation_parcelle).into_column(report.situation_parcelle.take());
    report.situation_adresse =
        Field::from_form(form.situation_adresse).into_column(report.situation_adresse.take());
    report.situation_proprietaire = Field::from_form(form.situation_proprietaire)
        .into_column(report.situation_proprietaire.take());
    report.situation_categorie =
        Field::from_form(form.situation_categorie).into_column(report.situation_categorie.take());
    report.proposition_categorie = Field::from_form(form.proposition_categorie)
        .into_column(report.proposition_categorie.take());
    report.proposition_adresse =
        Field::from_form(form.proposition_adresse).into_column(report.proposition_adresse.take());
    report.observations = Field::from_form(form.observations).into_column(report.observations.take());

    if let Some(surface) = form.proposition_surface {
        if surface <= 0 {
            errors.add("proposition_surface", INVALID);
        }
        report.proposition_surface = Some(surface);
    }
}

#[cfg(test)]
mod tests {

    mod create {
        use passerelle_test_utils::prelude::*;
        use sea_orm::{EntityTrait, PaginatorTrait};

        use crate::{
            model::report::ReportForm,
            server::{error::Error, service::report::ReportService},
        };

        /// Expect a draft report with the default priority
        #[tokio::test]
        async fn creates_draft_report() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service
                .create(
                    collectivity.id,
                    ReportForm {
                        form_type: Some("evaluation_local_habitation".to_string()),
                        anomalies: Some(vec!["affectation".to_string()]),
                        ..Default::default()
                    },
                )
                .await;

            assert!(result.is_ok());
            let report = result.unwrap();
            assert_eq!(report.status, "draft");
            assert_eq!(report.priority, "medium");
            assert_eq!(report.anomalies, vec!["affectation".to_string()]);

            Ok(())
        }

        /// Expect repeated anomalies to be stored once, in submission order
        #[tokio::test]
        async fn stores_each_anomaly_once() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service
                .create(
                    collectivity.id,
                    ReportForm {
                        form_type: Some("evaluation_local_habitation".to_string()),
                        anomalies: Some(vec![
                            "adresse".to_string(),
                            "categorie".to_string(),
                            "adresse".to_string(),
                        ]),
                        ..Default::default()
                    },
                )
                .await;

            assert!(result.is_ok());
            let report = result.unwrap();
            assert_eq!(
                report.anomalies,
                vec!["adresse".to_string(), "categorie".to_string()]
            );

            Ok(())
        }

        /// Expect anomalies foreign to the form type to be refused and nothing persisted
        #[tokio::test]
        async fn refuses_anomaly_of_other_form() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service
                .create(
                    collectivity.id,
                    ReportForm {
                        form_type: Some("occupation_local_habitation".to_string()),
                        anomalies: Some(vec!["categorie".to_string()]),
                        code_insee: Some("641".to_string()),
                        ..Default::default()
                    },
                )
                .await;

            match result {
                Err(Error::ValidationErrors(errors)) => {
                    assert_eq!(errors.fields(), vec!["anomalies", "code_insee"]);
                }
                other => panic!("expected validation errors, got {:?}", other),
            }
            assert_eq!(entity::prelude::Report::find().count(&test.db).await?, 0);

            Ok(())
        }

        /// Expect a missing form type to be reported blank
        #[tokio::test]
        async fn requires_form_type() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service
                .create(collectivity.id, ReportForm::default())
                .await;

            assert!(
                matches!(result, Err(Error::ValidationErrors(errors)) if errors.contains("form_type"))
            );

            Ok(())
        }
    }

    mod complete {
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::report::ReportForm,
            server::{
                error::{workflow::WorkflowError, Error},
                service::report::ReportService,
            },
        };

        /// Expect a filled in report located on the collectivity's territory to complete
        #[tokio::test]
        async fn completes_filled_in_report() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let report = test
                .report()
                .save_report(factory::complete_report(collectivity.id, TEST_CODE_INSEE))
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service.complete(report.id).await;

            assert!(result.is_ok());
            let report = result.unwrap();
            assert_eq!(report.status, "ready");
            assert!(report.completed_at.is_some());

            Ok(())
        }

        /// Expect every completion rule to be checked at once
        #[tokio::test]
        async fn lists_missing_information() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            test.territory()
                .insert_commune("33063", "33", None)
                .await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;

            let report_service = ReportService::new(&test.db);
            let report = report_service
                .create(
                    collectivity.id,
                    ReportForm {
                        form_type: Some("evaluation_local_habitation".to_string()),
                        anomalies: Some(vec!["adresse".to_string(), "consistance".to_string()]),
                        code_insee: Some("33063".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            let result = report_service.complete(report.id).await;

            match result {
                Err(Error::ValidationErrors(errors)) => assert_eq!(
                    errors.fields(),
                    vec![
                        "code_insee",
                        "date_constat",
                        "proposition_adresse",
                        "proposition_surface",
                        "situation_invariant",
                    ]
                ),
                other => panic!("expected validation errors, got {:?}", other),
            }

            Ok(())
        }

        /// Expect a completed report to stay complete through updates
        #[tokio::test]
        async fn keeps_completed_report_complete() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let report = test
                .report()
                .insert_completed_report(collectivity.id, TEST_CODE_INSEE)
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service
                .update(
                    report.id,
                    ReportForm {
                        situation_invariant: Some(String::new()),
                        ..Default::default()
                    },
                )
                .await;

            assert!(
                matches!(result, Err(Error::ValidationErrors(errors)) if errors.contains("situation_invariant"))
            );

            Ok(())
        }

        /// Expect packaged reports to be frozen
        #[tokio::test]
        async fn refuses_packaged_report() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let (_, _, report) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;

            let report_service = ReportService::new(&test.db);
            let update = report_service
                .update(report.id, ReportForm::default())
                .await;
            let discard = report_service.discard(report.id).await;

            for result in [update.map(|_| ()), discard.map(|_| ())] {
                assert!(matches!(
                    result,
                    Err(Error::WorkflowError(WorkflowError::ReportPackaged))
                ));
            }

            Ok(())
        }
    }

    mod decide {
        use chrono::Utc;
        use passerelle_test_utils::prelude::*;

        use crate::{
            model::report::ReportDecisionForm,
            server::{
                error::{workflow::WorkflowError, Error},
                service::report::ReportService,
            },
        };

        /// Expect reports of unassigned packages to be refused
        #[tokio::test]
        async fn requires_assigned_package() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let (_, _, report) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;

            let report_service = ReportService::new(&test.db);
            let result = report_service
                .approve(report.id, ReportDecisionForm::default())
                .await;

            assert!(matches!(
                result,
                Err(Error::WorkflowError(WorkflowError::ReportNotAssigned))
            ));

            Ok(())
        }

        /// Expect approve, reject and reset to move the report's status
        #[tokio::test]
        async fn approves_rejects_and_resets() -> Result<(), TestError> {
            let test = TestBuilder::new().with_tables().build().await?;
            let territories = test.territory().insert_test_territories().await?;
            let collectivity = test
                .organization()
                .insert_commune_collectivity(&territories.commune, "216401024", None)
                .await?;
            let ddfip = test
                .organization()
                .insert_ddfip(TEST_CODE_DEPARTEMENT)
                .await?;
            let office = test
                .organization()
                .insert_office(ddfip.id, &["evaluation_local_habitation"])
                .await?;
            let (_, package, report) = test
                .report()
                .insert_transmitted_report(collectivity.id, ddfip.id, TEST_CODE_INSEE, "2026-05-0001")
                .await?;
            let now = Utc::now().naive_utc();
            sea_orm::EntityTrait::update(entity::package::ActiveModel {
                id: sea_orm::ActiveValue::Unchanged(package.id),
                office_id: sea_orm::ActiveValue::Set(Some(office.id)),
                acknowledged_at: sea_orm::ActiveValue::Set(Some(now)),
                assigned_at: sea_orm::ActiveValue::Set(Some(now)),
                ..Default::default()
            })
            .exec(&test.db)
            .await?;

            let report_service = ReportService::new(&test.db);
            let approved = report_service
                .approve(
                    report.id,
                    ReportDecisionForm {
                        reponse: Some("Valeur locative corrigée".to_string()),
                    },
                )
                .await
                .unwrap();
            assert_eq!(approved.status, "approved");
            assert_eq!(approved.reponse.as_deref(), Some("Valeur locative corrigée"));

            let rejected = report_service
                .reject(report.id, ReportDecisionForm::default())
                .await
                .unwrap();
            assert_eq!(rejected.status, "rejected");
            assert!(rejected.approved_at.is_none());

            let reset = report_service.reset(report.id).await.unwrap();
            assert_eq!(reset.status, "assigned");
            assert!(reset.reponse.is_none());

            Ok(())
        }
    }
}
