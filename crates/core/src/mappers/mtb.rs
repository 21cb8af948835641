//! Root aggregation: one KPA record into one MTB document.
//!
//! Responsibilities:
//! - Resolve the root record by id or case id
//! - Build every section of the document with its leaf or composite mapper
//! - Apply the per-section failure policy
//!
//! Notes:
//! - A fresh [`CatalogueRegistry`] is created per run; nothing is shared between runs
//! - The result is either a complete document or an error, never a partial document
//! - Subform data attached to the primary diagnosis (germline codes, grading, staging) forms
//!   sections of its own, so losing one of them never loses the diagnosis

use super::{
    degrade, CarePlanSubforms, ConsentMvDataMapper, DataMapper, HistologieDataMapper,
    KeimbahndiagnoseDataMapper, KpaDiagnosisDataMapper, KpaEcogDataMapper, KpaEpisodeDataMapper, KpaPatientDataMapper,
    KpaProzedurDataMapper, KpaTherapielinieDataMapper, KpaVerwandteDataMapper,
    MolekulargenetikDataMapper, PatientDataMapper, TherapieplanDataMapper,
    TumorausbreitungDataMapper, TumorgradingDataMapper, VorbefundeDataMapper,
};
use crate::catalogues::{CatalogueId, CatalogueRegistry, DataCatalogue};
use crate::coding;
use crate::config::CoreConfig;
use crate::constants::{CONSENT_MV_COLUMN, PATIENT_ID_COLUMN, REASON_CONSENT_MISSING_COLUMN};
use crate::error::DataResult;
use crate::property::PropertyCatalogue;
use crate::query::QueryExecutor;
use crate::result_set::ResultSet;
use ::mtb::{
    ModelProjectConsent, Mtb, MtbEpisodeOfCare, MvhMetadata, MvhSubmissionType, Patient,
    Reference, ResearchConsentReasonMissing, TumorCellContentMethod,
};
use std::rc::Rc;

/// A top-level part of the MTB document, or a part of the primary diagnosis read from its own
/// table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Patient,
    Diagnosis,
    GermlineDiagnoses,
    TumorGrading,
    TumorStaging,
    EpisodesOfCare,
    GuidelineProcedures,
    GuidelineTherapies,
    PerformanceStatus,
    FamilyMemberHistories,
    CarePlans,
    Specimens,
    HistologyReports,
    NgsReports,
    MsiFindings,
    PriorDiagnosticReports,
    ModelProjectConsent,
}

impl Section {
    pub const ALL: [Section; 17] = [
        Section::Patient,
        Section::Diagnosis,
        Section::GermlineDiagnoses,
        Section::TumorGrading,
        Section::TumorStaging,
        Section::EpisodesOfCare,
        Section::GuidelineProcedures,
        Section::GuidelineTherapies,
        Section::PerformanceStatus,
        Section::FamilyMemberHistories,
        Section::CarePlans,
        Section::Specimens,
        Section::HistologyReports,
        Section::NgsReports,
        Section::MsiFindings,
        Section::PriorDiagnosticReports,
        Section::ModelProjectConsent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Section::Patient => "patient",
            Section::Diagnosis => "diagnoses",
            Section::GermlineDiagnoses => "diagnoses.germlineCodes",
            Section::TumorGrading => "diagnoses.grading",
            Section::TumorStaging => "diagnoses.staging",
            Section::EpisodesOfCare => "episodesOfCare",
            Section::GuidelineProcedures => "guidelineProcedures",
            Section::GuidelineTherapies => "guidelineTherapies",
            Section::PerformanceStatus => "performanceStatus",
            Section::FamilyMemberHistories => "familyMemberHistories",
            Section::CarePlans => "carePlans",
            Section::Specimens => "specimens",
            Section::HistologyReports => "histologyReports",
            Section::NgsReports => "ngsReports",
            Section::MsiFindings => "msiFindings",
            Section::PriorDiagnosticReports => "priorDiagnosticReports",
            Section::ModelProjectConsent => "metadata.modelProjectConsent",
        }
    }
}

/// What a section failure does to the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any failure aborts the document.
    Required,
    /// Data-access failures leave the section empty; all other failures abort.
    Optional,
}

/// Patient and diagnosis are built without a fallback; every other section goes through
/// [`MtbDataMapper::policy`].
pub const SECTION_POLICIES: &[(Section, FailurePolicy)] = &[
    (Section::Patient, FailurePolicy::Required),
    (Section::Diagnosis, FailurePolicy::Required),
    (Section::GermlineDiagnoses, FailurePolicy::Optional),
    (Section::TumorGrading, FailurePolicy::Optional),
    (Section::TumorStaging, FailurePolicy::Optional),
    (Section::EpisodesOfCare, FailurePolicy::Optional),
    (Section::GuidelineProcedures, FailurePolicy::Optional),
    (Section::GuidelineTherapies, FailurePolicy::Optional),
    (Section::PerformanceStatus, FailurePolicy::Optional),
    (Section::FamilyMemberHistories, FailurePolicy::Optional),
    (Section::CarePlans, FailurePolicy::Optional),
    (Section::Specimens, FailurePolicy::Optional),
    (Section::HistologyReports, FailurePolicy::Optional),
    (Section::NgsReports, FailurePolicy::Optional),
    (Section::MsiFindings, FailurePolicy::Optional),
    (Section::PriorDiagnosticReports, FailurePolicy::Optional),
    (Section::ModelProjectConsent, FailurePolicy::Optional),
];

/// Loads and maps complete MTB documents.
pub struct MtbDataMapper {
    executor: Rc<dyn QueryExecutor>,
    properties: Rc<dyn PropertyCatalogue>,
    strict: bool,
    tumor_cell_content_method: TumorCellContentMethod,
}

impl MtbDataMapper {
    pub fn new(executor: Rc<dyn QueryExecutor>, properties: Rc<dyn PropertyCatalogue>) -> Self {
        Self {
            executor,
            properties,
            strict: false,
            tumor_cell_content_method: TumorCellContentMethod::default(),
        }
    }

    /// Create a mapper honouring the resolved configuration.
    pub fn from_config(
        executor: Rc<dyn QueryExecutor>,
        properties: Rc<dyn PropertyCatalogue>,
        config: &CoreConfig,
    ) -> Self {
        Self::new(executor, properties)
            .with_strict(config.strict())
            .with_tumor_cell_content_method(config.tumor_cell_content_method())
    }

    /// In strict mode every section is [`FailurePolicy::Required`].
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_tumor_cell_content_method(mut self, method: TumorCellContentMethod) -> Self {
        self.tumor_cell_content_method = method;
        self
    }

    pub fn policy(&self, section: Section) -> FailurePolicy {
        if self.strict {
            return FailurePolicy::Required;
        }
        SECTION_POLICIES
            .iter()
            .find(|(s, _)| *s == section)
            .map_or(FailurePolicy::Required, |(_, policy)| *policy)
    }

    /// Loads and maps the MTB document of the root record `kpa_id`.
    ///
    /// # Errors
    ///
    /// - [`crate::DataMapperError::RecordNotFound`] / [`crate::DataMapperError::AmbiguousRecord`]
    ///   if the root record or the patient cannot be resolved uniquely.
    /// - Any non-recoverable error of any section, and any error of a required section.
    pub fn get_by_id(&self, kpa_id: i64) -> DataResult<Mtb> {
        let registry = CatalogueRegistry::new(Rc::clone(&self.executor));
        self.map_root(&registry, kpa_id)
    }

    /// Loads and maps the MTB document of the root record with case id `case_id`.
    pub fn get_by_case_id(&self, case_id: &str) -> DataResult<Mtb> {
        let registry = CatalogueRegistry::new(Rc::clone(&self.executor));
        let kpa_id = registry
            .catalogue(CatalogueId::Kpa)?
            .procedure_id_by_case_id(case_id)?;

        tracing::debug!(case_id, kpa_id, "resolved case id");
        self.map_root(&registry, kpa_id)
    }

    fn section<T: Default>(
        &self,
        section: Section,
        build: impl FnOnce() -> DataResult<T>,
    ) -> DataResult<T> {
        match build() {
            Ok(value) => Ok(value),
            Err(err) if err.is_recoverable() && self.policy(section) == FailurePolicy::Optional => {
                tracing::warn!(section = section.name(), error = %err, "omitting optional section");
                Ok(T::default())
            }
            Err(err) => Err(err),
        }
    }

    fn map_root(&self, registry: &CatalogueRegistry, kpa_id: i64) -> DataResult<Mtb> {
        let kpa = registry.catalogue(CatalogueId::Kpa)?;
        let root = kpa.get_by_id(kpa_id)?;
        let patient_id = root.required_long(PATIENT_ID_COLUMN)?;

        let patient = self.patient(registry, &kpa, &root, patient_id)?;

        let mut primary =
            KpaDiagnosisDataMapper::new(Rc::clone(&kpa), Rc::clone(&self.properties)).map(&root)?;
        primary.germline_codes = self.section(Section::GermlineDiagnoses, || {
            KeimbahndiagnoseDataMapper::new(registry.catalogue(CatalogueId::Keimbahndiagnose)?)
                .get_codes(kpa_id)
        })?;
        primary.grading = self.section(Section::TumorGrading, || {
            TumorgradingDataMapper::new(registry.catalogue(CatalogueId::Tumorgrading)?)
                .get_by_parent_id(kpa_id)
        })?;
        primary.staging = self.section(Section::TumorStaging, || {
            TumorausbreitungDataMapper::new(registry.catalogue(CatalogueId::Tumorausbreitung)?)
                .get_by_parent_id(kpa_id)
        })?;
        let diagnoses = vec![primary];

        let episodes_of_care: Vec<MtbEpisodeOfCare> = self.section(Section::EpisodesOfCare, || {
            let episode = KpaEpisodeDataMapper::new(Rc::clone(&kpa)).map(&root)?;
            Ok(episode.into_iter().collect())
        })?;

        let guideline_procedures = self.section(Section::GuidelineProcedures, || {
            KpaProzedurDataMapper::new(registry.catalogue(CatalogueId::Prozedur)?)
                .get_by_parent_id(kpa_id)
        })?;

        let guideline_therapies = self.section(Section::GuidelineTherapies, || {
            KpaTherapielinieDataMapper::new(registry.catalogue(CatalogueId::Therapielinie)?)
                .get_by_parent_id(kpa_id)
        })?;

        let performance_status = self.section(Section::PerformanceStatus, || {
            KpaEcogDataMapper::new(registry.catalogue(CatalogueId::Ecog)?).get_by_parent_id(kpa_id)
        })?;

        let family_member_histories = self.section(Section::FamilyMemberHistories, || {
            KpaVerwandteDataMapper::new(registry.catalogue(CatalogueId::Verwandte)?)
                .get_by_parent_id(kpa_id)
        })?;

        let care_plans = self.section(Section::CarePlans, || {
            TherapieplanDataMapper::new(
                registry.catalogue(CatalogueId::Therapieplan)?,
                CarePlanSubforms {
                    recommendations: registry.catalogue(CatalogueId::Einzelempfehlung)?,
                    rebiopsies: registry.catalogue(CatalogueId::Rebiopsie)?,
                    reevaluations: registry.catalogue(CatalogueId::Reevaluation)?,
                },
                Rc::clone(&self.properties),
            )
            .get_by_kpa_id(kpa_id)
        })?;

        let specimens = self.section(Section::Specimens, || {
            self.molecular(registry, kpa_id)?.get_specimens(patient_id)
        })?;

        let histology_reports = self.section(Section::HistologyReports, || {
            HistologieDataMapper::new(
                registry.catalogue(CatalogueId::Histologie)?,
                Rc::clone(&self.properties),
                self.tumor_cell_content_method,
            )
            .get_by_parent_id(kpa_id)
        })?;

        let ngs_reports = self.section(Section::NgsReports, || {
            self.molecular(registry, kpa_id)?.get_ngs_reports(patient_id)
        })?;

        let msi_findings = self.section(Section::MsiFindings, || {
            self.molecular(registry, kpa_id)?.get_msi_findings(patient_id)
        })?;

        let prior_diagnostic_reports = self.section(Section::PriorDiagnosticReports, || {
            VorbefundeDataMapper::new(registry.catalogue(CatalogueId::Vorbefunde)?)
                .get_by_parent_id(kpa_id)
        })?;

        let metadata = MvhMetadata {
            type_: MvhSubmissionType::Initial,
            model_project_consent: self.section(Section::ModelProjectConsent, || {
                self.model_project_consent(registry, &root)
            })?,
            reason_research_consent_missing: reason_research_consent_missing(&root)?,
        };

        let mtb = Mtb {
            patient,
            metadata,
            episodes_of_care,
            diagnoses,
            guideline_procedures,
            guideline_therapies,
            performance_status,
            family_member_histories,
            care_plans,
            specimens,
            histology_reports,
            ngs_reports,
            msi_findings,
            prior_diagnostic_reports,
        };

        tracing::info!(
            kpa_id,
            procedures = mtb.guideline_procedures.len(),
            therapies = mtb.guideline_therapies.len(),
            care_plans = mtb.care_plans.len(),
            ngs_reports = mtb.ngs_reports.len(),
            "mapped MTB document"
        );
        Ok(mtb)
    }

    fn patient(
        &self,
        registry: &CatalogueRegistry,
        kpa: &Rc<DataCatalogue>,
        root: &ResultSet,
        patient_id: i64,
    ) -> DataResult<Patient> {
        let patient = KpaPatientDataMapper::new(Rc::clone(kpa)).map(root)?;
        let stored = PatientDataMapper::new(registry.catalogue(CatalogueId::Patient)?)
            .get_by_id(patient_id)?;

        Ok(patient.with_address(stored.address))
    }

    fn molecular(
        &self,
        registry: &CatalogueRegistry,
        kpa_id: i64,
    ) -> DataResult<MolekulargenetikDataMapper> {
        Ok(MolekulargenetikDataMapper::new(
            registry.catalogue(CatalogueId::Molekulargenetik)?,
            registry.catalogue(CatalogueId::Molekulargenuntersuchung)?,
            registry.catalogue(CatalogueId::MolekulargenMsi)?,
            Reference::diagnosis(kpa_id.to_string()),
        ))
    }

    fn model_project_consent(
        &self,
        registry: &CatalogueRegistry,
        root: &ResultSet,
    ) -> DataResult<Option<ModelProjectConsent>> {
        let Some(consent_id) = root.get_long(CONSENT_MV_COLUMN)? else {
            return Ok(None);
        };

        ConsentMvDataMapper::new(
            registry.catalogue(CatalogueId::ConsentMv)?,
            registry.catalogue(CatalogueId::ConsentMvVerlauf)?,
        )
        .get_latest(consent_id)
    }
}

/// Read from the root row only, independently of the consent tables.
fn reason_research_consent_missing(
    root: &ResultSet,
) -> DataResult<Option<ResearchConsentReasonMissing>> {
    degrade(
        REASON_CONSENT_MISSING_COLUMN,
        root.get_string(REASON_CONSENT_MISSING_COLUMN)?
            .map(|raw| coding::research_consent_reason_missing(&raw))
            .transpose(),
    )
}
