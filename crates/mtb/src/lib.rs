//! MTB exchange model.
//!
//! This crate provides the **value objects** of the molecular tumor board (MTB) data exchange
//! model and the **format helpers** used to hand a finished document to downstream consumers:
//! - JSON rendering and parsing (the exchange format)
//! - YAML rendering (for human inspection)
//!
//! This crate focuses on:
//! - plain immutable records with named fields (no builders)
//! - wire naming (camelCase fields, fixed wire codes for enumerations)
//! - strict deserialisation with path-aware error messages
//!
//! It knows nothing about databases or catalogues. Translation from relational rows into these
//! types lives in `datamapper-core`.

pub mod care_plan;
pub mod coding;
pub mod diagnosis;
pub mod document;
pub mod history;
pub mod metadata;
pub mod molecular;
pub mod patient;
pub mod therapy;

// Re-export facades
pub use document::Mtb;

// Re-export public domain-level types
pub use care_plan::{
    HistologyReevaluationRequest, LevelOfEvidence, MtbCarePlan, MtbMedicationRecommendation,
    MtbStudyEnrollmentRecommendation, RebiopsyRequest, StudyReference,
};
pub use coding::{Coding, PeriodDate, Reference};
pub use diagnosis::{MtbDiagnosis, MtbEpisodeOfCare, TnmClassification, TumorGrading, TumorStaging};
pub use history::{FamilyMemberHistory, PerformanceStatus};
pub use metadata::{
    ConsentProvision, ModelProjectConsent, ModelProjectConsentPurpose, MvhMetadata,
    MvhSubmissionType, Provision, ResearchConsentReasonMissing,
};
pub use molecular::{
    HistologyReport, HistologyResults, Msi, NgsReportResults, PriorDiagnosticReport,
    SimpleVariant, SomaticNgsReport, SpecimenCollection, TumorCellContent, TumorCellContentMethod,
    TumorSpecimen,
};
pub use patient::{Address, Patient};
pub use therapy::{MtbSystemicTherapy, OncoProcedure};

/// Errors returned by the `mtb` model crate.
#[derive(Debug, thiserror::Error)]
pub enum MtbError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`MtbError`].
pub type MtbResult<T> = Result<T, MtbError>;
