//! Tumor board care plans and their recommendations.

use crate::coding::{Coding, Reference};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The care plan issued by a tumor board session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MtbCarePlan {
    pub id: String,

    pub patient: Reference,

    /// The diagnosis this plan addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    #[serde(default)]
    pub medication_recommendations: Vec<MtbMedicationRecommendation>,

    #[serde(default)]
    pub study_enrollment_recommendations: Vec<MtbStudyEnrollmentRecommendation>,

    #[serde(default)]
    pub rebiopsy_requests: Vec<RebiopsyRequest>,

    #[serde(default)]
    pub histology_reevaluation_requests: Vec<HistologyReevaluationRequest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Request for a new biopsy of the tumor entity the plan addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RebiopsyRequest {
    pub id: String,

    pub patient: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_entity: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
}

/// Request to re-evaluate the histology of an existing specimen.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistologyReevaluationRequest {
    pub id: String,

    pub patient: Reference,

    pub specimen: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,
}

/// A recommended systemic therapy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MtbMedicationRecommendation {
    pub id: String,

    pub patient: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_evidence: Option<LevelOfEvidence>,

    #[serde(default)]
    pub medication: Vec<Coding>,
}

/// A recommended enrollment into one or more clinical studies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MtbStudyEnrollmentRecommendation {
    pub id: String,

    pub patient: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level_of_evidence: Option<LevelOfEvidence>,

    #[serde(default)]
    pub medication: Vec<Coding>,

    #[serde(default)]
    pub study: Vec<StudyReference>,
}

/// Evidence grading of a recommendation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LevelOfEvidence {
    pub grading: Coding,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addendums: Vec<Coding>,
}

/// Reference to a study in a study register.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StudyReference {
    /// Register-specific study number (for example an NCT number).
    pub id: String,

    /// Study register (NCT, DRKS, EUDAMED, ...).
    pub system: String,

    #[serde(rename = "type")]
    pub type_: String,
}

impl StudyReference {
    pub const TYPE: &'static str = "Study";

    pub fn new(id: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            system: system.into(),
            type_: Self::TYPE.to_string(),
        }
    }
}
