//! Diagnosis and episode-of-care resources.

use crate::coding::{Coding, PeriodDate, Reference};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tumor diagnosis.
///
/// The first diagnosis of an [`crate::Mtb`] is its primary diagnosis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MtbDiagnosis {
    pub id: String,

    pub patient: Reference,

    /// ICD-10-GM code of the diagnosis.
    pub code: Coding,

    /// ICD-O-3 topography.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topography: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guideline_treatment_status: Option<Coding>,

    /// ICD-10-GM codes of germline diagnoses.
    #[serde(default)]
    pub germline_codes: Vec<Coding>,

    /// Grading history, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grading: Vec<TumorGrading>,

    /// Staging history, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub staging: Vec<TumorStaging>,
}

/// One tumor grading entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TumorGrading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub codes: Vec<Coding>,
}

/// One tumor staging entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TumorStaging {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Clinical or pathologic staging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tnm_classification: Option<TnmClassification>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_classifications: Vec<Coding>,
}

/// UICC TNM classification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TnmClassification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metastasis: Option<Coding>,
}

impl TnmClassification {
    /// True when no component is recorded.
    pub fn is_empty(&self) -> bool {
        self.tumor.is_none() && self.nodes.is_none() && self.metastasis.is_none()
    }
}

/// An episode of care at the tumor board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MtbEpisodeOfCare {
    pub id: String,

    pub patient: Reference,

    pub period: PeriodDate,

    #[serde(default)]
    pub diagnoses: Vec<Reference>,
}
