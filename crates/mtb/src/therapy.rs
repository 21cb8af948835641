//! Guideline therapy resources: procedures and systemic therapies.
//!
//! Both share the same therapy-course fields (intent, status, period, therapy line) and both
//! are based on exactly one diagnosis.

use crate::coding::{Coding, PeriodDate, Reference};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A non-systemic guideline procedure (surgery, radiotherapy, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OncoProcedure {
    pub id: String,

    pub patient: Reference,

    /// The diagnosis this procedure treats.
    pub based_on: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapy_line: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodDate>,

    /// Procedure type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<Coding>,
}

/// A systemic guideline therapy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MtbSystemicTherapy {
    pub id: String,

    pub patient: Reference,

    pub based_on: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub therapy_line: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodDate>,

    /// ATC (or unregistered) substances.
    #[serde(default)]
    pub medication: Vec<Coding>,
}
