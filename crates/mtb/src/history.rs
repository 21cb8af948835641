//! Performance status observations and family member history entries.

use crate::coding::{Coding, Reference};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ECOG performance status observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PerformanceStatus {
    pub id: String,

    pub patient: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,

    pub value: Coding,
}

/// A relative of the patient with a relevant history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FamilyMemberHistory {
    pub id: String,

    pub patient: Reference,

    pub relationship: Coding,
}
