//! Patient resource of the MTB model.
//!
//! The patient is assembled from two sources: identity fields recorded on the root form and
//! address data held in the separate patient store. [`Patient::with_address`] performs that merge.

use crate::coding::Coding;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Patient demographics and identification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Patient {
    /// Database id of the patient.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Patient {
    /// Returns this patient with its address replaced.
    ///
    /// Identity fields are kept.
    pub fn with_address(mut self, address: Option<Address>) -> Self {
        self.address = address;
        self
    }
}

/// Coarse address information of a patient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Address {
    /// Official municipality key (Gemeindekennziffer).
    pub municipality_code: String,
}
