//! Shared building blocks of the MTB model: codings, references and periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A coded value from a terminology or value set.
///
/// Equality is structural: two codings are equal when system, code, display and version match.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Coding {
    /// The code within the code system.
    pub code: String,

    /// Human-readable display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    /// Identifier of the code system.
    pub system: String,

    /// Version of the code system, where the system is versioned (for example ICD-10-GM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Coding {
    /// Creates a coding without display or version.
    pub fn new(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: None,
            system: system.into(),
            version: None,
        }
    }

    /// Returns this coding with the given display text.
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Returns this coding with the given code system version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// A reference to another entity, inside or outside the document.
///
/// References are never resolved by the mapper.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

impl Reference {
    /// Reference type used for patient references.
    pub const PATIENT: &'static str = "Patient";

    /// Reference type used for diagnosis references.
    pub const DIAGNOSIS: &'static str = "MTBDiagnosis";

    pub const SPECIMEN: &'static str = "TumorSpecimen";

    pub fn new(id: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_: Some(type_.into()),
        }
    }

    /// Reference to a patient by its id.
    pub fn patient(id: impl Into<String>) -> Self {
        Self::new(id, Self::PATIENT)
    }

    /// Reference to a diagnosis by its id.
    pub fn diagnosis(id: impl Into<String>) -> Self {
        Self::new(id, Self::DIAGNOSIS)
    }

    pub fn specimen(id: impl Into<String>) -> Self {
        Self::new(id, Self::SPECIMEN)
    }
}

/// A date period with a mandatory start and an optional end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeriodDate {
    pub start: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}
