//! Model-project (MVH) submission metadata and consent.
//!
//! The enumerations in this module carry fixed wire codes. Each provides `to_wire`/`from_wire`
//! so callers translating raw database values do not need to go through serde.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Enumerations
// ============================================================================

/// Whether a consent provision permits or denies its purpose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsentProvision {
    Permit,
    Deny,
}

impl ConsentProvision {
    /// Convert to wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            ConsentProvision::Permit => "permit",
            ConsentProvision::Deny => "deny",
        }
    }

    /// Parse from wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "permit" => Some(ConsentProvision::Permit),
            "deny" => Some(ConsentProvision::Deny),
            _ => None,
        }
    }
}

/// Purposes covered by the model-project consent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelProjectConsentPurpose {
    #[serde(rename = "sequencing")]
    Sequencing,
    #[serde(rename = "case-identification")]
    CaseIdentification,
    #[serde(rename = "reidentification")]
    Reidentification,
}

impl ModelProjectConsentPurpose {
    /// All purposes, in the order provisions are emitted.
    pub const ALL: [ModelProjectConsentPurpose; 3] = [
        ModelProjectConsentPurpose::Sequencing,
        ModelProjectConsentPurpose::CaseIdentification,
        ModelProjectConsentPurpose::Reidentification,
    ];

    /// Convert to wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            ModelProjectConsentPurpose::Sequencing => "sequencing",
            ModelProjectConsentPurpose::CaseIdentification => "case-identification",
            ModelProjectConsentPurpose::Reidentification => "reidentification",
        }
    }

    /// Parse from wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "sequencing" => Some(ModelProjectConsentPurpose::Sequencing),
            "case-identification" => Some(ModelProjectConsentPurpose::CaseIdentification),
            "reidentification" => Some(ModelProjectConsentPurpose::Reidentification),
            _ => None,
        }
    }
}

/// Why no research (broad) consent is available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResearchConsentReasonMissing {
    PatientRefusedToSignConsent,
    PatientUnableToConsent,
    ConsentNotReturned,
    OtherPatientReason,
    TechnicalIssues,
    OrganizationalIssues,
}

impl ResearchConsentReasonMissing {
    /// Convert to wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            Self::PatientRefusedToSignConsent => "patient-refused-to-sign-consent",
            Self::PatientUnableToConsent => "patient-unable-to-consent",
            Self::ConsentNotReturned => "consent-not-returned",
            Self::OtherPatientReason => "other-patient-reason",
            Self::TechnicalIssues => "technical-issues",
            Self::OrganizationalIssues => "organizational-issues",
        }
    }

    /// Parse from wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "patient-refused-to-sign-consent" => Some(Self::PatientRefusedToSignConsent),
            "patient-unable-to-consent" => Some(Self::PatientUnableToConsent),
            "consent-not-returned" => Some(Self::ConsentNotReturned),
            "other-patient-reason" => Some(Self::OtherPatientReason),
            "technical-issues" => Some(Self::TechnicalIssues),
            "organizational-issues" => Some(Self::OrganizationalIssues),
            _ => None,
        }
    }
}

/// Kind of submission a document belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MvhSubmissionType {
    #[default]
    Initial,
    Addition,
    Correction,
    Followup,
}

// ============================================================================
// Records
// ============================================================================

/// One provision of the model-project consent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Provision {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub purpose: ModelProjectConsentPurpose,

    #[serde(rename = "type")]
    pub type_: ConsentProvision,
}

/// The model-project consent with its provisions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelProjectConsent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub provisions: Vec<Provision>,
}

/// Submission metadata of an MTB document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MvhMetadata {
    #[serde(rename = "type", default)]
    pub type_: MvhSubmissionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_project_consent: Option<ModelProjectConsent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_research_consent_missing: Option<ResearchConsentReasonMissing>,
}
