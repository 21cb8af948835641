//! Specimens and the diagnostic reports issued on them.
//!
//! Histology, sequencing and MSI results carry measured fractions, so the records holding them
//! only implement `PartialEq`.

use crate::coding::{Coding, Reference};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How the tumor cell content of a specimen was determined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TumorCellContentMethod {
    #[default]
    Histologic,
    Bioinformatic,
}

impl TumorCellContentMethod {
    pub const SYSTEM: &'static str = "dnpm-dip/mtb/tumor-cell-content/method";

    /// Convert to wire format string.
    pub fn to_wire(self) -> &'static str {
        match self {
            TumorCellContentMethod::Histologic => "histologic",
            TumorCellContentMethod::Bioinformatic => "bioinformatic",
        }
    }

    /// Parse from wire format string.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "histologic" => Some(TumorCellContentMethod::Histologic),
            "bioinformatic" => Some(TumorCellContentMethod::Bioinformatic),
            _ => None,
        }
    }

    pub fn coding(self) -> Coding {
        Coding::new(Self::SYSTEM, self.to_wire())
    }
}

/// A tumor specimen sent for molecular diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TumorSpecimen {
    pub id: String,

    pub patient: Reference,

    pub diagnosis: Reference,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<SpecimenCollection>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpecimenCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Coding>,
}

/// Histology findings on a specimen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistologyReport {
    pub id: String,

    pub patient: Reference,

    pub specimen: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    pub results: HistologyResults,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistologyResults {
    /// ICD-O-3 morphology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_morphology: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tumor_cell_content: Option<TumorCellContent>,
}

/// Share of tumor cells in a specimen, between 0 and 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TumorCellContent {
    pub method: Coding,

    pub value: f64,
}

/// A somatic sequencing report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SomaticNgsReport {
    pub id: String,

    pub patient: Reference,

    pub specimen: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    /// Sequencing type (panel, exome, genome).
    #[serde(rename = "type")]
    pub type_: Coding,

    #[serde(default)]
    pub results: NgsReportResults,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NgsReportResults {
    #[serde(default)]
    pub simple_variants: Vec<SimpleVariant>,
}

/// A single nucleotide variant or small indel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SimpleVariant {
    pub id: String,

    pub patient: Reference,

    /// HGNC gene symbol.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene: Option<Coding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dna_change: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_change: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allelic_frequency: Option<f64>,
}

/// A microsatellite instability finding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Msi {
    pub id: String,

    pub patient: Reference,

    pub specimen: Reference,

    pub method: Coding,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<Coding>,
}

/// A molecular report issued before the tumor board case was opened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PriorDiagnosticReport {
    pub id: String,

    pub patient: Reference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specimen: Option<Reference>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<Coding>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_content_method_wire_codes() {
        assert_eq!(
            TumorCellContentMethod::from_wire("bioinformatic"),
            Some(TumorCellContentMethod::Bioinformatic)
        );
        assert_eq!(TumorCellContentMethod::from_wire("Histologic"), None);
        assert_eq!(TumorCellContentMethod::default().coding().code, "histologic");
    }

    #[test]
    fn ngs_report_defaults_missing_results() {
        let json = r#"{
            "id": "5",
            "patient": {"id": "42", "type": "Patient"},
            "specimen": {"id": "5", "type": "TumorSpecimen"},
            "type": {"code": "panel", "system": "dnpm-dip/mtb/ngs-report/type"}
        }"#;
        let report: SomaticNgsReport = serde_json::from_str(json).expect("parse report");
        assert!(report.results.simple_variants.is_empty());
        assert_eq!(report.specimen, Reference::specimen("5"));
    }
}
