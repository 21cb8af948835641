//! The MTB aggregate document and its format helpers.
//!
//! Responsibilities:
//! - Define the aggregate record owning every sub-document kind
//! - Render the aggregate as JSON (exchange format) or YAML (inspection)
//! - Parse JSON strictly, reporting the failing path on schema mismatch
//!
//! Notes:
//! - Repeatable sub-documents are always present as (possibly empty) lists
//! - `metadata` is always present

use crate::care_plan::MtbCarePlan;
use crate::diagnosis::{MtbDiagnosis, MtbEpisodeOfCare};
use crate::history::{FamilyMemberHistory, PerformanceStatus};
use crate::metadata::MvhMetadata;
use crate::molecular::{HistologyReport, Msi, PriorDiagnosticReport, SomaticNgsReport, TumorSpecimen};
use crate::patient::Patient;
use crate::therapy::{MtbSystemicTherapy, OncoProcedure};
use crate::{MtbError, MtbResult};
use serde::{Deserialize, Serialize};

/// The fully assembled clinical record for one root procedure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Mtb {
    pub patient: Patient,

    pub metadata: MvhMetadata,

    #[serde(default)]
    pub episodes_of_care: Vec<MtbEpisodeOfCare>,

    /// Diagnoses; the first entry is the primary diagnosis.
    pub diagnoses: Vec<MtbDiagnosis>,

    #[serde(default)]
    pub guideline_procedures: Vec<OncoProcedure>,

    #[serde(default)]
    pub guideline_therapies: Vec<MtbSystemicTherapy>,

    #[serde(default)]
    pub performance_status: Vec<PerformanceStatus>,

    #[serde(default)]
    pub family_member_histories: Vec<FamilyMemberHistory>,

    #[serde(default)]
    pub care_plans: Vec<MtbCarePlan>,

    #[serde(default)]
    pub specimens: Vec<TumorSpecimen>,

    #[serde(default)]
    pub histology_reports: Vec<HistologyReport>,

    #[serde(default)]
    pub ngs_reports: Vec<SomaticNgsReport>,

    #[serde(default)]
    pub msi_findings: Vec<Msi>,

    #[serde(default)]
    pub prior_diagnostic_reports: Vec<PriorDiagnosticReport>,
}

impl Mtb {
    /// Returns the primary diagnosis.
    pub fn primary_diagnosis(&self) -> Option<&MtbDiagnosis> {
        self.diagnoses.first()
    }

    /// Parse an MTB document from JSON text.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort "path" (e.g.
    /// `diagnoses[0].code.system`) to the failing field when the JSON does not match the model.
    ///
    /// # Errors
    ///
    /// Returns [`MtbError::Translation`] if the JSON does not match the model, including unknown
    /// keys, and [`MtbError::InvalidInput`] if the document has no diagnosis.
    pub fn parse(json_text: &str) -> MtbResult<Mtb> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let mtb = match serde_path_to_error::deserialize::<_, Mtb>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(MtbError::Translation(format!(
                    "MTB schema mismatch at {path}: {source}"
                )));
            }
        };

        if mtb.diagnoses.is_empty() {
            return Err(MtbError::InvalidInput(
                "MTB document must contain a primary diagnosis".into(),
            ));
        }

        Ok(mtb)
    }

    /// Render this document as pretty-printed JSON.
    pub fn render_json(&self) -> MtbResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render this document as YAML.
    pub fn render_yaml(&self) -> MtbResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coding::{Coding, Reference};

    fn minimal() -> Mtb {
        Mtb {
            patient: Patient {
                id: "42".into(),
                gender: None,
                birth_date: None,
                date_of_death: None,
                address: None,
            },
            metadata: MvhMetadata::default(),
            episodes_of_care: vec![],
            diagnoses: vec![MtbDiagnosis {
                id: "1".into(),
                patient: Reference::patient("42"),
                code: Coding::new("http://fhir.de/CodeSystem/bfarm/icd-10-gm", "C00.0"),
                topography: None,
                recorded_on: None,
                guideline_treatment_status: None,
                germline_codes: vec![],
                grading: vec![],
                staging: vec![],
            }],
            guideline_procedures: vec![],
            guideline_therapies: vec![],
            performance_status: vec![],
            family_member_histories: vec![],
            care_plans: vec![],
            specimens: vec![],
            histology_reports: vec![],
            ngs_reports: vec![],
            msi_findings: vec![],
            prior_diagnostic_reports: vec![],
        }
    }

    #[test]
    fn renders_empty_collections_as_lists() {
        let json = minimal().render_json().expect("render json");
        assert!(json.contains("\"guidelineProcedures\": []"));
        assert!(json.contains("\"carePlans\": []"));
        assert!(json.contains("\"metadata\": {"));
    }

    #[test]
    fn rendered_json_parses_back() {
        let mtb = minimal();
        let json = mtb.render_json().expect("render json");
        let parsed = Mtb::parse(&json).expect("parse json");
        assert_eq!(parsed, mtb);
        assert_eq!(
            parsed.primary_diagnosis().map(|d| d.code.code.as_str()),
            Some("C00.0")
        );
    }

    #[test]
    fn parse_reports_failing_path() {
        let json = minimal()
            .render_json()
            .expect("render json")
            .replace("\"C00.0\"", "42");

        let err = Mtb::parse(&json).expect_err("should reject wrong type");
        match err {
            MtbError::Translation(msg) => assert!(msg.contains("diagnoses[0].code.code")),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_document_without_diagnosis() {
        let mut mtb = minimal();
        mtb.diagnoses.clear();
        let json = mtb.render_json().expect("render json");

        let err = Mtb::parse(&json).expect_err("should reject missing diagnosis");
        assert!(matches!(err, MtbError::InvalidInput(_)));
    }

    #[test]
    fn renders_yaml() {
        let yaml = minimal().render_yaml().expect("render yaml");
        assert!(yaml.contains("patient:"));
        assert!(yaml.contains("code: C00.0"));
    }
}
