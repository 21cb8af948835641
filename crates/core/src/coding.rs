//! Coded value normalization.
//!
//! Raw codes stored in the documentation database are translated into MTB codings through
//! static [`CodeTable`]s. All functions here are pure; an unknown code is reported as
//! [`DataMapperError::UnmappableCode`] and the caller decides whether that is fatal for the
//! field at hand.

use crate::constants::{
    ATC_SYSTEM, ICD10_GM_SYSTEM, ICDO3_MORPHOLOGY_SYSTEM, ICDO3_TOPOGRAPHY_SYSTEM,
    UNREGISTERED_MEDICATION_SYSTEM,
};
use crate::error::{DataMapperError, DataResult};
use crate::property::PropertyCatalogue;
use mtb::{
    Coding, ConsentProvision, ModelProjectConsentPurpose, ResearchConsentReasonMissing,
    StudyReference,
};
use serde::Deserialize;

/// A fixed translation from raw database codes to codings of one system.
#[derive(Debug)]
pub struct CodeTable {
    pub system: &'static str,
    /// `(raw code, target code, display)`
    pub entries: &'static [(&'static str, &'static str, &'static str)],
}

impl CodeTable {
    /// Translates `raw` into a coding of this table's system.
    ///
    /// # Errors
    ///
    /// Returns [`DataMapperError::UnmappableCode`] if `raw` is not in the table.
    pub fn coding(&self, raw: &str) -> DataResult<Coding> {
        let raw = raw.trim();
        self.entries
            .iter()
            .find(|(from, _, _)| *from == raw)
            .map(|(_, code, display)| Coding::new(self.system, *code).with_display(*display))
            .ok_or_else(|| unmappable(self.system, raw))
    }
}

fn unmappable(system: &str, code: &str) -> DataMapperError {
    DataMapperError::UnmappableCode {
        system: system.to_string(),
        code: code.to_string(),
    }
}

pub static THERAPY_INTENT: CodeTable = CodeTable {
    system: "dnpm-dip/therapy/intent",
    entries: &[
        ("K", "K", "Kurativ"),
        ("P", "P", "Palliativ"),
        ("S", "S", "Sonstiges"),
        ("X", "X", "Keine Angabe"),
    ],
};

pub static THERAPY_STATUS: CodeTable = CodeTable {
    system: "dnpm-dip/therapy/status",
    entries: &[
        ("not-done", "not-done", "Nicht umgesetzt"),
        ("on-going", "on-going", "Laufend"),
        ("stopped", "stopped", "Abgebrochen"),
        ("completed", "completed", "Abgeschlossen"),
        ("unknown", "unknown", "Unbekannt"),
    ],
};

pub static THERAPY_STATUS_REASON: CodeTable = CodeTable {
    system: "dnpm-dip/therapy/status-reason",
    entries: &[
        ("chronic-remission", "chronic-remission", "Anhaltende Remission"),
        ("continued-externally", "continued-externally", "Weiterbehandlung extern"),
        ("deterioration", "deterioration", "Zustandsverschlechterung"),
        ("lost-to-fu", "lost-to-fu", "Lost to follow-up"),
        ("medical-reasons", "medical-reasons", "Medizinische Gründe"),
        ("no-indication", "no-indication", "Keine Indikation"),
        ("other", "other", "Weitere Gründe"),
        ("other-therapy-chosen", "other-therapy-chosen", "Wahl einer anderen Therapie"),
        ("patient-death", "patient-death", "Tod"),
        ("patient-refusal", "patient-refusal", "Ablehnung durch Patient"),
        ("patient-wish", "patient-wish", "Wunsch des Patienten"),
        ("payment-ended", "payment-ended", "Ende der Leistungsübernahme"),
        ("payment-pending", "payment-pending", "Kostenübernahme noch ausstehend"),
        ("payment-refused", "payment-refused", "Kostenübernahme abgelehnt"),
        ("progression", "progression", "Progression"),
        ("toxicity", "toxicity", "Toxizität"),
        ("unknown", "unknown", "Unbekannt"),
    ],
};

pub static PROCEDURE_TYPE: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/procedure/type",
    entries: &[
        ("OP", "surgery", "OP"),
        ("surgery", "surgery", "OP"),
        ("ST", "radio-therapy", "Strahlentherapie"),
        ("radio-therapy", "radio-therapy", "Strahlentherapie"),
        ("NM", "nuclear-medicine", "Nuklearmedizin"),
        ("nuclear-medicine", "nuclear-medicine", "Nuklearmedizin"),
        ("S", "other", "Sonstiges"),
        ("other", "other", "Sonstiges"),
    ],
};

pub static FAMILY_RELATIONSHIP: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/family-meber-history/relationship-type",
    entries: &[
        ("FAMMEMB", "FAMMEMB", "Verwandter ersten Grades"),
        ("EXT", "EXT", "Verwandter weiteren Grades"),
    ],
};

pub static ECOG: CodeTable = CodeTable {
    system: "ECOG-Performance-Status",
    entries: &[
        ("0", "0", "ECOG 0"),
        ("1", "1", "ECOG 1"),
        ("2", "2", "ECOG 2"),
        ("3", "3", "ECOG 3"),
        ("4", "4", "ECOG 4"),
    ],
};

pub static GUIDELINE_TREATMENT_STATUS: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/diagnosis/guideline-treatment-status",
    entries: &[
        ("exhausted", "exhausted", "Leitlinien ausgeschöpft"),
        ("non-exhausted", "non-exhausted", "Leitlinien nicht ausgeschöpft"),
        ("impossible", "impossible", "Leitlinientherapie nicht möglich"),
        ("no-guidelines-available", "no-guidelines-available", "Keine Leitlinien vorhanden"),
        ("unknown", "unknown", "Unbekannt"),
    ],
};

pub static GENDER: CodeTable = CodeTable {
    system: "Gender",
    entries: &[
        ("M", "male", "Männlich"),
        ("W", "female", "Weiblich"),
        ("F", "female", "Weiblich"),
        ("D", "other", "Divers"),
        ("X", "unknown", "Unbekannt"),
        ("U", "unknown", "Unbekannt"),
    ],
};

pub static EVIDENCE_GRADING: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/level-of-evidence/grading",
    entries: &[
        ("m1A", "m1A", "m1A"),
        ("m1B", "m1B", "m1B"),
        ("m1C", "m1C", "m1C"),
        ("m2A", "m2A", "m2A"),
        ("m2B", "m2B", "m2B"),
        ("m2C", "m2C", "m2C"),
        ("m3", "m3", "m3"),
        ("m4", "m4", "m4"),
        ("undefined", "undefined", "Undefiniert"),
    ],
};

pub static EVIDENCE_ADDENDUM: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/level-of-evidence/addendum",
    entries: &[
        ("is", "is", "is"),
        ("iv", "iv", "iv"),
        ("Z", "Z", "Z"),
        ("R", "R", "R"),
    ],
};

pub static TUMOR_GRADING: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/tumor-grading",
    entries: &[
        ("G1", "G1", "Gut differenziert"),
        ("G2", "G2", "Mäßig differenziert"),
        ("G3", "G3", "Schlecht differenziert"),
        ("G4", "G4", "Undifferenziert"),
        ("GX", "GX", "Nicht bestimmbar"),
        ("L", "L", "Low grade"),
        ("H", "H", "High grade"),
    ],
};

pub static TUMOR_STAGING_METHOD: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/tumor-staging/method",
    entries: &[
        ("c", "clinical", "Klinisch"),
        ("clinical", "clinical", "Klinisch"),
        ("p", "pathologic", "Pathologisch"),
        ("pathologic", "pathologic", "Pathologisch"),
    ],
};

pub static SPECIMEN_TYPE: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/tumor-specimen/type",
    entries: &[
        ("FF", "fresh-tissue", "Frischgewebe"),
        ("CF", "cryo-frozen", "Kryokonserviert"),
        ("FFPE", "FFPE", "FFPE"),
        ("LB", "liquid-biopsy", "Liquid Biopsy"),
        ("U", "unknown", "Unbekannt"),
    ],
};

pub static SPECIMEN_COLLECTION_METHOD: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/tumor-specimen/collection/method",
    entries: &[
        ("B", "biopsy", "Biopsie"),
        ("R", "resection", "Resektat"),
        ("LB", "liquid-biopsy", "Liquid Biopsy"),
        ("Z", "cytology", "Zytologie"),
        ("U", "unknown", "Unbekannt"),
    ],
};

pub static NGS_REPORT_TYPE: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/ngs-report/type",
    entries: &[
        ("P", "panel", "Panel"),
        ("WES", "exome", "Exom"),
        ("WGS", "genome-short-read", "Genom (short read)"),
        ("WGSLR", "genome-long-read", "Genom (long read)"),
    ],
};

pub static MSI_METHOD: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/msi/method",
    entries: &[
        ("IHC", "IHC", "Immunhistochemie"),
        ("PCR", "PCR", "PCR"),
        ("BI", "bioinformatic", "Bioinformatisch"),
    ],
};

pub static MSI_INTERPRETATION: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/msi/interpretation",
    entries: &[
        ("MSI-H", "msi-high", "MSI-H"),
        ("MSI-L", "msi-low", "MSI-L"),
        ("MSS", "stable", "MSS"),
        ("U", "unknown", "Unbekannt"),
    ],
};

pub static MOLECULAR_REPORT_TYPE: CodeTable = CodeTable {
    system: "dnpm-dip/mtb/molecular-diagnostic-report/type",
    entries: &[
        ("array", "array", "Array"),
        ("single", "single", "Einzelgen"),
        ("karyotyping", "karyotyping", "Karyotypisierung"),
        ("FISH", "FISH", "FISH"),
        ("PCR", "PCR", "PCR"),
        ("panel", "panel", "Panel"),
        ("exome", "exome", "Exom"),
        ("genome", "genome-short-read", "Genom"),
        ("other", "other", "Sonstige"),
    ],
};

const RECOMMENDATION_PRIORITY_SYSTEM: &str = "dnpm-dip/recommendation/priority";
const UICC_SYSTEM: &str = "UICC";
const OTHER_STAGING_SYSTEM: &str = "dnpm-dip/mtb/tumor-staging/other";
const HGNC_SYSTEM: &str = "https://www.genenames.org/";
const CONSENT_PROVISION_SYSTEM: &str = "mv64e/consent/provision-type";
const CONSENT_PURPOSE_SYSTEM: &str = "mv64e/consent/purpose";
const CONSENT_REASON_MISSING_SYSTEM: &str = "mv64e/consent/reason-research-consent-missing";

/// Translates a stored consent decision (`permit` / `deny`, case-insensitive).
pub fn consent_provision(raw: &str) -> DataResult<ConsentProvision> {
    ConsentProvision::from_wire(&raw.trim().to_ascii_lowercase())
        .ok_or_else(|| unmappable(CONSENT_PROVISION_SYSTEM, raw))
}

/// Translates a consent purpose, accepting the wire code or the stored column spelling
/// (`caseidentification`).
pub fn consent_purpose(raw: &str) -> DataResult<ModelProjectConsentPurpose> {
    let normalized = raw.trim().to_ascii_lowercase();
    let purpose = match normalized.as_str() {
        "caseidentification" => Some(ModelProjectConsentPurpose::CaseIdentification),
        other => ModelProjectConsentPurpose::from_wire(other),
    };
    purpose.ok_or_else(|| unmappable(CONSENT_PURPOSE_SYSTEM, raw))
}

pub fn research_consent_reason_missing(raw: &str) -> DataResult<ResearchConsentReasonMissing> {
    ResearchConsentReasonMissing::from_wire(raw.trim())
        .ok_or_else(|| unmappable(CONSENT_REASON_MISSING_SYSTEM, raw))
}

/// An ICD-10-GM coding, optionally tagged with the catalogue version.
pub fn icd10(code: &str, version: Option<&str>) -> Coding {
    let coding = Coding::new(ICD10_GM_SYSTEM, code.trim());
    match version {
        Some(v) => coding.with_version(v),
        None => coding,
    }
}

pub fn icdo3_topography(code: &str) -> Coding {
    Coding::new(ICDO3_TOPOGRAPHY_SYSTEM, code.trim())
}

pub fn icdo3_morphology(code: &str) -> Coding {
    Coding::new(ICDO3_MORPHOLOGY_SYSTEM, code.trim())
}

/// One TNM component (`T2`, `N0`, `M1` ...) as recorded.
pub fn tnm(code: &str) -> Coding {
    Coding::new(UICC_SYSTEM, code.trim())
}

/// A staging classification outside TNM (for example Ann Arbor or FIGO stages).
pub fn other_staging(code: &str) -> Coding {
    Coding::new(OTHER_STAGING_SYSTEM, code.trim())
}

pub fn gene(symbol: &str) -> Coding {
    Coding::new(HGNC_SYSTEM, symbol.trim())
}

/// The priority of a recommendation, coded by its property catalogue entry.
///
/// # Errors
///
/// Returns [`DataMapperError::UnmappableCode`] when the catalogue version has no entry for
/// `code`.
pub fn recommendation_priority(
    catalogue: &dyn PropertyCatalogue,
    code: &str,
    version: i32,
) -> DataResult<Coding> {
    let display = versioned_display(catalogue, code.trim(), version)?;
    Ok(Coding::new(RECOMMENDATION_PRIORITY_SYSTEM, code.trim()).with_display(display))
}

/// Resolves the display text of a versioned catalogue property.
///
/// # Errors
///
/// Returns [`DataMapperError::UnmappableCode`] when the catalogue version has no entry with a
/// display for `code`, and propagates catalogue failures.
pub fn versioned_display(
    catalogue: &dyn PropertyCatalogue,
    code: &str,
    version: i32,
) -> DataResult<String> {
    catalogue
        .get_by_code_and_version(code, version)?
        .and_then(|entry| entry.display().map(str::to_string))
        .ok_or_else(|| unmappable(&format!("property catalogue version {version}"), code))
}

#[derive(Debug, Deserialize)]
struct MedicationEntry {
    code: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StudyEntry {
    nummer: String,
    register: String,
}

/// Parses a substance list as stored in `wirkstoffe_json` columns.
///
/// Entries marked with system `ATC` become ATC codings carrying their version; all others are
/// coded as unregistered substances.
///
/// # Errors
///
/// Returns [`DataMapperError::TypeMismatch`] on `column` if the text is not a valid list.
pub fn medications(column: &str, json: &str) -> DataResult<Vec<Coding>> {
    let entries: Vec<MedicationEntry> =
        serde_json::from_str(json).map_err(|err| DataMapperError::TypeMismatch {
            column: column.to_string(),
            expected: "medication list",
            found: err.to_string(),
        })?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            let is_atc = entry.system.as_deref() == Some("ATC");
            let mut coding = if is_atc {
                Coding::new(ATC_SYSTEM, entry.code)
            } else {
                Coding::new(UNREGISTERED_MEDICATION_SYSTEM, entry.code)
            };
            coding.display = entry.name;
            if is_atc {
                coding.version = entry.version;
            }
            coding
        })
        .collect())
}

/// Parses a study list as stored in `studien_alle_json` columns.
pub fn studies(column: &str, json: &str) -> DataResult<Vec<StudyReference>> {
    let entries: Vec<StudyEntry> =
        serde_json::from_str(json).map_err(|err| DataMapperError::TypeMismatch {
            column: column.to_string(),
            expected: "study list",
            found: err.to_string(),
        })?;

    Ok(entries
        .into_iter()
        .map(|entry| StudyReference::new(entry.nummer, entry.register))
        .collect())
}
