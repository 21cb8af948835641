//! Constants used throughout the datamapper core crate.
//!
//! Column names shared by several catalogues and mappers, and the code system identifiers of
//! the MTB model, live here so the catalogue specs, mappers and normalizer agree on them.

/// Primary key column of every form and subform table.
pub const ID_COLUMN: &str = "id";

/// Parent key column of subform tables (id of the owning form record).
pub const PARENT_ID_COLUMN: &str = "hauptprozedur_id";

/// Column holding the patient's database id.
pub const PATIENT_ID_COLUMN: &str = "patient_id";

/// Suffix of the column holding the property catalogue version of a coded column.
pub const PROPCAT_VERSION_SUFFIX: &str = "_propcat_version";

/// Root form column holding the id of the model-project consent form.
pub const CONSENT_MV_COLUMN: &str = "consentmv64e";

/// Root form column holding the reason for a missing research consent.
pub const REASON_CONSENT_MISSING_COLUMN: &str = "grundkeinbroadconsent";

/// ICD-10-GM code system.
pub const ICD10_GM_SYSTEM: &str = "http://fhir.de/CodeSystem/bfarm/icd-10-gm";

/// ICD-O-3 topography code system.
pub const ICDO3_TOPOGRAPHY_SYSTEM: &str = "urn:oid:2.16.840.1.113883.6.43.1";

/// ICD-O-3 morphology code system.
pub const ICDO3_MORPHOLOGY_SYSTEM: &str = "urn:oid:2.16.840.1.113883.6.43.1";

/// ATC code system for registered substances.
pub const ATC_SYSTEM: &str = "http://fhir.de/CodeSystem/bfarm/atc";

/// Code system for substances without an ATC code.
pub const UNREGISTERED_MEDICATION_SYSTEM: &str = "undefined";
