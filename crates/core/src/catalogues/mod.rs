//! Entity catalogues: row stores over the documentation tables.
//!
//! There is one catalogue type, [`DataCatalogue`], driven by a static [`TableSpec`] per
//! [`CatalogueId`]. The table description decides which lookups a table supports:
//! - every table supports [`DataCatalogue::get_by_id`]
//! - subform tables (with a parent key) support [`DataCatalogue::get_all_by_parent_id`]
//! - the root form resolves case ids, the care plan form resolves rows by root id
//! - molecular genetics forms resolve all rows of a patient
//! - therapy subforms resolve their linked diseases
//!
//! Catalogues never re-sort rows; results keep the order the store delivers them in.

pub mod registry;

pub use registry::CatalogueRegistry;

use crate::constants::{ID_COLUMN, PARENT_ID_COLUMN, PATIENT_ID_COLUMN};
use crate::error::{DataMapperError, DataResult};
use crate::query::{QueryExecutor, RawRow, SqlValue};
use crate::result_set::ResultSet;
use std::rc::Rc;

/// Identity of a catalogue within a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CatalogueId {
    Kpa,
    Patient,
    Prozedur,
    Therapielinie,
    Ecog,
    Verwandte,
    Keimbahndiagnose,
    Therapieplan,
    Einzelempfehlung,
    Rebiopsie,
    Reevaluation,
    ConsentMv,
    ConsentMvVerlauf,
    Tumorgrading,
    Tumorausbreitung,
    Histologie,
    Vorbefunde,
    Molekulargenetik,
    Molekulargenuntersuchung,
    MolekulargenMsi,
}

impl CatalogueId {
    pub const ALL: [CatalogueId; 20] = [
        CatalogueId::Kpa,
        CatalogueId::Patient,
        CatalogueId::Prozedur,
        CatalogueId::Therapielinie,
        CatalogueId::Ecog,
        CatalogueId::Verwandte,
        CatalogueId::Keimbahndiagnose,
        CatalogueId::Therapieplan,
        CatalogueId::Einzelempfehlung,
        CatalogueId::Rebiopsie,
        CatalogueId::Reevaluation,
        CatalogueId::ConsentMv,
        CatalogueId::ConsentMvVerlauf,
        CatalogueId::Tumorgrading,
        CatalogueId::Tumorausbreitung,
        CatalogueId::Histologie,
        CatalogueId::Vorbefunde,
        CatalogueId::Molekulargenetik,
        CatalogueId::Molekulargenuntersuchung,
        CatalogueId::MolekulargenMsi,
    ];

    pub fn spec(self) -> &'static TableSpec {
        match self {
            CatalogueId::Kpa => &KPA,
            CatalogueId::Patient => &PATIENT,
            CatalogueId::Prozedur => &PROZEDUR,
            CatalogueId::Therapielinie => &THERAPIELINIE,
            CatalogueId::Ecog => &ECOG,
            CatalogueId::Verwandte => &VERWANDTE,
            CatalogueId::Keimbahndiagnose => &KEIMBAHNDIAGNOSE,
            CatalogueId::Therapieplan => &THERAPIEPLAN,
            CatalogueId::Einzelempfehlung => &EINZELEMPFEHLUNG,
            CatalogueId::Rebiopsie => &REBIOPSIE,
            CatalogueId::Reevaluation => &REEVALUATION,
            CatalogueId::ConsentMv => &CONSENT_MV,
            CatalogueId::ConsentMvVerlauf => &CONSENT_MV_VERLAUF,
            CatalogueId::Tumorgrading => &TUMORGRADING,
            CatalogueId::Tumorausbreitung => &TUMORAUSBREITUNG,
            CatalogueId::Histologie => &HISTOLOGIE,
            CatalogueId::Vorbefunde => &VORBEFUNDE,
            CatalogueId::Molekulargenetik => &MOLEKULARGENETIK,
            CatalogueId::Molekulargenuntersuchung => &MOLEKULARGENUNTERSUCHUNG,
            CatalogueId::MolekulargenMsi => &MOLEKULARGEN_MSI,
        }
    }

    /// The table name, used in error messages and logs.
    pub fn name(self) -> &'static str {
        self.spec().table
    }
}

/// Link table between therapy rows and the diseases they are based on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiseaseLink {
    pub table: &'static str,
    pub disease_column: &'static str,
    pub procedure_column: &'static str,
}

/// Static description of one documentation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSpec {
    pub table: &'static str,
    pub primary_key: &'static str,
    /// Present on subform tables only.
    pub parent_key: Option<&'static str>,
    pub case_id_column: Option<&'static str>,
    /// Column referencing the root form record.
    pub root_reference: Option<&'static str>,
    /// Column referencing the patient, on forms collected across cases.
    pub patient_reference: Option<&'static str>,
    pub disease_link: Option<DiseaseLink>,
}

impl TableSpec {
    const fn form(table: &'static str) -> Self {
        Self {
            table,
            primary_key: ID_COLUMN,
            parent_key: None,
            case_id_column: None,
            root_reference: None,
            patient_reference: None,
            disease_link: None,
        }
    }

    const fn subform(table: &'static str) -> Self {
        Self {
            parent_key: Some(PARENT_ID_COLUMN),
            ..Self::form(table)
        }
    }

    const fn with_disease_link(self) -> Self {
        Self {
            disease_link: Some(ERKRANKUNG_PROZEDUR),
            ..self
        }
    }
}

const ERKRANKUNG_PROZEDUR: DiseaseLink = DiseaseLink {
    table: "erkrankung_prozedur",
    disease_column: "erkrankung_id",
    procedure_column: "prozedur_id",
};

static KPA: TableSpec = TableSpec {
    case_id_column: Some("fallnummermv"),
    ..TableSpec::form("dk_dnpm_kpa")
};
static PATIENT: TableSpec = TableSpec::form("patient");
static PROZEDUR: TableSpec = TableSpec::subform("dk_dnpm_uf_prozedur").with_disease_link();
static THERAPIELINIE: TableSpec = TableSpec::subform("dk_dnpm_therapielinie").with_disease_link();
static ECOG: TableSpec = TableSpec::subform("dk_dnpm_uf_ecog");
static VERWANDTE: TableSpec = TableSpec::subform("dk_dnpm_uf_verwandte");
static KEIMBAHNDIAGNOSE: TableSpec = TableSpec::subform("dk_dnpm_uf_keimbahndiagnose");
static THERAPIEPLAN: TableSpec = TableSpec {
    root_reference: Some("ref_dnpm_klinikanamnese"),
    ..TableSpec::form("dk_dnpm_therapieplan")
};
static EINZELEMPFEHLUNG: TableSpec = TableSpec::subform("dk_dnpm_uf_einzelempfehlung");
static REBIOPSIE: TableSpec = TableSpec::subform("dk_dnpm_uf_rebiopsie");
static REEVALUATION: TableSpec = TableSpec::subform("dk_dnpm_uf_reevaluation");
static CONSENT_MV: TableSpec = TableSpec::form("dk_dnpm_consentmv");
static CONSENT_MV_VERLAUF: TableSpec = TableSpec::subform("dk_dnpm_uf_consentmvverlauf");
static TUMORGRADING: TableSpec = TableSpec::subform("dk_dnpm_uf_tumorgrading");
static TUMORAUSBREITUNG: TableSpec = TableSpec::subform("dk_dnpm_uf_tumorausbreitung");
static HISTOLOGIE: TableSpec = TableSpec::subform("dk_dnpm_uf_histologie");
static VORBEFUNDE: TableSpec = TableSpec::subform("dk_dnpm_uf_vorbefunde");
static MOLEKULARGENETIK: TableSpec = TableSpec {
    patient_reference: Some(PATIENT_ID_COLUMN),
    ..TableSpec::form("dk_molekulargenetik")
};
static MOLEKULARGENUNTERSUCHUNG: TableSpec = TableSpec::subform("dk_molekulargenuntersuchung");
static MOLEKULARGEN_MSI: TableSpec = TableSpec::subform("dk_molekulargenmsi");

/// Read-only row store for one table.
pub struct DataCatalogue {
    id: CatalogueId,
    spec: &'static TableSpec,
    executor: Rc<dyn QueryExecutor>,
}

impl DataCatalogue {
    pub fn new(id: CatalogueId, executor: Rc<dyn QueryExecutor>) -> Self {
        Self {
            id,
            spec: id.spec(),
            executor,
        }
    }

    pub fn id(&self) -> CatalogueId {
        self.id
    }

    pub fn spec(&self) -> &'static TableSpec {
        self.spec
    }

    fn select_where(&self, column: &str, value: SqlValue) -> DataResult<Vec<RawRow>> {
        let sql = format!("SELECT * FROM {} WHERE {column} = ?", self.spec.table);
        self.executor.query(&sql, &[value])
    }

    fn exactly_one(&self, mut rows: Vec<RawRow>, key: String) -> DataResult<RawRow> {
        if rows.len() > 1 {
            return Err(DataMapperError::AmbiguousRecord {
                catalogue: self.spec.table,
                key,
                count: rows.len(),
            });
        }
        rows.pop().ok_or(DataMapperError::RecordNotFound {
            catalogue: self.spec.table,
            key,
        })
    }

    /// Fetches the row with primary key `id`.
    ///
    /// # Errors
    ///
    /// - [`DataMapperError::RecordNotFound`] if no row has that key.
    /// - [`DataMapperError::AmbiguousRecord`] if more than one row has that key.
    pub fn get_by_id(&self, id: i64) -> DataResult<ResultSet> {
        let rows = self.select_where(self.spec.primary_key, SqlValue::from(id))?;
        self.exactly_one(rows, format!("id {id}")).map(ResultSet::new)
    }

    /// Fetches all subform rows owned by the form record `parent_id`, in store order.
    ///
    /// # Errors
    ///
    /// Returns [`DataMapperError::UnsupportedLookup`] on form tables.
    pub fn get_all_by_parent_id(&self, parent_id: i64) -> DataResult<Vec<ResultSet>> {
        let column = self.spec.parent_key.ok_or(DataMapperError::UnsupportedLookup {
            catalogue: self.spec.table,
            lookup: "lookup by parent id",
        })?;

        let rows = self.select_where(column, SqlValue::from(parent_id))?;
        Ok(rows.into_iter().map(ResultSet::new).collect())
    }

    /// Resolves a case id to the id of its root record.
    pub fn procedure_id_by_case_id(&self, case_id: &str) -> DataResult<i64> {
        let column = self.spec.case_id_column.ok_or(DataMapperError::UnsupportedLookup {
            catalogue: self.spec.table,
            lookup: "lookup by case id",
        })?;

        let rows = self.select_where(column, SqlValue::from(case_id))?;
        let row = self.exactly_one(rows, format!("case id {case_id}"))?;
        ResultSet::new(row).get_id()
    }

    /// Fetches all rows referencing the root record `root_id`, in store order.
    pub fn get_all_by_root_id(&self, root_id: i64) -> DataResult<Vec<ResultSet>> {
        let column = self.spec.root_reference.ok_or(DataMapperError::UnsupportedLookup {
            catalogue: self.spec.table,
            lookup: "lookup by root id",
        })?;

        let rows = self.select_where(column, SqlValue::from(root_id))?;
        Ok(rows.into_iter().map(ResultSet::new).collect())
    }

    /// Fetches all rows recorded for the patient `patient_id`, in store order.
    pub fn get_all_by_patient_id(&self, patient_id: i64) -> DataResult<Vec<ResultSet>> {
        let column = self.spec.patient_reference.ok_or(DataMapperError::UnsupportedLookup {
            catalogue: self.spec.table,
            lookup: "lookup by patient id",
        })?;

        let rows = self.select_where(column, SqlValue::from(patient_id))?;
        Ok(rows.into_iter().map(ResultSet::new).collect())
    }

    /// Returns the ids of all diseases linked to the therapy row `procedure_id`.
    ///
    /// The result may be empty or hold several ids; callers decide what cardinality they
    /// accept.
    pub fn get_diseases(&self, procedure_id: i64) -> DataResult<Vec<i64>> {
        let link = self.spec.disease_link.ok_or(DataMapperError::UnsupportedLookup {
            catalogue: self.spec.table,
            lookup: "disease lookup",
        })?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?",
            link.disease_column, link.table, link.procedure_column
        );
        let rows = self.executor.query(&sql, &[SqlValue::from(procedure_id)])?;

        rows.into_iter()
            .map(|row| {
                ResultSet::new(row)
                    .get_long(link.disease_column)?
                    .ok_or_else(|| DataMapperError::TypeMismatch {
                        column: link.disease_column.to_string(),
                        expected: "long integer",
                        found: "absent value".into(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDb;

    fn catalogue(db: TestDb, id: CatalogueId) -> DataCatalogue {
        DataCatalogue::new(id, db.into_executor())
    }

    #[test]
    fn get_by_id_returns_the_single_row() {
        let db = TestDb::new();
        db.insert("dk_dnpm_kpa", &[("id", 1.into()), ("icd10", "C00.0".into())]);
        let kpa = catalogue(db, CatalogueId::Kpa);

        let rs = kpa.get_by_id(1).expect("row exists");
        assert_eq!(rs.get_string("icd10").expect("text"), Some("C00.0".into()));
    }

    #[test]
    fn get_by_id_fails_for_zero_rows() {
        let kpa = catalogue(TestDb::new(), CatalogueId::Kpa);

        let err = kpa.get_by_id(1).expect_err("no row");
        assert!(matches!(
            err,
            DataMapperError::RecordNotFound { catalogue: "dk_dnpm_kpa", ref key } if key == "id 1"
        ));
    }

    #[test]
    fn get_by_id_fails_for_duplicate_keys() {
        let db = TestDb::new();
        db.insert("patient", &[("id", 42.into())]);
        db.insert("patient", &[("id", 42.into())]);
        let patients = catalogue(db, CatalogueId::Patient);

        let err = patients.get_by_id(42).expect_err("two rows");
        assert!(matches!(err, DataMapperError::AmbiguousRecord { count: 2, .. }));
    }

    #[test]
    fn get_all_by_parent_id_keeps_store_order() {
        let db = TestDb::new();
        for (id, ecog) in [(12, "2"), (10, "0"), (11, "1")] {
            db.insert(
                "dk_dnpm_uf_ecog",
                &[
                    ("id", id.into()),
                    ("hauptprozedur_id", 1.into()),
                    ("ecog", ecog.into()),
                ],
            );
        }
        db.insert(
            "dk_dnpm_uf_ecog",
            &[("id", 13.into()), ("hauptprozedur_id", 2.into())],
        );
        let ecog = catalogue(db, CatalogueId::Ecog);

        let ids: Vec<i64> = ecog
            .get_all_by_parent_id(1)
            .expect("query")
            .iter()
            .map(|rs| rs.get_id().expect("id"))
            .collect();
        assert_eq!(ids, [12, 10, 11]);
        assert!(ecog.get_all_by_parent_id(99).expect("query").is_empty());
    }

    #[test]
    fn parent_lookup_is_unsupported_on_forms() {
        let kpa = catalogue(TestDb::new(), CatalogueId::Kpa);
        let err = kpa.get_all_by_parent_id(1).expect_err("form table");
        assert!(matches!(err, DataMapperError::UnsupportedLookup { catalogue: "dk_dnpm_kpa", .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn resolves_case_id_to_root_id() {
        let db = TestDb::new();
        db.insert("dk_dnpm_kpa", &[("id", 3.into()), ("fallnummermv", "F-0003".into())]);
        let kpa = catalogue(db, CatalogueId::Kpa);

        assert_eq!(kpa.procedure_id_by_case_id("F-0003").expect("resolved"), 3);
        assert!(matches!(
            kpa.procedure_id_by_case_id("F-9999"),
            Err(DataMapperError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn care_plans_are_found_by_root_reference() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_therapieplan",
            &[("id", 20.into()), ("ref_dnpm_klinikanamnese", 1.into())],
        );
        db.insert(
            "dk_dnpm_therapieplan",
            &[("id", 21.into()), ("ref_dnpm_klinikanamnese", 2.into())],
        );
        let plans = catalogue(db, CatalogueId::Therapieplan);

        let rows = plans.get_all_by_root_id(1).expect("query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_id().expect("id"), 20);
    }

    #[test]
    fn molecular_genetics_are_found_by_patient() {
        let db = TestDb::new();
        db.insert("dk_molekulargenetik", &[("id", 5.into()), ("patient_id", 42.into())]);
        db.insert("dk_molekulargenetik", &[("id", 6.into()), ("patient_id", 43.into())]);
        db.insert("dk_molekulargenetik", &[("id", 7.into()), ("patient_id", 42.into())]);
        let mg = catalogue(db, CatalogueId::Molekulargenetik);

        let ids: Vec<i64> = mg
            .get_all_by_patient_id(42)
            .expect("query")
            .iter()
            .map(|rs| rs.get_id().expect("id"))
            .collect();
        assert_eq!(ids, [5, 7]);
    }

    #[test]
    fn patient_lookup_is_unsupported_on_case_forms() {
        let kpa = catalogue(TestDb::new(), CatalogueId::Kpa);
        assert!(matches!(
            kpa.get_all_by_patient_id(42),
            Err(DataMapperError::UnsupportedLookup { lookup: "lookup by patient id", .. })
        ));
    }

    #[test]
    fn diseases_are_read_from_the_link_table() {
        let db = TestDb::new();
        db.link_disease(100, 5);
        db.link_disease(101, 5);
        db.link_disease(102, 6);
        let prozedur = catalogue(db, CatalogueId::Prozedur);

        assert_eq!(prozedur.get_diseases(5).expect("query"), [100, 101]);
        assert!(prozedur.get_diseases(7).expect("query").is_empty());
    }

    #[test]
    fn disease_lookup_is_unsupported_without_link() {
        let ecog = catalogue(TestDb::new(), CatalogueId::Ecog);
        assert!(matches!(
            ecog.get_diseases(1),
            Err(DataMapperError::UnsupportedLookup { .. })
        ));
    }

    #[test]
    fn every_catalogue_names_its_table() {
        for id in CatalogueId::ALL {
            assert!(id.name().starts_with("dk_") || id == CatalogueId::Patient);
        }
    }
}
