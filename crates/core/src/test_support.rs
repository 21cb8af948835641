//! In-memory documentation database for tests.

use crate::query::{QueryExecutor, SqlValue, SqliteExecutor};
use rusqlite::{params_from_iter, Connection};
use std::rc::Rc;

const SCHEMA: &str = "
CREATE TABLE patient (id INTEGER, gkz TEXT);

CREATE TABLE dk_dnpm_kpa (
    id INTEGER,
    patient_id INTEGER,
    fallnummermv TEXT,
    geschlecht TEXT,
    geburtsdatum TEXT,
    sterbedatum TEXT,
    icd10 TEXT,
    icd10_propcat_version INTEGER,
    icdo3lokalisation TEXT,
    icdo3lokalisation_propcat_version INTEGER,
    datumerstdiagnose TEXT,
    leitlinienstatus TEXT,
    anmeldedatummtb TEXT,
    consentmv64e INTEGER,
    grundkeinbroadconsent TEXT
);

CREATE TABLE dk_dnpm_uf_prozedur (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    erfassungsdatum TEXT,
    therapielinie INTEGER,
    intention TEXT,
    status TEXT,
    statusgrund TEXT,
    beginn TEXT,
    ende TEXT,
    typ TEXT
);

CREATE TABLE dk_dnpm_therapielinie (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    erfassungsdatum TEXT,
    therapielinie INTEGER,
    intention TEXT,
    status TEXT,
    statusgrund TEXT,
    beginn TEXT,
    ende TEXT,
    wirkstoffe_json TEXT
);

CREATE TABLE erkrankung_prozedur (erkrankung_id INTEGER, prozedur_id INTEGER);

CREATE TABLE dk_dnpm_uf_ecog (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    datum TEXT,
    ecog TEXT
);

CREATE TABLE dk_dnpm_uf_verwandte (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    verwandtschaftsgrad TEXT
);

CREATE TABLE dk_dnpm_uf_keimbahndiagnose (
    id INTEGER,
    hauptprozedur_id INTEGER,
    icd10 TEXT,
    icd10_propcat_version INTEGER
);

CREATE TABLE dk_dnpm_uf_tumorgrading (
    id INTEGER,
    hauptprozedur_id INTEGER,
    datum TEXT,
    tumorgrading TEXT
);

CREATE TABLE dk_dnpm_uf_tumorausbreitung (
    id INTEGER,
    hauptprozedur_id INTEGER,
    zeitpunkt TEXT,
    typ TEXT,
    tnmt TEXT,
    tnmn TEXT,
    tnmm TEXT,
    wertweitereklassifikation TEXT
);

CREATE TABLE dk_dnpm_uf_histologie (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    datum TEXT,
    ref_molekulargenetik INTEGER,
    morphologie TEXT,
    morphologie_propcat_version INTEGER,
    tumorzellgehalt INTEGER
);

CREATE TABLE dk_dnpm_uf_vorbefunde (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    erstellungsdatum TEXT,
    ref_molekulargenetik INTEGER,
    art TEXT,
    ergebnisse TEXT
);

CREATE TABLE dk_molekulargenetik (
    id INTEGER,
    patient_id INTEGER,
    datum TEXT,
    entnahmedatum TEXT,
    entnahmemethode TEXT,
    materialtyp TEXT,
    artdersequenzierung TEXT
);

CREATE TABLE dk_molekulargenuntersuchung (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    ergebnis TEXT,
    untersucht TEXT,
    cdnaaenderung TEXT,
    proteinaenderung TEXT,
    allelfrequenz REAL
);

CREATE TABLE dk_molekulargenmsi (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    methode TEXT,
    wert REAL,
    interpretation TEXT
);

CREATE TABLE dk_dnpm_therapieplan (
    id INTEGER,
    patient_id INTEGER,
    ref_dnpm_klinikanamnese INTEGER,
    datum TEXT,
    bemerkung TEXT
);

CREATE TABLE dk_dnpm_uf_einzelempfehlung (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    datum TEXT,
    empfehlungskategorie TEXT,
    evidenzlevel TEXT,
    evidenzlevel_propcat_version INTEGER,
    evidenzlevel_zusatz TEXT,
    wirkstoffe_json TEXT,
    studien_alle_json TEXT
);

CREATE TABLE dk_dnpm_uf_rebiopsie (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    datum TEXT
);

CREATE TABLE dk_dnpm_uf_reevaluation (
    id INTEGER,
    hauptprozedur_id INTEGER,
    patient_id INTEGER,
    datum TEXT,
    ref_molekulargenetik INTEGER
);

CREATE TABLE dk_dnpm_consentmv (
    id INTEGER,
    patient_id INTEGER,
    datum TEXT,
    version TEXT
);

CREATE TABLE dk_dnpm_uf_consentmvverlauf (
    id INTEGER,
    hauptprozedur_id INTEGER,
    datum TEXT,
    sequencing TEXT,
    caseidentification TEXT,
    reidentification TEXT
);

CREATE TABLE property_catalogue_version (id INTEGER);

CREATE TABLE property_catalogue_version_entry (
    property_version_id INTEGER,
    code TEXT,
    shortdesc TEXT,
    description TEXT
);
";

/// Seeds an in-memory database with the documentation schema.
pub(crate) struct TestDb {
    conn: Connection,
}

impl TestDb {
    pub(crate) fn new() -> Self {
        let conn = Connection::open_in_memory().expect("open in-memory database");
        conn.execute_batch(SCHEMA).expect("create schema");
        Self { conn }
    }

    /// Inserts one row; columns not named stay `NULL`.
    pub(crate) fn insert(&self, table: &str, cells: &[(&str, SqlValue)]) {
        let columns: Vec<&str> = cells.iter().map(|(column, _)| *column).collect();
        let placeholders = vec!["?"; cells.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );

        self.conn
            .execute(&sql, params_from_iter(cells.iter().map(|(_, value)| value)))
            .unwrap_or_else(|err| panic!("insert into {table} failed: {err}"));
    }

    pub(crate) fn drop_table(&self, table: &str) {
        self.conn
            .execute_batch(&format!("DROP TABLE {table}"))
            .unwrap_or_else(|err| panic!("drop {table} failed: {err}"));
    }

    pub(crate) fn link_disease(&self, disease_id: i64, procedure_id: i64) {
        self.insert(
            "erkrankung_prozedur",
            &[
                ("erkrankung_id", disease_id.into()),
                ("prozedur_id", procedure_id.into()),
            ],
        );
    }

    /// The minimal root record used across mapper tests: KPA 1 of patient 42.
    pub(crate) fn seed_minimal_case(&self) {
        self.insert("patient", &[("id", 42.into()), ("gkz", "06531005".into())]);
        self.insert(
            "dk_dnpm_kpa",
            &[
                ("id", 1.into()),
                ("patient_id", 42.into()),
                ("fallnummermv", "F-0001".into()),
                ("icd10", "C00.0".into()),
            ],
        );
    }

    pub(crate) fn into_executor(self) -> Rc<dyn QueryExecutor> {
        Rc::new(SqliteExecutor::new(self.conn))
    }
}
