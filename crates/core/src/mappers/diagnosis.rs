//! Primary diagnosis of the root form.
//!
//! Field policy:
//! - `icd10` is required; the coding carries its catalogue version and its versioned display
//!   degrades to absent
//! - topography display and guideline treatment status degrade to absent
//!
//! Germline codes, grading and staging come from subforms and are attached by the root mapper.

use super::{degrade, DataMapper};
use crate::catalogues::DataCatalogue;
use crate::coding::{self, GUIDELINE_TREATMENT_STATUS};
use crate::constants::PROPCAT_VERSION_SUFFIX;
use crate::error::DataResult;
use crate::property::PropertyCatalogue;
use crate::result_set::ResultSet;
use mtb::{MtbDiagnosis, Reference};
use std::rc::Rc;

pub struct KpaDiagnosisDataMapper {
    catalogue: Rc<DataCatalogue>,
    properties: Rc<dyn PropertyCatalogue>,
}

impl KpaDiagnosisDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>, properties: Rc<dyn PropertyCatalogue>) -> Self {
        Self {
            catalogue,
            properties,
        }
    }

    fn display(&self, row: &ResultSet, column: &'static str) -> DataResult<Option<String>> {
        let entry = degrade(column, row.get_property(column, self.properties.as_ref()))?;
        Ok(entry.and_then(|e| e.display().map(str::to_string)))
    }
}

impl DataMapper for KpaDiagnosisDataMapper {
    type Output = MtbDiagnosis;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<MtbDiagnosis> {
        let id = row.get_id()?;

        let version = row
            .get_integer(&format!("icd10{PROPCAT_VERSION_SUFFIX}"))?
            .map(|v| v.to_string());
        let mut code = coding::icd10(&row.required_string("icd10")?, version.as_deref());
        code.display = self.display(row, "icd10")?;

        let topography = match row.get_string("icdo3lokalisation")? {
            Some(raw) => {
                let mut topography = coding::icdo3_topography(&raw);
                topography.display = self.display(row, "icdo3lokalisation")?;
                Some(topography)
            }
            None => None,
        };

        let guideline_treatment_status = degrade(
            "leitlinienstatus",
            row.get_string("leitlinienstatus")?
                .map(|raw| GUIDELINE_TREATMENT_STATUS.coding(&raw))
                .transpose(),
        )?;

        Ok(MtbDiagnosis {
            id: id.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            code,
            topography,
            recorded_on: row.get_date("datumerstdiagnose")?,
            guideline_treatment_status,
            germline_codes: Vec::new(),
            grading: Vec::new(),
            staging: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::constants::{ICD10_GM_SYSTEM, ICDO3_TOPOGRAPHY_SYSTEM};
    use crate::error::DataMapperError;
    use crate::property::{MemoryPropertyCatalogue, PropertyEntry};
    use crate::test_support::TestDb;
    use mtb::Coding;

    fn mapper(db: TestDb, properties: MemoryPropertyCatalogue) -> KpaDiagnosisDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        KpaDiagnosisDataMapper::new(
            registry.catalogue(CatalogueId::Kpa).expect("kpa"),
            Rc::new(properties),
        )
    }

    #[test]
    fn maps_icd10_code_of_root_row() {
        let db = TestDb::new();
        db.seed_minimal_case();

        let diagnosis = mapper(db, MemoryPropertyCatalogue::new())
            .get_by_id(1)
            .expect("mapped");
        assert_eq!(diagnosis.id, "1");
        assert_eq!(diagnosis.patient, Reference::patient("42"));
        assert_eq!(diagnosis.code, Coding::new(ICD10_GM_SYSTEM, "C00.0"));
        assert!(diagnosis.germline_codes.is_empty());
        assert_eq!(diagnosis.code.version, None);
    }

    #[test]
    fn resolves_versioned_displays_and_topography() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_kpa",
            &[
                ("id", 1.into()),
                ("patient_id", 42.into()),
                ("icd10", "C00.0".into()),
                ("icd10_propcat_version", 3.into()),
                ("icdo3lokalisation", "C00.1".into()),
                ("icdo3lokalisation_propcat_version", 9.into()),
                ("leitlinienstatus", "exhausted".into()),
            ],
        );
        let properties = MemoryPropertyCatalogue::new()
            .with_entry(3, PropertyEntry::new("C00.0", "Lippe", "Bösartige Neubildung der Lippe"))
            .with_entry(9, PropertyEntry::new("C00.1", "Unterlippe", "Äußere Unterlippe"));

        let diagnosis = mapper(db, properties).get_by_id(1).expect("mapped");
        assert_eq!(
            diagnosis.code.display.as_deref(),
            Some("Bösartige Neubildung der Lippe")
        );
        assert_eq!(diagnosis.code.version.as_deref(), Some("3"));
        let topography = diagnosis.topography.expect("topography present");
        assert_eq!(topography.system, ICDO3_TOPOGRAPHY_SYSTEM);
        assert_eq!(topography.display.as_deref(), Some("Äußere Unterlippe"));
        assert_eq!(
            diagnosis.guideline_treatment_status.map(|c| c.code),
            Some("exhausted".to_string())
        );
    }

    #[test]
    fn unknown_guideline_status_degrades_to_absent() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_kpa",
            &[
                ("id", 1.into()),
                ("patient_id", 42.into()),
                ("icd10", "C00.0".into()),
                ("leitlinienstatus", "whatever".into()),
            ],
        );

        let diagnosis = mapper(db, MemoryPropertyCatalogue::new())
            .get_by_id(1)
            .expect("mapped");
        assert_eq!(diagnosis.guideline_treatment_status, None);
    }

    #[test]
    fn icd10_version_is_kept_without_a_catalogue_entry() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_kpa",
            &[
                ("id", 1.into()),
                ("patient_id", 42.into()),
                ("icd10", "C00.0".into()),
                ("icd10_propcat_version", 17.into()),
            ],
        );

        let diagnosis = mapper(db, MemoryPropertyCatalogue::new())
            .get_by_id(1)
            .expect("mapped");
        assert_eq!(diagnosis.code.version.as_deref(), Some("17"));
        assert_eq!(diagnosis.code.display, None);
    }

    #[test]
    fn missing_icd10_is_fatal() {
        let db = TestDb::new();
        db.insert("dk_dnpm_kpa", &[("id", 1.into()), ("patient_id", 42.into())]);

        let err = mapper(db, MemoryPropertyCatalogue::new())
            .get_by_id(1)
            .expect_err("no code");
        assert!(matches!(err, DataMapperError::TypeMismatch { ref column, .. } if column == "icd10"));
    }
}
