//! Guideline systemic therapies.

use super::therapy_course::read_course;
use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::MtbSystemicTherapy;
use std::rc::Rc;

const MEDICATION_COLUMN: &str = "wirkstoffe_json";

pub struct KpaTherapielinieDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KpaTherapielinieDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for KpaTherapielinieDataMapper {
    type Output = MtbSystemicTherapy;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<MtbSystemicTherapy> {
        let course = read_course(&self.catalogue, row)?;
        let medication = match row.get_string(MEDICATION_COLUMN)? {
            Some(json) => coding::medications(MEDICATION_COLUMN, &json)?,
            None => Vec::new(),
        };

        Ok(MtbSystemicTherapy {
            id: course.id,
            patient: course.patient,
            based_on: course.based_on,
            recorded_on: course.recorded_on,
            therapy_line: course.therapy_line,
            intent: course.intent,
            status: course.status,
            status_reason: course.status_reason,
            period: course.period,
            medication,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::constants::ATC_SYSTEM;
    use crate::error::DataMapperError;
    use crate::query::SqlValue;
    use crate::test_support::TestDb;

    fn mapper(db: TestDb) -> KpaTherapielinieDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        KpaTherapielinieDataMapper::new(
            registry
                .catalogue(CatalogueId::Therapielinie)
                .expect("therapielinie"),
        )
    }

    fn insert_line(db: &TestDb, medication: Option<&str>) {
        let mut cells: Vec<(&str, SqlValue)> = vec![
            ("id", 8.into()),
            ("hauptprozedur_id", 1.into()),
            ("patient_id", 42.into()),
            ("therapielinie", 1.into()),
            ("intention", "K".into()),
            ("status", "on-going".into()),
        ];
        if let Some(json) = medication {
            cells.push(("wirkstoffe_json", json.into()));
        }
        db.insert("dk_dnpm_therapielinie", &cells);
        db.link_disease(1, 8);
    }

    #[test]
    fn maps_course_and_medication() {
        let db = TestDb::new();
        insert_line(
            &db,
            Some(r#"[{"code":"L01XE01","name":"Imatinib","system":"ATC","version":"2024"}]"#),
        );

        let therapies = mapper(db).get_by_parent_id(1).expect("mapped");
        assert_eq!(therapies.len(), 1);
        let therapy = &therapies[0];
        assert_eq!(therapy.therapy_line, Some(1));
        assert_eq!(therapy.status.as_ref().map(|c| c.code.as_str()), Some("on-going"));
        assert_eq!(therapy.medication.len(), 1);
        assert_eq!(therapy.medication[0].system, ATC_SYSTEM);
    }

    #[test]
    fn absent_medication_is_empty() {
        let db = TestDb::new();
        insert_line(&db, None);

        let therapy = mapper(db).get_by_id(8).expect("mapped");
        assert!(therapy.medication.is_empty());
    }

    #[test]
    fn malformed_medication_is_a_type_mismatch() {
        let db = TestDb::new();
        insert_line(&db, Some("[{"));

        assert!(matches!(
            mapper(db).get_by_id(8),
            Err(DataMapperError::TypeMismatch { ref column, .. }) if column == "wirkstoffe_json"
        ));
    }
}
