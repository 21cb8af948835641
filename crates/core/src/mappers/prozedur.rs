//! Guideline procedures (surgery, radiotherapy, nuclear medicine).

use super::therapy_course::read_course;
use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding::PROCEDURE_TYPE;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::OncoProcedure;
use std::rc::Rc;

/// Maps `Prozedur` subform rows. The procedure type is fatal when present but unknown.
pub struct KpaProzedurDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KpaProzedurDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for KpaProzedurDataMapper {
    type Output = OncoProcedure;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<OncoProcedure> {
        let course = read_course(&self.catalogue, row)?;
        let code = row
            .get_string("typ")?
            .map(|raw| PROCEDURE_TYPE.coding(&raw))
            .transpose()?;

        Ok(OncoProcedure {
            id: course.id,
            patient: course.patient,
            based_on: course.based_on,
            recorded_on: course.recorded_on,
            therapy_line: course.therapy_line,
            intent: course.intent,
            status: course.status,
            status_reason: course.status_reason,
            period: course.period,
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::error::DataMapperError;
    use crate::test_support::TestDb;
    use mtb::Reference;

    fn mapper(db: TestDb) -> KpaProzedurDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        KpaProzedurDataMapper::new(registry.catalogue(CatalogueId::Prozedur).expect("prozedur"))
    }

    fn insert_procedure(db: &TestDb, id: i64, typ: &str) {
        db.insert(
            "dk_dnpm_uf_prozedur",
            &[
                ("id", id.into()),
                ("hauptprozedur_id", 1.into()),
                ("patient_id", 42.into()),
                ("typ", typ.into()),
            ],
        );
        db.link_disease(1, id);
    }

    #[test]
    fn maps_procedures_of_root_in_order() {
        let db = TestDb::new();
        insert_procedure(&db, 7, "ST");
        insert_procedure(&db, 6, "OP");

        let procedures = mapper(db).get_by_parent_id(1).expect("mapped");
        let codes: Vec<_> = procedures
            .iter()
            .map(|p| p.code.as_ref().map(|c| c.code.as_str()))
            .collect();
        assert_eq!(codes, [Some("radio-therapy"), Some("surgery")]);
        assert_eq!(procedures[0].patient, Reference::patient("42"));
        assert_eq!(procedures[0].based_on, Reference::diagnosis("1"));
    }

    #[test]
    fn unknown_type_is_fatal() {
        let db = TestDb::new();
        insert_procedure(&db, 7, "XX");
        assert!(matches!(
            mapper(db).get_by_id(7),
            Err(DataMapperError::UnmappableCode { .. })
        ));
    }

    #[test]
    fn no_children_is_an_empty_list() {
        assert!(mapper(TestDb::new())
            .get_by_parent_id(1)
            .expect("mapped")
            .is_empty());
    }
}
