//! Histology reevaluation requests of a care plan.

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{HistologyReevaluationRequest, Reference};
use std::rc::Rc;

/// Maps `Reevaluation` subform rows. The specimen to re-evaluate is required.
pub struct ReevaluationDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl ReevaluationDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for ReevaluationDataMapper {
    type Output = HistologyReevaluationRequest;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<HistologyReevaluationRequest> {
        Ok(HistologyReevaluationRequest {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            specimen: Reference::specimen(row.required_long("ref_molekulargenetik")?.to_string()),
            issued_on: row.get_date("datum")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::error::DataMapperError;
    use crate::test_support::TestDb;

    fn mapper(db: TestDb) -> ReevaluationDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        ReevaluationDataMapper::new(registry.catalogue(CatalogueId::Reevaluation).expect("reevaluation"))
    }

    #[test]
    fn references_the_specimen() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_reevaluation",
            &[
                ("id", 41.into()),
                ("hauptprozedur_id", 20.into()),
                ("patient_id", 42.into()),
                ("ref_molekulargenetik", 5.into()),
            ],
        );

        let request = mapper(db).get_by_id(41).expect("mapped");
        assert_eq!(request.specimen, Reference::specimen("5"));
    }

    #[test]
    fn missing_specimen_is_fatal() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_reevaluation",
            &[("id", 41.into()), ("patient_id", 42.into())],
        );

        assert!(matches!(
            mapper(db).get_by_id(41),
            Err(DataMapperError::TypeMismatch { ref column, .. }) if column == "ref_molekulargenetik"
        ));
    }
}
