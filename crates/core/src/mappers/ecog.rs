//! ECOG performance status observations.

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding::ECOG;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{PerformanceStatus, Reference};
use std::rc::Rc;

/// Maps `Ecog` subform rows. The ECOG value is required and fatal when unknown.
pub struct KpaEcogDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KpaEcogDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for KpaEcogDataMapper {
    type Output = PerformanceStatus;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<PerformanceStatus> {
        Ok(PerformanceStatus {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            effective_date: row.get_date("datum")?,
            value: ECOG.coding(&row.required_string("ecog")?)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::error::DataMapperError;
    use crate::test_support::TestDb;
    use chrono::NaiveDate;

    fn mapper(db: TestDb) -> KpaEcogDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        KpaEcogDataMapper::new(registry.catalogue(CatalogueId::Ecog).expect("ecog"))
    }

    #[test]
    fn maps_ecog_rows() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_ecog",
            &[
                ("id", 3.into()),
                ("hauptprozedur_id", 1.into()),
                ("patient_id", 42.into()),
                ("datum", "2024-02-02".into()),
                ("ecog", "1".into()),
            ],
        );

        let statuses = mapper(db).get_by_parent_id(1).expect("mapped");
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].value.display.as_deref(), Some("ECOG 1"));
        assert_eq!(statuses[0].effective_date, NaiveDate::from_ymd_opt(2024, 2, 2));
    }

    #[test]
    fn integer_ecog_cells_are_accepted() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_ecog",
            &[("id", 3.into()), ("patient_id", 42.into()), ("ecog", 4.into())],
        );

        let status = mapper(db).get_by_id(3).expect("mapped");
        assert_eq!(status.value.code, "4");
    }

    #[test]
    fn out_of_scale_value_is_fatal() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_ecog",
            &[("id", 3.into()), ("patient_id", 42.into()), ("ecog", "5".into())],
        );

        assert!(matches!(
            mapper(db).get_by_id(3),
            Err(DataMapperError::UnmappableCode { .. })
        ));
    }
}
