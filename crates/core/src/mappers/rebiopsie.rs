//! Rebiopsy requests of a care plan.

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{RebiopsyRequest, Reference};
use std::rc::Rc;

/// Maps `Rebiopsie` subform rows. The tumor entity is left for the care plan to fill in.
pub struct RebiopsieDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl RebiopsieDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for RebiopsieDataMapper {
    type Output = RebiopsyRequest;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<RebiopsyRequest> {
        Ok(RebiopsyRequest {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            tumor_entity: None,
            issued_on: row.get_date("datum")?,
        })
    }
}
