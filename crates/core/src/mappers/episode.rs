//! Episode of care derived from the tumor board registration on the root form.

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{MtbEpisodeOfCare, PeriodDate, Reference};
use std::rc::Rc;

/// Yields no episode when the root form carries no registration date.
pub struct KpaEpisodeDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KpaEpisodeDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for KpaEpisodeDataMapper {
    type Output = Option<MtbEpisodeOfCare>;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<Option<MtbEpisodeOfCare>> {
        let Some(start) = row.get_date("anmeldedatummtb")? else {
            return Ok(None);
        };
        let id = row.get_id()?.to_string();

        Ok(Some(MtbEpisodeOfCare {
            patient: Reference::patient(row.get_patient_id()?),
            period: PeriodDate { start, end: None },
            diagnoses: vec![Reference::diagnosis(id.clone())],
            id,
        }))
    }
}
