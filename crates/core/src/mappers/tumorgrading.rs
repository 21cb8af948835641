//! Tumor grading history of the primary diagnosis.

use super::{degrade, DataMapper};
use crate::catalogues::DataCatalogue;
use crate::coding::TUMOR_GRADING;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::TumorGrading;
use std::rc::Rc;

/// Maps `Tumorgrading` subform rows. An unknown grade leaves the entry without codes.
pub struct TumorgradingDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl TumorgradingDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for TumorgradingDataMapper {
    type Output = TumorGrading;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<TumorGrading> {
        let grade = degrade(
            "tumorgrading",
            row.get_string("tumorgrading")?
                .map(|raw| TUMOR_GRADING.coding(&raw))
                .transpose(),
        )?;

        Ok(TumorGrading {
            date: row.get_date("datum")?,
            codes: grade.into_iter().collect(),
        })
    }
}
