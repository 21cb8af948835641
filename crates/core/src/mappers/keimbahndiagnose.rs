//! Germline diagnoses of the root form.

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding;
use crate::constants::PROPCAT_VERSION_SUFFIX;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::Coding;
use std::rc::Rc;

/// Maps `Keimbahndiagnose` subform rows to ICD-10-GM codings. Rows without a code map to
/// `None` and are skipped by [`KeimbahndiagnoseDataMapper::get_codes`].
pub struct KeimbahndiagnoseDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KeimbahndiagnoseDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }

    /// The germline codes recorded on the root record `kpa_id`, in store order.
    pub fn get_codes(&self, kpa_id: i64) -> DataResult<Vec<Coding>> {
        Ok(self.get_by_parent_id(kpa_id)?.into_iter().flatten().collect())
    }
}

impl DataMapper for KeimbahndiagnoseDataMapper {
    type Output = Option<Coding>;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<Option<Coding>> {
        let Some(code) = row.get_string("icd10")? else {
            return Ok(None);
        };
        let version = row
            .get_integer(&format!("icd10{PROPCAT_VERSION_SUFFIX}"))?
            .map(|v| v.to_string());

        Ok(Some(coding::icd10(&code, version.as_deref())))
    }
}
