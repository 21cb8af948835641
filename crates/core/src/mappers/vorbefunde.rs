//! Prior molecular findings recorded on the root form.

use super::{degrade, DataMapper};
use crate::catalogues::DataCatalogue;
use crate::coding::MOLECULAR_REPORT_TYPE;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{PriorDiagnosticReport, Reference};
use std::rc::Rc;

/// Maps `Vorbefunde` subform rows. The free-text result is split into one entry per
/// non-empty line; an unknown report type degrades to absent.
pub struct VorbefundeDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl VorbefundeDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for VorbefundeDataMapper {
    type Output = PriorDiagnosticReport;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<PriorDiagnosticReport> {
        let type_ = degrade(
            "art",
            row.get_string("art")?
                .map(|raw| MOLECULAR_REPORT_TYPE.coding(&raw))
                .transpose(),
        )?;

        let results = row
            .get_string("ergebnisse")?
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(PriorDiagnosticReport {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            issued_on: row.get_date("erstellungsdatum")?,
            specimen: row
                .get_long("ref_molekulargenetik")?
                .map(|id| Reference::specimen(id.to_string())),
            type_,
            results,
        })
    }
}
