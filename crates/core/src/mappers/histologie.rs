//! Histology reports of the root form.
//!
//! Field policy:
//! - the referenced specimen is required
//! - the morphology display degrades to absent
//! - tumor cell content is recorded in percent and must lie between 0 and 100; the method is
//!   the one configured for the run

use super::{degrade, DataMapper};
use crate::catalogues::DataCatalogue;
use crate::coding;
use crate::error::{DataMapperError, DataResult};
use crate::property::PropertyCatalogue;
use crate::result_set::ResultSet;
use mtb::{HistologyReport, HistologyResults, Reference, TumorCellContent, TumorCellContentMethod};
use std::rc::Rc;

pub struct HistologieDataMapper {
    catalogue: Rc<DataCatalogue>,
    properties: Rc<dyn PropertyCatalogue>,
    method: TumorCellContentMethod,
}

impl HistologieDataMapper {
    pub fn new(
        catalogue: Rc<DataCatalogue>,
        properties: Rc<dyn PropertyCatalogue>,
        method: TumorCellContentMethod,
    ) -> Self {
        Self {
            catalogue,
            properties,
            method,
        }
    }

    fn tumor_cell_content(&self, row: &ResultSet) -> DataResult<Option<TumorCellContent>> {
        let Some(percent) = row.get_long("tumorzellgehalt")? else {
            return Ok(None);
        };
        if !(0..=100).contains(&percent) {
            return Err(DataMapperError::TypeMismatch {
                column: "tumorzellgehalt".into(),
                expected: "percentage between 0 and 100",
                found: percent.to_string(),
            });
        }

        Ok(Some(TumorCellContent {
            method: self.method.coding(),
            value: percent as f64 / 100.0,
        }))
    }
}

impl DataMapper for HistologieDataMapper {
    type Output = HistologyReport;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<HistologyReport> {
        let tumor_morphology = match row.get_string("morphologie")? {
            Some(raw) => {
                let mut morphology = coding::icdo3_morphology(&raw);
                morphology.display = degrade(
                    "morphologie",
                    row.get_property("morphologie", self.properties.as_ref()),
                )?
                .and_then(|entry| entry.display().map(str::to_string));
                Some(morphology)
            }
            None => None,
        };

        Ok(HistologyReport {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            specimen: Reference::specimen(row.required_long("ref_molekulargenetik")?.to_string()),
            issued_on: row.get_date("datum")?,
            results: HistologyResults {
                tumor_morphology,
                tumor_cell_content: self.tumor_cell_content(row)?,
            },
        })
    }
}
