//! Care plans with their recommendations and requests.

use super::einzelempfehlung::{EinzelempfehlungStudieDataMapper, EinzelempfehlungWirkstoffDataMapper};
use super::rebiopsie::RebiopsieDataMapper;
use super::reevaluation::ReevaluationDataMapper;
use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::error::DataResult;
use crate::property::PropertyCatalogue;
use crate::result_set::ResultSet;
use mtb::{MtbCarePlan, Reference};
use std::rc::Rc;

/// Composite mapper: one care plan row plus all recommendation, rebiopsy and reevaluation
/// rows owned by it.
///
/// The care plan's reason (the diagnosis of the referenced root form) is carried over to every
/// recommendation and becomes the tumor entity of every rebiopsy request.
pub struct TherapieplanDataMapper {
    catalogue: Rc<DataCatalogue>,
    medication: EinzelempfehlungWirkstoffDataMapper,
    study: EinzelempfehlungStudieDataMapper,
    rebiopsy: RebiopsieDataMapper,
    reevaluation: ReevaluationDataMapper,
}

/// Subform tables owned by a care plan.
pub struct CarePlanSubforms {
    pub recommendations: Rc<DataCatalogue>,
    pub rebiopsies: Rc<DataCatalogue>,
    pub reevaluations: Rc<DataCatalogue>,
}

impl TherapieplanDataMapper {
    pub fn new(
        catalogue: Rc<DataCatalogue>,
        subforms: CarePlanSubforms,
        properties: Rc<dyn PropertyCatalogue>,
    ) -> Self {
        Self {
            catalogue,
            medication: EinzelempfehlungWirkstoffDataMapper::new(
                Rc::clone(&subforms.recommendations),
                Rc::clone(&properties),
            ),
            study: EinzelempfehlungStudieDataMapper::new(subforms.recommendations, properties),
            rebiopsy: RebiopsieDataMapper::new(subforms.rebiopsies),
            reevaluation: ReevaluationDataMapper::new(subforms.reevaluations),
        }
    }

    /// Loads and maps every care plan referencing the root form `kpa_id`.
    pub fn get_by_kpa_id(&self, kpa_id: i64) -> DataResult<Vec<MtbCarePlan>> {
        self.catalogue
            .get_all_by_root_id(kpa_id)?
            .iter()
            .map(|row| self.map(row))
            .collect()
    }
}

impl DataMapper for TherapieplanDataMapper {
    type Output = MtbCarePlan;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<MtbCarePlan> {
        let id = row.get_id()?;
        let reason = row
            .get_long("ref_dnpm_klinikanamnese")?
            .map(|kpa_id| Reference::diagnosis(kpa_id.to_string()));

        let mut medication_recommendations = self.medication.get_by_parent_id(id)?;
        for rec in &mut medication_recommendations {
            rec.reason = reason.clone();
        }
        let mut study_enrollment_recommendations = self.study.get_by_parent_id(id)?;
        for rec in &mut study_enrollment_recommendations {
            rec.reason = reason.clone();
        }
        let mut rebiopsy_requests = self.rebiopsy.get_by_parent_id(id)?;
        for request in &mut rebiopsy_requests {
            request.tumor_entity = reason.clone();
        }

        Ok(MtbCarePlan {
            id: id.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            reason,
            issued_on: row.get_date("datum")?,
            medication_recommendations,
            study_enrollment_recommendations,
            rebiopsy_requests,
            histology_reevaluation_requests: self.reevaluation.get_by_parent_id(id)?,
            notes: row.get_string("bemerkung")?.into_iter().collect(),
        })
    }
}
