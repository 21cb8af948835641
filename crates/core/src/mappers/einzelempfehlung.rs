//! Single recommendations of a care plan.
//!
//! Medication and study enrollment recommendations share the `Einzelempfehlung` subform and
//! are told apart by `empfehlungskategorie`. Priority, evidence grading and evidence
//! addendums are descriptive and degrade to absent when unknown.
//!
//! The priority is coded from `evidenzlevel` through the property catalogue version stored in
//! `evidenzlevel_propcat_version`; without a version there is no priority.

use super::{degrade, DataMapper, Discriminator};
use crate::catalogues::DataCatalogue;
use crate::coding::{self, EVIDENCE_ADDENDUM, EVIDENCE_GRADING};
use crate::constants::PROPCAT_VERSION_SUFFIX;
use crate::error::DataResult;
use crate::property::PropertyCatalogue;
use crate::result_set::ResultSet;
use chrono::NaiveDate;
use mtb::{
    Coding, LevelOfEvidence, MtbMedicationRecommendation, MtbStudyEnrollmentRecommendation,
    Reference,
};
use std::rc::Rc;

const CATEGORY_COLUMN: &str = "empfehlungskategorie";
const MEDICATION_COLUMN: &str = "wirkstoffe_json";
const STUDY_COLUMN: &str = "studien_alle_json";
const EVIDENCE_COLUMN: &str = "evidenzlevel";

struct Recommendation {
    id: String,
    patient: Reference,
    issued_on: Option<NaiveDate>,
    priority: Option<Coding>,
    level_of_evidence: Option<LevelOfEvidence>,
    medication: Vec<Coding>,
}

fn read_priority(
    row: &ResultSet,
    properties: &dyn PropertyCatalogue,
) -> DataResult<Option<Coding>> {
    let Some(code) = row.get_string(EVIDENCE_COLUMN)? else {
        return Ok(None);
    };
    let Some(version) = row.get_integer(&format!("{EVIDENCE_COLUMN}{PROPCAT_VERSION_SUFFIX}"))?
    else {
        return Ok(None);
    };

    degrade(
        EVIDENCE_COLUMN,
        coding::recommendation_priority(properties, &code, version).map(Some),
    )
}

fn read_recommendation(
    row: &ResultSet,
    properties: &dyn PropertyCatalogue,
) -> DataResult<Recommendation> {
    let priority = read_priority(row, properties)?;

    let medication = match row.get_string(MEDICATION_COLUMN)? {
        Some(json) => coding::medications(MEDICATION_COLUMN, &json)?,
        None => Vec::new(),
    };

    Ok(Recommendation {
        id: row.get_id()?.to_string(),
        patient: Reference::patient(row.get_patient_id()?),
        issued_on: row.get_date("datum")?,
        priority,
        level_of_evidence: read_level_of_evidence(row)?,
        medication,
    })
}

fn read_level_of_evidence(row: &ResultSet) -> DataResult<Option<LevelOfEvidence>> {
    let grading = degrade(
        EVIDENCE_COLUMN,
        row.get_string(EVIDENCE_COLUMN)?
            .map(|raw| EVIDENCE_GRADING.coding(&raw))
            .transpose(),
    )?;
    let Some(grading) = grading else {
        return Ok(None);
    };

    let mut addendums = Vec::new();
    if let Some(raw) = row.get_string("evidenzlevel_zusatz")? {
        for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
            if let Some(addendum) =
                degrade("evidenzlevel_zusatz", EVIDENCE_ADDENDUM.coding(code).map(Some))?
            {
                addendums.push(addendum);
            }
        }
    }

    Ok(Some(LevelOfEvidence { grading, addendums }))
}

/// Maps systemic therapy recommendations (`empfehlungskategorie = systemisch`).
pub struct EinzelempfehlungWirkstoffDataMapper {
    catalogue: Rc<DataCatalogue>,
    properties: Rc<dyn PropertyCatalogue>,
}

impl EinzelempfehlungWirkstoffDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>, properties: Rc<dyn PropertyCatalogue>) -> Self {
        Self {
            catalogue,
            properties,
        }
    }
}

impl DataMapper for EinzelempfehlungWirkstoffDataMapper {
    type Output = MtbMedicationRecommendation;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn discriminator(&self) -> Option<Discriminator> {
        Some(Discriminator {
            column: CATEGORY_COLUMN,
            value: "systemisch",
        })
    }

    fn map(&self, row: &ResultSet) -> DataResult<MtbMedicationRecommendation> {
        let rec = read_recommendation(row, self.properties.as_ref())?;
        Ok(MtbMedicationRecommendation {
            id: rec.id,
            patient: rec.patient,
            reason: None,
            issued_on: rec.issued_on,
            priority: rec.priority,
            level_of_evidence: rec.level_of_evidence,
            medication: rec.medication,
        })
    }
}

/// Maps study enrollment recommendations (`empfehlungskategorie = studie`).
pub struct EinzelempfehlungStudieDataMapper {
    catalogue: Rc<DataCatalogue>,
    properties: Rc<dyn PropertyCatalogue>,
}

impl EinzelempfehlungStudieDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>, properties: Rc<dyn PropertyCatalogue>) -> Self {
        Self {
            catalogue,
            properties,
        }
    }
}

impl DataMapper for EinzelempfehlungStudieDataMapper {
    type Output = MtbStudyEnrollmentRecommendation;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn discriminator(&self) -> Option<Discriminator> {
        Some(Discriminator {
            column: CATEGORY_COLUMN,
            value: "studie",
        })
    }

    fn map(&self, row: &ResultSet) -> DataResult<MtbStudyEnrollmentRecommendation> {
        let rec = read_recommendation(row, self.properties.as_ref())?;
        let study = match row.get_string(STUDY_COLUMN)? {
            Some(json) => coding::studies(STUDY_COLUMN, &json)?,
            None => Vec::new(),
        };

        Ok(MtbStudyEnrollmentRecommendation {
            id: rec.id,
            patient: rec.patient,
            reason: None,
            issued_on: rec.issued_on,
            priority: rec.priority,
            level_of_evidence: rec.level_of_evidence,
            medication: rec.medication,
            study,
        })
    }
}
