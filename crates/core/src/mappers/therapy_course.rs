//! Therapy-course fields shared by guideline procedures and systemic therapies.
//!
//! Field policy:
//! - exactly one linked disease is required, anything else is a structural violation
//! - intent and status are fatal when present but unknown
//! - status reason degrades to absent when unknown
//! - the period exists only when a start date is recorded

use super::degrade;
use crate::catalogues::DataCatalogue;
use crate::coding::{THERAPY_INTENT, THERAPY_STATUS, THERAPY_STATUS_REASON};
use crate::error::{DataMapperError, DataResult};
use crate::result_set::ResultSet;
use chrono::NaiveDate;
use mtb::{Coding, PeriodDate, Reference};

/// The fields common to both therapy kinds, read from one therapy row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TherapyCourse {
    pub id: String,
    pub patient: Reference,
    pub based_on: Reference,
    pub recorded_on: Option<NaiveDate>,
    pub therapy_line: Option<i64>,
    pub intent: Option<Coding>,
    pub status: Option<Coding>,
    pub status_reason: Option<Coding>,
    pub period: Option<PeriodDate>,
}

/// Reads the therapy course of `row`, resolving its disease through `catalogue`.
///
/// # Errors
///
/// Returns [`DataMapperError::StructuralViolation`] unless exactly one disease is linked to
/// the row, and [`DataMapperError::UnmappableCode`] for unknown intent or status codes.
pub fn read_course(catalogue: &DataCatalogue, row: &ResultSet) -> DataResult<TherapyCourse> {
    let id = row.get_id()?;

    let diseases = catalogue.get_diseases(id)?;
    let &[disease_id] = diseases.as_slice() else {
        return Err(DataMapperError::StructuralViolation(format!(
            "no unique disease for procedure {id} in {}: {} linked",
            catalogue.id().name(),
            diseases.len()
        )));
    };

    let intent = row
        .get_string("intention")?
        .map(|raw| THERAPY_INTENT.coding(&raw))
        .transpose()?;
    let status = row
        .get_string("status")?
        .map(|raw| THERAPY_STATUS.coding(&raw))
        .transpose()?;
    let status_reason = degrade(
        "statusgrund",
        row.get_string("statusgrund")?
            .map(|raw| THERAPY_STATUS_REASON.coding(&raw))
            .transpose(),
    )?;

    let period = row.get_date("beginn")?.map(|start| -> DataResult<PeriodDate> {
        Ok(PeriodDate {
            start,
            end: row.get_date("ende")?,
        })
    });

    Ok(TherapyCourse {
        id: id.to_string(),
        patient: Reference::patient(row.get_patient_id()?),
        based_on: Reference::diagnosis(disease_id.to_string()),
        recorded_on: row.get_date("erfassungsdatum")?,
        therapy_line: row.get_long("therapielinie")?,
        intent,
        status,
        status_reason,
        period: period.transpose()?,
    })
}
