//! Leaf, composite and root mappers.
//!
//! Every mapper reads rows from one catalogue and builds one kind of MTB sub-document. The
//! fetch / filter / map loop is implemented once, as default methods of [`DataMapper`];
//! individual mappers provide the catalogue, the row translation and, for mappers sharing a
//! subform table, a [`Discriminator`].

pub mod consent;
pub mod diagnosis;
pub mod ecog;
pub mod einzelempfehlung;
pub mod episode;
pub mod histologie;
pub mod keimbahndiagnose;
pub mod molekulargenetik;
pub mod mtb;
pub mod patient;
pub mod prozedur;
pub mod rebiopsie;
pub mod reevaluation;
pub mod therapieplan;
pub mod therapielinie;
pub mod therapy_course;
pub mod tumorausbreitung;
pub mod tumorgrading;
pub mod verwandte;
pub mod vorbefunde;

pub use self::mtb::{FailurePolicy, MtbDataMapper, Section, SECTION_POLICIES};
pub use consent::ConsentMvDataMapper;
pub use diagnosis::KpaDiagnosisDataMapper;
pub use ecog::KpaEcogDataMapper;
pub use einzelempfehlung::{EinzelempfehlungStudieDataMapper, EinzelempfehlungWirkstoffDataMapper};
pub use episode::KpaEpisodeDataMapper;
pub use histologie::HistologieDataMapper;
pub use keimbahndiagnose::KeimbahndiagnoseDataMapper;
pub use molekulargenetik::{
    MolekulargenMsiDataMapper, MolekulargenetikDataMapper, MolekulargenuntersuchungDataMapper,
};
pub use patient::{KpaPatientDataMapper, PatientDataMapper};
pub use prozedur::KpaProzedurDataMapper;
pub use rebiopsie::RebiopsieDataMapper;
pub use reevaluation::ReevaluationDataMapper;
pub use therapieplan::{CarePlanSubforms, TherapieplanDataMapper};
pub use therapielinie::KpaTherapielinieDataMapper;
pub use tumorausbreitung::TumorausbreitungDataMapper;
pub use tumorgrading::TumorgradingDataMapper;
pub use verwandte::KpaVerwandteDataMapper;
pub use vorbefunde::VorbefundeDataMapper;

use crate::catalogues::DataCatalogue;
use crate::error::{DataMapperError, DataResult};
use crate::result_set::ResultSet;

/// Row filter: keep rows whose `column` equals `value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Discriminator {
    pub column: &'static str,
    pub value: &'static str,
}

impl Discriminator {
    pub fn matches(&self, row: &ResultSet) -> DataResult<bool> {
        Ok(row.get_string(self.column)?.as_deref() == Some(self.value))
    }
}

/// Maps catalogue rows into one kind of sub-document.
pub trait DataMapper {
    type Output;

    fn catalogue(&self) -> &DataCatalogue;

    fn map(&self, row: &ResultSet) -> DataResult<Self::Output>;

    fn discriminator(&self) -> Option<Discriminator> {
        None
    }

    /// Loads and maps the row with primary key `id`.
    ///
    /// A row rejected by the discriminator counts as not found.
    fn get_by_id(&self, id: i64) -> DataResult<Self::Output> {
        let row = self.catalogue().get_by_id(id)?;

        if let Some(discriminator) = self.discriminator() {
            if !discriminator.matches(&row)? {
                return Err(DataMapperError::RecordNotFound {
                    catalogue: self.catalogue().id().name(),
                    key: format!("id {id} with {}={}", discriminator.column, discriminator.value),
                });
            }
        }

        self.map(&row)
    }

    /// Loads and maps all subform rows of `parent_id` in catalogue order.
    fn get_by_parent_id(&self, parent_id: i64) -> DataResult<Vec<Self::Output>> {
        let rows = self.catalogue().get_all_by_parent_id(parent_id)?;
        self.map_all(rows)
    }

    /// Loads and maps all rows recorded for the patient `patient_id` in catalogue order.
    fn get_by_patient_id(&self, patient_id: i64) -> DataResult<Vec<Self::Output>> {
        let rows = self.catalogue().get_all_by_patient_id(patient_id)?;
        self.map_all(rows)
    }

    /// Maps the rows accepted by the discriminator, keeping their order.
    fn map_all(&self, rows: Vec<ResultSet>) -> DataResult<Vec<Self::Output>> {
        let discriminator = self.discriminator();
        let mut mapped = Vec::new();

        for row in rows {
            if let Some(discriminator) = discriminator {
                if !discriminator.matches(&row)? {
                    continue;
                }
            }
            mapped.push(self.map(&row)?);
        }

        Ok(mapped)
    }
}

/// Logs a degraded optional field and turns it into an absent value.
pub(crate) fn degrade<T>(field: &'static str, result: DataResult<Option<T>>) -> DataResult<Option<T>> {
    match result {
        Ok(value) => Ok(value),
        Err(err @ DataMapperError::UnmappableCode { .. }) => {
            tracing::debug!(field, error = %err, "dropping unmappable optional field");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
