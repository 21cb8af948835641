//! Patient identity (from the root form) and patient address (from the patient store).

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding::GENDER;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{Address, Patient};
use std::rc::Rc;

/// Builds the patient identity from a root form row.
///
/// Gender is an identity field: a present but unknown code is fatal.
pub struct KpaPatientDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KpaPatientDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for KpaPatientDataMapper {
    type Output = Patient;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<Patient> {
        let gender = row
            .get_string("geschlecht")?
            .map(|raw| GENDER.coding(&raw))
            .transpose()?;

        Ok(Patient {
            id: row.get_patient_id()?,
            gender,
            birth_date: row.get_date("geburtsdatum")?,
            date_of_death: row.get_date("sterbedatum")?,
            address: None,
        })
    }
}

/// Reads the patient's address from the patient store.
pub struct PatientDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl PatientDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for PatientDataMapper {
    type Output = Patient;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<Patient> {
        Ok(Patient {
            id: row.get_id()?.to_string(),
            gender: None,
            birth_date: None,
            date_of_death: None,
            address: row
                .get_string("gkz")?
                .map(|municipality_code| Address { municipality_code }),
        })
    }
}
