use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding::FAMILY_RELATIONSHIP;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{FamilyMemberHistory, Reference};
use std::rc::Rc;

/// Maps `Verwandte` subform rows into family member histories.
pub struct KpaVerwandteDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl KpaVerwandteDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for KpaVerwandteDataMapper {
    type Output = FamilyMemberHistory;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<FamilyMemberHistory> {
        Ok(FamilyMemberHistory {
            id: row.get_id()?.to_string(),
            patient: Reference::patient(row.get_patient_id()?),
            relationship: FAMILY_RELATIONSHIP.coding(&row.required_string("verwandtschaftsgrad")?)?,
        })
    }
}
