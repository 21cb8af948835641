//! Tumor staging history of the primary diagnosis.
//!
//! TNM components are taken as recorded. A row without any TNM component has no TNM
//! classification; an unknown staging method degrades to absent.

use super::{degrade, DataMapper};
use crate::catalogues::DataCatalogue;
use crate::coding::{self, TUMOR_STAGING_METHOD};
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{TnmClassification, TumorStaging};
use std::rc::Rc;

pub struct TumorausbreitungDataMapper {
    catalogue: Rc<DataCatalogue>,
}

impl TumorausbreitungDataMapper {
    pub fn new(catalogue: Rc<DataCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl DataMapper for TumorausbreitungDataMapper {
    type Output = TumorStaging;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<TumorStaging> {
        let method = degrade(
            "typ",
            row.get_string("typ")?
                .map(|raw| TUMOR_STAGING_METHOD.coding(&raw))
                .transpose(),
        )?;

        let tnm = TnmClassification {
            tumor: row.get_string("tnmt")?.map(|code| coding::tnm(&code)),
            nodes: row.get_string("tnmn")?.map(|code| coding::tnm(&code)),
            metastasis: row.get_string("tnmm")?.map(|code| coding::tnm(&code)),
        };

        Ok(TumorStaging {
            date: row.get_date("zeitpunkt")?,
            method,
            tnm_classification: (!tnm.is_empty()).then_some(tnm),
            other_classifications: row
                .get_string("wertweitereklassifikation")?
                .map(|code| coding::other_staging(&code))
                .into_iter()
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::test_support::TestDb;

    fn mapper(db: TestDb) -> TumorausbreitungDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        TumorausbreitungDataMapper::new(
            registry
                .catalogue(CatalogueId::Tumorausbreitung)
                .expect("staging"),
        )
    }

    #[test]
    fn maps_tnm_and_method() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_tumorausbreitung",
            &[
                ("id", 1.into()),
                ("hauptprozedur_id", 1.into()),
                ("zeitpunkt", "2024-01-12".into()),
                ("typ", "p".into()),
                ("tnmt", "T2".into()),
                ("tnmn", "N1".into()),
                ("tnmm", "M0".into()),
            ],
        );

        let staging = &mapper(db).get_by_parent_id(1).expect("mapped")[0];
        assert_eq!(staging.method.as_ref().map(|m| m.code.as_str()), Some("pathologic"));
        let tnm = staging.tnm_classification.as_ref().expect("tnm present");
        assert_eq!(tnm.tumor.as_ref().map(|c| c.code.as_str()), Some("T2"));
        assert_eq!(tnm.metastasis.as_ref().map(|c| c.system.as_str()), Some("UICC"));
        assert!(staging.other_classifications.is_empty());
    }

    #[test]
    fn other_classification_without_tnm() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_uf_tumorausbreitung",
            &[
                ("id", 1.into()),
                ("hauptprozedur_id", 1.into()),
                ("typ", "x".into()),
                ("wertweitereklassifikation", "FIGO IIIA".into()),
            ],
        );

        let staging = &mapper(db).get_by_parent_id(1).expect("mapped")[0];
        assert_eq!(staging.method, None);
        assert_eq!(staging.tnm_classification, None);
        assert_eq!(staging.other_classifications[0].code, "FIGO IIIA");
    }
}
