//! Model-project consent from the consent form and its history subform.
//!
//! The consent form holds the consent version and signing date. Each history row records one
//! decision per purpose and becomes one provision per recorded purpose, in the order
//! sequencing, case identification, reidentification. Provision decisions are fatal when
//! present but unknown.

use super::DataMapper;
use crate::catalogues::DataCatalogue;
use crate::coding;
use crate::error::DataResult;
use crate::result_set::ResultSet;
use mtb::{ModelProjectConsent, Provision};
use std::rc::Rc;

/// Decision columns, in provision order.
const PURPOSE_COLUMNS: [&str; 3] = ["sequencing", "caseidentification", "reidentification"];

pub struct ConsentMvDataMapper {
    form: Rc<DataCatalogue>,
    catalogue: Rc<DataCatalogue>,
}

impl ConsentMvDataMapper {
    /// `form` is the consent form table, `history` its history subform.
    pub fn new(form: Rc<DataCatalogue>, history: Rc<DataCatalogue>) -> Self {
        Self {
            form,
            catalogue: history,
        }
    }

    /// Returns the newest consent recorded for the consent form `consent_id`.
    ///
    /// History rows are ordered by date; rows without a date rank lowest and on equal dates the
    /// row later in the history wins. Version and date come from the consent form; a form
    /// without a date falls back to the date of the chosen history row. Returns `None` when
    /// the history is empty.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DataMapperError::RecordNotFound`] when the consent form row is missing.
    pub fn get_latest(&self, consent_id: i64) -> DataResult<Option<ModelProjectConsent>> {
        let form = self.form.get_by_id(consent_id)?;
        let consents = self.get_by_parent_id(consent_id)?;

        let mut latest: Option<ModelProjectConsent> = None;
        for consent in consents {
            let newer = latest.as_ref().map_or(true, |current| consent.date >= current.date);
            if newer {
                latest = Some(consent);
            }
        }

        let Some(mut consent) = latest else {
            return Ok(None);
        };
        consent.version = form.get_string("version")?;
        if let Some(signed) = form.get_date("datum")? {
            consent.date = Some(signed);
        }
        Ok(Some(consent))
    }
}

impl DataMapper for ConsentMvDataMapper {
    type Output = ModelProjectConsent;

    fn catalogue(&self) -> &DataCatalogue {
        &self.catalogue
    }

    fn map(&self, row: &ResultSet) -> DataResult<ModelProjectConsent> {
        let date = row.get_date("datum")?;

        let mut provisions = Vec::with_capacity(PURPOSE_COLUMNS.len());
        for column in PURPOSE_COLUMNS {
            if let Some(raw) = row.get_string(column)? {
                provisions.push(Provision {
                    date,
                    purpose: coding::consent_purpose(column)?,
                    type_: coding::consent_provision(&raw)?,
                });
            }
        }

        Ok(ModelProjectConsent {
            version: None,
            date,
            provisions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogues::{CatalogueId, CatalogueRegistry};
    use crate::error::DataMapperError;
    use crate::query::SqlValue;
    use crate::test_support::TestDb;
    use chrono::NaiveDate;
    use mtb::{ConsentProvision, ModelProjectConsentPurpose};

    fn mapper(db: TestDb) -> ConsentMvDataMapper {
        let registry = CatalogueRegistry::new(db.into_executor());
        ConsentMvDataMapper::new(
            registry.catalogue(CatalogueId::ConsentMv).expect("consent form"),
            registry
                .catalogue(CatalogueId::ConsentMvVerlauf)
                .expect("consent history"),
        )
    }

    fn consent_db() -> TestDb {
        let db = TestDb::new();
        db.insert("dk_dnpm_consentmv", &[("id", 10.into()), ("version", "1.2".into())]);
        db
    }

    fn insert_history(db: &TestDb, id: i64, date: Option<&str>, sequencing: &str) {
        let mut cells: Vec<(&str, SqlValue)> = vec![
            ("id", id.into()),
            ("hauptprozedur_id", 10.into()),
            ("sequencing", sequencing.into()),
            ("caseidentification", "deny".into()),
            ("reidentification", "deny".into()),
        ];
        if let Some(date) = date {
            cells.push(("datum", date.into()));
        }
        db.insert("dk_dnpm_uf_consentmvverlauf", &cells);
    }

    #[test]
    fn one_history_row_yields_three_provisions() {
        let db = consent_db();
        insert_history(&db, 10, Some("2025-01-02"), "permit");

        let consent = mapper(db)
            .get_latest(10)
            .expect("mapped")
            .expect("consent present");
        let date = NaiveDate::from_ymd_opt(2025, 1, 2);
        assert_eq!(
            consent.provisions,
            [
                Provision {
                    date,
                    purpose: ModelProjectConsentPurpose::Sequencing,
                    type_: ConsentProvision::Permit,
                },
                Provision {
                    date,
                    purpose: ModelProjectConsentPurpose::CaseIdentification,
                    type_: ConsentProvision::Deny,
                },
                Provision {
                    date,
                    purpose: ModelProjectConsentPurpose::Reidentification,
                    type_: ConsentProvision::Deny,
                },
            ]
        );
    }

    #[test]
    fn newest_history_row_wins() {
        let db = consent_db();
        insert_history(&db, 11, Some("2025-03-01"), "deny");
        insert_history(&db, 12, None, "permit");
        insert_history(&db, 13, Some("2024-12-01"), "permit");

        let consent = mapper(db)
            .get_latest(10)
            .expect("mapped")
            .expect("consent present");
        assert_eq!(consent.date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(consent.provisions[0].type_, ConsentProvision::Deny);
    }

    #[test]
    fn equal_dates_prefer_the_later_row() {
        let db = consent_db();
        insert_history(&db, 11, Some("2025-03-01"), "deny");
        insert_history(&db, 12, Some("2025-03-01"), "permit");

        let consent = mapper(db)
            .get_latest(10)
            .expect("mapped")
            .expect("consent present");
        assert_eq!(consent.provisions[0].type_, ConsentProvision::Permit);
    }

    #[test]
    fn empty_history_means_no_consent() {
        assert_eq!(mapper(consent_db()).get_latest(10).expect("mapped"), None);
    }

    #[test]
    fn version_and_date_come_from_the_consent_form() {
        let db = TestDb::new();
        db.insert(
            "dk_dnpm_consentmv",
            &[
                ("id", 10.into()),
                ("version", "1.2".into()),
                ("datum", "2025-02-14".into()),
            ],
        );
        insert_history(&db, 11, Some("2025-03-01"), "permit");

        let consent = mapper(db)
            .get_latest(10)
            .expect("mapped")
            .expect("consent present");
        assert_eq!(consent.version.as_deref(), Some("1.2"));
        assert_eq!(consent.date, NaiveDate::from_ymd_opt(2025, 2, 14));
        assert_eq!(consent.provisions[0].date, NaiveDate::from_ymd_opt(2025, 3, 1));
    }

    #[test]
    fn missing_consent_form_is_recoverable() {
        let db = TestDb::new();
        insert_history(&db, 11, Some("2025-03-01"), "permit");

        let err = mapper(db).get_latest(10).expect_err("no form row");
        assert!(matches!(
            err,
            DataMapperError::RecordNotFound { catalogue: "dk_dnpm_consentmv", .. }
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn unknown_decision_is_fatal() {
        let db = consent_db();
        insert_history(&db, 11, None, "perhaps");

        assert!(matches!(
            mapper(db).get_latest(10),
            Err(DataMapperError::UnmappableCode { .. })
        ));
    }
}
