//! Versioned property catalogues.
//!
//! Coded columns in the documentation database store a code together with the version of the
//! property catalogue the code was picked from. A [`PropertyCatalogue`] resolves such a pair to
//! its human-readable entry.

use crate::error::{DataMapperError, DataResult};
use crate::query::{QueryExecutor, SqlValue};
use crate::result_set::ResultSet;
use std::collections::HashMap;
use std::rc::Rc;

const ENTRY_TABLE: &str = "property_catalogue_version_entry";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    pub code: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
}

impl PropertyEntry {
    pub fn new(
        code: impl Into<String>,
        short_description: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            short_description: Some(short_description.into()),
            description: Some(description.into()),
        }
    }

    /// The text used as coding display: the description, else the short description.
    pub fn display(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.short_description.as_deref())
    }
}

/// Resolves `(code, version)` pairs to catalogue entries.
pub trait PropertyCatalogue {
    /// Returns `Ok(None)` when the catalogue version has no entry for `code`.
    fn get_by_code_and_version(&self, code: &str, version: i32)
        -> DataResult<Option<PropertyEntry>>;
}

/// Property catalogue backed by the documentation database.
pub struct SqlPropertyCatalogue {
    executor: Rc<dyn QueryExecutor>,
}

impl SqlPropertyCatalogue {
    pub fn new(executor: Rc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }
}

impl PropertyCatalogue for SqlPropertyCatalogue {
    fn get_by_code_and_version(
        &self,
        code: &str,
        version: i32,
    ) -> DataResult<Option<PropertyEntry>> {
        let sql = "SELECT e.code, e.shortdesc, e.description \
                   FROM property_catalogue_version_entry e \
                   JOIN property_catalogue_version v ON v.id = e.property_version_id \
                   WHERE e.code = ? AND v.id = ?";

        let mut rows = self
            .executor
            .query(sql, &[SqlValue::from(code), SqlValue::from(version)])?;

        if rows.len() > 1 {
            return Err(DataMapperError::AmbiguousRecord {
                catalogue: ENTRY_TABLE,
                key: format!("code {code} version {version}"),
                count: rows.len(),
            });
        }
        let Some(row) = rows.pop() else {
            return Ok(None);
        };

        let rs = ResultSet::new(row);
        Ok(Some(PropertyEntry {
            code: rs.get_string("code")?.unwrap_or_else(|| code.to_string()),
            short_description: rs.get_string("shortdesc")?,
            description: rs.get_string("description")?,
        }))
    }
}

/// In-memory property catalogue, keyed by version and code.
#[derive(Clone, Debug, Default)]
pub struct MemoryPropertyCatalogue {
    entries: HashMap<(i32, String), PropertyEntry>,
}

impl MemoryPropertyCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: i32, entry: PropertyEntry) {
        self.entries.insert((version, entry.code.clone()), entry);
    }

    pub fn with_entry(mut self, version: i32, entry: PropertyEntry) -> Self {
        self.insert(version, entry);
        self
    }
}

impl PropertyCatalogue for MemoryPropertyCatalogue {
    fn get_by_code_and_version(
        &self,
        code: &str,
        version: i32,
    ) -> DataResult<Option<PropertyEntry>> {
        Ok(self.entries.get(&(version, code.to_string())).cloned())
    }
}
