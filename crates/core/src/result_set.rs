//! Typed read access to a single row.
//!
//! A [`ResultSet`] wraps exactly one [`RawRow`] and converts its weakly-typed cells into the
//! types the mappers need. Every getter returns `Ok(None)` when the column is missing or the
//! cell is `NULL`, and [`DataMapperError::TypeMismatch`] when a present value cannot be
//! coerced.

use crate::constants::{ID_COLUMN, PARENT_ID_COLUMN, PATIENT_ID_COLUMN, PROPCAT_VERSION_SUFFIX};
use crate::error::{DataMapperError, DataResult};
use crate::property::{PropertyCatalogue, PropertyEntry};
use crate::query::{RawRow, SqlValue};
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone, Debug, PartialEq)]
pub struct ResultSet {
    row: RawRow,
}

impl ResultSet {
    pub fn new(row: RawRow) -> Self {
        Self { row }
    }

    pub fn raw(&self) -> &RawRow {
        &self.row
    }

    /// Returns the cell for `column` unless it is missing or `NULL`.
    fn cell(&self, column: &str) -> Option<&SqlValue> {
        self.row.get(column).filter(|value| !value.is_null())
    }

    /// Reads `column` as text.
    ///
    /// Numbers and dates are rendered in their canonical text form.
    ///
    /// # Errors
    ///
    /// Returns [`DataMapperError::TypeMismatch`] for blob cells.
    pub fn get_string(&self, column: &str) -> DataResult<Option<String>> {
        let Some(value) = self.cell(column) else {
            return Ok(None);
        };

        match value {
            SqlValue::Text(v) => Ok(Some(v.clone())),
            SqlValue::Integer(v) => Ok(Some(v.to_string())),
            SqlValue::Real(v) => Ok(Some(v.to_string())),
            SqlValue::Date(v) => Ok(Some(v.format(DATE_FORMAT).to_string())),
            other => Err(mismatch(column, "text", other)),
        }
    }

    /// Reads `column` as a 32-bit integer.
    pub fn get_integer(&self, column: &str) -> DataResult<Option<i32>> {
        let Some(value) = self.get_long(column)? else {
            return Ok(None);
        };

        i32::try_from(value).map(Some).map_err(|_| DataMapperError::TypeMismatch {
            column: column.to_string(),
            expected: "integer",
            found: format!("out of range value {value}"),
        })
    }

    /// Reads `column` as a 64-bit integer.
    ///
    /// Integer cells, integral reals and numeric text are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DataMapperError::TypeMismatch`] for fractional reals, non-numeric text,
    /// dates and blobs.
    pub fn get_long(&self, column: &str) -> DataResult<Option<i64>> {
        let Some(value) = self.cell(column) else {
            return Ok(None);
        };

        match value {
            SqlValue::Integer(v) => Ok(Some(*v)),
            SqlValue::Real(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Ok(Some(*v as i64))
            }
            SqlValue::Text(v) => v
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| mismatch(column, "long integer", value)),
            other => Err(mismatch(column, "long integer", other)),
        }
    }

    /// Reads `column` as a floating point number.
    ///
    /// Integer cells, reals and numeric text are accepted.
    pub fn get_double(&self, column: &str) -> DataResult<Option<f64>> {
        let Some(value) = self.cell(column) else {
            return Ok(None);
        };

        match value {
            SqlValue::Real(v) => Ok(Some(*v)),
            SqlValue::Integer(v) => Ok(Some(*v as f64)),
            SqlValue::Text(v) => v
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| mismatch(column, "number", value)),
            other => Err(mismatch(column, "number", other)),
        }
    }

    /// Reads `column` as a calendar date.
    ///
    /// Text is accepted as `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`; the time part is dropped.
    pub fn get_date(&self, column: &str) -> DataResult<Option<NaiveDate>> {
        let Some(value) = self.cell(column) else {
            return Ok(None);
        };

        match value {
            SqlValue::Date(v) => Ok(Some(*v)),
            SqlValue::Text(v) => {
                let text = v.trim();
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).map(|dt| dt.date())
                    })
                    .map(Some)
                    .map_err(|_| mismatch(column, "date", value))
            }
            other => Err(mismatch(column, "date", other)),
        }
    }

    /// Reads a text column that must be present.
    pub fn required_string(&self, column: &str) -> DataResult<String> {
        self.get_string(column)?.ok_or_else(|| absent(column, "text"))
    }

    /// Reads a date column that must be present.
    pub fn required_date(&self, column: &str) -> DataResult<NaiveDate> {
        self.get_date(column)?.ok_or_else(|| absent(column, "date"))
    }

    /// Reads an integer column that must be present.
    pub fn required_long(&self, column: &str) -> DataResult<i64> {
        self.get_long(column)?
            .ok_or_else(|| absent(column, "long integer"))
    }

    /// The row's primary key.
    pub fn get_id(&self) -> DataResult<i64> {
        self.required_long(ID_COLUMN)
    }

    /// The id of the form record owning this subform row.
    pub fn get_parent_id(&self) -> DataResult<i64> {
        self.required_long(PARENT_ID_COLUMN)
    }

    /// The patient id embedded in the row, as used for patient references.
    pub fn get_patient_id(&self) -> DataResult<String> {
        self.required_string(PATIENT_ID_COLUMN)
    }

    /// Resolves a versioned coded property.
    ///
    /// The code is read from `column` and the catalogue version from
    /// `{column}_propcat_version`. If either is absent, the property is absent.
    ///
    /// # Errors
    ///
    /// Propagates coercion failures of either column and any failure of `catalogue`.
    pub fn get_property(
        &self,
        column: &str,
        catalogue: &dyn PropertyCatalogue,
    ) -> DataResult<Option<PropertyEntry>> {
        let Some(code) = self.get_string(column)? else {
            return Ok(None);
        };
        let Some(version) = self.get_integer(&format!("{column}{PROPCAT_VERSION_SUFFIX}"))? else {
            return Ok(None);
        };

        catalogue.get_by_code_and_version(&code, version)
    }
}

impl From<RawRow> for ResultSet {
    fn from(row: RawRow) -> Self {
        Self::new(row)
    }
}

fn mismatch(column: &str, expected: &'static str, found: &SqlValue) -> DataMapperError {
    DataMapperError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.to_string(),
    }
}

fn absent(column: &str, expected: &'static str) -> DataMapperError {
    DataMapperError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: "absent value".into(),
    }
}
