//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the mapper. Mapping code never reads process-wide environment variables; the
//! entry point resolves them and hands over a [`CoreConfig`].

use crate::error::{DataMapperError, DataResult};
use mtb::TumorCellContentMethod;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_path: PathBuf,
    strict: bool,
    tumor_cell_content_method: TumorCellContentMethod,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Arguments
    ///
    /// * `database_path` - Path of the SQLite database holding the documentation tables.
    /// * `strict` - When `true`, a failure in any section aborts the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`DataMapperError::InvalidInput`] if the path is empty.
    pub fn new(database_path: PathBuf, strict: bool) -> DataResult<Self> {
        if database_path.as_os_str().is_empty() {
            return Err(DataMapperError::InvalidInput(
                "database path cannot be empty".into(),
            ));
        }

        Ok(Self {
            database_path,
            strict,
            tumor_cell_content_method: TumorCellContentMethod::default(),
        })
    }

    /// Returns this configuration with the method reported for histology tumor cell content.
    pub fn with_tumor_cell_content_method(mut self, method: TumorCellContentMethod) -> Self {
        self.tumor_cell_content_method = method;
        self
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn tumor_cell_content_method(&self) -> TumorCellContentMethod {
        self.tumor_cell_content_method
    }
}

/// Parse the strict-mode flag from an optional string value.
///
/// `None` or empty/whitespace means `false`. Accepts `true`/`false`, `1`/`0`, `yes`/`no`
/// (case-insensitive).
pub fn strict_from_env_value(value: Option<String>) -> DataResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(DataMapperError::InvalidInput(format!(
            "strict flag must be true or false, got '{other}'"
        ))),
    }
}

/// Parse the tumor cell content method from an optional string value.
///
/// `None` or empty/whitespace means [`TumorCellContentMethod::Histologic`]. Accepts
/// `histologic` and `bioinformatic` (case-insensitive).
pub fn tumor_cell_content_method_from_env_value(
    value: Option<String>,
) -> DataResult<TumorCellContentMethod> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(TumorCellContentMethod::default()),
        Some(v) => TumorCellContentMethod::from_wire(&v).ok_or_else(|| {
            DataMapperError::InvalidInput(format!(
                "tumor cell content method must be histologic or bioinformatic, got '{v}'"
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_database_path() {
        let err = CoreConfig::new(PathBuf::new(), false).expect_err("should reject empty path");
        assert!(matches!(err, DataMapperError::InvalidInput(msg) if msg.contains("database path")));
    }

    #[test]
    fn keeps_resolved_values() {
        let cfg = CoreConfig::new(PathBuf::from("onkostar.db"), true).expect("valid config");
        assert_eq!(cfg.database_path(), Path::new("onkostar.db"));
        assert!(cfg.strict());
        assert_eq!(cfg.tumor_cell_content_method(), TumorCellContentMethod::Histologic);
    }

    #[test]
    fn tumor_cell_content_method_parses_wire_codes() {
        assert_eq!(
            tumor_cell_content_method_from_env_value(None).expect("default"),
            TumorCellContentMethod::Histologic
        );
        assert_eq!(
            tumor_cell_content_method_from_env_value(Some(" Bioinformatic ".into())).expect("valid"),
            TumorCellContentMethod::Bioinformatic
        );
        let err = tumor_cell_content_method_from_env_value(Some("guess".into()))
            .expect_err("should reject");
        assert!(matches!(err, DataMapperError::InvalidInput(msg) if msg.contains("guess")));
    }

    #[test]
    fn strict_defaults_to_false() {
        assert!(!strict_from_env_value(None).expect("none is valid"));
        assert!(!strict_from_env_value(Some("  ".into())).expect("blank is valid"));
    }

    #[test]
    fn strict_parses_common_spellings() {
        assert!(strict_from_env_value(Some("TRUE".into())).expect("valid"));
        assert!(strict_from_env_value(Some("1".into())).expect("valid"));
        assert!(!strict_from_env_value(Some("no".into())).expect("valid"));
    }

    #[test]
    fn strict_rejects_garbage() {
        let err = strict_from_env_value(Some("sometimes".into())).expect_err("should reject");
        assert!(matches!(err, DataMapperError::InvalidInput(msg) if msg.contains("sometimes")));
    }
}
