/// Errors raised while reading rows and mapping them into MTB sub-documents.
///
/// The variants fall into two groups, see [`DataMapperError::is_recoverable`]:
/// data-access failures that an optional section may absorb, and everything else, which always
/// aborts the aggregate.
#[derive(Debug, thiserror::Error)]
pub enum DataMapperError {
    #[error("no {catalogue} record found for {key}")]
    RecordNotFound {
        catalogue: &'static str,
        key: String,
    },

    #[error("{count} {catalogue} records found for {key}, expected exactly one")]
    AmbiguousRecord {
        catalogue: &'static str,
        key: String,
        count: usize,
    },

    #[error("column '{column}' cannot be read as {expected}: {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("no coding in '{system}' for code '{code}'")]
    UnmappableCode { system: String, code: String },

    #[error("structural violation: {0}")]
    StructuralViolation(String),

    #[error("query failed: {0}")]
    Query(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("catalogue {catalogue} does not support {lookup}")]
    UnsupportedLookup {
        catalogue: &'static str,
        lookup: &'static str,
    },

    #[error("catalogue {0} is not registered")]
    UnregisteredCatalogue(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DataMapperError {
    /// Returns `true` for data-access failures an optional section may treat as "absent".
    ///
    /// Structural violations, coercion failures, unmappable codes and programming errors
    /// (unsupported lookups, unregistered catalogues) are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DataMapperError::RecordNotFound { .. }
                | DataMapperError::AmbiguousRecord { .. }
                | DataMapperError::Query(_)
        )
    }
}

impl From<rusqlite::Error> for DataMapperError {
    fn from(err: rusqlite::Error) -> Self {
        DataMapperError::Query(Box::new(err))
    }
}

pub type DataResult<T> = std::result::Result<T, DataMapperError>;
