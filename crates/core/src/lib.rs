//! # Datamapper Core
//!
//! Translates rows of the clinical documentation database into MTB documents.
//!
//! This crate contains the mapping pipeline:
//! - Typed row access over weakly-typed query results ([`ResultSet`])
//! - Per-table catalogues enforcing lookup cardinality ([`DataCatalogue`])
//! - Static code tables normalising stored codes into codings ([`coding`])
//! - Leaf, composite and root mappers building the document ([`mappers`])
//!
//! **No entry-point concerns**: opening databases from configuration, logging setup and output
//! formatting belong in the `datamapper` binary.

pub mod catalogues;
pub mod coding;
pub mod config;
pub mod constants;
pub mod error;
pub mod mappers;
pub mod property;
pub mod query;
pub mod result_set;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export facades
pub use mappers::MtbDataMapper;

// Re-export public types
pub use catalogues::{CatalogueId, CatalogueRegistry, DataCatalogue, TableSpec};
pub use config::CoreConfig;
pub use error::{DataMapperError, DataResult};
pub use mappers::{DataMapper, Discriminator, FailurePolicy, Section};
pub use property::{MemoryPropertyCatalogue, PropertyCatalogue, PropertyEntry, SqlPropertyCatalogue};
pub use query::{QueryExecutor, RawRow, SqlValue, SqliteExecutor};
pub use result_set::ResultSet;
