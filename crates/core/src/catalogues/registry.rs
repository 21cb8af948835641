//! Per-run catalogue registry.

use super::{CatalogueId, DataCatalogue};
use crate::error::{DataMapperError, DataResult};
use crate::query::QueryExecutor;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Hands out one shared [`DataCatalogue`] per registered [`CatalogueId`].
///
/// A registry is built for a single mapping run. Catalogues are created on first request and
/// cached for the rest of the run; all of them share the registry's executor.
pub struct CatalogueRegistry {
    executor: Rc<dyn QueryExecutor>,
    registered: HashSet<CatalogueId>,
    catalogues: RefCell<HashMap<CatalogueId, Rc<DataCatalogue>>>,
}

impl CatalogueRegistry {
    /// Create a registry with every known catalogue registered.
    pub fn new(executor: Rc<dyn QueryExecutor>) -> Self {
        Self::with_catalogues(executor, &CatalogueId::ALL)
    }

    /// Create a registry with only `ids` registered.
    pub fn with_catalogues(executor: Rc<dyn QueryExecutor>, ids: &[CatalogueId]) -> Self {
        Self {
            executor,
            registered: ids.iter().copied().collect(),
            catalogues: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the catalogue for `id`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DataMapperError::UnregisteredCatalogue`] if `id` was not registered.
    pub fn catalogue(&self, id: CatalogueId) -> DataResult<Rc<DataCatalogue>> {
        if !self.registered.contains(&id) {
            return Err(DataMapperError::UnregisteredCatalogue(id.name()));
        }

        let mut catalogues = self.catalogues.borrow_mut();
        let catalogue = catalogues
            .entry(id)
            .or_insert_with(|| Rc::new(DataCatalogue::new(id, Rc::clone(&self.executor))));
        Ok(Rc::clone(catalogue))
    }
}
