//! Passive holder of the last fetched product list.
//!
//! Refreshed by an external loader (app startup, pull-to-refresh); read-only
//! for everything else. An empty catalog is a valid, if unhelpful, state -
//! never an error. A failed refresh leaves the previous list in place and is
//! reported once through the returned error; there is no automatic retry.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::instrument;

use fit_supplements_core::{Product, ProductId};

use crate::api::{ApiClient, ApiError};

/// The last fetched product catalog.
#[derive(Clone, Default)]
pub struct CatalogCache {
    inner: Arc<RwLock<Vec<Product>>>,
}

impl CatalogCache {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog with a freshly fetched product list.
    ///
    /// Returns the number of products loaded. On failure the previous list
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ApiError` when the fetch fails.
    #[instrument(skip(self, api))]
    pub async fn refresh(&self, api: &ApiClient) -> Result<usize, ApiError> {
        let products = api.list_products().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Catalog refresh failed; keeping previous list");
        })?;

        let count = products.len();
        *self.write() = products;
        tracing::debug!(count, "Catalog refreshed");
        Ok(count)
    }

    /// Ordered copy of the current product list.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.read().clone()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<Product> {
        self.read().iter().find(|p| p.id == id).cloned()
    }

    /// Distinct lowercase category tags, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.read()
            .iter()
            .map(|p| p.category.to_lowercase())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Case-insensitive shop filter: free-text search over name, description,
    /// and category, optionally narrowed to one category.
    #[must_use]
    pub fn filter(&self, query: &str, category: Option<&str>) -> Vec<Product> {
        let query = query.trim().to_lowercase();
        let category = category.map(str::to_lowercase);

        self.read()
            .iter()
            .filter(|p| {
                let matches_query = query.is_empty()
                    || p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
                    || p.category.to_lowercase().contains(&query);

                let matches_category = category
                    .as_deref()
                    .is_none_or(|c| p.category.to_lowercase() == c);

                matches_query && matches_category
            })
            .cloned()
            .collect()
    }

    /// Number of products currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the catalog is empty (valid state, e.g. before first load).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Product>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Product>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
