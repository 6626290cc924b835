//! Recommendation query/response cycle.
//!
//! Each query is a single best-effort call. On success the stored result is
//! replaced wholesale; on failure it is left exactly as it was and the error
//! is surfaced so the user can retry.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::instrument;

use fit_supplements_core::{Product, RecommendationQuery};

use crate::api::{ApiClient, ApiError};

#[derive(Default)]
struct RecommendationState {
    results: Vec<Product>,
    last_query: Option<RecommendationQuery>,
}

/// Client for the recommendation collaborator, holding the latest result.
#[derive(Clone)]
pub struct RecommendationClient {
    api: ApiClient,
    state: Arc<RwLock<RecommendationState>>,
}

impl RecommendationClient {
    /// Create a client with no stored results.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(RecommendationState::default())),
        }
    }

    /// Run a recommendation query and store the ordered result.
    ///
    /// No automatic retry; a failed call leaves the stored result unchanged.
    ///
    /// # Errors
    ///
    /// Returns the underlying `ApiError`, recoverable by re-invoking.
    #[instrument(skip(self))]
    pub async fn query(&self, query: RecommendationQuery) -> Result<Vec<Product>, ApiError> {
        let products = self.api.recommend(&query).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Recommendation request failed; keeping previous results");
        })?;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.results.clone_from(&products);
        state.last_query = Some(query);
        drop(state);

        Ok(products)
    }

    /// The latest stored recommendations, in backend order.
    #[must_use]
    pub fn recommendations(&self) -> Vec<Product> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .results
            .clone()
    }

    /// The query behind the stored results, if any call has succeeded.
    #[must_use]
    pub fn last_query(&self) -> Option<RecommendationQuery> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .last_query
    }
}
