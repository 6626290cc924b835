//! Application state shared across UI event handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;
use crate::catalog::CatalogCache;
use crate::checkout::CheckoutOrchestrator;
use crate::config::StorefrontConfig;
use crate::recommend::RecommendationClient;
use crate::services::auth::AuthService;
use crate::services::chat::ChatRelay;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and wires the configuration
/// through the API client into the stores and the checkout orchestrator.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    catalog: CatalogCache,
    cart: CartStore,
    recommendations: RecommendationClient,
    checkout: CheckoutOrchestrator,
    chat: ChatRelay,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;
        let cart = CartStore::new();
        let checkout =
            CheckoutOrchestrator::new(api.clone(), cart.clone(), config.download_dir.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                catalog: CatalogCache::new(),
                recommendations: RecommendationClient::new(api.clone()),
                chat: ChatRelay::new(api.clone()),
                auth: AuthService::new(api.clone()),
                config,
                api,
                cart,
                checkout,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the catalog cache.
    #[must_use]
    pub fn catalog(&self) -> &CatalogCache {
        &self.inner.catalog
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the recommendation client.
    #[must_use]
    pub fn recommendations(&self) -> &RecommendationClient {
        &self.inner.recommendations
    }

    /// Get a reference to the checkout orchestrator.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutOrchestrator {
        &self.inner.checkout
    }

    /// Get a reference to the chat relay.
    #[must_use]
    pub fn chat(&self) -> &ChatRelay {
        &self.inner.chat
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
