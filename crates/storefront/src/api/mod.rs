//! REST client for the store backend.
//!
//! Uses `reqwest` for HTTP with `moka` caching of catalog GETs (5-minute
//! TTL). Cart, recommendation, and checkout calls are never cached.
//!
//! # Endpoints
//!
//! - `GET /products/` - ordered product list
//! - `GET /products/{id}/` - single product
//! - `POST /recommend/` - goal/diet/budget recommendations
//! - `POST /checkout/` - order creation
//! - `GET <invoice location>` - invoice document bytes
//!
//! The chat relay and auth login collaborators reuse this client's transport
//! through the crate-internal `get_json`/`post_json` helpers.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use fit_supplements_core::{
    CheckoutLine, OrderConfirmation, Product, ProductId, RecommendationQuery,
};

use crate::config::{ApiConfig, ensure_trailing_slash};

/// Cached catalog responses keyed by request.
#[derive(Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
}

/// Errors that can occur when talking to the store backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not parse as the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An invoice location could not be resolved into a fetchable URL.
    #[error("Invalid resource location: {0}")]
    InvalidLocation(String),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the store backend REST API.
///
/// Cheaply cloneable; all clones share the connection pool, the catalog
/// cache, and the installed auth token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    auth_token: RwLock<Option<SecretString>>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a new backend API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                auth_token: RwLock::new(None),
                cache,
            }),
        })
    }

    /// The configured API base URL (always slash-terminated).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Auth token
    // =========================================================================

    /// Install a bearer token sent with every subsequent request.
    pub fn set_auth_token(&self, token: SecretString) {
        *self
            .inner
            .auth_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Remove the installed bearer token.
    pub fn clear_auth_token(&self) {
        *self
            .inner
            .auth_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a bearer token is currently installed.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        self.inner
            .auth_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self
            .inner
            .auth_token
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    // =========================================================================
    // Transport helpers
    // =========================================================================

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidLocation(format!("{path}: {e}")))
    }

    /// GET a backend endpoint and parse the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.apply_auth(self.inner.client.get(url)).send().await?;
        read_json(response).await
    }

    /// POST a JSON body to a backend endpoint and parse the JSON response.
    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let response = self
            .apply_auth(self.inner.client.post(url))
            .json(body)
            .send()
            .await?;
        read_json(response).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Get the full ordered product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products".to_string();

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json("products/").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown ids, or another variant if
    /// the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&format!("products/{id}/")).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }

    // =========================================================================
    // Recommendations
    // =========================================================================

    /// Request recommendations for a goal/diet/budget triple.
    ///
    /// One best-effort attempt, never retried, never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self))]
    pub async fn recommend(&self, query: &RecommendationQuery) -> Result<Vec<Product>, ApiError> {
        #[derive(serde::Deserialize)]
        struct RecommendResponse {
            recommendations: Vec<Product>,
        }

        let response: RecommendResponse = self.post_json("recommend/", query).await?;
        Ok(response.recommendations)
    }

    // =========================================================================
    // Checkout (not cached - mutable state)
    // =========================================================================

    /// Create an order from a frozen checkout payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub async fn create_order(&self, lines: &[CheckoutLine]) -> Result<OrderConfirmation, ApiError> {
        #[derive(Serialize)]
        struct CheckoutBody<'a> {
            items: &'a [CheckoutLine],
        }

        self.post_json("checkout/", &CheckoutBody { items: lines })
            .await
    }

    /// Resolve an invoice location into an absolute fetch target.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidLocation` if the location cannot be resolved
    /// against the configured base.
    pub fn invoice_url(&self, location: &str) -> Result<Url, ApiError> {
        resolve_location(&self.inner.base_url, location)
    }

    /// Fetch an invoice document as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-success statuses.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_invoice(&self, url: Url) -> Result<Vec<u8>, ApiError> {
        let response = self.apply_auth(self.inner.client.get(url)).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Invoice fetch returned non-success status");
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

// =============================================================================
// Location resolution
// =============================================================================

/// Resolve a resource location against the API base URL.
///
/// Absolute locations (with a scheme) pass through unchanged. Locations
/// starting with `/` resolve against the origin, so a base path that the
/// location repeats (`http://host/api/` + `/api/invoice/3/`) yields a single
/// `/api` segment. Bare relative locations resolve underneath the base path
/// regardless of whether the base was configured with a trailing slash.
pub fn resolve_location(base: &Url, location: &str) -> Result<Url, ApiError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(ApiError::InvalidLocation("empty location".to_string()));
    }

    match Url::parse(location) {
        Ok(absolute) => Ok(absolute),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = ensure_trailing_slash(base.clone());
            base.join(location)
                .map_err(|e| ApiError::InvalidLocation(format!("{location}: {e}")))
        }
        Err(e) => Err(ApiError::InvalidLocation(format!("{location}: {e}"))),
    }
}

// =============================================================================
// Response handling
// =============================================================================

/// Read a response body as text first (for diagnostics), then parse it.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(snippet(&body)));
    }

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %snippet(&body),
            "Backend returned non-success status"
        );
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: snippet(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %snippet(&body),
            "Failed to parse backend response"
        );
        ApiError::Parse(e)
    })
}

/// Truncate a response body for logs and error messages.
fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}
