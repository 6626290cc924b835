//! Unified error handling for the storefront client.
//!
//! Provides a unified `AppError` that every subsystem error converts into,
//! plus the user-facing message mapping. Nothing here is fatal: every error
//! returns control to the caller with an actionable message, and retry is
//! always a user-initiated re-invocation.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::chat::ChatError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Backend API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Checkout flow failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Chat relay failed.
    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),
}

impl AppError {
    /// A message suitable for direct display to the shopper.
    ///
    /// Partial-success checkout failures name the order id, so the user is
    /// never told a created order failed outright. Internal details
    /// (statuses, parse errors) are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) => "The store client is misconfigured.".to_string(),
            Self::Api(err) => api_message(err),
            Self::Checkout(err) => checkout_message(err),
            Self::Auth(AuthError::Api(ApiError::Api { status: 401 | 403, .. })) => {
                "Invalid email or password.".to_string()
            }
            Self::Auth(AuthError::TokenMissing) => {
                "Login succeeded but the session could not be established. Please try again."
                    .to_string()
            }
            Self::Auth(AuthError::Api(err)) => api_message(err),
            Self::Chat(ChatError::EmptyMessage) => "Type a message first.".to_string(),
            Self::Chat(ChatError::Api(_)) => {
                "The assistant is not responding. Please try again.".to_string()
            }
        }
    }

    /// Whether re-invoking the failed operation can reasonably succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::Config(_)
                | Self::Checkout(CheckoutError::EmptyCart)
                | Self::Chat(ChatError::EmptyMessage)
        )
    }
}

fn api_message(err: &ApiError) -> String {
    match err {
        ApiError::Http(_) => "The store backend is not responding. Please try again.".to_string(),
        ApiError::NotFound(_) => "That item could not be found.".to_string(),
        ApiError::Api { .. } | ApiError::Parse(_) | ApiError::InvalidLocation(_) => {
            "The store backend returned an unexpected response.".to_string()
        }
    }
}

fn checkout_message(err: &CheckoutError) -> String {
    match err {
        CheckoutError::EmptyCart => "Your cart is empty.".to_string(),
        CheckoutError::AlreadyInProgress => {
            "A checkout is already in progress. Please wait for it to finish.".to_string()
        }
        CheckoutError::OrderCreation(_) => {
            "Checkout failed before an order was confirmed. Your cart is unchanged; please try again."
                .to_string()
        }
        CheckoutError::InvoiceLocationMissing { order_id } => format!(
            "Order {order_id} was created, but the store did not say where its invoice is. \
             Your cart is unchanged; contact support with this order number."
        ),
        CheckoutError::InvoiceFetch { order_id, .. } => format!(
            "Order {order_id} was created, but the invoice could not be downloaded. \
             Your cart is unchanged; contact support with this order number."
        ),
        CheckoutError::Save { order_id, .. } => format!(
            "Order {order_id} was created, but the invoice could not be saved locally."
        ),
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
