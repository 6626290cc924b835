//! FitSupplements storefront client core.
//!
//! An in-process library invoked by UI event handlers: it owns the cart and
//! recommendation state, talks to the store backend over HTTP, and drives the
//! multi-step checkout flow (create order, resolve invoice location, fetch
//! the invoice, save it locally, remove the purchased lines).
//!
//! # Architecture
//!
//! - [`api`] - REST client for the store backend (`reqwest` + `moka` caching)
//! - [`catalog`] - passive holder of the last fetched product list
//! - [`cart`] - ordered cart lines with a derived total
//! - [`recommend`] - goal/diet/budget recommendation query cycle
//! - [`checkout`] - the checkout orchestrator and its error taxonomy
//! - [`services`] - collaborator clients (chat relay, auth login)
//! - [`state`] - cheap-clone application state wiring it all together
//!
//! Routing, rendering, and session persistence belong to the embedding
//! application; nothing here installs a global tracing subscriber or reads
//! durable storage.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod recommend;
pub mod services;
pub mod state;

pub use api::{ApiClient, ApiError};
pub use cart::{CartItem, CartSnapshot, CartStore};
pub use catalog::CatalogCache;
pub use checkout::{CheckoutError, CheckoutOrchestrator, CheckoutPhase, CheckoutReceipt};
pub use config::{ApiConfig, ConfigError, StorefrontConfig};
pub use error::AppError;
pub use recommend::RecommendationClient;
pub use state::AppState;
