//! FitSupplements Core - Shared types library.
//!
//! This crate provides the common types used by the storefront client:
//! products, cart/checkout wire types, and the recommendation quiz values.
//!
//! # Architecture
//!
//! The core crate contains only types and (de)serialization helpers - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere, including from UI code that never touches the network.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, decimal price helpers, product and order types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
