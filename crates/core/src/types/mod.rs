//! Core types for the FitSupplements storefront client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod quiz;

pub use id::*;
pub use order::{CheckoutLine, OrderConfirmation};
pub use product::Product;
pub use quiz::{Budget, Diet, Goal, ParseQuizValueError, RecommendationQuery};
