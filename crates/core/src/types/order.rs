//! Checkout and order wire types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{OrderId, ProductId};

/// One entry of the checkout payload, derived from a cart line.
///
/// Constructed fresh at checkout time and frozen for the duration of the
/// flow; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(with = "crate::types::price")]
    pub price: Decimal,
    pub qty: u32,
}

/// The backend's response to a successful order creation.
///
/// `invoice_location` may be absolute or relative to the API base, and is
/// optional at the serde layer so its absence is a typed condition rather
/// than a parse failure - the order may exist server-side even when the
/// client cannot retrieve an invoice for it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    #[serde(with = "crate::types::price")]
    pub total: Decimal,
    #[serde(default, rename = "invoice_url")]
    pub invoice_location: Option<String>,
}
