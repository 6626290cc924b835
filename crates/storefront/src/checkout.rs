//! The checkout orchestrator.
//!
//! Drives the multi-step flow: snapshot the cart, create the order, resolve
//! the invoice location, fetch the invoice bytes, save them locally, then
//! remove the purchased lines from the cart. Each step has a distinct
//! failure mode, and from order creation onward every failure still tells
//! the caller that the order exists.
//!
//! At most one checkout may be in flight at a time; re-entrant invocations
//! are rejected without touching the network.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use fit_supplements_core::OrderId;

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;

/// Where an in-flight checkout currently is.
///
/// The terminal states of the flow (completed, failed) are momentary: the
/// machine always returns to `Idle` when the flow ends, whatever the
/// outcome, so `Idle` is the only state in which a new checkout is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    #[default]
    Idle,
    Submitting,
    ResolvingInvoice,
    FetchingArtifact,
    Saving,
}

/// Errors surfaced by the checkout flow.
///
/// Variants carrying an `order_id` mean the order was already created
/// server-side; the user-facing message must say so rather than present the
/// failure as total.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Rejected synchronously: nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Rejected synchronously: another checkout is between submission and save.
    #[error("a checkout is already in progress")]
    AlreadyInProgress,

    /// Order creation failed; no order confirmation was received.
    #[error("order creation failed: {0}")]
    OrderCreation(#[source] ApiError),

    /// The order exists but the response carried no usable invoice location.
    #[error("order {order_id} was created but no invoice location was returned")]
    InvoiceLocationMissing { order_id: OrderId },

    /// The order exists but the invoice could not be retrieved.
    #[error("order {order_id} was created but the invoice could not be fetched: {source}")]
    InvoiceFetch {
        order_id: OrderId,
        #[source]
        source: ApiError,
    },

    /// The order exists and the invoice was fetched, but saving it failed.
    #[error("order {order_id} was created but the invoice could not be saved: {source}")]
    Save {
        order_id: OrderId,
        #[source]
        source: std::io::Error,
    },
}

impl CheckoutError {
    /// The id of the order that was created before the flow failed, if any.
    #[must_use]
    pub const fn order_id(&self) -> Option<OrderId> {
        match self {
            Self::EmptyCart | Self::AlreadyInProgress | Self::OrderCreation(_) => None,
            Self::InvoiceLocationMissing { order_id }
            | Self::InvoiceFetch { order_id, .. }
            | Self::Save { order_id, .. } => Some(*order_id),
        }
    }

    /// Whether a server-side order exists despite the failure.
    #[must_use]
    pub const fn order_created(&self) -> bool {
        self.order_id().is_some()
    }
}

/// The outcome of a fully successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub total: Decimal,
    /// Where the invoice was saved.
    pub invoice_path: PathBuf,
}

// =============================================================================
// CheckoutOrchestrator
// =============================================================================

/// Sequences order creation through invoice retrieval and cart cleanup.
#[derive(Clone)]
pub struct CheckoutOrchestrator {
    inner: Arc<OrchestratorInner>,
}

struct OrchestratorInner {
    api: ApiClient,
    cart: CartStore,
    download_dir: PathBuf,
    phase: Mutex<CheckoutPhase>,
}

impl CheckoutOrchestrator {
    /// Create an orchestrator over a cart and an API client.
    ///
    /// `download_dir` is created on first save if it does not exist.
    pub fn new(api: ApiClient, cart: CartStore, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(OrchestratorInner {
                api,
                cart,
                download_dir: download_dir.into(),
                phase: Mutex::new(CheckoutPhase::Idle),
            }),
        }
    }

    /// The current phase of the machine.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        *self
            .inner
            .phase
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a checkout is currently between submission and save.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.phase() != CheckoutPhase::Idle
    }

    /// Run the full checkout flow.
    ///
    /// The cart snapshot is taken synchronously at flow start: lines added
    /// or removed afterwards do not affect the in-flight payload, and a
    /// successful flow removes only the snapshotted lines, so anything the
    /// user adds mid-flight survives.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`]; on any failure the cart is untouched and
    /// the machine is back in `Idle`.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<CheckoutReceipt, CheckoutError> {
        let snapshot = self.inner.cart.snapshot();
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // Guard rejects re-entry and restores Idle on every exit path.
        let guard = PhaseGuard::acquire(&self.inner.phase)?;

        let order = self
            .inner
            .api
            .create_order(&snapshot.lines)
            .await
            .map_err(CheckoutError::OrderCreation)?;
        let order_id = order.order_id;

        guard.set(CheckoutPhase::ResolvingInvoice);
        let location = order
            .invoice_location
            .as_deref()
            .map(str::trim)
            .filter(|loc| !loc.is_empty())
            .ok_or(CheckoutError::InvoiceLocationMissing { order_id })?;
        let invoice_url = self
            .inner
            .api
            .invoice_url(location)
            .map_err(|source| CheckoutError::InvoiceFetch { order_id, source })?;

        guard.set(CheckoutPhase::FetchingArtifact);
        let bytes = self
            .inner
            .api
            .fetch_invoice(invoice_url)
            .await
            .map_err(|source| CheckoutError::InvoiceFetch { order_id, source })?;

        guard.set(CheckoutPhase::Saving);
        let invoice_path = self.save_invoice(order_id, &bytes).await?;

        // The single point where this component mutates the live cart, and
        // only after the invoice is safely on disk.
        self.inner.cart.remove_lines(&snapshot.line_ids);

        tracing::info!(
            %order_id,
            total = %order.total,
            path = %invoice_path.display(),
            "Checkout completed"
        );

        Ok(CheckoutReceipt {
            order_id,
            total: order.total,
            invoice_path,
        })
    }

    /// Materialize the invoice bytes as `invoice_order_{id}.pdf`.
    async fn save_invoice(&self, order_id: OrderId, bytes: &[u8]) -> Result<PathBuf, CheckoutError> {
        let dir = &self.inner.download_dir;
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|source| CheckoutError::Save { order_id, source })?;

        let path = dir.join(format!("invoice_order_{order_id}.pdf"));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| CheckoutError::Save { order_id, source })?;

        Ok(path)
    }
}

/// RAII phase cell: acquired only from `Idle`, resets to `Idle` on drop.
struct PhaseGuard<'a> {
    phase: &'a Mutex<CheckoutPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn acquire(phase: &'a Mutex<CheckoutPhase>) -> Result<Self, CheckoutError> {
        let mut current = phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != CheckoutPhase::Idle {
            return Err(CheckoutError::AlreadyInProgress);
        }
        *current = CheckoutPhase::Submitting;
        drop(current);
        Ok(Self { phase })
    }

    fn set(&self, next: CheckoutPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = CheckoutPhase::Idle;
    }
}
