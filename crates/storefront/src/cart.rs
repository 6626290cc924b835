//! The cart store: ordered lines with a derived total.
//!
//! Line identity is per-addition, not per-product: adding the same product
//! twice yields two independent lines. Ids come from a monotonic counter, so
//! two adds in the same instant can never collide, and an id is never reused
//! within the store's lifetime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;

use fit_supplements_core::{CartLineId, CheckoutLine, Product};

/// One line of the cart: a product snapshot plus its line identity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub line_id: CartLineId,
    pub product: Product,
    pub qty: u32,
}

impl From<&CartItem> for CheckoutLine {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.product.id,
            name: item.product.name.clone(),
            category: item.product.category.clone(),
            price: item.product.price,
            qty: item.qty,
        }
    }
}

/// A frozen view of the cart taken at checkout start.
///
/// `lines` is the payload sent to the backend; `line_ids` names exactly the
/// cart lines it was built from, so a successful checkout can remove those
/// lines and no others.
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub line_ids: Vec<CartLineId>,
    pub lines: Vec<CheckoutLine>,
}

impl CartSnapshot {
    /// Whether the snapshot captured an empty cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// The owning container of the shopper's pending selections.
///
/// Cheaply cloneable; all clones share the same underlying cart. Mutations
/// are synchronous and totally ordered with respect to each other. The total
/// is always recomputed from the current lines, never stored.
#[derive(Clone, Default)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    items: RwLock<Vec<CartItem>>,
    next_line_id: AtomicU64,
}

impl Default for CartStoreInner {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
            next_line_id: AtomicU64::new(1),
        }
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<CartItem>> {
        self.inner
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<CartItem>> {
        self.inner
            .items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a product to the cart and return the new line's id.
    ///
    /// Never fails: no capacity limit, no deduplication.
    pub fn add(&self, product: Product) -> CartLineId {
        let line_id = CartLineId::new(self.inner.next_line_id.fetch_add(1, Ordering::Relaxed));
        self.write().push(CartItem {
            line_id,
            product,
            qty: 1,
        });
        line_id
    }

    /// Remove the line with the given id.
    ///
    /// A no-op, not an error, if the id is absent - the user may click
    /// remove twice before the display refreshes.
    pub fn remove(&self, line_id: CartLineId) {
        self.write().retain(|item| item.line_id != line_id);
    }

    /// Remove exactly the named lines; absent ids are ignored.
    pub fn remove_lines(&self, line_ids: &[CartLineId]) {
        self.write()
            .retain(|item| !line_ids.contains(&item.line_id));
    }

    /// Empty the cart atomically.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Sum of prices over all current lines, computed fresh on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.read()
            .iter()
            .map(|item| item.product.price * Decimal::from(item.qty))
            .sum()
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Ordered copy of the current lines (insertion order = display order).
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.read().clone()
    }

    /// Take a frozen snapshot of the cart for a checkout flow.
    ///
    /// Payload and line ids are captured under a single lock, so they always
    /// describe the same set of lines.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let items = self.read();
        CartSnapshot {
            line_ids: items.iter().map(|item| item.line_id).collect(),
            lines: items.iter().map(CheckoutLine::from).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use fit_supplements_core::ProductId;

    fn product(id: i64, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            category: "protein".to_string(),
            price,
            description: String::new(),
            vegan: false,
            lactose_free: false,
            goal_muscle_gain: false,
            goal_fat_loss: false,
            goal_strength: false,
            image: None,
        }
    }

    #[test]
    fn test_add_increments_count_and_mints_fresh_ids() {
        let cart = CartStore::new();
        let mut seen = Vec::new();

        for i in 0..100 {
            assert_eq!(cart.count(), i);
            let id = cart.add(product(1, Decimal::from(10)));
            assert_eq!(cart.count(), i + 1);
            assert!(!seen.contains(&id), "line id {id} was reused");
            seen.push(id);
        }
    }

    #[test]
    fn test_same_product_twice_yields_independent_lines() {
        let cart = CartStore::new();
        let first = cart.add(product(1, Decimal::from(500)));
        let second = cart.add(product(1, Decimal::from(500)));

        assert_ne!(first, second);
        assert_eq!(cart.count(), 2);

        cart.remove(first);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.items().first().unwrap().line_id, second);
    }

    #[test]
    fn test_remove_absent_id_is_a_noop() {
        let cart = CartStore::new();
        cart.add(product(1, Decimal::from(500)));
        let before = cart.items();

        cart.remove(CartLineId::new(9999));

        assert_eq!(cart.items(), before);
        assert_eq!(cart.total(), Decimal::from(500));
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let cart = CartStore::new();
        let first = cart.add(product(1, Decimal::from(10)));
        cart.remove(first);

        let second = cart.add(product(1, Decimal::from(10)));
        assert_ne!(first, second);
    }

    #[test]
    fn test_total_is_sum_of_prices() {
        let cart = CartStore::new();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.add(product(1, Decimal::from(500)));
        let line = cart.add(product(2, Decimal::new(12005, 1))); // 1200.5
        assert_eq!(cart.total(), Decimal::new(17005, 1)); // 1700.5

        cart.remove(line);
        assert_eq!(cart.total(), Decimal::from(500));

        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_snapshot_payload_shape() {
        let cart = CartStore::new();
        cart.add(product(1, Decimal::from(500)));
        cart.add(product(2, Decimal::new(120050, 2)));

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.line_ids.len(), 2);
        assert_eq!(snapshot.lines.len(), 2);

        let first = snapshot.lines.first().unwrap();
        assert_eq!(first.id, ProductId::new(1));
        assert_eq!(first.category, "protein");
        assert_eq!(first.price, Decimal::from(500));
        assert_eq!(first.qty, 1);
    }

    #[test]
    fn test_snapshot_is_frozen_against_later_mutation() {
        let cart = CartStore::new();
        cart.add(product(1, Decimal::from(500)));

        let snapshot = cart.snapshot();
        cart.add(product(2, Decimal::from(900)));
        cart.clear();

        assert_eq!(snapshot.lines.len(), 1);
        assert_eq!(snapshot.lines.first().unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_remove_lines_leaves_other_lines() {
        let cart = CartStore::new();
        let a = cart.add(product(1, Decimal::from(100)));
        let b = cart.add(product(2, Decimal::from(200)));
        let c = cart.add(product(3, Decimal::from(300)));

        cart.remove_lines(&[a, c, CartLineId::new(424_242)]);

        let remaining = cart.items();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.first().unwrap().line_id, b);
        assert_eq!(cart.total(), Decimal::from(200));
    }
}
