//! End-to-end checkout flow tests against a mock backend.

#![allow(clippy::unwrap_used)]

mod common;

use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fit_supplements_core::OrderId;
use fit_supplements_storefront::checkout::CheckoutError;

const PDF_BYTES: &[u8] = b"%PDF-1.4 test invoice";

fn order_response(order_id: i64, total: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "order_id": order_id,
        "total": total,
        "invoice_url": format!("/api/invoice/{order_id}/"),
    }))
}

fn invoice_response() -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/pdf")
        .set_body_bytes(PDF_BYTES)
}

#[tokio::test]
async fn full_checkout_downloads_invoice_and_empties_cart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    state
        .cart()
        .add(common::product(1, "Whey Protein", Decimal::from(500)));
    state
        .cart()
        .add(common::product(2, "Mass Gainer", Decimal::new(12005, 1)));
    assert_eq!(state.cart().total(), Decimal::new(17005, 1));

    // The payload is exactly one entry per cart line, qty defaulting to 1.
    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .and(body_json(json!({
            "items": [
                {"id": 1, "name": "Whey Protein", "category": "protein", "price": 500.0, "qty": 1},
                {"id": 2, "name": "Mass Gainer", "category": "protein", "price": 1200.5, "qty": 1},
            ]
        })))
        .respond_with(order_response(3, 1700.5))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/invoice/3/"))
        .respond_with(invoice_response())
        .expect(1)
        .mount(&server)
        .await;

    let receipt = state.checkout().checkout().await.expect("checkout succeeds");

    assert_eq!(receipt.order_id, OrderId::new(3));
    assert_eq!(receipt.total, Decimal::new(17005, 1));
    assert_eq!(receipt.invoice_path, dir.path().join("invoice_order_3.pdf"));
    assert_eq!(std::fs::read(&receipt.invoice_path).unwrap(), PDF_BYTES);

    assert!(state.cart().is_empty());
    assert_eq!(state.cart().total(), Decimal::ZERO);
    assert!(!state.checkout().in_flight());
}

#[tokio::test]
async fn empty_cart_checkout_makes_no_network_call() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    let err = state.checkout().checkout().await.unwrap_err();

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(!err.order_created());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_invoice_location_leaves_cart_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    state
        .cart()
        .add(common::product(1, "Creatine", Decimal::from(500)));

    // Order created, but no invoice_url in the response.
    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "order_id": 7,
            "total": 500.0,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = state.checkout().checkout().await.unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::InvoiceLocationMissing { order_id } if order_id == OrderId::new(7)
    ));
    assert!(err.order_created());
    assert_eq!(state.cart().count(), 1);
    assert_eq!(state.cart().total(), Decimal::from(500));
    assert!(!state.checkout().in_flight());
}

#[tokio::test]
async fn invoice_fetch_failure_is_reported_as_partial_success() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    state
        .cart()
        .add(common::product(1, "Creatine", Decimal::from(500)));

    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(order_response(3, 500.0))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/invoice/3/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = state.checkout().checkout().await.unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::InvoiceFetch { order_id, .. } if order_id == OrderId::new(3)
    ));
    assert!(err.order_created());
    assert_eq!(state.cart().count(), 1);
    assert!(!state.checkout().in_flight());
}

#[tokio::test]
async fn second_checkout_is_rejected_while_first_is_in_flight() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    state
        .cart()
        .add(common::product(1, "Whey Protein", Decimal::from(500)));

    // Slow order creation keeps the first checkout in flight; expect(1)
    // verifies the rejected attempt never sent a duplicate order request.
    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(order_response(3, 500.0).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/invoice/3/"))
        .respond_with(invoice_response())
        .expect(1)
        .mount(&server)
        .await;

    let background_state = state.clone();
    let first = tokio::spawn(async move { background_state.checkout().checkout().await });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(state.checkout().in_flight());

    let second = state.checkout().checkout().await;
    assert!(matches!(second, Err(CheckoutError::AlreadyInProgress)));

    let receipt = first.await.unwrap().expect("first checkout succeeds");
    assert_eq!(receipt.order_id, OrderId::new(3));
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn lines_added_during_checkout_survive_the_final_clear() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    state
        .cart()
        .add(common::product(1, "Whey Protein", Decimal::from(500)));

    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(order_response(3, 500.0).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/invoice/3/"))
        .respond_with(invoice_response())
        .mount(&server)
        .await;

    let background_state = state.clone();
    let flow = tokio::spawn(async move { background_state.checkout().checkout().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let late_line = state
        .cart()
        .add(common::product(2, "Creatine", Decimal::from(900)));

    flow.await.unwrap().expect("checkout succeeds");

    // Only the snapshotted line was removed; the mid-flight addition stays.
    let remaining = state.cart().items();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining.first().unwrap().line_id, late_line);
    assert_eq!(state.cart().total(), Decimal::from(900));
}

#[tokio::test]
async fn order_creation_failure_leaves_cart_untouched() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = common::test_state(&server.uri(), dir.path());

    state
        .cart()
        .add(common::product(1, "Whey Protein", Decimal::from(500)));

    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = state.checkout().checkout().await.unwrap_err();

    // No order confirmation was received, so no partial-success messaging.
    assert!(matches!(err, CheckoutError::OrderCreation(_)));
    assert!(!err.order_created());
    assert_eq!(state.cart().count(), 1);
    assert_eq!(state.cart().total(), Decimal::from(500));
    assert!(!state.checkout().in_flight());
}

#[tokio::test]
async fn save_failure_reports_the_created_order_and_keeps_the_cart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    // A plain file where the download directory should be makes the save fail.
    let blocked_dir = dir.path().join("invoices");
    std::fs::write(&blocked_dir, b"in the way").unwrap();
    let state = common::test_state(&server.uri(), &blocked_dir);

    state
        .cart()
        .add(common::product(1, "Whey Protein", Decimal::from(500)));

    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(order_response(3, 500.0))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/invoice/3/"))
        .respond_with(invoice_response())
        .expect(1)
        .mount(&server)
        .await;

    let err = state.checkout().checkout().await.unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Save { order_id, .. } if order_id == OrderId::new(3)
    ));
    assert!(err.order_created());
    assert_eq!(state.cart().count(), 1);
    assert!(!state.checkout().in_flight());
}

#[tokio::test]
async fn base_url_without_trailing_slash_resolves_the_invoice_location() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    // Deliberately no trailing slash on the configured base.
    let state = common::test_state_with_base(&format!("{}/api", server.uri()), dir.path());

    state
        .cart()
        .add(common::product(1, "Whey Protein", Decimal::from(500)));

    Mock::given(method("POST"))
        .and(path("/api/checkout/"))
        .respond_with(order_response(3, 500.0))
        .mount(&server)
        .await;

    // Location "/api/invoice/3/" overlaps the base path; the resolved target
    // must carry a single /api segment.
    Mock::given(method("GET"))
        .and(path("/api/invoice/3/"))
        .respond_with(invoice_response())
        .expect(1)
        .mount(&server)
        .await;

    let receipt = state.checkout().checkout().await.expect("checkout succeeds");
    assert_eq!(receipt.order_id, OrderId::new(3));
}
