//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use rust_decimal::Decimal;
use url::Url;

use fit_supplements_core::{Product, ProductId};
use fit_supplements_storefront::config::{ApiConfig, StorefrontConfig};
use fit_supplements_storefront::state::AppState;

/// Build an `AppState` pointed at a mock backend under `<server_uri>/api/`.
pub fn test_state(server_uri: &str, download_dir: &Path) -> AppState {
    test_state_with_base(&format!("{server_uri}/api/"), download_dir)
}

/// Build an `AppState` with an explicit API base URL.
pub fn test_state_with_base(base_url: &str, download_dir: &Path) -> AppState {
    let base = Url::parse(base_url).expect("valid test base url");
    let config = StorefrontConfig {
        api: ApiConfig::new(base, Duration::from_secs(5)).expect("valid test api config"),
        download_dir: download_dir.to_path_buf(),
    };
    AppState::new(config).expect("client builds")
}

/// A minimal catalog product for cart and checkout tests.
pub fn product(id: i64, name: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
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
