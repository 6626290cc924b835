//! Catalog product as supplied by the backend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// A catalog product.
///
/// Immutable from the client's perspective; the backend owns the catalog.
/// The dietary and goal flags drive recommendation display and use the
/// backend's camelCase field names on the wire (snake_case accepted as an
/// alias for older backend revisions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Free-form category tag (e.g. "protein", "pre_workout").
    #[serde(default)]
    pub category: String,
    #[serde(with = "crate::types::price")]
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default, rename = "lactoseFree", alias = "lactose_free")]
    pub lactose_free: bool,
    #[serde(default, rename = "goalMuscleGain", alias = "goal_muscle_gain")]
    pub goal_muscle_gain: bool,
    #[serde(default, rename = "goalFatLoss", alias = "goal_fat_loss")]
    pub goal_fat_loss: bool,
    #[serde(default, rename = "goalStrength", alias = "goal_strength")]
    pub goal_strength: bool,
    /// Optional image reference (URL or backend media path).
    #[serde(default)]
    pub image: Option<String>,
}
