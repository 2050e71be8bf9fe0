use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InventoryStatus {
    InStock,
    LowStock,
    OutOfStock,
    Discontinued,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub name: String,
    pub category: Option<String>,
    pub status: InventoryStatus,
    pub quantity: i32,
    pub min_quantity: i32,
    pub max_quantity: Option<i32>,
    pub unit_price: f64,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: i32, min_quantity: i32, unit_price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            organization_id: None,
            name: name.into(),
            category: None,
            status: InventoryStatus::InStock,
            quantity,
            min_quantity,
            max_quantity: None,
            unit_price,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0 || self.status == InventoryStatus::OutOfStock
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity > 0 && self.quantity <= self.min_quantity
    }

    pub fn is_overstocked(&self) -> bool {
        self.max_quantity.is_some_and(|max| self.quantity > max)
    }

    /// Stock value on hand, unrounded. A non-finite unit price values the stock at zero.
    pub fn value(&self) -> f64 {
        if self.unit_price.is_finite() {
            self.quantity as f64 * self.unit_price
        } else {
            0.0
        }
    }
}
