use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Service,
    Retail,
}

impl ItemCategory {
    /// Parse the free-text category column. Unknown strings yield `None`
    /// so the transaction-level service flag decides instead.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "service" | "servicio" | "grooming" => Some(ItemCategory::Service),
            "retail" | "product" | "producto" | "venta" => Some(ItemCategory::Retail),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SaleItem {
    #[schema(example = "Full groom - large breed")]
    pub name: String,
    #[schema(example = 1.0)]
    pub quantity: f64,
    #[schema(example = 45.0)]
    pub unit_price: f64,
    /// Missing category falls back to the transaction-level service flag.
    pub category: Option<ItemCategory>,
}

impl SaleItem {
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// A point-of-sale ticket as synced from the external POS. Read-only for
/// the payroll engine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SalesTransaction {
    #[schema(example = 9001)]
    pub id: u64,
    #[schema(example = "2026-01-05T21:30:00Z", format = "date-time", value_type = String)]
    pub sold_at: DateTime<Utc>,
    #[schema(example = 45.0)]
    pub total_amount: f64,
    /// Transaction-level classification used when line items carry no
    /// category of their own (or the ticket has no line items at all).
    pub is_service: bool,
    pub items: Vec<SaleItem>,
}
