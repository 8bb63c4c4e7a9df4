use crate::domain::cart::ProductId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of a catalog entry at lookup time.
///
/// The cart engine never mutates the catalog; it only checks availability
/// and copies the price into the cart when an item is added.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: ProductId,
    pub price: Decimal,
    pub stock: u32,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CouponKind {
    Percentage,
    Fixed,
}

/// A named discount rule from the coupon catalog.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Coupon {
    pub code: String,
    pub kind: CouponKind,
    pub value: Decimal,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Coupon {
    /// A coupon with no expiry never expires.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}
