use crate::domain::catalog::{Coupon, CouponKind, Product};
use crate::error::{CartError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a catalog entry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a cart owner. One cart per owner.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of a cart.
///
/// `unit_price` is the catalog price captured when the item was first added.
/// It does not track later catalog changes; only `quantity` mutates.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// Discount rule captured when a coupon was applied.
///
/// Snapshotting the rule (not just the code) keeps [`Cart::totals`] a pure
/// function of the cart value, with no lookup at read time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct AppliedCoupon {
    pub code: String,
    pub kind: CouponKind,
    pub value: Decimal,
}

impl From<&Coupon> for AppliedCoupon {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            kind: coupon.kind,
            value: coupon.value,
        }
    }
}

/// Derived cart totals. Never stored; recomputed on every read.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub total_items: u32,
}

/// The per-owner shopping cart.
///
/// Items are kept in insertion order and are unique by product id; adding an
/// existing product merges quantities. All mutations are pure in-memory
/// transformations; persistence belongs to the caller.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Cart {
    pub owner_id: OwnerId,
    pub items: Vec<CartItem>,
    pub coupon: Option<AppliedCoupon>,
}

impl Cart {
    pub fn new(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            items: Vec::new(),
            coupon: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    ///
    /// The merged quantity must not exceed the product's available stock.
    /// On a new line the unit price is snapshotted from the catalog entry.
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        match self.position(&product.id) {
            Some(index) => {
                let in_cart = self.items[index].quantity;
                // u64 math so the merged quantity cannot overflow
                if u64::from(in_cart) + u64::from(quantity) > u64::from(product.stock) {
                    return Err(CartError::InsufficientStock {
                        product: product.id.clone(),
                        requested: quantity,
                        available: product.stock,
                        in_cart,
                    });
                }
                self.items[index].quantity = in_cart + quantity;
            }
            None => {
                if quantity > product.stock {
                    return Err(CartError::InsufficientStock {
                        product: product.id.clone(),
                        requested: quantity,
                        available: product.stock,
                        in_cart: 0,
                    });
                }
                self.items.push(CartItem {
                    product_id: product.id.clone(),
                    quantity,
                    unit_price: product.price,
                });
            }
        }

        Ok(())
    }

    /// Sets the quantity of an existing line. Zero removes the line.
    pub fn update_quantity(&mut self, product: &Product, quantity: u32) -> Result<()> {
        let index = self
            .position(&product.id)
            .ok_or_else(|| CartError::ItemNotFound(product.id.clone()))?;

        if quantity == 0 {
            self.items.remove(index);
            return Ok(());
        }

        if quantity > product.stock {
            return Err(CartError::InsufficientStock {
                product: product.id.clone(),
                requested: quantity,
                available: product.stock,
                in_cart: self.items[index].quantity,
            });
        }

        self.items[index].quantity = quantity;
        Ok(())
    }

    /// Removes a line unconditionally. No stock check applies.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Result<()> {
        let index = self
            .position(product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;
        self.items.remove(index);
        Ok(())
    }

    /// Empties the cart and drops any applied coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
    }

    /// Applies a coupon, replacing any prior one.
    pub fn apply_coupon(&mut self, coupon: AppliedCoupon) {
        self.coupon = Some(coupon);
    }

    /// Idempotent; succeeds even when no coupon is applied.
    pub fn remove_coupon(&mut self) {
        self.coupon = None;
    }

    /// Count of units across all lines, not of distinct products.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Computes derived totals.
    ///
    /// The subtotal is rounded half-up to 2 decimal places once, at the final
    /// sum, so per-line rounding error cannot compound. The discount is
    /// clamped to the subtotal; the total is never negative.
    pub fn totals(&self) -> CartTotals {
        let raw: Decimal = self
            .items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
        let subtotal = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        let discount = match &self.coupon {
            None => Decimal::ZERO,
            Some(coupon) => match coupon.kind {
                CouponKind::Percentage => (subtotal * coupon.value / Decimal::ONE_HUNDRED)
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
                CouponKind::Fixed => coupon.value,
            },
        };
        let discount = discount.min(subtotal).max(Decimal::ZERO);

        CartTotals {
            subtotal,
            discount,
            total: subtotal - discount,
            total_items: self.total_items(),
        }
    }
}
