use super::cart::{Cart, OwnerId, ProductId};
use super::catalog::{Coupon, Product};
use crate::error::Result;
use async_trait::async_trait;

/// A cart paired with the repository version it was loaded at.
///
/// `save` only succeeds when the stored version still matches, so concurrent
/// writers to the same owner's cart cannot silently overwrite each other.
#[derive(Debug, PartialEq, Clone)]
pub struct VersionedCart {
    pub cart: Cart,
    pub version: u64,
}

impl VersionedCart {
    /// An empty cart that has never been saved.
    pub fn empty(owner: OwnerId) -> Self {
        Self {
            cart: Cart::new(owner),
            version: 0,
        }
    }
}

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>>;
}

#[async_trait]
pub trait CouponLookup: Send + Sync {
    async fn get(&self, code: &str) -> Result<Option<Coupon>>;
}

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Loads the owner's cart, or an empty cart at version 0 if none exists.
    async fn load(&self, owner: &OwnerId) -> Result<VersionedCart>;

    /// Compare-and-swap save. Fails with [`crate::error::CartError::Conflict`]
    /// when the stored version no longer matches `cart.version`.
    async fn save(&self, cart: VersionedCart) -> Result<()>;

    /// All carts currently stored, in unspecified order.
    async fn all_carts(&self) -> Result<Vec<Cart>>;
}

pub type CatalogLookupBox = Box<dyn CatalogLookup>;
pub type CouponLookupBox = Box<dyn CouponLookup>;
pub type CartRepositoryBox = Box<dyn CartRepository>;
