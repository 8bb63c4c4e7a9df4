use crate::domain::cart::{Cart, OwnerId, ProductId};
use crate::domain::catalog::{Coupon, Product};
use crate::domain::ports::{CartRepository, CatalogLookup, CouponLookup, VersionedCart};
use crate::error::{CartError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory product catalog.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access. Ideal for
/// tests and for the CLI, which loads the catalog from a CSV file up front.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>();
        Self {
            products: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn insert(&self, product: Product) {
        let mut products = self.products.write().await;
        products.insert(product.id.clone(), product);
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(product_id).cloned())
    }
}

/// A thread-safe in-memory coupon catalog.
#[derive(Default, Clone)]
pub struct InMemoryCoupons {
    coupons: Arc<RwLock<HashMap<String, Coupon>>>,
}

impl InMemoryCoupons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coupons(coupons: impl IntoIterator<Item = Coupon>) -> Self {
        let map = coupons
            .into_iter()
            .map(|c| (c.code.clone(), c))
            .collect::<HashMap<_, _>>();
        Self {
            coupons: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl CouponLookup for InMemoryCoupons {
    async fn get(&self, code: &str) -> Result<Option<Coupon>> {
        let coupons = self.coupons.read().await;
        Ok(coupons.get(code).cloned())
    }
}

/// A thread-safe in-memory cart repository with versioned writes.
///
/// Each stored cart carries a version counter. `save` compares the caller's
/// version against the stored one under the write lock and rejects stale
/// writes with `Conflict`, so two concurrent mutations of the same owner's
/// cart cannot lose updates.
#[derive(Default, Clone)]
pub struct InMemoryCartRepository {
    carts: Arc<RwLock<HashMap<OwnerId, (u64, Cart)>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn load(&self, owner: &OwnerId) -> Result<VersionedCart> {
        let carts = self.carts.read().await;
        Ok(match carts.get(owner) {
            Some((version, cart)) => VersionedCart {
                cart: cart.clone(),
                version: *version,
            },
            None => VersionedCart::empty(owner.clone()),
        })
    }

    async fn save(&self, versioned: VersionedCart) -> Result<()> {
        let mut carts = self.carts.write().await;
        let owner = versioned.cart.owner_id.clone();
        let current = carts.get(&owner).map(|(version, _)| *version).unwrap_or(0);

        if current != versioned.version {
            return Err(CartError::Conflict(owner));
        }

        carts.insert(owner, (versioned.version + 1, versioned.cart));
        Ok(())
    }

    async fn all_carts(&self) -> Result<Vec<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts.values().map(|(_, cart)| cart.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_catalog_lookup() {
        let catalog = InMemoryCatalog::new();
        let product = Product {
            id: ProductId::new("P1"),
            price: dec!(29.99),
            stock: 100,
            is_active: true,
        };
        catalog.insert(product.clone()).await;

        let found = catalog.get(&ProductId::new("P1")).await.unwrap();
        assert_eq!(found, Some(product));

        assert!(catalog.get(&ProductId::new("P2")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_coupon_lookup() {
        let coupons = InMemoryCoupons::with_coupons([Coupon {
            code: "SAVE10".to_string(),
            kind: crate::domain::catalog::CouponKind::Percentage,
            value: dec!(10),
            expires_at: None,
        }]);

        assert!(coupons.get("SAVE10").await.unwrap().is_some());
        assert!(coupons.get("NOPE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_unknown_owner_yields_empty_cart_at_version_zero() {
        let repo = InMemoryCartRepository::new();
        let loaded = repo.load(&OwnerId::new("alice")).await.unwrap();

        assert!(loaded.cart.is_empty());
        assert_eq!(loaded.version, 0);
    }

    #[tokio::test]
    async fn test_save_bumps_version() {
        let repo = InMemoryCartRepository::new();
        let owner = OwnerId::new("alice");

        let first = repo.load(&owner).await.unwrap();
        repo.save(first).await.unwrap();

        let reloaded = repo.load(&owner).await.unwrap();
        assert_eq!(reloaded.version, 1);
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let repo = InMemoryCartRepository::new();
        let owner = OwnerId::new("alice");

        let first = repo.load(&owner).await.unwrap();
        let stale = repo.load(&owner).await.unwrap();

        repo.save(first).await.unwrap();
        let result = repo.save(stale).await;

        assert!(matches!(result, Err(CartError::Conflict(_))));
    }
}
