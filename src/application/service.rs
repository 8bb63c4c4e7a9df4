use crate::domain::cart::{AppliedCoupon, Cart, CartItem, CartTotals, OwnerId, ProductId};
use crate::domain::command::CartCommand;
use crate::domain::ports::{CartRepositoryBox, CatalogLookupBox, CouponLookupBox};
use crate::error::{CartError, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

/// Bounded retries for a mutation that hits a version conflict.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// A cart together with its derived totals, as returned to callers.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct CartView {
    pub owner_id: OwnerId,
    pub items: Vec<CartItem>,
    pub coupon: Option<AppliedCoupon>,
    pub totals: CartTotals,
}

impl CartView {
    fn of(cart: &Cart) -> Self {
        Self {
            owner_id: cart.owner_id.clone(),
            items: cart.items.clone(),
            coupon: cart.coupon.clone(),
            totals: cart.totals(),
        }
    }
}

/// The entry point for all cart operations.
///
/// `CartService` owns the collaborator ports and runs every mutation as an
/// explicit load / pure-transform / save round trip. A save rejected with
/// `Conflict` is retried from a fresh load a bounded number of times.
pub struct CartService {
    catalog: CatalogLookupBox,
    coupons: CouponLookupBox,
    carts: CartRepositoryBox,
}

impl CartService {
    pub fn new(
        catalog: CatalogLookupBox,
        coupons: CouponLookupBox,
        carts: CartRepositoryBox,
    ) -> Self {
        Self {
            catalog,
            coupons,
            carts,
        }
    }

    /// Current cart with computed totals. Unknown owners get an empty cart.
    pub async fn get_cart(&self, owner: &OwnerId) -> Result<CartView> {
        let versioned = self.carts.load(owner).await?;
        Ok(CartView::of(&versioned.cart))
    }

    /// Count of units in the owner's cart.
    pub async fn item_count(&self, owner: &OwnerId) -> Result<u32> {
        let versioned = self.carts.load(owner).await?;
        Ok(versioned.cart.total_items())
    }

    /// Totals only, without the item lines.
    pub async fn summary(&self, owner: &OwnerId) -> Result<CartTotals> {
        let versioned = self.carts.load(owner).await?;
        Ok(versioned.cart.totals())
    }

    pub async fn add_item(
        &self,
        owner: &OwnerId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartView> {
        let product = self
            .catalog
            .get(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

        self.commit(owner, |cart| cart.add_item(&product, quantity))
            .await
    }

    pub async fn update_item(
        &self,
        owner: &OwnerId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartView> {
        let product = self
            .catalog
            .get(product_id)
            .await?
            .ok_or_else(|| CartError::ProductNotFound(product_id.clone()))?;

        self.commit(owner, |cart| cart.update_quantity(&product, quantity))
            .await
    }

    pub async fn remove_item(&self, owner: &OwnerId, product_id: &ProductId) -> Result<CartView> {
        self.commit(owner, |cart| cart.remove_item(product_id)).await
    }

    pub async fn clear(&self, owner: &OwnerId) -> Result<CartView> {
        self.commit(owner, |cart| {
            cart.clear();
            Ok(())
        })
        .await
    }

    pub async fn apply_coupon(&self, owner: &OwnerId, code: &str) -> Result<CartView> {
        let coupon = self
            .coupons
            .get(code)
            .await?
            .filter(|c| !c.is_expired(Utc::now()))
            .ok_or_else(|| CartError::InvalidCoupon(code.to_string()))?;

        self.commit(owner, |cart| {
            cart.apply_coupon(AppliedCoupon::from(&coupon));
            Ok(())
        })
        .await
    }

    pub async fn remove_coupon(&self, owner: &OwnerId) -> Result<CartView> {
        self.commit(owner, |cart| {
            cart.remove_coupon();
            Ok(())
        })
        .await
    }

    /// Dispatches a boundary-validated command to the matching operation.
    pub async fn execute(&self, command: CartCommand) -> Result<CartView> {
        debug!(owner = %command.owner(), ?command, "executing cart command");
        match command {
            CartCommand::AddItem {
                owner,
                product,
                quantity,
            } => self.add_item(&owner, &product, quantity).await,
            CartCommand::UpdateQuantity {
                owner,
                product,
                quantity,
            } => self.update_item(&owner, &product, quantity).await,
            CartCommand::RemoveItem { owner, product } => self.remove_item(&owner, &product).await,
            CartCommand::Clear { owner } => self.clear(&owner).await,
            CartCommand::ApplyCoupon { owner, code } => self.apply_coupon(&owner, &code).await,
            CartCommand::RemoveCoupon { owner } => self.remove_coupon(&owner).await,
        }
    }

    /// Consumes the service and returns every stored cart.
    pub async fn into_carts(self) -> Result<Vec<Cart>> {
        self.carts.all_carts().await
    }

    /// Load / transform / save with bounded retry on version conflicts.
    ///
    /// The transform runs against a freshly loaded cart on every attempt, so
    /// a retried mutation is re-applied on top of the concurrent writer's
    /// state rather than clobbering it.
    async fn commit<F>(&self, owner: &OwnerId, mut transform: F) -> Result<CartView>
    where
        F: FnMut(&mut Cart) -> Result<()>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut versioned = self.carts.load(owner).await?;
            transform(&mut versioned.cart)?;
            let view = CartView::of(&versioned.cart);

            match self.carts.save(versioned).await {
                Ok(()) => return Ok(view),
                Err(CartError::Conflict(_)) if attempt < MAX_SAVE_ATTEMPTS => {
                    debug!(%owner, attempt, "cart save conflicted, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
