use chrono::{Duration, Utc};
use quickcart::application::service::CartService;
use quickcart::domain::cart::{OwnerId, ProductId};
use quickcart::domain::catalog::{Coupon, CouponKind, Product};
use quickcart::error::CartError;
use quickcart::infrastructure::in_memory::{
    InMemoryCartRepository, InMemoryCatalog, InMemoryCoupons,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn coupon(code: &str, kind: CouponKind, value: Decimal) -> Coupon {
    Coupon {
        code: code.to_string(),
        kind,
        value,
        expires_at: None,
    }
}

fn service(coupons: Vec<Coupon>) -> CartService {
    CartService::new(
        Box::new(InMemoryCatalog::with_products(vec![Product {
            id: ProductId::new("P1"),
            price: dec!(50.00),
            stock: 100,
            is_active: true,
        }])),
        Box::new(InMemoryCoupons::with_coupons(coupons)),
        Box::new(InMemoryCartRepository::new()),
    )
}

#[tokio::test]
async fn test_percentage_coupon() {
    let service = service(vec![coupon("SAVE10", CouponKind::Percentage, dec!(10))]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 2).await.unwrap();
    let view = service.apply_coupon(&owner, "SAVE10").await.unwrap();

    assert_eq!(view.totals.subtotal, dec!(100.00));
    assert_eq!(view.totals.discount, dec!(10.00));
    assert_eq!(view.totals.total, dec!(90.00));
}

#[tokio::test]
async fn test_fixed_coupon_never_drives_total_negative() {
    let service = service(vec![coupon("BIGOFF", CouponKind::Fixed, dec!(500.00))]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 1).await.unwrap();
    let view = service.apply_coupon(&owner, "BIGOFF").await.unwrap();

    assert_eq!(view.totals.discount, dec!(50.00));
    assert_eq!(view.totals.total, dec!(0.00));
}

#[tokio::test]
async fn test_expired_coupon_is_rejected() {
    let expired = Coupon {
        code: "OLD".to_string(),
        kind: CouponKind::Percentage,
        value: dec!(50),
        expires_at: Some(Utc::now() - Duration::days(1)),
    };
    let service = service(vec![expired]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 1).await.unwrap();
    let result = service.apply_coupon(&owner, "OLD").await;

    assert!(matches!(result, Err(CartError::InvalidCoupon(_))));
    assert!(service.get_cart(&owner).await.unwrap().coupon.is_none());
}

#[tokio::test]
async fn test_coupon_with_future_expiry_is_accepted() {
    let fresh = Coupon {
        code: "NEW".to_string(),
        kind: CouponKind::Percentage,
        value: dec!(10),
        expires_at: Some(Utc::now() + Duration::days(30)),
    };
    let service = service(vec![fresh]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 1).await.unwrap();
    let view = service.apply_coupon(&owner, "NEW").await.unwrap();

    assert_eq!(view.totals.discount, dec!(5.00));
}

#[tokio::test]
async fn test_second_coupon_replaces_first() {
    let service = service(vec![
        coupon("SAVE10", CouponKind::Percentage, dec!(10)),
        coupon("SAVE20", CouponKind::Percentage, dec!(20)),
    ]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 2).await.unwrap();
    service.apply_coupon(&owner, "SAVE10").await.unwrap();
    let view = service.apply_coupon(&owner, "SAVE20").await.unwrap();

    assert_eq!(view.coupon.as_ref().unwrap().code, "SAVE20");
    assert_eq!(view.totals.discount, dec!(20.00));
}

#[tokio::test]
async fn test_apply_then_remove_restores_pre_coupon_total() {
    let service = service(vec![coupon("SAVE10", CouponKind::Percentage, dec!(10))]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 2).await.unwrap();
    let before = service.summary(&owner).await.unwrap();

    service.apply_coupon(&owner, "SAVE10").await.unwrap();
    let view = service.remove_coupon(&owner).await.unwrap();

    assert_eq!(view.totals.total, before.subtotal);
    assert_eq!(view.totals.discount, dec!(0));
}

#[tokio::test]
async fn test_remove_coupon_is_idempotent() {
    let service = service(vec![]);
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 1).await.unwrap();

    // No coupon applied; removal still succeeds
    let view = service.remove_coupon(&owner).await.unwrap();
    assert!(view.coupon.is_none());
}

#[tokio::test]
async fn test_coupon_rule_is_snapshotted_at_apply_time() {
    let coupons = InMemoryCoupons::with_coupons(vec![coupon(
        "SAVE10",
        CouponKind::Percentage,
        dec!(10),
    )]);
    let service = CartService::new(
        Box::new(InMemoryCatalog::with_products(vec![Product {
            id: ProductId::new("P1"),
            price: dec!(50.00),
            stock: 100,
            is_active: true,
        }])),
        Box::new(coupons),
        Box::new(InMemoryCartRepository::new()),
    );
    let owner = OwnerId::new("alice");

    service.add_item(&owner, &ProductId::new("P1"), 2).await.unwrap();
    service.apply_coupon(&owner, "SAVE10").await.unwrap();

    // Totals come from the snapshot, no lookup on read
    let view = service.get_cart(&owner).await.unwrap();
    assert_eq!(view.totals.discount, dec!(10.00));
}
