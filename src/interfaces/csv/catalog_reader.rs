use crate::domain::cart::ProductId;
use crate::domain::catalog::{Coupon, CouponKind, Product};
use crate::error::{CartError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Clone)]
struct ProductRecord {
    product: String,
    price: Decimal,
    stock: u32,
    active: bool,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: ProductId::new(record.product),
            price: record.price,
            stock: record.stock,
            is_active: record.active,
        }
    }
}

/// Reads the product catalog from a CSV source: `product,price,stock,active`.
pub struct CatalogReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CatalogReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize::<ProductRecord>()
            .map(|result| result.map(Product::from).map_err(CartError::from))
    }
}

#[derive(Debug, Deserialize, PartialEq, Clone)]
struct CouponRecord {
    code: String,
    kind: CouponKind,
    value: Decimal,
    expires: Option<DateTime<Utc>>,
}

impl From<CouponRecord> for Coupon {
    fn from(record: CouponRecord) -> Self {
        Self {
            code: record.code,
            kind: record.kind,
            value: record.value,
            expires_at: record.expires,
        }
    }
}

/// Reads coupon definitions from a CSV source: `code,kind,value,expires`.
///
/// `expires` is an optional RFC 3339 timestamp; an empty field means the
/// coupon never expires.
pub struct CouponReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CouponReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn coupons(self) -> impl Iterator<Item = Result<Coupon>> {
        self.reader
            .into_deserialize::<CouponRecord>()
            .map(|result| result.map(Coupon::from).map_err(CartError::from))
    }
}
