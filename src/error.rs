use crate::domain::cart::{OwnerId, ProductId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CartError>;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("quantity must be a positive integer")]
    InvalidQuantity,
    #[error("product {0} not found or unavailable")]
    ProductNotFound(ProductId),
    #[error(
        "insufficient stock for {product}: requested {requested}, available {available}, already in cart {in_cart}"
    )]
    InsufficientStock {
        product: ProductId,
        requested: u32,
        available: u32,
        in_cart: u32,
    },
    #[error("item {0} not found in cart")]
    ItemNotFound(ProductId),
    #[error("coupon code {0:?} is invalid or expired")]
    InvalidCoupon(String),
    #[error("cart for {0} was modified concurrently")]
    Conflict(OwnerId),
    #[error("malformed command: {0}")]
    MalformedCommand(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
