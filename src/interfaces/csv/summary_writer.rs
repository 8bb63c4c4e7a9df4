use crate::domain::cart::{Cart, OwnerId};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    owner: &'a OwnerId,
    total_items: u32,
    subtotal: Decimal,
    discount: Decimal,
    total: Decimal,
}

/// Writes per-owner cart summaries as CSV:
/// `owner,total_items,subtotal,discount,total`.
///
/// Rows are sorted by owner so the output is deterministic regardless of
/// repository iteration order.
pub struct SummaryWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SummaryWriter<W> {
    pub fn new(dest: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(dest),
        }
    }

    pub fn write_carts(&mut self, mut carts: Vec<Cart>) -> Result<()> {
        carts.sort_by(|a, b| a.owner_id.cmp(&b.owner_id));

        for cart in &carts {
            let totals = cart.totals();
            self.writer.serialize(SummaryRow {
                owner: &cart.owner_id,
                total_items: totals.total_items,
                subtotal: totals.subtotal,
                discount: totals.discount,
                total: totals.total,
            })?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
