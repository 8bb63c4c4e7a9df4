use crate::domain::cart::{OwnerId, ProductId};
use crate::domain::command::CartCommand;
use crate::error::{CartError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum Op {
    Add,
    Update,
    Remove,
    Clear,
    ApplyCoupon,
    RemoveCoupon,
}

/// The raw CSV shape: `op,owner,product,quantity,code`.
///
/// Field presence depends on the op, so everything past `owner` is optional
/// here and checked during conversion into the typed [`CartCommand`].
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct CommandRecord {
    pub op: Op,
    pub owner: String,
    pub product: Option<String>,
    pub quantity: Option<u32>,
    pub code: Option<String>,
}

impl TryFrom<CommandRecord> for CartCommand {
    type Error = CartError;

    fn try_from(record: CommandRecord) -> Result<CartCommand> {
        let owner = OwnerId::new(record.owner);
        let product = record.product.map(ProductId::new);

        match record.op {
            Op::Add => Ok(CartCommand::AddItem {
                owner,
                product: product
                    .ok_or_else(|| CartError::MalformedCommand("add requires a product".into()))?,
                quantity: record.quantity.ok_or_else(|| {
                    CartError::MalformedCommand("add requires a quantity".into())
                })?,
            }),
            Op::Update => Ok(CartCommand::UpdateQuantity {
                owner,
                product: product.ok_or_else(|| {
                    CartError::MalformedCommand("update requires a product".into())
                })?,
                quantity: record.quantity.ok_or_else(|| {
                    CartError::MalformedCommand("update requires a quantity".into())
                })?,
            }),
            Op::Remove => Ok(CartCommand::RemoveItem {
                owner,
                product: product.ok_or_else(|| {
                    CartError::MalformedCommand("remove requires a product".into())
                })?,
            }),
            Op::Clear => Ok(CartCommand::Clear { owner }),
            Op::ApplyCoupon => Ok(CartCommand::ApplyCoupon {
                owner,
                code: record.code.ok_or_else(|| {
                    CartError::MalformedCommand("apply-coupon requires a code".into())
                })?,
            }),
            Op::RemoveCoupon => Ok(CartCommand::RemoveCoupon { owner }),
        }
    }
}

/// Reads cart commands from a CSV source.
///
/// Wraps `csv::Reader` and yields `Result<CartCommand>` lazily, so large
/// command files stream without loading everything into memory. Whitespace
/// is trimmed and short records are tolerated.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    /// Creates a new `CommandReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<CartCommand>> {
        self.reader
            .into_deserialize::<CommandRecord>()
            .map(|result| {
                result
                    .map_err(CartError::from)
                    .and_then(CartCommand::try_from)
            })
    }
}
