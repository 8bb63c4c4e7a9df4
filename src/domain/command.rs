use crate::domain::cart::{OwnerId, ProductId};

/// A validated cart mutation or query.
///
/// Boundary layers (CSV today, HTTP in a surrounding service) parse their
/// loosely-typed input into this enum before anything reaches the engine.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum CartCommand {
    AddItem {
        owner: OwnerId,
        product: ProductId,
        quantity: u32,
    },
    UpdateQuantity {
        owner: OwnerId,
        product: ProductId,
        quantity: u32,
    },
    RemoveItem {
        owner: OwnerId,
        product: ProductId,
    },
    Clear {
        owner: OwnerId,
    },
    ApplyCoupon {
        owner: OwnerId,
        code: String,
    },
    RemoveCoupon {
        owner: OwnerId,
    },
}

impl CartCommand {
    pub fn owner(&self) -> &OwnerId {
        match self {
            CartCommand::AddItem { owner, .. }
            | CartCommand::UpdateQuantity { owner, .. }
            | CartCommand::RemoveItem { owner, .. }
            | CartCommand::Clear { owner }
            | CartCommand::ApplyCoupon { owner, .. }
            | CartCommand::RemoveCoupon { owner } => owner,
        }
    }
}
