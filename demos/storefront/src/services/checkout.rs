// demos/storefront/src/services/checkout.rs

use crate::errors::AppError;
use crate::models::OrderReceipt;
use async_trait::async_trait;
use basket::{CartLine, CartRemote, OwnerId};

/// A cart remote that can also turn the owner's durable cart into an order.
///
/// Placing an order empties the durable cart. The local store is not touched;
/// the caller clears it afterwards.
#[async_trait]
pub trait CheckoutBackend: CartRemote {
  async fn place_order(&self, owner: &OwnerId, lines: &[CartLine]) -> Result<OrderReceipt, AppError>;
}
