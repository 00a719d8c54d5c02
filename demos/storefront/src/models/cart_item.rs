// demos/storefront/src/models/cart_item.rs

use crate::errors::AppError;
use anyhow::Context;
use basket::{CartLine, OwnerId, ProductId};
use sqlx::FromRow;

/// A `cart_items` row joined with the product fields a cart line renders.
#[derive(Debug, Clone, FromRow)]
pub struct CartItemRow {
  pub user_id: String,
  pub product_id: i64,
  pub quantity: i32,
  pub title: String,
  pub price_cents: i32,
  pub image_url: Option<String>,
}

impl TryFrom<CartItemRow> for CartLine {
  type Error = AppError;

  fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
    let quantity = u32::try_from(row.quantity)
      .with_context(|| format!("negative quantity {} for product {}", row.quantity, row.product_id))?;
    Ok(CartLine {
      product_id: ProductId(row.product_id),
      owner_id: OwnerId::new(row.user_id),
      quantity,
      title: row.title,
      unit_price_cents: i64::from(row.price_cents),
      image: row.image_url,
    })
  }
}
