// demos/storefront/src/models/order_item.rs

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: i64,
  pub quantity: i32,
  pub price_at_purchase_cents: i64,
}
