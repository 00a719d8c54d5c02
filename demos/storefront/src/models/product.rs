// demos/storefront/src/models/product.rs

use basket::{ProductId, ProductSummary};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: i64,
  pub name: String,
  pub price_cents: i32,
  pub image_url: Option<String>,
}

impl From<ProductRow> for ProductSummary {
  fn from(row: ProductRow) -> Self {
    ProductSummary {
      id: ProductId(row.id),
      title: row.name,
      unit_price_cents: i64::from(row.price_cents),
      image: row.image_url,
    }
  }
}
