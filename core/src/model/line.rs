// basket/src/model/line.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<i64> for ProductId {
  fn from(id: i64) -> Self {
    ProductId(id)
  }
}

/// Identifier of the user owning a cart line, as issued by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
  pub fn new(id: impl Into<String>) -> Self {
    OwnerId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for OwnerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for OwnerId {
  fn from(id: &str) -> Self {
    OwnerId(id.to_string())
  }
}

impl From<String> for OwnerId {
  fn from(id: String) -> Self {
    OwnerId(id)
  }
}

/// The catalog fields a cart line copies in for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
  pub id: ProductId,
  pub title: String,
  pub unit_price_cents: i64,
  pub image: Option<String>,
}

impl ProductSummary {
  pub fn new(id: ProductId, title: impl Into<String>, unit_price_cents: i64) -> Self {
    Self {
      id,
      title: title.into(),
      unit_price_cents,
      image: None,
    }
  }

  pub fn with_image(mut self, image: impl Into<String>) -> Self {
    self.image = Some(image.into());
    self
  }
}

/// One product line in a user's cart.
///
/// At most one line exists per `(product_id, owner_id)` and `quantity` is never
/// zero: a decrement from 1 removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub product_id: ProductId,
  pub owner_id: OwnerId,
  pub quantity: u32,
  // Denormalized from the catalog.
  pub title: String,
  pub unit_price_cents: i64,
  pub image: Option<String>,
}

impl CartLine {
  /// A fresh line with quantity 1.
  pub fn new(product: &ProductSummary, owner_id: OwnerId) -> Self {
    Self {
      product_id: product.id,
      owner_id,
      quantity: 1,
      title: product.title.clone(),
      unit_price_cents: product.unit_price_cents,
      image: product.image.clone(),
    }
  }

  pub fn with_quantity(mut self, quantity: u32) -> Self {
    self.quantity = quantity;
    self
  }

  pub fn belongs_to(&self, owner_id: &OwnerId) -> bool {
    &self.owner_id == owner_id
  }

  pub fn is_for(&self, product_id: ProductId, owner_id: &OwnerId) -> bool {
    self.product_id == product_id && self.belongs_to(owner_id)
  }

  pub fn subtotal_cents(&self) -> i64 {
    i64::from(self.quantity) * self.unit_price_cents
  }
}
