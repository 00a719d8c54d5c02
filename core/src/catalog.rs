// basket/src/catalog.rs

//! Product lookup used to build the display fields of a new cart line.

use crate::model::{ProductId, ProductSummary};
use std::collections::HashMap;

pub trait Catalog: Send + Sync {
  fn product(&self, product_id: ProductId) -> Option<ProductSummary>;
}

/// A fixed, in-process catalog.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
  products: HashMap<ProductId, ProductSummary>,
}

impl InMemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, product: ProductSummary) -> Option<ProductSummary> {
    self.products.insert(product.id, product)
  }

  pub fn products(&self) -> impl Iterator<Item = &ProductSummary> {
    self.products.values()
  }

  pub fn len(&self) -> usize {
    self.products.len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.is_empty()
  }
}

impl FromIterator<ProductSummary> for InMemoryCatalog {
  fn from_iter<I: IntoIterator<Item = ProductSummary>>(iter: I) -> Self {
    Self {
      products: iter.into_iter().map(|p| (p.id, p)).collect(),
    }
  }
}

impl Catalog for InMemoryCatalog {
  fn product(&self, product_id: ProductId) -> Option<ProductSummary> {
    self.products.get(&product_id).cloned()
  }
}
