// basket/src/error.rs
use crate::model::ProductId;
use thiserror::Error;

/// Failures raised by the engine itself, before a remote call is made.
///
/// Remote failures are never wrapped in this type: they pass through the engine
/// unchanged. A remote's error type converts *from* `CartError` so callers deal
/// with a single error type per engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
  #[error("Product not found in catalog: {product_id}")]
  UnknownProduct { product_id: ProductId },

  #[error("Quantity limit of {limit} reached for product {product_id}")]
  QuantityLimit { product_id: ProductId, limit: u32 },

  #[error("Invalid engine configuration: {message}")]
  Config { message: String },
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
