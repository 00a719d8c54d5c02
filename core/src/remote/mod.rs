// basket/src/remote/mod.rs

//! The remote persistence seam the engine reconciles against.

pub mod memory;

use crate::error::CartError;
use crate::model::{CartLine, OwnerId, ProductId};
use crate::mutation::Confirmation;
use async_trait::async_trait;

pub use memory::{MemoryRemote, RemoteError, RemoteOp};

/// Durable cart operations, each keyed by `(product_id, owner)`.
///
/// `Error` must be constructible from [`CartError`] so engine-level failures
/// (unknown product, quantity cap) reach the caller through the same type as
/// remote failures. Remote errors are returned to the caller untouched.
#[async_trait]
pub trait CartRemote: Send + Sync {
  type Error: std::error::Error + From<CartError> + Send + Sync + 'static;

  /// Adds one unit, creating the line if needed. Returns the persisted line.
  async fn add(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, Self::Error>;

  async fn increase(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, Self::Error>;

  /// Removes one unit. Returns [`Confirmation::Removed`] when the line reached zero.
  async fn decrease(&self, product_id: ProductId, owner: &OwnerId) -> Result<Confirmation, Self::Error>;

  async fn remove(&self, product_id: ProductId, owner: &OwnerId) -> Result<(), Self::Error>;

  /// The owner's durable cart.
  async fn fetch(&self, owner: &OwnerId) -> Result<Vec<CartLine>, Self::Error>;
}
