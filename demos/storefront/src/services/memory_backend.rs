// demos/storefront/src/services/memory_backend.rs

use super::CheckoutBackend;
use crate::errors::AppError;
use crate::models::OrderReceipt;
use async_trait::async_trait;
use basket::{CartLine, CartRemote, Confirmation, MemoryRemote, OwnerId, ProductId, RemoteError};
use parking_lot::Mutex;
use std::time::Duration;

/// The offline storefront: a [`MemoryRemote`] behind a fixed network latency.
#[derive(Debug)]
pub struct MemoryStorefront {
  remote: MemoryRemote,
  latency: Duration,
  currency: String,
  orders: Mutex<Vec<OrderReceipt>>,
}

impl MemoryStorefront {
  pub fn new(remote: MemoryRemote, latency: Duration, currency: impl Into<String>) -> Self {
    Self {
      remote,
      latency,
      currency: currency.into(),
      orders: Mutex::new(Vec::new()),
    }
  }

  pub fn orders(&self) -> Vec<OrderReceipt> {
    self.orders.lock().clone()
  }

  async fn round_trip(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

#[async_trait]
impl CartRemote for MemoryStorefront {
  type Error = RemoteError;

  async fn add(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, RemoteError> {
    self.round_trip().await;
    self.remote.add(product_id, owner).await
  }

  async fn increase(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, RemoteError> {
    self.round_trip().await;
    self.remote.increase(product_id, owner).await
  }

  async fn decrease(&self, product_id: ProductId, owner: &OwnerId) -> Result<Confirmation, RemoteError> {
    self.round_trip().await;
    self.remote.decrease(product_id, owner).await
  }

  async fn remove(&self, product_id: ProductId, owner: &OwnerId) -> Result<(), RemoteError> {
    self.round_trip().await;
    self.remote.remove(product_id, owner).await
  }

  async fn fetch(&self, owner: &OwnerId) -> Result<Vec<CartLine>, RemoteError> {
    self.round_trip().await;
    self.remote.fetch(owner).await
  }
}

#[async_trait]
impl CheckoutBackend for MemoryStorefront {
  async fn place_order(&self, owner: &OwnerId, lines: &[CartLine]) -> Result<OrderReceipt, AppError> {
    if lines.is_empty() {
      return Err(AppError::NotFound(format!("No cart lines to order for {}", owner)));
    }
    self.round_trip().await;
    let receipt = OrderReceipt::from_lines(owner.as_str(), &self.currency, lines)?;
    let cleared = self.remote.clear_owner(owner);
    tracing::info!(order_id = %receipt.id, %owner, cleared, "Order placed in memory.");
    self.orders.lock().push(receipt.clone());
    Ok(receipt)
  }
}
