// basket/src/remote/memory.rs

//! An in-process `CartRemote` holding the durable copy in a map, with
//! scriptable failures. Backs the demo's offline mode, the tests and the benches.

use super::CartRemote;
use crate::catalog::Catalog;
use crate::error::CartError;
use crate::model::{CartLine, OwnerId, ProductId};
use crate::mutation::Confirmation;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{event, instrument, Level};

/// Remote operations, used to script failures and to inspect the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
  Add,
  Increase,
  Decrease,
  Remove,
  Fetch,
}

impl fmt::Display for RemoteOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      RemoteOp::Add => "add",
      RemoteOp::Increase => "increase",
      RemoteOp::Decrease => "decrease",
      RemoteOp::Remove => "remove",
      RemoteOp::Fetch => "fetch",
    };
    f.write_str(name)
  }
}

#[derive(Debug, Error)]
pub enum RemoteError {
  #[error("Remote {op} rejected by injected failure")]
  Injected { op: RemoteOp },

  #[error("No cart line for product {product_id} owned by {owner}")]
  LineNotFound { product_id: ProductId, owner: OwnerId },

  #[error(transparent)]
  Cart(#[from] CartError),

  #[error("Remote backend failure: {0}")]
  Backend(#[from] anyhow::Error),
}

/// One recorded call against the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCall {
  pub op: RemoteOp,
  pub owner: OwnerId,
  pub product_id: Option<ProductId>,
}

#[derive(Default)]
struct Inner {
  lines: BTreeMap<(OwnerId, ProductId), CartLine>,
  failures: HashMap<RemoteOp, VecDeque<Option<anyhow::Error>>>,
  calls: Vec<RemoteCall>,
}

pub struct MemoryRemote {
  catalog: Arc<dyn Catalog>,
  inner: Mutex<Inner>,
}

impl fmt::Debug for MemoryRemote {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.lock();
    f.debug_struct("MemoryRemote")
      .field("lines", &inner.lines.len())
      .field("calls", &inner.calls.len())
      .finish()
  }
}

impl MemoryRemote {
  pub fn new(catalog: Arc<dyn Catalog>) -> Self {
    Self {
      catalog,
      inner: Mutex::new(Inner::default()),
    }
  }

  /// Seeds the durable copy, replacing any line with the same key.
  pub fn seed(&self, lines: impl IntoIterator<Item = CartLine>) {
    let mut inner = self.inner.lock();
    for line in lines {
      inner.lines.insert((line.owner_id.clone(), line.product_id), line);
    }
  }

  /// Makes the next call of `op` fail with [`RemoteError::Injected`].
  pub fn fail_next(&self, op: RemoteOp) {
    self.inner.lock().failures.entry(op).or_default().push_back(None);
  }

  /// Makes the next call of `op` fail with [`RemoteError::Backend`] carrying `error`.
  pub fn fail_next_with(&self, op: RemoteOp, error: anyhow::Error) {
    self.inner.lock().failures.entry(op).or_default().push_back(Some(error));
  }

  pub fn durable_lines(&self, owner: &OwnerId) -> Vec<CartLine> {
    self
      .inner
      .lock()
      .lines
      .values()
      .filter(|line| line.belongs_to(owner))
      .cloned()
      .collect()
  }

  /// Empties the owner's durable cart, as order placement does server side.
  pub fn clear_owner(&self, owner: &OwnerId) -> usize {
    let mut inner = self.inner.lock();
    let before = inner.lines.len();
    inner.lines.retain(|(line_owner, _), _| line_owner != owner);
    before - inner.lines.len()
  }

  pub fn calls(&self) -> Vec<RemoteCall> {
    self.inner.lock().calls.clone()
  }

  /// Records the call and pops a scripted failure for `op`, if any.
  fn enter(&self, inner: &mut Inner, op: RemoteOp, owner: &OwnerId, product_id: Option<ProductId>) -> Result<(), RemoteError> {
    inner.calls.push(RemoteCall {
      op,
      owner: owner.clone(),
      product_id,
    });
    match inner.failures.get_mut(&op).and_then(VecDeque::pop_front) {
      None => Ok(()),
      Some(None) => {
        event!(Level::DEBUG, %op, %owner, "Injected remote failure.");
        Err(RemoteError::Injected { op })
      }
      Some(Some(error)) => {
        event!(Level::DEBUG, %op, %owner, %error, "Injected remote backend failure.");
        Err(RemoteError::Backend(error))
      }
    }
  }
}

#[async_trait]
impl CartRemote for MemoryRemote {
  type Error = RemoteError;

  #[instrument(name = "MemoryRemote::add", skip(self), level = "debug", err(Display))]
  async fn add(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, RemoteError> {
    let mut inner = self.inner.lock();
    self.enter(&mut inner, RemoteOp::Add, owner, Some(product_id))?;
    let key = (owner.clone(), product_id);
    if let Some(line) = inner.lines.get_mut(&key) {
      line.quantity = line.quantity.saturating_add(1);
      return Ok(line.clone());
    }
    let product = self
      .catalog
      .product(product_id)
      .ok_or(CartError::UnknownProduct { product_id })?;
    let line = CartLine::new(&product, owner.clone());
    inner.lines.insert(key, line.clone());
    Ok(line)
  }

  #[instrument(name = "MemoryRemote::increase", skip(self), level = "debug", err(Display))]
  async fn increase(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, RemoteError> {
    let mut inner = self.inner.lock();
    self.enter(&mut inner, RemoteOp::Increase, owner, Some(product_id))?;
    let line = inner
      .lines
      .get_mut(&(owner.clone(), product_id))
      .ok_or_else(|| RemoteError::LineNotFound {
        product_id,
        owner: owner.clone(),
      })?;
    line.quantity = line.quantity.saturating_add(1);
    Ok(line.clone())
  }

  #[instrument(name = "MemoryRemote::decrease", skip(self), level = "debug", err(Display))]
  async fn decrease(&self, product_id: ProductId, owner: &OwnerId) -> Result<Confirmation, RemoteError> {
    let mut inner = self.inner.lock();
    self.enter(&mut inner, RemoteOp::Decrease, owner, Some(product_id))?;
    let key = (owner.clone(), product_id);
    let quantity = inner
      .lines
      .get(&key)
      .map(|line| line.quantity)
      .ok_or_else(|| RemoteError::LineNotFound {
        product_id,
        owner: owner.clone(),
      })?;
    if quantity <= 1 {
      inner.lines.remove(&key);
      return Ok(Confirmation::Removed);
    }
    match inner.lines.get_mut(&key) {
      Some(line) => {
        line.quantity = quantity - 1;
        Ok(Confirmation::Line(line.clone()))
      }
      None => Ok(Confirmation::Removed),
    }
  }

  #[instrument(name = "MemoryRemote::remove", skip(self), level = "debug", err(Display))]
  async fn remove(&self, product_id: ProductId, owner: &OwnerId) -> Result<(), RemoteError> {
    let mut inner = self.inner.lock();
    self.enter(&mut inner, RemoteOp::Remove, owner, Some(product_id))?;
    inner.lines.remove(&(owner.clone(), product_id));
    Ok(())
  }

  #[instrument(name = "MemoryRemote::fetch", skip(self), level = "debug", err(Display))]
  async fn fetch(&self, owner: &OwnerId) -> Result<Vec<CartLine>, RemoteError> {
    let mut inner = self.inner.lock();
    self.enter(&mut inner, RemoteOp::Fetch, owner, None)?;
    Ok(inner.lines.values().filter(|line| line.belongs_to(owner)).cloned().collect())
  }
}
