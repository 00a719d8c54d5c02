// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper

use async_trait::async_trait;
use basket::{
  CartEngine, CartEvent, CartLine, CartRemote, CartStore, Confirmation, EngineConfig, InMemoryCatalog, MemoryRemote,
  OwnerId, ProductId, ProductSummary, RemoteError, RemoteOp,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::Level;

// --- Common Fixtures ---
pub const WIDGET: ProductId = ProductId(42);
pub const GADGET: ProductId = ProductId(7);
pub const GIZMO: ProductId = ProductId(8);
pub const NOT_IN_CATALOG: ProductId = ProductId(9999);

pub fn catalog() -> Arc<InMemoryCatalog> {
  Arc::new(
    [
      ProductSummary::new(WIDGET, "Widget", 1250).with_image("/img/widget.png"),
      ProductSummary::new(GADGET, "Gadget", 399),
      ProductSummary::new(GIZMO, "Gizmo", 2000),
    ]
    .into_iter()
    .collect(),
  )
}

pub fn line(product_id: ProductId, owner: &str, quantity: u32) -> CartLine {
  let product = basket::Catalog::product(&*catalog(), product_id).unwrap_or_else(|| ProductSummary::new(product_id, "Unknown", 0));
  CartLine::new(&product, OwnerId::from(owner)).with_quantity(quantity)
}

pub fn u1() -> OwnerId {
  OwnerId::from("u1")
}

pub fn u2() -> OwnerId {
  OwnerId::from("u2")
}

/// An engine over a fresh store and `MemoryRemote`, bound to `owner`.
pub fn engine_for(owner: &str) -> CartEngine<MemoryRemote> {
  let catalog = catalog();
  let remote = Arc::new(MemoryRemote::new(catalog.clone()));
  let engine = CartEngine::new(CartStore::new(), remote, catalog);
  engine.bind_owner(owner);
  engine
}

/// An engine over a `GatedRemote`, bound to `owner`.
pub fn gated_engine_for(owner: &str, config: EngineConfig) -> CartEngine<GatedRemote> {
  let catalog = catalog();
  let remote = Arc::new(GatedRemote::new(MemoryRemote::new(catalog.clone())));
  let engine = CartEngine::with_config(CartStore::new(), remote, catalog, config).unwrap();
  engine.bind_owner(owner);
  engine
}

/// Collects every event the store emits from now on.
pub fn record_events(store: &CartStore) -> Arc<Mutex<Vec<CartEvent>>> {
  let events = Arc::new(Mutex::new(Vec::new()));
  let sink = events.clone();
  let _subscription = store.subscribe(move |event| sink.lock().push(event.clone()));
  events
}

// --- Gated Remote ---
// Holds selected calls until the test releases them, so tests can decide the
// order in which concurrent mutations settle.
pub struct GatedRemote {
  pub inner: MemoryRemote,
  gates: Mutex<HashMap<(RemoteOp, ProductId), oneshot::Receiver<()>>>,
  waiting: Mutex<HashMap<RemoteOp, usize>>,
}

impl GatedRemote {
  pub fn new(inner: MemoryRemote) -> Self {
    Self {
      inner,
      gates: Mutex::new(HashMap::new()),
      waiting: Mutex::new(HashMap::new()),
    }
  }

  /// The next `op` call for `product_id` blocks until the returned sender fires.
  pub fn gate(&self, op: RemoteOp, product_id: ProductId) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.gates.lock().insert((op, product_id), rx);
    tx
  }

  pub fn waiting(&self, op: RemoteOp) -> usize {
    self.waiting.lock().get(&op).copied().unwrap_or(0)
  }

  async fn pass(&self, op: RemoteOp, product_id: ProductId) {
    let gate = self.gates.lock().remove(&(op, product_id));
    if let Some(rx) = gate {
      *self.waiting.lock().entry(op).or_default() += 1;
      let _ = rx.await;
      *self.waiting.lock().entry(op).or_default() -= 1;
    }
  }
}

#[async_trait]
impl CartRemote for GatedRemote {
  type Error = RemoteError;

  async fn add(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, RemoteError> {
    self.pass(RemoteOp::Add, product_id).await;
    self.inner.add(product_id, owner).await
  }

  async fn increase(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, RemoteError> {
    self.pass(RemoteOp::Increase, product_id).await;
    self.inner.increase(product_id, owner).await
  }

  async fn decrease(&self, product_id: ProductId, owner: &OwnerId) -> Result<Confirmation, RemoteError> {
    self.pass(RemoteOp::Decrease, product_id).await;
    self.inner.decrease(product_id, owner).await
  }

  async fn remove(&self, product_id: ProductId, owner: &OwnerId) -> Result<(), RemoteError> {
    self.pass(RemoteOp::Remove, product_id).await;
    self.inner.remove(product_id, owner).await
  }

  async fn fetch(&self, owner: &OwnerId) -> Result<Vec<CartLine>, RemoteError> {
    self.inner.fetch(owner).await
  }
}

/// Yields to the other futures of a `join!` until `condition` holds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
  for _ in 0..10_000 {
    if condition() {
      return;
    }
    tokio::task::yield_now().await;
  }
  panic!("condition not reached while waiting on concurrent cart operations");
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
