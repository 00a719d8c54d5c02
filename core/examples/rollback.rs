// basket/examples/rollback.rs

use basket::{CartEngine, CartEvent, CartStore, InMemoryCatalog, MemoryRemote, ProductId, ProductSummary, RemoteOp};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Rollback Example ---");

  let catalog: Arc<InMemoryCatalog> = Arc::new([ProductSummary::new(ProductId(42), "Widget", 1250)].into_iter().collect());
  let remote = Arc::new(MemoryRemote::new(catalog.clone()));
  let store = CartStore::new();
  let engine = CartEngine::new(store.clone(), remote.clone(), catalog);
  engine.bind_owner("u1");

  // A UI would re-render on every event.
  let _subscription = store.subscribe(|event| match event {
    CartEvent::Applied { kind, revision, .. } => info!("render: optimistic {} (rev {})", kind, revision),
    CartEvent::RolledBack { kind, revision, .. } => info!("render: {} undone (rev {})", kind, revision),
    other => info!("render: {:?}", other),
  });

  let widget = ProductId(42);
  if let Err(e) = engine.add_item(widget).await {
    error!("Unexpected failure: {}", e);
    return;
  }
  if let Err(e) = engine.increase_quantity(widget).await {
    error!("Unexpected failure: {}", e);
    return;
  }
  info!("Quantity before failing decrease: {}", engine.item_count());

  // The server rejects the next decrease: the line snaps back to 2.
  remote.fail_next(RemoteOp::Decrease);
  match engine.decrease_quantity(widget).await {
    Ok(outcome) => error!("Decrease unexpectedly succeeded: {:?}", outcome),
    Err(e) => info!("Decrease failed as expected ({}); toast shown by the UI.", e),
  }
  assert_eq!(engine.item_count(), 2);
  info!("Quantity after rollback: {}", engine.item_count());
}
