// basket/examples/basic_cart.rs

use basket::{CartEngine, CartStore, Confirmation, InMemoryCatalog, MemoryRemote, ProductId, ProductSummary, RemoteError};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), RemoteError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Basic Cart Example ---");

  // 1. A catalog and a remote that keeps the durable copy in memory.
  let catalog: Arc<InMemoryCatalog> = Arc::new(
    [
      ProductSummary::new(ProductId(1), "Espresso beans 1kg", 2490),
      ProductSummary::new(ProductId(2), "Paper filters", 350),
    ]
    .into_iter()
    .collect(),
  );
  let remote = Arc::new(MemoryRemote::new(catalog.clone()));

  // 2. One store per session, one engine bound to the signed-in user.
  let engine = CartEngine::new(CartStore::new(), remote, catalog);
  engine.bind_owner("user-1");

  // 3. Mutate. Each call updates the store before the remote answers.
  engine.add_item(ProductId(1)).await?;
  engine.add_item(ProductId(2)).await?;
  let outcome = engine.increase_quantity(ProductId(2)).await?;
  if let Some(Confirmation::Line(persisted)) = outcome.confirmation() {
    info!("Remote now holds {} x {}", persisted.quantity, persisted.title);
  }
  engine.decrease_quantity(ProductId(1)).await?;

  // 4. Render.
  for line in engine.lines() {
    info!("{} x {} @ {} cents", line.quantity, line.title, line.unit_price_cents);
  }
  info!(
    "Items: {}, total: {} cents",
    engine.item_count(),
    engine.total_price_cents()
  );
  Ok(())
}
