// demos/storefront/src/main.rs

mod config;
mod errors;
mod models;
mod services;
mod session;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::services::{MemoryStorefront, PgStorefront};

use basket::{CartEngine, CartStore, Catalog, InMemoryCatalog, MemoryRemote, ProductId, ProductSummary, RemoteOp};
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let app_config = AppConfig::from_env()?;
  init_tracing(app_config.log_json);

  tracing::info!("Starting storefront demo...");

  let receipt = match &app_config.database_url {
    Some(url) => {
      let pool = PgPool::connect(url).await.map_err(AppError::from)?;
      tracing::info!("Successfully connected to the database.");
      let backend = PgStorefront::new(pool, &app_config.currency);
      backend.ensure_schema().await?;
      backend.seed_products(&demo_products()).await?;
      let catalog = backend.load_catalog().await?;
      let picks = picks_from(&catalog);

      let engine = CartEngine::with_config(
        CartStore::new(),
        Arc::new(backend),
        Arc::new(catalog),
        app_config.engine_config(),
      )?;
      session::run_session(&engine, &app_config.shopper_id, &picks).await?
    }
    None => {
      tracing::info!("DATABASE_URL not set; using the in-memory storefront.");
      let catalog: InMemoryCatalog = demo_products().into_iter().collect();
      let picks = picks_from(&catalog);
      let catalog: Arc<dyn Catalog> = Arc::new(catalog);

      let remote = MemoryRemote::new(Arc::clone(&catalog));
      if app_config.simulate_remote_failures {
        remote.fail_next(RemoteOp::Decrease);
      }
      let backend = MemoryStorefront::new(remote, app_config.remote_latency, &app_config.currency);

      let engine = CartEngine::with_config(CartStore::new(), Arc::new(backend), catalog, app_config.engine_config())?;
      let receipt = session::run_session(&engine, &app_config.shopper_id, &picks).await?;
      tracing::info!(orders = engine.remote().orders().len(), "In-memory storefront finished.");
      receipt
    }
  };

  match receipt {
    Some(receipt) => println!("{}", serde_json::to_string_pretty(&receipt)?),
    None => tracing::info!("Cart was empty; no order placed."),
  }
  Ok(())
}

fn init_tracing(json: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,basket=debug"));
  if json {
    tracing_subscriber::fmt().with_env_filter(filter).json().init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
      .init();
  }
}

fn demo_products() -> Vec<ProductSummary> {
  vec![
    ProductSummary::new(ProductId(1), "Espresso Beans 1kg", 2450).with_image("/img/espresso.png"),
    ProductSummary::new(ProductId(2), "Pour-over Kettle", 5900).with_image("/img/kettle.png"),
    ProductSummary::new(ProductId(3), "Paper Filters (100)", 650),
  ]
}

fn picks_from(catalog: &InMemoryCatalog) -> Vec<ProductId> {
  let mut picks: Vec<ProductId> = catalog.products().map(|product| product.id).collect();
  picks.sort();
  picks
}
