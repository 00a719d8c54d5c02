// demos/storefront/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use basket::EngineConfig;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// Postgres connection string. Without it the demo runs against the in-memory remote.
  pub database_url: Option<String>,
  pub shopper_id: String,
  pub currency: String,

  // In-memory remote behaviour
  pub remote_latency: Duration,
  pub simulate_remote_failures: bool,

  // Engine switches
  pub max_line_quantity: Option<u32>,
  pub serialize_line_mutations: bool,

  pub log_json: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let database_url = get_env("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
    let shopper_id = get_env("SHOPPER_ID").unwrap_or_else(|_| "demo-shopper".to_string());
    let currency = get_env("CURRENCY").unwrap_or_else(|_| "usd".to_string());

    let remote_latency_ms = get_env("REMOTE_LATENCY_MS")
      .unwrap_or_else(|_| "25".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid REMOTE_LATENCY_MS: {}", e)))?;

    let simulate_remote_failures = get_env("SIMULATE_REMOTE_FAILURES")
      .unwrap_or_else(|_| "true".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SIMULATE_REMOTE_FAILURES value: {}", e)))?;

    let max_line_quantity = match get_env("MAX_LINE_QUANTITY") {
      Ok(raw) => Some(
        raw
          .parse::<u32>()
          .map_err(|e| AppError::Config(format!("Invalid MAX_LINE_QUANTITY: {}", e)))?,
      ),
      Err(_) => None,
    };

    let serialize_line_mutations = get_env("SERIALIZE_LINE_MUTATIONS")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SERIALIZE_LINE_MUTATIONS value: {}", e)))?;

    let log_json = get_env("LOG_FORMAT").map(|f| f.eq_ignore_ascii_case("json")).unwrap_or(false);

    Ok(Self {
      database_url,
      shopper_id,
      currency,
      remote_latency: Duration::from_millis(remote_latency_ms),
      simulate_remote_failures,
      max_line_quantity,
      serialize_line_mutations,
      log_json,
    })
  }

  pub fn engine_config(&self) -> EngineConfig {
    let config = EngineConfig::new().with_line_serialization(self.serialize_line_mutations);
    match self.max_line_quantity {
      Some(limit) => config.with_max_line_quantity(limit),
      None => config,
    }
  }
}
