// basket/src/config.rs

use crate::error::{CartError, CartResult};

/// Engine behaviour switches. The default matches plain optimistic semantics:
/// no quantity cap and no serialization of same-line mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
  /// Highest quantity a single line may reach through add/increase.
  pub max_line_quantity: Option<u32>,
  /// When set, mutations on the same `(product, owner)` line wait for each other
  /// instead of racing their snapshots.
  pub serialize_line_mutations: bool,
}

impl EngineConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_line_quantity(mut self, limit: u32) -> Self {
    self.max_line_quantity = Some(limit);
    self
  }

  pub fn with_line_serialization(mut self, enabled: bool) -> Self {
    self.serialize_line_mutations = enabled;
    self
  }

  pub fn validate(&self) -> CartResult<()> {
    if self.max_line_quantity == Some(0) {
      return Err(CartError::Config {
        message: "max_line_quantity must be at least 1".to_string(),
      });
    }
    Ok(())
  }
}
