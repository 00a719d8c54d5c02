// basket/src/engine/definition.rs

//! Contains the `CartEngine<R>` struct definition, its construction, owner
//! binding and the read-only views scoped to the bound owner.

use super::line_locks::LineLocks;
use super::loading::LoadingFlags;
use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::CartResult;
use crate::model::{CartLine, OwnerId};
use crate::remote::CartRemote;
use crate::store::CartStore;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{event, Level};

/// The cart reconciliation engine for one client session.
///
/// Holds a handle to a [`CartStore`] (which may be shared with other engines),
/// the remote collaborator that owns the durable copy, and the catalog used to
/// build new lines. Mutations are applied to the store before the remote call
/// and rolled back if it fails.
pub struct CartEngine<R>
where
  R: CartRemote,
{
  pub(crate) store: CartStore,
  pub(crate) remote: Arc<R>,
  pub(crate) catalog: Arc<dyn Catalog>,
  pub(crate) owner: RwLock<Option<OwnerId>>,
  pub(crate) loading: Arc<LoadingFlags>,
  pub(crate) line_locks: LineLocks,
  pub(crate) config: EngineConfig,
}

impl<R> std::fmt::Debug for CartEngine<R>
where
  R: CartRemote,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartEngine")
      .field("store", &self.store)
      .field("owner", &*self.owner.read())
      .field("loading", &self.loading)
      .field("line_locks", &self.line_locks.len())
      .field("config", &self.config)
      .finish()
  }
}

impl<R> CartEngine<R>
where
  R: CartRemote,
{
  /// Creates an engine with the default [`EngineConfig`] and no bound owner.
  pub fn new(store: CartStore, remote: Arc<R>, catalog: Arc<dyn Catalog>) -> Self {
    Self {
      store,
      remote,
      catalog,
      owner: RwLock::new(None),
      loading: Arc::new(LoadingFlags::default()),
      line_locks: LineLocks::default(),
      config: EngineConfig::default(),
    }
  }

  /// Creates an engine with an explicit configuration.
  pub fn with_config(
    store: CartStore,
    remote: Arc<R>,
    catalog: Arc<dyn Catalog>,
    config: EngineConfig,
  ) -> CartResult<Self> {
    config.validate()?;
    let mut engine = Self::new(store, remote, catalog);
    engine.config = config;
    Ok(engine)
  }

  /// Scopes every subsequent operation to `owner` (on sign-in).
  pub fn bind_owner(&self, owner: impl Into<OwnerId>) {
    let owner = owner.into();
    event!(Level::DEBUG, %owner, "Owner bound to cart engine.");
    *self.owner.write() = Some(owner);
  }

  /// Clears the bound owner (on sign-out). Cart lines stay in the store.
  pub fn unbind_owner(&self) -> Option<OwnerId> {
    let previous = self.owner.write().take();
    event!(Level::DEBUG, previous_owner = ?previous, "Owner unbound from cart engine.");
    previous
  }

  pub fn owner(&self) -> Option<OwnerId> {
    self.owner.read().clone()
  }

  pub fn store(&self) -> &CartStore {
    &self.store
  }

  pub fn remote(&self) -> &Arc<R> {
    &self.remote
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  /// Shared handle to the loading flags, for rendering outside the engine.
  pub fn loading(&self) -> Arc<LoadingFlags> {
    Arc::clone(&self.loading)
  }

  /// The bound owner's lines. Empty when no owner is bound.
  pub fn lines(&self) -> Vec<CartLine> {
    self.owner().map(|owner| self.store.lines_for(&owner)).unwrap_or_default()
  }

  pub fn item_count(&self) -> u64 {
    self.owner().map_or(0, |owner| self.store.item_count(&owner))
  }

  pub fn total_price_cents(&self) -> i64 {
    self.owner().map_or(0, |owner| self.store.total_price_cents(&owner))
  }
}
