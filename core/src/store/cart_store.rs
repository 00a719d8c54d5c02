// basket/src/store/cart_store.rs

use super::events::{CartEvent, Listener, Listeners, Subscription};
use super::views;
use crate::model::{CartLine, CartSnapshot, OwnerId, ProductId};
use crate::mutation::{apply, MutationKind, PendingMutation};
use parking_lot::RwLock;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{event, Level};

/// The current set of lines plus a revision that grows by one on every replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CartState {
  lines: Arc<[CartLine]>,
  revision: u64,
}

impl Default for CartState {
  fn default() -> Self {
    Self {
      lines: Arc::from(Vec::new()),
      revision: 0,
    }
  }
}

impl CartState {
  fn replace(&mut self, lines: Vec<CartLine>) -> u64 {
    self.lines = Arc::from(lines);
    self.revision += 1;
    self.revision
  }

  fn snapshot(&self) -> CartSnapshot {
    CartSnapshot {
      lines: Arc::clone(&self.lines),
      revision: self.revision,
    }
  }
}

/// Shared, injectable cart state.
///
/// Clones are handles to the same state. Every change swaps in a whole new line
/// list, so a reader holding a snapshot never sees a partially applied change.
///
/// IMPORTANT: the store's lock is blocking. Closures passed to
/// [`CartStore::begin`] run under it and MUST NOT block or re-enter the store.
#[derive(Clone, Default)]
pub struct CartStore {
  state: Arc<RwLock<CartState>>,
  listeners: Arc<Listeners>,
}

impl std::fmt::Debug for CartStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.state.read();
    f.debug_struct("CartStore")
      .field("lines", &state.lines.len())
      .field("revision", &state.revision)
      .field("listeners", &self.listeners.len())
      .finish()
  }
}

impl CartStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A store seeded with `lines` at revision 0.
  pub fn with_lines(lines: Vec<CartLine>) -> Self {
    Self {
      state: Arc::new(RwLock::new(CartState {
        lines: Arc::from(lines),
        revision: 0,
      })),
      listeners: Arc::default(),
    }
  }

  pub fn snapshot(&self) -> CartSnapshot {
    self.state.read().snapshot()
  }

  pub fn revision(&self) -> u64 {
    self.state.read().revision
  }

  pub fn lines_for(&self, owner: &OwnerId) -> Vec<CartLine> {
    views::lines_for(&self.state.read().lines, owner)
  }

  pub fn line(&self, product_id: ProductId, owner: &OwnerId) -> Option<CartLine> {
    self
      .state
      .read()
      .lines
      .iter()
      .find(|line| line.is_for(product_id, owner))
      .cloned()
  }

  pub fn item_count(&self, owner: &OwnerId) -> u64 {
    views::item_count(&self.state.read().lines, owner)
  }

  pub fn total_price_cents(&self, owner: &OwnerId) -> i64 {
    views::total_price_cents(&self.state.read().lines, owner)
  }

  /// Registers a listener for every subsequent [`CartEvent`].
  pub fn subscribe(&self, listener: impl Fn(&CartEvent) + Send + Sync + 'static) -> Subscription {
    let listener: Listener = Arc::new(listener);
    self.listeners.add(listener)
  }

  /// Snapshots the state and applies `optimistic` to it under one write lock.
  ///
  /// The returned value must be settled with [`PendingMutation::commit`] or
  /// [`PendingMutation::rollback`].
  pub fn begin(
    &self,
    kind: MutationKind,
    owner: OwnerId,
    product_id: ProductId,
    optimistic: impl FnOnce(&[CartLine]) -> Vec<CartLine>,
  ) -> PendingMutation {
    match self.try_begin(kind, owner, product_id, |lines| Ok::<_, Infallible>(optimistic(lines))) {
      Ok(pending) => pending,
      Err(never) => match never {},
    }
  }

  /// Like [`CartStore::begin`], but `optimistic` may refuse the change after
  /// seeing the locked state. On `Err` nothing is applied and no event is sent.
  pub fn try_begin<E>(
    &self,
    kind: MutationKind,
    owner: OwnerId,
    product_id: ProductId,
    optimistic: impl FnOnce(&[CartLine]) -> Result<Vec<CartLine>, E>,
  ) -> Result<PendingMutation, E> {
    let (snapshot, revision) = {
      let mut guard = self.state.write();
      let snapshot = guard.snapshot();
      let next = optimistic(&snapshot.lines)?;
      let revision = guard.replace(next);
      (snapshot, revision)
    };
    event!(Level::DEBUG, %kind, %owner, %product_id, revision, "Optimistic change applied.");
    self.listeners.notify(&CartEvent::Applied {
      kind,
      owner: owner.clone(),
      product_id,
      revision,
    });
    Ok(PendingMutation {
      kind,
      owner,
      product_id,
      snapshot,
      store: self.clone(),
    })
  }

  /// Replaces the owner's lines with `incoming`. Other owners are untouched.
  pub fn replace_owner_lines(&self, owner: &OwnerId, incoming: Vec<CartLine>) -> u64 {
    let revision = {
      let mut guard = self.state.write();
      let next = apply::replace_owner_lines(&guard.lines, owner, incoming);
      guard.replace(next)
    };
    event!(Level::DEBUG, %owner, revision, "Owner lines replaced.");
    self.listeners.notify(&CartEvent::Replaced {
      owner: owner.clone(),
      revision,
    });
    revision
  }

  /// Drops every line of `owner`. Returns how many were removed.
  pub fn clear_owner(&self, owner: &OwnerId) -> usize {
    let (removed, revision) = {
      let mut guard = self.state.write();
      let next = apply::without_owner(&guard.lines, owner);
      let removed = guard.lines.len() - next.len();
      (removed, guard.replace(next))
    };
    event!(Level::DEBUG, %owner, removed, revision, "Owner lines cleared.");
    self.listeners.notify(&CartEvent::Cleared {
      owner: owner.clone(),
      removed,
      revision,
    });
    removed
  }

  /// Puts `owner`'s lines back as they were in `snapshot`. Other owners keep
  /// their current lines.
  pub(crate) fn restore(&self, snapshot: &CartSnapshot, owner: &OwnerId) -> u64 {
    let mut guard = self.state.write();
    let next = apply::restore_owner_lines(&guard.lines, &snapshot.lines, owner);
    guard.replace(next)
  }

  pub(crate) fn notify(&self, event: &CartEvent) {
    self.listeners.notify(event);
  }
}
