// basket/src/mutation/pending.rs

use super::MutationKind;
use crate::model::{CartSnapshot, OwnerId, ProductId};
use crate::store::{CartEvent, CartStore};
use tracing::{event, Level};

/// An optimistic change that has been applied and is waiting on the remote.
///
/// Carries the snapshot taken just before the change. Settling consumes the
/// value, so a pending mutation is committed or rolled back exactly once.
///
/// Rollback restores the owner's lines from the snapshot and leaves other
/// owners' lines as they currently are. If another mutation of the same owner
/// was applied after this one was begun, restoring discards that change too
/// (last snapshot wins).
#[derive(Debug)]
#[must_use = "a pending mutation must be committed or rolled back"]
pub struct PendingMutation {
  pub(crate) kind: MutationKind,
  pub(crate) owner: OwnerId,
  pub(crate) product_id: ProductId,
  pub(crate) snapshot: CartSnapshot,
  pub(crate) store: CartStore,
}

impl PendingMutation {
  pub fn kind(&self) -> MutationKind {
    self.kind
  }

  pub fn owner(&self) -> &OwnerId {
    &self.owner
  }

  pub fn product_id(&self) -> ProductId {
    self.product_id
  }

  /// The state as it was immediately before this mutation was applied.
  pub fn snapshot(&self) -> &CartSnapshot {
    &self.snapshot
  }

  /// Keeps the optimistic state and discards the snapshot.
  pub fn commit(self) {
    event!(Level::DEBUG, kind = %self.kind, owner = %self.owner, product_id = %self.product_id, "Mutation committed.");
    self.store.notify(&CartEvent::Committed {
      kind: self.kind,
      owner: self.owner,
      product_id: self.product_id,
    });
  }

  /// Restores the owner's lines from the snapshot. Returns the new revision.
  pub fn rollback(self) -> u64 {
    let revision = self.store.restore(&self.snapshot, &self.owner);
    event!(
      Level::DEBUG,
      kind = %self.kind,
      owner = %self.owner,
      product_id = %self.product_id,
      restored_revision = self.snapshot.revision,
      revision,
      "Mutation rolled back."
    );
    self.store.notify(&CartEvent::RolledBack {
      kind: self.kind,
      owner: self.owner,
      product_id: self.product_id,
      revision,
    });
    revision
  }
}
