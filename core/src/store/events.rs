// basket/src/store/events.rs

//! Change notifications for UI layers that render the cart reactively.

use crate::model::{OwnerId, ProductId};
use crate::mutation::MutationKind;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// A change to the store, delivered to listeners after the write lock is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
  /// An optimistic change was applied and is awaiting the remote.
  Applied {
    kind: MutationKind,
    owner: OwnerId,
    product_id: ProductId,
    revision: u64,
  },
  /// The remote confirmed the change; the optimistic state stands.
  Committed {
    kind: MutationKind,
    owner: OwnerId,
    product_id: ProductId,
  },
  /// The remote rejected the change; the pre-mutation snapshot was restored.
  RolledBack {
    kind: MutationKind,
    owner: OwnerId,
    product_id: ProductId,
    revision: u64,
  },
  /// The owner's lines were replaced from the durable copy.
  Replaced { owner: OwnerId, revision: u64 },
  /// The owner's lines were dropped locally.
  Cleared {
    owner: OwnerId,
    removed: usize,
    revision: u64,
  },
}

pub type Listener = Arc<dyn Fn(&CartEvent) + Send + Sync + 'static>;

#[derive(Default)]
pub(crate) struct Listeners {
  next_id: AtomicU64,
  entries: Mutex<Vec<(u64, Listener)>>,
}

impl Listeners {
  pub(crate) fn add(self: &Arc<Self>, listener: Listener) -> Subscription {
    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
    self.entries.lock().push((id, listener));
    Subscription {
      id,
      listeners: Arc::downgrade(self),
    }
  }

  pub(crate) fn notify(&self, event: &CartEvent) {
    // Listeners may subscribe or cancel from inside the callback.
    let current: Vec<Listener> = self.entries.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
    for listener in current {
      listener(event);
    }
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.lock().len()
  }
}

/// Handle returned by [`CartStore::subscribe`](crate::CartStore::subscribe).
///
/// Dropping it keeps the listener registered; call [`Subscription::cancel`] to remove it.
#[derive(Debug)]
pub struct Subscription {
  id: u64,
  listeners: Weak<Listeners>,
}

impl Subscription {
  pub fn cancel(self) {
    if let Some(listeners) = self.listeners.upgrade() {
      listeners.entries.lock().retain(|(id, _)| *id != self.id);
    }
  }
}
