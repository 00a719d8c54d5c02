// basket/src/engine/line_locks.rs

use crate::model::{OwnerId, ProductId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LineKey = (OwnerId, ProductId);

/// One async mutex per `(owner, product)` line, created on demand.
#[derive(Debug, Default)]
pub(crate) struct LineLocks {
  locks: Mutex<HashMap<LineKey, Arc<AsyncMutex<()>>>>,
}

impl LineLocks {
  /// Waits until no other holder has the line. The returned guard releases it.
  pub(crate) async fn acquire(&self, owner: &OwnerId, product_id: ProductId) -> OwnedMutexGuard<()> {
    let lock = {
      let mut locks = self.locks.lock();
      // Entries nobody holds or waits on.
      locks.retain(|_, lock| Arc::strong_count(lock) > 1);
      Arc::clone(locks.entry((owner.clone(), product_id)).or_default())
    };
    lock.lock_owned().await
  }

  pub(crate) fn len(&self) -> usize {
    self.locks.lock().len()
  }
}
