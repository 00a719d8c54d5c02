// basket/src/engine/execution.rs

//! The flow every mutating operation runs through: mark loading, optionally
//! wait for the line, check the cap and apply under the store lock, persist
//! remotely, then commit or roll back.

use super::definition::CartEngine;
use crate::error::CartError;
use crate::model::{CartLine, OwnerId, ProductId};
use crate::mutation::{Confirmation, MutationKind};
use crate::remote::CartRemote;
use std::future::Future;
use tracing::{event, span, Level};

impl<R> CartEngine<R>
where
  R: CartRemote,
{
  /// The bound owner, or `None` after logging a warning.
  ///
  /// An unbound engine is reachable through ordinary navigation races (a click
  /// landing after sign-out), so it is not an error.
  pub(crate) fn require_owner(&self, operation: &'static str) -> Option<OwnerId> {
    let owner = self.owner();
    if owner.is_none() {
      event!(
        Level::WARN,
        operation,
        "Cart mutation attempted without an authenticated owner; ignoring."
      );
    }
    owner
  }

  /// Runs one optimistic mutation to completion.
  ///
  /// `optimistic` is applied to the store synchronously; `persist` is only
  /// polled afterwards. On `Err` the owner's lines are restored from the
  /// snapshot taken just before `optimistic` and the remote's error is
  /// returned as is.
  pub(crate) async fn reconcile<F, Fut>(
    &self,
    kind: MutationKind,
    owner: &OwnerId,
    product_id: ProductId,
    optimistic: F,
    persist: Fut,
  ) -> Result<Confirmation, R::Error>
  where
    F: FnOnce(&[CartLine]) -> Vec<CartLine>,
    Fut: Future<Output = Result<Confirmation, R::Error>>,
  {
    let _loading = self.loading.enter(kind);

    let _line_guard = if self.config.serialize_line_mutations {
      event!(Level::TRACE, %kind, %product_id, "Waiting for line lock.");
      Some(self.line_locks.acquire(owner, product_id).await)
    } else {
      None
    };

    let limit = match kind {
      MutationKind::Add | MutationKind::Increase => self.config.max_line_quantity,
      MutationKind::Decrease | MutationKind::Remove => None,
    };

    // The cap is checked against the same locked state the change is applied to.
    let pending = {
      let apply_span = span!(Level::DEBUG, "apply_optimistic", %kind, %product_id);
      let _apply_guard = apply_span.enter();
      self
        .store
        .try_begin(kind, owner.clone(), product_id, |lines| -> Result<Vec<CartLine>, CartError> {
          if let Some(limit) = limit {
            check_quantity_limit(lines, product_id, owner, limit)?;
          }
          Ok(optimistic(lines))
        })?
    };

    match persist.await {
      Ok(confirmation) => {
        pending.commit();
        Ok(confirmation)
      }
      Err(error) => {
        event!(
          Level::WARN,
          %kind,
          %owner,
          %product_id,
          %error,
          "Remote rejected cart mutation; restoring pre-mutation snapshot."
        );
        pending.rollback();
        Err(error)
      }
    }
  }
}

fn check_quantity_limit(lines: &[CartLine], product_id: ProductId, owner: &OwnerId, limit: u32) -> Result<(), CartError> {
  let current = lines
    .iter()
    .find(|line| line.is_for(product_id, owner))
    .map_or(0, |line| line.quantity);
  if current >= limit {
    event!(Level::WARN, %product_id, %owner, current, limit, "Quantity limit reached.");
    return Err(CartError::QuantityLimit { product_id, limit });
  }
  Ok(())
}
