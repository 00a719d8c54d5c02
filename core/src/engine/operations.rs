// basket/src/engine/operations.rs

//! The public cart operations. Each is scoped to the bound owner and is a
//! silent no-op (returning `MutationOutcome::Unauthenticated`) when none is bound.

use super::definition::CartEngine;
use crate::error::CartError;
use crate::model::ProductId;
use crate::mutation::{apply, Confirmation, MutationKind, MutationOutcome};
use crate::remote::CartRemote;
use tracing::{event, field, instrument, Level, Span};

impl<R> CartEngine<R>
where
  R: CartRemote,
{
  /// Adds one unit of `product_id`, creating the line at quantity 1 if needed.
  ///
  /// The product must exist in the catalog; otherwise `CartError::UnknownProduct`
  /// is returned before anything is applied.
  #[instrument(name = "CartEngine::add_item", skip(self), fields(owner = field::Empty), err(Display))]
  pub async fn add_item(&self, product_id: ProductId) -> Result<MutationOutcome, R::Error> {
    let Some(owner) = self.require_owner("add_item") else {
      return Ok(MutationOutcome::Unauthenticated);
    };
    Span::current().record("owner", field::display(&owner));

    let product = self
      .catalog
      .product(product_id)
      .ok_or(CartError::UnknownProduct { product_id })?;

    let confirmation = self
      .reconcile(
        MutationKind::Add,
        &owner,
        product_id,
        |lines| apply::add_line(lines, &product, &owner),
        async { self.remote.add(product_id, &owner).await.map(Confirmation::Line) },
      )
      .await?;
    event!(Level::INFO, %product_id, "Item added to cart.");
    Ok(MutationOutcome::Committed(confirmation))
  }

  #[instrument(name = "CartEngine::increase_quantity", skip(self), fields(owner = field::Empty), err(Display))]
  pub async fn increase_quantity(&self, product_id: ProductId) -> Result<MutationOutcome, R::Error> {
    let Some(owner) = self.require_owner("increase_quantity") else {
      return Ok(MutationOutcome::Unauthenticated);
    };
    Span::current().record("owner", field::display(&owner));

    let confirmation = self
      .reconcile(
        MutationKind::Increase,
        &owner,
        product_id,
        |lines| apply::increase_line(lines, product_id, &owner),
        async { self.remote.increase(product_id, &owner).await.map(Confirmation::Line) },
      )
      .await?;
    Ok(MutationOutcome::Committed(confirmation))
  }

  /// Removes one unit. A line at quantity 1 disappears instead of reaching zero.
  ///
  /// With no matching line the optimistic step changes nothing, but the remote
  /// is still called and its answer decides whether to roll back.
  #[instrument(name = "CartEngine::decrease_quantity", skip(self), fields(owner = field::Empty), err(Display))]
  pub async fn decrease_quantity(&self, product_id: ProductId) -> Result<MutationOutcome, R::Error> {
    let Some(owner) = self.require_owner("decrease_quantity") else {
      return Ok(MutationOutcome::Unauthenticated);
    };
    Span::current().record("owner", field::display(&owner));

    let confirmation = self
      .reconcile(
        MutationKind::Decrease,
        &owner,
        product_id,
        |lines| apply::decrease_line(lines, product_id, &owner),
        self.remote.decrease(product_id, &owner),
      )
      .await?;
    Ok(MutationOutcome::Committed(confirmation))
  }

  #[instrument(name = "CartEngine::remove_item", skip(self), fields(owner = field::Empty), err(Display))]
  pub async fn remove_item(&self, product_id: ProductId) -> Result<MutationOutcome, R::Error> {
    let Some(owner) = self.require_owner("remove_item") else {
      return Ok(MutationOutcome::Unauthenticated);
    };
    Span::current().record("owner", field::display(&owner));

    let confirmation = self
      .reconcile(
        MutationKind::Remove,
        &owner,
        product_id,
        |lines| apply::remove_line(lines, product_id, &owner),
        async {
          self
            .remote
            .remove(product_id, &owner)
            .await
            .map(|()| Confirmation::Removed)
        },
      )
      .await?;
    event!(Level::INFO, %product_id, "Item removed from cart.");
    Ok(MutationOutcome::Committed(confirmation))
  }

  /// Drops the bound owner's lines locally. Returns how many were removed.
  ///
  /// Best effort: no snapshot, no remote call, nothing to roll back. Meant for
  /// after order placement, when the durable cart has already been emptied.
  pub fn clear_cart(&self) -> usize {
    let Some(owner) = self.require_owner("clear_cart") else {
      return 0;
    };
    let removed = self.store.clear_owner(&owner);
    event!(Level::INFO, %owner, removed, "Cart cleared.");
    removed
  }

  /// Replaces the bound owner's lines with the durable copy.
  ///
  /// Returns the number of lines loaded (0 when no owner is bound). On failure
  /// the store is left as it was.
  #[instrument(name = "CartEngine::load", skip(self), fields(owner = field::Empty), err(Display))]
  pub async fn load(&self) -> Result<usize, R::Error> {
    let Some(owner) = self.require_owner("load") else {
      return Ok(0);
    };
    Span::current().record("owner", field::display(&owner));

    let durable = self.remote.fetch(&owner).await?;
    self.store.replace_owner_lines(&owner, durable);
    let loaded = self.store.lines_for(&owner).len();
    event!(Level::INFO, %owner, loaded, "Cart loaded from remote.");
    Ok(loaded)
  }
}
