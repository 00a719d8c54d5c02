// demos/storefront/src/session.rs

//! A scripted shopping session: the calls a storefront UI would make as the
//! shopper signs in, edits the cart and checks out.

use crate::errors::AppError;
use crate::models::OrderReceipt;
use crate::services::CheckoutBackend;
use basket::{CartEngine, MutationKind, MutationOutcome, ProductId};
use std::fmt::Display;
use tracing::{event, instrument, Level};

/// Not in any catalog; adding it surfaces an unknown-product toast.
const MISSING_PRODUCT: ProductId = ProductId(-1);

#[instrument(skip(engine, picks), fields(picks = picks.len()), err(Display))]
pub async fn run_session<B>(engine: &CartEngine<B>, shopper: &str, picks: &[ProductId]) -> Result<Option<OrderReceipt>, AppError>
where
  B: CheckoutBackend,
  AppError: From<B::Error>,
{
  let subscription = engine.store().subscribe(|change| {
    event!(Level::DEBUG, ?change, "Cart changed.");
  });

  // Signed out: the engine refuses to touch the cart.
  if let Some(first) = picks.first() {
    let outcome = engine.add_item(*first).await?;
    event!(Level::INFO, ?outcome, "Add attempted before sign-in.");
  }

  engine.bind_owner(shopper);
  let hydrated = engine.load().await?;
  event!(Level::INFO, %shopper, hydrated, "Signed in and loaded durable cart.");

  for product_id in picks {
    report(MutationKind::Add, *product_id, engine.add_item(*product_id).await);
  }

  if let [first, second, ..] = picks {
    let loading = engine.loading();
    let (increased, added, ()) = tokio::join!(
      engine.increase_quantity(*first),
      engine.add_item(*second),
      async {
        tokio::task::yield_now().await;
        event!(
          Level::INFO,
          increasing = loading.is_loading(MutationKind::Increase),
          adding = loading.is_loading(MutationKind::Add),
          item_count = engine.item_count(),
          "Optimistic state while both requests are in flight."
        );
      }
    );
    report(MutationKind::Increase, *first, increased);
    report(MutationKind::Add, *second, added);

    report(MutationKind::Decrease, *first, engine.decrease_quantity(*first).await);
  }

  report(MutationKind::Add, MISSING_PRODUCT, engine.add_item(MISSING_PRODUCT).await);

  if let Some(last) = picks.last() {
    report(MutationKind::Remove, *last, engine.remove_item(*last).await);
  }

  render(engine);

  let lines = engine.lines();
  let receipt = match engine.owner() {
    Some(owner) if !lines.is_empty() => {
      let receipt = engine.remote().place_order(&owner, &lines).await?;
      let cleared = engine.clear_cart();
      event!(Level::INFO, order_id = %receipt.id, cleared, "Checked out.");
      Some(receipt)
    }
    _ => None,
  };

  engine.unbind_owner();
  subscription.cancel();
  Ok(receipt)
}

/// Logs the outcome the way a UI would toast it.
fn report<E: Display>(kind: MutationKind, product_id: ProductId, result: Result<MutationOutcome, E>) {
  match result {
    Ok(MutationOutcome::Committed(confirmation)) => {
      event!(Level::INFO, %kind, %product_id, ?confirmation, "Cart updated.");
    }
    Ok(MutationOutcome::Unauthenticated) => {
      event!(Level::WARN, %kind, %product_id, "Sign in to edit your cart.");
    }
    Err(error) => {
      event!(Level::WARN, %kind, %product_id, %error, "Could not update your cart; changes were undone.");
    }
  }
}

fn render<B: CheckoutBackend>(engine: &CartEngine<B>) {
  for line in engine.lines() {
    event!(
      Level::INFO,
      product_id = %line.product_id,
      title = %line.title,
      quantity = line.quantity,
      subtotal_cents = line.subtotal_cents(),
      "Cart line."
    );
  }
  event!(
    Level::INFO,
    item_count = engine.item_count(),
    total_cents = engine.total_price_cents(),
    "Cart totals."
  );
}
