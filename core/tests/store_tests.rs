// tests/store_tests.rs
mod common;

use basket::{CartEvent, CartStore, MutationKind};
use common::*;
use parking_lot::Mutex;
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_store_clones_share_state() {
  setup_tracing();
  let store = CartStore::new();
  let handle = store.clone();

  store.replace_owner_lines(&u1(), vec![line(WIDGET, "u1", 1)]);

  assert_eq!(handle.lines_for(&u1()), vec![line(WIDGET, "u1", 1)]);
  assert_eq!(handle.revision(), 1);
}

#[tokio::test]
#[serial]
async fn test_separate_stores_are_isolated() {
  setup_tracing();
  let first = CartStore::new();
  let second = CartStore::new();

  first.replace_owner_lines(&u1(), vec![line(WIDGET, "u1", 3)]);

  assert!(second.lines_for(&u1()).is_empty());
  assert_eq!(second.revision(), 0);
}

#[tokio::test]
#[serial]
async fn test_totals_are_per_owner_and_recomputed() {
  setup_tracing();
  let store = CartStore::with_lines(vec![
    line(WIDGET, "u1", 2), // 2 x 1250
    line(GADGET, "u1", 3), // 3 x 399
    line(WIDGET, "u2", 7),
  ]);

  assert_eq!(store.item_count(&u1()), 5);
  assert_eq!(store.total_price_cents(&u1()), 2 * 1250 + 3 * 399);
  assert_eq!(store.item_count(&u2()), 7);
  assert_eq!(store.total_price_cents(&u2()), 7 * 1250);

  store.replace_owner_lines(&u1(), vec![line(GIZMO, "u1", 1)]);
  assert_eq!(store.item_count(&u1()), 1);
  assert_eq!(store.total_price_cents(&u1()), 2000);
  assert_eq!(store.item_count(&u2()), 7);
}

#[tokio::test]
#[serial]
async fn test_operations_never_touch_another_owners_line() {
  setup_tracing();
  let store = CartStore::new();
  let catalog = catalog();
  let remote = Arc::new(basket::MemoryRemote::new(catalog.clone()));
  let alice = basket::CartEngine::new(store.clone(), remote.clone(), catalog.clone());
  let bob = basket::CartEngine::new(store.clone(), remote, catalog);
  alice.bind_owner("u1");
  bob.bind_owner("u2");

  bob.add_item(WIDGET).await.unwrap();
  bob.add_item(WIDGET).await.unwrap();

  alice.add_item(WIDGET).await.unwrap();
  alice.increase_quantity(WIDGET).await.unwrap();
  alice.decrease_quantity(WIDGET).await.unwrap();
  alice.decrease_quantity(WIDGET).await.unwrap();
  alice.add_item(GADGET).await.unwrap();
  alice.remove_item(GADGET).await.unwrap();
  alice.clear_cart();

  assert!(alice.lines().is_empty());
  assert_eq!(bob.lines(), vec![line(WIDGET, "u2", 2)]);
  assert_eq!(bob.item_count(), 2);
  assert_eq!(bob.total_price_cents(), 2500);
}

#[tokio::test]
#[serial]
async fn test_snapshot_is_unaffected_by_later_changes() {
  setup_tracing();
  let store = CartStore::with_lines(vec![line(WIDGET, "u1", 1)]);
  let snapshot = store.snapshot();

  store.replace_owner_lines(&u1(), vec![line(WIDGET, "u1", 9)]);
  store.clear_owner(&u1());

  assert_eq!(snapshot.lines(), &[line(WIDGET, "u1", 1)]);
  assert_eq!(snapshot.revision(), 0);
  assert_eq!(store.revision(), 2);
}

#[tokio::test]
#[serial]
async fn test_replace_owner_lines_merges_duplicates_and_drops_zero() {
  setup_tracing();
  let store = CartStore::with_lines(vec![line(GADGET, "u2", 1)]);

  store.replace_owner_lines(
    &u1(),
    vec![
      line(WIDGET, "u1", 1),
      line(WIDGET, "u1", 2),
      line(GIZMO, "u1", 0),
      line(GADGET, "someone-else", 4),
    ],
  );

  assert_eq!(
    store.lines_for(&u1()),
    vec![line(WIDGET, "u1", 3), line(GADGET, "u1", 4)]
  );
  assert_eq!(store.lines_for(&u2()), vec![line(GADGET, "u2", 1)]);
}

#[tokio::test]
#[serial]
async fn test_pending_mutation_commit_and_rollback() {
  setup_tracing();
  let store = CartStore::with_lines(vec![line(WIDGET, "u1", 1)]);

  let pending = store.begin(MutationKind::Increase, u1(), WIDGET, |lines| {
    basket::mutation::apply::increase_line(lines, WIDGET, &u1())
  });
  assert_eq!(pending.kind(), MutationKind::Increase);
  assert_eq!(pending.snapshot().lines(), &[line(WIDGET, "u1", 1)]);
  assert_eq!(store.lines_for(&u1()), vec![line(WIDGET, "u1", 2)]);
  pending.commit();
  assert_eq!(store.lines_for(&u1()), vec![line(WIDGET, "u1", 2)]);

  let pending = store.begin(MutationKind::Remove, u1(), WIDGET, |lines| {
    basket::mutation::apply::remove_line(lines, WIDGET, &u1())
  });
  assert!(store.lines_for(&u1()).is_empty());
  let revision = pending.rollback();
  assert_eq!(store.lines_for(&u1()), vec![line(WIDGET, "u1", 2)]);
  assert_eq!(revision, store.revision());
}

#[tokio::test]
#[serial]
async fn test_cancelled_subscription_stops_receiving() {
  setup_tracing();
  let store = CartStore::new();
  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  let subscription = store.subscribe(move |event| sink.lock().push(event.clone()));

  store.replace_owner_lines(&u1(), vec![line(WIDGET, "u1", 1)]);
  subscription.cancel();
  store.clear_owner(&u1());

  let seen = seen.lock().clone();
  assert_eq!(seen, vec![CartEvent::Replaced { owner: u1(), revision: 1 }]);
}

#[tokio::test]
#[serial]
async fn test_refused_try_begin_applies_nothing() {
  setup_tracing();
  let store = CartStore::with_lines(vec![line(WIDGET, "u1", 3)]);
  let events = record_events(&store);
  let before = store.snapshot();

  let result = store.try_begin(MutationKind::Add, u1(), WIDGET, |lines| {
    if lines.iter().any(|l| l.quantity >= 3) {
      Err("full")
    } else {
      Ok(lines.to_vec())
    }
  });

  assert!(matches!(result, Err("full")));
  assert_eq!(store.snapshot(), before);
  assert!(events.lock().is_empty());
}

#[tokio::test]
#[serial]
async fn test_rollback_restores_only_its_owner() {
  setup_tracing();
  let store = CartStore::with_lines(vec![line(WIDGET, "u1", 1), line(GADGET, "u2", 1)]);

  let pending = store.begin(MutationKind::Remove, u1(), WIDGET, |lines| {
    basket::mutation::apply::remove_line(lines, WIDGET, &u1())
  });
  store.replace_owner_lines(&u2(), vec![line(GADGET, "u2", 4), line(GIZMO, "u2", 1)]);
  pending.rollback();

  assert_eq!(
    store.snapshot().lines(),
    &[line(WIDGET, "u1", 1), line(GADGET, "u2", 4), line(GIZMO, "u2", 1)]
  );
}
