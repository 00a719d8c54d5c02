// tests/concurrency_tests.rs
mod common;

use basket::{CartEngine, CartError, CartEvent, CartStore, EngineConfig, MemoryRemote, MutationKind, RemoteError, RemoteOp};
use common::*;
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_loading_flag_spans_remote_call() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::default());
  let release = engine.remote().gate(RemoteOp::Add, WIDGET);
  let loading = engine.loading();

  let (result, ()) = tokio::join!(engine.add_item(WIDGET), async {
    wait_until(|| engine.remote().waiting(RemoteOp::Add) == 1).await;
    // Optimistic state is visible before the remote settles.
    assert!(loading.is_loading(MutationKind::Add));
    assert!(!loading.is_loading(MutationKind::Remove));
    assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 1)]);
    release.send(()).unwrap();
  });

  assert!(result.unwrap().is_committed());
  assert!(!loading.is_loading(MutationKind::Add));
}

#[tokio::test]
#[serial]
async fn test_loading_flag_cleared_after_rejection() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::default());
  engine.remote().inner.fail_next(RemoteOp::Add);
  let release = engine.remote().gate(RemoteOp::Add, GADGET);
  let loading = engine.loading();

  let (result, ()) = tokio::join!(engine.add_item(GADGET), async {
    wait_until(|| engine.remote().waiting(RemoteOp::Add) == 1).await;
    assert!(loading.is_loading(MutationKind::Add));
    release.send(()).unwrap();
  });

  assert!(result.is_err());
  assert!(!loading.any());
  assert!(engine.lines().is_empty());
}

// A rollback restores the owner's lines from the snapshot taken when its own mutation began,
// discarding a concurrent mutation on another line that the remote accepted.
#[tokio::test]
#[serial]
async fn test_late_rollback_discards_concurrent_committed_add() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::default());
  engine.add_item(WIDGET).await.unwrap();

  engine.remote().inner.fail_next(RemoteOp::Increase);
  let release_increase = engine.remote().gate(RemoteOp::Increase, WIDGET);
  let release_add = engine.remote().gate(RemoteOp::Add, GADGET);

  let (increase, add, ()) = tokio::join!(engine.increase_quantity(WIDGET), engine.add_item(GADGET), async {
    wait_until(|| {
      engine.remote().waiting(RemoteOp::Increase) == 1 && engine.remote().waiting(RemoteOp::Add) == 1
    })
    .await;
    assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 2), line(GADGET, "u1", 1)]);

    release_add.send(()).unwrap();
    wait_until(|| !engine.loading().is_loading(MutationKind::Add)).await;
    release_increase.send(()).unwrap();
  });

  assert!(add.unwrap().is_committed());
  assert!(increase.is_err());
  // The gadget was persisted but the increase's rollback removed it locally.
  assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 1)]);
  assert_eq!(
    engine.remote().inner.durable_lines(&u1()),
    vec![line(GADGET, "u1", 1), line(WIDGET, "u1", 1)]
  );
}

#[tokio::test]
#[serial]
async fn test_same_line_race_diverges_without_serialization() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::default());
  engine.add_item(WIDGET).await.unwrap();

  engine.remote().inner.fail_next(RemoteOp::Increase);
  let release_increase = engine.remote().gate(RemoteOp::Increase, WIDGET);
  let release_decrease = engine.remote().gate(RemoteOp::Decrease, WIDGET);

  let (increase, decrease, ()) =
    tokio::join!(engine.increase_quantity(WIDGET), engine.decrease_quantity(WIDGET), async {
      wait_until(|| {
        engine.remote().waiting(RemoteOp::Increase) == 1 && engine.remote().waiting(RemoteOp::Decrease) == 1
      })
      .await;
      // 1 -> 2 (increase) -> 1 (decrease), both still in flight.
      assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 1)]);

      release_increase.send(()).unwrap();
      wait_until(|| !engine.loading().is_loading(MutationKind::Increase)).await;
      release_decrease.send(()).unwrap();
    });

  assert!(increase.is_err());
  assert!(decrease.unwrap().is_committed());
  // Locally the line survives at 1; remotely the decrease removed it.
  assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 1)]);
  assert!(engine.remote().inner.durable_lines(&u1()).is_empty());
}

#[tokio::test]
#[serial]
async fn test_line_serialization_keeps_same_line_race_convergent() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::new().with_line_serialization(true));
  engine.add_item(WIDGET).await.unwrap();

  engine.remote().inner.fail_next(RemoteOp::Increase);
  let release_increase = engine.remote().gate(RemoteOp::Increase, WIDGET);

  let (increase, decrease, ()) =
    tokio::join!(engine.increase_quantity(WIDGET), engine.decrease_quantity(WIDGET), async {
      wait_until(|| {
        engine.remote().waiting(RemoteOp::Increase) == 1 && engine.loading().is_loading(MutationKind::Decrease)
      })
      .await;
      // The decrease is queued behind the increase and has not applied yet.
      assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 2)]);
      release_increase.send(()).unwrap();
    });

  assert!(increase.is_err());
  assert!(decrease.unwrap().is_committed());
  assert!(engine.lines().is_empty());
  assert!(engine.remote().inner.durable_lines(&u1()).is_empty());
}

#[tokio::test]
#[serial]
async fn test_different_lines_are_not_serialized() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::new().with_line_serialization(true));
  let release_widget = engine.remote().gate(RemoteOp::Add, WIDGET);
  let release_gadget = engine.remote().gate(RemoteOp::Add, GADGET);

  let (widget, gadget, ()) = tokio::join!(engine.add_item(WIDGET), engine.add_item(GADGET), async {
    wait_until(|| engine.remote().waiting(RemoteOp::Add) == 2).await;
    assert_eq!(engine.loading().in_flight(MutationKind::Add), 2);
    release_gadget.send(()).unwrap();
    release_widget.send(()).unwrap();
  });

  assert!(widget.unwrap().is_committed());
  assert!(gadget.unwrap().is_committed());
  assert_eq!(engine.item_count(), 2);
}

// Two engines share one store. A rollback for u1 must leave the line u2
// committed in the meantime.
#[tokio::test]
#[serial]
async fn test_rollback_keeps_other_owners_concurrent_lines() {
  setup_tracing();
  let catalog = catalog();
  let store = CartStore::new();
  let remote = Arc::new(GatedRemote::new(MemoryRemote::new(catalog.clone())));
  let first = CartEngine::new(store.clone(), remote.clone(), catalog.clone());
  first.bind_owner("u1");
  let second = CartEngine::new(store.clone(), remote.clone(), catalog);
  second.bind_owner("u2");

  first.add_item(WIDGET).await.unwrap();
  remote.inner.fail_next(RemoteOp::Increase);
  let release_increase = remote.gate(RemoteOp::Increase, WIDGET);

  let (increase, ()) = tokio::join!(first.increase_quantity(WIDGET), async {
    wait_until(|| remote.waiting(RemoteOp::Increase) == 1).await;
    assert!(second.add_item(GADGET).await.unwrap().is_committed());
    assert_eq!(second.item_count(), 1);
    release_increase.send(()).unwrap();
  });

  assert!(increase.is_err());
  assert_eq!(first.lines(), vec![line(WIDGET, "u1", 1)]);
  assert_eq!(second.lines(), vec![line(GADGET, "u2", 1)]);
  assert_eq!(second.item_count(), 1);
  assert_eq!(store.snapshot().lines(), &[line(WIDGET, "u1", 1), line(GADGET, "u2", 1)]);
  assert_eq!(remote.inner.durable_lines(&u2()), vec![line(GADGET, "u2", 1)]);
}

#[tokio::test]
#[serial]
async fn test_dropped_add_clears_loading_and_keeps_optimistic_line() {
  setup_tracing();
  let engine = gated_engine_for("u1", EngineConfig::default());
  let events = record_events(engine.store());
  // Never released: the add stays in flight until its future is dropped.
  let _release = engine.remote().gate(RemoteOp::Add, WIDGET);
  let loading = engine.loading();

  tokio::select! {
    biased;
    _ = engine.add_item(WIDGET) => panic!("gated add settled without being released"),
    _ = wait_until(|| engine.remote().waiting(RemoteOp::Add) == 1) => {}
  }

  assert!(!loading.is_loading(MutationKind::Add));
  assert!(!loading.any());
  assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 1)]);
  assert!(engine.remote().inner.durable_lines(&u1()).is_empty());
  let events = events.lock();
  assert_eq!(events.len(), 1);
  assert!(matches!(events[0], CartEvent::Applied { kind: MutationKind::Add, .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_quantity_limit_holds_under_parallel_adds() {
  setup_tracing();
  let catalog = catalog();
  let remote = Arc::new(MemoryRemote::new(catalog.clone()));
  let engine = Arc::new(
    CartEngine::with_config(CartStore::new(), remote, catalog, EngineConfig::new().with_max_line_quantity(3)).unwrap(),
  );
  engine.bind_owner("u1");

  let tasks: Vec<_> = (0..16)
    .map(|_| {
      let engine = engine.clone();
      tokio::spawn(async move { engine.add_item(WIDGET).await })
    })
    .collect();

  let mut committed = 0;
  for task in tasks {
    match task.await.unwrap() {
      Ok(outcome) if outcome.is_committed() => committed += 1,
      Ok(outcome) => panic!("Unexpected outcome {:?}", outcome),
      Err(RemoteError::Cart(CartError::QuantityLimit { limit: 3, .. })) => {}
      Err(other) => panic!("Unexpected error {:?}", other),
    }
  }

  assert_eq!(committed, 3);
  assert_eq!(engine.lines(), vec![line(WIDGET, "u1", 3)]);
  assert_eq!(engine.remote().durable_lines(&u1()), vec![line(WIDGET, "u1", 3)]);
}
