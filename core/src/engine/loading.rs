// basket/src/engine/loading.rs

use crate::mutation::MutationKind;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-kind "in flight" indicators for spinners and disabled buttons.
///
/// A flag reads true while at least one operation of that kind is running.
#[derive(Debug, Default)]
pub struct LoadingFlags {
  add: AtomicUsize,
  increase: AtomicUsize,
  decrease: AtomicUsize,
  remove: AtomicUsize,
}

impl LoadingFlags {
  fn counter(&self, kind: MutationKind) -> &AtomicUsize {
    match kind {
      MutationKind::Add => &self.add,
      MutationKind::Increase => &self.increase,
      MutationKind::Decrease => &self.decrease,
      MutationKind::Remove => &self.remove,
    }
  }

  pub fn is_loading(&self, kind: MutationKind) -> bool {
    self.in_flight(kind) > 0
  }

  pub fn in_flight(&self, kind: MutationKind) -> usize {
    self.counter(kind).load(Ordering::Acquire)
  }

  pub fn any(&self) -> bool {
    MutationKind::ALL.iter().any(|kind| self.is_loading(*kind))
  }

  /// Marks one operation of `kind` as in flight until the guard is dropped.
  pub fn enter(&self, kind: MutationKind) -> LoadingGuard<'_> {
    self.counter(kind).fetch_add(1, Ordering::AcqRel);
    LoadingGuard { flags: self, kind }
  }
}

/// Clears its flag on drop, whichever way the operation exits.
#[derive(Debug)]
#[must_use = "the loading flag is cleared as soon as the guard is dropped"]
pub struct LoadingGuard<'a> {
  flags: &'a LoadingFlags,
  kind: MutationKind,
}

impl Drop for LoadingGuard<'_> {
  fn drop(&mut self) {
    self.flags.counter(self.kind).fetch_sub(1, Ordering::AcqRel);
  }
}
