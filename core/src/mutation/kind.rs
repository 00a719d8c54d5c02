// basket/src/mutation/kind.rs

//! Defines the kinds of cart mutation and the outcome of running one.

use crate::model::CartLine;
use std::fmt;

/// The mutating operations that go through snapshot, apply, persist and settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
  Add,
  Increase,
  Decrease,
  Remove,
}

impl MutationKind {
  pub const ALL: [MutationKind; 4] = [
    MutationKind::Add,
    MutationKind::Increase,
    MutationKind::Decrease,
    MutationKind::Remove,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      MutationKind::Add => "add",
      MutationKind::Increase => "increase",
      MutationKind::Decrease => "decrease",
      MutationKind::Remove => "remove",
    }
  }
}

impl fmt::Display for MutationKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// What the remote collaborator confirmed for a persisted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
  /// The line as persisted after the change.
  Line(CartLine),
  /// The line no longer exists remotely (removal, or a decrement that reached zero).
  Removed,
}

/// Outcome of an engine operation that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
  /// No owner was bound. Nothing was applied and the remote was not called.
  Unauthenticated,
  /// The optimistic change was persisted remotely and kept.
  Committed(Confirmation),
}

impl MutationOutcome {
  pub fn is_committed(&self) -> bool {
    matches!(self, MutationOutcome::Committed(_))
  }

  pub fn confirmation(&self) -> Option<&Confirmation> {
    match self {
      MutationOutcome::Committed(confirmation) => Some(confirmation),
      MutationOutcome::Unauthenticated => None,
    }
  }
}
