// basket/src/model/snapshot.rs

use super::CartLine;
use std::sync::Arc;

/// An immutable copy of every cart line at one store revision.
///
/// Cloning is cheap: the lines are shared with the state they were taken from,
/// which is never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
  pub(crate) lines: Arc<[CartLine]>,
  pub(crate) revision: u64,
}

impl CartSnapshot {
  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  pub fn len(&self) -> usize {
    self.lines.len()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }
}
