// basket/src/model/mod.rs

//! Cart data model: identifiers, lines, catalog summaries and snapshots.

pub mod line;
pub mod snapshot;

pub use line::{CartLine, OwnerId, ProductId, ProductSummary};
pub use snapshot::CartSnapshot;
