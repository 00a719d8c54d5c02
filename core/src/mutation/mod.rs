// basket/src/mutation/mod.rs

//! Optimistic mutations: their kinds and outcomes, the pure line transforms,
//! and the pending value that settles a mutation by commit or rollback.

pub mod apply;
pub mod kind;
pub mod pending;

pub use kind::{Confirmation, MutationKind, MutationOutcome};
pub use pending::PendingMutation;
