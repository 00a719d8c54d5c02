// src/lib.rs

//! Basket: an optimistic, rollback-capable shopping cart state engine.
//!
//! Basket keeps the cart a user sees in step with a remote persistence
//! backend while letting every change show up immediately:
//!  - Each mutation is applied to an in-memory store before the remote call.
//!  - A snapshot taken just before the change is restored if the remote rejects it.
//!  - Remote errors are handed back to the caller untouched.
//!  - Per-kind loading flags and change listeners feed a reactive UI.
//!  - The store is an explicit handle, so tests and sessions get isolated instances.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod mutation;
pub mod remote;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::model::{CartLine, CartSnapshot, OwnerId, ProductId, ProductSummary};

pub use crate::mutation::{Confirmation, MutationKind, MutationOutcome, PendingMutation};

pub use crate::store::{CartEvent, CartStore, Subscription};

pub use crate::engine::{CartEngine, LoadingFlags, LoadingGuard};

pub use crate::catalog::{Catalog, InMemoryCatalog};
pub use crate::remote::{CartRemote, MemoryRemote, RemoteError, RemoteOp};

pub use crate::config::EngineConfig;
pub use crate::error::{CartError, CartResult};

/*
    Core Workflow:
    1. Build a `CartStore` (one per client session, or share one between engines).
    2. Implement `CartRemote` for your backend, or use `MemoryRemote`.
    3. Create a `CartEngine::new(store, Arc::new(remote), Arc::new(catalog))`.
    4. Call `engine.bind_owner(user_id)` on sign-in and `engine.load().await` to hydrate.
    5. Call `add_item` / `increase_quantity` / `decrease_quantity` / `remove_item`.
       The store changes at once; on a remote error it snaps back and the error is returned.
    6. Render from `engine.lines()`, `engine.item_count()`, `engine.total_price_cents()`
       and `engine.loading()`, or subscribe to `CartEvent`s on the store.
*/
