// basket/src/engine/mod.rs

//! Defines the `CartEngine<R>` struct, its construction, the shared
//! snapshot/apply/persist/settle flow and the public cart operations.

pub mod definition;
pub mod execution;
pub mod line_locks;
pub mod loading;
pub mod operations;

pub use definition::CartEngine;
pub use loading::{LoadingFlags, LoadingGuard};
