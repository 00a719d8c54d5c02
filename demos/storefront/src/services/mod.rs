// demos/storefront/src/services/mod.rs

//! Backends the storefront session drives: the cart remote plus order placement.

pub mod checkout;
pub mod memory_backend;
pub mod pg_backend;

pub use checkout::CheckoutBackend;
pub use memory_backend::MemoryStorefront;
pub use pg_backend::PgStorefront;
