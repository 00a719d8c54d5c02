// basket/src/store/mod.rs

//! The shared cart state container, its derived views and change notification.

pub mod cart_store;
pub mod events;
pub mod views;

pub use cart_store::CartStore;
pub use events::{CartEvent, Subscription};
