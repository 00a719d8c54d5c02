// demos/storefront/src/models/mod.rs

//! Contains data structures representing database entities.

pub mod cart_item;
pub mod order;
pub mod order_item;
pub mod product;

// Re-export the model structs for convenient access
pub use cart_item::CartItemRow;
pub use order::OrderReceipt;
pub use order_item::OrderItem;
pub use product::ProductRow;
