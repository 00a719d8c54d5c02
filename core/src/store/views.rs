// basket/src/store/views.rs

//! Derived views over a line list. Always computed from the lines passed in;
//! nothing here is cached.

use crate::model::{CartLine, OwnerId};

pub fn lines_for(lines: &[CartLine], owner: &OwnerId) -> Vec<CartLine> {
  lines.iter().filter(|line| line.belongs_to(owner)).cloned().collect()
}

/// Sum of quantities across the owner's lines.
pub fn item_count(lines: &[CartLine], owner: &OwnerId) -> u64 {
  lines
    .iter()
    .filter(|line| line.belongs_to(owner))
    .map(|line| u64::from(line.quantity))
    .sum()
}

/// Sum of `quantity * unit_price_cents` across the owner's lines.
pub fn total_price_cents(lines: &[CartLine], owner: &OwnerId) -> i64 {
  lines
    .iter()
    .filter(|line| line.belongs_to(owner))
    .map(CartLine::subtotal_cents)
    .sum()
}
