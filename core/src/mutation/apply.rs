// basket/src/mutation/apply.rs

//! Pure transforms from one full line list to the next.
//!
//! Each function returns a new vector; the input is never touched. Lines of
//! other owners pass through unchanged and keep their relative order.

use crate::model::{CartLine, OwnerId, ProductId, ProductSummary};

/// Increments the owner's line for `product`, or appends a new line with quantity 1.
pub fn add_line(lines: &[CartLine], product: &ProductSummary, owner: &OwnerId) -> Vec<CartLine> {
  let mut next = lines.to_vec();
  match next.iter_mut().find(|line| line.is_for(product.id, owner)) {
    Some(line) => line.quantity = line.quantity.saturating_add(1),
    None => next.push(CartLine::new(product, owner.clone())),
  }
  next
}

/// Increments the matching line. A missing line stays missing.
pub fn increase_line(lines: &[CartLine], product_id: ProductId, owner: &OwnerId) -> Vec<CartLine> {
  lines
    .iter()
    .cloned()
    .map(|mut line| {
      if line.is_for(product_id, owner) {
        line.quantity = line.quantity.saturating_add(1);
      }
      line
    })
    .collect()
}

/// Decrements the matching line, dropping it when it would reach zero.
pub fn decrease_line(lines: &[CartLine], product_id: ProductId, owner: &OwnerId) -> Vec<CartLine> {
  lines
    .iter()
    .filter_map(|line| {
      if !line.is_for(product_id, owner) {
        return Some(line.clone());
      }
      match line.quantity {
        0 | 1 => None,
        quantity => Some(line.clone().with_quantity(quantity - 1)),
      }
    })
    .collect()
}

pub fn remove_line(lines: &[CartLine], product_id: ProductId, owner: &OwnerId) -> Vec<CartLine> {
  lines
    .iter()
    .filter(|line| !line.is_for(product_id, owner))
    .cloned()
    .collect()
}

pub fn without_owner(lines: &[CartLine], owner: &OwnerId) -> Vec<CartLine> {
  lines.iter().filter(|line| !line.belongs_to(owner)).cloned().collect()
}

/// Takes the owner's lines from `snapshot` and everyone else's from `current`.
///
/// Lines keep their snapshot order; other owners' lines that are new since the
/// snapshot are appended.
pub fn restore_owner_lines(current: &[CartLine], snapshot: &[CartLine], owner: &OwnerId) -> Vec<CartLine> {
  let mut others = without_owner(current, owner);
  let mut next = Vec::with_capacity(snapshot.len() + others.len());
  for line in snapshot {
    if line.belongs_to(owner) {
      next.push(line.clone());
    } else if let Some(index) = others.iter().position(|other| other.is_for(line.product_id, &line.owner_id)) {
      next.push(others.remove(index));
    }
  }
  next.extend(others);
  next
}

/// Replaces the owner's lines with `incoming`, keeping everyone else's.
///
/// Incoming lines are re-keyed to `owner`, zero quantities are dropped and
/// duplicate products are merged by summing their quantities.
pub fn replace_owner_lines(lines: &[CartLine], owner: &OwnerId, incoming: Vec<CartLine>) -> Vec<CartLine> {
  let mut next = without_owner(lines, owner);
  let mut merged: Vec<CartLine> = Vec::with_capacity(incoming.len());
  for mut line in incoming.into_iter().filter(|line| line.quantity > 0) {
    line.owner_id = owner.clone();
    match merged.iter_mut().find(|existing| existing.product_id == line.product_id) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
      None => merged.push(line),
    }
  }
  next.extend(merged);
  next
}
