// demos/storefront/src/models/order.rs

use super::OrderItem;
use crate::errors::AppError;
use basket::CartLine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  // Payment is not taken by the demo.
  PaymentDue,
}

impl OrderStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::PaymentDue => "paymentdue",
    }
  }
}

/// The order placed from a cart, with its items priced at purchase time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceipt {
  pub id: Uuid,
  pub user_id: String,
  pub status: OrderStatus,
  pub total_amount_cents: i64,
  pub currency: String,
  pub items: Vec<OrderItem>,
  pub created_at: DateTime<Utc>,
}

impl OrderReceipt {
  /// Prices `lines` into a new order awaiting payment.
  pub fn from_lines(user_id: &str, currency: &str, lines: &[CartLine]) -> Result<Self, AppError> {
    let id = Uuid::new_v4();
    let items = lines
      .iter()
      .map(|line| -> Result<OrderItem, AppError> {
        let quantity = i32::try_from(line.quantity).map_err(|e| {
          AppError::Internal(format!(
            "Quantity {} of product {} does not fit an order item: {}",
            line.quantity, line.product_id, e
          ))
        })?;
        Ok(OrderItem {
          id: Uuid::new_v4(),
          order_id: id,
          product_id: line.product_id.0,
          quantity,
          price_at_purchase_cents: line.unit_price_cents,
        })
      })
      .collect::<Result<Vec<_>, AppError>>()?;
    Ok(Self {
      id,
      user_id: user_id.to_string(),
      status: OrderStatus::PaymentDue,
      total_amount_cents: lines.iter().map(CartLine::subtotal_cents).sum(),
      currency: currency.to_string(),
      items,
      created_at: Utc::now(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use basket::{OwnerId, ProductId, ProductSummary};

  fn line(quantity: u32) -> CartLine {
    let product = ProductSummary::new(ProductId(3), "Paper Filters (100)", 650);
    CartLine::new(&product, OwnerId::from("shopper")).with_quantity(quantity)
  }

  #[test]
  fn test_receipt_prices_lines() {
    let receipt = OrderReceipt::from_lines("shopper", "usd", &[line(3)]).unwrap();
    assert_eq!(receipt.total_amount_cents, 1950);
    assert_eq!(receipt.items.len(), 1);
    assert_eq!(receipt.items[0].quantity, 3);
    assert_eq!(receipt.items[0].order_id, receipt.id);
  }

  #[test]
  fn test_oversized_quantity_is_an_error() {
    let result = OrderReceipt::from_lines("shopper", "usd", &[line(u32::MAX)]);
    assert!(matches!(result, Err(AppError::Internal(_))));
  }
}
