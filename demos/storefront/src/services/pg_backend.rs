// demos/storefront/src/services/pg_backend.rs

//! Postgres-backed storefront. Cart lines live in `cart_items` and are read
//! back joined with `products` for their display fields.

use super::CheckoutBackend;
use crate::errors::AppError;
use crate::models::{CartItemRow, OrderReceipt, ProductRow};
use async_trait::async_trait;
use basket::{CartError, CartLine, CartRemote, Confirmation, InMemoryCatalog, OwnerId, ProductId, ProductSummary};
use sqlx::{PgConnection, PgPool};
use tracing::{event, instrument, Level};

const SCHEMA: &str = include_str!("../../migrations/0001_storefront.sql");

const SELECT_LINES: &str = "SELECT ci.user_id, ci.product_id, ci.quantity, p.name AS title, p.price_cents, \
   p.image_url \
   FROM cart_items ci JOIN products p ON p.id = ci.product_id \
   WHERE ci.user_id = $1";

#[derive(Debug, Clone)]
pub struct PgStorefront {
  pool: PgPool,
  currency: String,
}

impl PgStorefront {
  pub fn new(pool: PgPool, currency: impl Into<String>) -> Self {
    Self {
      pool,
      currency: currency.into(),
    }
  }

  /// Creates the storefront tables if they are missing.
  pub async fn ensure_schema(&self) -> Result<(), AppError> {
    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
      sqlx::query(statement).execute(&self.pool).await?;
    }
    Ok(())
  }

  /// Loads every product into an in-process catalog for the engine.
  pub async fn load_catalog(&self) -> Result<InMemoryCatalog, AppError> {
    let rows = sqlx::query_as::<_, ProductRow>("SELECT id, name, price_cents, image_url FROM products ORDER BY id")
      .fetch_all(&self.pool)
      .await?;
    event!(Level::INFO, products = rows.len(), "Catalog loaded from database.");
    Ok(rows.into_iter().map(ProductSummary::from).collect())
  }

  /// Inserts `products`, leaving existing rows alone.
  pub async fn seed_products(&self, products: &[ProductSummary]) -> Result<(), AppError> {
    for product in products {
      sqlx::query(
        "INSERT INTO products (id, name, price_cents, image_url) VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO NOTHING",
      )
      .bind(product.id.0)
      .bind(&product.title)
      .bind(i32::try_from(product.unit_price_cents).map_err(|e| AppError::Config(format!("Price out of range for product {}: {}", product.id, e)))?)
      .bind(&product.image)
      .execute(&self.pool)
      .await?;
    }
    Ok(())
  }
}

async fn select_line(conn: &mut PgConnection, owner: &OwnerId, product_id: ProductId) -> Result<Option<CartLine>, AppError> {
  let row = sqlx::query_as::<_, CartItemRow>(&format!("{} AND ci.product_id = $2", SELECT_LINES))
    .bind(owner.as_str())
    .bind(product_id.0)
    .fetch_optional(conn)
    .await?;
  row.map(CartLine::try_from).transpose()
}

fn line_not_found(owner: &OwnerId, product_id: ProductId) -> AppError {
  AppError::NotFound(format!("Cart line for product {} owned by {}", product_id, owner))
}

#[async_trait]
impl CartRemote for PgStorefront {
  type Error = AppError;

  #[instrument(name = "PgStorefront::add", skip(self), err(Display))]
  async fn add(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, AppError> {
    let mut tx = self.pool.begin().await?;
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
      .bind(product_id.0)
      .fetch_one(&mut *tx)
      .await?;
    if !exists {
      return Err(CartError::UnknownProduct { product_id }.into());
    }
    sqlx::query(
      "INSERT INTO cart_items (user_id, product_id, quantity) VALUES ($1, $2, 1) \
       ON CONFLICT (user_id, product_id) DO UPDATE SET quantity = cart_items.quantity + 1",
    )
    .bind(owner.as_str())
    .bind(product_id.0)
    .execute(&mut *tx)
    .await?;
    let line = select_line(&mut *tx, owner, product_id)
      .await?
      .ok_or_else(|| line_not_found(owner, product_id))?;
    tx.commit().await?;
    Ok(line)
  }

  #[instrument(name = "PgStorefront::increase", skip(self), err(Display))]
  async fn increase(&self, product_id: ProductId, owner: &OwnerId) -> Result<CartLine, AppError> {
    let mut tx = self.pool.begin().await?;
    let updated = sqlx::query("UPDATE cart_items SET quantity = quantity + 1 WHERE user_id = $1 AND product_id = $2")
      .bind(owner.as_str())
      .bind(product_id.0)
      .execute(&mut *tx)
      .await?;
    if updated.rows_affected() == 0 {
      return Err(line_not_found(owner, product_id));
    }
    let line = select_line(&mut *tx, owner, product_id)
      .await?
      .ok_or_else(|| line_not_found(owner, product_id))?;
    tx.commit().await?;
    Ok(line)
  }

  #[instrument(name = "PgStorefront::decrease", skip(self), err(Display))]
  async fn decrease(&self, product_id: ProductId, owner: &OwnerId) -> Result<Confirmation, AppError> {
    let mut tx = self.pool.begin().await?;
    let quantity = sqlx::query_scalar::<_, i32>(
      "SELECT quantity FROM cart_items WHERE user_id = $1 AND product_id = $2 FOR UPDATE",
    )
    .bind(owner.as_str())
    .bind(product_id.0)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| line_not_found(owner, product_id))?;

    let confirmation = if quantity <= 1 {
      sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
        .bind(owner.as_str())
        .bind(product_id.0)
        .execute(&mut *tx)
        .await?;
      Confirmation::Removed
    } else {
      sqlx::query("UPDATE cart_items SET quantity = quantity - 1 WHERE user_id = $1 AND product_id = $2")
        .bind(owner.as_str())
        .bind(product_id.0)
        .execute(&mut *tx)
        .await?;
      let line = select_line(&mut *tx, owner, product_id)
        .await?
        .ok_or_else(|| line_not_found(owner, product_id))?;
      Confirmation::Line(line)
    };
    tx.commit().await?;
    Ok(confirmation)
  }

  #[instrument(name = "PgStorefront::remove", skip(self), err(Display))]
  async fn remove(&self, product_id: ProductId, owner: &OwnerId) -> Result<(), AppError> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND product_id = $2")
      .bind(owner.as_str())
      .bind(product_id.0)
      .execute(&self.pool)
      .await?;
    Ok(())
  }

  #[instrument(name = "PgStorefront::fetch", skip(self), err(Display))]
  async fn fetch(&self, owner: &OwnerId) -> Result<Vec<CartLine>, AppError> {
    let rows = sqlx::query_as::<_, CartItemRow>(&format!("{} ORDER BY ci.added_at, ci.product_id", SELECT_LINES))
      .bind(owner.as_str())
      .fetch_all(&self.pool)
      .await?;
    rows.into_iter().map(CartLine::try_from).collect()
  }
}

#[async_trait]
impl CheckoutBackend for PgStorefront {
  #[instrument(name = "PgStorefront::place_order", skip(self, lines), fields(lines = lines.len()), err(Display))]
  async fn place_order(&self, owner: &OwnerId, lines: &[CartLine]) -> Result<OrderReceipt, AppError> {
    if lines.is_empty() {
      return Err(AppError::NotFound(format!("No cart lines to order for {}", owner)));
    }
    let receipt = OrderReceipt::from_lines(owner.as_str(), &self.currency, lines)?;

    let mut tx = self.pool.begin().await?;
    sqlx::query(
      "INSERT INTO orders (id, user_id, status, total_amount_cents, currency, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(receipt.id)
    .bind(&receipt.user_id)
    .bind(receipt.status.as_str())
    .bind(receipt.total_amount_cents)
    .bind(&receipt.currency)
    .bind(receipt.created_at)
    .execute(&mut *tx)
    .await?;

    for item in &receipt.items {
      sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, quantity, price_at_purchase_cents) VALUES ($1, $2, $3, $4, $5)",
      )
      .bind(item.id)
      .bind(item.order_id)
      .bind(item.product_id)
      .bind(item.quantity)
      .bind(item.price_at_purchase_cents)
      .execute(&mut *tx)
      .await?;
    }

    let cleared = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
      .bind(owner.as_str())
      .execute(&mut *tx)
      .await?;
    tx.commit().await?;

    event!(Level::INFO, order_id = %receipt.id, cleared = cleared.rows_affected(), "Order placed.");
    Ok(receipt)
  }
}
