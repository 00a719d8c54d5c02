// demos/storefront/src/errors.rs

use basket::{CartError, RemoteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Cart Error: {0}")]
  Cart(#[from] CartError),

  #[error("Cart Remote Error: {0}")]
  Remote(#[from] RemoteError),

  #[error("Internal Error: {0}")]
  Internal(String), // For miscellaneous errors
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      if let Ok(sqlx_err) = err.downcast::<sqlx::Error>() {
        return AppError::Sqlx(sqlx_err);
      }
      return AppError::Internal("sqlx error could not be recovered from anyhow".to_string());
    }
    AppError::Internal(err.to_string())
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
