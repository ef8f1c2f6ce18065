// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Product {product_id} not found")]
  ProductNotFound { product_id: i64 },

  #[error("Product {product_id} is no longer available")]
  ProductInactive { product_id: i64 },

  #[error("Insufficient stock for product {product_id}. Available: {available}")]
  InsufficientStock { product_id: i64, available: u32 },

  #[error("Product {product_id} not in cart")]
  ProductNotInCart { product_id: i64 },

  #[error("Cart store unavailable: {0}")]
  StoreUnavailable(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String), // For miscellaneous errors
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::ProductNotFound { .. } | AppError::ProductNotInCart { .. } => {
        HttpResponse::NotFound().json(json!({"error": self.to_string()}))
      }
      AppError::ProductInactive { .. } => HttpResponse::BadRequest().json(json!({"error": self.to_string()})),
      AppError::InsufficientStock { available, .. } => {
        HttpResponse::BadRequest().json(json!({"error": self.to_string(), "available": available}))
      }
      AppError::StoreUnavailable(m) => {
        HttpResponse::ServiceUnavailable().json(json!({"error": "Cart storage is temporarily unavailable", "detail": m}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
