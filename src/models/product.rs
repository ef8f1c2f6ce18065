// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A catalog product as seen by the cart subsystem. The catalog itself is
/// owned elsewhere; this is a read-only view of it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price: Decimal,
  pub image_url: Option<String>,
  pub stock_quantity: i32,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Units actually sellable right now. Stock can go negative in the catalog
  /// under oversell; the cart never does.
  pub fn available_stock(&self) -> u32 {
    self.stock_quantity.max(0) as u32
  }
}
