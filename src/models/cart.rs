// src/models/cart.rs

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// The persisted shape of a cart: product id -> quantity, nothing else.
/// Prices and display fields are rehydrated from the catalog on every read,
/// so stale values can never accumulate in storage.
pub type RawCart = BTreeMap<i64, u32>;

/// One reconciled line in the cart view returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
  pub product_id: i64,
  pub name: String,
  pub image_url: Option<String>,
  pub quantity: u32,
  pub unit_price: Decimal,
  pub line_total: Decimal,
}

/// The full cart view. Totals are derived on every call, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
  pub items: Vec<CartLineView>,
  pub total_items: u32,
  pub total_price: Decimal,
}

impl CartView {
  pub fn empty() -> Self {
    Self {
      items: Vec::new(),
      total_items: 0,
      // Two decimal places so an empty cart renders as "0.00" on the wire.
      total_price: Decimal::new(0, 2),
    }
  }
}
