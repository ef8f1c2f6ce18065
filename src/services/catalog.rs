// src/services/catalog.rs

//! Read-only lookup into the product catalog.
//!
//! The catalog is owned by a separate subsystem; the cart only ever reads
//! from it. The trait seam exists so the cart service can be exercised
//! against an in-memory catalog in tests.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::instrument;

use crate::errors::{AppError, Result};
use crate::models::product::Product;

#[async_trait]
pub trait CatalogLookup: Send + Sync {
  /// Fetch a single product by id, or `None` if no such product exists.
  /// Inactive products are returned; callers decide whether that matters.
  async fn get_product(&self, product_id: i64) -> Result<Option<Product>>;

  /// Batch fetch. Ids with no matching product are simply absent from the
  /// returned map.
  async fn get_products(&self, product_ids: &[i64]) -> Result<HashMap<i64, Product>>;
}

const SELECT_PRODUCT: &str = "SELECT id, name, description, price, image_url, stock_quantity, is_active, \
   created_at, updated_at FROM products WHERE id = $1";

const SELECT_PRODUCTS: &str = "SELECT id, name, description, price, image_url, stock_quantity, is_active, \
   created_at, updated_at FROM products WHERE id = ANY($1)";

/// Postgres-backed catalog lookup using runtime queries.
pub struct PgCatalog {
  pool: PgPool,
}

impl PgCatalog {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CatalogLookup for PgCatalog {
  #[instrument(name = "catalog::get_product", skip(self))]
  async fn get_product(&self, product_id: i64) -> Result<Option<Product>> {
    let product: Option<Product> = sqlx::query_as(SELECT_PRODUCT)
      .bind(product_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(AppError::Sqlx)?;

    Ok(product)
  }

  #[instrument(name = "catalog::get_products", skip(self, product_ids), fields(requested = product_ids.len()))]
  async fn get_products(&self, product_ids: &[i64]) -> Result<HashMap<i64, Product>> {
    if product_ids.is_empty() {
      return Ok(HashMap::new());
    }

    let products: Vec<Product> = sqlx::query_as(SELECT_PRODUCTS)
      .bind(product_ids)
      .fetch_all(&self.pool)
      .await
      .map_err(AppError::Sqlx)?;

    Ok(products.into_iter().map(|p| (p.id, p)).collect())
  }
}
