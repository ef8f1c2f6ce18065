// src/services/cart_service.rs

//! The cart core. Every operation runs the same pipeline:
//! load -> reconcile -> mutate -> recompute -> persist -> return.
//!
//! Reconciliation runs *before* the requested mutation so the mutation sees
//! live catalog state; it silently drops lines whose product vanished or was
//! deactivated and clamps quantities to current stock. Only mutations the
//! caller explicitly asked for can fail: a fresh add against zero stock, or
//! an update targeting a line that is not in the cart.
//!
//! The final `save` is the single point of observable mutation. An error (or
//! cancellation) anywhere before it leaves the stored cart untouched.
//!
//! Known limitation: two concurrent requests for the *same* session race on
//! the load/save pair and the last save wins. Cross-session requests never
//! contend (each cart lives under its own key).

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::cart::{CartLineView, CartView, RawCart};
use crate::models::product::Product;
use crate::services::cart_store::CartStore;
use crate::services::catalog::CatalogLookup;

pub struct CartService<C, S> {
  catalog: C,
  store: S,
  cart_ttl: Duration,
}

/// Outcome of the load + reconcile steps.
struct Reconciled {
  raw: RawCart,
  products: HashMap<i64, Product>,
  /// Whether the store held a non-empty entry before reconciliation. Used to
  /// decide between "delete the key" and "nothing to delete" when the cart
  /// ends up empty.
  was_stored: bool,
}

impl<C, S> CartService<C, S>
where
  C: CatalogLookup,
  S: CartStore,
{
  pub fn new(catalog: C, store: S, cart_ttl: Duration) -> Self {
    Self {
      catalog,
      store,
      cart_ttl,
    }
  }

  /// Surface the reconciled cart. No mutation, but reconciliation changes
  /// (and the refreshed TTL) are still persisted, which is how stale lines
  /// disappear from a returning visitor's cart.
  #[instrument(name = "cart_service::get_cart", skip(self))]
  pub async fn get_cart(&self, session_id: &str) -> Result<CartView> {
    let reconciled = self.load_and_reconcile(session_id).await?;

    if reconciled.raw.is_empty() && !reconciled.was_stored {
      // Nothing stored and nothing to store: skip the write so anonymous
      // browsing does not mint a store key per visitor.
      debug!("Empty cart, no store entry to refresh.");
      return Ok(CartView::empty());
    }

    let view = build_view(&reconciled.raw, &reconciled.products);
    self.persist(session_id, &reconciled).await?;
    info!(lines = view.items.len(), total_items = view.total_items, "Cart retrieved.");
    Ok(view)
  }

  /// Add `quantity` of a product, summing with any existing line before
  /// clamping to stock. A missing product, an inactive product, or zero
  /// available stock is a hard error; a partial clamp is not.
  #[instrument(name = "cart_service::add_item", skip(self))]
  pub async fn add_item(&self, session_id: &str, product_id: i64, quantity: i32) -> Result<CartView> {
    if quantity < 1 {
      return Err(AppError::Validation("Quantity must be a positive number.".to_string()));
    }

    let mut reconciled = self.load_and_reconcile(session_id).await?;

    let product = self
      .catalog
      .get_product(product_id)
      .await?
      .ok_or(AppError::ProductNotFound { product_id })?;
    if !product.is_active {
      return Err(AppError::ProductInactive { product_id });
    }

    let stock = product.available_stock();
    if stock == 0 {
      // Distinct from the silent clamp applied to existing lines: the user
      // explicitly asked for this product and it cannot be honored at all.
      return Err(AppError::InsufficientStock { product_id, available: 0 });
    }

    let existing = reconciled.raw.get(&product_id).copied().unwrap_or(0);
    let requested = existing.saturating_add(quantity as u32);
    let new_quantity = requested.min(stock);
    if new_quantity < requested {
      info!(product_id, requested, clamped_to = new_quantity, "Clamped added quantity to available stock.");
    }

    reconciled.raw.insert(product_id, new_quantity);
    reconciled.products.insert(product_id, product);

    let view = build_view(&reconciled.raw, &reconciled.products);
    self.persist(session_id, &reconciled).await?;
    info!(product_id, quantity = new_quantity, "Cart line added.");
    Ok(view)
  }

  /// Set a line to exactly `quantity` (not additive). A quantity of zero or
  /// less removes the line. Targeting a product that is not in the cart is
  /// an error; updating is not an implicit add.
  #[instrument(name = "cart_service::update_item", skip(self))]
  pub async fn update_item(&self, session_id: &str, product_id: i64, quantity: i32) -> Result<CartView> {
    let mut reconciled = self.load_and_reconcile(session_id).await?;

    if !reconciled.raw.contains_key(&product_id) {
      return Err(AppError::ProductNotInCart { product_id });
    }

    if quantity <= 0 {
      reconciled.raw.remove(&product_id);
      info!(product_id, "Cart line removed via zero-quantity update.");
    } else {
      let product = reconciled.products.get(&product_id).ok_or_else(|| {
        AppError::Internal(format!("Reconciled line {} has no catalog record", product_id))
      })?;
      let stock = product.available_stock();
      let new_quantity = (quantity as u32).min(stock);
      if new_quantity < quantity as u32 {
        info!(product_id, requested = quantity, clamped_to = new_quantity, "Clamped updated quantity to available stock.");
      }
      reconciled.raw.insert(product_id, new_quantity);
      info!(product_id, quantity = new_quantity, "Cart line quantity updated.");
    }

    let view = build_view(&reconciled.raw, &reconciled.products);
    self.persist(session_id, &reconciled).await?;
    Ok(view)
  }

  /// Remove a line. Idempotent: removing an absent line succeeds and returns
  /// the unchanged (reconciled) cart.
  #[instrument(name = "cart_service::remove_item", skip(self))]
  pub async fn remove_item(&self, session_id: &str, product_id: i64) -> Result<CartView> {
    let mut reconciled = self.load_and_reconcile(session_id).await?;

    if reconciled.raw.remove(&product_id).is_some() {
      info!(product_id, "Cart line removed.");
    } else {
      debug!(product_id, "Remove requested for a line not in the cart; nothing to do.");
    }

    let view = build_view(&reconciled.raw, &reconciled.products);
    self.persist(session_id, &reconciled).await?;
    Ok(view)
  }

  /// Drop the whole cart. The store entry is deleted outright rather than
  /// overwritten with an empty map.
  #[instrument(name = "cart_service::clear_cart", skip(self))]
  pub async fn clear_cart(&self, session_id: &str) -> Result<CartView> {
    self.store.delete(session_id).await?;
    info!("Cart cleared.");
    Ok(CartView::empty())
  }

  /// Load the raw cart and reconcile it against live catalog state: batch
  /// fetch every referenced product, drop lines whose product is missing or
  /// inactive, clamp quantities to available stock, and drop lines clamped
  /// to zero. Never fails for catalog-state reasons; these are silent state
  /// corrections, not errors.
  async fn load_and_reconcile(&self, session_id: &str) -> Result<Reconciled> {
    let stored = self.store.load(session_id).await?;
    let was_stored = !stored.is_empty();

    let product_ids: Vec<i64> = stored.keys().copied().collect();
    let products = self.catalog.get_products(&product_ids).await?;

    let mut raw = RawCart::new();
    for (product_id, quantity) in stored {
      let Some(product) = products.get(&product_id) else {
        warn!(product_id, "Dropping cart line: product no longer in catalog.");
        continue;
      };
      if !product.is_active {
        warn!(product_id, "Dropping cart line: product deactivated.");
        continue;
      }
      let clamped = quantity.min(product.available_stock());
      if clamped == 0 {
        info!(product_id, "Dropping cart line: out of stock.");
        continue;
      }
      if clamped < quantity {
        info!(product_id, stored = quantity, clamped_to = clamped, "Clamped cart line to available stock.");
      }
      raw.insert(product_id, clamped);
    }

    Ok(Reconciled { raw, products, was_stored })
  }

  /// The single point of observable mutation. An empty cart deletes the key
  /// (if one existed); anything else overwrites it with a full TTL, so every
  /// touch slides the expiry window.
  async fn persist(&self, session_id: &str, reconciled: &Reconciled) -> Result<()> {
    if reconciled.raw.is_empty() {
      if reconciled.was_stored {
        self.store.delete(session_id).await?;
      }
      return Ok(());
    }
    self.store.save(session_id, &reconciled.raw, self.cart_ttl).await
  }
}

/// Recompute the derived view from the post-reconciliation line set.
fn build_view(raw: &RawCart, products: &HashMap<i64, Product>) -> CartView {
  let mut items = Vec::with_capacity(raw.len());
  let mut total_items: u32 = 0;
  let mut total_price = Decimal::new(0, 2);

  for (&product_id, &quantity) in raw {
    let Some(product) = products.get(&product_id) else {
      continue;
    };
    let line_total = product.price * Decimal::from(quantity);
    total_items += quantity;
    total_price += line_total;
    items.push(CartLineView {
      product_id,
      name: product.name.clone(),
      image_url: product.image_url.clone(),
      quantity,
      unit_price: product.price,
      line_total,
    });
  }

  CartView {
    items,
    total_items,
    total_price,
  }
}
