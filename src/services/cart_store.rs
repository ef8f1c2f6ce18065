// src/services/cart_store.rs

//! Persistence substrate for carts: a key-value store with sliding expiry.
//!
//! Only `{product_id: quantity}` is ever written here. A transient backend
//! failure is retried a bounded number of times and then surfaced as
//! `AppError::StoreUnavailable`; it is never silently reported as success or
//! as an empty cart, since "the store is down" and "this cart does not
//! exist" mean very different things to the caller.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::errors::{AppError, Result};
use crate::models::cart::RawCart;

#[async_trait]
pub trait CartStore: Send + Sync {
  /// Load the last-persisted cart. A missing or expired key is an empty
  /// cart, not an error.
  async fn load(&self, session_id: &str) -> Result<RawCart>;

  /// Overwrite the stored cart and reset its expiry countdown to `ttl`
  /// (sliding-window semantics).
  async fn save(&self, session_id: &str, cart: &RawCart, ttl: Duration) -> Result<()>;

  /// Remove the key immediately.
  async fn delete(&self, session_id: &str) -> Result<()>;
}

fn cart_key(session_id: &str) -> String {
  format!("cart:{}", session_id)
}

/// Run a store command up to `1 + retries` times, surfacing the last error
/// as `StoreUnavailable` once the bound is exhausted.
async fn with_retries<T, F, Fut>(operation: &str, retries: u32, mut op: F) -> Result<T>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = redis::RedisResult<T>>,
{
  let mut last_err: Option<redis::RedisError> = None;

  for attempt in 0..=retries {
    match op().await {
      Ok(value) => return Ok(value),
      Err(e) => {
        warn!(attempt, operation, error = %e, "Cart store command failed");
        last_err = Some(e);
      }
    }
  }

  Err(store_unavailable(operation, last_err))
}

fn store_unavailable(operation: &str, last_err: Option<redis::RedisError>) -> AppError {
  let detail = last_err
    .map(|e| e.to_string())
    .unwrap_or_else(|| "no attempts were made".to_string());
  AppError::StoreUnavailable(format!("cart {} failed after retries: {}", operation, detail))
}

/// Redis-backed cart store. `ConnectionManager` reconnects on its own; the
/// retry loop here covers individual command failures during an outage.
#[derive(Clone)]
pub struct RedisCartStore {
  connection: ConnectionManager,
  retries: u32,
}

impl RedisCartStore {
  pub fn new(connection: ConnectionManager, retries: u32) -> Self {
    Self { connection, retries }
  }
}

#[async_trait]
impl CartStore for RedisCartStore {
  #[instrument(name = "cart_store::load", skip(self))]
  async fn load(&self, session_id: &str) -> Result<RawCart> {
    let key = cart_key(session_id);

    let payload: Option<String> = with_retries("load", self.retries, || {
      let mut conn = self.connection.clone();
      let key = key.clone();
      async move { conn.get::<_, Option<String>>(key).await }
    })
    .await?;

    match payload {
      None => Ok(RawCart::new()),
      Some(payload) => serde_json::from_str(&payload)
        .map_err(|e| AppError::Internal(format!("Corrupt cart entry under '{}': {}", key, e))),
    }
  }

  #[instrument(name = "cart_store::save", skip(self, cart), fields(lines = cart.len(), ttl_secs = ttl.as_secs()))]
  async fn save(&self, session_id: &str, cart: &RawCart, ttl: Duration) -> Result<()> {
    let key = cart_key(session_id);
    let payload = serde_json::to_string(cart)
      .map_err(|e| AppError::Internal(format!("Failed to serialize cart: {}", e)))?;
    let ttl_secs = ttl.as_secs();

    with_retries("save", self.retries, || {
      let mut conn = self.connection.clone();
      let key = key.clone();
      let payload = payload.clone();
      async move { conn.set_ex::<_, _, ()>(key, payload, ttl_secs).await }
    })
    .await?;

    debug!("Cart persisted with refreshed expiry.");
    Ok(())
  }

  #[instrument(name = "cart_store::delete", skip(self))]
  async fn delete(&self, session_id: &str) -> Result<()> {
    let key = cart_key(session_id);

    with_retries("delete", self.retries, || {
      let mut conn = self.connection.clone();
      let key = key.clone();
      async move { conn.del::<_, ()>(key).await }
    })
    .await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};

  fn transient_error() -> redis::RedisError {
    redis::RedisError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe"))
  }

  #[test]
  fn cart_key_is_namespaced_by_session() {
    assert_eq!(cart_key("abc-123"), "cart:abc-123");
  }

  #[test]
  fn raw_cart_serializes_as_quantities_only() {
    let mut cart = RawCart::new();
    cart.insert(7, 2);
    cart.insert(3, 1);

    let payload = serde_json::to_string(&cart).unwrap();
    assert_eq!(payload, r#"{"3":1,"7":2}"#);

    let restored: RawCart = serde_json::from_str(&payload).unwrap();
    assert_eq!(restored, cart);
  }

  #[tokio::test]
  async fn first_successful_attempt_short_circuits() {
    let attempts = AtomicU32::new(0);

    let value = with_retries("load", 2, || {
      attempts.fetch_add(1, Ordering::SeqCst);
      async { Ok(7u32) }
    })
    .await
    .unwrap();

    assert_eq!(value, 7);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn transient_failures_are_retried_within_the_bound() {
    let attempts = AtomicU32::new(0);

    // Fails twice, succeeds on the third attempt (initial + 2 retries).
    let value = with_retries("load", 2, || {
      let n = attempts.fetch_add(1, Ordering::SeqCst);
      async move {
        if n < 2 {
          Err(transient_error())
        } else {
          Ok(42u32)
        }
      }
    })
    .await
    .unwrap();

    assert_eq!(value, 42);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn exhausted_retries_surface_store_unavailable() {
    let attempts = AtomicU32::new(0);

    let result: Result<u32> = with_retries("save", 2, || {
      attempts.fetch_add(1, Ordering::SeqCst);
      async { Err(transient_error()) }
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));
    assert!(err.to_string().contains("save"));
    // Exactly initial attempt + configured retries, then give up.
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
  }

  #[tokio::test]
  async fn zero_retries_means_a_single_attempt() {
    let attempts = AtomicU32::new(0);

    let result: Result<u32> = with_retries("delete", 0, || {
      attempts.fetch_add(1, Ordering::SeqCst);
      async { Err(transient_error()) }
    })
    .await;

    assert!(matches!(result.unwrap_err(), AppError::StoreUnavailable(_)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
  }
}
