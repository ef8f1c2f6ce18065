// src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use dotenvy::dotenv;
use std::env;

/// Default sliding TTL for cart entries: 7 days.
pub const DEFAULT_CART_TTL_SECS: u64 = 604_800;

#[derive(Debug, Clone)] // Clone is useful if parts of config are passed around
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub redis_url: String,

  /// Sliding expiration window for cart entries, refreshed on every write.
  pub cart_ttl_secs: u64,
  /// How many extra attempts the cart store makes before surfacing
  /// a transient backend failure to the caller.
  pub cart_store_retries: u32,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let redis_url = get_env("REDIS_URL")?;

    let cart_ttl_secs = get_env("CART_TTL_SECS")
      .unwrap_or_else(|_| DEFAULT_CART_TTL_SECS.to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid CART_TTL_SECS: {}", e)))?;
    let cart_store_retries = get_env("CART_STORE_RETRIES")
      .unwrap_or_else(|_| "2".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid CART_STORE_RETRIES: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      redis_url,
      cart_ttl_secs,
      cart_store_retries,
    })
  }
}
