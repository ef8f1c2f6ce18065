// src/state.rs
use crate::config::AppConfig;
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub redis: ConnectionManager,
  pub config: Arc<AppConfig>, // Share loaded config
}
