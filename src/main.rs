// src/main.rs

use shopfront::config::AppConfig;
use shopfront::state::AppState;
use shopfront::web::routes::configure_app_routes;

use actix_web::{web as actix_data, App, HttpServer}; // Renamed web to actix_data
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting shopfront server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg), // Arc the config for sharing
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Initialize catalog database pool
  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the catalog database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the catalog database.");
      panic!("Database connection error: {}", e);
    }
  };

  // Initialize the Redis connection backing the cart store. The manager
  // transparently reconnects, so a blip does not take the server down.
  let redis = {
    let client = match redis::Client::open(app_config.redis_url.as_str()) {
      Ok(client) => client,
      Err(e) => {
        tracing::error!(error = %e, "Invalid REDIS_URL.");
        panic!("Redis configuration error: {}", e);
      }
    };
    match client.get_connection_manager().await {
      Ok(manager) => {
        tracing::info!("Successfully connected to Redis.");
        manager
      }
      Err(e) => {
        tracing::error!(error = %e, "Failed to connect to Redis.");
        panic!("Redis connection error: {}", e);
      }
    }
  };

  // Create AppState
  let app_state = AppState {
    db_pool,
    redis,
    config: app_config.clone(),
  };

  // Configure and start the Actix Web server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
