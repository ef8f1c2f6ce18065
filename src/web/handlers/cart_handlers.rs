// src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::cart::CartView;
use crate::services::cart_service::CartService;
use crate::services::cart_store::RedisCartStore;
use crate::services::catalog::PgCatalog;
use crate::state::AppState;
use crate::web::session::{session_cookie, CartSession};

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddItemPayload {
  pub product_id: i64,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateItemPayload {
  pub quantity: i32,
}

/// Cart services are cheap: a pool handle, a connection handle, and a TTL.
/// One is built per request, mirroring how the session id is threaded
/// through explicitly rather than held in shared state.
fn cart_service(state: &AppState) -> CartService<PgCatalog, RedisCartStore> {
  CartService::new(
    PgCatalog::new(state.db_pool.clone()),
    RedisCartStore::new(state.redis.clone(), state.config.cart_store_retries),
    Duration::from_secs(state.config.cart_ttl_secs),
  )
}

/// Every cart response re-sets the session cookie so the browser's cookie
/// lifetime slides along with the cart's store TTL.
fn cart_response(state: &AppState, session: &CartSession, view: CartView) -> HttpResponse {
  HttpResponse::Ok()
    .cookie(session_cookie(&session.id, Duration::from_secs(state.config.cart_ttl_secs)))
    .json(view)
}

// --- Handler Implementations ---

#[instrument(name = "handler::get_cart", skip(app_state, session), fields(session_id = %session.id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let view = cart_service(&app_state).get_cart(&session.id).await?;
  Ok(cart_response(&app_state, &session, view))
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, session, payload),
  fields(session_id = %session.id, product_id = %payload.product_id, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  payload: web::Json<AddItemPayload>,
) -> Result<HttpResponse, AppError> {
  let view = cart_service(&app_state)
    .add_item(&session.id, payload.product_id, payload.quantity)
    .await?;
  Ok(cart_response(&app_state, &session, view))
}

#[instrument(
  name = "handler::update_cart_item",
  skip(app_state, session, payload),
  fields(session_id = %session.id, product_id = %product_id, quantity = %payload.quantity)
)]
pub async fn update_cart_item_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  product_id: web::Path<i64>,
  payload: web::Json<UpdateItemPayload>,
) -> Result<HttpResponse, AppError> {
  let view = cart_service(&app_state)
    .update_item(&session.id, product_id.into_inner(), payload.quantity)
    .await?;
  Ok(cart_response(&app_state, &session, view))
}

#[instrument(
  name = "handler::remove_from_cart",
  skip(app_state, session),
  fields(session_id = %session.id, product_id = %product_id)
)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
  product_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let view = cart_service(&app_state)
    .remove_item(&session.id, product_id.into_inner())
    .await?;
  Ok(cart_response(&app_state, &session, view))
}

#[instrument(name = "handler::clear_cart", skip(app_state, session), fields(session_id = %session.id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  session: CartSession,
) -> Result<HttpResponse, AppError> {
  let view = cart_service(&app_state).clear_cart(&session.id).await?;
  Ok(cart_response(&app_state, &session, view))
}
