// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::cart_handlers;

// Placeholder for a simple health check handler function.
async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api")
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Cart Routes (anonymous; the session cookie identifies the cart)
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::post().to(cart_handlers::add_to_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/{product_id}", web::patch().to(cart_handlers::update_cart_item_handler))
          .route("/{product_id}", web::delete().to(cart_handlers::remove_from_cart_handler)),
      ),
  );
}
