// src/web/session.rs

//! Anonymous session identification for carts.
//!
//! The token is an opaque string carried by a cookie; the rest of the system
//! only ever uses it as a store key. A missing cookie is the normal "new
//! visitor" case and yields a fresh random token, never an error.

use actix_web::cookie::{time, Cookie, SameSite};
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::time::Duration;
use uuid::Uuid;

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "cart_session_id";

#[derive(Debug, Clone)]
pub struct CartSession {
  pub id: String,
}

impl FromRequest for CartSession {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let id = req
      .cookie(SESSION_COOKIE)
      .map(|c| c.value().to_string())
      .filter(|value| !value.is_empty())
      .unwrap_or_else(|| Uuid::new_v4().to_string());

    futures_util::future::ready(Ok(CartSession { id }))
  }
}

/// Build the session cookie attached to cart responses. Re-setting it on
/// every response slides the cookie's window alongside the cart's TTL.
pub fn session_cookie(session_id: &str, max_age: Duration) -> Cookie<'static> {
  Cookie::build(SESSION_COOKIE, session_id.to_string())
    .path("/")
    .max_age(time::Duration::seconds(max_age.as_secs() as i64))
    .http_only(true)
    .same_site(SameSite::Lax)
    .finish()
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;

  #[actix_rt::test]
  async fn missing_cookie_yields_a_fresh_token() {
    let req = TestRequest::default().to_http_request();
    let session = CartSession::extract(&req).await.unwrap();

    assert!(!session.id.is_empty());
    assert!(Uuid::parse_str(&session.id).is_ok());
  }

  #[actix_rt::test]
  async fn existing_cookie_token_is_reused_verbatim() {
    let req = TestRequest::default()
      .cookie(Cookie::new(SESSION_COOKIE, "some-opaque-token"))
      .to_http_request();
    let session = CartSession::extract(&req).await.unwrap();

    assert_eq!(session.id, "some-opaque-token");
  }

  #[actix_rt::test]
  async fn empty_cookie_value_is_treated_as_missing() {
    let req = TestRequest::default()
      .cookie(Cookie::new(SESSION_COOKIE, ""))
      .to_http_request();
    let session = CartSession::extract(&req).await.unwrap();

    assert!(!session.id.is_empty());
  }

  #[test]
  fn session_cookie_is_http_only_lax_and_scoped_to_root() {
    let cookie = session_cookie("abc", Duration::from_secs(604_800));

    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));
  }
}
