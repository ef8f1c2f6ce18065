// src/lib.rs

//! Catalog-and-cart e-commerce backend.
//!
//! The interesting subsystem is the shopping cart: session-scoped, stored in
//! Redis with a sliding TTL, and reconciled against the live product catalog
//! on every read and write. See `services::cart_service` for the pipeline.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
