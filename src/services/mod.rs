pub mod cart_service;
pub mod cart_store;
pub mod catalog;
