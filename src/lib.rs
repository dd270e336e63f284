//! Tokenshop backend library
//!
//! Storefront and admin API for selling digital goods against prepaid
//! token balances.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod coupons;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod orders;
pub mod permissions;
pub mod refunds;
pub mod routes;
pub mod state;
pub mod tokens;
pub mod websocket;
