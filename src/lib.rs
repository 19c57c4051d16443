#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
//! Back-office ledger service: customers, payments recorded against
//! them and the running balance those payments produce.

pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod http;
pub mod logging;
pub mod schema;
pub mod types;
pub mod util;

pub use app::App;
