//! Fishdex - fish species catalog with catch unlocking
//!
//! Serves a fixed catalog of Italian fish species over HTTP, records the
//! catches users report against them, and aggregates simple statistics.
//!
//! ## Components
//!
//! - **Catalog**: the bundled species dataset and the one-shot seeder
//! - **Store**: MongoDB persistence, with an in-memory store for development
//! - **Services**: list, lookup, unlock, and stats over the store
//! - **Server**: hyper HTTP/1 server and router

pub mod catalog;
pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, AppState};
pub use types::{FishdexError, Result};
