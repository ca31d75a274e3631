//! HTTP server

pub mod http;
mod shutdown;

pub use http::{route, run, AppState, MAX_BODY_BYTES};
pub use shutdown::shutdown_signal;
