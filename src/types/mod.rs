//! Shared types for fishdex

pub mod error;

pub use error::{FishdexError, Result};
