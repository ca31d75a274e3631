//! Request-facing services

pub mod fish;

pub use fish::{CatchView, FishService, FishStats, FishView, UnlockRequest, UnlockResponse};
