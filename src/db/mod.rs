//! Database layer for fishdex
//!
//! Provides MongoDB storage for the species catalog, catches, and seed markers.

pub mod mongo;
pub mod schemas;

pub use mongo::{MongoClient, MongoCollection};
pub use schemas::{CatchDoc, Habitat, SeedMarkerDoc, SpeciesDoc, UserCatch};
