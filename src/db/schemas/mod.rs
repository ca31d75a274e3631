//! Database schemas for fishdex
//!
//! Defines MongoDB document structures for species, catches, and seed markers.

mod catch;
mod seed_marker;
mod species;

pub use catch::{CatchDoc, CATCH_COLLECTION};
pub use seed_marker::{SeedMarkerDoc, SEED_MARKER_COLLECTION};
pub use species::{Habitat, SpeciesDoc, UserCatch, SPECIES_COLLECTION};
