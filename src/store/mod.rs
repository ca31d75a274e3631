//! Catalog storage seam
//!
//! The seeder and the fish service talk to storage only through
//! [`CatalogStore`]. Each method is a single store operation; nothing here
//! reads and then writes the same record.

mod memory;
mod mongo;

pub use memory::MemoryCatalogStore;
pub use mongo::MongoCatalogStore;

use crate::db::{CatchDoc, Habitat, SeedMarkerDoc, SpeciesDoc};
use crate::types::Result;

/// Persistent store for species, catches, and seed markers
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name for health output
    fn backend(&self) -> &'static str;

    /// Count species, optionally restricted to one habitat
    async fn count_species(&self, habitat: Option<Habitat>) -> Result<u64>;

    /// Bulk insert species, returning how many were written
    async fn insert_species(&self, species: Vec<SpeciesDoc>) -> Result<u64>;

    /// Species in storage order, at most `limit`
    async fn list_species(&self, limit: i64) -> Result<Vec<SpeciesDoc>>;

    async fn find_species(&self, id: &str) -> Result<Option<SpeciesDoc>>;

    async fn insert_catch(&self, catch: CatchDoc) -> Result<()>;

    async fn count_catches(&self) -> Result<u64>;

    /// Catches referencing `fish_id`, in insertion order
    async fn list_catches(&self, fish_id: &str) -> Result<Vec<CatchDoc>>;

    /// Insert the marker unless one with the same version exists.
    /// Returns `true` if this call created it.
    async fn claim_seed(&self, marker: SeedMarkerDoc) -> Result<bool>;

    /// Stamp the marker for `version` as finished
    async fn complete_seed(&self, version: &str, species_count: u64) -> Result<()>;

    /// Drop an unfinished claim held by `claimed_by` so a later boot can
    /// seed again. Completed markers and other nodes' claims are kept.
    async fn release_seed(&self, version: &str, claimed_by: &str) -> Result<()>;

    async fn seed_marker(&self, version: &str) -> Result<Option<SeedMarkerDoc>>;
}
