//! In-process catalog store
//!
//! Used in dev mode when MongoDB is unreachable, and by tests. Keeps
//! insertion order so listing behaves like a natural-order collection scan.

use bson::DateTime;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::CatalogStore;
use crate::db::{CatchDoc, Habitat, SeedMarkerDoc, SpeciesDoc};
use crate::types::{FishdexError, Result};

#[derive(Default)]
struct Collections {
    species: Vec<SpeciesDoc>,
    catches: Vec<CatchDoc>,
    markers: Vec<SeedMarkerDoc>,
}

/// Memory-only catalog store
#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: RwLock<Collections>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|_| FishdexError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|_| FishdexError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn count_species(&self, habitat: Option<Habitat>) -> Result<u64> {
        let data = self.read()?;
        let count = match habitat {
            Some(h) => data.species.iter().filter(|s| s.habitat == h).count(),
            None => data.species.len(),
        };
        Ok(count as u64)
    }

    async fn insert_species(&self, species: Vec<SpeciesDoc>) -> Result<u64> {
        let mut data = self.write()?;

        // Reject the whole batch on a duplicate id, like an ordered bulk insert
        // failing on its first conflict
        if let Some(dup) = species
            .iter()
            .find(|s| data.species.iter().any(|existing| existing.id == s.id))
        {
            return Err(FishdexError::Database(format!("duplicate species id {}", dup.id)));
        }

        let count = species.len() as u64;
        data.species.extend(species);
        Ok(count)
    }

    async fn list_species(&self, limit: i64) -> Result<Vec<SpeciesDoc>> {
        let data = self.read()?;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(data.species.iter().take(limit).cloned().collect())
    }

    async fn find_species(&self, id: &str) -> Result<Option<SpeciesDoc>> {
        Ok(self.read()?.species.iter().find(|s| s.id == id).cloned())
    }

    async fn insert_catch(&self, catch: CatchDoc) -> Result<()> {
        self.write()?.catches.push(catch);
        Ok(())
    }

    async fn count_catches(&self) -> Result<u64> {
        Ok(self.read()?.catches.len() as u64)
    }

    async fn list_catches(&self, fish_id: &str) -> Result<Vec<CatchDoc>> {
        Ok(self
            .read()?
            .catches
            .iter()
            .filter(|c| c.fish_id == fish_id)
            .cloned()
            .collect())
    }

    async fn claim_seed(&self, marker: SeedMarkerDoc) -> Result<bool> {
        let mut data = self.write()?;
        if data.markers.iter().any(|m| m.version == marker.version) {
            return Ok(false);
        }
        data.markers.push(marker);
        Ok(true)
    }

    async fn complete_seed(&self, version: &str, species_count: u64) -> Result<()> {
        let mut data = self.write()?;
        if let Some(marker) = data.markers.iter_mut().find(|m| m.version == version) {
            marker.completed_at = Some(DateTime::now());
            marker.species_count = Some(species_count as i64);
        }
        Ok(())
    }

    async fn release_seed(&self, version: &str, claimed_by: &str) -> Result<()> {
        self.write()?.markers.retain(|m| {
            m.version != version || m.claimed_by != claimed_by || m.is_complete()
        });
        Ok(())
    }

    async fn seed_marker(&self, version: &str) -> Result<Option<SeedMarkerDoc>> {
        Ok(self
            .read()?
            .markers
            .iter()
            .find(|m| m.version == version)
            .cloned())
    }
}
