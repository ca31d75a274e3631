//! Catalog seeder
//!
//! Materializes the reference catalog into the species collection exactly once.
//!
//! ## Sequence
//!
//! ```text
//! count species ── > 0 ──▶ AlreadySeeded
//!      │ 0
//!      ▼
//! claim seed marker ── duplicate ──▶ ClaimedElsewhere
//!      │ won
//!      ▼
//! bulk insert (fresh ids) ──▶ stamp marker ──▶ Inserted
//! ```
//!
//! The marker's `_id` is the catalog version, so two processes booting against
//! an empty store cannot both insert. When the bulk insert returns an error the
//! claim is released, so the next boot seeds again. A claim left behind by a
//! process that died mid-insert stays unfinished; it is reported on every boot
//! and must be removed by hand before the catalog can be seeded again.

use std::sync::Arc;
use tracing::{info, warn};

use super::dataset::{CatalogEntry, CATALOG_VERSION};
use crate::db::SeedMarkerDoc;
use crate::store::CatalogStore;
use crate::types::Result;

/// What `ensure_seeded` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// This process wrote the catalog
    Inserted(u64),
    /// The species collection was already non-empty
    AlreadySeeded(u64),
    /// Another process holds the seed marker
    ClaimedElsewhere,
}

/// Seeds the species collection from a fixed dataset
pub struct CatalogSeeder {
    store: Arc<dyn CatalogStore>,
    node_id: String,
    version: String,
}

impl CatalogSeeder {
    pub fn new(store: Arc<dyn CatalogStore>, node_id: impl Into<String>) -> Self {
        Self {
            store,
            node_id: node_id.into(),
            version: CATALOG_VERSION.to_string(),
        }
    }

    /// Override the marker version (tests, dataset migrations)
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Populate the species collection unless it already holds anything.
    ///
    /// Any non-empty collection counts as seeded; its contents are not
    /// compared against `dataset`. Storage errors are returned as-is and
    /// should abort startup.
    pub async fn ensure_seeded(&self, dataset: &[CatalogEntry]) -> Result<SeedOutcome> {
        let existing = self.store.count_species(None).await?;
        if existing > 0 {
            info!("Fish catalog already initialized with {} species", existing);
            return Ok(SeedOutcome::AlreadySeeded(existing));
        }

        let claimed = self
            .store
            .claim_seed(SeedMarkerDoc::claim(&self.version, &self.node_id))
            .await?;

        if !claimed {
            self.report_foreign_claim().await;
            return Ok(SeedOutcome::ClaimedElsewhere);
        }

        let documents = dataset
            .iter()
            .cloned()
            .map(|entry| entry.into_doc(uuid::Uuid::new_v4().to_string()))
            .collect();

        let inserted = match self.store.insert_species(documents).await {
            Ok(n) => n,
            Err(e) => {
                self.release_claim().await;
                return Err(e);
            }
        };
        info!(
            version = %self.version,
            node_id = %self.node_id,
            "Initialized fish catalog with {} species",
            inserted
        );

        if let Err(e) = self.store.complete_seed(&self.version, inserted).await {
            warn!(version = %self.version, error = %e, "Catalog inserted but seed marker not stamped");
        }

        Ok(SeedOutcome::Inserted(inserted))
    }

    async fn release_claim(&self) {
        match self.store.release_seed(&self.version, &self.node_id).await {
            Ok(()) => warn!(version = %self.version, "Catalog insert failed; seed claim released"),
            Err(e) => warn!(
                version = %self.version,
                error = %e,
                "Catalog insert failed and the seed claim could not be released"
            ),
        }
    }

    async fn report_foreign_claim(&self) {
        match self.store.seed_marker(&self.version).await {
            Ok(Some(marker)) if marker.is_complete() => warn!(
                version = %self.version,
                claimed_by = %marker.claimed_by,
                "Seed marker is complete but the catalog is empty; delete the marker to re-seed"
            ),
            Ok(Some(marker)) => warn!(
                version = %self.version,
                claimed_by = %marker.claimed_by,
                claimed_at = %marker.claimed_at,
                "Catalog seed claimed by another node and not finished; skipping"
            ),
            Ok(None) => warn!(version = %self.version, "Seed claim lost but marker not found"),
            Err(e) => warn!(version = %self.version, error = %e, "Could not read seed marker"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dataset::{fish_catalog, MIN_CATALOG_SIZE};
    use crate::db::{CatchDoc, Habitat, SpeciesDoc};
    use crate::store::MemoryCatalogStore;
    use crate::types::FishdexError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn store() -> Arc<dyn CatalogStore> {
        Arc::new(MemoryCatalogStore::new())
    }

    /// Memory store whose first species insert fails
    #[derive(Default)]
    struct FailFirstInsert {
        inner: MemoryCatalogStore,
        failed: AtomicBool,
    }

    #[async_trait::async_trait]
    impl CatalogStore for FailFirstInsert {
        fn backend(&self) -> &'static str {
            "memory"
        }

        async fn count_species(&self, habitat: Option<Habitat>) -> Result<u64> {
            self.inner.count_species(habitat).await
        }

        async fn insert_species(&self, species: Vec<SpeciesDoc>) -> Result<u64> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(FishdexError::Database("connection reset".into()));
            }
            self.inner.insert_species(species).await
        }

        async fn list_species(&self, limit: i64) -> Result<Vec<SpeciesDoc>> {
            self.inner.list_species(limit).await
        }

        async fn find_species(&self, id: &str) -> Result<Option<SpeciesDoc>> {
            self.inner.find_species(id).await
        }

        async fn insert_catch(&self, catch: CatchDoc) -> Result<()> {
            self.inner.insert_catch(catch).await
        }

        async fn count_catches(&self) -> Result<u64> {
            self.inner.count_catches().await
        }

        async fn list_catches(&self, fish_id: &str) -> Result<Vec<CatchDoc>> {
            self.inner.list_catches(fish_id).await
        }

        async fn claim_seed(&self, marker: SeedMarkerDoc) -> Result<bool> {
            self.inner.claim_seed(marker).await
        }

        async fn complete_seed(&self, version: &str, species_count: u64) -> Result<()> {
            self.inner.complete_seed(version, species_count).await
        }

        async fn release_seed(&self, version: &str, claimed_by: &str) -> Result<()> {
            self.inner.release_seed(version, claimed_by).await
        }

        async fn seed_marker(&self, version: &str) -> Result<Option<SeedMarkerDoc>> {
            self.inner.seed_marker(version).await
        }
    }

    #[tokio::test]
    async fn test_failed_insert_is_retried_on_next_boot() {
        let store: Arc<dyn CatalogStore> = Arc::new(FailFirstInsert::default());
        let dataset = fish_catalog();

        let first = CatalogSeeder::new(Arc::clone(&store), "node-a");
        assert_err!(first.ensure_seeded(&dataset).await);
        assert!(store.seed_marker(CATALOG_VERSION).await.unwrap().is_none());
        assert_eq!(store.count_species(None).await.unwrap(), 0);

        let second = CatalogSeeder::new(Arc::clone(&store), "node-a");
        let outcome = assert_ok!(second.ensure_seeded(&dataset).await);
        assert_eq!(outcome, SeedOutcome::Inserted(dataset.len() as u64));
        assert_eq!(store.count_species(None).await.unwrap(), dataset.len() as u64);
    }

    #[tokio::test]
    async fn test_seed_inserts_full_catalog() {
        let store = store();
        let seeder = CatalogSeeder::new(Arc::clone(&store), "node-a");
        let dataset = fish_catalog();

        let outcome = assert_ok!(seeder.ensure_seeded(&dataset).await);
        assert_eq!(outcome, SeedOutcome::Inserted(dataset.len() as u64));

        let total = store.count_species(None).await.unwrap();
        assert!(total as usize >= MIN_CATALOG_SIZE);
        for habitat in Habitat::ALL {
            assert!(store.count_species(Some(habitat)).await.unwrap() > 0);
        }

        let marker = store.seed_marker(CATALOG_VERSION).await.unwrap().unwrap();
        assert!(marker.is_complete());
        assert_eq!(marker.claimed_by, "node-a");
        assert_eq!(marker.species_count, Some(total as i64));
    }

    #[tokio::test]
    async fn test_seed_twice_is_idempotent() {
        let store = store();
        let seeder = CatalogSeeder::new(Arc::clone(&store), "node-a");
        let dataset = fish_catalog();

        seeder.ensure_seeded(&dataset).await.unwrap();
        let after_first = store.count_species(None).await.unwrap();

        let outcome = seeder.ensure_seeded(&dataset).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadySeeded(after_first));
        assert_eq!(store.count_species(None).await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_nonempty_collection_is_not_reconciled() {
        let store = store();
        let dataset = fish_catalog();
        let partial: Vec<_> = dataset
            .iter()
            .take(3)
            .cloned()
            .map(|e| e.into_doc(uuid::Uuid::new_v4().to_string()))
            .collect();
        store.insert_species(partial).await.unwrap();

        let seeder = CatalogSeeder::new(Arc::clone(&store), "node-a");
        let outcome = seeder.ensure_seeded(&dataset).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadySeeded(3));
        assert_eq!(store.count_species(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_foreign_claim_blocks_insert() {
        let store = store();
        store
            .claim_seed(SeedMarkerDoc::claim(CATALOG_VERSION, "node-b"))
            .await
            .unwrap();

        let seeder = CatalogSeeder::new(Arc::clone(&store), "node-a");
        let outcome = seeder.ensure_seeded(&fish_catalog()).await.unwrap();
        assert_eq!(outcome, SeedOutcome::ClaimedElsewhere);
        assert_eq!(store.count_species(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_boot_seeds_once() {
        let store = store();
        let dataset = fish_catalog();
        let a = CatalogSeeder::new(Arc::clone(&store), "node-a");
        let b = CatalogSeeder::new(Arc::clone(&store), "node-b");

        let (ra, rb) = tokio::join!(a.ensure_seeded(&dataset), b.ensure_seeded(&dataset));
        let outcomes = [ra.unwrap(), rb.unwrap()];

        let inserted = outcomes
            .iter()
            .filter(|o| matches!(o, SeedOutcome::Inserted(_)))
            .count();
        assert_eq!(inserted, 1);
        assert_eq!(store.count_species(None).await.unwrap(), dataset.len() as u64);
    }

    #[tokio::test]
    async fn test_new_version_reclaims_after_catalog_wipe() {
        let store = store();
        store
            .claim_seed(SeedMarkerDoc::claim(CATALOG_VERSION, "node-b"))
            .await
            .unwrap();

        let seeder = CatalogSeeder::new(Arc::clone(&store), "node-a").with_version("fishdex-catalog-v2");
        let outcome = seeder.ensure_seeded(&fish_catalog()).await.unwrap();
        assert!(matches!(outcome, SeedOutcome::Inserted(_)));
    }

    #[tokio::test]
    async fn test_fresh_ids_per_entry() {
        let store = store();
        CatalogSeeder::new(Arc::clone(&store), "node-a")
            .ensure_seeded(&fish_catalog())
            .await
            .unwrap();

        let species = store.list_species(1000).await.unwrap();
        let ids: std::collections::HashSet<_> = species.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), species.len());
    }
}
