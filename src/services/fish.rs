//! Fish query, unlock, and aggregate service
//!
//! Every operation maps to one store call (stats issues five independent
//! counts). Nothing is cached; nothing is shared between calls beyond the
//! store handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::db::{CatchDoc, Habitat, SpeciesDoc, UserCatch};
use crate::store::CatalogStore;
use crate::types::{FishdexError, Result};

/// Default row cap for listing the catalog
pub const DEFAULT_LIST_LIMIT: i64 = 1000;

/// Species as served over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FishView {
    pub id: String,
    pub name: String,
    pub scientific_name: String,
    pub habitat: Habitat,
    pub description: String,
    pub reference_image: String,
    pub is_unlocked: bool,
    pub user_catch: Option<UserCatch>,
}

impl From<SpeciesDoc> for FishView {
    fn from(doc: SpeciesDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            scientific_name: doc.scientific_name,
            habitat: doc.habitat,
            description: doc.description,
            reference_image: doc.reference_image,
            is_unlocked: doc.is_unlocked,
            user_catch: doc.user_catch,
        }
    }
}

/// Catch as served over HTTP
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatchView {
    pub id: String,
    pub fish_id: String,
    pub photo: String,
    pub location: String,
    pub equipment: String,
    pub date: String,
    /// Serialized as RFC 3339
    pub created_at: DateTime<Utc>,
}

impl From<CatchDoc> for CatchView {
    fn from(doc: CatchDoc) -> Self {
        Self {
            id: doc.id,
            fish_id: doc.fish_id,
            photo: doc.photo,
            location: doc.location,
            equipment: doc.equipment,
            date: doc.date,
            created_at: doc.created_at.to_chrono(),
        }
    }
}

/// Unlock request body; every field is required
#[derive(Debug, Clone, Deserialize)]
pub struct UnlockRequest {
    pub photo: String,
    pub location: String,
    pub equipment: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub success: bool,
    pub message: String,
}

/// Aggregate counts, recomputed on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishStats {
    pub total_fish: u64,
    pub total_catches: u64,
    pub marine_fish: u64,
    pub river_fish: u64,
    pub lake_fish: u64,
}

/// Catalog reads, catch writes, and stats over a [`CatalogStore`]
pub struct FishService {
    store: Arc<dyn CatalogStore>,
    list_limit: i64,
    strict_unlock: bool,
}

impl FishService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            list_limit: DEFAULT_LIST_LIMIT,
            strict_unlock: false,
        }
    }

    /// Cap on rows returned by [`FishService::list_all`]; excess rows are dropped silently
    pub fn with_list_limit(mut self, limit: i64) -> Self {
        self.list_limit = limit;
        self
    }

    /// Reject unlocks for ids that are not in the catalog
    pub fn with_strict_unlock(mut self, strict: bool) -> Self {
        self.strict_unlock = strict;
        self
    }

    /// Backend name of the underlying store
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Full catalog in storage order, capped at the list limit
    pub async fn list_all(&self) -> Result<Vec<FishView>> {
        let species = self.store.list_species(self.list_limit).await?;
        debug!(count = species.len(), limit = self.list_limit, "Listed species");
        Ok(species.into_iter().map(FishView::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<FishView> {
        self.store
            .find_species(id)
            .await?
            .map(FishView::from)
            .ok_or_else(|| FishdexError::NotFound("Fish not found".into()))
    }

    /// Record a catch for `fish_id`.
    ///
    /// The species record is left untouched. Unless strict mode is on, the id
    /// is not checked against the catalog.
    pub async fn unlock(&self, fish_id: &str, request: UnlockRequest) -> Result<UnlockResponse> {
        if self.strict_unlock && self.store.find_species(fish_id).await?.is_none() {
            return Err(FishdexError::NotFound("Fish not found".into()));
        }

        let catch = CatchDoc::new(
            fish_id.to_string(),
            request.photo,
            request.location,
            request.equipment,
            request.date,
        );
        let catch_id = catch.id.clone();

        self.store.insert_catch(catch).await?;
        debug!(fish_id = %fish_id, catch_id = %catch_id, "Catch recorded");

        Ok(UnlockResponse {
            success: true,
            message: "Fish unlocked successfully".to_string(),
        })
    }

    /// Catches recorded against `fish_id`, oldest first
    pub async fn catches_for(&self, fish_id: &str) -> Result<Vec<CatchView>> {
        let catches = self.store.list_catches(fish_id).await?;
        Ok(catches.into_iter().map(CatchView::from).collect())
    }

    pub async fn stats(&self) -> Result<FishStats> {
        let store = &self.store;
        let (total_fish, total_catches, marine_fish, river_fish, lake_fish) = tokio::try_join!(
            store.count_species(None),
            store.count_catches(),
            store.count_species(Some(Habitat::Marine)),
            store.count_species(Some(Habitat::River)),
            store.count_species(Some(Habitat::Lake)),
        )?;

        Ok(FishStats {
            total_fish,
            total_catches,
            marine_fish,
            river_fish,
            lake_fish,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fish_catalog, CatalogSeeder};
    use crate::db::SeedMarkerDoc;
    use crate::store::MemoryCatalogStore;
    use tokio_test::{assert_err, assert_ok};

    async fn seeded() -> (Arc<dyn CatalogStore>, FishService) {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryCatalogStore::new());
        CatalogSeeder::new(Arc::clone(&store), "test")
            .ensure_seeded(&fish_catalog())
            .await
            .unwrap();
        let service = FishService::new(Arc::clone(&store));
        (store, service)
    }

    fn request(location: &str) -> UnlockRequest {
        UnlockRequest {
            photo: "data:image/jpeg;base64,/9j/".to_string(),
            location: location.to_string(),
            equipment: "Canna da spinning".to_string(),
            date: "2024-06-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_stats_after_seed() {
        let (_, service) = seeded().await;
        let stats = service.stats().await.unwrap();
        assert_eq!(
            stats,
            FishStats {
                total_fish: 151,
                total_catches: 0,
                marine_fish: 50,
                river_fish: 51,
                lake_fish: 50,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_habitats_sum_to_total() {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryCatalogStore::new());
        let service = FishService::new(Arc::clone(&store));

        let empty = service.stats().await.unwrap();
        assert_eq!(empty.total_fish, empty.marine_fish + empty.river_fish + empty.lake_fish);

        let docs = fish_catalog()
            .into_iter()
            .take(30)
            .enumerate()
            .map(|(i, e)| e.into_doc(format!("id-{}", i)))
            .collect();
        store.insert_species(docs).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_fish, 30);
        assert_eq!(stats.total_fish, stats.marine_fish + stats.river_fish + stats.lake_fish);
    }

    #[tokio::test]
    async fn test_unlock_twice_records_two_catches() {
        let (store, service) = seeded().await;
        let fish = service.list_all().await.unwrap().remove(0);

        let first = assert_ok!(service.unlock(&fish.id, request("Lago Maggiore")).await);
        assert!(first.success);
        assert_ok!(service.unlock(&fish.id, request("Fiume Ticino")).await);

        let catches = service.catches_for(&fish.id).await.unwrap();
        assert_eq!(catches.len(), 2);
        assert_ne!(catches[0].id, catches[1].id);
        assert_eq!(catches[0].location, "Lago Maggiore");
        assert_eq!(catches[1].location, "Fiume Ticino");

        // Species record unchanged
        let after = service.get_by_id(&fish.id).await.unwrap();
        assert_eq!(after, fish);
        assert!(!after.is_unlocked);
        assert!(after.user_catch.is_none());

        assert_eq!(store.count_catches().await.unwrap(), 2);
        assert_eq!(service.stats().await.unwrap().total_catches, 2);
    }

    #[tokio::test]
    async fn test_unlock_unknown_id_is_accepted_by_default() {
        let (_, service) = seeded().await;
        let response = service.unlock("no-such-fish", request("Porto")).await.unwrap();
        assert!(response.success);
        assert_eq!(response.message, "Fish unlocked successfully");
        assert_eq!(service.catches_for("no-such-fish").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_strict_unlock_rejects_unknown_id() {
        let (store, _) = seeded().await;
        let service = FishService::new(Arc::clone(&store)).with_strict_unlock(true);

        let err = assert_err!(service.unlock("no-such-fish", request("Porto")).await);
        assert!(matches!(err, FishdexError::NotFound(_)));
        assert_eq!(store.count_catches().await.unwrap(), 0);

        let fish = service.list_all().await.unwrap().remove(0);
        assert_ok!(service.unlock(&fish.id, request("Porto")).await);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let (_, service) = seeded().await;
        let err = service.get_by_id("00000000-0000-0000-0000-000000000000").await.unwrap_err();
        assert!(matches!(err, FishdexError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_matches_list_entry() {
        let (_, service) = seeded().await;
        let all = service.list_all().await.unwrap();
        assert_eq!(all.len(), 151);

        for listed in all.iter().step_by(25) {
            let fetched = service.get_by_id(&listed.id).await.unwrap();
            assert_eq!(&fetched, listed);
        }
    }

    #[tokio::test]
    async fn test_list_truncates_at_limit() {
        let (store, _) = seeded().await;
        let service = FishService::new(store).with_list_limit(100);
        assert_eq!(service.list_all().await.unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_list_preserves_seed_order() {
        let (_, service) = seeded().await;
        let names: Vec<String> = service.list_all().await.unwrap().into_iter().map(|f| f.name).collect();
        let expected: Vec<String> = fish_catalog().into_iter().map(|e| e.name).collect();
        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn test_view_serializes_with_plain_id() {
        let (_, service) = seeded().await;
        let fish = service.list_all().await.unwrap().remove(0);
        let value = serde_json::to_value(&fish).unwrap();
        assert!(value.get("_id").is_none());
        assert_eq!(value["id"], fish.id.as_str());
        assert_eq!(value["isUnlocked"], false);
        assert!(value["userCatch"].is_null());
        assert_eq!(value["habitat"], "mare");
    }

    #[tokio::test]
    async fn test_catch_view_timestamp_is_rfc3339() {
        let doc = CatchDoc::new("f".into(), "p".into(), "l".into(), "e".into(), "d".into());
        let value = serde_json::to_value(CatchView::from(doc)).unwrap();
        let rendered = value["createdAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(rendered).is_ok());
    }

    #[tokio::test]
    async fn test_seed_marker_does_not_count_as_species() {
        let store: Arc<dyn CatalogStore> = Arc::new(MemoryCatalogStore::new());
        store.claim_seed(SeedMarkerDoc::claim("v", "n")).await.unwrap();
        let stats = FishService::new(store).stats().await.unwrap();
        assert_eq!(stats.total_fish, 0);
    }
}
