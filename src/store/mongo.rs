//! MongoDB-backed catalog store

use bson::{doc, DateTime};

use super::CatalogStore;
use crate::db::schemas::{CATCH_COLLECTION, SEED_MARKER_COLLECTION, SPECIES_COLLECTION};
use crate::db::{CatchDoc, Habitat, MongoClient, MongoCollection, SeedMarkerDoc, SpeciesDoc};
use crate::types::Result;

/// Catalog store over the `fish`, `user_catches` and `seed_markers` collections
pub struct MongoCatalogStore {
    species: MongoCollection<SpeciesDoc>,
    catches: MongoCollection<CatchDoc>,
    markers: MongoCollection<SeedMarkerDoc>,
}

impl MongoCatalogStore {
    /// Open the collections (and apply their indexes) on a connected client
    pub async fn new(mongo: &MongoClient) -> Result<Self> {
        Ok(Self {
            species: mongo.collection(SPECIES_COLLECTION).await?,
            catches: mongo.collection(CATCH_COLLECTION).await?,
            markers: mongo.collection(SEED_MARKER_COLLECTION).await?,
        })
    }
}

#[async_trait::async_trait]
impl CatalogStore for MongoCatalogStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn count_species(&self, habitat: Option<Habitat>) -> Result<u64> {
        let filter = match habitat {
            Some(h) => doc! { "habitat": h.as_str() },
            None => doc! {},
        };
        self.species.count(filter).await
    }

    async fn insert_species(&self, species: Vec<SpeciesDoc>) -> Result<u64> {
        self.species.insert_many(species).await
    }

    async fn list_species(&self, limit: i64) -> Result<Vec<SpeciesDoc>> {
        self.species.find_many(doc! {}, None, Some(limit)).await
    }

    async fn find_species(&self, id: &str) -> Result<Option<SpeciesDoc>> {
        self.species.find_one(doc! { "_id": id }).await
    }

    async fn insert_catch(&self, catch: CatchDoc) -> Result<()> {
        self.catches.insert_one(catch).await
    }

    async fn count_catches(&self) -> Result<u64> {
        self.catches.count(doc! {}).await
    }

    async fn list_catches(&self, fish_id: &str) -> Result<Vec<CatchDoc>> {
        // Millisecond timestamps; catches written in the same millisecond may
        // come back in either order
        self.catches
            .find_many(doc! { "fish_id": fish_id }, Some(doc! { "created_at": 1 }), None)
            .await
    }

    async fn claim_seed(&self, marker: SeedMarkerDoc) -> Result<bool> {
        self.markers.try_insert_one(marker).await
    }

    async fn complete_seed(&self, version: &str, species_count: u64) -> Result<()> {
        let species_count = species_count as i64;
        self.markers
            .update_one(
                doc! { "_id": version },
                doc! {
                    "$set": {
                        "completed_at": DateTime::now(),
                        "species_count": species_count,
                    }
                },
            )
            .await?;
        Ok(())
    }

    async fn release_seed(&self, version: &str, claimed_by: &str) -> Result<()> {
        self.markers
            .delete_one(doc! {
                "_id": version,
                "claimed_by": claimed_by,
                "completed_at": { "$exists": false },
            })
            .await?;
        Ok(())
    }

    async fn seed_marker(&self, version: &str) -> Result<Option<SeedMarkerDoc>> {
        self.markers.find_one(doc! { "_id": version }).await
    }
}
