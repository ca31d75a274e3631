//! Seed marker document schema
//!
//! One document per catalog version. The `_id` uniqueness constraint is what
//! lets exactly one process claim the first seed.

use bson::{DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for seed markers
pub const SEED_MARKER_COLLECTION: &str = "seed_markers";

/// Seed marker document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SeedMarkerDoc {
    /// Catalog version, e.g. "fishdex-catalog-v1"
    #[serde(rename = "_id")]
    pub version: String,

    /// Node that won the claim
    pub claimed_by: String,

    pub claimed_at: DateTime,

    /// Set once the bulk insert finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species_count: Option<i64>,
}

impl SeedMarkerDoc {
    /// Create an unfinished claim for `version`
    pub fn claim(version: &str, claimed_by: &str) -> Self {
        Self {
            version: version.to_string(),
            claimed_by: claimed_by.to_string(),
            claimed_at: DateTime::now(),
            completed_at: None,
            species_count: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

impl IntoIndexes for SeedMarkerDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // `_id` carries the uniqueness constraint
        Vec::new()
    }
}
