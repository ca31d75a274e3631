//! Catch document schema
//!
//! Append-only unlock events. `fish_id` is a weak reference to a species `_id`.

use bson::{doc, DateTime, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;

/// Collection name for catches
pub const CATCH_COLLECTION: &str = "user_catches";

/// Catch document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CatchDoc {
    /// UUID v4 string assigned at write time
    #[serde(rename = "_id")]
    pub id: String,

    pub fish_id: String,

    pub photo: String,

    pub location: String,

    pub equipment: String,

    /// Caller-supplied, not parsed
    pub date: String,

    /// Server-assigned insertion time
    pub created_at: DateTime,
}

impl CatchDoc {
    /// Create a new catch with a fresh id and the current time
    pub fn new(
        fish_id: String,
        photo: String,
        location: String,
        equipment: String,
        date: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            fish_id,
            photo,
            location,
            equipment,
            date,
            created_at: DateTime::now(),
        }
    }
}

impl IntoIndexes for CatchDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "fish_id": 1 },
            Some(
                IndexOptions::builder()
                    .name("fish_id_idx".to_string())
                    .build(),
            ),
        )]
    }
}
