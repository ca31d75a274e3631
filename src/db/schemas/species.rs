//! Species document schema
//!
//! Reference data written once by the catalog seeder and never updated.

use bson::{doc, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::db::mongo::IntoIndexes;

/// Collection name for species
pub const SPECIES_COLLECTION: &str = "fish";

/// Environment a species is associated with.
///
/// Stored and served with the catalog's Italian names; the English names are
/// accepted on input.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Habitat {
    #[serde(rename = "mare", alias = "marine")]
    Marine,
    #[serde(rename = "fiume", alias = "river")]
    River,
    #[serde(rename = "lago", alias = "lake")]
    Lake,
}

impl Habitat {
    pub const ALL: [Habitat; 3] = [Habitat::Marine, Habitat::River, Habitat::Lake];

    /// Stored value, used in count filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Habitat::Marine => "mare",
            Habitat::River => "fiume",
            Habitat::Lake => "lago",
        }
    }
}

impl fmt::Display for Habitat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catch details attached to a species. Never written by any code path.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UserCatch {
    pub photo: String,
    pub location: String,
    pub equipment: String,
    pub date: String,
}

/// Species document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDoc {
    /// UUID v4 string assigned at seed time
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub scientific_name: String,

    pub habitat: Habitat,

    pub description: String,

    /// URI or data URI; opaque to the service
    pub reference_image: String,

    #[serde(default)]
    pub is_unlocked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_catch: Option<UserCatch>,
}

impl IntoIndexes for SpeciesDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "habitat": 1 },
            Some(
                IndexOptions::builder()
                    .name("habitat_idx".to_string())
                    .build(),
            ),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SpeciesDoc {
        SpeciesDoc {
            id: "0b5c3a4e-2f7e-4f43-9a55-4d7f6f0d1c11".to_string(),
            name: "Spigola".to_string(),
            scientific_name: "Dicentrarchus labrax".to_string(),
            habitat: Habitat::Marine,
            description: "Predatore costiero".to_string(),
            reference_image: "data:image/svg+xml;base64,AAAA".to_string(),
            is_unlocked: false,
            user_catch: None,
        }
    }

    #[test]
    fn test_document_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["_id"], "0b5c3a4e-2f7e-4f43-9a55-4d7f6f0d1c11");
        assert_eq!(value["scientificName"], "Dicentrarchus labrax");
        assert_eq!(value["referenceImage"], "data:image/svg+xml;base64,AAAA");
        assert_eq!(value["habitat"], "mare");
        assert!(value.get("userCatch").is_none());
    }

    #[test]
    fn test_document_without_unlock_fields_reads_back() {
        // Catalogs seeded before isUnlocked was stored lack the field entirely
        let raw = serde_json::json!({
            "_id": "abc",
            "name": "Luccio",
            "scientificName": "Esox lucius",
            "habitat": "fiume",
            "description": "Predatore",
            "referenceImage": "img",
        });
        let doc: SpeciesDoc = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.habitat, Habitat::River);
        assert!(!doc.is_unlocked);
        assert!(doc.user_catch.is_none());
    }

    #[test]
    fn test_habitat_accepts_english_names() {
        let h: Habitat = serde_json::from_str("\"lake\"").unwrap();
        assert_eq!(h, Habitat::Lake);
        assert_eq!(serde_json::to_string(&h).unwrap(), "\"lago\"");
        assert!(serde_json::from_str::<Habitat>("\"pond\"").is_err());
    }

    #[test]
    fn test_habitat_index() {
        let indices = SpeciesDoc::into_indices();
        assert_eq!(indices.len(), 1);
        assert_eq!(indices[0].0, doc! { "habitat": 1 });
    }
}
