//! Species catalog: the reference dataset and the one-time seeder

pub mod dataset;
pub mod seeder;

pub use dataset::{fish_catalog, CatalogEntry, CATALOG_VERSION, MIN_CATALOG_SIZE};
pub use seeder::{CatalogSeeder, SeedOutcome};
