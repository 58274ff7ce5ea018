//! # Wardrobe
//!
//! Catalog search and "similar item" recommendations for a fashion catalog.
//!
//! At startup the catalog snapshot is encoded (one-hot categories plus a
//! standardized year) and partitioned into similarity groups with seeded
//! k-means. Recommendations are uniform random samples from the queried
//! item's group, never including the item itself.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! wardrobe --data data/styles.csv --images-dir images --http-port 5000
//! curl 'http://127.0.0.1:5000/search?q=navy'
//! curl 'http://127.0.0.1:5000/recommend?id=15970'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use wardrobe::prelude::*;
//!
//! let items = load_catalog("data/styles.csv").unwrap();
//! let service = CatalogService::build(items, &CatalogConfig::default(), ImageLocator::default()).unwrap();
//!
//! let shirts = service.search(Some("shirt"));
//! let similar = service.recommend(shirts[0].id, 8);
//! ```
//!
//! ## Crate Structure
//!
//! - [`wardrobe-core`](https://docs.rs/wardrobe-core) - Catalog store, encoder, k-means, query service
//! - [`wardrobe-ingest`](https://docs.rs/wardrobe-ingest) - Styles CSV ingestion
//! - [`wardrobe-api`](https://docs.rs/wardrobe-api) - REST API

// Re-export core types
pub use wardrobe_core::{
    CatalogConfig, CatalogService, CatalogStore, CatalogSummary, CategoricalFeature,
    Clustering, Error, FeatureEncoder, ImageLocator, Item, ItemRecord, KMeans, Result,
    SmallCatalogPolicy, Vector, DEFAULT_RECOMMENDATIONS,
};

// Re-export ingestion
pub use wardrobe_ingest::{load_catalog, CatalogReader, IngestReport};

// Re-export API
pub use wardrobe_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_catalog, CatalogConfig, CatalogReader, CatalogService, Error, ImageLocator, Item,
        ItemRecord, RestApi, Result, SmallCatalogPolicy,
    };
}
