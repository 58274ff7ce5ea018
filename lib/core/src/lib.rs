//! # Wardrobe Core
//!
//! Core library for the Wardrobe catalog recommender.
//!
//! This crate provides the catalog model and the offline grouping pipeline:
//!
//! - [`Item`] - One catalog entry with its categorical and numeric attributes
//! - [`CatalogStore`] - Immutable item table keyed by id
//! - [`FeatureEncoder`] - One-hot categories plus standardized year
//! - [`KMeans`] - Seeded k-means partitioning of encoded rows
//! - [`CatalogService`] - Build-once service answering search and recommend
//! - [`ImageLocator`] - Attaches image references to result rows
//!
//! ## Example
//!
//! ```rust
//! use wardrobe_core::{CatalogConfig, CatalogService, ImageLocator, Item};
//!
//! let items = vec![
//!     Item::new(1, "Blue Tee", "Apparel", "Tshirts", "Blue", "Men", "Summer", 2012, "Casual"),
//!     Item::new(2, "Navy Tee", "Apparel", "Tshirts", "Navy Blue", "Men", "Summer", 2012, "Casual"),
//!     Item::new(3, "Steel Watch", "Accessories", "Watches", "Silver", "Men", "Winter", 2016, "Formal"),
//! ];
//! let config = CatalogConfig { n_groups: 2, ..CatalogConfig::default() };
//! let service = CatalogService::build(items, &config, ImageLocator::default()).unwrap();
//!
//! assert_eq!(service.search(Some("tee")).len(), 2);
//! let similar = service.recommend(1, 8);
//! assert!(similar.iter().all(|item| item.id != 1));
//! ```

pub mod catalog;
pub mod cluster;
pub mod config;
pub mod encoder;
pub mod error;
pub mod image;
pub mod item;
pub mod service;
pub mod vector;

pub use catalog::CatalogStore;
pub use cluster::{Clustering, KMeans};
pub use config::{CatalogConfig, SmallCatalogPolicy};
pub use encoder::{FeatureEncoder, YearScaler};
pub use error::{Error, Result};
pub use image::ImageLocator;
pub use item::{CategoricalFeature, Item, ItemRecord};
pub use service::{CatalogService, CatalogSummary, DEFAULT_RECOMMENDATIONS};
pub use vector::Vector;
