//! Query Service
//!
//! [`CatalogService`] is built once, up front: it validates the catalog, fits
//! the encoder, runs k-means and labels the store. Every failure surfaces
//! from [`CatalogService::build`]; after that the service only answers
//! read-only queries and can be shared freely across request handlers.

use crate::{
    CatalogConfig, CatalogStore, Clustering, Error, FeatureEncoder, ImageLocator, Item,
    ItemRecord, KMeans, Result, SmallCatalogPolicy,
};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Default number of recommendations per request
pub const DEFAULT_RECOMMENDATIONS: usize = 8;

/// Random source for recommendation sampling
enum Sampler {
    Thread,
    Seeded(Mutex<StdRng>),
}

/// Catalog counts reported at startup and by the root endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub items: usize,
    pub groups: usize,
    pub dimensions: usize,
    pub inertia: f32,
    pub iterations: usize,
}

pub struct CatalogService {
    store: CatalogStore,
    encoder: FeatureEncoder,
    clustering: Clustering,
    images: ImageLocator,
    sampler: Sampler,
    /// Lowercased display names, parallel to the store
    search_keys: Vec<String>,
}

impl CatalogService {
    /// Fit the encoder and grouping on `items` and label the catalog
    pub fn build(items: Vec<Item>, config: &CatalogConfig, images: ImageLocator) -> Result<Self> {
        let store = CatalogStore::new(items)?;
        let n_groups = resolve_groups(store.len(), config)?;

        let encoder = FeatureEncoder::fit(store.all())?;
        let matrix = encoder.encode(store.all());
        info!(
            "Encoded {} items into {} dimensions",
            store.len(),
            encoder.dim()
        );

        let clustering = KMeans::new(n_groups)
            .with_seed(config.seed)
            .with_max_iter(config.max_iter)
            .with_tol(config.tol)
            .fit(&matrix)?;
        info!(
            "Grouped catalog into {} groups in {} iterations (inertia {:.3})",
            n_groups, clustering.n_iter, clustering.inertia
        );

        let store = store.with_group_labels(&clustering.labels, n_groups)?;
        debug!("Group sizes: {:?}", store.group_sizes());

        let sampler = match config.sampling_seed {
            Some(seed) => Sampler::Seeded(Mutex::new(StdRng::seed_from_u64(seed))),
            None => Sampler::Thread,
        };
        let search_keys = store
            .all()
            .iter()
            .map(|item| item.display_name.to_lowercase())
            .collect();

        Ok(Self {
            store,
            encoder,
            clustering,
            images,
            sampler,
            search_keys,
        })
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn n_groups(&self) -> usize {
        self.store.n_groups()
    }

    pub fn group_sizes(&self) -> Vec<usize> {
        self.store.group_sizes()
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            items: self.store.len(),
            groups: self.n_groups(),
            dimensions: self.encoder.dim(),
            inertia: self.clustering.inertia,
            iterations: self.clustering.n_iter,
        }
    }

    /// Group the fitted model would give `item`, which need not be in the catalog
    pub fn predict_group(&self, item: &Item) -> usize {
        self.clustering.predict(&self.encoder.encode_one(item))
    }

    /// Case-insensitive substring match on display names, in store order
    ///
    /// `None` and the empty string match every item.
    pub fn search(&self, text: Option<&str>) -> Vec<&Item> {
        let needle = match text {
            Some(text) if !text.is_empty() => text.to_lowercase(),
            _ => return self.store.all().iter().collect(),
        };

        self.store
            .all()
            .iter()
            .zip(self.search_keys.iter())
            .filter(|(_, key)| key.contains(&needle))
            .map(|(item, _)| item)
            .collect()
    }

    /// Up to `count` random items from `id`'s group, never `id` itself
    ///
    /// Unknown ids and singleton groups yield an empty result.
    pub fn recommend(&self, id: u64, count: usize) -> Vec<&Item> {
        match &self.sampler {
            Sampler::Thread => self.recommend_with_rng(id, count, &mut rand::rng()),
            Sampler::Seeded(rng) => self.recommend_with_rng(id, count, &mut *rng.lock()),
        }
    }

    pub fn recommend_with_rng<R: Rng + ?Sized>(&self, id: u64, count: usize, rng: &mut R) -> Vec<&Item> {
        let Some(group) = self.store.by_id(id).and_then(|item| item.group) else {
            return Vec::new();
        };

        let candidates: Vec<&Item> = self
            .store
            .group_members(group)
            .filter(|item| item.id != id)
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        candidates.choose_multiple(rng, count).copied().collect()
    }

    /// [`CatalogService::search`] with image references attached
    pub fn search_records(&self, text: Option<&str>) -> Vec<ItemRecord> {
        self.images.attach_images(self.search(text))
    }

    /// [`CatalogService::recommend`] with image references attached
    pub fn recommend_records(&self, id: u64, count: usize) -> Vec<ItemRecord> {
        self.images.attach_images(self.recommend(id, count))
    }
}

fn resolve_groups(items: usize, config: &CatalogConfig) -> Result<usize> {
    if config.n_groups == 0 {
        return Err(Error::InvalidConfig("n_groups must be positive".to_string()));
    }
    if items >= config.n_groups {
        return Ok(config.n_groups);
    }

    match config.small_catalog {
        SmallCatalogPolicy::Fail => Err(Error::TooFewItems {
            items,
            groups: config.n_groups,
        }),
        SmallCatalogPolicy::Clamp => {
            warn!(
                "Catalog has {} items, reducing groups from {} to {}",
                items, config.n_groups, items
            );
            Ok(items)
        }
    }
}
