/// What to do when the catalog has fewer items than requested groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmallCatalogPolicy {
    /// Refuse to build
    #[default]
    Fail,
    /// Reduce the group count to the item count
    Clamp,
}

/// Configuration for building a [`crate::CatalogService`]
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub n_groups: usize,
    /// Seed for k-means initialization
    pub seed: u64,
    pub max_iter: usize,
    pub tol: f32,
    pub small_catalog: SmallCatalogPolicy,
    /// Pin the recommendation sampler; `None` draws from the thread-local generator
    pub sampling_seed: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            n_groups: 12,
            seed: 42,
            max_iter: 300,
            tol: 1e-4,
            small_catalog: SmallCatalogPolicy::Fail,
            sampling_seed: None,
        }
    }
}
