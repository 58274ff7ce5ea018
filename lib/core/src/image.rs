use crate::{Item, ItemRecord};

/// Derives an item's image reference from its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocator {
    base_url: String,
}

impl Default for ImageLocator {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000/image")
    }
}

impl ImageLocator {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[inline]
    pub fn url_for(&self, id: u64) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Pair each item with its image reference, order preserved
    pub fn attach_images<'a, I>(&self, items: I) -> Vec<ItemRecord>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items
            .into_iter()
            .map(|item| ItemRecord {
                image: self.url_for(item.id),
                item: item.clone(),
            })
            .collect()
    }
}
