use crate::{Error, Item, Result};
use ahash::AHashMap;

/// In-memory item table keyed by id
///
/// Built once from ingested items, enriched once with group labels, then
/// read-only. Items keep insertion order.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    items: Vec<Item>,
    by_id: AHashMap<u64, usize>,
    /// Positions of each group's members, in store order. Empty until labeled.
    members: Vec<Vec<usize>>,
}

impl CatalogStore {
    pub fn new(items: Vec<Item>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let mut by_id = AHashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if by_id.insert(item.id, pos).is_some() {
                return Err(Error::DuplicateId(item.id));
            }
        }

        Ok(Self {
            items,
            by_id,
            members: Vec::new(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in insertion order
    #[inline]
    pub fn all(&self) -> &[Item] {
        &self.items
    }

    pub fn by_id(&self, id: u64) -> Option<&Item> {
        self.by_id.get(&id).map(|&pos| &self.items[pos])
    }

    pub fn is_labeled(&self) -> bool {
        !self.members.is_empty()
    }

    /// Number of groups, zero before labeling
    pub fn n_groups(&self) -> usize {
        self.members.len()
    }

    /// Attach one group label per item, parallel to [`CatalogStore::all`]
    ///
    /// Allowed exactly once; a labeled store rejects a second call.
    pub fn with_group_labels(mut self, labels: &[usize], groups: usize) -> Result<Self> {
        if self.is_labeled() {
            return Err(Error::AlreadyLabeled);
        }
        if groups == 0 {
            return Err(Error::InvalidConfig("group count must be positive".to_string()));
        }
        if labels.len() != self.items.len() {
            return Err(Error::LabelCountMismatch {
                expected: self.items.len(),
                actual: labels.len(),
            });
        }
        if let Some(&label) = labels.iter().find(|&&label| label >= groups) {
            return Err(Error::LabelOutOfRange { label, groups });
        }

        let mut members = vec![Vec::new(); groups];
        for (pos, (item, &label)) in self.items.iter_mut().zip(labels).enumerate() {
            item.group = Some(label);
            members[label].push(pos);
        }
        self.members = members;
        Ok(self)
    }

    /// Members of a group in store order
    pub fn group_members(&self, group: usize) -> impl Iterator<Item = &Item> + '_ {
        self.members
            .get(group)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.items[pos])
    }

    pub fn group_sizes(&self) -> Vec<usize> {
        self.members.iter().map(Vec::len).collect()
    }
}
