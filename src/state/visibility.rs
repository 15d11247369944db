use std::collections::BTreeSet;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::model::Image;

/// Identity of an image collection; changes whenever any source changes.
pub fn collection_key(images: &[Image]) -> u64 {
    let mut hasher = DefaultHasher::new();
    images.len().hash(&mut hasher);
    for image in images {
        image.src.hash(&mut hasher);
    }
    hasher.finish()
}

/// Slide indices allowed to load their real image. Grows monotonically until
/// the collection changes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSet {
    key: u64,
    indices: BTreeSet<usize>,
}

impl VisibleSet {
    pub fn new(key: u64) -> Self {
        Self {
            key,
            indices: BTreeSet::new(),
        }
    }

    /// Clears the set if `key` names a different collection. Returns true if cleared.
    pub fn reset_for(&mut self, key: u64) -> bool {
        if self.key == key {
            return false;
        }
        self.key = key;
        self.indices.clear();
        true
    }

    /// Returns true if the index was not visible before.
    pub fn mark(&mut self, index: usize) -> bool {
        self.indices.insert(index)
    }

    pub fn mark_all(&mut self, len: usize) -> bool {
        let before = self.indices.len();
        self.indices.extend(0..len);
        self.indices.len() != before
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }
}
