use std::collections::{HashMap, VecDeque};

use crate::foundation::core::Rotation;
use crate::render::bitmap::Bitmap;

/// Cache key: slide index, exact scale, rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderKey {
    index: usize,
    scale_bits: u64,
    rotation: Rotation,
}

impl RenderKey {
    /// Build a key. Scales compare by their exact bit pattern.
    pub fn new(index: usize, scale: f64, rotation: Rotation) -> Self {
        Self {
            index,
            scale_bits: scale.to_bits(),
            rotation,
        }
    }

    /// Slide index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Scale factor.
    pub fn scale(&self) -> f64 {
        f64::from_bits(self.scale_bits)
    }

    /// Rotation.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }
}

/// Bounded store of composed bitmaps with strict insertion-order (FIFO) eviction.
///
/// Lookups do not refresh an entry's position.
#[derive(Debug)]
pub struct RenderCache {
    entries: HashMap<RenderKey, Bitmap>,
    order: VecDeque<RenderKey>,
    capacity: usize,
}

impl RenderCache {
    /// Create an empty cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached bitmap for `key`.
    pub fn get(&self, key: &RenderKey) -> Option<&Bitmap> {
        self.entries.get(key)
    }

    /// `true` when `key` is cached.
    pub fn contains(&self, key: &RenderKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> impl Iterator<Item = &RenderKey> {
        self.order.iter()
    }

    /// Insert `bitmap` under `key`, returning the evicted key if capacity was exceeded.
    ///
    /// Re-inserting an existing key replaces its bitmap and keeps its original position.
    pub fn insert(&mut self, key: RenderKey, bitmap: Bitmap) -> Option<RenderKey> {
        if self.entries.insert(key, bitmap).is_some() {
            return None;
        }
        self.order.push_back(key);
        if self.order.len() > self.capacity
            && let Some(old) = self.order.pop_front()
        {
            self.entries.remove(&old);
            return Some(old);
        }
        None
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cache.rs"]
mod tests;
