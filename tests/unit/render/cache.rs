use super::*;
use crate::foundation::core::Rgba8;

fn bmp(tag: u8) -> Bitmap {
    Bitmap::filled(1, 1, Rgba8::new(tag, tag, tag, 255))
}

fn key(index: usize) -> RenderKey {
    RenderKey::new(index, 1.0, Rotation::Deg0)
}

#[test]
fn keys_distinguish_scale_and_rotation() {
    let a = RenderKey::new(0, 1.0, Rotation::Deg0);
    assert_eq!(a, RenderKey::new(0, 1.0, Rotation::Deg0));
    assert_ne!(a, RenderKey::new(0, 1.25, Rotation::Deg0));
    assert_ne!(a, RenderKey::new(0, 1.0, Rotation::Deg90));
    assert_ne!(a, RenderKey::new(1, 1.0, Rotation::Deg0));
    assert_eq!(RenderKey::new(3, 2.5, Rotation::Deg270).scale(), 2.5);
}

#[test]
fn never_exceeds_capacity_and_evicts_oldest_insert() {
    let mut cache = RenderCache::new(10);
    for i in 0..10 {
        assert_eq!(cache.insert(key(i), bmp(i as u8)), None);
    }
    assert_eq!(cache.len(), 10);

    let evicted = cache.insert(key(10), bmp(10));
    assert_eq!(evicted, Some(key(0)));
    assert_eq!(cache.len(), 10);
    assert!(!cache.contains(&key(0)));
    assert!(cache.contains(&key(10)));
}

#[test]
fn lookups_do_not_change_eviction_order() {
    let mut cache = RenderCache::new(2);
    cache.insert(key(0), bmp(0));
    cache.insert(key(1), bmp(1));

    // A hit on the oldest entry must not protect it (FIFO, not LRU).
    assert!(cache.get(&key(0)).is_some());
    assert_eq!(cache.insert(key(2), bmp(2)), Some(key(0)));
    let order: Vec<_> = cache.keys().copied().collect();
    assert_eq!(order, vec![key(1), key(2)]);
}

#[test]
fn reinsert_replaces_in_place() {
    let mut cache = RenderCache::new(2);
    cache.insert(key(0), bmp(0));
    cache.insert(key(1), bmp(1));
    assert_eq!(cache.insert(key(0), bmp(9)), None);
    assert_eq!(cache.get(&key(0)).unwrap().pixel(0, 0), Some([9, 9, 9, 255]));
    assert_eq!(cache.insert(key(2), bmp(2)), Some(key(0)));
}

#[test]
fn clear_empties_everything() {
    let mut cache = RenderCache::new(3);
    cache.insert(key(0), bmp(0));
    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.keys().count(), 0);
}

#[test]
fn zero_capacity_is_raised_to_one() {
    let mut cache = RenderCache::new(0);
    assert_eq!(cache.capacity(), 1);
    cache.insert(key(0), bmp(0));
    assert_eq!(cache.insert(key(1), bmp(1)), Some(key(0)));
}
