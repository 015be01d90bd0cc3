//! Specialized collection types

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Key of an active item in a [`Pool`]. A released key never resolves
    /// again, even after its item is handed out anew.
    pub struct PoolIndex;
}

/// Object pool: active items in a slot map, released items parked for reuse.
///
/// Released items are kept (not dropped) and handed out again by `acquire`,
/// so their allocations are reused.
pub struct Pool<T> {
    active: SlotMap<PoolIndex, T>,
    free: Vec<T>,
    factory: Box<dyn FnMut() -> T>,
}

impl<T> Pool<T> {
    /// Create an empty pool that builds new items with `factory`
    pub fn new(factory: impl FnMut() -> T + 'static) -> Self {
        Self {
            active: SlotMap::with_key(),
            free: Vec::new(),
            factory: Box::new(factory),
        }
    }

    /// Create a pool with `capacity` items built up front (all free)
    pub fn with_capacity(capacity: usize, mut factory: impl FnMut() -> T + 'static) -> Self {
        let free = (0..capacity).map(|_| factory()).collect();
        Self {
            active: SlotMap::with_capacity_and_key(capacity),
            free,
            factory: Box::new(factory),
        }
    }

    /// Take a free item (building one if none is free) and mark it active
    pub fn acquire(&mut self) -> PoolIndex {
        let item = match self.free.pop() {
            Some(item) => item,
            None => (self.factory)(),
        };
        self.active.insert(item)
    }

    /// Return an item to the pool. Returns false for stale indices.
    pub fn release(&mut self, index: PoolIndex) -> bool {
        match self.active.remove(index) {
            Some(item) => {
                self.free.push(item);
                true
            }
            None => false,
        }
    }

    /// Get an active item
    pub fn get(&self, index: PoolIndex) -> Option<&T> {
        self.active.get(index)
    }

    /// Get a mutable reference to an active item
    pub fn get_mut(&mut self, index: PoolIndex) -> Option<&mut T> {
        self.active.get_mut(index)
    }

    /// Iterate active items
    pub fn iter_active(&self) -> impl Iterator<Item = (PoolIndex, &T)> {
        self.active.iter()
    }

    /// Iterate active items mutably
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.active.values_mut()
    }

    /// Number of active items
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Total number of items built (active + free)
    pub fn capacity(&self) -> usize {
        self.active.len() + self.free.len()
    }

    /// Release every active item
    pub fn release_all(&mut self) {
        self.free.extend(self.active.drain().map(|(_, item)| item));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_reuses_released_items() {
        let mut pool = Pool::with_capacity(2, String::new);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.active_count(), 2);
        assert_eq!(pool.capacity(), 2);

        pool.get_mut(a).unwrap().push_str("nebula");
        assert!(pool.release(a));
        let c = pool.acquire();
        assert_eq!(pool.capacity(), 2);
        // same item back, contents and all
        assert_eq!(pool.get(c).map(String::as_str), Some("nebula"));
        assert!(pool.get(b).is_some());
    }

    #[test]
    fn test_stale_index_is_rejected() {
        let mut pool = Pool::new(|| String::from("nebula"));
        let a = pool.acquire();
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert!(pool.get(a).is_none());

        let b = pool.acquire();
        assert_ne!(a, b);
        assert!(pool.get(a).is_none());
        assert!(pool.get(b).is_some());
    }

    #[test]
    fn test_grows_past_capacity() {
        let mut pool = Pool::with_capacity(1, || 1_i32);
        pool.acquire();
        let extra = pool.acquire();
        assert_eq!(pool.capacity(), 2);
        *pool.get_mut(extra).unwrap() = 7;
        assert_eq!(pool.iter_active().map(|(_, v)| *v).sum::<i32>(), 8);
    }

    #[test]
    fn test_release_all() {
        let mut pool = Pool::with_capacity(3, || ());
        let a = pool.acquire();
        pool.acquire();
        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 3);
        assert!(pool.get(a).is_none());
    }
}
