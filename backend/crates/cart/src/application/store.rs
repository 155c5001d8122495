//! Cart Store
//!
//! Per-subject lists of cart items held in process memory. Appends take the
//! write lock, reads take the read lock and return a copy, so a snapshot
//! never observes a half-finished append and is unaffected by later ones.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use auth::SubjectId;

use crate::domain::entities::Device;

#[derive(Debug)]
pub struct CartStore<T = Device> {
    carts: RwLock<HashMap<SubjectId, Vec<T>>>,
}

impl<T> Default for CartStore<T> {
    fn default() -> Self {
        Self {
            carts: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> CartStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` to the cart of `owner`, returning the new cart size
    pub fn append(&self, owner: &SubjectId, item: T) -> usize {
        // Appends cannot panic midway, so a poisoned map is still consistent.
        let mut carts = self.carts.write().unwrap_or_else(PoisonError::into_inner);
        let cart = carts.entry(owner.clone()).or_default();
        cart.push(item);
        cart.len()
    }

    /// Copy of the cart of `owner`, in insertion order
    pub fn snapshot(&self, owner: &SubjectId) -> Vec<T> {
        let carts = self.carts.read().unwrap_or_else(PoisonError::into_inner);
        carts.get(owner).cloned().unwrap_or_default()
    }

    /// Number of subjects with a non-empty cart
    pub fn owners(&self) -> usize {
        self.carts.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_append_keeps_order() {
        let store = CartStore::new();
        let owner = SubjectId::from(7);

        assert_eq!(store.append(&owner, "a"), 1);
        assert_eq!(store.append(&owner, "b"), 2);
        assert_eq!(store.snapshot(&owner), vec!["a", "b"]);
    }

    #[test]
    fn test_carts_are_per_owner() {
        let store = CartStore::new();
        store.append(&SubjectId::from(1), 10);
        store.append(&SubjectId::from(2), 20);

        assert_eq!(store.snapshot(&SubjectId::from(1)), vec![10]);
        assert_eq!(store.snapshot(&SubjectId::from(2)), vec![20]);
        assert!(store.snapshot(&SubjectId::from(3)).is_empty());
        assert_eq!(store.owners(), 2);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = CartStore::new();
        let owner = SubjectId::from(7);
        store.append(&owner, 1);

        let mut snapshot = store.snapshot(&owner);
        snapshot.push(99);
        store.append(&owner, 2);

        assert_eq!(snapshot, vec![1, 99]);
        assert_eq!(store.snapshot(&owner), vec![1, 2]);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(CartStore::new());
        let owner = SubjectId::from(7);

        std::thread::scope(|scope| {
            for worker in 0..8 {
                let store = Arc::clone(&store);
                let owner = owner.clone();
                scope.spawn(move || {
                    for n in 0..100 {
                        store.append(&owner, worker * 1_000 + n);
                    }
                });
            }
            // Readers running alongside always see whole appends.
            for _ in 0..4 {
                let store = Arc::clone(&store);
                let owner = owner.clone();
                scope.spawn(move || {
                    for _ in 0..100 {
                        let len = store.snapshot(&owner).len();
                        assert!(len <= 800);
                    }
                });
            }
        });

        let mut items = store.snapshot(&owner);
        assert_eq!(items.len(), 800);
        items.sort_unstable();
        items.dedup();
        assert_eq!(items.len(), 800);
    }
}
