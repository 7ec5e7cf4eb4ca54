//! Thread-safe wrapper for sharing an index between threads.
//!
//! `StrTree` itself has no locking. `SyncStrTree` wraps it in
//! `Arc<RwLock<StrTree<T>>>` so many readers can query while writers insert
//! or remove.
//!
//! # Features
//!
//! Enable the `sync` feature to use this module:
//!
//! ```toml
//! [dependencies]
//! planar = { version = "0.1", features = ["sync"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use planar::index::SyncStrTree;
//! use planar_types::Envelope;
//! use std::thread;
//!
//! let tree = SyncStrTree::new();
//! let writer = tree.clone();
//! let handle = thread::spawn(move || {
//!     writer.insert(Envelope::new(0.0, 1.0, 0.0, 1.0), 7u32);
//! });
//! handle.join().unwrap();
//! assert_eq!(tree.query(&Envelope::new(0.5, 0.6, 0.5, 0.6)), vec![7]);
//! ```

use super::StrTree;
use parking_lot::RwLock;
use planar_types::Envelope;
use std::sync::Arc;

/// Shareable `StrTree` guarded by a read-write lock.
#[derive(Debug)]
pub struct SyncStrTree<T> {
    inner: Arc<RwLock<StrTree<T>>>,
}

impl<T> Clone for SyncStrTree<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SyncStrTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SyncStrTree<T> {
    pub fn new() -> Self {
        Self::from_tree(StrTree::new())
    }

    pub fn from_tree(tree: StrTree<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn insert(&self, envelope: Envelope, item: T) {
        self.inner.write().insert(envelope, item);
    }

    pub fn remove(&self, envelope: &Envelope, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.inner.write().remove(envelope, item)
    }

    /// Matching items, cloned out of the lock.
    pub fn query(&self, envelope: &Envelope) -> Vec<T>
    where
        T: Clone,
    {
        let guard = self.inner.read();
        guard.query(envelope).into_iter().cloned().collect()
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    /// Pack pending inserts now instead of on the next threshold crossing.
    pub fn build(&self) {
        self.inner.write().build();
    }

    /// Direct read access for batches of queries under one lock.
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, StrTree<T>> {
        self.inner.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_inserts() {
        let tree = SyncStrTree::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tree = tree.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let x = (t * 25 + i) as f64;
                        tree.insert(Envelope::new(x, x + 0.5, 0.0, 0.5), t * 25 + i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(tree.size(), 100);
        assert_eq!(tree.query(&Envelope::new(42.1, 42.2, 0.1, 0.2)), vec![42]);
    }
}
