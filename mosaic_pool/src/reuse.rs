// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detached cells waiting to be bound to a new index.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::Cell;

/// Detached, unindexed cells, partitioned by reuse identifier.
///
/// Callers must not assume any order among members of a partition.
pub struct ReusePool<V> {
    anonymous: Vec<Cell<V>>,
    identified: HashMap<String, Vec<Cell<V>>>,
}

impl<V> core::fmt::Debug for ReusePool<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReusePool")
            .field("anonymous", &self.anonymous.len())
            .field("identified", &self.identified.len())
            .field("total", &self.len())
            .finish()
    }
}

impl<V> Default for ReusePool<V> {
    fn default() -> Self {
        Self {
            anonymous: Vec::new(),
            identified: HashMap::new(),
        }
    }
}

impl<V> ReusePool<V> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached cell to the partition named by its reuse identifier.
    pub fn push(&mut self, cell: Cell<V>) {
        debug_assert!(cell.index.is_none(), "pooled cells must not carry an index");
        match cell.reuse_identifier() {
            Some(identifier) => {
                if let Some(bucket) = self.identified.get_mut(identifier) {
                    bucket.push(cell);
                } else {
                    let key = String::from(identifier);
                    self.identified.insert(key, alloc::vec![cell]);
                }
            }
            None => self.anonymous.push(cell),
        }
    }

    /// Takes a cell out of the pool.
    ///
    /// With an identifier, only that partition is searched. Without one, any
    /// member may be returned.
    pub fn dequeue(&mut self, identifier: Option<&str>) -> Option<Cell<V>> {
        match identifier {
            Some(identifier) => self.identified.get_mut(identifier)?.pop(),
            None => self.anonymous.pop().or_else(|| {
                self.identified
                    .values_mut()
                    .find(|bucket| !bucket.is_empty())
                    .and_then(Vec::pop)
            }),
        }
    }

    /// Number of pooled cells across all partitions.
    pub fn len(&self) -> usize {
        self.anonymous.len() + self.identified.values().map(Vec::len).sum::<usize>()
    }

    /// Returns `true` if no cells are pooled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every pooled cell and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let dropped = self.len();
        self.anonymous.clear();
        self.identified.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::ReusePool;
    use crate::Cell;

    #[test]
    fn identified_partitions_are_separate() {
        let mut pool = ReusePool::new();
        pool.push(Cell::with_reuse_identifier(1, "a"));
        pool.push(Cell::with_reuse_identifier(2, "b"));
        pool.push(Cell::new(3));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.dequeue(Some("b")).map(|c| c.content), Some(2));
        assert!(pool.dequeue(Some("b")).is_none());
        assert!(pool.dequeue(Some("missing")).is_none());
    }

    #[test]
    fn anonymous_dequeue_takes_anything() {
        let mut pool = ReusePool::new();
        pool.push(Cell::with_reuse_identifier(1, "a"));
        assert_eq!(pool.dequeue(None).map(|c| c.content), Some(1));
        assert!(pool.is_empty());
        assert!(pool.dequeue(None).is_none());
    }

    #[test]
    fn clear_reports_the_dropped_count() {
        let mut pool = ReusePool::new();
        for n in 0..5 {
            pool.push(Cell::new(n));
        }
        assert_eq!(pool.clear(), 5);
        assert!(pool.is_empty());
    }
}
