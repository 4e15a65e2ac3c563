// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::dataset::Dataset;
use crate::error::DataResult;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Memoised datasets keyed by name. Entries live as long as the cache;
/// there is no eviction.
#[derive(Default)]
pub struct DatasetCache {
    entries: RwLock<HashMap<String, Arc<Dataset>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}
impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get(&self, name: &str) -> Option<Arc<Dataset>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
    /// Cached dataset for `name`, or the result of `load` stored under it.
    /// A failed load is not cached.
    pub fn get_or_load<F>(&self, name: &str, load: F) -> DataResult<Arc<Dataset>>
    where
        F: FnOnce() -> DataResult<Dataset>,
    {
        if let Some(hit) = self.get(name) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(dataset = name, "dataset cache hit");
            return Ok(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(dataset = name, "dataset cache miss");
        let loaded = Arc::new(load()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have loaded it meanwhile; first one wins
        Ok(entries.entry(name.to_string()).or_insert(loaded).clone())
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}
impl CacheStats {
    pub fn hit_ratio(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::ColumnClassifier;
    use crate::error::DataError;
    use polars::prelude::*;

    fn tiny(name: &str) -> DataResult<Dataset> {
        let frame = df!("a" => [1i64, 2, 3]).map_err(DataError::from)?;
        Dataset::from_frame(name, frame, &ColumnClassifier::new())
    }

    #[test]
    fn second_lookup_is_a_hit() {
        let cache = DatasetCache::new();
        let mut loads = 0;
        let first = cache
            .get_or_load("iris", || {
                loads += 1;
                tiny("iris")
            })
            .unwrap();
        let second = cache
            .get_or_load("iris", || {
                loads += 1;
                tiny("iris")
            })
            .unwrap();
        assert_eq!(loads, 1);
        assert!(Arc::ptr_eq(&first, &second));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
        assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let cache = DatasetCache::new();
        let result = cache.get_or_load("wine", || {
            Err(DataError::UnknownDataset {
                name: "wine".into(),
            })
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
        assert!(cache.get_or_load("wine", || tiny("wine")).is_ok());
        assert!(cache.contains("wine"));
    }

    #[test]
    fn cache_is_shareable_across_threads() {
        let cache = Arc::new(DatasetCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_load("sonar", || tiny("sonar")).map(|d| d.height()))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 3);
        }
        assert_eq!(cache.len(), 1);
    }
}
