//! Fixed-capacity least-recently-used caches.
//!
//! Every expensive step of the hint pipeline (hint generation, adjacency
//! detection, distance ordering) memoizes through a [`BoundedCache`] owned by the
//! component doing the work. Caches are plain values: callers that share one
//! across threads wrap it in a mutex themselves.

mod key;

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

pub use key::{CacheKey, signature_of};

/// Hit/miss counters for a [`BoundedCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
	pub size: usize,
	pub capacity: usize,
}

impl CacheStats {
	/// Hit rate as a fraction (0.0 to 1.0).
	pub fn hit_rate(&self) -> f64 {
		let total = self.hits + self.misses;
		if total == 0 { 0.0 } else { self.hits as f64 / total as f64 }
	}
}

/// LRU cache with a fixed capacity and lookup statistics.
///
/// `get` and `set` refresh recency; `has` does not. Inserting into a full
/// cache evicts the least recently used entry.
pub struct BoundedCache<K: Hash + Eq, V> {
	entries: LruCache<K, V>,
	hits: u64,
	misses: u64,
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
	/// Creates a cache holding at most `capacity` entries (at least one).
	pub fn new(capacity: usize) -> Self {
		let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
		Self {
			entries: LruCache::new(cap),
			hits: 0,
			misses: 0,
		}
	}

	/// Looks up `key`, marking it most recently used.
	pub fn get(&mut self, key: &K) -> Option<&V> {
		match self.entries.get(key) {
			Some(value) => {
				self.hits += 1;
				Some(value)
			}
			None => {
				self.misses += 1;
				None
			}
		}
	}

	/// Inserts or replaces `key`, evicting the least recently used entry when full.
	pub fn set(&mut self, key: K, value: V) {
		let replacing = self.entries.contains(&key);
		if self.entries.push(key, value).is_some() && !replacing {
			tracing::trace!(capacity = self.capacity(), "cache evicted least recently used entry");
		}
	}

	/// Returns true if `key` is cached, without touching recency or counters.
	pub fn has(&self, key: &K) -> bool {
		self.entries.contains(key)
	}

	/// Drops every entry. Counters are kept.
	pub fn clear(&mut self) {
		self.entries.clear();
	}

	/// Zeroes the hit and miss counters.
	pub fn reset_stats(&mut self) {
		self.hits = 0;
		self.misses = 0;
	}

	/// Number of cached entries.
	pub fn size(&self) -> usize {
		self.entries.len()
	}

	/// Maximum number of entries.
	pub fn capacity(&self) -> usize {
		self.entries.cap().get()
	}

	/// Current statistics.
	pub fn stats(&self) -> CacheStats {
		CacheStats {
			hits: self.hits,
			misses: self.misses,
			size: self.entries.len(),
			capacity: self.capacity(),
		}
	}
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
	/// Returns the cached value for `key`, computing and storing it on a miss.
	pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
		if let Some(value) = self.get(&key) {
			return value.clone();
		}
		let value = compute();
		self.set(key, value.clone());
		value
	}
}

impl<K: Hash + Eq, V> std::fmt::Debug for BoundedCache<K, V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BoundedCache").field("stats", &self.stats()).finish()
	}
}
