use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

/// Composite string key, built from a namespace and colon-separated parts.
///
/// ```
/// use yano_cache::CacheKey;
///
/// let key = CacheKey::new("order").part(12).part("both").part(true);
/// assert_eq!(key.as_str(), "order:12:both:true");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
	pub fn new(namespace: &str) -> Self {
		Self(namespace.to_string())
	}

	/// Appends one component.
	pub fn part(mut self, value: impl Display) -> Self {
		self.0.push_str(&format!(":{value}"));
		self
	}

	/// Appends a 64-bit signature in fixed-width hex.
	pub fn signature(mut self, hash: u64) -> Self {
		self.0.push_str(&format!(":{hash:016x}"));
		self
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Order-sensitive hash of a sequence of hashable items.
pub fn signature_of<T: Hash>(items: impl IntoIterator<Item = T>) -> u64 {
	let mut hasher = FxHasher::default();
	let mut len = 0usize;
	for item in items {
		item.hash(&mut hasher);
		len += 1;
	}
	len.hash(&mut hasher);
	hasher.finish()
}
