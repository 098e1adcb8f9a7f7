//! Hint string generation.
//!
//! Hints come from three stages, in priority order:
//!
//! 1. single-character keys (up to `max_single_char_hints`),
//! 2. row-major two-character combinations of the multi-character keys,
//! 3. the numeric fallback `01..09, 10..99, 00`.
//!
//! A purely numeric multi-character key set always means "numeric ordering":
//! stage 2 emits the fallback sequence instead of the cartesian product, and
//! stage 3 is not repeated.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use rustc_hash::FxHashSet;
use yano_cache::{BoundedCache, CacheKey, CacheStats, signature_of};

use crate::keys::KeyClassConfig;

/// Number of hints in the numeric fallback cycle.
pub const NUMERIC_HINT_COUNT: usize = 100;

/// The `index`-th numeric hint: `"01"` .. `"99"`, then `"00"`.
pub fn numeric_hint(index: usize) -> Option<String> {
	match index {
		0..=98 => Some(format!("{:02}", index + 1)),
		99 => Some("00".to_string()),
		_ => None,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
	Single,
	Multi,
	Numeric,
	Done,
}

/// Iterator over the hint sequence for one key configuration.
///
/// The sequence is finite; values that would repeat an earlier hint are
/// skipped so every yielded hint is unique.
pub struct HintSequence<'a> {
	config: &'a KeyClassConfig,
	stage: Stage,
	index: usize,
	numeric_emitted: bool,
	seen: FxHashSet<String>,
}

impl<'a> HintSequence<'a> {
	pub fn new(config: &'a KeyClassConfig) -> Self {
		Self {
			config,
			stage: Stage::Single,
			index: 0,
			numeric_emitted: false,
			seen: FxHashSet::default(),
		}
	}

	fn advance(&mut self, next: Stage) {
		self.stage = next;
		self.index = 0;
	}

	fn next_candidate(&mut self) -> Option<String> {
		loop {
			match self.stage {
				Stage::Single => {
					if self.index < self.config.single_char_limit() {
						self.index += 1;
						return Some(self.config.single_char_keys[self.index - 1].clone());
					}
					self.advance(Stage::Multi);
				}
				Stage::Multi if self.config.has_numeric_multi_keys() => {
					if let Some(hint) = numeric_hint(self.index) {
						self.index += 1;
						self.numeric_emitted = true;
						return Some(hint);
					}
					self.advance(Stage::Numeric);
				}
				Stage::Multi => {
					let keys = &self.config.multi_char_keys;
					let n = keys.len();
					if self.index < n * n {
						let (row, col) = (self.index / n, self.index % n);
						self.index += 1;
						return Some(format!("{}{}", keys[row], keys[col]));
					}
					self.advance(Stage::Numeric);
				}
				Stage::Numeric => {
					if self.config.use_numeric_fallback && !self.numeric_emitted {
						if let Some(hint) = numeric_hint(self.index) {
							self.index += 1;
							return Some(hint);
						}
					}
					self.advance(Stage::Done);
				}
				Stage::Done => return None,
			}
		}
	}
}

impl Iterator for HintSequence<'_> {
	type Item = String;

	fn next(&mut self) -> Option<String> {
		while let Some(hint) = self.next_candidate() {
			if self.seen.insert(hint.clone()) {
				return Some(hint);
			}
			tracing::trace!(%hint, "skipping repeated hint");
		}
		None
	}
}

/// Produces up to `count` unique hints for `config`.
///
/// When the configuration cannot supply `count` hints the list is simply
/// shorter; callers assign hints to a prefix of their words.
pub fn generate(count: usize, config: &KeyClassConfig) -> Vec<String> {
	if count == 0 {
		return Vec::new();
	}
	HintSequence::new(config).take(count).collect()
}

/// Produces hints from a single marker list (hint groups disabled).
///
/// Up to `markers.len()` words get single-character hints; beyond that every
/// hint is a two-character combination so no hint is a prefix of another.
pub fn generate_from_markers(count: usize, markers: &[String], use_numeric_fallback: bool) -> Vec<String> {
	let config = if count <= markers.len() {
		KeyClassConfig {
			single_char_keys: markers.to_vec(),
			..KeyClassConfig::default()
		}
	} else {
		KeyClassConfig {
			multi_char_keys: markers.to_vec(),
			use_numeric_fallback,
			..KeyClassConfig::default()
		}
	};
	generate(count, &config)
}

/// Memoizing front-end for [`generate`] and [`generate_from_markers`].
#[derive(Debug)]
pub struct HintGenerator {
	cache: BoundedCache<CacheKey, Arc<[String]>>,
}

impl HintGenerator {
	pub fn new(capacity: usize) -> Self {
		Self {
			cache: BoundedCache::new(capacity),
		}
	}

	/// Cached [`generate`].
	pub fn generate(&mut self, count: usize, config: &KeyClassConfig) -> Arc<[String]> {
		let key = CacheKey::new("hints").part(count).signature(config.signature());
		self.cache.get_or_insert_with(key, || generate(count, config).into())
	}

	/// Cached [`generate_from_markers`].
	pub fn generate_from_markers(&mut self, count: usize, markers: &[String], use_numeric_fallback: bool) -> Arc<[String]> {
		let key = CacheKey::new("markers")
			.part(count)
			.part(use_numeric_fallback)
			.signature(signature_of(markers));
		self.cache.get_or_insert_with(key, || generate_from_markers(count, markers, use_numeric_fallback).into())
	}

	pub fn stats(&self) -> CacheStats {
		self.cache.stats()
	}

	pub fn clear(&mut self) {
		self.cache.clear();
	}
}

impl Default for HintGenerator {
	fn default() -> Self {
		Self::new(64)
	}
}
