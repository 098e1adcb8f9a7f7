//! Assignment of hints to candidate words.
//!
//! [`HintAssigner::assign`] drops the word under the cursor, drops words that
//! lose an overlay collision, orders the survivors by distance to the cursor
//! and zips them with the hint list. The ordering is cached per input
//! signature; hints are re-zipped on every call because the hint list may
//! change between calls.
//!
//! [`HintAssigner::assign_with`] generates the hint list after filtering, so
//! hint lengths are sized for the words that actually receive one.

mod order;

use std::sync::Arc;

use rustc_hash::FxHashSet;
use yano_cache::{BoundedCache, CacheKey, CacheStats, signature_of};
use yano_primitives::{CursorPos, DEFAULT_TAB_WIDTH, EditorMode, HintMapping, HintPosition, Word};

pub use self::order::{LINE_WEIGHT, SortPolicy, distance, sort_by_distance};
use crate::adjacency::{AdjacencyResolver, OverlapPriority};

/// Hint placement per editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HintPositionConfig {
	pub hint_position: HintPosition,
	pub visual_hint_position: HintPosition,
	/// Under [`HintPosition::Both`], words shorter than this many characters
	/// get only a start hint.
	pub both_min_word_length: usize,
}

impl Default for HintPositionConfig {
	fn default() -> Self {
		Self {
			hint_position: HintPosition::Start,
			visual_hint_position: HintPosition::End,
			both_min_word_length: 5,
		}
	}
}

impl HintPositionConfig {
	/// Placement used for a cycle started in `mode`.
	pub fn effective(&self, mode: EditorMode) -> HintPosition {
		match mode {
			EditorMode::Normal => self.hint_position,
			EditorMode::Visual => self.visual_hint_position,
		}
	}

	/// Number of hints `word` consumes under `position`.
	pub fn hints_for(&self, word: &Word, position: HintPosition) -> usize {
		if position == HintPosition::Both && word.char_len() >= self.both_min_word_length { 2 } else { 1 }
	}
}

/// Per-call assignment switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignOptions {
	pub skip_overlap_detection: bool,
	pub priority: OverlapPriority,
	/// Tab stop used for spans, adjacency and end columns.
	pub tab_width: u32,
	pub sort_policy: SortPolicy,
}

impl Default for AssignOptions {
	fn default() -> Self {
		Self {
			skip_overlap_detection: false,
			priority: OverlapPriority::default(),
			tab_width: DEFAULT_TAB_WIDTH,
			sort_policy: SortPolicy::default(),
		}
	}
}

/// Result of [`HintAssigner::assign`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
	pub mappings: Vec<HintMapping>,
	/// Placement the mappings were built for.
	pub position: HintPosition,
	/// Whether the word ordering came from the cache.
	pub order_cache_hit: bool,
}

/// Orders words around the cursor and pairs them with hints.
///
/// Holds only caches; tab width and sort policy arrive per call in
/// [`AssignOptions`], so one assigner can serve engines with different settings.
#[derive(Debug)]
pub struct HintAssigner {
	adjacency: AdjacencyResolver,
	order_cache: BoundedCache<CacheKey, Arc<[Word]>>,
}

impl HintAssigner {
	pub fn new(cache_capacity: usize) -> Self {
		Self {
			adjacency: AdjacencyResolver::new(cache_capacity),
			order_cache: BoundedCache::new(cache_capacity),
		}
	}

	/// Pairs `words` with `hints`.
	///
	/// The word under `cursor` never gets a hint. When `hints` runs out, the
	/// remaining (farthest) words are left without one.
	pub fn assign(
		&mut self,
		words: &[Word],
		hints: &[String],
		cursor: CursorPos,
		mode: EditorMode,
		positions: &HintPositionConfig,
		opts: &AssignOptions,
	) -> Assignment {
		self.assign_with(words, cursor, mode, positions, opts, |_| hints)
	}

	/// Like [`assign`](Self::assign), but asks `hints` for a list once the
	/// words under the cursor and overlap losers are gone. The argument is the
	/// number of hints the surviving words consume.
	pub fn assign_with<H: AsRef<[String]>>(
		&mut self,
		words: &[Word],
		cursor: CursorPos,
		mode: EditorMode,
		positions: &HintPositionConfig,
		opts: &AssignOptions,
		hints: impl FnOnce(usize) -> H,
	) -> Assignment {
		let position = positions.effective(mode);
		let (order, order_cache_hit) = self.ordered_words(words, cursor, position, opts);
		let needed: usize = order.iter().map(|word| positions.hints_for(word, position)).sum();
		let hints = hints(needed);
		let hints = hints.as_ref();

		let tab_width = opts.tab_width;
		let mut mappings = Vec::with_capacity(order.len().min(hints.len()));
		let mut used = FxHashSet::default();
		let mut hints = hints.iter().filter(|hint| {
			let fresh = used.insert(hint.as_str());
			if !fresh {
				tracing::warn!(%hint, "duplicate hint dropped");
			}
			fresh
		});

		'words: for word in order.iter() {
			let placements: &[HintPosition] = match (position, positions.hints_for(word, position)) {
				(HintPosition::Both, 2) => &[HintPosition::Start, HintPosition::End],
				(HintPosition::Both, _) => &[HintPosition::Start],
				(HintPosition::Start, _) => &[HintPosition::Start],
				(HintPosition::End, _) => &[HintPosition::End],
				(HintPosition::Overlay, _) => &[HintPosition::Overlay],
			};
			for &placement in placements {
				let Some(hint) = hints.next() else {
					break 'words;
				};
				mappings.push(HintMapping::new(word.clone(), hint.as_str(), placement, tab_width));
			}
		}

		tracing::debug!(
			words = words.len(),
			ordered = order.len(),
			mappings = mappings.len(),
			%position,
			cache_hit = order_cache_hit,
			"hints assigned"
		);

		Assignment {
			mappings,
			position,
			order_cache_hit,
		}
	}

	fn ordered_words(&mut self, words: &[Word], cursor: CursorPos, position: HintPosition, opts: &AssignOptions) -> (Arc<[Word]>, bool) {
		let signature = signature_of(words.iter().map(|w| (&*w.text, w.line, w.column, w.byte_column)));
		let mut key = CacheKey::new("order")
			.part(words.len())
			.part(cursor.line)
			.part(cursor.column)
			.part(position)
			.part(opts.skip_overlap_detection)
			.part(opts.tab_width);
		if !opts.skip_overlap_detection {
			key = key.part(opts.priority.symbol_priority).part(opts.priority.text_priority);
		}
		let key = key.signature(signature);

		if let Some(order) = self.order_cache.get(&key) {
			tracing::trace!(%key, "word order cache hit");
			return (Arc::clone(order), true);
		}

		let tab_width = opts.tab_width;
		let mut candidates: Vec<Word> = words
			.iter()
			.filter(|word| !word.covers(cursor.line, cursor.column, tab_width))
			.cloned()
			.collect();

		if !opts.skip_overlap_detection {
			let suppressed = self.adjacency.suppressed(&candidates, &opts.priority, tab_width);
			if !suppressed.is_empty() {
				candidates = candidates
					.into_iter()
					.enumerate()
					.filter(|(idx, _)| !suppressed.contains(idx))
					.map(|(_, word)| word)
					.collect();
			}
		}

		let order: Arc<[Word]> = sort_by_distance(candidates, cursor, opts.sort_policy).into();
		self.order_cache.set(key, Arc::clone(&order));
		(order, false)
	}

	pub fn order_cache_stats(&self) -> CacheStats {
		self.order_cache.stats()
	}

	pub fn adjacency_stats(&self) -> CacheStats {
		self.adjacency.stats()
	}

	/// Drops every memoized ordering and adjacency list.
	pub fn clear(&mut self) {
		self.order_cache.clear();
		self.adjacency.clear();
	}
}

impl Default for HintAssigner {
	fn default() -> Self {
		Self::new(32)
	}
}
