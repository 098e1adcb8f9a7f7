//! Cursor-distance ordering of candidate words.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use yano_primitives::{CursorPos, Word};

/// Weight of one line of vertical distance, so same-line words always rank
/// ahead of words on other lines at a similar column offset.
pub const LINE_WEIGHT: u64 = 1000;

/// Size thresholds for batched sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortPolicy {
	/// Inputs above this many words are sorted in batches.
	pub batch_threshold: usize,
	/// Words per batch.
	pub batch_size: usize,
}

impl Default for SortPolicy {
	fn default() -> Self {
		Self {
			batch_threshold: 500,
			batch_size: 250,
		}
	}
}

/// Manhattan-style distance with [`LINE_WEIGHT`] applied to the line delta.
pub fn distance(word: &Word, cursor: CursorPos) -> u64 {
	u64::from(word.line.abs_diff(cursor.line)) * LINE_WEIGHT + u64::from(word.column.abs_diff(cursor.column))
}

type SortKey = (u64, u32, u32);

fn sort_key(word: &Word, cursor: CursorPos) -> SortKey {
	(distance(word, cursor), word.line, word.column)
}

/// Orders `words` by distance to `cursor`, ties by line then column; equal
/// keys keep their input order.
///
/// Large inputs are sorted in independent batches and k-way merged, which
/// yields exactly the same order as a single stable sort.
pub fn sort_by_distance(mut words: Vec<Word>, cursor: CursorPos, policy: SortPolicy) -> Vec<Word> {
	if words.len() <= policy.batch_threshold || policy.batch_size == 0 {
		words.sort_by_cached_key(|word| sort_key(word, cursor));
		return words;
	}

	let mut batches = Vec::with_capacity(words.len().div_ceil(policy.batch_size));
	let mut rest = words.into_iter();
	loop {
		let mut batch: Vec<Word> = rest.by_ref().take(policy.batch_size).collect();
		if batch.is_empty() {
			break;
		}
		batch.sort_by_cached_key(|word| sort_key(word, cursor));
		batches.push(batch);
	}
	tracing::trace!(batches = batches.len(), "merging distance-sorted batches");
	merge_batches(batches, cursor)
}

struct HeapEntry {
	key: SortKey,
	batch: usize,
	word: Word,
}

impl PartialEq for HeapEntry {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for HeapEntry {
	fn cmp(&self, other: &Self) -> Ordering {
		self.key.cmp(&other.key).then(self.batch.cmp(&other.batch))
	}
}

fn merge_batches(batches: Vec<Vec<Word>>, cursor: CursorPos) -> Vec<Word> {
	let total = batches.iter().map(Vec::len).sum();
	let mut sources: Vec<_> = batches.into_iter().map(Vec::into_iter).collect();
	let mut heap = BinaryHeap::with_capacity(sources.len());

	for (batch, source) in sources.iter_mut().enumerate() {
		if let Some(word) = source.next() {
			heap.push(Reverse(HeapEntry {
				key: sort_key(&word, cursor),
				batch,
				word,
			}));
		}
	}

	let mut merged = Vec::with_capacity(total);
	while let Some(Reverse(entry)) = heap.pop() {
		let batch = entry.batch;
		merged.push(entry.word);
		if let Some(word) = sources[batch].next() {
			heap.push(Reverse(HeapEntry {
				key: sort_key(&word, cursor),
				batch,
				word,
			}));
		}
	}
	merged
}
