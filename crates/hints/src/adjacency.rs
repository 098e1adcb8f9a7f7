//! Detection of words whose hint overlays would collide, and the rules that
//! decide which of two colliding words keeps its hint.

use std::cmp::Ordering;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use yano_cache::{BoundedCache, CacheStats, signature_of};
use yano_primitives::Word;

/// A word and the same-line words touching or overlapping it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyEntry {
	pub word: Word,
	pub adjacent_words: Vec<Word>,
}

/// Relative priority of symbol-only words and text words.
///
/// The class with the lower priority loses a collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapPriority {
	pub symbol_priority: i32,
	pub text_priority: i32,
}

impl Default for OverlapPriority {
	fn default() -> Self {
		Self {
			symbol_priority: 1,
			text_priority: 2,
		}
	}
}

impl OverlapPriority {
	fn of(&self, word: &Word) -> i32 {
		if word.is_symbol_only() { self.symbol_priority } else { self.text_priority }
	}
}

/// True if `a` and `b` sit on the same line with no free display cell between
/// them (touching or overlapping).
pub fn are_adjacent(a: &Word, b: &Word, tab_width: u32) -> bool {
	if a.line != b.line {
		return false;
	}
	let (left, right) = if a.column <= b.column { (a, b) } else { (b, a) };
	let gap = i64::from(right.column) - (i64::from(left.column) + i64::from(left.width(tab_width)));
	gap <= 0
}

/// Orders two colliding words by how strongly they hold on to their hint.
///
/// Class priority first, then text length, then column (the right-most wins).
fn strength(word: &Word, other: &Word, priority: &OverlapPriority) -> Ordering {
	let (word_class, other_class) = (priority.of(word), priority.of(other));
	if word.is_symbol_only() != other.is_symbol_only() && word_class != other_class {
		return word_class.cmp(&other_class);
	}
	word.char_len()
		.cmp(&other.char_len())
		.then_with(|| word.column.cmp(&other.column))
}

/// True if `word` loses its hint to at least one of `adjacent_words`.
///
/// 1. A symbol-only word loses to a text word when symbols have the lower
///    priority (and text loses when text has the lower priority).
/// 2. Within one class the shorter word loses.
/// 3. Equal length: the left-most word loses.
pub fn should_suppress(word: &Word, adjacent_words: &[Word], priority: &OverlapPriority) -> bool {
	adjacent_words
		.iter()
		.any(|other| strength(word, other, priority) == Ordering::Less)
}

/// Finds adjacent words and decides which ones to suppress.
///
/// Adjacency lists are memoized by the tab width and a signature of the
/// `(text, line, column)` tuples of the input.
#[derive(Debug)]
pub struct AdjacencyResolver {
	cache: BoundedCache<(u32, u64), Arc<[AdjacencyEntry]>>,
}

impl AdjacencyResolver {
	pub fn new(capacity: usize) -> Self {
		Self {
			cache: BoundedCache::new(capacity),
		}
	}

	/// One entry per input word, in input order.
	pub fn find_adjacent(&mut self, words: &[Word], tab_width: u32) -> Arc<[AdjacencyEntry]> {
		let key = (tab_width, signature_of(words.iter().map(|w| (&*w.text, w.line, w.column))));
		if let Some(entries) = self.cache.get(&key) {
			tracing::trace!(words = words.len(), tab_width, "adjacency cache hit");
			return Arc::clone(entries);
		}

		let entries: Arc<[AdjacencyEntry]> = compute_adjacency(words, tab_width).into();
		self.cache.set(key, Arc::clone(&entries));
		entries
	}

	/// Indices (into `words`) of the words that lose a collision.
	pub fn suppressed(&mut self, words: &[Word], priority: &OverlapPriority, tab_width: u32) -> FxHashSet<usize> {
		let entries = self.find_adjacent(words, tab_width);
		let suppressed: FxHashSet<usize> = entries
			.iter()
			.enumerate()
			.filter(|(_, entry)| should_suppress(&entry.word, &entry.adjacent_words, priority))
			.map(|(idx, _)| idx)
			.collect();
		if !suppressed.is_empty() {
			tracing::debug!(suppressed = suppressed.len(), words = words.len(), "overlapping words suppressed");
		}
		suppressed
	}

	pub fn stats(&self) -> CacheStats {
		self.cache.stats()
	}

	pub fn clear(&mut self) {
		self.cache.clear();
	}
}

fn compute_adjacency(words: &[Word], tab_width: u32) -> Vec<AdjacencyEntry> {
	let mut by_line: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
	for (idx, word) in words.iter().enumerate() {
		by_line.entry(word.line).or_default().push(idx);
	}

	words
		.iter()
		.enumerate()
		.map(|(idx, word)| {
			let adjacent_words = by_line
				.get(&word.line)
				.into_iter()
				.flatten()
				.filter(|&&other| other != idx && are_adjacent(word, &words[other], tab_width))
				.map(|&other| words[other].clone())
				.collect();
			AdjacencyEntry {
				word: word.clone(),
				adjacent_words,
			}
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn priority() -> OverlapPriority {
		OverlapPriority::default()
	}

	#[test]
	fn touching_words_are_adjacent() {
		let foo = Word::new("foo", 1, 1);
		let bar = Word::new("bar", 1, 4);
		assert!(are_adjacent(&foo, &bar, 8));
		assert!(are_adjacent(&bar, &foo, 8));
	}

	#[test]
	fn separated_words_are_not_adjacent() {
		let foo = Word::new("foo", 1, 1);
		assert!(!are_adjacent(&foo, &Word::new("bar", 1, 5), 8));
		assert!(!are_adjacent(&foo, &Word::new("bar", 2, 4), 8));
	}

	#[test]
	fn wide_characters_extend_the_span() {
		let wide = Word::new("日本", 1, 1);
		assert!(are_adjacent(&wide, &Word::new("語", 1, 5), 8));
		assert!(!are_adjacent(&wide, &Word::new("語", 1, 6), 8));
	}

	#[test]
	fn tabs_extend_the_span() {
		let tabbed = Word::new("a\tb", 1, 1);
		assert!(are_adjacent(&tabbed, &Word::new("c", 1, 7), 4));
		assert!(!are_adjacent(&tabbed, &Word::new("c", 1, 7), 2));
	}

	#[test]
	fn find_adjacent_lists_neighbours_per_word() {
		let words = vec![Word::new("foo", 1, 1), Word::new("bar", 1, 4), Word::new("baz", 1, 9), Word::new("qux", 2, 4)];
		let mut resolver = AdjacencyResolver::new(8);
		let entries = resolver.find_adjacent(&words, 8);

		assert_eq!(entries.len(), 4);
		assert_eq!(entries[0].adjacent_words, vec![words[1].clone()]);
		assert_eq!(entries[1].adjacent_words, vec![words[0].clone()]);
		assert!(entries[2].adjacent_words.is_empty());
		assert!(entries[3].adjacent_words.is_empty());
	}

	#[test]
	fn find_adjacent_is_cached() {
		let words = vec![Word::new("foo", 1, 1), Word::new("bar", 1, 4)];
		let mut resolver = AdjacencyResolver::new(8);
		let first = resolver.find_adjacent(&words, 8);
		let second = resolver.find_adjacent(&words, 8);
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(resolver.stats().hits, 1);
	}

	#[test]
	fn adjacency_is_cached_per_tab_width() {
		let words = vec![Word::new("a\tb", 1, 1), Word::new("c", 1, 7)];
		let mut resolver = AdjacencyResolver::new(8);
		let wide = resolver.find_adjacent(&words, 4);
		let narrow = resolver.find_adjacent(&words, 2);
		assert_eq!(wide[0].adjacent_words, vec![words[1].clone()]);
		assert!(narrow[0].adjacent_words.is_empty());
		assert_eq!(resolver.stats().hits, 0);
	}

	#[test]
	fn left_most_of_equal_text_words_loses() {
		let left = Word::new("foo", 1, 1);
		let right = Word::new("bar", 1, 4);
		assert!(should_suppress(&left, std::slice::from_ref(&right), &priority()));
		assert!(!should_suppress(&right, std::slice::from_ref(&left), &priority()));
	}

	#[test]
	fn shorter_word_loses() {
		let short = Word::new("if", 1, 5);
		let long = Word::new("value", 1, 1);
		assert!(should_suppress(&short, std::slice::from_ref(&long), &priority()));
		assert!(!should_suppress(&long, std::slice::from_ref(&short), &priority()));
	}

	#[test]
	fn symbol_loses_to_text() {
		let symbol = Word::new("=>", 1, 4);
		let text = Word::new("x", 1, 6);
		assert!(should_suppress(&symbol, std::slice::from_ref(&text), &priority()));
		assert!(!should_suppress(&text, std::slice::from_ref(&symbol), &priority()));
	}

	#[test]
	fn text_loses_when_symbols_have_priority() {
		let symbol = Word::new("=>", 1, 4);
		let text = Word::new("value", 1, 6);
		let symbols_first = OverlapPriority {
			symbol_priority: 3,
			text_priority: 2,
		};
		assert!(should_suppress(&text, std::slice::from_ref(&symbol), &symbols_first));
		assert!(!should_suppress(&symbol, std::slice::from_ref(&text), &symbols_first));
	}

	#[test]
	fn equal_priorities_fall_back_to_length() {
		let symbol = Word::new("=>", 1, 4);
		let text = Word::new("x", 1, 6);
		let equal = OverlapPriority {
			symbol_priority: 2,
			text_priority: 2,
		};
		assert!(should_suppress(&text, std::slice::from_ref(&symbol), &equal));
	}

	#[test]
	fn cluster_keeps_a_winner() {
		let words = vec![Word::new("ab", 1, 1), Word::new("cd", 1, 3), Word::new("ef", 1, 5)];
		let mut resolver = AdjacencyResolver::new(8);
		let suppressed = resolver.suppressed(&words, &priority(), 8);
		assert_eq!(suppressed.len(), 2);
		assert!(!suppressed.contains(&2));
	}
}
