use std::sync::Arc;

use crate::width::display_width;

/// A candidate word reported by the scanner for the visible region.
///
/// Lines and columns are 1-based. `column` is a display column (tabs expanded,
/// wide characters counted twice); `byte_column` is the raw byte offset in the
/// line and falls back to `column` when the scanner does not report it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
	pub text: Arc<str>,
	pub line: u32,
	pub column: u32,
	pub byte_column: Option<u32>,
}

impl Word {
	/// Creates a word whose byte column equals its display column.
	pub fn new(text: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
		Self {
			text: text.into(),
			line,
			column,
			byte_column: None,
		}
	}

	/// Returns a copy with an explicit byte column.
	pub fn with_byte_column(self, byte_column: u32) -> Self {
		Self {
			byte_column: Some(byte_column),
			..self
		}
	}

	/// Byte column of the first character.
	#[inline]
	pub fn byte_column(&self) -> u32 {
		self.byte_column.unwrap_or(self.column)
	}

	/// Number of characters (not bytes, not cells).
	pub fn char_len(&self) -> usize {
		self.text.chars().count()
	}

	/// Width of the word in display cells.
	pub fn width(&self, tab_width: u32) -> u32 {
		display_width(&self.text, tab_width)
	}

	/// Last display column covered by the word (inclusive).
	///
	/// Empty words cover only their start column.
	pub fn end_column(&self, tab_width: u32) -> u32 {
		self.column + self.width(tab_width).max(1) - 1
	}

	/// Byte column of the last character.
	pub fn end_byte_column(&self) -> u32 {
		let last_len = self.text.chars().next_back().map_or(0, char::len_utf8) as u32;
		let total = self.text.len() as u32;
		self.byte_column() + total.saturating_sub(last_len)
	}

	/// Returns true if the display span of this word covers `column` on `line`.
	pub fn covers(&self, line: u32, column: u32, tab_width: u32) -> bool {
		self.line == line && (self.column..=self.end_column(tab_width)).contains(&column)
	}

	/// True for words made only of punctuation or symbol characters.
	pub fn is_symbol_only(&self) -> bool {
		!self.text.is_empty() && self.text.chars().all(|ch| !ch.is_alphanumeric() && !ch.is_whitespace())
	}
}
