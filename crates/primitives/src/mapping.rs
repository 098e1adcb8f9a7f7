use crate::position::HintPosition;
use crate::word::Word;

/// A word paired with the hint that selects it.
///
/// `position` is always a concrete placement (`Start`, `End` or `Overlay`);
/// [`HintPosition::Both`] is expanded into one `Start` and one `End` mapping by
/// the assigner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintMapping {
	pub word: Word,
	pub hint: String,
	pub position: HintPosition,
	pub display_column: u32,
	pub byte_column: u32,
}

impl HintMapping {
	/// Builds a mapping, deriving both columns from the word and placement.
	pub fn new(word: Word, hint: impl Into<String>, position: HintPosition, tab_width: u32) -> Self {
		let (display_column, byte_column) = match position {
			HintPosition::End => (word.end_column(tab_width), word.end_byte_column()),
			HintPosition::Start | HintPosition::Overlay | HintPosition::Both => (word.column, word.byte_column()),
		};
		Self {
			word,
			hint: hint.into(),
			position,
			display_column,
			byte_column,
		}
	}

	/// True if this mapping's hint is a single character.
	pub fn is_single_char(&self) -> bool {
		let mut chars = self.hint.chars();
		chars.next().is_some() && chars.next().is_none()
	}

	/// Cursor destination for this mapping.
	pub fn jump_target(&self) -> JumpTarget {
		JumpTarget {
			line: self.word.line,
			display_column: self.display_column,
			byte_column: self.byte_column,
		}
	}
}

/// Destination handed to the host's cursor-move operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JumpTarget {
	pub line: u32,
	pub display_column: u32,
	pub byte_column: u32,
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case(HintPosition::Start, 4, 4)]
	#[case(HintPosition::Overlay, 4, 4)]
	#[case(HintPosition::End, 8, 8)]
	fn columns_follow_placement(#[case] position: HintPosition, #[case] display: u32, #[case] byte: u32) {
		let mapping = HintMapping::new(Word::new("hello", 2, 4), "A", position, 8);
		assert_eq!(mapping.display_column, display);
		assert_eq!(mapping.byte_column, byte);
		assert_eq!(mapping.jump_target().line, 2);
	}

	#[test]
	fn end_placement_on_wide_text_splits_display_and_byte_columns() {
		let word = Word::new("日本", 1, 3).with_byte_column(1);
		let mapping = HintMapping::new(word, "A", HintPosition::End, 8);
		assert_eq!(mapping.display_column, 6);
		assert_eq!(mapping.byte_column, 4);
	}

	#[test]
	fn single_char_detection() {
		let word = Word::new("go", 1, 1);
		assert!(HintMapping::new(word.clone(), "A", HintPosition::Start, 8).is_single_char());
		assert!(!HintMapping::new(word, "AB", HintPosition::Start, 8).is_single_char());
	}
}
