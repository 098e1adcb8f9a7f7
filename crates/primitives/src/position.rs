use std::fmt;

use serde::Deserialize;

/// Opaque identifier of an editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "buffer#{}", self.0)
	}
}

/// 1-based cursor position (`column` is a display column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CursorPos {
	pub line: u32,
	pub column: u32,
}

impl CursorPos {
	pub const fn new(line: u32, column: u32) -> Self {
		Self { line, column }
	}
}

/// Editor mode the hint cycle was started from.
///
/// Visual mode uses its own hint placement (`visual_hint_position`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
	#[default]
	Normal,
	Visual,
}

/// Where a hint is drawn relative to its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HintPosition {
	/// On the first cell of the word.
	#[default]
	Start,
	/// On the last cell of the word.
	End,
	/// Drawn over the word, anchored at its first cell.
	Overlay,
	/// Two hints per word: one at the start, one at the end.
	Both,
}

impl HintPosition {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Start => "start",
			Self::End => "end",
			Self::Overlay => "overlay",
			Self::Both => "both",
		}
	}
}

impl fmt::Display for HintPosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
