//! Raw keystrokes as delivered by the host's single-key read.

/// One keystroke read while hints are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyInput {
	/// A printable character.
	Char(char),
	/// The escape key.
	Escape,
	/// Carriage return / line feed.
	Enter,
	/// Any other non-printable code: C0 and C1 controls, DEL, or a value that is
	/// not a Unicode scalar.
	Control(u32),
}

impl KeyInput {
	/// Classifies a raw key code as returned by a `getchar()`-style read.
	pub fn from_code(code: u32) -> Self {
		match code {
			27 => Self::Escape,
			10 | 13 => Self::Enter,
			code => match char::from_u32(code) {
				Some(ch) if !ch.is_control() => Self::Char(ch),
				_ => Self::Control(code),
			},
		}
	}

	/// The printable character, if any.
	pub fn as_char(self) -> Option<char> {
		match self {
			Self::Char(ch) => Some(ch),
			_ => None,
		}
	}

	/// True for ASCII lowercase letters, which are passed back to the editor.
	pub fn is_lowercase_letter(self) -> bool {
		matches!(self, Self::Char(ch) if ch.is_ascii_lowercase())
	}

	/// Text to feed back to the host when the key is passed through.
	pub fn to_feed_string(self) -> String {
		match self {
			Self::Char(ch) => ch.to_string(),
			Self::Escape => "\u{1b}".to_string(),
			Self::Enter => "\r".to_string(),
			Self::Control(code) => char::from_u32(code).map(String::from).unwrap_or_default(),
		}
	}
}

/// Normalizes a hint character: ASCII letters are upper-cased, everything else
/// passes through.
#[inline]
pub fn normalize_hint_char(ch: char) -> char {
	ch.to_ascii_uppercase()
}
