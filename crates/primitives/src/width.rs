use unicode_width::UnicodeWidthChar;

/// Tab width used when the host does not report one.
pub const DEFAULT_TAB_WIDTH: u32 = 8;

/// Display width of a single character.
///
/// Tabs count as `tab_width` cells, control characters as zero, and East Asian
/// wide characters as two.
#[inline]
pub fn char_width(ch: char, tab_width: u32) -> u32 {
	match ch {
		'\t' => tab_width,
		ch if ch.is_control() => 0,
		ch => ch.width().unwrap_or(0) as u32,
	}
}

/// Display width of `text` in terminal cells.
pub fn display_width(text: &str, tab_width: u32) -> u32 {
	text.chars().map(|ch| char_width(ch, tab_width)).sum()
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("hello", 5)]
	#[case("日本語", 6)]
	#[case("a\tb", 10)]
	#[case("", 0)]
	#[case("x\u{7}", 1)]
	fn measures_display_cells(#[case] text: &str, #[case] expected: u32) {
		assert_eq!(display_width(text, DEFAULT_TAB_WIDTH), expected);
	}

	#[test]
	fn tab_width_is_configurable() {
		assert_eq!(display_width("\t\t", 4), 8);
		assert_eq!(char_width('\t', 2), 2);
	}
}
