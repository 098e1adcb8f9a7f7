//! Key classes used to build hints, and their validation.

use std::fmt;

use rustc_hash::FxHashSet;
use thiserror::Error;
use yano_cache::signature_of;

/// Non-alphanumeric characters accepted as hint keys.
pub const ALLOWED_SYMBOLS: &[char] = &[';', ':', ',', '.', '/', '\\', '[', ']', '-', '=', '\'', '"', '@', '`'];

/// Which key list a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
	/// Keys that only ever form one-character hints.
	Single,
	/// Keys that only ever form two-character hints.
	Multi,
}

impl fmt::Display for KeyClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Single => "single-char",
			Self::Multi => "multi-char",
		})
	}
}

/// Key lists and limits that drive hint generation.
///
/// Keys are stored as strings so that malformed configuration survives until
/// [`validate`] reports it; generation itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyClassConfig {
	pub single_char_keys: Vec<String>,
	pub multi_char_keys: Vec<String>,
	/// Cap on emitted single-character hints; `None` means all single keys.
	pub max_single_char_hints: Option<i64>,
	/// Append the `01..99,00` sequence once letter combinations run out.
	pub use_numeric_fallback: bool,
	/// Single-char keys jump immediately, multi-char keys always wait for a second key.
	pub hint_groups_enabled: bool,
}

impl KeyClassConfig {
	/// Number of single-character hints generation may emit.
	pub fn single_char_limit(&self) -> usize {
		let len = self.single_char_keys.len();
		match self.max_single_char_hints {
			Some(max) => usize::try_from(max).unwrap_or(0).min(len),
			None => len,
		}
	}

	/// True when every multi-char key is an ASCII digit.
	pub fn has_numeric_multi_keys(&self) -> bool {
		!self.multi_char_keys.is_empty() && self.multi_char_keys.iter().all(|key| is_single_digit(key))
	}

	/// True when typed digits can start a hint.
	pub fn allows_digits(&self) -> bool {
		self.use_numeric_fallback || self.has_numeric_multi_keys()
	}

	/// Classifies a typed (already normalized) character.
	pub fn class_of(&self, ch: char) -> Option<KeyClass> {
		if contains_key(&self.single_char_keys, ch) {
			Some(KeyClass::Single)
		} else if contains_key(&self.multi_char_keys, ch) {
			Some(KeyClass::Multi)
		} else {
			None
		}
	}

	/// True if `ch` appears in either key list.
	pub fn contains(&self, ch: char) -> bool {
		self.class_of(ch).is_some()
	}

	/// Stable hash of everything that affects generation.
	pub fn signature(&self) -> u64 {
		signature_of([(
			&self.single_char_keys,
			&self.multi_char_keys,
			self.max_single_char_hints,
			self.use_numeric_fallback,
			self.hint_groups_enabled,
		)])
	}
}

fn contains_key(keys: &[String], ch: char) -> bool {
	keys.iter().any(|key| {
		let mut chars = key.chars();
		chars.next() == Some(ch) && chars.next().is_none()
	})
}

fn is_single_digit(key: &str) -> bool {
	let mut chars = key.chars();
	matches!(chars.next(), Some(ch) if ch.is_ascii_digit()) && chars.next().is_none()
}

/// True if `ch` may be used as a hint key.
pub fn is_allowed_key_char(ch: char) -> bool {
	ch.is_ascii_alphanumeric() || ALLOWED_SYMBOLS.contains(&ch)
}

/// A problem found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyConfigError {
	#[error("{class} key {key:?} must be exactly one character")]
	InvalidLength { class: KeyClass, key: String },
	#[error("{class} key {key:?} is neither alphanumeric nor an allowed symbol")]
	DisallowedCharacter { class: KeyClass, key: String },
	#[error("{class} key {key:?} is listed more than once")]
	DuplicateKey { class: KeyClass, key: String },
	#[error("key {key:?} is both a single-char and a multi-char key")]
	OverlappingKey { key: String },
	#[error("max_single_char_hints must not be negative (got {0})")]
	NegativeMaxSingleCharHints(i64),
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
	pub valid: bool,
	pub errors: Vec<KeyConfigError>,
}

impl ValidationReport {
	fn from_errors(errors: Vec<KeyConfigError>) -> Self {
		Self {
			valid: errors.is_empty(),
			errors,
		}
	}
}

/// Checks the key-class invariants: one character per key, allowed characters
/// only, no duplicates within or across classes, non-negative limits.
pub fn validate(config: &KeyClassConfig) -> ValidationReport {
	let mut errors = Vec::new();

	let single = check_class(KeyClass::Single, &config.single_char_keys, &mut errors);
	let multi = check_class(KeyClass::Multi, &config.multi_char_keys, &mut errors);

	for key in &config.single_char_keys {
		if single.contains(key.as_str()) && multi.contains(key.as_str()) && !errors.iter().any(|e| matches!(e, KeyConfigError::OverlappingKey { key: k } if k == key)) {
			errors.push(KeyConfigError::OverlappingKey { key: key.clone() });
		}
	}

	if let Some(max) = config.max_single_char_hints.filter(|max| *max < 0) {
		errors.push(KeyConfigError::NegativeMaxSingleCharHints(max));
	}

	ValidationReport::from_errors(errors)
}

fn check_class<'a>(class: KeyClass, keys: &'a [String], errors: &mut Vec<KeyConfigError>) -> FxHashSet<&'a str> {
	let mut seen = FxHashSet::default();
	for key in keys {
		if key.chars().count() != 1 {
			errors.push(KeyConfigError::InvalidLength { class, key: key.clone() });
			continue;
		}
		if !key.chars().all(is_allowed_key_char) {
			errors.push(KeyConfigError::DisallowedCharacter { class, key: key.clone() });
			continue;
		}
		if !seen.insert(key.as_str()) {
			errors.push(KeyConfigError::DuplicateKey { class, key: key.clone() });
		}
	}
	seen
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn keys(list: &str) -> Vec<String> {
		list.chars().map(String::from).collect()
	}

	fn config(single: &str, multi: &str) -> KeyClassConfig {
		KeyClassConfig {
			single_char_keys: keys(single),
			multi_char_keys: keys(multi),
			..KeyClassConfig::default()
		}
	}

	#[test]
	fn accepts_disjoint_alphanumeric_and_symbol_keys() {
		let report = validate(&config("ASDF;", "BCE12"));
		assert!(report.valid);
		assert!(report.errors.is_empty());
	}

	#[test]
	fn rejects_multi_character_and_empty_keys() {
		let mut cfg = config("A", "B");
		cfg.single_char_keys.push("XY".to_string());
		cfg.multi_char_keys.push(String::new());
		let report = validate(&cfg);
		assert!(!report.valid);
		assert_eq!(
			report.errors,
			vec![
				KeyConfigError::InvalidLength { class: KeyClass::Single, key: "XY".to_string() },
				KeyConfigError::InvalidLength { class: KeyClass::Multi, key: String::new() },
			]
		);
	}

	#[test]
	fn rejects_disallowed_characters() {
		let report = validate(&config("A!", "Bあ"));
		assert_eq!(
			report.errors,
			vec![
				KeyConfigError::DisallowedCharacter { class: KeyClass::Single, key: "!".to_string() },
				KeyConfigError::DisallowedCharacter { class: KeyClass::Multi, key: "あ".to_string() },
			]
		);
	}

	#[test]
	fn rejects_duplicates_within_and_across_classes() {
		let report = validate(&config("AAS", "SB"));
		assert_eq!(
			report.errors,
			vec![
				KeyConfigError::DuplicateKey { class: KeyClass::Single, key: "A".to_string() },
				KeyConfigError::OverlappingKey { key: "S".to_string() },
			]
		);
	}

	#[test]
	fn rejects_negative_single_char_limit() {
		let mut cfg = config("AS", "BC");
		cfg.max_single_char_hints = Some(-1);
		let report = validate(&cfg);
		assert_eq!(report.errors, vec![KeyConfigError::NegativeMaxSingleCharHints(-1)]);
	}

	#[test]
	fn single_char_limit_clamps() {
		let mut cfg = config("ASDF", "");
		assert_eq!(cfg.single_char_limit(), 4);
		cfg.max_single_char_hints = Some(2);
		assert_eq!(cfg.single_char_limit(), 2);
		cfg.max_single_char_hints = Some(10);
		assert_eq!(cfg.single_char_limit(), 4);
		cfg.max_single_char_hints = Some(-3);
		assert_eq!(cfg.single_char_limit(), 0);
	}

	#[test]
	fn classifies_typed_characters() {
		let cfg = config("AS", "BC");
		assert_eq!(cfg.class_of('A'), Some(KeyClass::Single));
		assert_eq!(cfg.class_of('C'), Some(KeyClass::Multi));
		assert_eq!(cfg.class_of('Z'), None);
	}

	#[test]
	fn numeric_multi_keys_are_detected() {
		assert!(config("", "0123456789").has_numeric_multi_keys());
		assert!(!config("", "01A").has_numeric_multi_keys());
		assert!(!config("", "").has_numeric_multi_keys());
		assert!(config("", "12").allows_digits());
	}

	#[test]
	fn signature_tracks_generation_inputs() {
		let a = config("AS", "BC");
		let mut b = a.clone();
		assert_eq!(a.signature(), b.signature());
		b.use_numeric_fallback = true;
		assert_ne!(a.signature(), b.signature());
		assert_ne!(config("AS", "BC").signature(), config("ASB", "C").signature());
	}
}
