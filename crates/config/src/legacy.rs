//! Adapter for the older camelCase settings dictionary.
//!
//! Hosts that still send the old shape deserialize it into [`LegacySettings`]
//! and convert with [`upgrade_legacy`]. Nothing else in the workspace knows the
//! old names.

use serde::Deserialize;
use yano_primitives::HintPosition;

use crate::Settings;

/// Key lists were written either as a string of characters or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegacyKeyList {
	Chars(String),
	List(Vec<String>),
}

impl LegacyKeyList {
	fn into_keys(self) -> Vec<String> {
		match self {
			Self::Chars(chars) => chars.chars().map(String::from).collect(),
			Self::List(list) => list,
		}
	}
}

/// The camelCase settings dictionary. Every field is optional; unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacySettings {
	pub markers: Option<LegacyKeyList>,
	pub single_char_keys: Option<LegacyKeyList>,
	pub multi_char_keys: Option<LegacyKeyList>,
	pub max_single_char_hints: Option<i64>,
	pub use_numeric_multi_char_hints: Option<bool>,
	/// Oldest spelling of `useNumericMultiCharHints`.
	pub use_numbers: Option<bool>,
	pub use_hint_groups: Option<bool>,
	pub hint_position: Option<HintPosition>,
	pub visual_hint_position: Option<HintPosition>,
	pub both_min_word_length: Option<usize>,
	pub motion_timeout: Option<u64>,
	pub second_key_timeout: Option<u64>,
	pub skip_overlap_detection: Option<bool>,
	pub symbol_priority: Option<i32>,
	pub text_priority: Option<i32>,
	pub tab_width: Option<u32>,
	pub highlight_selected: Option<bool>,
	pub cache_size: Option<usize>,
}

/// Maps the legacy dictionary onto canonical [`Settings`], keeping defaults
/// for anything the dictionary leaves out.
///
/// When both numeric spellings are present, `useNumericMultiCharHints` wins.
/// A dictionary that sets either key class without `useHintGroups` enables
/// hint groups.
pub fn upgrade_legacy(legacy: LegacySettings) -> Settings {
	let defaults = Settings::default();
	let has_key_classes = legacy.single_char_keys.is_some() || legacy.multi_char_keys.is_some();

	let settings = Settings {
		markers: legacy.markers.map_or(defaults.markers, LegacyKeyList::into_keys),
		single_char_keys: legacy.single_char_keys.map_or(defaults.single_char_keys, LegacyKeyList::into_keys),
		multi_char_keys: legacy.multi_char_keys.map_or(defaults.multi_char_keys, LegacyKeyList::into_keys),
		max_single_char_hints: legacy.max_single_char_hints.or(defaults.max_single_char_hints),
		use_numeric_multi_char_hints: legacy
			.use_numeric_multi_char_hints
			.or(legacy.use_numbers)
			.unwrap_or(defaults.use_numeric_multi_char_hints),
		use_hint_groups: legacy.use_hint_groups.unwrap_or(has_key_classes || defaults.use_hint_groups),
		hint_position: legacy.hint_position.unwrap_or(defaults.hint_position),
		visual_hint_position: legacy.visual_hint_position.unwrap_or(defaults.visual_hint_position),
		both_min_word_length: legacy.both_min_word_length.unwrap_or(defaults.both_min_word_length),
		motion_timeout_ms: legacy.motion_timeout.unwrap_or(defaults.motion_timeout_ms),
		second_key_timeout_ms: legacy.second_key_timeout.unwrap_or(defaults.second_key_timeout_ms),
		skip_overlap_detection: legacy.skip_overlap_detection.unwrap_or(defaults.skip_overlap_detection),
		symbol_priority: legacy.symbol_priority.unwrap_or(defaults.symbol_priority),
		text_priority: legacy.text_priority.unwrap_or(defaults.text_priority),
		tab_width: legacy.tab_width.unwrap_or(defaults.tab_width),
		highlight_candidates: legacy.highlight_selected.unwrap_or(defaults.highlight_candidates),
		cache_capacity: legacy.cache_size.unwrap_or(defaults.cache_capacity),
		..defaults
	};
	tracing::debug!(hint_groups = settings.use_hint_groups, "legacy settings upgraded");
	settings
}
