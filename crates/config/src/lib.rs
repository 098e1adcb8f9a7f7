//! Settings for the hint engine.
//!
//! The engine consumes one canonical, read-only [`Settings`] record. This crate
//! loads it from TOML:
//!
//! ```toml
//! single_char_keys = ["A", "S", "D", "F"]
//! multi_char_keys = ["B", "C", "E"]
//! use_hint_groups = true
//! hint_position = "start"
//! visual_hint_position = "end"
//! motion_timeout_ms = 2000
//! ```
//!
//! Older camelCase dictionaries (`singleCharKeys`, `useNumbers`, key lists
//! written as plain strings, ...) go through [`legacy::upgrade_legacy`], which
//! is the only place that knows about the old names.

pub mod error;
pub mod legacy;

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use yano_hints::{AssignOptions, HintPositionConfig, KeyClassConfig, OverlapPriority, SortPolicy, validate};
use yano_primitives::HintPosition;

pub use error::{ConfigError, Result};
pub use legacy::{LegacySettings, upgrade_legacy};

/// Resolved engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	/// Key list used when hint groups are disabled.
	pub markers: Vec<String>,
	/// Keys that form one-character hints (hint groups enabled).
	pub single_char_keys: Vec<String>,
	/// Keys that form two-character hints (hint groups enabled).
	pub multi_char_keys: Vec<String>,
	pub max_single_char_hints: Option<i64>,
	/// Append `01..99,00` after letter combinations.
	pub use_numeric_multi_char_hints: bool,
	pub use_hint_groups: bool,
	pub hint_position: HintPosition,
	pub visual_hint_position: HintPosition,
	pub both_min_word_length: usize,
	/// First-key wait, in milliseconds.
	pub motion_timeout_ms: u64,
	/// Second-key wait, in milliseconds.
	pub second_key_timeout_ms: u64,
	pub skip_overlap_detection: bool,
	pub symbol_priority: i32,
	pub text_priority: i32,
	pub tab_width: u32,
	/// Highlight the surviving candidates after the first key.
	pub highlight_candidates: bool,
	pub cache_capacity: usize,
	pub sort_batch_threshold: usize,
	pub sort_batch_size: usize,
	/// Overlay items placed between cancellation checks.
	pub render_batch_size: usize,
}

fn key_list(keys: &str) -> Vec<String> {
	keys.chars().map(String::from).collect()
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			markers: key_list("ASDFGHJKLQWERTYUIOPZXCVBNM"),
			single_char_keys: key_list("ASDFGHJKLNM"),
			multi_char_keys: key_list("BCEIOPQRTUVWXYZ"),
			max_single_char_hints: None,
			use_numeric_multi_char_hints: false,
			use_hint_groups: true,
			hint_position: HintPosition::Start,
			visual_hint_position: HintPosition::End,
			both_min_word_length: 5,
			motion_timeout_ms: 2000,
			second_key_timeout_ms: 800,
			skip_overlap_detection: false,
			symbol_priority: 1,
			text_priority: 2,
			tab_width: yano_primitives::DEFAULT_TAB_WIDTH,
			highlight_candidates: true,
			cache_capacity: 32,
			sort_batch_threshold: 500,
			sort_batch_size: 250,
			render_batch_size: 50,
		}
	}
}

impl Settings {
	/// Parses settings from a TOML string. Missing fields take their defaults.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let settings: Self = toml::from_str(input)?;
		Ok(settings)
	}

	/// Reads and parses a TOML settings file.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let settings = Self::from_toml_str(&input)?;
		tracing::debug!(path = %path.display(), "settings loaded");
		Ok(settings)
	}

	/// Parses a legacy camelCase JSON dictionary.
	pub fn from_legacy_json_str(input: &str) -> Result<Self> {
		let legacy: LegacySettings = serde_json::from_str(input)?;
		Ok(upgrade_legacy(legacy))
	}

	/// Key classes for the generator and the selection state machine.
	///
	/// Keys are upper-cased, matching how typed keys are normalized. With hint
	/// groups disabled the single-char class holds the markers and the
	/// multi-char class is empty.
	pub fn key_classes(&self) -> KeyClassConfig {
		let upper = |keys: &[String]| keys.iter().map(|key| key.to_ascii_uppercase()).collect::<Vec<_>>();
		if self.use_hint_groups {
			KeyClassConfig {
				single_char_keys: upper(&self.single_char_keys),
				multi_char_keys: upper(&self.multi_char_keys),
				max_single_char_hints: self.max_single_char_hints,
				use_numeric_fallback: self.use_numeric_multi_char_hints,
				hint_groups_enabled: true,
			}
		} else {
			KeyClassConfig {
				single_char_keys: upper(&self.markers),
				multi_char_keys: Vec::new(),
				max_single_char_hints: None,
				use_numeric_fallback: self.use_numeric_multi_char_hints,
				hint_groups_enabled: false,
			}
		}
	}

	/// Upper-cased markers for [`yano_hints::generate_from_markers`].
	pub fn marker_keys(&self) -> Vec<String> {
		self.markers.iter().map(|key| key.to_ascii_uppercase()).collect()
	}

	pub fn position_config(&self) -> HintPositionConfig {
		HintPositionConfig {
			hint_position: self.hint_position,
			visual_hint_position: self.visual_hint_position,
			both_min_word_length: self.both_min_word_length,
		}
	}

	pub fn assign_options(&self) -> AssignOptions {
		AssignOptions {
			skip_overlap_detection: self.skip_overlap_detection,
			priority: OverlapPriority {
				symbol_priority: self.symbol_priority,
				text_priority: self.text_priority,
			},
			tab_width: self.tab_width,
			sort_policy: self.sort_policy(),
		}
	}

	pub fn sort_policy(&self) -> SortPolicy {
		SortPolicy {
			batch_threshold: self.sort_batch_threshold,
			batch_size: self.sort_batch_size,
		}
	}

	pub fn first_key_timeout(&self) -> Duration {
		Duration::from_millis(self.motion_timeout_ms)
	}

	pub fn second_key_timeout(&self) -> Duration {
		Duration::from_millis(self.second_key_timeout_ms)
	}

	/// Checks key classes and numeric ranges.
	pub fn validate(&self) -> Result<()> {
		let report = validate(&self.key_classes());
		if !report.valid {
			return Err(ConfigError::InvalidKeys(report.errors));
		}

		let positive: [(&'static str, u64); 7] = [
			("both_min_word_length", self.both_min_word_length as u64),
			("motion_timeout_ms", self.motion_timeout_ms),
			("second_key_timeout_ms", self.second_key_timeout_ms),
			("tab_width", u64::from(self.tab_width)),
			("cache_capacity", self.cache_capacity as u64),
			("sort_batch_size", self.sort_batch_size as u64),
			("render_batch_size", self.render_batch_size as u64),
		];
		if let Some(&(field, _)) = positive.iter().find(|(_, value)| *value == 0) {
			return Err(ConfigError::InvalidValue {
				field,
				reason: "must be greater than zero".to_string(),
			});
		}

		let keys = if self.use_hint_groups { &self.single_char_keys } else { &self.markers };
		if keys.is_empty() && (!self.use_hint_groups || self.multi_char_keys.is_empty()) {
			return Err(ConfigError::InvalidValue {
				field: if self.use_hint_groups { "single_char_keys" } else { "markers" },
				reason: "no hint keys configured".to_string(),
			});
		}

		Ok(())
	}
}
