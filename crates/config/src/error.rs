//! Error types for settings loading and validation.

use std::path::PathBuf;

use thiserror::Error;
use yano_hints::KeyConfigError;

/// Errors that can occur when loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error parsing a legacy JSON settings dictionary.
	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	/// Error reading a settings file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The key classes violate their invariants.
	#[error("invalid hint keys: {}", join(.0))]
	InvalidKeys(Vec<KeyConfigError>),

	/// A numeric or structural setting is out of range.
	#[error("invalid value for '{field}': {reason}")]
	InvalidValue {
		/// The setting name.
		field: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}

fn join(errors: &[KeyConfigError]) -> String {
	errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
