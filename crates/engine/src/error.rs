use thiserror::Error;
use yano_config::ConfigError;

use crate::source::WordSourceError;

/// Errors surfaced by [`crate::HintEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
	/// Settings failed validation at construction.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The word scan for the cycle failed.
	#[error(transparent)]
	Words(#[from] WordSourceError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
