//! Word scanning seam.

use async_trait::async_trait;
use thiserror::Error;
use yano_primitives::{BufferId, Word};

#[derive(Debug, Error)]
pub enum WordSourceError {
	#[error("buffer {0} is no longer available")]
	BufferGone(BufferId),
	#[error("word scan failed: {0}")]
	Scan(String),
}

/// Supplies the candidate words in the visible region of a buffer.
///
/// Segmentation (including Japanese word splitting) happens behind this trait.
#[async_trait]
pub trait WordSource: Send + Sync {
	async fn visible_words(&self, buffer: BufferId) -> Result<Vec<Word>, WordSourceError>;
}
