//! Hint overlay rendering.
//!
//! [`OverlayRenderer`] places hints through an [`OverlayBackend`] in batches,
//! checking a [`CancellationToken`] between items and yielding between batches
//! so a superseding cycle can take over quickly. A failed placement is retried
//! once with the alternate primitive. After [`PRIMARY_FAILURE_LIMIT`]
//! consecutive primary failures the renderer swaps primitives for the rest of
//! the call. Items that fail with both primitives are skipped.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use yano_primitives::{BufferId, HintMapping, HintPosition};

/// Consecutive primary failures tolerated before switching primitives.
pub const PRIMARY_FAILURE_LIMIT: usize = 3;

/// Editor mechanism used to draw one hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPrimitive {
	/// Positioned mark with virtual text attached.
	Extmark,
	/// Inline virtual text drawn over the buffer cells.
	VirtualText,
}

impl OverlayPrimitive {
	/// Preferred primitive for a hint position.
	pub fn for_position(position: HintPosition) -> Self {
		match position {
			HintPosition::Overlay => Self::VirtualText,
			HintPosition::Start | HintPosition::End | HintPosition::Both => Self::Extmark,
		}
	}

	pub fn alternate(self) -> Self {
		match self {
			Self::Extmark => Self::VirtualText,
			Self::VirtualText => Self::Extmark,
		}
	}
}

impl fmt::Display for OverlayPrimitive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Extmark => "extmark",
			Self::VirtualText => "virtual-text",
		})
	}
}

#[derive(Debug, Error)]
pub enum RenderError {
	#[error("{primitive} placement failed: {reason}")]
	Placement { primitive: OverlayPrimitive, reason: String },
	#[error("buffer {0} is no longer available")]
	BufferGone(BufferId),
	#[error("overlay backend error: {0}")]
	Backend(String),
}

/// Drawing operations supplied by the editor integration.
#[async_trait]
pub trait OverlayBackend: Send + Sync {
	async fn place_hint(&self, buffer: BufferId, mapping: &HintMapping, primitive: OverlayPrimitive) -> Result<(), RenderError>;

	/// Removes every hint and highlight from `buffer`. Must be idempotent.
	async fn clear(&self, buffer: BufferId) -> Result<(), RenderError>;

	/// Emphasizes the hints still reachable after typing `partial`.
	async fn highlight(&self, buffer: BufferId, partial: &str, mappings: &[HintMapping]) -> Result<(), RenderError>;
}

/// Counters reported by [`OverlayRenderer::render_overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderSummary {
	/// Hints placed with either primitive.
	pub rendered: usize,
	/// Of `rendered`, how many needed the alternate primitive.
	pub fallback: usize,
	pub skipped: usize,
	pub cancelled: bool,
}

/// Spawned render work that can be cancelled and awaited.
#[derive(Debug)]
pub struct RenderHandle<T = RenderSummary> {
	cancel: CancellationToken,
	join: JoinHandle<T>,
}

impl<T> RenderHandle<T> {
	/// Requests cancellation without waiting.
	pub fn abort(&self) {
		self.cancel.cancel();
	}

	pub fn is_finished(&self) -> bool {
		self.join.is_finished()
	}

	/// Cancels the work and waits for it to stop touching the overlay.
	pub async fn cancel_and_wait(self) -> Option<T> {
		self.cancel.cancel();
		self.join.await.ok()
	}

	/// Waits for the work to complete on its own.
	pub async fn finish(self) -> Option<T> {
		self.join.await.ok()
	}
}

/// Batched, cancellable hint rendering over an [`OverlayBackend`].
pub struct OverlayRenderer {
	backend: Arc<dyn OverlayBackend>,
	batch_size: usize,
}

impl OverlayRenderer {
	pub fn new(backend: Arc<dyn OverlayBackend>, batch_size: usize) -> Self {
		Self {
			backend,
			batch_size: batch_size.max(1),
		}
	}

	pub fn batch_size(&self) -> usize {
		self.batch_size
	}

	/// Places every mapping's hint, stopping early once `cancel` fires.
	pub async fn render_overlay(&self, buffer: BufferId, mappings: &[HintMapping], position: HintPosition, cancel: &CancellationToken) -> RenderSummary {
		let mut summary = RenderSummary::default();
		let mut primary = OverlayPrimitive::for_position(position);
		let mut primary_failures = 0;

		for batch in mappings.chunks(self.batch_size) {
			for mapping in batch {
				let Some(result) = self.place(buffer, mapping, primary, cancel).await else {
					summary.cancelled = true;
					tracing::debug!(%buffer, rendered = summary.rendered, "overlay render cancelled");
					return summary;
				};
				let Err(error) = result else {
					primary_failures = 0;
					summary.rendered += 1;
					continue;
				};

				primary_failures += 1;
				let fallback = primary.alternate();
				tracing::warn!(%buffer, hint = %mapping.hint, %primary, %fallback, %error, "hint placement failed");
				match self.place(buffer, mapping, fallback, cancel).await {
					None => {
						summary.cancelled = true;
						return summary;
					}
					Some(Ok(())) => {
						summary.rendered += 1;
						summary.fallback += 1;
					}
					Some(Err(error)) => {
						tracing::warn!(%buffer, hint = %mapping.hint, %error, "hint skipped");
						summary.skipped += 1;
					}
				}

				if primary_failures >= PRIMARY_FAILURE_LIMIT {
					tracing::debug!(%buffer, from = %primary, to = %fallback, "switching overlay primitive");
					primary = fallback;
					primary_failures = 0;
				}
			}
			tokio::task::yield_now().await;
		}

		tracing::trace!(%buffer, ?summary, "overlay rendered");
		summary
	}

	/// Spawns [`Self::render_overlay`] on the current runtime.
	pub fn spawn_render(self: &Arc<Self>, buffer: BufferId, mappings: Arc<[HintMapping]>, position: HintPosition, cancel: CancellationToken) -> RenderHandle {
		let renderer = Arc::clone(self);
		let token = cancel.clone();
		let join = tokio::spawn(async move { renderer.render_overlay(buffer, &mappings, position, &token).await });
		RenderHandle { cancel, join }
	}

	pub async fn clear_overlay(&self, buffer: BufferId) -> Result<(), RenderError> {
		self.backend.clear(buffer).await
	}

	/// Highlights the candidates matching `partial`. Returns `Ok(false)` when cancelled first.
	pub async fn highlight_candidates(
		&self,
		buffer: BufferId,
		partial: &str,
		mappings: &[HintMapping],
		cancel: &CancellationToken,
	) -> Result<bool, RenderError> {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => Ok(false),
			result = self.backend.highlight(buffer, partial, mappings) => result.map(|()| true),
		}
	}

	/// Spawns [`Self::highlight_candidates`], logging failures instead of returning them.
	pub fn spawn_highlight(self: &Arc<Self>, buffer: BufferId, partial: String, mappings: Vec<HintMapping>, cancel: CancellationToken) -> RenderHandle<bool> {
		let renderer = Arc::clone(self);
		let token = cancel.clone();
		let join = tokio::spawn(async move {
			match renderer.highlight_candidates(buffer, &partial, &mappings, &token).await {
				Ok(done) => done,
				Err(error) => {
					tracing::warn!(%buffer, %partial, %error, "candidate highlight failed");
					false
				}
			}
		});
		RenderHandle { cancel, join }
	}

	async fn place(&self, buffer: BufferId, mapping: &HintMapping, primitive: OverlayPrimitive, cancel: &CancellationToken) -> Option<Result<(), RenderError>> {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => None,
			result = self.backend.place_hint(buffer, mapping, primitive) => Some(result),
		}
	}
}

impl fmt::Debug for OverlayRenderer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("OverlayRenderer").field("batch_size", &self.batch_size).finish_non_exhaustive()
	}
}
