//! Generation numbers and cancellation for hint cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for hint cycles.
#[derive(Debug, Default, Clone)]
pub struct CycleClock {
	next: Arc<AtomicU64>,
}

impl CycleClock {
	/// Creates a new clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Generation-scoped cancellation token for one hint cycle.
#[derive(Debug, Clone)]
pub struct CycleToken {
	generation: u64,
	cancel: CancellationToken,
}

impl CycleToken {
	/// Creates an uncancelled token for `generation`.
	pub fn new(generation: u64) -> Self {
		Self {
			generation,
			cancel: CancellationToken::new(),
		}
	}

	/// Generation the cycle was started with.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true once the cycle was superseded or cancelled.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Cancels the cycle and every child token.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Resolves when the cycle is cancelled.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}

	/// Token for work owned by this cycle (overlay render, highlight).
	///
	/// Cancelling the cycle cancels the child; cancelling the child leaves the
	/// cycle running.
	pub fn child(&self) -> CancellationToken {
		self.cancel.child_token()
	}

	/// Borrowed view for APIs that take a plain [`CancellationToken`].
	pub fn as_cancellation(&self) -> &CancellationToken {
		&self.cancel
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clock_starts_at_one_and_increments() {
		let clock = CycleClock::new();
		assert_eq!(clock.next(), 1);
		assert_eq!(clock.clone().next(), 2);
		assert_eq!(clock.next(), 3);
	}

	#[test]
	fn cycle_cancel_reaches_children_only_downwards() {
		let token = CycleToken::new(4);
		let child = token.child();
		child.cancel();
		assert!(!token.is_cancelled());

		let child = token.child();
		token.cancel();
		assert!(child.is_cancelled());
		assert_eq!(token.generation(), 4);
	}
}
