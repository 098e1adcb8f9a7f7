//! In-memory backend and host that record every call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use yano_primitives::{BufferId, HintMapping, HintPosition, JumpTarget, Word};

use crate::host::{EditorHost, HostError, StatusMessage};
use crate::overlay::{OverlayBackend, OverlayPrimitive, RenderError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCall {
	Place { hint: String, primitive: OverlayPrimitive },
	Clear,
	Highlight { partial: String, candidates: usize },
}

/// Records overlay calls. Placements with a failing primitive return an error.
#[derive(Debug, Default)]
pub struct RecordingBackend {
	pub calls: Mutex<Vec<OverlayCall>>,
	failing: Mutex<Vec<OverlayPrimitive>>,
	/// Remaining placements that fail regardless of primitive.
	fail_budget: AtomicUsize,
	cancel_after: Mutex<Option<(usize, CancellationToken)>>,
}

impl RecordingBackend {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn failing(primitives: &[OverlayPrimitive]) -> Arc<Self> {
		let backend = Self::default();
		*backend.failing.lock() = primitives.to_vec();
		Arc::new(backend)
	}

	pub fn fail_next(&self, count: usize) {
		self.fail_budget.store(count, Ordering::SeqCst);
	}

	/// Cancels `token` once `placed` hints have been placed.
	pub fn cancel_after(&self, placed: usize, token: CancellationToken) {
		*self.cancel_after.lock() = Some((placed, token));
	}

	pub fn calls(&self) -> Vec<OverlayCall> {
		self.calls.lock().clone()
	}

	pub fn placed(&self) -> Vec<(String, OverlayPrimitive)> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				OverlayCall::Place { hint, primitive } => Some((hint, primitive)),
				_ => None,
			})
			.collect()
	}

	pub fn clear_count(&self) -> usize {
		self.calls().iter().filter(|call| **call == OverlayCall::Clear).count()
	}
}

#[async_trait]
impl OverlayBackend for RecordingBackend {
	async fn place_hint(&self, _buffer: BufferId, mapping: &HintMapping, primitive: OverlayPrimitive) -> Result<(), RenderError> {
		let budget = self.fail_budget.load(Ordering::SeqCst);
		if budget > 0 {
			self.fail_budget.store(budget - 1, Ordering::SeqCst);
			return Err(RenderError::Placement {
				primitive,
				reason: "scripted failure".into(),
			});
		}
		if self.failing.lock().contains(&primitive) {
			return Err(RenderError::Placement {
				primitive,
				reason: "unsupported".into(),
			});
		}
		let placed = {
			let mut calls = self.calls.lock();
			calls.push(OverlayCall::Place {
				hint: mapping.hint.clone(),
				primitive,
			});
			calls.iter().filter(|call| matches!(call, OverlayCall::Place { .. })).count()
		};
		if let Some((limit, token)) = &*self.cancel_after.lock() {
			if placed >= *limit {
				token.cancel();
			}
		}
		Ok(())
	}

	async fn clear(&self, _buffer: BufferId) -> Result<(), RenderError> {
		self.calls.lock().push(OverlayCall::Clear);
		Ok(())
	}

	async fn highlight(&self, _buffer: BufferId, partial: &str, mappings: &[HintMapping]) -> Result<(), RenderError> {
		self.calls.lock().push(OverlayCall::Highlight {
			partial: partial.to_string(),
			candidates: mappings.len(),
		});
		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
	Move(JumpTarget),
	Feed(String),
	Notify(StatusMessage),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
	pub calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn calls(&self) -> Vec<HostCall> {
		self.calls.lock().clone()
	}

	pub fn moves(&self) -> Vec<JumpTarget> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				HostCall::Move(target) => Some(target),
				_ => None,
			})
			.collect()
	}

	pub fn messages(&self) -> Vec<StatusMessage> {
		self.calls()
			.into_iter()
			.filter_map(|call| match call {
				HostCall::Notify(message) => Some(message),
				_ => None,
			})
			.collect()
	}
}

#[async_trait]
impl EditorHost for RecordingHost {
	async fn move_cursor(&self, _buffer: BufferId, target: JumpTarget) -> Result<(), HostError> {
		self.calls.lock().push(HostCall::Move(target));
		Ok(())
	}

	async fn feed_keys(&self, _buffer: BufferId, keys: &str) -> Result<(), HostError> {
		self.calls.lock().push(HostCall::Feed(keys.to_string()));
		Ok(())
	}

	async fn notify(&self, message: StatusMessage) {
		self.calls.lock().push(HostCall::Notify(message));
	}
}

/// One mapping per hint, each on its own line starting at column 1.
pub fn mappings(hints: &[&str]) -> Vec<HintMapping> {
	hints
		.iter()
		.enumerate()
		.map(|(i, hint)| HintMapping::new(Word::new(format!("word{i}"), i as u32 + 1, 1), *hint, HintPosition::Start, 8))
		.collect()
}
