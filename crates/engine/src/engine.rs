//! Per-buffer hint cycles.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tokio_util::sync::{CancellationToken, DropGuard};
use yano_cache::CacheStats;
use yano_config::Settings;
use yano_hints::{HintAssigner, HintGenerator};
use yano_primitives::{BufferId, CursorPos, EditorMode, HintMapping, HintPosition, Word};
use yano_selection::{
	EditorHost, KeySource, OverlayBackend, OverlayRenderer, SelectionConfig, SelectionMachine, SelectionOutcome, StatusMessage,
};

use crate::error::Result;
use crate::source::WordSource;
use crate::token::{CycleClock, CycleToken};

/// How a hint cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
	/// No word qualified for a hint; nothing was displayed.
	NoCandidates,
	/// A newer cycle for the same buffer started before hints were displayed.
	Superseded,
	Selection(SelectionOutcome),
}

/// Hit/miss counters of the engine's caches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStats {
	pub hints: CacheStats,
	pub order: CacheStats,
	pub adjacency: CacheStats,
}

struct ActiveCycle {
	token: CycleToken,
	/// Cancelled once the cycle has fully unwound (overlay cleared).
	finished: CancellationToken,
}

/// Removes the cycle from the registry and signals `finished` on every exit path.
struct Registration<'a> {
	cycles: &'a Mutex<FxHashMap<BufferId, ActiveCycle>>,
	buffer: BufferId,
	generation: u64,
	_finished: DropGuard,
}

impl Drop for Registration<'_> {
	fn drop(&mut self) {
		let mut cycles = self.cycles.lock();
		if cycles.get(&self.buffer).is_some_and(|active| active.token.generation() == self.generation) {
			cycles.remove(&self.buffer);
		}
	}
}

/// Composition root: scans words, assigns hints, renders the overlay and runs
/// the selection state machine, one cycle per buffer at a time.
pub struct HintEngine {
	settings: Arc<Settings>,
	words: Arc<dyn WordSource>,
	host: Arc<dyn EditorHost>,
	renderer: Arc<OverlayRenderer>,
	machine: SelectionMachine,
	markers: Vec<String>,
	assigner: Arc<Mutex<HintAssigner>>,
	generator: Mutex<HintGenerator>,
	cycles: Mutex<FxHashMap<BufferId, ActiveCycle>>,
	clock: CycleClock,
}

impl HintEngine {
	/// Builds an engine with its own caches sized from `settings`.
	pub fn new(settings: Settings, words: Arc<dyn WordSource>, backend: Arc<dyn OverlayBackend>, host: Arc<dyn EditorHost>) -> Result<Self> {
		let assigner = HintAssigner::new(settings.cache_capacity);
		Self::with_assigner(settings, words, backend, host, Arc::new(Mutex::new(assigner)))
	}

	/// Builds an engine that shares `assigner` (for example
	/// [`crate::shared_assigner`]) with other engines. Its cache sizes are the
	/// assigner's own; tab width and sort policy still follow `settings`.
	pub fn with_assigner(
		settings: Settings,
		words: Arc<dyn WordSource>,
		backend: Arc<dyn OverlayBackend>,
		host: Arc<dyn EditorHost>,
		assigner: Arc<Mutex<HintAssigner>>,
	) -> Result<Self> {
		settings.validate()?;

		let selection = SelectionConfig {
			keys: settings.key_classes(),
			first_key_timeout: settings.first_key_timeout(),
			second_key_timeout: settings.second_key_timeout(),
			highlight_candidates: settings.highlight_candidates,
		};
		let renderer = Arc::new(OverlayRenderer::new(backend, settings.render_batch_size));
		let machine = SelectionMachine::new(selection, Arc::clone(&renderer), Arc::clone(&host));

		Ok(Self {
			markers: settings.marker_keys(),
			generator: Mutex::new(HintGenerator::new(settings.cache_capacity)),
			settings: Arc::new(settings),
			words,
			host,
			renderer,
			machine,
			assigner,
			cycles: Mutex::default(),
			clock: CycleClock::new(),
		})
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn assigner(&self) -> Arc<Mutex<HintAssigner>> {
		Arc::clone(&self.assigner)
	}

	/// Number of buffers with a cycle in flight.
	pub fn active_cycles(&self) -> usize {
		self.cycles.lock().len()
	}

	pub fn stats(&self) -> EngineStats {
		let hints = self.generator.lock().stats();
		let assigner = self.assigner.lock();
		EngineStats {
			hints,
			order: assigner.order_cache_stats(),
			adjacency: assigner.adjacency_stats(),
		}
	}

	/// Runs a normal-mode hint cycle for `buffer`, reading keys from `keys`.
	///
	/// Any cycle already running for `buffer` is cancelled and awaited first.
	pub async fn start_hint_cycle(&self, buffer: BufferId, cursor: CursorPos, keys: &mut dyn KeySource) -> Result<CycleOutcome> {
		self.run_cycle(buffer, cursor, EditorMode::Normal, keys).await
	}

	/// Visual-mode variant of [`Self::start_hint_cycle`]; hints use `visual_hint_position`.
	pub async fn start_visual_hint_cycle(&self, buffer: BufferId, cursor: CursorPos, keys: &mut dyn KeySource) -> Result<CycleOutcome> {
		self.run_cycle(buffer, cursor, EditorMode::Visual, keys).await
	}

	/// Cancels the cycle running for `buffer`, if any. The cycle clears its
	/// overlay and returns [`yano_selection::CancelReason::Superseded`].
	pub fn cancel_cycle(&self, buffer: BufferId) -> bool {
		match self.cycles.lock().get(&buffer) {
			Some(active) => {
				tracing::debug!(%buffer, generation = active.token.generation(), "cycle cancelled");
				active.token.cancel();
				true
			}
			None => false,
		}
	}

	async fn run_cycle(&self, buffer: BufferId, cursor: CursorPos, mode: EditorMode, keys: &mut dyn KeySource) -> Result<CycleOutcome> {
		let token = CycleToken::new(self.clock.next());
		let finished = CancellationToken::new();
		let previous = self.cycles.lock().insert(
			buffer,
			ActiveCycle {
				token: token.clone(),
				finished: finished.clone(),
			},
		);
		let _registration = Registration {
			cycles: &self.cycles,
			buffer,
			generation: token.generation(),
			_finished: finished.drop_guard(),
		};

		if let Some(previous) = previous {
			tracing::debug!(%buffer, previous = previous.token.generation(), generation = token.generation(), "superseding cycle");
			previous.token.cancel();
			previous.finished.cancelled().await;
		}
		if token.is_cancelled() {
			return Ok(CycleOutcome::Superseded);
		}

		let words = tokio::select! {
			biased;
			_ = token.cancelled() => return Ok(CycleOutcome::Superseded),
			words = self.words.visible_words(buffer) => words?,
		};

		let (mappings, position) = self.assign(&words, cursor, mode);
		tracing::debug!(%buffer, generation = token.generation(), ?mode, words = words.len(), mappings = mappings.len(), "hint cycle started");
		if mappings.is_empty() {
			self.host.notify(StatusMessage::info("no hint candidates")).await;
			return Ok(CycleOutcome::NoCandidates);
		}

		let render = self.renderer.spawn_render(buffer, Arc::clone(&mappings), position, token.child());
		let outcome = self.machine.run(buffer, &mappings, keys, token.as_cancellation(), Some(render)).await;
		Ok(CycleOutcome::Selection(outcome))
	}

	fn assign(&self, words: &[Word], cursor: CursorPos, mode: EditorMode) -> (Arc<[HintMapping]>, HintPosition) {
		let positions = self.settings.position_config();
		let opts = self.settings.assign_options();
		let mut generated = 0;
		let assignment = self.assigner.lock().assign_with(words, cursor, mode, &positions, &opts, |count| {
			let mut generator = self.generator.lock();
			let hints = if self.settings.use_hint_groups {
				generator.generate(count, &self.machine.config().keys)
			} else {
				generator.generate_from_markers(count, &self.markers, self.settings.use_numeric_multi_char_hints)
			};
			generated = hints.len();
			hints
		});
		tracing::trace!(cache_hit = assignment.order_cache_hit, hints = generated, "hints assigned");
		(assignment.mappings.into(), assignment.position)
	}
}

impl fmt::Debug for HintEngine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HintEngine")
			.field("settings", &self.settings)
			.field("active_cycles", &self.active_cycles())
			.finish_non_exhaustive()
	}
}
