//! Two-stage keystroke selection.
//!
//! A cycle starts in [`SelectionState::AwaitingFirstKey`] with the overlay
//! already rendering. The first key either finishes the cycle (jump, cancel,
//! pass-through) or narrows the candidates and moves to
//! [`SelectionState::AwaitingSecondKey`]. Every exit clears the overlay.
//!
//! The transition rules live in the pure `first_key*` / `second_key*` methods
//! on [`SelectionMachine`]; [`SelectionMachine::run`] only waits for input,
//! races it against the per-state timeout and the cycle token, and applies the
//! outcome's side effects.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use yano_hints::{KeyClass, KeyClassConfig};
use yano_primitives::{BufferId, HintMapping, KeyInput, normalize_hint_char};

use crate::host::{EditorHost, KeySource, StatusMessage};
use crate::overlay::{OverlayRenderer, RenderHandle};

/// Timing and key classes for one selection cycle.
#[derive(Debug, Clone)]
pub struct SelectionConfig {
	pub keys: KeyClassConfig,
	pub first_key_timeout: Duration,
	pub second_key_timeout: Duration,
	/// Highlight the narrowed candidates after the first key.
	pub highlight_candidates: bool,
}

impl Default for SelectionConfig {
	fn default() -> Self {
		Self {
			keys: KeyClassConfig::default(),
			first_key_timeout: Duration::from_millis(2000),
			second_key_timeout: Duration::from_millis(800),
			highlight_candidates: true,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
	Idle,
	AwaitingFirstKey,
	AwaitingSecondKey,
}

impl fmt::Display for SelectionState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Idle => "idle",
			Self::AwaitingFirstKey => "awaiting-first-key",
			Self::AwaitingSecondKey => "awaiting-second-key",
		})
	}
}

/// Why a cycle ended without a jump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
	Escape,
	/// A non-printable key other than Enter.
	ControlKey,
	/// A lowercase letter, replayed into the editor unchanged.
	PassThrough(char),
	/// A key outside the hint alphabet.
	InvalidKey(KeyInput),
	/// No hint starts with the typed key.
	NoMatch(char),
	/// The two typed keys form no hint.
	InvalidCombination(String),
	/// A newer cycle or an explicit abort took over.
	Superseded,
	/// The key source closed.
	InputClosed,
}

/// Terminal state of a selection cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
	Jumped(HintMapping),
	Cancelled(CancelReason),
	TimedOut { candidates: usize },
}

impl SelectionOutcome {
	pub fn jumped(&self) -> Option<&HintMapping> {
		match self {
			Self::Jumped(mapping) => Some(mapping),
			_ => None,
		}
	}
}

/// Pending second keystroke after a first key narrowed the candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondKeyWait {
	/// Normalized first key.
	pub first: char,
	pub candidates: Vec<HintMapping>,
	/// `None` waits indefinitely (multi-only first key under hint groups).
	pub timeout: Option<Duration>,
}

/// Result of the first keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirstKeyStep {
	Done(SelectionOutcome),
	AwaitSecondKey(SecondKeyWait),
}

enum Wait {
	Key(KeyInput),
	Timeout,
	Closed,
	Cancelled,
}

/// Drives one selection cycle against a renderer and an editor host.
pub struct SelectionMachine {
	config: SelectionConfig,
	renderer: Arc<OverlayRenderer>,
	host: Arc<dyn EditorHost>,
}

impl SelectionMachine {
	pub fn new(config: SelectionConfig, renderer: Arc<OverlayRenderer>, host: Arc<dyn EditorHost>) -> Self {
		Self { config, renderer, host }
	}

	pub fn config(&self) -> &SelectionConfig {
		&self.config
	}

	/// True if `ch` (already normalized) belongs to the hint alphabet.
	pub fn is_hint_key(&self, ch: char) -> bool {
		ch.is_ascii_uppercase() || (ch.is_ascii_digit() && self.config.keys.allows_digits()) || self.config.keys.contains(ch)
	}

	/// Applies the first keystroke to `mappings`.
	pub fn first_key(&self, mappings: &[HintMapping], key: KeyInput) -> FirstKeyStep {
		let ch = match key {
			KeyInput::Escape => return FirstKeyStep::Done(SelectionOutcome::Cancelled(CancelReason::Escape)),
			KeyInput::Control(_) => return FirstKeyStep::Done(SelectionOutcome::Cancelled(CancelReason::ControlKey)),
			KeyInput::Char(ch) if key.is_lowercase_letter() => {
				return FirstKeyStep::Done(SelectionOutcome::Cancelled(CancelReason::PassThrough(ch)));
			}
			KeyInput::Char(ch) => normalize_hint_char(ch),
			KeyInput::Enter => return FirstKeyStep::Done(SelectionOutcome::Cancelled(CancelReason::InvalidKey(key))),
		};
		if !self.is_hint_key(ch) {
			return FirstKeyStep::Done(SelectionOutcome::Cancelled(CancelReason::InvalidKey(key)));
		}

		let keys = &self.config.keys;
		let class = keys.class_of(ch);
		let exact_allowed = if keys.hint_groups_enabled { class == Some(KeyClass::Single) } else { true };
		if exact_allowed {
			if let Some(mapping) = mappings.iter().find(|m| is_hint(&m.hint, ch)) {
				return FirstKeyStep::Done(SelectionOutcome::Jumped(mapping.clone()));
			}
		}

		let candidates: Vec<HintMapping> = mappings.iter().filter(|m| m.hint.starts_with(ch)).cloned().collect();
		if candidates.is_empty() {
			return FirstKeyStep::Done(SelectionOutcome::Cancelled(CancelReason::NoMatch(ch)));
		}

		let multi_only = keys.hint_groups_enabled && class == Some(KeyClass::Multi);
		FirstKeyStep::AwaitSecondKey(SecondKeyWait {
			first: ch,
			candidates,
			timeout: (!multi_only).then_some(self.config.second_key_timeout),
		})
	}

	/// First-key timer expired: a lone single-character hint wins.
	pub fn first_key_timeout(&self, mappings: &[HintMapping]) -> SelectionOutcome {
		let mut singles = mappings.iter().filter(|m| m.is_single_char());
		match (singles.next(), singles.next()) {
			(Some(only), None) => SelectionOutcome::Jumped(only.clone()),
			_ => SelectionOutcome::TimedOut { candidates: mappings.len() },
		}
	}

	/// Applies the second keystroke.
	pub fn second_key(&self, wait: &SecondKeyWait, key: KeyInput) -> SelectionOutcome {
		let second = match key {
			KeyInput::Escape => return SelectionOutcome::Cancelled(CancelReason::Escape),
			KeyInput::Enter | KeyInput::Control(_) => return SelectionOutcome::Cancelled(CancelReason::ControlKey),
			KeyInput::Char(ch) if ch.is_alphabetic() => normalize_hint_char(ch),
			KeyInput::Char(ch) => ch,
		};

		let combination: String = [wait.first, second].iter().collect();
		match wait.candidates.iter().find(|m| m.hint == combination) {
			Some(mapping) => SelectionOutcome::Jumped(mapping.clone()),
			None => SelectionOutcome::Cancelled(CancelReason::InvalidCombination(combination)),
		}
	}

	/// Second-key timer expired: a lone candidate, or a hint equal to the first key, wins.
	pub fn second_key_timeout(&self, wait: &SecondKeyWait) -> SelectionOutcome {
		if let [only] = wait.candidates.as_slice() {
			return SelectionOutcome::Jumped(only.clone());
		}
		match wait.candidates.iter().find(|m| is_hint(&m.hint, wait.first)) {
			Some(coincident) => SelectionOutcome::Jumped(coincident.clone()),
			None => SelectionOutcome::TimedOut {
				candidates: wait.candidates.len(),
			},
		}
	}

	/// Runs one cycle to completion.
	///
	/// `render` is the in-flight overlay render for `mappings`. It is cancelled
	/// and awaited before the overlay is cleared, so no hint lands after the
	/// clear. Cancelling `cancel` ends the cycle as
	/// [`CancelReason::Superseded`].
	pub async fn run(
		&self,
		buffer: BufferId,
		mappings: &[HintMapping],
		keys: &mut dyn KeySource,
		cancel: &CancellationToken,
		render: Option<RenderHandle>,
	) -> SelectionOutcome {
		let mut highlight = None;
		let outcome = self.select(buffer, mappings, keys, cancel, &mut highlight).await;
		tracing::debug!(%buffer, ?outcome, state = %SelectionState::Idle, "selection finished");

		if let Some(highlight) = highlight {
			highlight.cancel_and_wait().await;
		}
		if let Some(render) = render {
			if let Some(summary) = render.cancel_and_wait().await {
				tracing::trace!(%buffer, ?summary, "render stopped");
			}
		}

		if let SelectionOutcome::Jumped(mapping) = &outcome {
			if let Err(error) = self.host.move_cursor(buffer, mapping.jump_target()).await {
				tracing::warn!(%buffer, hint = %mapping.hint, %error, "cursor move failed");
				self.host.notify(StatusMessage::error(format!("jump failed: {error}"))).await;
			}
		}
		if let Err(error) = self.renderer.clear_overlay(buffer).await {
			tracing::warn!(%buffer, %error, "overlay clear failed");
		}
		self.report(buffer, &outcome).await;
		outcome
	}

	async fn select(
		&self,
		buffer: BufferId,
		mappings: &[HintMapping],
		keys: &mut dyn KeySource,
		cancel: &CancellationToken,
		highlight: &mut Option<RenderHandle<bool>>,
	) -> SelectionOutcome {
		tracing::debug!(%buffer, mappings = mappings.len(), state = %SelectionState::AwaitingFirstKey, "waiting for key");
		let key = match wait_for_key(keys, Some(self.config.first_key_timeout), cancel).await {
			Wait::Key(key) => key,
			Wait::Timeout => return self.first_key_timeout(mappings),
			Wait::Closed => return SelectionOutcome::Cancelled(CancelReason::InputClosed),
			Wait::Cancelled => return SelectionOutcome::Cancelled(CancelReason::Superseded),
		};

		let wait = match self.first_key(mappings, key) {
			FirstKeyStep::Done(outcome) => return outcome,
			FirstKeyStep::AwaitSecondKey(wait) => wait,
		};

		tracing::debug!(
			%buffer,
			first = %wait.first,
			candidates = wait.candidates.len(),
			timeout = ?wait.timeout,
			state = %SelectionState::AwaitingSecondKey,
			"waiting for key"
		);
		if self.config.highlight_candidates {
			*highlight = Some(
				self.renderer
					.spawn_highlight(buffer, wait.first.to_string(), wait.candidates.clone(), cancel.child_token()),
			);
		}

		match wait_for_key(keys, wait.timeout, cancel).await {
			Wait::Key(key) => self.second_key(&wait, key),
			Wait::Timeout => self.second_key_timeout(&wait),
			Wait::Closed => SelectionOutcome::Cancelled(CancelReason::InputClosed),
			Wait::Cancelled => SelectionOutcome::Cancelled(CancelReason::Superseded),
		}
	}

	async fn report(&self, buffer: BufferId, outcome: &SelectionOutcome) {
		let message = match outcome {
			SelectionOutcome::Jumped(_) => return,
			SelectionOutcome::TimedOut { candidates } => StatusMessage::info(format!("hint selection timed out ({candidates} candidates)")),
			SelectionOutcome::Cancelled(reason) => match reason {
				CancelReason::Superseded | CancelReason::InputClosed => return,
				CancelReason::PassThrough(ch) => {
					if let Err(error) = self.host.feed_keys(buffer, &KeyInput::Char(*ch).to_feed_string()).await {
						tracing::warn!(%buffer, %ch, %error, "key pass-through failed");
					}
					return;
				}
				CancelReason::Escape | CancelReason::ControlKey => StatusMessage::info("hint selection cancelled"),
				CancelReason::InvalidKey(key) => {
					tracing::warn!(%buffer, ?key, "key outside the hint alphabet");
					StatusMessage::warn("invalid hint key")
				}
				CancelReason::NoMatch(ch) => StatusMessage::info(format!("no hint starts with {ch}")),
				CancelReason::InvalidCombination(combination) => {
					tracing::warn!(%buffer, %combination, "no hint for key combination");
					StatusMessage::error(format!("invalid hint combination: {combination}")).with_bell()
				}
			},
		};
		self.host.notify(message).await;
	}
}

impl fmt::Debug for SelectionMachine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SelectionMachine").field("config", &self.config).finish_non_exhaustive()
	}
}

fn is_hint(hint: &str, ch: char) -> bool {
	let mut chars = hint.chars();
	chars.next() == Some(ch) && chars.next().is_none()
}

async fn wait_for_key(keys: &mut dyn KeySource, timeout: Option<Duration>, cancel: &CancellationToken) -> Wait {
	let timer = async {
		match timeout {
			Some(timeout) => tokio::time::sleep(timeout).await,
			None => std::future::pending::<()>().await,
		}
	};
	tokio::select! {
		biased;
		_ = cancel.cancelled() => Wait::Cancelled,
		key = keys.next_key() => key.map_or(Wait::Closed, Wait::Key),
		_ = timer => Wait::Timeout,
	}
}
