//! Seams to the editor: raw keystrokes in, cursor moves and messages out.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use yano_primitives::{BufferId, JumpTarget, KeyInput};

/// Source of raw keystrokes for one selection cycle.
#[async_trait]
pub trait KeySource: Send {
	/// Waits for the next keystroke. `None` means the input side has closed.
	async fn next_key(&mut self) -> Option<KeyInput>;
}

/// Sending half of a keystroke channel. Hosts push raw keys or key codes here.
#[derive(Debug, Clone)]
pub struct KeyFeed {
	tx: mpsc::UnboundedSender<KeyInput>,
}

impl KeyFeed {
	/// Creates a feed and the [`KeySource`] that drains it.
	pub fn channel() -> (Self, ChannelKeySource) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, ChannelKeySource { rx })
	}

	/// Returns false once the receiving side is gone.
	pub fn send(&self, key: KeyInput) -> bool {
		self.tx.send(key).is_ok()
	}

	/// Sends a raw key code as delivered by the editor's `getchar`.
	pub fn send_code(&self, code: u32) -> bool {
		self.send(KeyInput::from_code(code))
	}

	/// Sends each character of `text` as a separate keystroke.
	pub fn send_str(&self, text: &str) -> bool {
		text.chars().all(|ch| self.send(KeyInput::Char(ch)))
	}
}

/// Channel-backed [`KeySource`] returned by [`KeyFeed::channel`].
#[derive(Debug)]
pub struct ChannelKeySource {
	rx: mpsc::UnboundedReceiver<KeyInput>,
}

#[async_trait]
impl KeySource for ChannelKeySource {
	async fn next_key(&mut self) -> Option<KeyInput> {
		self.rx.recv().await
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
	Info,
	Warn,
	Error,
}

/// Short status-line message shown after a cycle ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
	pub level: StatusLevel,
	pub text: String,
	/// Ring the terminal bell alongside the message.
	pub bell: bool,
}

impl StatusMessage {
	pub fn info(text: impl Into<String>) -> Self {
		Self {
			level: StatusLevel::Info,
			text: text.into(),
			bell: false,
		}
	}

	pub fn warn(text: impl Into<String>) -> Self {
		Self {
			level: StatusLevel::Warn,
			text: text.into(),
			bell: false,
		}
	}

	pub fn error(text: impl Into<String>) -> Self {
		Self {
			level: StatusLevel::Error,
			text: text.into(),
			bell: false,
		}
	}

	pub fn with_bell(mut self) -> Self {
		self.bell = true;
		self
	}
}

/// Failure of an editor call.
#[derive(Debug, Error)]
pub enum HostError {
	#[error("buffer {0} is no longer available")]
	BufferGone(BufferId),
	#[error("editor rejected the request: {0}")]
	Rejected(String),
}

/// Editor operations invoked when a cycle ends.
#[async_trait]
pub trait EditorHost: Send + Sync {
	async fn move_cursor(&self, buffer: BufferId, target: JumpTarget) -> Result<(), HostError>;

	/// Replays keys into the editor's input queue unchanged.
	async fn feed_keys(&self, buffer: BufferId, keys: &str) -> Result<(), HostError>;

	async fn notify(&self, message: StatusMessage);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(flavor = "current_thread")]
	async fn feed_delivers_keys_in_order() {
		let (feed, mut source) = KeyFeed::channel();
		assert!(feed.send_code(27));
		assert!(feed.send_str("Ab"));

		assert_eq!(source.next_key().await, Some(KeyInput::Escape));
		assert_eq!(source.next_key().await, Some(KeyInput::Char('A')));
		assert_eq!(source.next_key().await, Some(KeyInput::Char('b')));
	}

	#[tokio::test(flavor = "current_thread")]
	async fn dropped_feed_closes_the_source() {
		let (feed, mut source) = KeyFeed::channel();
		drop(feed);
		assert_eq!(source.next_key().await, None);
	}

	#[test]
	fn send_fails_after_source_is_dropped() {
		let (feed, source) = KeyFeed::channel();
		drop(source);
		assert!(!feed.send(KeyInput::Enter));
	}
}
