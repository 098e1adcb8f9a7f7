//! Interactive hint selection.
//!
//! Given the mappings for one hint cycle, this crate renders the overlay
//! ([`overlay`]), reads keystrokes from the host ([`host`]) and drives the
//! two-stage selection ([`machine`]) until the cursor jumps or the cycle is
//! cancelled or times out.

pub mod host;
pub mod machine;
pub mod overlay;
#[cfg(test)]
mod testing;

pub use host::{ChannelKeySource, EditorHost, HostError, KeyFeed, KeySource, StatusLevel, StatusMessage};
pub use machine::{CancelReason, FirstKeyStep, SecondKeyWait, SelectionConfig, SelectionMachine, SelectionOutcome, SelectionState};
pub use overlay::{OverlayBackend, OverlayPrimitive, OverlayRenderer, PRIMARY_FAILURE_LIMIT, RenderError, RenderHandle, RenderSummary};
