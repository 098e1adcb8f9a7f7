//! Jump-to-word hint engine.
//!
//! [`HintEngine`] wires the pieces of one hint cycle together:
//!
//! 1. a [`WordSource`] reports the visible words of a buffer,
//! 2. [`yano_hints`] generates hint strings and assigns them by cursor distance,
//! 3. [`yano_selection`] renders the overlay and runs the keystroke state
//!    machine until the cursor jumps or the cycle ends.
//!
//! At most one cycle runs per buffer. Starting another cancels the first
//! through its [`CycleToken`] and waits until it has cleared its overlay.

mod engine;
pub mod error;
pub mod source;
pub mod token;

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use yano_hints::HintAssigner;

pub use engine::{CycleOutcome, EngineStats, HintEngine};
pub use error::{EngineError, Result};
pub use source::{WordSource, WordSourceError};
pub use token::{CycleClock, CycleToken};

static SHARED_ASSIGNER: OnceLock<Arc<Mutex<HintAssigner>>> = OnceLock::new();

/// Process-wide assigner with default cache sizes, for hosts that run several
/// engines over the same buffers.
///
/// It only holds caches. Tab width and sort policy come from each engine's
/// [`yano_config::Settings`] on every call, and are part of the cache keys.
pub fn shared_assigner() -> Arc<Mutex<HintAssigner>> {
	Arc::clone(SHARED_ASSIGNER.get_or_init(|| Arc::new(Mutex::new(HintAssigner::default()))))
}
