//! Core types shared by the hint engine: words, cursor coordinates, hint
//! mappings, keystrokes and display-width helpers.

/// Raw keystroke classification.
pub mod key;
/// Hint mappings and jump targets.
pub mod mapping;
/// Buffer, cursor and hint-position types.
pub mod position;
/// Display-width measurement (tabs, wide characters).
pub mod width;
/// Candidate words produced by the external scanner.
pub mod word;

pub use key::{KeyInput, normalize_hint_char};
pub use mapping::{HintMapping, JumpTarget};
pub use position::{BufferId, CursorPos, EditorMode, HintPosition};
pub use width::{DEFAULT_TAB_WIDTH, char_width, display_width};
pub use word::Word;
