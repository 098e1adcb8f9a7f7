//! Hint generation and assignment.
//!
//! The pipeline for one hint cycle is:
//!
//! 1. [`HintGenerator`] produces unique hint strings for the configured key
//!    classes (single-character keys, two-character combinations, then the
//!    numeric `01..99,00` fallback).
//! 2. [`HintAssigner`] drops the word under the cursor and words whose overlay
//!    would collide with a stronger neighbour ([`AdjacencyResolver`]), orders
//!    the rest by distance to the cursor, and zips them with the hints.
//!
//! Every stage memoizes through a [`yano_cache::BoundedCache`] owned by the
//! component.

pub mod adjacency;
pub mod assign;
pub mod generator;
pub mod keys;

pub use adjacency::{AdjacencyEntry, AdjacencyResolver, OverlapPriority, are_adjacent, should_suppress};
pub use assign::{AssignOptions, Assignment, HintAssigner, HintPositionConfig, SortPolicy};
pub use generator::{HintGenerator, HintSequence, generate, generate_from_markers, numeric_hint};
pub use keys::{ALLOWED_SYMBOLS, KeyClass, KeyClassConfig, KeyConfigError, ValidationReport, validate};
