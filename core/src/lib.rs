//! Core traversal logic for stagewalk.
//!
//! This crate owns everything that changes while a traversal runs: the
//! reference-counted suppression ledger, the depth-first engine that drives
//! it, and the renderer contract the engine reports through. [`Stage`] ties
//! them to a configured graph.

mod engine;
pub mod ledger;
pub mod recording;
mod render;
mod stage;

pub use engine::{TraversalError, TraversalSummary};
pub use ledger::{Decrement, Increment, LedgerError, SuppressionLedger};
pub use recording::{RecordedEvent, RecordedTransition, RecordingRenderer};
pub use render::{EdgeLabel, Renderer, Transition};
pub use stage::Stage;
