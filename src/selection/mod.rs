//! Selection state: the tracked set, its on-page projection and the state
//! machine that drives both.

pub mod annotator;
pub mod engine;
pub mod store;

pub use annotator::VisualAnnotator;
pub use engine::{SelectionContext, SelectionEngine};
pub use store::{SelectionEntry, SelectionStore};
