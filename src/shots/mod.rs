//! # Shot Lists
//!
//! Shot records as planned by the screenplay stage, and the loader that reads
//! and validates persisted shot list artifacts.

pub mod loader;
pub mod types;

pub use loader::ShotListLoader;
pub use types::{ShotList, ShotRecord, ShotType, TransitionKind, Transitions};
