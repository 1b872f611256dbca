//! # Timeline
//!
//! Turns an ordered shot list into an edit decision list with cumulative
//! in/out points and resolved source clip paths.

pub mod builder;
pub mod edl;

pub use builder::{ClipNaming, TimelineBuilder};
pub use edl::{EditDecisionList, EditPoint};
