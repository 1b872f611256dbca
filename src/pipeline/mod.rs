//! End-to-end production: directory layout plus the staged pipeline that
//! takes a story prompt to a finished cut.

pub mod engine;
pub mod layout;

pub use engine::{PipelineReport, Production, ProductionPipeline};
pub use layout::ProjectLayout;
