//! # Filter Graphs
//!
//! A small typed model of encoder filter graphs, and the compiler that turns
//! an edit decision list into one. The graph is only rendered to text when an
//! encoder command line is built.

pub mod compiler;
pub mod graph;

pub use compiler::{CompiledGraph, FilterGraphCompiler, FADE_IN_SECONDS, OUTPUT_LABEL};
pub use graph::{FadeDirection, Filter, FilterGraph, FilterStage, Pad, StreamKind};
