//! # Reelsmith
//!
//! Turn a story prompt into a rough cut: screenplay, shot list, production
//! documents, placeholder media, and a final video assembled by an external
//! encoder.
//!
//! The assembly core is usable on its own: load a shot list, fold it into an
//! edit decision list, compile that into a filter graph, and encode.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reelsmith::{
//!     config::Config,
//!     encoder::Encoder,
//!     shots::ShotListLoader,
//!     timeline::TimelineBuilder,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let shot_list = ShotListLoader::load("output/production/shot_list.json").await?;
//! let edl = TimelineBuilder::new(config.layout.clips.clone()).build(&shot_list);
//!
//! let encoder = Encoder::new(config.encoder.clone());
//! encoder.encode(&edl, "output", "output/final/cut.mp4").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`shots`] - Shot records and the shot list loader
//! - [`timeline`] - Edit decision lists
//! - [`filtergraph`] - Filter graph model and compiler
//! - [`encoder`] - External encoder invocations
//! - [`generation`] - Content generation capability and offline stand-ins
//! - [`production`] - Sound design and video prompt documents
//! - [`pipeline`] - Project layout and the end-to-end production pipeline
//! - [`config`] - Configuration management
//!
//! ## Plugging in a generation service
//!
//! Any text, image, audio or video backend can be dropped into the pipeline by
//! implementing [`ContentGenerator`](generation::ContentGenerator):
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use reelsmith::generation::{ContentGenerator, ContentKind, GeneratedArtifact, GenerationRequest};
//!
//! struct MyStoryboards;
//!
//! #[async_trait]
//! impl ContentGenerator for MyStoryboards {
//!     fn name(&self) -> &str {
//!         "my_storyboards"
//!     }
//!
//!     fn supports(&self, kind: ContentKind) -> bool {
//!         matches!(kind, ContentKind::Image(_))
//!     }
//!
//!     async fn generate(&self, request: &GenerationRequest) -> reelsmith::Result<GeneratedArtifact> {
//!         // Call the service and save its output
//!         # unimplemented!()
//!     }
//! }
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod filtergraph;
pub mod generation;
pub mod pipeline;
pub mod production;
pub mod shots;
pub mod timeline;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    encoder::Encoder,
    error::{ErrorKind, ReelError, Result},
    filtergraph::FilterGraphCompiler,
    generation::{ContentGenerator, StylePreset},
    pipeline::{ProductionPipeline, ProjectLayout},
    shots::{ShotList, ShotListLoader},
    timeline::{EditDecisionList, TimelineBuilder},
};
