//! # Content Generation
//!
//! The capability interface behind which screenplay, image, audio and video
//! services sit, plus stand-ins that keep the pipeline runnable without any
//! live service:
//!
//! - [`OfflineTextGenerator`] drafts a screenplay stub and plans a shot list
//! - [`PlaceholderClipSource`] renders a solid colour clip per shot
//! - [`PlaceholderAudioSource`] renders a silent track
//!
//! ```rust,no_run
//! use reelsmith::generation::{ContentGenerator, ContentKind, GenerationRequest, StylePreset};
//! # async fn demo(video: &dyn ContentGenerator) -> reelsmith::Result<()> {
//! let request = GenerationRequest::new(ContentKind::Video, "Robot discovers flower")
//!     .with_style(StylePreset::Cinematic)
//!     .with_duration(5.0)
//!     .with_shot(1);
//! let artifact = video.generate(&request).await?;
//! println!("clip at {:?}", artifact.path);
//! # Ok(())
//! # }
//! ```

pub mod offline;
pub mod placeholder;
pub mod traits;

pub use offline::OfflineTextGenerator;
pub use placeholder::{PlaceholderAudioSource, PlaceholderClipSource};
pub use traits::{
    ContentGenerator, ContentKind, GeneratedArtifact, GenerationRequest, ImageKind, StylePreset,
    TextDocument,
};
