use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::config::{EncoderConfig, PlaceholderConfig, VideoSettings};
use crate::encoder::EncoderInvocation;
use crate::error::{GenerationError, ReelError, Result};
use crate::generation::traits::{require, ContentGenerator, ContentKind, GeneratedArtifact, GenerationRequest};
use crate::timeline::ClipNaming;

fn service_failure(service: &str, err: ReelError) -> ReelError {
    GenerationError::ServiceFailed {
        service: service.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Video stand-in: a solid colour clip per shot, rendered by the encoder.
///
/// Clips land where the timeline expects them, so an EDL built from the same
/// shot list finds them without further wiring.
pub struct PlaceholderClipSource {
    project_dir: PathBuf,
    naming: ClipNaming,
    encoder: EncoderConfig,
    video: VideoSettings,
    placeholder: PlaceholderConfig,
}

impl PlaceholderClipSource {
    const SERVICE: &'static str = "placeholder-video";

    pub fn new<P: Into<PathBuf>>(
        project_dir: P,
        naming: ClipNaming,
        encoder: EncoderConfig,
        video: VideoSettings,
        placeholder: PlaceholderConfig,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            naming,
            encoder,
            video,
            placeholder,
        }
    }

    pub fn clip_path(&self, shot_number: u32) -> PathBuf {
        self.project_dir.join(self.naming.relative_path(shot_number))
    }
}

#[async_trait]
impl ContentGenerator for PlaceholderClipSource {
    fn name(&self) -> &str {
        Self::SERVICE
    }

    fn supports(&self, kind: ContentKind) -> bool {
        kind == ContentKind::Video
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact> {
        self.check_supported(request)?;
        let shot_number = require(Self::SERVICE, "shot_number", request.shot_number)?;
        let duration = require(Self::SERVICE, "duration", request.duration)?;

        let path = self.clip_path(shot_number);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut video = self.video.clone();
        if let Some(resolution) = request.resolution {
            video.resolution = resolution;
        }

        debug!("Rendering placeholder for shot {} ({:.1}s)", shot_number, duration);
        EncoderInvocation::placeholder_clip(&self.encoder, &video, &self.placeholder, shot_number, duration, &path)
            .run()
            .await
            .map_err(|e| service_failure(Self::SERVICE, e))?;

        Ok(GeneratedArtifact { kind: ContentKind::Video, path })
    }
}

/// Audio stand-in: a silent track of the requested length
pub struct PlaceholderAudioSource {
    audio_dir: PathBuf,
    encoder: EncoderConfig,
    placeholder: PlaceholderConfig,
}

impl PlaceholderAudioSource {
    const SERVICE: &'static str = "placeholder-audio";

    pub fn new<P: Into<PathBuf>>(audio_dir: P, encoder: EncoderConfig, placeholder: PlaceholderConfig) -> Self {
        Self {
            audio_dir: audio_dir.into(),
            encoder,
            placeholder,
        }
    }

    /// `<audio_dir>/<category>_<unix seconds>.<ext>`
    pub fn track_path(&self, category: &str) -> PathBuf {
        let stamp = chrono::Utc::now().timestamp();
        self.audio_dir
            .join(format!("{}_{}.{}", category, stamp, self.placeholder.audio_extension))
    }
}

#[async_trait]
impl ContentGenerator for PlaceholderAudioSource {
    fn name(&self) -> &str {
        Self::SERVICE
    }

    fn supports(&self, kind: ContentKind) -> bool {
        kind == ContentKind::Audio
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact> {
        self.check_supported(request)?;
        let duration = require(Self::SERVICE, "duration", request.duration)?;
        let category = request.category.as_deref().unwrap_or("music");

        tokio::fs::create_dir_all(&self.audio_dir).await?;
        let path = self.track_path(category);

        debug!("Rendering {:.1}s of silence as {}", duration, category);
        EncoderInvocation::silent_audio(&self.encoder, &self.placeholder, duration, &path)
            .run()
            .await
            .map_err(|e| service_failure(Self::SERVICE, e))?;

        Ok(GeneratedArtifact { kind: ContentKind::Audio, path })
    }
}
