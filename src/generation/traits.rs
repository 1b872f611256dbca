use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Documents produced by a text service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDocument {
    Screenplay,
    ShotList,
}

/// Images produced by an image service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    ConceptArt,
    Storyboard,
    Character,
}

/// What a generation request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text(TextDocument),
    Image(ImageKind),
    Audio,
    Video,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Text(TextDocument::Screenplay) => f.write_str("screenplay"),
            ContentKind::Text(TextDocument::ShotList) => f.write_str("shot list"),
            ContentKind::Image(ImageKind::ConceptArt) => f.write_str("concept art"),
            ContentKind::Image(ImageKind::Storyboard) => f.write_str("storyboard"),
            ContentKind::Image(ImageKind::Character) => f.write_str("character design"),
            ContentKind::Audio => f.write_str("audio"),
            ContentKind::Video => f.write_str("video"),
        }
    }
}

/// Visual style tag carried with every request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    #[default]
    Cinematic,
    Documentary,
    Noir,
}

impl StylePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            StylePreset::Cinematic => "cinematic",
            StylePreset::Documentary => "documentary",
            StylePreset::Noir => "noir",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured description of one piece of content to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: ContentKind,

    /// Scene text or story prompt
    pub prompt: String,
    pub style: StylePreset,

    /// Target length in seconds (audio, video, shot lists)
    pub duration: Option<f64>,
    pub resolution: Option<(u32, u32)>,

    /// Shot this request belongs to, if any
    pub shot_number: Option<u32>,

    /// Free label such as an audio category ("music", "ambience")
    pub category: Option<String>,
}

impl GenerationRequest {
    pub fn new<S: Into<String>>(kind: ContentKind, prompt: S) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            style: StylePreset::default(),
            duration: None,
            resolution: None,
            shot_number: None,
            category: None,
        }
    }

    pub fn with_style(mut self, style: StylePreset) -> Self {
        self.style = style;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_resolution(mut self, resolution: (u32, u32)) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_shot(mut self, shot_number: u32) -> Self {
        self.shot_number = Some(shot_number);
        self
    }

    pub fn with_category<S: Into<String>>(mut self, category: S) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A persisted result of a generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub kind: ContentKind,
    pub path: PathBuf,
}

/// A text, image, audio or video generation service.
///
/// Implementations persist what they produce and return where they put it;
/// the pipeline only ever deals in paths.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Service name used in logs and errors
    fn name(&self) -> &str;

    fn supports(&self, kind: ContentKind) -> bool;

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact>;

    /// Reject requests this service does not handle
    fn check_supported(&self, request: &GenerationRequest) -> Result<()> {
        if self.supports(request.kind) {
            Ok(())
        } else {
            Err(GenerationError::UnsupportedKind {
                service: self.name().to_string(),
                requested: request.kind.to_string(),
            }
            .into())
        }
    }
}

/// Pull a required field out of a request or fail naming it
pub(crate) fn require<T>(service: &str, field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| {
        GenerationError::MissingField {
            service: service.to_string(),
            field: field.to_string(),
        }
        .into()
    })
}
