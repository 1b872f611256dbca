use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::timeline::ClipNaming;

/// Directory tree a production is written into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub scripts: String,
    pub concept_art: String,
    pub storyboards: String,
    pub characters: String,
    pub production: String,
    pub audio: String,
    pub sound: String,
    pub video_prompts: String,
    pub final_renders: String,

    /// Where generated clips go and what they are called
    pub clips: ClipNaming,
}

impl Default for ProjectLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("output"),
            scripts: "scripts".to_string(),
            concept_art: "concept_art".to_string(),
            storyboards: "storyboards".to_string(),
            characters: "characters".to_string(),
            production: "production".to_string(),
            audio: "audio".to_string(),
            sound: "sound_design".to_string(),
            video_prompts: "video_prompts".to_string(),
            final_renders: "final".to_string(),
            clips: ClipNaming::default(),
        }
    }
}

impl ProjectLayout {
    /// Default layout rooted somewhere else
    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(&self.scripts)
    }

    pub fn concept_art_dir(&self) -> PathBuf {
        self.root.join(&self.concept_art)
    }

    pub fn storyboards_dir(&self) -> PathBuf {
        self.root.join(&self.storyboards)
    }

    pub fn characters_dir(&self) -> PathBuf {
        self.root.join(&self.characters)
    }

    pub fn production_dir(&self) -> PathBuf {
        self.root.join(&self.production)
    }

    pub fn clips_dir(&self) -> PathBuf {
        self.root.join(&self.clips.directory)
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join(&self.audio)
    }

    pub fn sound_dir(&self) -> PathBuf {
        self.root.join(&self.sound)
    }

    pub fn video_prompts_dir(&self) -> PathBuf {
        self.root.join(&self.video_prompts)
    }

    pub fn final_dir(&self) -> PathBuf {
        self.root.join(&self.final_renders)
    }

    fn all_dirs(&self) -> [PathBuf; 10] {
        [
            self.scripts_dir(),
            self.concept_art_dir(),
            self.storyboards_dir(),
            self.characters_dir(),
            self.production_dir(),
            self.clips_dir(),
            self.audio_dir(),
            self.sound_dir(),
            self.video_prompts_dir(),
            self.final_dir(),
        ]
    }

    /// Create every output directory
    pub fn bootstrap(&self) -> Result<()> {
        for dir in self.all_dirs() {
            std::fs::create_dir_all(&dir)?;
            debug!("Ensured {:?}", dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let names = [
            ("layout.scripts", &self.scripts),
            ("layout.concept_art", &self.concept_art),
            ("layout.storyboards", &self.storyboards),
            ("layout.characters", &self.characters),
            ("layout.production", &self.production),
            ("layout.audio", &self.audio),
            ("layout.sound", &self.sound),
            ("layout.video_prompts", &self.video_prompts),
            ("layout.final_renders", &self.final_renders),
            ("layout.clips.directory", &self.clips.directory),
            ("layout.clips.extension", &self.clips.extension),
        ];

        if let Some((key, _)) = names.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: "empty".to_string(),
            }
            .into());
        }

        if self.clips.padding == 0 {
            return Err(ConfigError::InvalidValue {
                key: "layout.clips.padding".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
