use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    pipeline::ProjectLayout,
};

/// Main configuration for Reelsmith
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External encoder settings
    pub encoder: EncoderConfig,

    /// Output directory layout and clip naming
    pub layout: ProjectLayout,

    /// Target video format for generated material
    pub video: VideoSettings,

    /// Placeholder media appearance
    pub placeholder: PlaceholderConfig,

    /// Offline shot planning
    pub planning: PlanningConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.encoder.validate()?;
        self.layout.validate()?;
        self.video.validate()?;
        self.planning.validate()?;
        Ok(())
    }
}

fn invalid<K: Into<String>, V: ToString>(key: K, value: V) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        value: value.to_string(),
    }
}

/// Encoder invocation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Encoder executable name or path
    pub program: String,

    /// Probe executable used to read media durations
    pub probe_program: String,

    /// Video codec for assembled cuts
    pub video_codec: String,

    /// Encoder speed/quality preset
    pub preset: String,

    /// Constant rate factor (0-51, lower is better)
    pub crf: u8,

    /// Audio codec used when muxing a soundtrack
    pub audio_codec: String,

    /// Threads used to check that source clips exist
    pub validation_threads: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            probe_program: "ffprobe".to_string(),
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            validation_threads: num_cpus::get(),
        }
    }
}

impl EncoderConfig {
    fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(invalid("encoder.program", &self.program).into());
        }

        if self.probe_program.trim().is_empty() {
            return Err(invalid("encoder.probe_program", &self.probe_program).into());
        }

        if self.crf > 51 {
            return Err(invalid("encoder.crf", self.crf).into());
        }

        if self.validation_threads == 0 {
            return Err(invalid("encoder.validation_threads", self.validation_threads).into());
        }

        Ok(())
    }
}

/// Format of generated footage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    /// Resolution (width, height)
    pub resolution: (u32, u32),

    /// Frames per second
    pub fps: u32,

    pub aspect_ratio: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            resolution: (1920, 1080),
            fps: 24,
            aspect_ratio: "16:9".to_string(),
        }
    }
}

impl VideoSettings {
    fn validate(&self) -> Result<()> {
        if self.resolution.0 == 0 || self.resolution.1 == 0 {
            return Err(invalid(
                "video.resolution",
                format!("{}x{}", self.resolution.0, self.resolution.1),
            )
            .into());
        }

        if self.fps == 0 {
            return Err(invalid("video.fps", self.fps).into());
        }

        Ok(())
    }

    /// Resolution in `WxH` form
    pub fn size(&self) -> String {
        format!("{}x{}", self.resolution.0, self.resolution.1)
    }
}

/// Appearance of stand-in clips and audio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    pub background: String,
    pub font_size: u32,
    pub font_color: String,

    /// Draw "Shot N" on each clip (needs an encoder built with drawtext)
    pub draw_label: bool,

    pub audio_codec: String,
    pub audio_extension: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            background: "black".to_string(),
            font_size: 48,
            font_color: "white".to_string(),
            draw_label: true,
            audio_codec: "mp3".to_string(),
            audio_extension: "mp3".to_string(),
        }
    }
}

/// Offline shot planning parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Nominal length of a planned shot in seconds
    pub shot_length: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self { shot_length: 5.0 }
    }
}

impl PlanningConfig {
    fn validate(&self) -> Result<()> {
        if self.shot_length.is_nan() || self.shot_length <= 0.0 {
            return Err(invalid("planning.shot_length", self.shot_length).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("reelsmith.toml");

        let mut original_config = Config::default();
        original_config.encoder.crf = 18;
        original_config.video.fps = 30;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config.encoder.crf, 18);
        assert_eq!(loaded_config.video.fps, 30);
        assert_eq!(loaded_config.layout.clips.padding, original_config.layout.clips.padding);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[encoder]\nvideo_codec = \"libx265\"\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        let defaults = EncoderConfig::default();
        assert_eq!(config.encoder.video_codec, "libx265");
        assert_eq!(config.encoder.program, defaults.program);
        assert_eq!(config.encoder.crf, defaults.crf);
        assert_eq!(config.encoder.validation_threads, defaults.validation_threads);
        assert_eq!(config.video.fps, 24);
        assert_eq!(config.layout.clips.extension, "mp4");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_single_key_overrides_per_section() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("overrides.toml");
        std::fs::write(
            &file_path,
            "[encoder]\ncrf = 18\n\n[video]\nfps = 30\n\n[placeholder]\ndraw_label = false\n\n[planning]\nshot_length = 4.0\n",
        )
        .unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.encoder.crf, 18);
        assert_eq!(config.encoder.preset, "medium");
        assert_eq!(config.video.fps, 30);
        assert_eq!(config.video.resolution, (1920, 1080));
        assert!(!config.placeholder.draw_label);
        assert_eq!(config.placeholder.background, "black");
        assert_eq!(config.planning.shot_length, 4.0);
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(crate::ReelError::Config(ConfigError::FileNotFound { .. }))));
    }

    #[test]
    fn test_invalid_crf() {
        let mut config = Config::default();
        config.encoder.crf = 60;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_shot_length() {
        let mut config = Config::default();
        config.planning.shot_length = 0.0;
        assert!(config.validate().is_err());
    }
}
