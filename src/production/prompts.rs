use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::VideoSettings;
use crate::error::Result;
use crate::generation::StylePreset;
use crate::shots::{ShotRecord, ShotType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSpecs {
    pub shot_type: ShotType,
    pub duration_seconds: f64,
    pub fps: u32,
    pub resolution: String,
    pub aspect_ratio: String,
}

/// Look-and-feel notes handed to the video service with each prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleGuide {
    pub cinematography: String,
    pub lighting: String,
    pub color_grade: String,
    pub camera_movement: String,
}

impl StyleGuide {
    pub fn for_style(style: StylePreset) -> Self {
        let (cinematography, lighting, color_grade, camera_movement) = match style {
            StylePreset::Cinematic => (
                "cinematic, professional",
                "dramatic, motivated, high contrast",
                "cinematic color grading, teal and orange",
                "smooth, purposeful",
            ),
            StylePreset::Documentary => (
                "observational, authentic",
                "natural, available light",
                "naturalistic, slightly desaturated",
                "handheld",
            ),
            StylePreset::Noir => (
                "dutch angles, dramatic compositions",
                "high contrast, hard shadows",
                "black and white or desaturated",
                "slow, deliberate",
            ),
        };

        Self {
            cinematography: cinematography.to_string(),
            lighting: lighting.to_string(),
            color_grade: color_grade.to_string(),
            camera_movement: camera_movement.to_string(),
        }
    }
}

/// Hand-off document for an external video generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPrompt {
    pub shot_number: u32,
    pub scene: String,
    pub technical_specs: TechnicalSpecs,
    pub style: StylePreset,
    pub style_guide: StyleGuide,
    pub camera_movement: String,
    pub prompt_text: String,
}

impl VideoPrompt {
    pub fn for_shot(shot: &ShotRecord, style: StylePreset, video: &VideoSettings) -> Self {
        let prompt_text = format!(
            "{} video: {}. Shot type: {}. Camera: {}.",
            capitalize(style.as_str()),
            shot.description,
            shot.shot_type.description(),
            shot.camera_movement.replace('_', " ")
        );

        Self {
            shot_number: shot.shot_number,
            scene: shot.description.clone(),
            technical_specs: TechnicalSpecs {
                shot_type: shot.shot_type,
                duration_seconds: shot.duration,
                fps: video.fps,
                resolution: video.size(),
                aspect_ratio: video.aspect_ratio.clone(),
            },
            style,
            style_guide: StyleGuide::for_style(style),
            camera_movement: shot.camera_movement.clone(),
            prompt_text,
        }
    }

    /// `<dir>/prompt_<NNN>.json`
    pub fn save_in<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("prompt_{:03}.json", self.shot_number));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prompt_for_shot() {
        let shot = ShotRecord::new(2, ShotType::Medium, "Robot protagonist introduction", 8.0)
            .with_camera_movement("dolly_in");
        let prompt = VideoPrompt::for_shot(&shot, StylePreset::Cinematic, &VideoSettings::default());

        assert_eq!(prompt.technical_specs.resolution, "1920x1080");
        assert_eq!(prompt.technical_specs.fps, 24);
        assert_eq!(prompt.technical_specs.duration_seconds, 8.0);
        assert_eq!(
            prompt.prompt_text,
            "Cinematic video: Robot protagonist introduction. Shot type: medium shot, waist up. Camera: dolly in."
        );
    }

    #[test]
    fn test_save_in_directory() {
        let dir = tempdir().unwrap();
        let shot = ShotRecord::new(7, ShotType::CloseUp, "Flower", 3.0);
        let path = VideoPrompt::for_shot(&shot, StylePreset::Noir, &VideoSettings::default())
            .save_in(dir.path().join("video_prompts"))
            .unwrap();

        assert!(path.ends_with("video_prompts/prompt_007.json"));
        let saved: VideoPrompt = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.style, StylePreset::Noir);
        assert_eq!(saved.style_guide, StyleGuide::for_style(StylePreset::Noir));
    }

    #[test]
    fn test_style_guide_follows_preset() {
        let shot = ShotRecord::new(1, ShotType::Wide, "Harbour at dawn", 5.0);
        let documentary = VideoPrompt::for_shot(&shot, StylePreset::Documentary, &VideoSettings::default());
        assert_eq!(documentary.style_guide.lighting, "natural, available light");
        assert_eq!(documentary.style_guide.camera_movement, "handheld");

        let json = serde_json::to_value(&documentary).unwrap();
        for key in ["cinematography", "lighting", "color_grade", "camera_movement"] {
            assert!(json["style_guide"][key].is_string(), "missing style_guide.{}", key);
        }
        assert_ne!(
            StyleGuide::for_style(StylePreset::Cinematic),
            StyleGuide::for_style(StylePreset::Noir)
        );
    }
}
