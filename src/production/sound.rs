use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::shots::ShotType;
use crate::timeline::EditDecisionList;

/// Sound layers every design document lists
pub const SOUND_LAYERS: [(&str, &str); 5] = [
    ("dialogue", "Character speech and vocals"),
    ("foley", "Footsteps, clothing rustles, object handling"),
    ("ambience", "Environmental sounds, room tone"),
    ("sfx", "Special effects sounds"),
    ("music", "Score and source music"),
];

/// One cue on the sound timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    /// `HH:MM:SS`
    pub timecode: String,
    #[serde(rename = "type")]
    pub layer: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDesign {
    pub scene: String,
    pub sound_layers: BTreeMap<String, String>,
    pub cue_list: Vec<SoundCue>,
}

impl SoundDesign {
    /// One cue per edit point: an ambience bed on wide framing, foley on
    /// everything closer.
    pub fn from_timeline(scene: &str, edl: &EditDecisionList, shot_types: &[ShotType]) -> Self {
        let sound_layers = SOUND_LAYERS
            .iter()
            .map(|(name, description)| (name.to_string(), description.to_string()))
            .collect();

        let cue_list = edl
            .timeline
            .iter()
            .enumerate()
            .map(|(i, edit)| {
                let layer = match shot_types.get(i) {
                    Some(ShotType::ExtremeWide | ShotType::Wide | ShotType::Establishing) => "ambience",
                    _ => "foley",
                };
                SoundCue {
                    timecode: timecode(edit.in_point),
                    layer: layer.to_string(),
                    description: format!("Shot {} ({:.1}s)", edit.shot_number, edit.duration()),
                }
            })
            .collect();

        Self {
            scene: scene.to_string(),
            sound_layers,
            cue_list,
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Whole seconds as `HH:MM:SS`
pub fn timecode(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}
