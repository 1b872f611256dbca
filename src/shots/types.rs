use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How a shot enters or leaves the cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    #[default]
    Cut,
    Fade,
    Dissolve,
    Wipe,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Cut => "cut",
            TransitionKind::Fade => "fade",
            TransitionKind::Dissolve => "dissolve",
            TransitionKind::Wipe => "wipe",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incoming and outgoing transition of a shot.
///
/// Serialized with the `in`/`out` keys used by shot list and EDL files. A
/// missing side is a plain cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transitions {
    #[serde(rename = "in", default)]
    pub incoming: TransitionKind,

    #[serde(rename = "out", default)]
    pub outgoing: TransitionKind,
}

impl Transitions {
    pub fn new(incoming: TransitionKind, outgoing: TransitionKind) -> Self {
        Self { incoming, outgoing }
    }

    pub fn fades_in(&self) -> bool {
        self.incoming == TransitionKind::Fade
    }
}

/// Shot framing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    #[serde(alias = "extreme_wide_shot")]
    ExtremeWide,
    #[serde(alias = "wide_shot")]
    Wide,
    Establishing,
    #[default]
    #[serde(alias = "medium_shot")]
    Medium,
    #[serde(alias = "closeup")]
    CloseUp,
    ExtremeCloseUp,
    OverShoulder,
    PointOfView,
    #[serde(other)]
    Other,
}

impl ShotType {
    /// Standard script abbreviation
    pub fn abbreviation(&self) -> &'static str {
        match self {
            ShotType::ExtremeWide => "EWS",
            ShotType::Wide => "WS",
            ShotType::Establishing => "EST",
            ShotType::Medium => "MS",
            ShotType::CloseUp => "CU",
            ShotType::ExtremeCloseUp => "ECU",
            ShotType::OverShoulder => "OS",
            ShotType::PointOfView => "POV",
            ShotType::Other => "--",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ShotType::ExtremeWide => "extreme wide shot, full environment",
            ShotType::Wide => "wide shot, full figure with some environment",
            ShotType::Establishing => "establishing shot",
            ShotType::Medium => "medium shot, waist up",
            ShotType::CloseUp => "close-up, head and shoulders",
            ShotType::ExtremeCloseUp => "extreme close-up, detail shot",
            ShotType::OverShoulder => "over the shoulder shot",
            ShotType::PointOfView => "point of view shot",
            ShotType::Other => "unspecified framing",
        }
    }
}

/// One planned shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub shot_number: u32,

    #[serde(default, alias = "type")]
    pub shot_type: ShotType,

    #[serde(default)]
    pub description: String,

    /// Length in seconds, always positive
    pub duration: f64,

    #[serde(default = "default_camera_movement")]
    pub camera_movement: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Transitions>,
}

pub(crate) fn default_camera_movement() -> String {
    "static".to_string()
}

impl ShotRecord {
    pub fn new<S: Into<String>>(shot_number: u32, shot_type: ShotType, description: S, duration: f64) -> Self {
        Self {
            shot_number,
            shot_type,
            description: description.into(),
            duration,
            camera_movement: default_camera_movement(),
            transitions: None,
        }
    }

    pub fn with_transitions(mut self, transitions: Transitions) -> Self {
        self.transitions = Some(transitions);
        self
    }

    pub fn with_camera_movement<S: Into<String>>(mut self, movement: S) -> Self {
        self.camera_movement = movement.into();
        self
    }

    /// Transitions with the cut/cut default applied
    pub fn effective_transitions(&self) -> Transitions {
        self.transitions.unwrap_or_default()
    }
}

/// A shot list artifact: project name plus shots in cut order.
///
/// The order of `shots` is the sequence order. `shot_number` is a label used
/// to name source clips and is never used to reorder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShotList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,

    #[serde(default)]
    pub shots: Vec<ShotRecord>,
}

impl ShotList {
    pub fn new<S: Into<String>>(project_name: S, shots: Vec<ShotRecord>) -> Self {
        Self {
            project_name: Some(project_name.into()),
            shots,
        }
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Sum of all shot durations in seconds
    pub fn total_duration(&self) -> f64 {
        self.shots.iter().map(|shot| shot.duration).sum()
    }

    /// Write the shot list as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
