use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AssemblyError, Result};
use crate::shots::Transitions;

pub const EDL_VERSION: &str = "1.0";
pub const DEFAULT_PROJECT_NAME: &str = "untitled";

/// One shot placed on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPoint {
    pub shot_number: u32,

    /// Start on the output timeline in seconds
    pub in_point: f64,

    /// End on the output timeline in seconds
    pub out_point: f64,

    /// Source clip, relative to the project directory
    pub file_path: PathBuf,

    pub transitions: Transitions,
}

impl EditPoint {
    pub fn duration(&self) -> f64 {
        self.out_point - self.in_point
    }
}

/// Edit decision list: the ordered timeline for one assembly run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditDecisionList {
    pub version: String,
    pub project_name: String,
    pub timeline: Vec<EditPoint>,
}

impl EditDecisionList {
    pub fn new<S: Into<String>>(project_name: S) -> Self {
        Self {
            version: EDL_VERSION.to_string(),
            project_name: project_name.into(),
            timeline: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Length of the whole cut in seconds
    pub fn total_duration(&self) -> f64 {
        self.timeline.last().map(|edit| edit.out_point).unwrap_or(0.0)
    }

    /// `(in_point, out_point)` of every segment, in timeline order
    pub fn boundaries(&self) -> Vec<(f64, f64)> {
        self.timeline
            .iter()
            .map(|edit| (edit.in_point, edit.out_point))
            .collect()
    }

    /// Source clip paths resolved against a project directory, in timeline order
    pub fn resolve_sources<P: AsRef<Path>>(&self, project_dir: P) -> Vec<PathBuf> {
        let project_dir = project_dir.as_ref();
        self.timeline
            .iter()
            .map(|edit| project_dir.join(&edit.file_path))
            .collect()
    }

    /// Write the EDL as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            AssemblyError::malformed("load_edl", format!("{}: {}", path.display(), e)).into()
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
