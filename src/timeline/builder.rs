use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::shots::{ShotList, ShotRecord};
use crate::timeline::edl::{EditDecisionList, EditPoint, DEFAULT_PROJECT_NAME};

/// Where the source clip for a shot number is expected to live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipNaming {
    /// Directory relative to the project root
    pub directory: String,
    pub prefix: String,
    pub extension: String,

    /// Zero padding width of the shot number
    pub padding: usize,
}

impl Default for ClipNaming {
    fn default() -> Self {
        Self {
            directory: "shots".to_string(),
            prefix: "shot_".to_string(),
            extension: "mp4".to_string(),
            padding: 3,
        }
    }
}

impl ClipNaming {
    /// e.g. `shot_007.mp4`
    pub fn file_name(&self, shot_number: u32) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            shot_number,
            self.extension,
            width = self.padding
        )
    }

    /// e.g. `shots/shot_007.mp4`
    pub fn relative_path(&self, shot_number: u32) -> PathBuf {
        PathBuf::from(&self.directory).join(self.file_name(shot_number))
    }
}

/// Folds a shot sequence into an [`EditDecisionList`].
///
/// Each shot starts where the previous one ended; the first starts at 0.
/// Sequence order is the input order.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    naming: ClipNaming,
}

impl TimelineBuilder {
    pub fn new(naming: ClipNaming) -> Self {
        Self { naming }
    }

    pub fn naming(&self) -> &ClipNaming {
        &self.naming
    }

    /// Build the EDL for a loaded shot list
    pub fn build(&self, shot_list: &ShotList) -> EditDecisionList {
        let project_name = shot_list
            .project_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
        self.build_from_records(project_name, &shot_list.shots)
    }

    /// Build an EDL from shot records in sequence order
    pub fn build_from_records<S: Into<String>>(&self, project_name: S, shots: &[ShotRecord]) -> EditDecisionList {
        let mut edl = EditDecisionList::new(project_name);
        let mut current_time = 0.0;

        for shot in shots {
            let edit = EditPoint {
                shot_number: shot.shot_number,
                in_point: current_time,
                out_point: current_time + shot.duration,
                file_path: self.naming.relative_path(shot.shot_number),
                transitions: shot.effective_transitions(),
            };

            debug!("Shot {:03}: {:.2}s -> {:.2}s ({:?})",
                   edit.shot_number, edit.in_point, edit.out_point, edit.file_path);

            current_time = edit.out_point;
            edl.timeline.push(edit);
        }

        info!("Timeline built: {} edit points, {:.2}s total", edl.len(), edl.total_duration());
        edl
    }
}
