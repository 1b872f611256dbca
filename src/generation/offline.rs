use std::fmt::Write as _;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::PlanningConfig;
use crate::error::{GenerationError, ReelError, Result};
use crate::generation::traits::{
    require, ContentGenerator, ContentKind, GeneratedArtifact, GenerationRequest, TextDocument,
};
use crate::pipeline::ProjectLayout;
use crate::shots::{ShotList, ShotRecord, ShotType, TransitionKind, Transitions};

const SERVICE: &str = "offline-text";

/// Upper bound on planned shots per request
pub const MAX_PLANNED_SHOTS: usize = 10_000;

const FRAMING_CYCLE: [ShotType; 3] = [ShotType::ExtremeWide, ShotType::Medium, ShotType::CloseUp];
const MOVEMENT_CYCLE: [&str; 3] = ["static", "dolly_in", "pan_right"];

/// Text service stand-in that needs no network access.
///
/// Writes a screenplay draft stub and plans shot lists by splitting the
/// target duration into shots of a fixed nominal length.
pub struct OfflineTextGenerator {
    layout: ProjectLayout,
    planning: PlanningConfig,
}

impl OfflineTextGenerator {
    pub fn new(layout: ProjectLayout, planning: PlanningConfig) -> Self {
        Self { layout, planning }
    }

    /// Shot lengths covering `target` seconds; the last shot takes the remainder.
    ///
    /// Fails when the target is not a positive finite number or would need
    /// more than [`MAX_PLANNED_SHOTS`] shots.
    pub fn plan_durations(&self, target: f64) -> Result<Vec<f64>> {
        if !target.is_finite() || target <= 0.0 {
            return Err(planning_failure(format!("target duration must be positive, got {}", target)));
        }

        let length = self.planning.shot_length;
        let needed = (target / length).ceil();
        if !needed.is_finite() || needed > MAX_PLANNED_SHOTS as f64 {
            return Err(planning_failure(format!(
                "{}s at {}s per shot needs more than {} shots",
                target, length, MAX_PLANNED_SHOTS
            )));
        }

        let full = (target / length).floor() as usize;
        let mut durations = vec![length; full];

        let remainder = target - full as f64 * length;
        if remainder > 1e-6 {
            durations.push(remainder);
        }
        Ok(durations)
    }

    pub fn plan_shot_list(&self, request: &GenerationRequest) -> Result<ShotList> {
        let target = require(SERVICE, "duration", request.duration)?;
        let durations = self.plan_durations(target)?;
        let count = durations.len();

        let shots = durations
            .into_iter()
            .enumerate()
            .map(|(i, duration)| {
                let shot_type = FRAMING_CYCLE[i % FRAMING_CYCLE.len()];
                let description = format!(
                    "{} ({}, {} style, shot {} of {})",
                    request.prompt,
                    shot_type.description(),
                    request.style,
                    i + 1,
                    count
                );
                let incoming = if i == 0 { TransitionKind::Fade } else { TransitionKind::Cut };

                ShotRecord::new(i as u32 + 1, shot_type, description, duration)
                    .with_camera_movement(MOVEMENT_CYCLE[i % MOVEMENT_CYCLE.len()])
                    .with_transitions(Transitions::new(incoming, TransitionKind::Cut))
            })
            .collect();

        Ok(ShotList::new(project_title(&request.prompt), shots))
    }

    fn screenplay(&self, request: &GenerationRequest) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "# {}", project_title(&request.prompt));
        let _ = writeln!(text);
        let _ = writeln!(text, "Style: {}", request.style);
        if let Some(duration) = request.duration {
            let _ = writeln!(text, "Target length: {:.0} seconds", duration);
        }
        let _ = writeln!(text);
        let _ = writeln!(text, "FADE IN:");
        let _ = writeln!(text);
        let _ = writeln!(text, "{}", request.prompt);
        let _ = writeln!(text);
        let _ = writeln!(text, "FADE OUT.");
        text
    }
}

fn planning_failure(reason: String) -> ReelError {
    GenerationError::ServiceFailed {
        service: SERVICE.to_string(),
        reason,
    }
    .into()
}

/// First few words of the prompt, used as the project name
pub fn project_title(prompt: &str) -> String {
    let title = prompt.split_whitespace().take(6).collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        "untitled".to_string()
    } else {
        title
    }
}

#[async_trait]
impl ContentGenerator for OfflineTextGenerator {
    fn name(&self) -> &str {
        SERVICE
    }

    fn supports(&self, kind: ContentKind) -> bool {
        matches!(kind, ContentKind::Text(_))
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedArtifact> {
        let path = match request.kind {
            ContentKind::Text(TextDocument::Screenplay) => {
                let path = self.layout.scripts_dir().join("screenplay.md");
                tokio::fs::create_dir_all(self.layout.scripts_dir()).await?;
                tokio::fs::write(&path, self.screenplay(request)).await?;
                path
            }
            ContentKind::Text(TextDocument::ShotList) => {
                let list = self.plan_shot_list(request)?;
                let path = self.layout.production_dir().join("shot_list.json");
                list.save(&path)?;
                info!("Planned {} shots ({:.1}s)", list.len(), list.total_duration());
                path
            }
            other => {
                return Err(GenerationError::UnsupportedKind {
                    service: SERVICE.to_string(),
                    requested: other.to_string(),
                }
                .into())
            }
        };

        debug!("{} wrote {} to {:?}", SERVICE, request.kind, path);
        Ok(GeneratedArtifact { kind: request.kind, path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::generation::StylePreset;
    use crate::shots::ShotListLoader;
    use tempfile::tempdir;

    fn generator(root: &std::path::Path) -> OfflineTextGenerator {
        let layout = ProjectLayout::at(root);
        OfflineTextGenerator::new(layout, PlanningConfig::default())
    }

    #[test]
    fn test_plan_durations() {
        let dir = tempdir().unwrap();
        let generator = generator(dir.path());

        assert_eq!(generator.plan_durations(15.0).unwrap(), vec![5.0, 5.0, 5.0]);
        assert_eq!(generator.plan_durations(12.0).unwrap(), vec![5.0, 5.0, 2.0]);
        assert_eq!(generator.plan_durations(3.0).unwrap(), vec![3.0]);
        assert_eq!(generator.plan_durations(180.0).unwrap().len(), 36);
    }

    #[tokio::test]
    async fn test_oversized_targets_are_rejected() {
        let dir = tempdir().unwrap();
        let generator = generator(dir.path());

        let at_cap = MAX_PLANNED_SHOTS as f64 * 5.0;
        assert_eq!(generator.plan_durations(at_cap).unwrap().len(), MAX_PLANNED_SHOTS);
        assert!(generator.plan_durations(at_cap + 1.0).is_err());

        for target in [1e12, 1e20, f64::MAX] {
            let request = GenerationRequest::new(ContentKind::Text(TextDocument::ShotList), "Epic").with_duration(target);
            let err = generator.generate(&request).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Generation);
            assert!(err.to_string().contains("offline-text"));
        }
        assert!(!dir.path().join("production/shot_list.json").exists());
    }

    #[tokio::test]
    async fn test_shot_list_is_loadable() {
        let dir = tempdir().unwrap();
        let generator = generator(dir.path());

        let request = GenerationRequest::new(
            ContentKind::Text(TextDocument::ShotList),
            "A lonely robot discovers an abandoned flower in a post-apocalyptic city",
        )
        .with_style(StylePreset::Noir)
        .with_duration(12.0);

        let artifact = generator.generate(&request).await.unwrap();
        assert!(artifact.path.ends_with("production/shot_list.json"));

        let list = ShotListLoader::load(&artifact.path).await.unwrap();
        assert_eq!(list.project_name.as_deref(), Some("A lonely robot discovers an abandoned"));
        assert_eq!(list.len(), 3);
        assert_eq!(list.total_duration(), 12.0);
        assert!(list.shots[0].effective_transitions().fades_in());
        assert_eq!(list.shots[2].shot_type, ShotType::CloseUp);
        assert!(list.shots[1].description.contains("noir"));
    }

    #[tokio::test]
    async fn test_screenplay_draft() {
        let dir = tempdir().unwrap();
        let request = GenerationRequest::new(ContentKind::Text(TextDocument::Screenplay), "Robot meets flower");
        let artifact = generator(dir.path()).generate(&request).await.unwrap();

        let text = std::fs::read_to_string(&artifact.path).unwrap();
        assert!(text.starts_with("# Robot meets flower"));
        assert!(text.contains("FADE IN:"));
    }

    #[tokio::test]
    async fn test_rejects_other_kinds_and_bad_durations() {
        let dir = tempdir().unwrap();
        let generator = generator(dir.path());

        let err = generator.generate(&GenerationRequest::new(ContentKind::Audio, "x")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generation);

        let no_duration = GenerationRequest::new(ContentKind::Text(TextDocument::ShotList), "x");
        assert!(generator.generate(&no_duration).await.is_err());

        let negative = no_duration.clone().with_duration(-4.0);
        assert!(generator.generate(&negative).await.is_err());
    }

    #[test]
    fn test_project_title() {
        assert_eq!(project_title("   "), "untitled");
        assert_eq!(project_title("one two"), "one two");
    }
}
