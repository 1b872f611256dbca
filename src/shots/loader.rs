use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{AssemblyError, Result};
use crate::shots::types::{default_camera_movement, ShotList, ShotRecord, ShotType, Transitions};

const OPERATION: &str = "load_shot_list";

/// Shot list as written on disk, before required fields are checked
#[derive(Deserialize)]
struct RawShotList {
    project_name: Option<String>,
    #[serde(default)]
    shots: Vec<RawShotRecord>,
}

#[derive(Deserialize)]
struct RawShotRecord {
    shot_number: Option<i64>,
    #[serde(alias = "type")]
    shot_type: Option<ShotType>,
    description: Option<String>,
    duration: Option<f64>,
    camera_movement: Option<String>,
    transitions: Option<Transitions>,
}

/// Reads shot list artifacts into validated [`ShotList`]s
pub struct ShotListLoader;

impl ShotListLoader {
    /// Read and validate a shot list file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<ShotList> {
        let path = path.as_ref();
        debug!("Loading shot list from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AssemblyError::malformed(OPERATION, format!("cannot read {}: {}", path.display(), e))
        })?;

        let list = Self::parse(&content)?;
        info!("Loaded shot list with {} shots ({:.1}s)", list.len(), list.total_duration());
        Ok(list)
    }

    /// Parse and validate shot list JSON.
    ///
    /// File order is kept as the sequence order. Shot numbers that are out of
    /// order or repeated are reported as warnings only.
    pub fn parse(content: &str) -> Result<ShotList> {
        let raw: RawShotList = serde_json::from_str(content)
            .map_err(|e| AssemblyError::malformed(OPERATION, format!("invalid shot list: {}", e)))?;

        let shots = raw
            .shots
            .into_iter()
            .enumerate()
            .map(|(index, record)| Self::validate_record(index, record))
            .collect::<Result<Vec<_>>>()?;

        Self::check_numbering(&shots);

        Ok(ShotList {
            project_name: raw.project_name,
            shots,
        })
    }

    fn validate_record(index: usize, raw: RawShotRecord) -> Result<ShotRecord> {
        let shot_number = raw.shot_number.ok_or_else(|| {
            AssemblyError::malformed(OPERATION, format!("shot at index {} is missing shot_number", index))
        })?;

        let shot_number = u32::try_from(shot_number)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AssemblyError::malformed(
                    OPERATION,
                    format!("shot at index {} has invalid shot_number {}", index, shot_number),
                )
            })?;

        let duration = raw.duration.ok_or_else(|| {
            AssemblyError::malformed(OPERATION, format!("shot {} is missing duration", shot_number))
        })?;

        if !duration.is_finite() || duration <= 0.0 {
            return Err(AssemblyError::malformed(
                OPERATION,
                format!("shot {} has non-positive duration {}", shot_number, duration),
            )
            .into());
        }

        let shot_type = raw.shot_type.unwrap_or_default();
        if shot_type == ShotType::Other {
            warn!("Shot {} has an unrecognised shot type", shot_number);
        }

        Ok(ShotRecord {
            shot_number,
            shot_type,
            description: raw.description.unwrap_or_default(),
            duration,
            camera_movement: raw.camera_movement.unwrap_or_else(default_camera_movement),
            transitions: raw.transitions,
        })
    }

    fn check_numbering(shots: &[ShotRecord]) {
        let mut seen = HashSet::new();
        let mut previous: Option<u32> = None;

        for shot in shots {
            if !seen.insert(shot.shot_number) {
                warn!("Shot number {} appears more than once; clips will share a source file", shot.shot_number);
            }
            if let Some(prev) = previous {
                if shot.shot_number <= prev {
                    warn!("Shot number {} follows {}; keeping file order", shot.shot_number, prev);
                }
            }
            previous = Some(shot.shot_number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::shots::TransitionKind;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "project_name": "AI Movie",
        "shots": [
            {"shot_number": 1, "type": "extreme_wide", "description": "Establishing shot of the city", "duration": 5, "camera_movement": "static"},
            {"shot_number": 2, "shot_type": "close_up", "description": "Optical sensors focusing", "duration": 3,
             "transitions": {"in": "fade", "out": "cut"}}
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let list = ShotListLoader::parse(SAMPLE).unwrap();
        assert_eq!(list.project_name.as_deref(), Some("AI Movie"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.shots[0].shot_type, ShotType::ExtremeWide);
        assert_eq!(list.shots[0].duration, 5.0);
        assert_eq!(list.shots[1].camera_movement, "static");
        assert_eq!(list.shots[1].effective_transitions().incoming, TransitionKind::Fade);
    }

    #[test]
    fn test_missing_duration_is_malformed() {
        let err = ShotListLoader::parse(r#"{"shots":[{"shot_number":1}]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("missing duration"));
    }

    #[test]
    fn test_missing_shot_number_is_malformed() {
        let err = ShotListLoader::parse(r#"{"shots":[{"duration":2.0}]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(err.to_string().contains("load_shot_list"));
    }

    #[test]
    fn test_non_positive_duration_is_malformed() {
        for duration in ["0", "-1.5"] {
            let json = format!(r#"{{"shots":[{{"shot_number":1,"duration":{}}}]}}"#, duration);
            let err = ShotListLoader::parse(&json).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedInput);
        }
    }

    #[test]
    fn test_zero_shot_number_is_malformed() {
        let err = ShotListLoader::parse(r#"{"shots":[{"shot_number":0,"duration":1}]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_unparseable_document_is_malformed() {
        let err = ShotListLoader::parse("shots: - 1").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);

        let err = ShotListLoader::parse(r#"{"shots":[{"shot_number":1,"duration":1,"transitions":{"in":"spin"}}]}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_file_order_is_kept() {
        let list = ShotListLoader::parse(
            r#"{"shots":[{"shot_number":7,"duration":1},{"shot_number":2,"duration":1},{"shot_number":7,"duration":1}]}"#,
        )
        .unwrap();
        let numbers: Vec<u32> = list.shots.iter().map(|s| s.shot_number).collect();
        assert_eq!(numbers, vec![7, 2, 7]);
        assert!(list.project_name.is_none());
    }

    #[test]
    fn test_missing_shots_key_is_empty_list() {
        let list = ShotListLoader::parse(r#"{"project_name":"Nothing yet"}"#).unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shot_list.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let list = ShotListLoader::load(&path).await.unwrap();
        assert_eq!(list.len(), 2);

        let missing = ShotListLoader::load(dir.path().join("nope.json")).await.unwrap_err();
        assert_eq!(missing.kind(), ErrorKind::MalformedInput);
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_shots() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("production").join("shot_list.json");
        let list = ShotListLoader::parse(SAMPLE).unwrap();

        list.save(&path).unwrap();
        let reloaded = ShotListLoader::load(&path).await.unwrap();
        assert_eq!(reloaded, list);
    }
}
