use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use rayon::ThreadPool;
use tokio::task;
use tracing::{debug, info};

use crate::config::EncoderConfig;
use crate::encoder::command::EncoderInvocation;
use crate::error::{AssemblyError, ReelError, Result};
use crate::filtergraph::{CompiledGraph, FilterGraphCompiler};
use crate::timeline::EditDecisionList;

/// A file written by the encoder
#[derive(Debug, Clone)]
pub struct EncodedOutput {
    pub path: PathBuf,

    /// Expected length in seconds
    pub duration: f64,
    pub file_size: u64,
}

/// Drives the external encoder for assembly and muxing.
///
/// Every call spawns one encoder process and waits for it; nothing is
/// retried and nothing is cleaned up after a failure. Clones share the
/// source validation pool, which is built on first use.
#[derive(Debug, Clone)]
pub struct Encoder {
    config: EncoderConfig,
    validation_pool: Arc<OnceLock<ThreadPool>>,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            validation_pool: Arc::new(OnceLock::new()),
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Whether the encoder program can be started
    pub fn is_available(&self) -> bool {
        Command::new(&self.config.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// [`is_available`](Self::is_available) on the blocking pool
    pub async fn check_available(&self) -> bool {
        let encoder = self.clone();
        task::spawn_blocking(move || encoder.is_available())
            .await
            .unwrap_or(false)
    }

    fn validation_pool(&self) -> Result<&ThreadPool> {
        if let Some(pool) = self.validation_pool.get() {
            return Ok(pool);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.validation_threads.max(1))
            .thread_name(|i| format!("reelsmith-validate-{}", i))
            .build()
            .map_err(|e| ReelError::generic(format!("validate_sources: {}", e)))?;

        Ok(self.validation_pool.get_or_init(|| pool))
    }

    /// Compile and encode an EDL whose clip paths are relative to `project_dir`
    pub async fn encode<P: AsRef<Path>, O: AsRef<Path>>(
        &self,
        edl: &EditDecisionList,
        project_dir: P,
        output_path: O,
    ) -> Result<EncodedOutput> {
        let compiled = FilterGraphCompiler::compile(edl)?;
        self.encode_compiled(&compiled, project_dir, output_path).await
    }

    /// Encode a compiled graph. All source clips are checked before the
    /// encoder is spawned.
    pub async fn encode_compiled<P: AsRef<Path>, O: AsRef<Path>>(
        &self,
        compiled: &CompiledGraph,
        project_dir: P,
        output_path: O,
    ) -> Result<EncodedOutput> {
        let project_dir = project_dir.as_ref();
        let output_path = output_path.as_ref();

        let sources: Vec<PathBuf> = compiled
            .inputs
            .iter()
            .map(|input| project_dir.join(input))
            .collect();

        self.validate_sources(&sources)?;
        ensure_parent(output_path)?;

        let invocation = EncoderInvocation::assemble(&self.config, compiled, &sources, output_path);
        info!("Encoding {} clips ({:.1}s) to {:?}", sources.len(), compiled.duration, output_path);
        invocation.run().await?;

        let file_size = std::fs::metadata(output_path)?.len();
        Ok(EncodedOutput {
            path: output_path.to_path_buf(),
            duration: compiled.duration,
            file_size,
        })
    }

    /// Check every source clip exists. Reports the first missing clip in
    /// timeline order.
    pub fn validate_sources(&self, sources: &[PathBuf]) -> Result<()> {
        let missing = self.validation_pool()?.install(|| sources.par_iter().position_first(|source| !source.is_file()));

        if let Some(index) = missing {
            return Err(AssemblyError::MissingSourceClip {
                operation: "encode_timeline".to_string(),
                path: sources[index].display().to_string(),
            }
            .into());
        }

        debug!("All {} source clips present", sources.len());
        Ok(())
    }

    /// Mux `audio_path` onto `video_path` without re-encoding video. The
    /// output stops at the shorter of the two inputs.
    pub async fn mux_audio<V: AsRef<Path>, A: AsRef<Path>, O: AsRef<Path>>(
        &self,
        video_path: V,
        audio_path: A,
        output_path: O,
    ) -> Result<EncodedOutput> {
        let video_path = video_path.as_ref();
        let audio_path = audio_path.as_ref();
        let output_path = output_path.as_ref();

        for (path, role) in [(video_path, "video"), (audio_path, "audio")] {
            if !path.is_file() {
                return Err(AssemblyError::MissingSourceClip {
                    operation: "mux_audio".to_string(),
                    path: format!("{} ({})", path.display(), role),
                }
                .into());
            }
        }
        ensure_parent(output_path)?;

        info!("Muxing {:?} + {:?} -> {:?}", video_path, audio_path, output_path);
        EncoderInvocation::mux(&self.config, video_path, audio_path, output_path)
            .run()
            .await?;

        let file_size = std::fs::metadata(output_path)?.len();
        let duration = self.probe_duration(output_path).await.unwrap_or(0.0);

        Ok(EncodedOutput {
            path: output_path.to_path_buf(),
            duration,
            file_size,
        })
    }

    /// Media duration in seconds, as reported by the probe program
    pub async fn probe_duration<P: AsRef<Path>>(&self, path: P) -> Result<f64> {
        let output = EncoderInvocation::probe_duration(&self.config, path.as_ref()).run().await?;
        let text = String::from_utf8_lossy(&output.stdout);

        text.trim().parse::<f64>().map_err(|_| {
            AssemblyError::EncodingFailed {
                operation: "probe_duration".to_string(),
                status: "exit status: 0".to_string(),
                diagnostics: format!("unexpected probe output: {:?}", text.trim()),
            }
            .into()
        })
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, PlaceholderConfig, VideoSettings};
    use crate::error::ErrorKind;
    use crate::shots::{ShotRecord, ShotType, TransitionKind, Transitions};
    use crate::timeline::TimelineBuilder;
    use tempfile::tempdir;

    fn two_shot_edl() -> EditDecisionList {
        let shots = vec![
            ShotRecord::new(1, ShotType::Wide, "", 5.0),
            ShotRecord::new(2, ShotType::CloseUp, "", 3.0)
                .with_transitions(Transitions::new(TransitionKind::Fade, TransitionKind::Cut)),
        ];
        TimelineBuilder::default().build_from_records("AI Movie", &shots)
    }

    fn encoder_without_binary() -> Encoder {
        Encoder::new(EncoderConfig {
            program: "reelsmith-no-such-encoder".to_string(),
            ..EncoderConfig::default()
        })
    }

    fn have_tools(encoder: &Encoder) -> bool {
        encoder.is_available()
            && Command::new(&encoder.config().probe_program)
                .arg("-version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|s| s.success())
                .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_missing_clip_fails_before_spawning() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("shots")).unwrap();
        std::fs::write(dir.path().join("shots/shot_001.mp4"), b"not really video").unwrap();

        // The encoder program does not exist, so reaching the spawn would
        // produce EncodingFailed instead.
        let encoder = encoder_without_binary();
        let output = dir.path().join("final/cut.mp4");
        let err = encoder.encode(&two_shot_edl(), dir.path(), &output).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingSourceClip);
        assert!(err.to_string().contains("shot_002.mp4"));
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_empty_edl_is_rejected() {
        let dir = tempdir().unwrap();
        let err = encoder_without_binary()
            .encode(&EditDecisionList::new("none"), dir.path(), dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyTimeline);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_encoding_failure() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("shots")).unwrap();
        for n in 1..=2 {
            std::fs::write(dir.path().join(format!("shots/shot_00{}.mp4", n)), b"x").unwrap();
        }

        let err = encoder_without_binary()
            .encode(&two_shot_edl(), dir.path(), dir.path().join("final/cut.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingFailed);
    }

    #[tokio::test]
    async fn test_mux_requires_both_inputs() {
        let dir = tempdir().unwrap();
        let video = dir.path().join("cut.mp4");
        std::fs::write(&video, b"x").unwrap();

        let err = encoder_without_binary()
            .mux_audio(&video, dir.path().join("missing.mp3"), dir.path().join("final.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingSourceClip);
        assert!(err.to_string().contains("mux_audio"));
    }

    #[test]
    fn test_validate_sources_reports_first_missing() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("a.mp4");
        std::fs::write(&present, b"x").unwrap();
        let sources = vec![present, dir.path().join("b.mp4"), dir.path().join("c.mp4")];

        let err = Encoder::new(EncoderConfig::default()).validate_sources(&sources).unwrap_err();
        assert!(err.to_string().contains("b.mp4"));
    }

    #[test]
    fn test_validation_pool_is_built_once_and_shared() {
        let dir = tempdir().unwrap();
        let clip = dir.path().join("a.mp4");
        std::fs::write(&clip, b"x").unwrap();

        let encoder = Encoder::new(EncoderConfig {
            validation_threads: 2,
            ..EncoderConfig::default()
        });
        encoder.validate_sources(&[clip.clone()]).unwrap();
        encoder.validate_sources(&[clip]).unwrap();

        let first = encoder.validation_pool().unwrap() as *const ThreadPool;
        let shared = encoder.clone();
        assert!(std::ptr::eq(first, shared.validation_pool().unwrap()));
        assert_eq!(encoder.validation_pool().unwrap().current_num_threads(), 2);
    }

    #[tokio::test]
    async fn test_check_available_without_binary() {
        assert!(!encoder_without_binary().check_available().await);
    }

    #[tokio::test]
    async fn test_real_encoder_end_to_end() {
        let config = Config {
            video: VideoSettings { resolution: (320, 240), ..VideoSettings::default() },
            placeholder: PlaceholderConfig {
                draw_label: false,
                audio_codec: "aac".to_string(),
                audio_extension: "m4a".to_string(),
                ..PlaceholderConfig::default()
            },
            ..Config::default()
        };
        let encoder = Encoder::new(config.encoder.clone());
        if !have_tools(&encoder) {
            eprintln!("skipping: encoder or probe program not available");
            return;
        }

        let dir = tempdir().unwrap();
        let edl = two_shot_edl();
        for edit in &edl.timeline {
            let path = dir.path().join(&edit.file_path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            EncoderInvocation::placeholder_clip(
                &config.encoder, &config.video, &config.placeholder,
                edit.shot_number, edit.duration(), &path,
            )
            .run()
            .await
            .unwrap();
        }

        let cut = dir.path().join("final/cut.mp4");
        let encoded = encoder.encode(&edl, dir.path(), &cut).await.unwrap();
        assert!(encoded.file_size > 0);
        let probed = encoder.probe_duration(&cut).await.unwrap();
        assert!((probed - 8.0).abs() < 0.25, "cut length {}", probed);

        // 8s of video under 5s of audio is trimmed to the audio
        let audio = dir.path().join("audio/score.m4a");
        std::fs::create_dir_all(audio.parent().unwrap()).unwrap();
        EncoderInvocation::silent_audio(&config.encoder, &config.placeholder, 5.0, &audio)
            .run()
            .await
            .unwrap();

        let muxed = encoder.mux_audio(&cut, &audio, dir.path().join("final/with_audio.mp4")).await.unwrap();
        assert!(muxed.duration > 4.5 && muxed.duration < 6.0, "muxed length {}", muxed.duration);
    }
}
