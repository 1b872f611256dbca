use std::path::Path;
use std::process::{Command, Output, Stdio};

use tokio::task;
use tracing::debug;

use crate::config::{EncoderConfig, PlaceholderConfig, VideoSettings};
use crate::error::{AssemblyError, Result};
use crate::filtergraph::CompiledGraph;

/// A fully specified encoder run: program, arguments, and the operation name
/// reported if it fails. Building one has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderInvocation {
    pub operation: String,
    pub program: String,
    pub args: Vec<String>,
}

fn path_arg<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().display().to_string()
}

impl EncoderInvocation {
    pub fn new<O: Into<String>, P: Into<String>>(operation: O, program: P) -> Self {
        Self {
            operation: operation.into(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Concatenate `sources` through a compiled graph into `output`.
    ///
    /// `sources[i]` must be the resolved path of `compiled.inputs[i]`.
    pub fn assemble<P: AsRef<Path>>(
        config: &EncoderConfig,
        compiled: &CompiledGraph,
        sources: &[std::path::PathBuf],
        output: P,
    ) -> Self {
        let mut invocation = Self::new("encode_timeline", &config.program).arg("-y");

        for source in sources {
            invocation = invocation.arg("-i").arg(path_arg(source));
        }

        invocation
            .args(["-filter_complex".to_string(), compiled.render()])
            .args(["-map".to_string(), compiled.output_selector()])
            .args(["-c:v", config.video_codec.as_str()])
            .args(["-preset", config.preset.as_str()])
            .args(["-crf".to_string(), config.crf.to_string()])
            .arg(path_arg(output))
    }

    /// Put `audio` under `video`, copying the video stream and stopping at the
    /// shorter of the two.
    pub fn mux<V: AsRef<Path>, A: AsRef<Path>, O: AsRef<Path>>(
        config: &EncoderConfig,
        video: V,
        audio: A,
        output: O,
    ) -> Self {
        Self::new("mux_audio", &config.program)
            .arg("-y")
            .args(["-i".to_string(), path_arg(video)])
            .args(["-i".to_string(), path_arg(audio)])
            .args(["-c:v", "copy"])
            .args(["-c:a", config.audio_codec.as_str()])
            .arg("-shortest")
            .arg(path_arg(output))
    }

    /// Solid colour clip of `duration` seconds, optionally labelled "Shot N"
    pub fn placeholder_clip<P: AsRef<Path>>(
        config: &EncoderConfig,
        video: &VideoSettings,
        placeholder: &PlaceholderConfig,
        shot_number: u32,
        duration: f64,
        output: P,
    ) -> Self {
        let source = format!(
            "color=c={}:s={}:r={}:d={}",
            placeholder.background,
            video.size(),
            video.fps,
            duration
        );

        let mut invocation = Self::new("generate_placeholder_clip", &config.program)
            .arg("-y")
            .args(["-f", "lavfi"])
            .args(["-i".to_string(), source]);

        if placeholder.draw_label {
            invocation = invocation.args([
                "-vf".to_string(),
                format!(
                    "drawtext=text='Shot {}':fontsize={}:fontcolor={}:x=(w-text_w)/2:y=(h-text_h)/2",
                    shot_number, placeholder.font_size, placeholder.font_color
                ),
            ]);
        }

        invocation
            .args(["-pix_fmt", "yuv420p"])
            .arg(path_arg(output))
    }

    /// Silent track of `duration` seconds
    pub fn silent_audio<P: AsRef<Path>>(
        config: &EncoderConfig,
        placeholder: &PlaceholderConfig,
        duration: f64,
        output: P,
    ) -> Self {
        Self::new("generate_placeholder_audio", &config.program)
            .arg("-y")
            .args(["-f", "lavfi"])
            .args(["-i".to_string(), format!("anullsrc=duration={}", duration)])
            .args(["-c:a", placeholder.audio_codec.as_str()])
            .arg(path_arg(output))
    }

    /// Read a media file's duration with the probe program
    pub fn probe_duration<P: AsRef<Path>>(config: &EncoderConfig, path: P) -> Self {
        Self::new("probe_duration", &config.probe_program)
            .args(["-v", "error"])
            .args(["-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(path_arg(path))
    }

    /// Shell-style rendering, for logs and dry runs
    pub fn command_line(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|arg| quote(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }

    /// Run to completion on the blocking pool.
    ///
    /// A non-zero exit becomes `EncodingFailed` carrying the captured stderr.
    /// Partial output left behind by the encoder is not removed.
    pub async fn run(&self) -> Result<Output> {
        debug!("Running {}: {}", self.operation, self.command_line());

        let mut command = self.to_command();
        let output = task::spawn_blocking(move || command.output())
            .await
            .map_err(|e| self.failure("not started", format!("worker task failed: {}", e)))?
            .map_err(|e| self.failure("not started", format!("failed to spawn {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(output.status.to_string(), stderr.into_owned()).into());
        }

        Ok(output)
    }

    fn failure<S: Into<String>, D: Into<String>>(&self, status: S, diagnostics: D) -> AssemblyError {
        AssemblyError::EncodingFailed {
            operation: self.operation.clone(),
            status: status.into(),
            diagnostics: diagnostics.into(),
        }
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::filtergraph::FilterGraphCompiler;
    use crate::shots::{ShotRecord, ShotType, TransitionKind, Transitions};
    use crate::timeline::TimelineBuilder;
    use std::path::PathBuf;

    fn compiled() -> CompiledGraph {
        let shots = vec![
            ShotRecord::new(1, ShotType::Wide, "", 5.0),
            ShotRecord::new(2, ShotType::CloseUp, "", 3.0)
                .with_transitions(Transitions::new(TransitionKind::Fade, TransitionKind::Cut)),
        ];
        let edl = TimelineBuilder::default().build_from_records("AI Movie", &shots);
        FilterGraphCompiler::compile(&edl).unwrap()
    }

    #[test]
    fn test_assemble_arguments() {
        let config = EncoderConfig::default();
        let graph = compiled();
        let sources = vec![PathBuf::from("/p/shots/shot_001.mp4"), PathBuf::from("/p/shots/shot_002.mp4")];
        let invocation = EncoderInvocation::assemble(&config, &graph, &sources, "/p/final/cut.mp4");

        assert_eq!(invocation.program, "ffmpeg");
        assert_eq!(
            invocation.args,
            vec![
                "-y",
                "-i", "/p/shots/shot_001.mp4",
                "-i", "/p/shots/shot_002.mp4",
                "-filter_complex", "[0:v]copy[v0];[1:v]fade=t=in:st=0:d=1[v1];[v0][v1]concat=n=2:v=1:a=0[outv]",
                "-map", "[outv]",
                "-c:v", "libx264",
                "-preset", "medium",
                "-crf", "23",
                "/p/final/cut.mp4",
            ]
        );
    }

    #[test]
    fn test_mux_arguments() {
        let invocation = EncoderInvocation::mux(&EncoderConfig::default(), "cut.mp4", "score.mp3", "final.mp4");
        assert_eq!(
            invocation.args,
            vec!["-y", "-i", "cut.mp4", "-i", "score.mp3", "-c:v", "copy", "-c:a", "aac", "-shortest", "final.mp4"]
        );
        assert_eq!(invocation.operation, "mux_audio");
    }

    #[test]
    fn test_placeholder_clip_arguments() {
        let mut placeholder = PlaceholderConfig::default();
        let video = VideoSettings::default();
        let invocation = EncoderInvocation::placeholder_clip(
            &EncoderConfig::default(), &video, &placeholder, 4, 2.5, "shots/shot_004.mp4",
        );
        assert!(invocation.args.contains(&"color=c=black:s=1920x1080:r=24:d=2.5".to_string()));
        assert!(invocation.args.iter().any(|a| a.starts_with("drawtext=text='Shot 4'")));

        placeholder.draw_label = false;
        let invocation = EncoderInvocation::placeholder_clip(
            &EncoderConfig::default(), &video, &placeholder, 4, 2.5, "shots/shot_004.mp4",
        );
        assert!(!invocation.args.iter().any(|a| a == "-vf"));
    }

    #[test]
    fn test_command_line_quotes_graph() {
        let invocation = EncoderInvocation::new("probe", "ffmpeg")
            .args(["-filter_complex", "[0:v]copy[v0]", "My Movie.mp4"]);
        assert_eq!(invocation.command_line(), "ffmpeg -filter_complex '[0:v]copy[v0]' 'My Movie.mp4'");
    }

    #[tokio::test]
    async fn test_missing_program_is_encoding_failure() {
        let invocation = EncoderInvocation::new("encode_timeline", "reelsmith-no-such-encoder").arg("-version");
        let err = invocation.run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingFailed);
        assert!(err.to_string().contains("encode_timeline"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_keeps_status_and_stderr() {
        let invocation = EncoderInvocation::new("encode_timeline", "sh").args(["-c", "echo boom >&2; exit 3"]);
        let err = invocation.run().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingFailed);

        match err {
            crate::ReelError::Assembly(AssemblyError::EncodingFailed { operation, status, diagnostics }) => {
                assert_eq!(operation, "encode_timeline");
                assert_eq!(status, "exit status: 3");
                assert!(diagnostics.contains("boom"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
