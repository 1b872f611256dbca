use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    encoder::{EncodedOutput, Encoder},
    error::Result,
    generation::{
        ContentGenerator, ContentKind, GenerationRequest, ImageKind, OfflineTextGenerator,
        PlaceholderAudioSource, PlaceholderClipSource, StylePreset, TextDocument,
    },
    pipeline::ProjectLayout,
    production::{SoundDesign, VideoPrompt},
    shots::{ShotList, ShotListLoader},
    timeline::{EditDecisionList, TimelineBuilder},
};

/// Everything produced before the final encode
#[derive(Debug, Clone)]
pub struct Production {
    pub screenplay: PathBuf,
    pub shot_list_path: PathBuf,
    pub shot_list: ShotList,
    pub images: Vec<PathBuf>,
    pub sound_design: PathBuf,
    pub video_prompts: Vec<PathBuf>,
    pub clips: Vec<PathBuf>,
    pub audio_track: PathBuf,
    pub edl_path: PathBuf,
    pub edl: EditDecisionList,
}

/// Outcome of a full production run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub production: Production,
    pub final_cut: EncodedOutput,
}

/// Drives a story prompt through every stage up to a finished video.
///
/// The pipeline is strictly sequential:
/// 1. Screenplay draft
/// 2. Shot list, persisted and re-read through [`ShotListLoader`]
/// 3. Concept art, storyboards and character sheets (only when an image
///    generator is registered)
/// 4. Sound design and per-shot video prompts
/// 5. One clip per shot
/// 6. A soundtrack covering the whole timeline
/// 7. Edit decision list
/// 8. Encode, then mux the soundtrack into the final cut
pub struct ProductionPipeline {
    config: Config,
    encoder: Encoder,
    text: Box<dyn ContentGenerator>,
    images: Option<Box<dyn ContentGenerator>>,
    video: Box<dyn ContentGenerator>,
    audio: Box<dyn ContentGenerator>,
}

impl ProductionPipeline {
    /// Pipeline wired to the offline stand-ins
    pub fn new(config: Config) -> Self {
        let layout = config.layout.clone();
        let text = OfflineTextGenerator::new(layout.clone(), config.planning.clone());
        let video = PlaceholderClipSource::new(
            layout.root.clone(),
            layout.clips.clone(),
            config.encoder.clone(),
            config.video.clone(),
            config.placeholder.clone(),
        );
        let audio = PlaceholderAudioSource::new(
            layout.audio_dir(),
            config.encoder.clone(),
            config.placeholder.clone(),
        );

        Self {
            encoder: Encoder::new(config.encoder.clone()),
            config,
            text: Box::new(text),
            images: None,
            video: Box::new(video),
            audio: Box::new(audio),
        }
    }

    pub fn with_text_generator(mut self, generator: Box<dyn ContentGenerator>) -> Self {
        self.text = generator;
        self
    }

    pub fn with_image_generator(mut self, generator: Box<dyn ContentGenerator>) -> Self {
        self.images = Some(generator);
        self
    }

    pub fn with_video_source(mut self, generator: Box<dyn ContentGenerator>) -> Self {
        self.video = generator;
        self
    }

    pub fn with_audio_source(mut self, generator: Box<dyn ContentGenerator>) -> Self {
        self.audio = generator;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.config.layout
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Full run: every stage of [`prepare`](Self::prepare), then the encode
    /// into `<final>/<output_name>`.
    pub async fn run(
        &self,
        prompt: &str,
        style: StylePreset,
        target_duration: f64,
        output_name: &str,
    ) -> Result<PipelineReport> {
        info!("🎬 Starting production");
        info!("   Prompt: {}", prompt);
        info!("   Style: {}", style);
        info!("   Target duration: {:.0}s", target_duration);

        let production = self.prepare(prompt, style, target_duration).await?;
        let final_cut = self.render(&production, output_name).await?;

        info!("🎉 Production complete! Final cut saved to: {:?}", final_cut.path);
        Ok(PipelineReport { production, final_cut })
    }

    /// Stages 1 to 7: everything up to and including the persisted EDL
    pub async fn prepare(&self, prompt: &str, style: StylePreset, target_duration: f64) -> Result<Production> {
        let layout = self.layout();
        layout.bootstrap()?;

        info!("📝 Step 1: Writing screenplay...");
        let screenplay = self
            .text
            .generate(
                &GenerationRequest::new(ContentKind::Text(TextDocument::Screenplay), prompt)
                    .with_style(style)
                    .with_duration(target_duration),
            )
            .await?
            .path;
        info!("   ✅ Screenplay: {:?}", screenplay);

        info!("🎞️  Step 2: Planning shots...");
        let shot_list_path = self
            .text
            .generate(
                &GenerationRequest::new(ContentKind::Text(TextDocument::ShotList), prompt)
                    .with_style(style)
                    .with_duration(target_duration),
            )
            .await?
            .path;
        let shot_list = ShotListLoader::load(&shot_list_path).await?;
        info!("   ✅ {} shots, {:.1}s", shot_list.len(), shot_list.total_duration());

        info!("🎨 Step 3: Generating images...");
        let images = self.generate_images(prompt, style, &shot_list).await?;

        let edl = TimelineBuilder::new(layout.clips.clone()).build(&shot_list);

        info!("📋 Step 4: Writing production documents...");
        let shot_types: Vec<_> = shot_list.shots.iter().map(|shot| shot.shot_type).collect();
        let sound_design = layout.sound_dir().join("sound_design.json");
        SoundDesign::from_timeline(prompt, &edl, &shot_types).save(&sound_design)?;

        let video_prompts = shot_list
            .shots
            .iter()
            .map(|shot| VideoPrompt::for_shot(shot, style, &self.config.video).save_in(layout.video_prompts_dir()))
            .collect::<Result<Vec<_>>>()?;
        info!("   ✅ Sound design and {} video prompts", video_prompts.len());

        info!("📹 Step 5: Generating clips...");
        let mut clips = Vec::with_capacity(shot_list.len());
        for shot in &shot_list.shots {
            let request = GenerationRequest::new(ContentKind::Video, shot.description.clone())
                .with_style(style)
                .with_duration(shot.duration)
                .with_resolution(self.config.video.resolution)
                .with_shot(shot.shot_number);
            let artifact = self.video.generate(&request).await?;

            let expected = layout.root.join(layout.clips.relative_path(shot.shot_number));
            clips.push(place(&artifact.path, &expected).await?);
        }
        info!("   ✅ {} clips", clips.len());

        info!("🎵 Step 6: Generating audio...");
        let audio_track = self
            .audio
            .generate(
                &GenerationRequest::new(ContentKind::Audio, prompt)
                    .with_style(style)
                    .with_duration(edl.total_duration())
                    .with_category("music"),
            )
            .await?
            .path;
        info!("   ✅ Soundtrack: {:?}", audio_track);

        info!("⏱️  Step 7: Building edit decision list...");
        let edl_path = layout.production_dir().join("edl.json");
        edl.save(&edl_path)?;
        info!("   ✅ {} edit points, {:.1}s", edl.len(), edl.total_duration());

        Ok(Production {
            screenplay,
            shot_list_path,
            shot_list,
            images,
            sound_design,
            video_prompts,
            clips,
            audio_track,
            edl_path,
            edl,
        })
    }

    /// Stage 8: encode the EDL to a temporary file, then mux the soundtrack
    pub async fn render(&self, production: &Production, output_name: &str) -> Result<EncodedOutput> {
        info!("🎬 Step 8: Encoding final cut...");
        let layout = self.layout();
        let final_path = layout.final_dir().join(output_name);
        let temp_path = layout.final_dir().join(format!("temp_{}", output_name));

        let video_only = self.encoder.encode(&production.edl, &layout.root, &temp_path).await?;
        debug!("Video-only cut: {:.1}s, {} bytes", video_only.duration, video_only.file_size);

        let final_cut = self
            .encoder
            .mux_audio(&video_only.path, &production.audio_track, &final_path)
            .await?;

        if let Err(e) = tokio::fs::remove_file(&temp_path).await {
            warn!("Could not remove {:?}: {}", temp_path, e);
        }

        info!("   ✅ {:.1}s, {} bytes", final_cut.duration, final_cut.file_size);
        Ok(final_cut)
    }

    /// Assemble existing clips from a shot list file. Clip paths resolve
    /// against `project_dir`; the EDL is written to `edl_out` when given.
    pub async fn assemble<S: AsRef<Path>, P: AsRef<Path>, O: AsRef<Path>>(
        &self,
        shot_list_path: S,
        project_dir: P,
        output_path: O,
        edl_out: Option<&Path>,
    ) -> Result<EncodedOutput> {
        let shot_list = ShotListLoader::load(shot_list_path).await?;
        let edl = TimelineBuilder::new(self.layout().clips.clone()).build(&shot_list);

        if let Some(path) = edl_out {
            edl.save(path)?;
            info!("EDL written to {:?}", path);
        }

        self.encoder.encode(&edl, project_dir, output_path).await
    }

    async fn generate_images(&self, prompt: &str, style: StylePreset, shot_list: &ShotList) -> Result<Vec<PathBuf>> {
        let Some(generator) = self.images.as_deref() else {
            info!("   No image generator registered, skipping");
            return Ok(Vec::new());
        };

        let mut requests = vec![
            GenerationRequest::new(ContentKind::Image(ImageKind::ConceptArt), prompt),
            GenerationRequest::new(ContentKind::Image(ImageKind::Character), prompt),
        ];
        requests.extend(shot_list.shots.iter().map(|shot| {
            GenerationRequest::new(ContentKind::Image(ImageKind::Storyboard), shot.description.clone())
                .with_shot(shot.shot_number)
        }));

        let mut images = Vec::new();
        for request in requests {
            if !generator.supports(request.kind) {
                debug!("{} does not handle {}, skipping", generator.name(), request.kind);
                continue;
            }
            let request = request
                .with_style(style)
                .with_resolution(self.config.video.resolution);
            images.push(generator.generate(&request).await?.path);
        }

        info!("   ✅ {} images", images.len());
        Ok(images)
    }
}

/// Make sure a generated clip sits where the timeline expects it
async fn place(generated: &Path, expected: &Path) -> Result<PathBuf> {
    if generated != expected {
        if let Some(parent) = expected.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(generated, expected).await?;
        debug!("Copied {:?} to {:?}", generated, expected);
    }
    Ok(expected.to_path_buf())
}
