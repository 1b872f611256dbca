use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reelsmith::{
    config::Config,
    encoder::Encoder,
    generation::StylePreset,
    pipeline::ProductionPipeline,
    shots::ShotListLoader,
    timeline::TimelineBuilder,
    ReelError,
};

#[derive(Parser)]
#[command(
    name = "reelsmith",
    version,
    about = "Turn a story prompt into a rough cut",
    long_about = "Reelsmith plans a shot list from a story prompt, writes the production documents, renders placeholder media and assembles the final cut with an external encoder."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full production pipeline for a story prompt
    Generate {
        /// Story prompt
        prompt: String,

        /// Visual style tag
        #[arg(short, long, value_enum, default_value_t = StylePreset::Cinematic)]
        style: StylePreset,

        /// Target duration in seconds
        #[arg(short, long, default_value_t = 180.0)]
        duration: f64,

        /// File name of the final cut
        #[arg(short, long, default_value = "my_movie.mp4")]
        output: String,
    },

    /// Assemble existing clips from a shot list
    Assemble {
        /// Shot list JSON
        #[arg(long)]
        shot_list: PathBuf,

        /// Directory clip paths are relative to (defaults to the layout root)
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Output video file path
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the edit decision list here
        #[arg(long)]
        edl: Option<PathBuf>,
    },

    /// Mux a soundtrack onto a video without re-encoding the picture
    Mux {
        #[arg(long)]
        video: PathBuf,

        #[arg(long)]
        audio: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build the edit decision list for a shot list
    Edl {
        /// Shot list JSON
        #[arg(long)]
        shot_list: PathBuf,

        /// Write the EDL here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ReelError>() {
            Some(reel) => eprintln!("Error: {}", reel.user_message()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting Reelsmith v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    match cli.command {
        Command::Generate { prompt, style, duration, output } => {
            warn_if_encoder_missing(&config).await;
            let pipeline = ProductionPipeline::new(config);
            let report = pipeline.run(&prompt, style, duration, &output).await?;

            info!("Shot list: {:?}", report.production.shot_list_path);
            info!("EDL: {:?}", report.production.edl_path);
            info!("Final cut: {:?} ({:.1}s)", report.final_cut.path, report.final_cut.duration);
        }
        Command::Assemble { shot_list, project, output, edl } => {
            warn_if_encoder_missing(&config).await;
            let project = project.unwrap_or_else(|| config.layout.root.clone());
            let pipeline = ProductionPipeline::new(config);
            let encoded = pipeline.assemble(&shot_list, &project, &output, edl.as_deref()).await?;

            info!("Assembled {:?} ({:.1}s, {} bytes)", encoded.path, encoded.duration, encoded.file_size);
        }
        Command::Mux { video, audio, output } => {
            warn_if_encoder_missing(&config).await;
            let encoded = Encoder::new(config.encoder.clone()).mux_audio(&video, &audio, &output).await?;

            info!("Muxed {:?} ({:.1}s)", encoded.path, encoded.duration);
        }
        Command::Edl { shot_list, output } => {
            let list = ShotListLoader::load(&shot_list).await?;
            let edl = TimelineBuilder::new(config.layout.clips.clone()).build(&list);

            match output {
                Some(path) => {
                    edl.save(&path)?;
                    info!("EDL with {} edit points written to {:?}", edl.len(), path);
                }
                None => println!("{}", edl.to_json()?),
            }
        }
    }

    Ok(())
}

async fn warn_if_encoder_missing(config: &Config) {
    if !Encoder::new(config.encoder.clone()).check_available().await {
        warn!("{} not found on PATH; encoding steps will fail", config.encoder.program);
    }
}
