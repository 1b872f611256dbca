// Print what an assembly would do for a shot list, without running the encoder

use std::path::PathBuf;

use reelsmith::{
    config::Config,
    encoder::EncoderInvocation,
    filtergraph::FilterGraphCompiler,
    shots::ShotListLoader,
    timeline::TimelineBuilder,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: reelsmith-inspect <shot_list.json>")?;

    println!("🎬 Inspecting {:?}", path);
    let config = Config::default();

    // 1. Shot list
    let shot_list = ShotListLoader::load(&path).await?;
    println!("\n1. Shot list: {} shots, {:.1}s", shot_list.len(), shot_list.total_duration());
    for shot in &shot_list.shots {
        println!(
            "   {:>3} {:<4} {:>6.2}s  {}",
            shot.shot_number,
            shot.shot_type.abbreviation(),
            shot.duration,
            shot.description
        );
    }

    // 2. Edit decision list
    let edl = TimelineBuilder::new(config.layout.clips.clone()).build(&shot_list);
    println!("\n2. Edit decision list:");
    println!("{}", edl.to_json()?);

    // 3. Filter graph
    let compiled = FilterGraphCompiler::compile(&edl)?;
    println!("\n3. Filter graph ({} stages):", compiled.graph.len());
    for stage in compiled.graph.stages() {
        println!("   {}", stage);
    }

    // 4. Encoder command
    let sources = edl.resolve_sources(&config.layout.root);
    let output = config.layout.final_dir().join("my_movie.mp4");
    let invocation = EncoderInvocation::assemble(&config.encoder, &compiled, &sources, &output);
    println!("\n4. Encoder command:");
    println!("   {}", invocation.command_line());

    let missing: Vec<_> = sources.iter().filter(|source| !source.is_file()).collect();
    if !missing.is_empty() {
        println!("\n⚠️  {} source clips not present yet", missing.len());
    }

    Ok(())
}
