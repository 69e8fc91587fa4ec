use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use voxreel::{
    AudioChunk, JobFolder, Pipeline, PipelineConfig, StyleSpec, SubtitleOutcome, Transcriber,
    TranscriptSegment, VideoOptions,
};

#[derive(Parser, Debug)]
#[command(name = "voxreel", version)]
struct Cli {
    /// Pipeline configuration JSON (defaults apply when omitted).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a job folder from a narration file and print its id.
    NewJob(NewJobArgs),
    /// Transcribe the job's narration into subtitles.ass (restyles if it already exists).
    Subtitles(StyleArgs),
    /// Replace the style of an existing subtitles.ass.
    Restyle(StyleArgs),
    /// Mux the narration onto a background into preview.mp4 (requires `ffmpeg`).
    Preview(PreviewArgs),
    /// Burn captions into a background and write result.mp4 (requires `ffmpeg`).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct NewJobArgs {
    /// Narration audio file.
    #[arg(long)]
    speech: PathBuf,
}

#[derive(Parser, Debug)]
struct StyleArgs {
    /// Job id.
    #[arg(long)]
    job: String,

    /// Style JSON (default style when omitted).
    #[arg(long)]
    style: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Job id.
    #[arg(long)]
    job: String,

    /// Background video.
    #[arg(long)]
    background: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job id.
    #[arg(long)]
    job: String,

    /// Background video.
    #[arg(long)]
    background: PathBuf,

    /// Style JSON to burn in; subtitles.ass is restyled to it (default style when omitted).
    #[arg(long)]
    style: Option<PathBuf>,

    /// Video options JSON (3 s fades when omitted).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Seed for the background window (random when omitted).
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = match cli.config.as_deref() {
        Some(path) => PipelineConfig::from_path(path)?,
        None => PipelineConfig::default(),
    };

    match cli.cmd {
        Command::NewJob(args) => cmd_new_job(config, args),
        Command::Subtitles(args) => cmd_subtitles(config, args),
        Command::Restyle(args) => cmd_restyle(config, args),
        Command::Preview(args) => cmd_preview(config, args),
        Command::Render(args) => cmd_render(config, args),
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxreel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_new_job(config: PipelineConfig, args: NewJobArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config, no_inference())?;
    let job = pipeline.new_job(&args.speech)?;
    println!("{}", job.id());
    Ok(())
}

fn cmd_subtitles(config: PipelineConfig, args: StyleArgs) -> anyhow::Result<()> {
    let style = load_style(args.style.as_deref())?;
    let job = JobFolder::open(&config.uploads_root, &args.job)?;
    let transcriber = if job.has_subtitles() {
        no_inference()
    } else {
        speech_model(&config)?
    };
    let pipeline = Pipeline::new(config, transcriber)?;
    match pipeline.subtitles_or_restyle(&job, &style)? {
        SubtitleOutcome::Generated(doc) => {
            eprintln!("wrote {} cues", doc.cues.len());
        }
        SubtitleOutcome::Restyled => eprintln!("restyled existing subtitles"),
    }
    println!("{}", job.subtitles_path().display());
    Ok(())
}

fn cmd_restyle(config: PipelineConfig, args: StyleArgs) -> anyhow::Result<()> {
    let style = load_style(args.style.as_deref())?;
    let pipeline = Pipeline::new(config, no_inference())?;
    let job = pipeline.open_job(&args.job)?;
    pipeline.restyle(&job, &style)?;
    println!("{}", job.subtitles_path().display());
    Ok(())
}

fn cmd_preview(config: PipelineConfig, args: PreviewArgs) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(config, no_inference())?;
    let job = pipeline.open_job(&args.job)?;
    let out = pipeline.build_preview(&job, &args.background)?;
    println!("{}", out.display());
    Ok(())
}

fn cmd_render(config: PipelineConfig, args: RenderArgs) -> anyhow::Result<()> {
    let style = load_style(args.style.as_deref())?;
    let options = match args.options.as_deref() {
        Some(path) => VideoOptions::from_path(path)?,
        None => VideoOptions::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let pipeline = Pipeline::new(config, no_inference())?;
    let job = pipeline.open_job(&args.job)?;
    let out = pipeline.render(&job, &args.background, &style, &options, &mut rng)?;
    println!("{}", out.display());
    Ok(())
}

fn load_style(path: Option<&Path>) -> anyhow::Result<StyleSpec> {
    match path {
        Some(p) => StyleSpec::from_path(p).with_context(|| format!("load style '{}'", p.display())),
        None => Ok(StyleSpec::default()),
    }
}

/// Transcriber for commands that never run inference.
fn no_inference() -> Arc<dyn Transcriber> {
    Arc::new(
        |_: &AudioChunk| -> anyhow::Result<Vec<TranscriptSegment>> {
            anyhow::bail!("this command does not run speech recognition")
        },
    )
}

#[cfg(feature = "whisper")]
fn speech_model(config: &PipelineConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    let t = &config.transcriber;
    let model = voxreel::WhisperTranscriber::load(
        &t.model_path,
        t.language.clone(),
        t.threads_per_worker,
    )?;
    Ok(Arc::new(model))
}

#[cfg(not(feature = "whisper"))]
fn speech_model(_config: &PipelineConfig) -> anyhow::Result<Arc<dyn Transcriber>> {
    anyhow::bail!("speech recognition requires building voxreel with the 'whisper' feature")
}
