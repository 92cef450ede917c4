use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrchitect::style::{EyeBallShape, EyeFrameShape, FillMode, ModuleShape};
use qrchitect::{
    suggest_default, ContentCategory, EngineOptions, ErrorCorrection, ExportFormat, HexColor,
    LogoAsset, PreviewSession, QrConfig, RenderOutcome, StyledQrEngine, Surface,
};

#[derive(Parser)]
#[command(name = "qrchitect")]
#[command(author, version, about = "Design styled QR codes and export them as PNG or SVG", long_about = None)]
struct Cli {
    /// Content to encode. URLs, emails and phone numbers get their scheme added
    content: Option<String>,

    /// Kind of content
    #[arg(short = 't', long, value_enum)]
    content_type: Option<ContentCategory>,

    /// JSON file with saved style settings (flags override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Foreground color for solid fill
    #[arg(long)]
    color: Option<HexColor>,

    /// Background color
    #[arg(long)]
    background: Option<HexColor>,

    /// Use a linear gradient for the foreground
    #[arg(long, conflicts_with = "solid")]
    gradient: bool,

    /// Use a solid foreground even if the config file enables a gradient
    #[arg(long)]
    solid: bool,

    /// Gradient start color
    #[arg(long)]
    gradient_start: Option<HexColor>,

    /// Gradient end color
    #[arg(long)]
    gradient_end: Option<HexColor>,

    /// Gradient angle in degrees (0-360)
    #[arg(long)]
    angle: Option<i32>,

    /// Shape of the data modules
    #[arg(long, value_enum)]
    dot_style: Option<ModuleShape>,

    /// Shape of the eye frames
    #[arg(long, value_enum)]
    eye_style: Option<EyeFrameShape>,

    /// Shape of the eye balls
    #[arg(long, value_enum)]
    eyeball_style: Option<EyeBallShape>,

    /// Logo image placed in the centre (PNG, JPEG, GIF or SVG)
    #[arg(short, long)]
    logo: Option<PathBuf>,

    /// Export format
    #[arg(short, long, value_enum, default_value = "png")]
    format: ExportFormat,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Image width and height in pixels
    #[arg(long, default_value = "300")]
    size: u32,

    /// Quiet margin in pixels
    #[arg(long, default_value = "10")]
    margin: u32,

    /// Error correction level
    #[arg(long, value_enum, default_value = "q")]
    error_correction: ErrorCorrection,

    /// Also draw the code in the terminal
    #[cfg(feature = "terminal")]
    #[arg(long)]
    terminal: bool,

    /// Print the resolved render request as JSON
    #[arg(long)]
    print_request: bool,
}

fn build_config(args: &Cli) -> Result<QrConfig> {
    let mut config = match &args.config {
        Some(path) => QrConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => QrConfig::default(),
    };

    if let Some(category) = args.content_type {
        if category != config.category && args.content.is_none() {
            config.content = suggest_default(category, &config.content);
        }
        config.category = category;
    }
    if let Some(content) = &args.content {
        config.content = content.clone();
    }

    if let Some(color) = args.color {
        config.foreground.solid = color;
    }
    if let Some(color) = args.background {
        config.background = color;
    }

    let wants_gradient = args.gradient
        || args.gradient_start.is_some()
        || args.gradient_end.is_some()
        || args.angle.is_some();
    if args.solid {
        config.foreground.mode = FillMode::Solid;
    } else if wants_gradient {
        config.foreground.mode = FillMode::Gradient;
    }
    if let Some(color) = args.gradient_start {
        config.foreground.gradient.start = color;
    }
    if let Some(color) = args.gradient_end {
        config.foreground.gradient.end = color;
    }
    if let Some(angle) = args.angle {
        config.foreground.gradient.angle = angle;
    }

    if let Some(shape) = args.dot_style {
        config.shapes.module = shape;
    }
    if let Some(shape) = args.eye_style {
        config.shapes.eye_frame = shape;
    }
    if let Some(shape) = args.eyeball_style {
        config.shapes.eye_ball = shape;
    }

    Ok(config)
}

fn check(outcome: RenderOutcome) -> Result<()> {
    match outcome {
        RenderOutcome::Rendered { constructed } => {
            tracing::debug!(constructed, "frame rendered");
            Ok(())
        }
        RenderOutcome::Skipped(e) => bail!("{}", e),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qrchitect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    let config = build_config(&args)?;

    let options = EngineOptions {
        margin: args.margin,
        error_correction: args.error_correction,
        ..EngineOptions::default()
    };
    let mut session: PreviewSession<StyledQrEngine> =
        PreviewSession::new(Surface::square(args.size), options, config);

    if let Some(path) = &args.logo {
        if !path.exists() {
            bail!("Logo file does not exist: {}", path.display());
        }
        let asset = LogoAsset::from_file(path)
            .with_context(|| format!("Failed to read logo {}", path.display()))?;
        session.set_logo(asset);
    }

    check(session.render()?)?;
    while let Some(outcome) = session.next_logo().await {
        check(outcome?)?;
    }
    if let Some(e) = session.logo_error() {
        eprintln!("Warning: {} (exported without logo)", e);
    }

    if args.print_request {
        if let Some(request) = session.request() {
            println!("{}", serde_json::to_string_pretty(request)?);
        }
    }

    #[cfg(feature = "terminal")]
    if args.terminal {
        if let Some(engine) = session.engine() {
            if !qrchitect::fits_in_terminal(engine.matrix()) {
                eprintln!("Warning: terminal is smaller than the code, preview may wrap");
            }
            println!("{}", qrchitect::render_to_terminal(engine.matrix(), true));
        }
    }

    let artifact = session.export(args.format)?;
    let path = artifact.write_to(&args.output)?;

    println!("Payload: {}", session.request().map(|r| r.data.as_str()).unwrap_or(""));
    println!("Saved {} ({} bytes)", path.display(), artifact.bytes.len());

    Ok(())
}
