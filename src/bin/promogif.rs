use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use promogif::{
    BackgroundEffect, BorderEffect, FileImageGenerator, FontBook, FrameIndex, Layout,
    RenderConfig, StylingRequest, TextAnimation, TextSize,
};

#[derive(Parser, Debug)]
#[command(name = "promogif", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a still and a caption into an animated GIF.
    Render(RenderArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Print the frame timing plan as JSON.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Source still (PNG, JPEG, ...).
    #[arg(long)]
    image: PathBuf,

    /// Caption text; overrides the request file.
    #[arg(long)]
    text: Option<String>,

    /// Styling request JSON.
    #[arg(long)]
    request: Option<PathBuf>,

    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Caption placement (center, top, bottom, diagonal, corner).
    #[arg(long)]
    layout: Option<Layout>,

    /// Caption size (normal, large, extra-large).
    #[arg(long)]
    size: Option<TextSize>,

    /// Caption entrance (none, zoom-in, fade-in, slide-in).
    #[arg(long)]
    animation: Option<TextAnimation>,

    /// Background motion (none, ken-burns).
    #[arg(long)]
    background: Option<BackgroundEffect>,

    /// Border decoration (none, neon, rainbow, strobe).
    #[arg(long)]
    border: Option<BorderEffect>,

    /// Font family or CSS-style family list.
    #[arg(long)]
    font: Option<String>,

    /// Extra font file to register (repeatable).
    #[arg(long = "font-file")]
    font_files: Vec<PathBuf>,

    /// Directory scanned recursively for font files.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    style: StyleArgs,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    style: StyleArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Render config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RenderConfig> {
    let cfg = match path {
        Some(p) => RenderConfig::from_path(p)?,
        None => RenderConfig::default(),
    };
    let cfg = cfg.with_env_overrides();
    cfg.validate()?;
    Ok(cfg)
}

fn build_request(args: &StyleArgs) -> anyhow::Result<StylingRequest> {
    let mut req = match (&args.request, &args.text) {
        (Some(path), _) => StylingRequest::from_path(path)?,
        (None, Some(text)) => StylingRequest::new(text.clone()),
        (None, None) => anyhow::bail!("either --text or --request is required"),
    };
    if let Some(text) = &args.text {
        req.overlay_text = text.clone();
    }
    if let Some(v) = args.layout {
        req = req.with_layout(v);
    }
    if let Some(v) = args.size {
        req = req.with_text_size(v);
    }
    if let Some(v) = args.animation {
        req = req.with_text_animation(v);
    }
    if let Some(v) = args.background {
        req = req.with_background_effect(v);
    }
    if let Some(v) = args.border {
        req = req.with_border_effect(v);
    }
    if let Some(font) = &args.font {
        req = req.with_font(font.clone());
    }
    req.validate()?;
    Ok(req)
}

fn build_fonts(args: &StyleArgs) -> anyhow::Result<FontBook> {
    let mut fonts = FontBook::with_system_fonts();
    for path in &args.font_files {
        let families = fonts.register_file(path)?;
        tracing::info!(path = %path.display(), ?families, "registered font");
    }
    if let Some(dir) = &args.fonts_dir {
        let n = fonts.register_dir(dir)?;
        tracing::info!(dir = %dir.display(), faces = n, "registered font directory");
    }
    Ok(fonts)
}

fn create_parent_dir(path: &std::path::Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(args.style.config.as_ref())?;
    let request = build_request(&args.style)?;
    let fonts = build_fonts(&args.style)?;

    let image_base64 =
        promogif::generate_image(&FileImageGenerator::new(&args.style.image), "")?;
    let resources = promogif::ScratchFiles::new();
    let artifact =
        promogif::render_gif(&request, &image_base64, fonts, &config, &resources)?;

    create_parent_dir(&args.out)?;
    artifact.write_to(&args.out)?;
    eprintln!(
        "wrote {} ({} frames, {} bytes)",
        args.out.display(),
        artifact.frame_count,
        artifact.bytes.len()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(args.style.config.as_ref())?;
    let request = build_request(&args.style)?;
    let fonts = build_fonts(&args.style)?;
    let image = promogif::load_image_file(&args.style.image)?;

    let frame = promogif::render_still_frame(
        &request,
        &image,
        fonts,
        &config,
        FrameIndex(args.frame),
    )?;

    create_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let plan = config.timing_plan()?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
