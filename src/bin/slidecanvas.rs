use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use slidecanvas::{
    Bitmap, Canvas, DocumentSource, FontSet, Renderer, SlideStore, SvgDeckConverter,
    SvgRasterizer, ViewerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "slidecanvas", version)]
struct Cli {
    /// Viewer configuration JSON (store and renderer options).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print slide count, nominal size and measured slide sizes.
    Info(InfoArgs),
    /// Render one slide as a PNG.
    Render(RenderArgs),
    /// Write a thumbnail PNG per slide.
    Thumbs(ThumbsArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Deck directory of `*.svg` files, or a deck manifest JSON.
    #[arg(long)]
    deck: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Deck directory of `*.svg` files, or a deck manifest JSON.
    #[arg(long)]
    deck: PathBuf,

    /// Slide index (0-based).
    #[arg(long, default_value_t = 0)]
    slide: usize,

    /// Scale factor.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Clockwise rotation in degrees (0, 90, 180 or 270).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    rotation: i32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ThumbsArgs {
    /// Deck directory of `*.svg` files, or a deck manifest JSON.
    #[arg(long)]
    deck: PathBuf,

    /// Output directory for `slide-<n>.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// First slide index (0-based).
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Number of slides.
    #[arg(long, default_value_t = usize::MAX)]
    count: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::from_path(path)?,
        None => ViewerConfig::default(),
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;

    rt.block_on(async move {
        match cli.cmd {
            Command::Info(args) => cmd_info(args, &config).await,
            Command::Render(args) => cmd_render(args, &config).await,
            Command::Thumbs(args) => cmd_thumbs(args, &config).await,
        }
    })
}

async fn load_store(
    deck: &Path,
    config: &ViewerConfig,
) -> anyhow::Result<SlideStore<SvgDeckConverter>> {
    let converter =
        SvgDeckConverter::with_fonts(FontSet::new(config.renderer.load_system_fonts));
    let mut store = SlideStore::with_opts(converter, config.store.clone())?;
    store
        .load(&DocumentSource::from(deck.to_path_buf()))
        .await
        .with_context(|| format!("load deck '{}'", deck.display()))?;
    Ok(store)
}

fn make_renderer(config: &ViewerConfig) -> anyhow::Result<Renderer<SvgRasterizer>> {
    let rasterizer =
        SvgRasterizer::with_fonts(FontSet::new(config.renderer.load_system_fonts));
    Ok(Renderer::with_opts(rasterizer, config.renderer.clone())?)
}

async fn cmd_info(args: InfoArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let store = load_store(&args.deck, config).await?;
    let nominal = store.dimensions();
    println!("slides: {}", store.slide_count());
    println!("nominal: {}x{}", nominal.width, nominal.height);
    for i in 0..store.slide_count() {
        let slide = store.slide_at(i)?;
        println!(
            "  slide {i}: measured {}x{}",
            slide.measured_width(),
            slide.measured_height()
        );
    }
    Ok(())
}

async fn cmd_render(args: RenderArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let store = load_store(&args.deck, config).await?;
    let mut renderer = make_renderer(config)?;
    let mut canvas = Canvas::default();

    let outcome = renderer
        .render(&store, &mut canvas, args.slide, args.scale, args.rotation)
        .await?;
    write_png(&args.out, &canvas.snapshot())?;
    eprintln!("wrote {}", args.out.display());

    if let Some(err) = outcome.error() {
        anyhow::bail!("slide {} fell back to the error surface: {err}", args.slide);
    }
    Ok(())
}

async fn cmd_thumbs(args: ThumbsArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let store = load_store(&args.deck, config).await?;
    let mut renderer = make_renderer(config)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let thumbs = renderer.thumbnails(&store, args.from, args.count).await;
    for thumb in &thumbs {
        let path = args.out_dir.join(format!("slide-{}.png", thumb.index + 1));
        write_png(&path, &thumb.bitmap)?;
        if let Some(err) = &thumb.error {
            eprintln!("slide {}: placeholder thumbnail ({err})", thumb.index);
        }
    }
    eprintln!("wrote {} thumbnails to {}", thumbs.len(), args.out_dir.display());
    Ok(())
}

fn write_png(path: &Path, bitmap: &Bitmap) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &bitmap.to_straight_rgba8(),
        bitmap.width,
        bitmap.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}
