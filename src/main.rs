use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pagepaint::assets::{AssetCategory, AssetLoader};
use pagepaint::models::{IntRect, ObserverId, PaintFlags, RasterSource, RenderConfig, Scene};
use pagepaint::rendering::{blank_page, decode_png, encode_png, IconSet, PagePainter, PixmapStore};

#[derive(Parser)]
#[command(name = "pagepaint")]
#[command(about = "Pagepaint - paint annotated pages over page rasters")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene file to a PNG file
    Render {
        /// Scene YAML file (page, annotations, raster)
        #[arg(short, long)]
        scene: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Config YAML file (defaults to CONFIG_FILE or built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Width of the scaled page in pixels (defaults to one pixel per point)
        #[arg(short, long)]
        width: Option<u32>,

        /// Layers to paint, comma separated: all, none, accessibility, links,
        /// images, highlights, selection, annotations
        #[arg(short, long, default_value = "all")]
        flags: String,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract icon files
        #[arg(long)]
        icons: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render {
            scene,
            output,
            config,
            width,
            flags,
        }) => run_render_command(&scene, &output, config.as_deref(), width, &flags),
        Some(Commands::Init {
            icons,
            config,
            all,
            force,
            list,
        }) => run_init_command(icons, config, all, force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Asset loader with optional external paths from env vars
fn asset_loader() -> AssetLoader {
    let icons_dir = std::env::var("ICONS_DIR").ok().map(PathBuf::from);
    let config_file = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    AssetLoader::new(icons_dir, config_file)
}

/// Parse the `--flags` list.
fn parse_flags(list: &str) -> anyhow::Result<PaintFlags> {
    let mut flags = PaintFlags::empty();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        flags |= match name {
            "all" => PaintFlags::all(),
            "none" => PaintFlags::empty(),
            "accessibility" => PaintFlags::ACCESSIBILITY,
            "links" => PaintFlags::ENHANCE_LINKS,
            "images" => PaintFlags::ENHANCE_IMAGES,
            "highlights" => PaintFlags::HIGHLIGHTS,
            "selection" => PaintFlags::TEXT_SELECTION,
            "annotations" => PaintFlags::ANNOTATIONS,
            other => anyhow::bail!("Unknown layer: {other}"),
        };
    }
    Ok(flags)
}

/// Render a scene to a PNG file
fn run_render_command(
    scene_path: &Path,
    output: &Path,
    config_path: Option<&Path>,
    width: Option<u32>,
    flags: &str,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pagepaint=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let loader = asset_loader();
    let config = match config_path {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::load_or_default(
            std::env::var("CONFIG_FILE").ok().map(PathBuf::from).as_deref(),
        ),
    };

    let mut flags = parse_flags(flags)?;
    if !config.highlight_links {
        flags.remove(PaintFlags::ENHANCE_LINKS);
    }
    if !config.highlight_images {
        flags.remove(PaintFlags::ENHANCE_IMAGES);
    }

    let scene = Scene::load(scene_path)?;
    let scaled_width = width.unwrap_or_else(|| scene.page.width.round().max(1.0) as u32);
    let scaled_height = scene.page.scaled_height_for(scaled_width);

    let observer = ObserverId(0);
    let mut source = PixmapStore::new();
    match &scene.raster {
        Some(RasterSource::Png(path)) => {
            let data = std::fs::read(path)
                .with_context(|| format!("Failed to read raster {}", path.display()))?;
            source.insert_pixmap(observer, decode_png(&data)?);
        }
        Some(RasterSource::Blank(paper)) => {
            source.insert_pixmap(observer, blank_page(scaled_width, scaled_height, *paper)?);
        }
        None => tracing::info!("Scene has no raster, painting placeholder"),
    }

    let dest_width = (scene.crop.width() * scaled_width as f64).round().max(1.0) as u32;
    let dest_height = (scene.crop.height() * scaled_height as f64).round().max(1.0) as u32;
    let mut dest = tiny_skia::Pixmap::new(dest_width, dest_height)
        .with_context(|| format!("Failed to allocate {dest_width}x{dest_height} output"))?;

    let icons = IconSet::new(loader);
    let painter = PagePainter::new(&config, &source, &icons);
    painter.paint(
        &mut dest.as_mut(),
        &scene.page,
        observer,
        flags,
        scaled_width,
        scaled_height,
        IntRect::new(0, 0, dest_width as i32, dest_height as i32),
        scene.crop,
        scene.source_marker,
    );

    let png_bytes = encode_png(&dest)?;
    std::fs::write(output, &png_bytes)?;
    println!(
        "Rendered {} ({dest_width}x{dest_height}, {} bytes)",
        output.display(),
        png_bytes.len()
    );

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    icons: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Icons:");
        for f in AssetLoader::list_embedded(AssetCategory::Icons) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Without a selection only the config is written
    let mut categories = Vec::new();
    if all || icons {
        categories.push(AssetCategory::Icons);
    }
    if all || config || !icons {
        categories.push(AssetCategory::Config);
    }

    let report = asset_loader().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display version and asset sources
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let icons_dir = std::env::var("ICONS_DIR").ok();

    println!("Pagepaint v{VERSION}");
    println!("Page compositing and annotation rendering\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  ICONS_DIR   = {}",
        icons_dir.as_deref().unwrap_or("(not set)")
    );

    let loader = asset_loader();
    let embedded = AssetLoader::list_embedded(AssetCategory::Icons).len();
    println!("\nAsset Sources:");
    println!("  Icons:   {} available ({embedded} embedded)", loader.list_icons().len());

    println!("\nRun 'pagepaint render --help' to render a scene.");
}
