//! Circumplex CLI - render organic emotion glows to PNG, SVG and JSON.

use anyhow::{Context, Result};
use circumplex::config::CircumplexConfig;
use circumplex::svg::SvgDocument;
use circumplex::{
    compute_layout, compute_layout_attributes, generate, ActiveSet, CanvasSize, Catalog, Generator,
    Renderer,
};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "circumplex")]
#[command(about = "Render overlapping organic glows for a set of emotions")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "circumplex.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Render the active emotions to an image
    Render {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Blob raster resolution
        #[arg(short, long)]
        resolution: Option<u32>,

        /// Active emotions (comma-separated ids, e.g. "joy,sadness")
        #[arg(short, long, value_delimiter = ',')]
        active: Option<Vec<String>>,

        /// Also write an SVG scene with labels
        #[arg(long)]
        svg: bool,

        /// Also write each layer as its own PNG
        #[arg(long)]
        layers: bool,
    },

    /// Print label and blob placements as JSON
    Layout {
        /// Canvas width
        #[arg(long)]
        width: Option<u32>,

        /// Canvas height
        #[arg(long)]
        height: Option<u32>,

        /// Active emotions (comma-separated ids)
        #[arg(short, long, value_delimiter = ',')]
        active: Option<Vec<String>>,
    },

    /// List the catalog with derived attributes
    Catalog,
}

fn active_set(
    config: &CircumplexConfig,
    catalog: &Catalog,
    active: Option<Vec<String>>,
) -> Result<ActiveSet> {
    match active {
        Some(ids) => Ok(ActiveSet::new(catalog, ids)?),
        None => config.active_set(catalog),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Saved to {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("circumplex=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = CircumplexConfig::load(Path::new(&cli.config))?;
    let catalog = config.catalog()?;

    match cli.command {
        Commands::Render {
            output,
            width,
            height,
            resolution,
            active,
            svg,
            layers,
        } => {
            let canvas = CanvasSize::new(
                width.unwrap_or(config.output.width),
                height.unwrap_or(config.output.height),
            );
            let resolution = resolution.unwrap_or(config.render.resolution);
            let active = active_set(&config, &catalog, active)?;
            let layers = layers || config.output.layers;

            println!(
                "Rendering {} at {}x{} (resolution {})...",
                active.ids().join(", "),
                canvas.width,
                canvas.height,
                resolution
            );

            let renderer = Renderer::new(resolution)?;
            let frame = renderer
                .render(&catalog, &active, canvas)?
                .context("render pass was superseded")?;

            if frame.layout.is_scaled() {
                println!(
                    "  Labels scaled by {:.3} to fit the canvas",
                    frame.layout.safety_ratio
                );
            }

            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.output.directory));
            fs::create_dir_all(&output_dir)?;

            write_file(&output_dir.join("circumplex.png"), &frame.composite_png()?)?;
            write_file(
                &output_dir.join("circumplex.json"),
                serde_json::to_string_pretty(&frame.layout)?.as_bytes(),
            )?;

            if svg {
                let document = SvgDocument::new(&frame, &catalog).render()?;
                write_file(&output_dir.join("circumplex.svg"), document.as_bytes())?;
            }

            if layers {
                let extension = renderer.generator().extension();
                for layer in &frame.layers {
                    let path = output_dir.join(format!(
                        "layer_{}_{}.{}",
                        renderer.generator().name(),
                        layer.category_id(),
                        extension
                    ));
                    write_file(&path, &layer.encode_png()?)?;
                }
            }
        }

        Commands::Layout {
            width,
            height,
            active,
        } => {
            let canvas = CanvasSize::new(
                width.unwrap_or(config.output.width),
                height.unwrap_or(config.output.height),
            );
            let active = active_set(&config, &catalog, active)?;
            let attributes = compute_layout_attributes(active.ids())?;
            let layout = compute_layout(&attributes, canvas, |id| {
                catalog.get(id).map(|c| c.name.as_str())
            })?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }

        Commands::Catalog => {
            println!("{:<14} {:<14} {:<8} {:>9} {:>9}", "ID", "NAME", "COLOR", "INTENSITY", "INFLUENCE");
            for category in catalog.iter() {
                let traits = generate(&category.id);
                println!(
                    "{:<14} {:<14} {:<8} {:>8.0}% {:>9.1}",
                    category.id,
                    category.name,
                    category.color,
                    traits.intensity * 100.0,
                    traits.influence
                );
            }
        }
    }

    Ok(())
}
