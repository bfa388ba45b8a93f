mod bot;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use kumitate_core::catalog::{catalog_slugs, default_layout, layout_by_slug, LAYOUT_CATALOG};
use kumitate_core::config::{ScatterArea, SessionOptions};
use kumitate_core::layout::PuzzleLayout;
use kumitate_core::partners::{partner_pairs, resolve_partners};
use kumitate_core::placement::generate_positions;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kumitate", version, about = "Headless tools for the kumitate assembly engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scatter pieces over an area and print the positions.
    Scatter {
        #[arg(long, default_value_t = 50)]
        count: usize,
        #[arg(long, default_value_t = SessionOptions::default().min_separation)]
        min_separation: f32,
        /// `min_x,min_z,max_x,max_z`
        #[arg(long, value_parser = parse_area_arg)]
        area: Option<ScatterArea>,
        #[arg(long, env = "KUMITATE_SEED")]
        seed: Option<String>,
    },
    /// Print the partner lists of a layout.
    Partners {
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Print a built-in layout as TOML, or list the built-in layouts.
    Layout { slug: Option<String> },
    /// Let a bot assemble a layout through the drag gesture API.
    Play(bot::PlayArgs),
}

#[derive(Args, Clone, Debug)]
pub(crate) struct LayoutArgs {
    /// Layout TOML file.
    #[arg(long, env = "KUMITATE_LAYOUT")]
    layout: Option<PathBuf>,
    /// Built-in layout slug, takes precedence over `--layout`.
    #[arg(long)]
    builtin: Option<String>,
}

impl LayoutArgs {
    pub(crate) fn resolve(&self) -> Result<PuzzleLayout> {
        if let Some(slug) = self.builtin.as_deref() {
            return builtin_layout(slug);
        }
        match &self.layout {
            Some(path) => PuzzleLayout::from_path(path)
                .with_context(|| format!("loading layout {}", path.display())),
            None => Ok(default_layout().layout()),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scatter {
            count,
            min_separation,
            area,
            seed,
        } => {
            let area = area.unwrap_or_default();
            let seed = resolve_seed(seed.as_deref())?;
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = generate_positions(count, min_separation, area, &mut rng);
            for (index, position) in placement.positions.iter().enumerate() {
                println!("{index:>4} {:>8.3} {:>8.3}", position.x, position.z);
            }
            let closest = closest_pair_distance(&placement.positions);
            println!(
                "seed: {seed:#x} pieces: {} grid_fallbacks: {} unresolved: {} closest_pair: {}",
                placement.positions.len(),
                placement.fallback_count,
                placement.unresolved_count,
                closest.map_or_else(|| "-".to_string(), |d| format!("{d:.3}"))
            );
        }
        Commands::Partners { layout } => {
            let layout = layout.resolve()?;
            let geometries = layout.geometries();
            let partners = resolve_partners(&geometries, layout.options.adjacency_factor);
            for (geometry, list) in geometries.iter().zip(&partners) {
                let names: Vec<&str> = list
                    .iter()
                    .map(|&other| geometries[other].id.as_str())
                    .collect();
                println!("{}: {}", geometry.id, names.join(", "));
            }
            info!(
                layout = %layout.name,
                pieces = geometries.len(),
                pairs = partner_pairs(&partners).len(),
                "partners resolved"
            );
        }
        Commands::Layout { slug } => match slug {
            Some(slug) => {
                let layout = builtin_layout(&slug)?;
                print!("{}", layout.to_toml_string()?);
            }
            None => {
                for entry in LAYOUT_CATALOG {
                    println!("{} ({})", entry.slug, entry.label);
                }
            }
        },
        Commands::Play(args) => bot::run(args)?,
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn builtin_layout(slug: &str) -> Result<PuzzleLayout> {
    match layout_by_slug(slug) {
        Some(entry) => Ok(entry.layout()),
        None => {
            let available: Vec<&str> = catalog_slugs().collect();
            bail!("unknown layout `{slug}`, available: {}", available.join(", "))
        }
    }
}

pub(crate) fn resolve_seed(raw: Option<&str>) -> Result<u64> {
    match raw {
        Some(raw) => parse_seed_arg(raw),
        None => Ok(rand::rng().random()),
    }
}

fn parse_seed_arg(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed `{raw}`"))?
    } else {
        trimmed
            .parse::<u64>()
            .with_context(|| format!("invalid seed `{raw}`"))?
    };
    Ok(value)
}

fn parse_area_arg(raw: &str) -> Result<ScatterArea> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid area `{raw}`"))?;
    let &[min_x, min_z, max_x, max_z] = values.as_slice() else {
        return Err(anyhow!("area needs four values, got {}", values.len()));
    };
    if !(min_x <= max_x && min_z <= max_z) {
        bail!("area minimum must not exceed its maximum");
    }
    Ok(ScatterArea::new(Vec2::new(min_x, min_z), Vec2::new(max_x, max_z)))
}

fn closest_pair_distance(positions: &[glam::Vec3]) -> Option<f32> {
    let mut closest: Option<f32> = None;
    for (index, a) in positions.iter().enumerate() {
        for b in &positions[index + 1..] {
            let distance = a.distance(*b);
            closest = Some(closest.map_or(distance, |current| current.min(distance)));
        }
    }
    closest
}
