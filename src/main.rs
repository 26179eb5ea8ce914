//! Polychora - headless 4D slicing tool
//!
//! Generates polychoron orbits, runs the external hull solver and slices
//! the configured scene, logging what each step produced.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use polychora_core::{hull, ConvexHull, Polychoron};
use polychora::{AppConfig, Session};

#[derive(Parser)]
#[command(name = "polychora")]
#[command(about = "Slice 4D polychora into 3D cross-sections", long_about = None)]
struct Cli {
    /// Configuration directory
    #[arg(short, long, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the vertex orbit of a polychoron
    Orbit {
        /// Name such as 8_cell, 600_cell or bitruncated_tesseract
        polychoron: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OrbitFormat::Qhull)]
        format: OrbitFormat,
    },

    /// Run qhull on a polychoron's orbit and save the hull as RON
    Hull {
        polychoron: String,

        /// Output RON file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Build the configured scene and slice it
    Slice {
        /// Step the displacement across its range in this many steps
        #[arg(long)]
        sweep: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OrbitFormat {
    /// qhull input: dimension, point count, one point per line
    Qhull,
    Ron,
}

fn parse_polychoron(slug: &str) -> Result<Polychoron> {
    match Polychoron::from_slug(slug) {
        Some(p) => Ok(p),
        None => {
            let known: Vec<String> = Polychoron::NAMED.iter().map(|p| p.slug()).collect();
            bail!("unknown polychoron `{}` (expected one of {})", slug, known.join(", "))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.config).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.debug.log_level),
    )
    .init();

    match cli.command {
        Commands::Orbit { polychoron, format } => {
            let polychoron = parse_polychoron(&polychoron)?;
            let points = polychoron.orbit().to_vec4s()?;
            match format {
                OrbitFormat::Qhull => print!("{}", hull::format_qhull_input(&points)),
                OrbitFormat::Ron => println!("{}", ron::to_string(&points)?),
            }
        }

        Commands::Hull { polychoron, out } => {
            let polychoron = parse_polychoron(&polychoron)?;
            let points = polychoron.orbit().to_vec4s()?;
            let result = config.scene.qhull().hull(&points)?;
            result
                .save(&out)
                .with_context(|| format!("writing {}", out.display()))?;
            log::info!("Saved {} hull to {}", polychoron.name(), out.display());
        }

        Commands::Slice { sweep } => {
            let mut session = Session::from_config(&config)?;
            if session.batches().is_empty() {
                bail!("nothing to slice");
            }
            if let Some(steps) = sweep {
                let start = Instant::now();
                for (d, stats) in session.sweep(steps)? {
                    log::info!(
                        "d = {:+.3}: {} triangles, {} quads, {} vertices",
                        d,
                        stats.triangles,
                        stats.quads,
                        stats.emitted_vertices()
                    );
                }
                log::info!("Swept {} steps in {:?}", steps, start.elapsed());
            }
        }
    }

    Ok(())
}
