// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Dissect CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dissect::geometry::BoundingBox;
use dissect::io::{export_gltf_with_layout, GltfLayout};
use dissect::{
    CutPhase, CutRequest, Dissector, LifecycleEvent, MeshData, Plane, Primitive, Slicer,
    SlicingConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra::{Isometry3, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "dissect")]
#[command(about = "Dissect - plane slicing for closed triangle meshes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Config file (defaults to dissect.toml plus environment overrides)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut a primitive once and export both halves
    Slice {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Plane coefficients A,B,C,D of Ax + By + Cz + D = 0
        #[arg(short, long, value_parser = parse_plane, allow_hyphen_values = true)]
        plane: Plane,

        /// Output directory for left and right halves
        #[arg(short, long, default_value = "dissect-out")]
        output: PathBuf,

        /// Export layout
        #[arg(short, long, value_enum, default_value = "glb")]
        format: Format,
    },

    /// Run the cut lifecycle with random planes until every piece is finalized
    Simulate {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Seed for the random cutting planes
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Simulated time per tick in milliseconds
        #[arg(long, default_value = "16")]
        tick_ms: u64,

        /// Give up after this many ticks
        #[arg(long, default_value = "100000")]
        max_ticks: u64,

        /// Export every resulting piece into this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the effective configuration or write the defaults
    Config {
        /// Write the default configuration to this file
        #[arg(long, value_name = "FILE")]
        write: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct ShapeArgs {
    /// Primitive to cut
    #[arg(short, long, value_enum, default_value = "cube")]
    shape: Shape,

    /// Edge length of the cube or radius of the sphere
    #[arg(long, default_value = "2.0")]
    size: f32,

    /// Sphere segments
    #[arg(long, default_value = "32")]
    segments: u32,
}

impl ShapeArgs {
    fn to_mesh(&self) -> MeshData {
        match self.shape {
            Shape::Cube => Primitive::cube(Vector3::repeat(self.size), true).to_mesh(),
            Shape::Sphere => Primitive::sphere(self.size, self.segments).to_mesh(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Cube,
    Sphere,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Glb,
    Gltf,
    Embedded,
}

impl Format {
    fn layout(self) -> GltfLayout {
        match self {
            Self::Glb => GltfLayout::Binary,
            Self::Gltf => GltfLayout::Separate,
            Self::Embedded => GltfLayout::Embedded,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Glb => "glb",
            Self::Gltf | Self::Embedded => "gltf",
        }
    }
}

fn parse_plane(value: &str) -> std::result::Result<Plane, String> {
    let coefficients = value
        .split(',')
        .map(|part| part.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid plane coefficient: {err}"))?;
    let &[a, b, c, d] = coefficients.as_slice() else {
        return Err(format!("expected 4 coefficients A,B,C,D, got {}", coefficients.len()));
    };
    Plane::new(a, b, c, d).map_err(|err| err.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => SlicingConfig::from_file(path)?,
        None => SlicingConfig::load()?,
    };
    info!(?config, "configuration loaded");

    match &cli.command {
        Commands::Slice {
            shape,
            plane,
            output,
            format,
        } => slice_command(&config, shape, plane, output, *format),
        Commands::Simulate {
            shape,
            seed,
            tick_ms,
            max_ticks,
            output,
        } => simulate_command(config, shape, *seed, *tick_ms, *max_ticks, output.as_deref()),
        Commands::Config { write } => config_command(&config, write.as_deref()),
    }
}

fn slice_command(
    config: &SlicingConfig,
    shape: &ShapeArgs,
    plane: &Plane,
    output: &Path,
    format: Format,
) -> Result<()> {
    let mesh = shape.to_mesh();
    let slicer = Slicer::from_config(config)?;

    let start = Instant::now();
    let sliced = slicer.slice(&mesh, plane).context("Slicing failed")?;
    let elapsed = start.elapsed();

    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {:?}", output))?;

    println!("{}", "═".repeat(60).bright_black());
    println!("{}", "Slice Summary".bold());
    println!("{}", "═".repeat(60).bright_black());
    println!("  {} {}", "Input Triangles:".bright_black(), mesh.triangle_count().to_string().cyan());
    println!("  {} {}", "Crossing:".bright_black(), sliced.crossing_count.to_string().yellow());
    println!("  {} {}", "Cap Segments:".bright_black(), sliced.boundary.len().to_string().cyan());
    println!("  {} {:.2?}", "Sliced In:".bright_black(), elapsed);

    for (name, half) in [("left", &sliced.left), ("right", &sliced.right)] {
        let summary = format!(
            "{} body + {} cap triangles",
            half.body_triangle_count(),
            half.cap_triangle_count()
        );
        if half.triangle_count() == 0 {
            println!("  {} {} {}", format!("{name}:").bright_black(), summary, "(empty, not exported)".yellow());
            continue;
        }
        let path = output.join(format!("{name}.{}", format.extension()));
        export_gltf_with_layout(half, &path, format.layout())?;
        println!(
            "  {} {} -> {}",
            format!("{name}:").bright_black(),
            summary,
            path.display().to_string().cyan()
        );
    }

    if sliced.is_noop() {
        println!("\n  {}", "The plane does not cross the mesh".yellow());
    }
    Ok(())
}

fn simulate_command(
    config: SlicingConfig,
    shape: &ShapeArgs,
    seed: u64,
    tick_ms: u64,
    max_ticks: u64,
    output: Option<&Path>,
) -> Result<()> {
    let mesh = shape.to_mesh();
    let bounds = mesh.bounding_box();
    let expected_cuts = (1u64 << config.max_slices.min(20)) - 1;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut dissector = Dissector::new(config)?;
    dissector.spawn_object("piece", mesh.clone(), mesh, Isometry3::identity());

    let pb = ProgressBar::new(expected_cuts);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cuts")?
            .progress_chars("#>-"),
    );

    let dt = Duration::from_millis(tick_ms);
    let mut failures = 0usize;
    let mut ticks = 0u64;
    loop {
        for event in dissector.tick(dt) {
            match event {
                LifecycleEvent::Armed { object, .. } => {
                    let plane = random_plane(&mut rng, &bounds)?;
                    if dissector.request_cut(object, plane)? == CutRequest::Ignored {
                        pb.println(format!("{} cut on {} ignored", "⚠".yellow(), object));
                    }
                }
                LifecycleEvent::CutApplied { object, child, slices } => {
                    pb.inc(1);
                    pb.println(format!(
                        "{} {} -> {} (lineage {})",
                        "✂".green(),
                        object,
                        child,
                        slices
                    ));
                }
                LifecycleEvent::CutFailed { object, reason } => {
                    failures += 1;
                    pb.println(format!("{} {}: {}", "❌".red(), object, reason.bright_black()));
                    // Still armed, so try another plane
                    let plane = random_plane(&mut rng, &bounds)?;
                    dissector.request_cut(object, plane)?;
                }
                LifecycleEvent::CutStarted { .. } | LifecycleEvent::Finalized { .. } => {}
            }
        }

        let done = dissector
            .arena()
            .iter()
            .all(|(_, object)| matches!(object.phase(), CutPhase::Finalized | CutPhase::Dormant));
        if done {
            break;
        }
        ticks += 1;
        if ticks >= max_ticks {
            pb.abandon();
            bail!("Simulation did not finish within {} ticks", max_ticks);
        }
        if dissector.has_pending_cuts() {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
    pb.finish_and_clear();

    let pieces: Vec<_> = dissector
        .arena()
        .iter()
        .filter(|(_, object)| object.phase() == CutPhase::Finalized)
        .collect();

    println!("{}", "═".repeat(60).bright_black());
    println!("{}", "Simulation Summary".bold());
    println!("{}", "═".repeat(60).bright_black());
    println!("  {} {}", "Ticks:".bright_black(), ticks.to_string().cyan());
    println!("  {} {}", "Pieces:".bright_black(), pieces.len().to_string().cyan());
    println!("  {} {}", "Failed Cuts:".bright_black(), failures.to_string().yellow());
    for (id, object) in &pieces {
        println!(
            "    {} {:<24} {:>6} triangles ({} cap)",
            id.to_string().bright_black(),
            object.name,
            object.render.triangle_count(),
            object.render.cap_triangle_count()
        );
    }

    if let Some(output) = output {
        std::fs::create_dir_all(output)
            .with_context(|| format!("Failed to create output directory {:?}", output))?;
        for (id, object) in &pieces {
            let path = output.join(format!("piece-{}.glb", id.index()));
            export_gltf_with_layout(&object.render, &path, GltfLayout::Binary)?;
        }
        println!("  {} {}", "Exported To:".bright_black(), output.display().to_string().cyan());
    }
    Ok(())
}

/// Plane with a random orientation through a point near the middle of `bounds`
fn random_plane(rng: &mut StdRng, bounds: &BoundingBox) -> Result<Plane> {
    let normal = loop {
        let candidate = Vector3::<f32>::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if let Some(normal) = candidate.try_normalize(1e-3) {
            break normal;
        }
    };
    let size = bounds.size();
    let center = bounds.center();
    let point = Point3::new(
        center.x + rng.gen_range(-0.25f32..0.25) * size.x,
        center.y + rng.gen_range(-0.25f32..0.25) * size.y,
        center.z + rng.gen_range(-0.25f32..0.25) * size.z,
    );
    Ok(Plane::from_normal_and_point(&normal, &point)?)
}

fn config_command(config: &SlicingConfig, write: Option<&Path>) -> Result<()> {
    match write {
        Some(path) => {
            SlicingConfig::default().save(path)?;
            println!("{} Wrote default configuration to {}", "✓".green(), path.display());
        }
        None => {
            print!("{}", toml::to_string_pretty(config).context("Failed to serialize config")?);
        }
    }
    Ok(())
}
