//! fractal-scape CLI.
//!
//! Grows a fractal landscape from a directory of block templates and substitution
//! rules, optionally exports it and walks a ground-following probe across it.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::bail;
use cgmath::{InnerSpace, Vector3, Zero};
use clap::Parser;

use fractal_scape::{
    camera::{self, GroundFollower, MoveOutcome},
    config::FractalConfig,
    data_structures::{block::BlockLibrary, instance::BlockInstance, mesh::FractalMesh},
    decompose::Decomposer,
    ground::GroundResolver,
    resources,
};

/// Simulated frame length for `--probe`.
const FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Recursive block substitution fractal generator.
#[derive(Parser)]
#[command(name = "fractal-scape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory with `<n>.txt` templates and `<n>rule.txt` rules.
    #[arg(short, long, default_value = "assets")]
    assets: PathBuf,

    /// Number of levels to recurse. Asked for on stdin when omitted.
    #[arg(short, long)]
    level: Option<u32>,

    /// Template the fractal grows from.
    #[arg(short, long, default_value = "0")]
    seed: usize,

    /// Write the merged mesh to this wavefront file.
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Drop a walker at this horizontal position and report where it settles.
    #[arg(long, num_args = 2, value_names = ["X", "Z"], allow_negative_numbers = true)]
    probe: Option<Vec<f32>>,

    /// Horizontal direction the probe walks in.
    #[arg(long, num_args = 2, value_names = ["X", "Z"], allow_negative_numbers = true)]
    direction: Option<Vec<f32>>,

    /// Walk at running speed.
    #[arg(long)]
    run: bool,

    /// Number of frames to simulate for the probe.
    #[arg(long, default_value = "120")]
    frames: u32,
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let cli = Cli::parse();
    let level = match cli.level {
        Some(level) => level,
        None => prompt_level()?,
    };
    let config = FractalConfig {
        assets: cli.assets.clone(),
        level,
        seed: cli.seed,
        ..Default::default()
    };
    config.validate()?;

    let library = resources::load_library(&config.assets)?;
    let seed = library.seed(config.seed)?;
    let blocks = Decomposer::new(&library).decompose(seed, config.level)?;
    let mesh = FractalMesh::from_instances(&library, &blocks)?;
    println!(
        "{} blocks, {} triangles, {} edge lines",
        blocks.len(),
        mesh.triangle_count(),
        mesh.edges.len() / 2
    );

    if let Some(path) = &cli.export {
        resources::export_obj(&mesh, path)?;
    }

    if let Some([x, z]) = cli.probe.as_deref() {
        let direction = match cli.direction.as_deref() {
            Some([dx, dz]) => Vector3::new(*dx, 0.0, *dz),
            _ => Vector3::zero(),
        };
        probe(&config, &library, &blocks, (*x, *z), direction, cli.run, cli.frames);
    }

    Ok(())
}

fn prompt_level() -> anyhow::Result<u32> {
    let stdin = io::stdin();
    loop {
        println!("Input the number of levels to recurse. Must be greater than or equal to zero.");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            bail!("no recursion level given");
        }
        match line.trim().parse() {
            Ok(level) => return Ok(level),
            Err(_) => println!("Please input an integer greater than or equal to zero."),
        }
    }
}

fn probe(
    config: &FractalConfig,
    library: &BlockLibrary,
    blocks: &[BlockInstance],
    (x, z): (f32, f32),
    direction: Vector3<f32>,
    run: bool,
    frames: u32,
) {
    // Movement and eye height follow the size of the first block.
    let base_unit = blocks.first().map_or(1.0, BlockInstance::base_unit);
    let speed = if run { config.run_speed } else { config.walk_speed };
    let step = if direction.is_zero() {
        direction
    } else {
        direction.normalize() * camera::travel(speed, base_unit, FRAME_SECONDS)
    };

    let resolver = GroundResolver::new(library, blocks)
        .with_cull_radius(config.cull_radius)
        .with_clearance(config.clearance);
    let mut walker = GroundFollower::new(Vector3::new(x, 0.0, z)).with_easing(config.easing);

    let mut blocked = 0;
    let mut last = MoveOutcome::Blocked;
    for _ in 0..frames {
        last = walker.step(&resolver, step, base_unit);
        if last == MoveOutcome::Blocked {
            blocked += 1;
        }
    }

    let p = walker.position;
    match last {
        MoveOutcome::Grounded(surface) => println!(
            "walker at ({}, {}, {}) above surface {} ({} of {} moves rejected)",
            p.x, p.y, p.z, surface, blocked, frames
        ),
        MoveOutcome::Blocked => println!(
            "no ground below ({}, {}) after {} frames",
            p.x, p.z, frames
        ),
        MoveOutcome::Flying => println!("walker is flying at ({}, {}, {})", p.x, p.y, p.z),
    }
}
