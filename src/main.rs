use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use island_generator::export;
use island_generator::terrain::{ShapeRole, TerrainGenerator};

#[derive(Parser, Debug)]
#[command(name = "island_generator")]
#[command(about = "Generate procedural island heightmaps from radial shapes and fractal noise")]
struct Args {
    /// Width of the heightmap in cells
    #[arg(short = 'W', long, default_value = "800")]
    width: usize,

    /// Height of the heightmap in cells
    #[arg(short = 'H', long, default_value = "800")]
    height: usize,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of island polygon vertices
    #[arg(short = 'v', long, default_value = "8")]
    vertices: usize,

    /// Island base radius in cells (the landmass spans ~0.9x this)
    #[arg(short = 'r', long, default_value = "400.0")]
    radius: f32,

    /// Maximum random radius distortion per vertex
    #[arg(short = 'd', long, default_value = "100.0")]
    distortion: f32,

    /// Override the base noise frequency
    #[arg(long)]
    noise_scale: Option<f32>,

    /// Override the base noise amplitude
    #[arg(long)]
    amplitude: Option<f32>,

    /// Override the island bias exponent (higher = sharper coast falloff)
    #[arg(long)]
    bias_strength: Option<f32>,

    /// Output PNG path
    #[arg(short, long, default_value = "island.png")]
    output: String,

    /// Write a grayscale heightmap instead of the colored preview
    #[arg(long)]
    gray: bool,

    /// Export shape outlines to a debug PNG (specify output path)
    #[arg(long)]
    debug_shapes: Option<String>,

    /// Export every shape's distance field to PNGs (specify path prefix)
    #[arg(long)]
    debug_fields: Option<String>,
}

fn main() {
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    println!("Generating {}x{} island (seed {})", args.width, args.height, seed);

    let mut generator = TerrainGenerator::new(seed as u32);
    if let Some(scale) = args.noise_scale {
        generator.params.base_noise_scale = scale;
    }
    if let Some(amplitude) = args.amplitude {
        generator.params.base_amplitude = amplitude;
    }
    if let Some(strength) = args.bias_strength {
        generator.params.bias_strength = strength;
    }

    generator.setup(args.vertices, args.radius, args.distortion, &mut rng);

    {
        let heightmap = generator.heightmap(args.width, args.height);
        let (min, max) = heightmap.min_max();
        println!("Height range: {:.3} to {:.3}", min, max);

        let result = if args.gray {
            export::export_heightmap_gray(heightmap, &args.output)
        } else {
            export::export_heightmap_colored(heightmap, &args.output)
        };
        if let Err(e) = result {
            eprintln!("Failed to write {}: {}", args.output, e);
            std::process::exit(1);
        }
        println!("Wrote {}", args.output);
    }

    if let Some(path) = &args.debug_shapes {
        if let Err(e) = export::export_shape_overlay(&generator, args.width, args.height, path) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
        println!("Wrote {}", path);
    }

    if let Some(prefix) = &args.debug_fields {
        for (index, (role, shape)) in generator.shapes().iter().enumerate() {
            let label = match role {
                ShapeRole::Island => "island",
                ShapeRole::MountainRange => "range",
            };
            let path = format!("{}_{}_{}.png", prefix, index, label);
            if let Err(e) = export::export_distance_field(shape, args.width, args.height, &path) {
                eprintln!("Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
            println!("Wrote {}", path);
        }
    }
}
